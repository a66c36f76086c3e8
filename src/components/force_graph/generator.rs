//! Random graph construction.
//!
//! Nodes get sequential ids (`n0`, `n1`, ...) and each node links to a few
//! distinct, randomly chosen other nodes. Ids are only unique within one
//! generated graph.

use std::ops::RangeInclusive;

use log::debug;
use rand::Rng;

use super::types::{Edge, Graph, Node};
use crate::config::GeneratorConfig;

/// Produces fresh random graphs. Keeps no reference to what it generated.
#[derive(Clone, Debug, Default)]
pub struct RandomGraphGenerator {
	config: GeneratorConfig,
}

impl RandomGraphGenerator {
	pub fn new(config: GeneratorConfig) -> Self {
		Self { config }
	}

	/// Generates a graph using the thread-local RNG.
	pub fn generate(&self) -> Graph {
		self.generate_with(&mut rand::thread_rng())
	}

	/// Generates a graph from the given RNG.
	pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Graph {
		let n = rng.gen_range(self.node_range());
		let nodes: Vec<Node> = (0..n)
			.map(|i| Node::new(node_id(i), format!("Node {i}")))
			.collect();

		let mut edges = Vec::new();
		let mut targets = Vec::with_capacity(n);
		for source in 0..n {
			// Only n - 1 distinct non-self targets exist.
			let k = rng.gen_range(self.degree_range()).min(n - 1);

			targets.clear();
			while targets.len() < k {
				let target = rng.gen_range(0..n);
				if target != source && !targets.contains(&target) {
					targets.push(target);
				}
			}

			edges.extend(targets.iter().map(|&target| {
				Edge::new(
					format!("e{source}-{target}"),
					node_id(source),
					node_id(target),
					self.config.edge_label.clone(),
				)
			}));
		}

		debug!(
			"graph-playground: generated {} nodes, {} edges",
			nodes.len(),
			edges.len()
		);
		Graph::from_trusted(nodes, edges)
	}

	fn node_range(&self) -> RangeInclusive<usize> {
		ordered(self.config.min_nodes, self.config.max_nodes)
	}

	fn degree_range(&self) -> RangeInclusive<usize> {
		ordered(self.config.min_out_degree, self.config.max_out_degree)
	}
}

fn node_id(index: usize) -> String {
	format!("n{index}")
}

fn ordered(a: usize, b: usize) -> RangeInclusive<usize> {
	a.min(b)..=a.max(b)
}
