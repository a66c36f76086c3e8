//! Graph model handed to the render engine.
//!
//! A [`Graph`] can only be obtained in a valid state: node ids and edge ids are
//! unique, every edge endpoint names a node of the same graph, and no edge
//! loops back onto its source.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// A labeled node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
	/// Unique identifier within a graph. Referenced by edge endpoints.
	pub id: String,
	/// Display label drawn next to the node.
	pub label: String,
}

impl Node {
	pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
		}
	}
}

/// A directed, labeled edge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
	/// Unique identifier within a graph.
	pub id: String,
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Display label drawn along the edge.
	pub label: String,
}

impl Edge {
	pub fn new(
		id: impl Into<String>,
		source: impl Into<String>,
		target: impl Into<String>,
		label: impl Into<String>,
	) -> Self {
		Self {
			id: id.into(),
			source: source.into(),
			target: target.into(),
			label: label.into(),
		}
	}
}

/// Unvalidated wire form of a [`Graph`].
#[derive(Deserialize)]
struct RawGraph {
	#[serde(default)]
	nodes: Vec<Node>,
	#[serde(default)]
	edges: Vec<Edge>,
}

impl TryFrom<RawGraph> for Graph {
	type Error = GraphError;

	fn try_from(raw: RawGraph) -> Result<Self, Self::Error> {
		Graph::new(raw.nodes, raw.edges)
	}
}

/// Ordered nodes and edges forming the unit passed to the renderer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGraph")]
pub struct Graph {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
}

impl Graph {
	/// Builds a graph, rejecting duplicate ids, dangling endpoints and self loops.
	pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, GraphError> {
		validate(&nodes, &edges)?;
		Ok(Self { nodes, edges })
	}

	/// Graph with no nodes and no edges.
	pub fn empty() -> Self {
		Self::default()
	}

	/// The built-in seed: a tiny `is_a` taxonomy of pets.
	pub fn seed() -> Self {
		let nodes = [
			("cat", "Cat"),
			("mammal", "Mammal"),
			("animal", "Animal"),
			("dog", "Dog"),
			("pet", "Pet"),
		]
		.into_iter()
		.map(|(id, label)| Node::new(id, label))
		.collect();

		let edges = [
			("cat", "mammal"),
			("mammal", "animal"),
			("dog", "mammal"),
			("cat", "pet"),
			("dog", "pet"),
		]
		.into_iter()
		.map(|(source, target)| Edge::new(format!("{source}-{target}"), source, target, "is_a"))
		.collect();

		Self::from_trusted(nodes, edges)
	}

	/// Wraps parts that are valid by construction.
	pub(crate) fn from_trusted(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
		debug_assert!(validate(&nodes, &edges).is_ok());
		Self { nodes, edges }
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Looks up a node by id.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.edges.is_empty()
	}
}

fn validate(nodes: &[Node], edges: &[Edge]) -> Result<(), GraphError> {
	let mut node_ids = HashSet::with_capacity(nodes.len());
	for node in nodes {
		if !node_ids.insert(node.id.as_str()) {
			return Err(GraphError::DuplicateNode(node.id.clone()));
		}
	}

	let mut edge_ids = HashSet::with_capacity(edges.len());
	for edge in edges {
		if !edge_ids.insert(edge.id.as_str()) {
			return Err(GraphError::DuplicateEdge(edge.id.clone()));
		}
		if edge.source == edge.target {
			return Err(GraphError::SelfLoop {
				edge: edge.id.clone(),
				node: edge.source.clone(),
			});
		}
		for endpoint in [&edge.source, &edge.target] {
			if !node_ids.contains(endpoint.as_str()) {
				return Err(GraphError::UnknownEndpoint {
					edge: edge.id.clone(),
					node: endpoint.clone(),
				});
			}
		}
	}
	Ok(())
}
