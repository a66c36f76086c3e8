//! Engine lifecycle: waiting for the page, (re)initializing, and the two
//! user triggers.
//!
//! The manager owns the [`RenderEngine`] outright. Browser glue holds it behind
//! an `Rc<RefCell<_>>` and calls [`LifecycleManager::poll`] from a timer until
//! it reports [`Availability::Ready`] or [`Availability::GaveUp`].

use log::{debug, error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::components::force_graph::{Graph, Host, RandomGraphGenerator, RenderEngine};
use crate::config::PollConfig;
use crate::error::EngineError;

/// Where the availability poll stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Availability {
	/// Still checking; `attempt` checks have missed so far.
	Waiting { attempt: u32 },
	/// An engine instance is live.
	Ready,
	/// Stopped checking after `attempts` misses. Terminal.
	GaveUp { attempts: u32 },
}

impl Availability {
	pub fn is_settled(self) -> bool {
		!matches!(self, Availability::Waiting { .. })
	}
}

/// What a trigger ended up doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerOutcome {
	/// No engine existed, so the seed graph was rendered instead.
	Initialized,
	/// The live engine now shows the new graph.
	Updated,
	/// Nothing changed. The cause has been logged.
	Failed,
}

pub struct LifecycleManager<H: Host> {
	engine: RenderEngine<H>,
	generator: RandomGraphGenerator,
	seed: Graph,
	poll: PollConfig,
	availability: Availability,
	rng: StdRng,
}

impl<H: Host> LifecycleManager<H> {
	pub fn new(
		engine: RenderEngine<H>,
		generator: RandomGraphGenerator,
		seed: Graph,
		poll: PollConfig,
	) -> Self {
		Self::with_rng(engine, generator, seed, poll, StdRng::from_entropy())
	}

	/// Like [`new`](Self::new) with a caller-supplied random source.
	pub fn with_rng(
		engine: RenderEngine<H>,
		generator: RandomGraphGenerator,
		seed: Graph,
		poll: PollConfig,
		rng: StdRng,
	) -> Self {
		Self {
			engine,
			generator,
			seed,
			poll,
			availability: Availability::Waiting { attempt: 0 },
			rng,
		}
	}

	pub fn engine(&self) -> &RenderEngine<H> {
		&self.engine
	}

	pub fn engine_mut(&mut self) -> &mut RenderEngine<H> {
		&mut self.engine
	}

	pub fn availability(&self) -> Availability {
		self.availability
	}

	/// Runs one availability check, initializing the engine once the page is
	/// usable.
	pub fn poll(&mut self) -> Availability {
		if self.availability.is_settled() {
			return self.availability;
		}
		if self.engine.is_ready() {
			self.availability = Availability::Ready;
			return self.availability;
		}

		let result = match self.engine.host().check_available() {
			Ok(()) => self.reinitialize(),
			Err(err) => Err(err),
		};

		let attempt = match self.availability {
			Availability::Waiting { attempt } => attempt + 1,
			_ => 1,
		};
		self.availability = match result {
			Ok(()) => {
				info!("graph-playground: engine available after {attempt} checks");
				Availability::Ready
			}
			Err(err) if attempt >= self.poll.max_attempts => {
				error!("graph-playground: giving up after {attempt} checks: {err}");
				Availability::GaveUp { attempts: attempt }
			}
			Err(err) => {
				debug!("graph-playground: check {attempt} missed: {err}");
				Availability::Waiting { attempt }
			}
		};
		self.availability
	}

	/// Tears down any live instance and renders the seed graph in a fresh one.
	/// The live instance survives if the container is gone.
	pub fn reinitialize(&mut self) -> Result<(), EngineError> {
		self.engine.init(self.seed.clone())
	}

	/// Renders the seed graph if no instance is live yet.
	///
	/// Returns `Some` when the trigger should stop here.
	fn init_lazily(&mut self, trigger: &str) -> Option<TriggerOutcome> {
		if self.engine.is_ready() {
			return None;
		}
		info!("graph-playground: {trigger} before init, rendering seed graph");
		Some(match self.reinitialize() {
			Ok(()) => {
				self.availability = Availability::Ready;
				TriggerOutcome::Initialized
			}
			Err(err) => {
				warn!("graph-playground: {trigger} failed: {err}");
				TriggerOutcome::Failed
			}
		})
	}

	/// Removes every node and edge from the view.
	pub fn clear(&mut self) -> TriggerOutcome {
		if let Some(outcome) = self.init_lazily("clear") {
			return outcome;
		}
		match self.engine.replace_elements(Graph::empty()) {
			Ok(()) => {
				info!("graph-playground: graph cleared");
				TriggerOutcome::Updated
			}
			Err(err) => {
				warn!("graph-playground: clear failed: {err}");
				TriggerOutcome::Failed
			}
		}
	}

	/// Replaces the view with a freshly generated random graph and lays it out.
	pub fn randomize(&mut self) -> TriggerOutcome {
		if let Some(outcome) = self.init_lazily("randomize") {
			return outcome;
		}
		let graph = self.generator.generate_with(&mut self.rng);
		let (nodes, edges) = (graph.node_count(), graph.edge_count());

		let result = self
			.engine
			.replace_elements(graph)
			.and_then(|()| self.engine.relayout());
		match result {
			Ok(()) => {
				info!("graph-playground: randomized to {nodes} nodes, {edges} edges");
				TriggerOutcome::Updated
			}
			Err(err) => {
				warn!("graph-playground: randomize failed: {err}");
				TriggerOutcome::Failed
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::rc::Rc;

	use super::*;
	use crate::components::force_graph::Theme;
	use crate::components::force_graph::engine::testing::{FakeHost, FakePage, engine};
	use crate::components::force_graph::scale::ScaledValues;
	use crate::config::{GeneratorConfig, LayoutConfig};

	fn manager_with(max_attempts: u32, seed: u64) -> (LifecycleManager<FakeHost>, Rc<FakePage>) {
		manager_generating(GeneratorConfig::default(), max_attempts, seed)
	}

	fn manager_generating(
		generator: GeneratorConfig,
		max_attempts: u32,
		seed: u64,
	) -> (LifecycleManager<FakeHost>, Rc<FakePage>) {
		let (engine, page) = engine();
		let manager = LifecycleManager::with_rng(
			engine,
			RandomGraphGenerator::new(generator),
			Graph::seed(),
			PollConfig {
				interval_ms: 50,
				max_attempts,
			},
			StdRng::seed_from_u64(seed),
		);
		(manager, page)
	}

	fn labels(manager: &LifecycleManager<FakeHost>) -> Vec<String> {
		let mut labels: Vec<_> = manager
			.engine()
			.rendered()
			.unwrap()
			.nodes()
			.iter()
			.map(|n| n.label.clone())
			.collect();
		labels.sort_unstable();
		labels
	}

	#[test]
	fn test_poll_renders_seed_when_available() {
		let (mut manager, page) = manager_with(10, 0);
		assert_eq!(manager.poll(), Availability::Ready);
		assert_eq!(labels(&manager), ["Animal", "Cat", "Dog", "Mammal", "Pet"]);
		let rendered = manager.engine().rendered().unwrap();
		assert_eq!(rendered.edge_count(), 5);
		assert!(rendered.edges().iter().all(|e| e.label == "is_a"));
		assert_eq!(page.live.get(), 1);

		// Later polls are no-ops.
		assert_eq!(manager.poll(), Availability::Ready);
		assert_eq!(page.binds.get(), 1);
	}

	#[test]
	fn test_poll_waits_for_backend() {
		let (mut manager, page) = manager_with(10, 0);
		page.backend.set(false);
		assert_eq!(manager.poll(), Availability::Waiting { attempt: 1 });
		assert_eq!(manager.poll(), Availability::Waiting { attempt: 2 });
		assert!(!manager.engine().is_ready());

		page.backend.set(true);
		assert_eq!(manager.poll(), Availability::Ready);
		assert!(manager.engine().is_ready());
	}

	#[test]
	fn test_poll_gives_up() {
		let (mut manager, page) = manager_with(3, 0);
		page.container.set(false);
		assert_eq!(manager.poll(), Availability::Waiting { attempt: 1 });
		assert_eq!(manager.poll(), Availability::Waiting { attempt: 2 });
		assert_eq!(manager.poll(), Availability::GaveUp { attempts: 3 });

		page.container.set(true);
		assert_eq!(manager.poll(), Availability::GaveUp { attempts: 3 });
		assert_eq!(page.binds.get(), 0);
	}

	#[test]
	fn test_reinitialize_keeps_single_instance() {
		let (mut manager, page) = manager_with(10, 0);
		manager.poll();
		manager.reinitialize().unwrap();
		manager.reinitialize().unwrap();
		assert_eq!(page.live.get(), 1);
		assert_eq!(page.binds.get(), 3);
	}

	#[test]
	fn test_clear_renders_nothing() {
		let (mut manager, _) = manager_with(10, 0);
		manager.poll();
		assert_eq!(manager.clear(), TriggerOutcome::Updated);
		manager.engine_mut().relayout().unwrap();

		assert!(manager.engine().rendered().unwrap().is_empty());
		let state = manager.engine().state().unwrap();
		let mut nodes = 0;
		state.graph.visit_nodes(|_| nodes += 1);
		assert_eq!(nodes, 0);
	}

	#[test]
	fn test_randomize_twice_shows_second_graph() {
		let (mut manager, _) = manager_with(10, 99);
		manager.poll();

		let generator = RandomGraphGenerator::new(GeneratorConfig::default());
		let mut replay = StdRng::seed_from_u64(99);
		let _first = generator.generate_with(&mut replay);
		let second = generator.generate_with(&mut replay);

		assert_eq!(manager.randomize(), TriggerOutcome::Updated);
		assert_eq!(manager.randomize(), TriggerOutcome::Updated);
		assert_eq!(manager.engine().rendered(), Some(&second));
	}

	/// Every node inside the padded viewport, and no two nodes closer in screen
	/// space than twice their drawn radius.
	fn assert_laid_out(manager: &LifecycleManager<FakeHost>, context: &str) {
		let engine = manager.engine();
		let state = engine.state().unwrap();
		let k = state.transform.k;
		let radius =
			ScaledValues::new(engine.scale(), k).node_radius * Theme::default().node.size * k;
		let padding = LayoutConfig::default().padding;

		let mut points = Vec::new();
		state
			.graph
			.visit_nodes(|node| points.push(state.graph_to_screen(node.x() as f64, node.y() as f64)));
		assert_eq!(points.len(), engine.rendered().unwrap().node_count());

		for &(sx, sy) in &points {
			assert!(sx >= padding && sx <= state.width - padding, "{context}: x = {sx}");
			assert!(sy >= padding && sy <= state.height - padding, "{context}: y = {sy}");
		}
		for (i, a) in points.iter().enumerate() {
			for b in &points[i + 1..] {
				let dist = ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt();
				assert!(
					dist >= 2.0 * radius,
					"{context}: nodes {dist}px apart, drawn radius {radius}px"
				);
			}
		}
	}

	#[test]
	fn test_randomized_graphs_are_laid_out_without_overlap() {
		for seed in 0..40 {
			let (mut manager, _) = manager_with(10, seed);
			manager.poll();
			for round in 0..3 {
				assert_eq!(manager.randomize(), TriggerOutcome::Updated);
				assert_laid_out(&manager, &format!("seed {seed}, round {round}"));
			}
		}
	}

	#[test]
	fn test_dense_randomized_graphs_do_not_overlap() {
		let dense = GeneratorConfig {
			min_nodes: 10,
			max_nodes: 10,
			min_out_degree: 3,
			max_out_degree: 3,
			..GeneratorConfig::default()
		};
		for seed in 0..40 {
			let (mut manager, _) = manager_generating(dense.clone(), 10, seed);
			manager.poll();
			assert_eq!(manager.randomize(), TriggerOutcome::Updated);
			assert_eq!(manager.engine().rendered().unwrap().edge_count(), 30);
			assert_laid_out(&manager, &format!("dense, seed {seed}"));
		}
	}

	#[test]
	fn test_trigger_before_init_renders_seed() {
		let (mut manager, page) = manager_with(10, 0);
		assert_eq!(manager.randomize(), TriggerOutcome::Initialized);
		assert_eq!(manager.engine().rendered(), Some(&Graph::seed()));
		assert_eq!(manager.availability(), Availability::Ready);
		assert_eq!(page.live.get(), 1);

		let (mut manager, _) = manager_with(10, 0);
		assert_eq!(manager.clear(), TriggerOutcome::Initialized);
		assert_eq!(manager.engine().rendered(), Some(&Graph::seed()));
	}

	#[test]
	fn test_missing_container_keeps_previous_render() {
		let (mut manager, page) = manager_with(10, 0);
		manager.poll();
		page.container.set(false);

		assert_eq!(manager.randomize(), TriggerOutcome::Failed);
		assert_eq!(manager.clear(), TriggerOutcome::Failed);
		assert_eq!(manager.engine().rendered(), Some(&Graph::seed()));
		assert_eq!(page.live.get(), 1);
	}

	#[test]
	fn test_trigger_without_container_fails() {
		let (mut manager, page) = manager_with(10, 0);
		page.container.set(false);
		assert_eq!(manager.clear(), TriggerOutcome::Failed);
		assert!(!manager.engine().is_ready());
	}
}
