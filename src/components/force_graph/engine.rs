//! The render engine: one live binding between a graph and its container.
//!
//! ```text
//! Uninitialized --init--> Ready --replace_elements / relayout--> Ready
//!       ^                   |
//!       +-----destroy-------+
//! ```
//!
//! The engine talks to the page through two seams. A [`Host`] locates the
//! container and creates a drawing [`Surface`] inside it; the surface draws a
//! [`ForceGraphState`]. The browser implementation lives in the component
//! module, tests use an in-memory host.

use log::{debug, info, warn};

use super::scale::ScaleConfig;
use super::state::ForceGraphState;
use super::theme::Theme;
use super::types::Graph;
use crate::config::LayoutConfig;
use crate::error::EngineError;

/// A drawing target bound inside the container.
///
/// Dropping the surface releases the binding: its drawing area, listeners and
/// any scheduled frames.
pub trait Surface {
	/// Current drawable size in pixels.
	fn size(&self) -> (f64, f64);

	/// Paints the whole state.
	fn draw(&mut self, state: &ForceGraphState, scale: &ScaleConfig, theme: &Theme);
}

/// Locates the container and binds surfaces to it.
pub trait Host {
	type Surface: Surface;

	/// Id of the container element.
	fn container_id(&self) -> &str;

	/// Checks that the drawing backend and the container are both usable.
	fn check_available(&self) -> Result<(), EngineError>;

	fn has_container(&self) -> bool;

	/// Creates a new surface inside the container.
	fn bind(&self) -> Result<Self::Surface, EngineError>;
}

struct Instance<S> {
	surface: S,
	state: ForceGraphState,
}

/// Owns at most one live engine instance.
pub struct RenderEngine<H: Host> {
	host: H,
	instance: Option<Instance<H::Surface>>,
	scale: ScaleConfig,
	theme: Theme,
	layout: LayoutConfig,
}

impl<H: Host> RenderEngine<H> {
	pub fn new(host: H, theme: Theme, layout: LayoutConfig) -> Self {
		Self {
			host,
			instance: None,
			scale: ScaleConfig::default(),
			theme,
			layout,
		}
	}

	pub fn host(&self) -> &H {
		&self.host
	}

	pub fn scale(&self) -> &ScaleConfig {
		&self.scale
	}

	pub fn is_ready(&self) -> bool {
		self.instance.is_some()
	}

	/// Binds to the container, loads `seed`, lays it out and draws it.
	///
	/// A missing container or an unusable backend leaves any existing instance
	/// untouched. Otherwise an existing instance is destroyed before the new
	/// binding is created.
	pub fn init(&mut self, seed: Graph) -> Result<(), EngineError> {
		let preflight = if self.host.has_container() {
			self.host.check_available()
		} else {
			Err(EngineError::MissingContainer(self.host.container_id().to_owned()))
		};
		if let Err(err) = preflight {
			warn!("graph-playground: init aborted: {err}");
			return Err(err);
		}
		if self.destroy() {
			debug!("graph-playground: replaced live engine instance");
		}

		let mut surface = self.host.bind().inspect_err(|err| {
			warn!("graph-playground: init aborted: {err}");
		})?;
		let (width, height) = surface.size();
		let mut state = ForceGraphState::new(width, height, self.layout.clone());
		state.replace_elements(seed, &self.theme);
		state.relayout(&self.scale);
		surface.draw(&state, &self.scale, &self.theme);

		info!(
			"graph-playground: engine ready with {} nodes, {} edges ({}x{})",
			state.elements().node_count(),
			state.elements().edge_count(),
			width,
			height
		);
		self.instance = Some(Instance { surface, state });
		Ok(())
	}

	/// Swaps the rendered graph for `graph` without re-running the layout.
	pub fn replace_elements(&mut self, graph: Graph) -> Result<(), EngineError> {
		let Some(instance) = self.instance.as_mut() else {
			warn!("graph-playground: replace_elements on uninitialized engine");
			return Err(EngineError::NotInitialized);
		};
		if !self.host.has_container() {
			let err = EngineError::MissingContainer(self.host.container_id().to_owned());
			warn!("graph-playground: replace_elements aborted: {err}");
			return Err(err);
		}

		instance.state.replace_elements(graph, &self.theme);
		instance.surface.draw(&instance.state, &self.scale, &self.theme);
		Ok(())
	}

	/// Recomputes node positions and fits them to the container.
	pub fn relayout(&mut self) -> Result<(), EngineError> {
		let instance = self.instance.as_mut().ok_or(EngineError::NotInitialized)?;
		instance.state.relayout(&self.scale);
		instance.surface.draw(&instance.state, &self.scale, &self.theme);
		Ok(())
	}

	/// Releases the live instance, if any. Returns whether one existed.
	pub fn destroy(&mut self) -> bool {
		match self.instance.take() {
			Some(instance) => {
				drop(instance);
				info!("graph-playground: engine instance destroyed");
				true
			}
			None => false,
		}
	}

	/// The graph currently rendered.
	pub fn rendered(&self) -> Option<&Graph> {
		self.instance.as_ref().map(|i| i.state.elements())
	}

	pub fn state(&self) -> Option<&ForceGraphState> {
		self.instance.as_ref().map(|i| &i.state)
	}

	pub fn surface_mut(&mut self) -> Option<&mut H::Surface> {
		self.instance.as_mut().map(|i| &mut i.surface)
	}

	/// Applies `f` to the live state and redraws.
	fn update(&mut self, f: impl FnOnce(&mut ForceGraphState, &ScaleConfig)) {
		if let Some(instance) = self.instance.as_mut() {
			f(&mut instance.state, &self.scale);
			instance.surface.draw(&instance.state, &self.scale, &self.theme);
		}
	}

	/// Advances animations by `dt` seconds and redraws.
	pub fn frame(&mut self, dt: f32) {
		self.update(|state, _| state.tick(dt));
	}

	/// Picks up a new surface size and refits the view.
	pub fn resize(&mut self) {
		if let Some(instance) = self.instance.as_mut() {
			let (width, height) = instance.surface.size();
			instance.state.resize(width, height, &self.scale);
			instance.surface.draw(&instance.state, &self.scale, &self.theme);
		}
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		self.update(|state, scale| state.pointer_down(x, y, scale));
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		self.update(|state, scale| state.pointer_move(x, y, scale));
	}

	pub fn pointer_up(&mut self) {
		self.update(|state, _| state.pointer_up());
	}

	pub fn pointer_leave(&mut self) {
		self.update(|state, _| state.pointer_leave());
	}

	pub fn zoom_at(&mut self, x: f64, y: f64, delta_y: f64) {
		self.update(|state, _| state.zoom_at(x, y, delta_y));
	}
}


#[cfg(test)]
mod tests {
	use super::testing::engine;
	use super::*;

	#[test]
	fn test_init_renders_seed() {
		let (mut engine, page) = engine();
		assert!(!engine.is_ready());
		engine.init(Graph::seed()).unwrap();

		assert!(engine.is_ready());
		let rendered = engine.rendered().unwrap();
		let mut labels: Vec<_> = rendered.nodes().iter().map(|n| n.label.as_str()).collect();
		labels.sort_unstable();
		assert_eq!(labels, ["Animal", "Cat", "Dog", "Mammal", "Pet"]);
		assert_eq!(rendered.edge_count(), 5);
		assert!(rendered.edges().iter().all(|e| e.label == "is_a"));
		assert_eq!(page.live.get(), 1);
		assert!(page.draws.get() >= 1);
	}

	#[test]
	fn test_init_destroy_init_leaves_one_instance() {
		let (mut engine, page) = engine();
		engine.init(Graph::seed()).unwrap();
		assert!(engine.destroy());
		assert!(!engine.is_ready());
		assert_eq!(page.live.get(), 0);

		engine.init(Graph::seed()).unwrap();
		assert_eq!(page.live.get(), 1);
		assert_eq!(page.binds.get(), 2);
	}

	#[test]
	fn test_init_twice_replaces_instance() {
		let (mut engine, page) = engine();
		engine.init(Graph::seed()).unwrap();
		engine.init(Graph::empty()).unwrap();
		assert_eq!(page.live.get(), 1);
		assert!(engine.rendered().unwrap().is_empty());
	}

	#[test]
	fn test_missing_container_keeps_last_render() {
		let (mut engine, page) = engine();
		engine.init(Graph::seed()).unwrap();
		page.container.set(false);

		assert_eq!(
			engine.replace_elements(Graph::empty()),
			Err(EngineError::MissingContainer("graph-container".into()))
		);
		assert_eq!(
			engine.init(Graph::empty()),
			Err(EngineError::MissingContainer("graph-container".into()))
		);
		assert_eq!(engine.rendered(), Some(&Graph::seed()));
		assert_eq!(page.live.get(), 1);
	}

	#[test]
	fn test_unusable_backend_keeps_last_render() {
		let (mut engine, page) = engine();
		engine.init(Graph::seed()).unwrap();
		page.backend.set(false);

		assert!(matches!(
			engine.init(Graph::empty()),
			Err(EngineError::MissingDependency(_))
		));
		assert!(engine.is_ready());
		assert_eq!(engine.rendered(), Some(&Graph::seed()));
		assert_eq!(page.live.get(), 1);
		assert_eq!(page.binds.get(), 1);
	}

	#[test]
	fn test_operations_require_instance() {
		let (mut engine, _) = engine();
		assert_eq!(
			engine.replace_elements(Graph::seed()),
			Err(EngineError::NotInitialized)
		);
		assert_eq!(engine.relayout(), Err(EngineError::NotInitialized));
		assert!(!engine.destroy());
		assert!(engine.rendered().is_none());
	}

	#[test]
	fn test_clear_then_relayout_renders_nothing() {
		let (mut engine, _) = engine();
		engine.init(Graph::seed()).unwrap();
		engine.replace_elements(Graph::empty()).unwrap();
		engine.relayout().unwrap();

		let state = engine.state().unwrap();
		let (mut nodes, mut edges) = (0, 0);
		state.graph.visit_nodes(|_| nodes += 1);
		state.graph.visit_edges(|_, _, _| edges += 1);
		assert_eq!((nodes, edges), (0, 0));
		assert!(engine.rendered().unwrap().is_empty());
	}

	#[test]
	fn test_interaction_redraws_and_resize_refits() {
		let (mut engine, page) = engine();
		engine.frame(0.016);
		engine.resize();
		assert_eq!(page.draws.get(), 0);

		engine.init(Graph::seed()).unwrap();
		let fitted = engine.state().unwrap().transform.clone();
		let before = page.draws.get();

		// Background corner: pans instead of dragging a node.
		engine.pointer_down(1.0, 1.0);
		engine.pointer_move(41.0, 1.0);
		engine.pointer_up();
		engine.zoom_at(400.0, 300.0, -1.0);
		engine.frame(0.016);
		assert_ne!(engine.state().unwrap().transform, fitted);

		engine.resize();
		assert_eq!(page.draws.get(), before + 6);
		assert_eq!(engine.state().unwrap().transform, fitted);
	}

	#[test]
	fn test_replace_does_not_relayout() {
		let (mut engine, _) = engine();
		engine.init(Graph::seed()).unwrap();
		let fitted = engine.state().unwrap().transform.clone();
		engine.replace_elements(Graph::seed()).unwrap();
		assert_eq!(engine.state().unwrap().transform, fitted);
	}
}
