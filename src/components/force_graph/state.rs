//! Graph simulation state and interaction tracking.
//!
//! Wraps the `force_graph` physics simulation with the graph it was built
//! from, the view transform for pan/zoom, pointer interaction, and hover
//! highlight intensities.

use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use rand::Rng;

use super::scale::{ScaleConfig, ScaledValues};
use super::theme::{Color, Theme};
use super::types::Graph;
use crate::config::LayoutConfig;

/// World-space margin around node centres when fitting, covers node radius and label start.
const FIT_MARGIN: f64 = 12.0;
const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 10.0;
/// Screen-space gap kept between the rims of two nodes at rest.
const NODE_GAP: f64 = 4.0;
const SEPARATION_ROUNDS: usize = 200;
const FIT_ROUNDS: usize = 8;

fn simulation_parameters() -> SimulationParameters {
	SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	}
}

/// Per-node display data attached to each simulated node.
#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub color: Color,
	/// Size multiplier from the node style rule.
	pub size: f64,
}

/// Per-edge display data attached to each simulated edge.
#[derive(Clone, Debug, Default)]
pub struct EdgeInfo {
	pub id: String,
	pub label: String,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0 by wheel zoom).
	pub k: f64,
}

impl ViewTransform {
	/// World origin at the centre of the viewport, no zoom.
	pub fn centered(width: f64, height: f64) -> Self {
		Self {
			x: width / 2.0,
			y: height / 2.0,
			k: 1.0,
		}
	}
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Hover highlight with per-node intensities that ease in and out.
///
/// The hovered node and its neighbours form the active set. Each frame their
/// intensity approaches 1.0 while every other node decays towards 0.0, both by
/// exponential smoothing, so switching hover targets cross-fades.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	pub hovered: Option<DefaultNodeIdx>,
	active: HashSet<DefaultNodeIdx>,
	intensity: HashMap<DefaultNodeIdx, f64>,
	peak: f64,
}

impl HighlightState {
	const FADE_IN_SPEED: f64 = 6.0;
	const FADE_OUT_SPEED: f64 = 4.0;

	pub fn set_hover(
		&mut self,
		node: Option<DefaultNodeIdx>,
		edges: &[(DefaultNodeIdx, DefaultNodeIdx)],
	) {
		if self.hovered == node {
			return;
		}
		self.hovered = node;
		self.active.clear();

		if let Some(idx) = node {
			self.active.insert(idx);
			for &(src, tgt) in edges {
				if src == idx {
					self.active.insert(tgt);
				} else if tgt == idx {
					self.active.insert(src);
				}
			}
		}
	}

	pub fn tick(&mut self, dt: f64) {
		let rise = 1.0 - (-Self::FADE_IN_SPEED * dt).exp();
		let decay = (-Self::FADE_OUT_SPEED * dt).exp();

		for &idx in &self.active {
			let value = self.intensity.entry(idx).or_insert(0.0);
			*value += (1.0 - *value) * rise;
		}

		let mut peak: f64 = 0.0;
		self.intensity.retain(|idx, value| {
			if !self.active.contains(idx) {
				*value *= decay;
			}
			peak = peak.max(*value);
			*value > 0.005
		});
		self.peak = peak;
	}

	pub fn node(&self, idx: DefaultNodeIdx) -> f64 {
		self.intensity.get(&idx).copied().unwrap_or(0.0)
	}

	/// Geometric mean of the endpoint intensities.
	pub fn edge(&self, a: DefaultNodeIdx, b: DefaultNodeIdx) -> f64 {
		(self.node(a) * self.node(b)).sqrt()
	}

	/// Strongest intensity of any node, used to dim everything else.
	pub fn peak(&self) -> f64 {
		self.peak
	}
}

/// Everything the engine knows about one bound graph.
///
/// Owns the [`Graph`] currently on screen alongside the physics simulation
/// built from it. The graph is only ever swapped wholesale through
/// [`ForceGraphState::replace_elements`].
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, EdgeInfo>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub highlight: HighlightState,
	pub width: f64,
	pub height: f64,
	elements: Graph,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
	layout: LayoutConfig,
	settle_frames: u32,
}

impl ForceGraphState {
	pub fn new(width: f64, height: f64, layout: LayoutConfig) -> Self {
		Self {
			graph: ForceGraph::new(simulation_parameters()),
			transform: ViewTransform::centered(width, height),
			drag: DragState::default(),
			pan: PanState::default(),
			highlight: HighlightState::default(),
			width,
			height,
			elements: Graph::empty(),
			edges: Vec::new(),
			layout,
			settle_frames: 0,
		}
	}

	/// The graph currently bound to this state.
	pub fn elements(&self) -> &Graph {
		&self.elements
	}

	/// Drops every simulated node and edge and loads `graph` in their place.
	///
	/// Nodes go in first so every edge finds both endpoints. Positions start on
	/// a ring; call [`relayout`](Self::relayout) to settle them.
	pub fn replace_elements(&mut self, graph: Graph, theme: &Theme) {
		let mut sim = ForceGraph::new(simulation_parameters());
		let mut id_to_idx = HashMap::with_capacity(graph.node_count());
		let count = graph.node_count();

		for (i, node) in graph.nodes().iter().enumerate() {
			let (x, y) = ring_position(i, count, self.layout.spread);
			let idx = sim.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					color: theme.palette.get(i),
					size: theme.node.size,
				},
			});
			id_to_idx.insert(node.id.as_str(), idx);
		}

		let mut edges = Vec::with_capacity(graph.edge_count());
		for edge in graph.edges() {
			if let (Some(&src), Some(&tgt)) = (
				id_to_idx.get(edge.source.as_str()),
				id_to_idx.get(edge.target.as_str()),
			) {
				sim.add_edge(
					src,
					tgt,
					EdgeData {
						user_data: EdgeInfo {
							id: edge.id.clone(),
							label: edge.label.clone(),
						},
					},
				);
				edges.push((src, tgt));
			}
		}
		drop(id_to_idx);

		self.graph = sim;
		self.edges = edges;
		self.elements = graph;
		self.highlight = HighlightState::default();
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.settle_frames = 0;
	}

	/// Re-runs the force layout from scattered positions, then fits the view.
	///
	/// Afterwards every node lies inside the padded viewport and no two nodes,
	/// drawn at the sizes `config` gives for the fitted zoom, overlap.
	pub fn relayout(&mut self, config: &ScaleConfig) {
		self.relayout_with(&mut rand::thread_rng(), config);
	}

	pub fn relayout_with<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &ScaleConfig) {
		let count = self.elements.node_count();
		let spread = self.layout.spread.abs();
		let jitter = spread * 0.15;

		let mut i = 0;
		self.graph.visit_nodes_mut(|node| {
			let (x, y) = ring_position(i, count, spread);
			node.data.x = (x + rng.gen_range(-jitter..=jitter)) as f32;
			node.data.y = (y + rng.gen_range(-jitter..=jitter)) as f32;
			node.data.is_anchor = false;
			i += 1;
		});

		for _ in 0..self.layout.iterations {
			self.graph.update(self.layout.time_step);
		}
		self.settle_frames = 0;
		self.fit_separated(config);
	}

	/// Alternates fitting and separation until separation no longer moves
	/// anything. Always ends on a separation pass.
	fn fit_separated(&mut self, config: &ScaleConfig) {
		for _ in 0..FIT_ROUNDS {
			self.fit();
			if !self.separate(config) {
				return;
			}
		}
	}

	/// Pushes apart nodes whose drawn discs come closer than [`NODE_GAP`] at the
	/// current zoom, keeping each node inside the padded viewport. Works in
	/// screen space and leaves the transform alone. Returns whether any node
	/// moved.
	pub fn separate(&mut self, config: &ScaleConfig) -> bool {
		let t = self.transform.clone();
		let radius = ScaledValues::new(config, t.k).node_radius * t.k;
		let mut discs = Vec::new();
		self.graph.visit_nodes(|node| {
			discs.push((
				node.index(),
				node.x() as f64 * t.k + t.x,
				node.y() as f64 * t.k + t.y,
				radius * node.data.user_data.size,
			));
		});

		// Inset by a pixel so f32 world positions still land inside.
		let padding = self.layout.padding.max(0.0) + 1.0;
		let clamp_axis = |v: f64, extent: f64| {
			let (lo, hi) = (padding, extent - padding);
			if hi < lo { extent / 2.0 } else { v.clamp(lo, hi) }
		};

		let mut moved = false;
		for _ in 0..SEPARATION_ROUNDS {
			let mut pushed = false;
			for i in 0..discs.len() {
				for j in i + 1..discs.len() {
					let (_, xi, yi, ri) = discs[i];
					let (_, xj, yj, rj) = discs[j];
					let min = ri + rj + NODE_GAP;
					let (dx, dy) = (xj - xi, yj - yi);
					let dist = (dx * dx + dy * dy).sqrt();
					if dist >= min {
						continue;
					}
					let (ux, uy) = if dist > 1e-6 {
						(dx / dist, dy / dist)
					} else {
						// Coincident nodes: spread along a golden-angle direction.
						let angle = (i * discs.len() + j) as f64 * 2.399_963;
						(angle.cos(), angle.sin())
					};
					let push = (min - dist) / 2.0 + 0.01;
					discs[i].1 = clamp_axis(xi - ux * push, self.width);
					discs[i].2 = clamp_axis(yi - uy * push, self.height);
					discs[j].1 = clamp_axis(xj + ux * push, self.width);
					discs[j].2 = clamp_axis(yj + uy * push, self.height);
					pushed = true;
				}
			}
			if !pushed {
				break;
			}
			moved = true;
		}

		if moved {
			let world: HashMap<DefaultNodeIdx, (f32, f32)> = discs
				.iter()
				.map(|&(idx, sx, sy, _)| (idx, (((sx - t.x) / t.k) as f32, ((sy - t.y) / t.k) as f32)))
				.collect();
			self.graph.visit_nodes_mut(|node| {
				if let Some(&(x, y)) = world.get(&node.index()) {
					node.data.x = x;
					node.data.y = y;
				}
			});
		}
		moved
	}

	/// Zooms and centres the view so every node sits inside the padded viewport.
	pub fn fit(&mut self) {
		let Some((min_x, min_y, max_x, max_y)) = self.bounds() else {
			self.transform = ViewTransform::centered(self.width, self.height);
			return;
		};
		let (min_x, min_y) = (min_x - FIT_MARGIN, min_y - FIT_MARGIN);
		let (max_x, max_y) = (max_x + FIT_MARGIN, max_y + FIT_MARGIN);

		let padding = self.layout.padding.max(0.0);
		let available_w = (self.width - 2.0 * padding).max(1.0);
		let available_h = (self.height - 2.0 * padding).max(1.0);
		let k = (available_w / (max_x - min_x))
			.min(available_h / (max_y - min_y))
			.min(self.layout.max_zoom)
			.max(f64::EPSILON);

		let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
	}

	/// World-space bounding box of node centres as `(min_x, min_y, max_x, max_y)`.
	pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		self.graph.visit_nodes(|node| {
			let (x, y) = (node.x() as f64, node.y() as f64);
			bounds = Some(match bounds {
				None => (x, y, x, y),
				Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
			});
		});
		bounds
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(
			gx * self.transform.k + self.transform.x,
			gy * self.transform.k + self.transform.y,
		)
	}

	pub fn node_at_position(
		&self,
		sx: f64,
		sy: f64,
		config: &ScaleConfig,
	) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(config, self.transform.k);
		let mut found = None;
		let mut best = f64::INFINITY;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist < scale.hit_radius * node.data.user_data.size && dist < best {
				best = dist;
				found = Some(node.index());
			}
		});
		found
	}

	/// Starts dragging the node under the pointer, or panning if there is none.
	pub fn pointer_down(&mut self, x: f64, y: f64, config: &ScaleConfig) {
		match self.node_at_position(x, y, config) {
			Some(idx) => {
				let mut origin = (0.0, 0.0);
				self.graph.visit_nodes(|node| {
					if node.index() == idx {
						origin = (node.x(), node.y());
					}
				});
				self.drag = DragState {
					active: true,
					node_idx: Some(idx),
					start_x: x,
					start_y: y,
					node_start_x: origin.0,
					node_start_y: origin.1,
				};
			}
			None => {
				self.pan = PanState {
					active: true,
					start_x: x,
					start_y: y,
					transform_start_x: self.transform.x,
					transform_start_y: self.transform.y,
				};
			}
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64, config: &ScaleConfig) {
		if self.drag.active {
			let Some(idx) = self.drag.node_idx else {
				return;
			};
			let (dx, dy) = (
				(x - self.drag.start_x) / self.transform.k,
				(y - self.drag.start_y) / self.transform.k,
			);
			let (nx, ny) = (
				self.drag.node_start_x + dx as f32,
				self.drag.node_start_y + dy as f32,
			);
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.x = nx;
					node.data.y = ny;
					node.data.is_anchor = true;
				}
			});
			self.settle_frames = self.layout.settle_frames;
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		} else {
			let hovered = self.node_at_position(x, y, config);
			self.set_hover(hovered);
		}
	}

	/// Ends a drag or pan. A dragged node stays pinned where it was dropped.
	pub fn pointer_up(&mut self) {
		if self.drag.active {
			self.settle_frames = self.layout.settle_frames;
		}
		self.drag = DragState::default();
		self.pan = PanState::default();
	}

	pub fn pointer_leave(&mut self) {
		self.pointer_up();
		self.set_hover(None);
	}

	/// Zooms by one wheel notch, keeping the point under the cursor fixed.
	pub fn zoom_at(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		self.highlight.set_hover(node, &self.edges);
	}

	/// Whether the physics simulation is still advancing on frame ticks.
	pub fn is_settling(&self) -> bool {
		self.drag.active || self.settle_frames > 0
	}

	/// Advances one animation frame. Physics only runs while a drag is
	/// active or settling, so a laid-out graph stays where `fit` put it.
	pub fn tick(&mut self, dt: f32) {
		if self.is_settling() {
			self.graph.update(dt);
			self.settle_frames = self.settle_frames.saturating_sub(1);
		}
		self.highlight.tick(dt as f64);
	}

	pub fn resize(&mut self, width: f64, height: f64, config: &ScaleConfig) {
		self.width = width;
		self.height = height;
		self.fit_separated(config);
	}
}

fn ring_position(i: usize, count: usize, radius: f64) -> (f64, f64) {
	let angle = i as f64 * TAU / count.max(1) as f64;
	(radius * angle.cos(), radius * angle.sin())
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;
	use crate::components::force_graph::generator::RandomGraphGenerator;
	use crate::components::force_graph::types::{Edge, Node};
	use crate::config::GeneratorConfig;

	const W: f64 = 800.0;
	const H: f64 = 600.0;

	fn state_with(graph: Graph) -> ForceGraphState {
		let mut state = ForceGraphState::new(W, H, LayoutConfig::default());
		state.replace_elements(graph, &Theme::default());
		state
	}

	fn positions(state: &ForceGraphState) -> Vec<(f64, f64)> {
		let mut out = Vec::new();
		state
			.graph
			.visit_nodes(|node| out.push((node.x() as f64, node.y() as f64)));
		out
	}

	fn counts(state: &ForceGraphState) -> (usize, usize) {
		let (mut nodes, mut edges) = (0, 0);
		state.graph.visit_nodes(|_| nodes += 1);
		state.graph.visit_edges(|_, _, _| edges += 1);
		(nodes, edges)
	}

	#[test]
	fn test_replace_elements_loads_graph() {
		let state = state_with(Graph::seed());
		assert_eq!(counts(&state), (5, 5));
		assert_eq!(state.elements(), &Graph::seed());

		let mut labels = Vec::new();
		state
			.graph
			.visit_edges(|_, _, edge| labels.push(edge.user_data.label.clone()));
		assert!(labels.iter().all(|l| l == "is_a"));
	}

	#[test]
	fn test_replace_elements_discards_previous() {
		let mut state = state_with(Graph::seed());
		let other = Graph::new(
			vec![Node::new("x", "X"), Node::new("y", "Y")],
			vec![Edge::new("xy", "x", "y", "knows")],
		)
		.unwrap();
		state.replace_elements(other.clone(), &Theme::default());

		assert_eq!(counts(&state), (2, 1));
		let mut ids = Vec::new();
		state
			.graph
			.visit_nodes(|node| ids.push(node.data.user_data.id.clone()));
		assert_eq!(ids, ["x", "y"]);
		assert_eq!(state.elements(), &other);
	}

	/// Asserts every node sits inside the padded viewport and no two drawn
	/// nodes overlap at the current zoom.
	fn assert_spread_out(state: &ForceGraphState, context: &str) {
		let k = state.transform.k;
		let radius = ScaledValues::new(&ScaleConfig::default(), k).node_radius
			* Theme::default().node.size
			* k;
		let padding = LayoutConfig::default().padding;

		let points: Vec<_> = positions(state)
			.into_iter()
			.map(|(x, y)| state.graph_to_screen(x, y))
			.collect();
		for &(sx, sy) in &points {
			assert!(sx >= padding && sx <= W - padding, "{context}: x = {sx}");
			assert!(sy >= padding && sy <= H - padding, "{context}: y = {sy}");
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
	fn test_relayout_fits_viewport_without_overlap() {
		let config = ScaleConfig::default();
		let mut state = state_with(Graph::seed());
		for seed in 0..50 {
			state.relayout_with(&mut StdRng::seed_from_u64(seed), &config);
			assert_spread_out(&state, &format!("seed graph, rng {seed}"));
		}
	}

	#[test]
	fn test_dense_graphs_do_not_overlap() {
		let config = ScaleConfig::default();
		let generator = RandomGraphGenerator::new(GeneratorConfig {
			min_nodes: 10,
			max_nodes: 10,
			min_out_degree: 3,
			max_out_degree: 3,
			..GeneratorConfig::default()
		});
		for seed in 0..50 {
			let mut rng = StdRng::seed_from_u64(seed);
			let mut state = state_with(generator.generate_with(&mut rng));
			state.relayout_with(&mut rng, &config);
			assert_spread_out(&state, &format!("dense graph, rng {seed}"));
		}
	}

	#[test]
	fn test_separate_splits_coincident_nodes() {
		let config = ScaleConfig::default();
		let mut state = state_with(Graph::seed());
		state.graph.visit_nodes_mut(|node| {
			node.data.x = 0.0;
			node.data.y = 0.0;
		});
		state.fit();
		assert!(state.separate(&config));
		assert_spread_out(&state, "coincident");
	}

	#[test]
	fn test_resize_keeps_nodes_apart() {
		let config = ScaleConfig::default();
		let mut state = state_with(Graph::seed());
		state.relayout_with(&mut StdRng::seed_from_u64(3), &config);
		state.resize(200.0, 150.0, &config);
		state.resize(W, H, &config);
		assert_spread_out(&state, "after resize");
	}

	#[test]
	fn test_relayout_keeps_elements() {
		let mut state = state_with(Graph::seed());
		state.relayout_with(&mut StdRng::seed_from_u64(1), &ScaleConfig::default());
		state.relayout_with(&mut StdRng::seed_from_u64(2), &ScaleConfig::default());
		assert_eq!(state.elements(), &Graph::seed());
		assert_eq!(counts(&state), (5, 5));
	}

	#[test]
	fn test_clear_then_relayout_is_empty() {
		let mut state = state_with(Graph::seed());
		state.replace_elements(Graph::empty(), &Theme::default());
		state.relayout(&ScaleConfig::default());

		assert_eq!(counts(&state), (0, 0));
		assert!(state.elements().is_empty());
		assert_eq!(state.transform, ViewTransform::centered(W, H));
	}

	#[test]
	fn test_fit_respects_max_zoom() {
		let single = Graph::new(vec![Node::new("solo", "Solo")], vec![]).unwrap();
		let mut state = state_with(single);
		state.relayout_with(&mut StdRng::seed_from_u64(0), &ScaleConfig::default());
		assert_eq!(state.transform.k, LayoutConfig::default().max_zoom);
	}

	#[test]
	fn test_zoom_keeps_cursor_anchor() {
		let mut state = state_with(Graph::seed());
		let before = state.screen_to_graph(100.0, 50.0);
		state.zoom_at(100.0, 50.0, -1.0);
		let after = state.screen_to_graph(100.0, 50.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);

		for _ in 0..100 {
			state.zoom_at(0.0, 0.0, 1.0);
		}
		assert_eq!(state.transform.k, MIN_ZOOM);
	}

	#[test]
	fn test_background_drag_pans() {
		let mut state = state_with(Graph::seed());
		let config = ScaleConfig::default();
		// Far corner, away from every node.
		state.pointer_down(1.0, 1.0, &config);
		assert!(state.pan.active);
		state.pointer_move(41.0, 21.0, &config);
		assert_eq!(state.transform.x, W / 2.0 + 40.0);
		assert_eq!(state.transform.y, H / 2.0 + 20.0);
		state.pointer_up();
		assert!(!state.pan.active);
	}

	#[test]
	fn test_node_drag_pins_node() {
		let mut state = state_with(Graph::seed());
		state.relayout_with(&mut StdRng::seed_from_u64(7), &ScaleConfig::default());
		let config = ScaleConfig::default();

		let (x, y) = positions(&state)[0];
		let (sx, sy) = state.graph_to_screen(x, y);
		state.pointer_down(sx, sy, &config);
		assert!(state.drag.active);
		let idx = state.drag.node_idx.unwrap();

		state.pointer_move(sx + 30.0, sy, &config);
		state.pointer_up();
		assert!(state.is_settling());

		let k = state.transform.k;
		state.graph.visit_nodes(|node| {
			if node.index() == idx {
				assert!(node.data.is_anchor);
				assert!((node.x() as f64 - (x + 30.0 / k)).abs() < 1e-3);
			}
		});
	}

	#[test]
	fn test_hover_highlights_neighbours_then_fades() {
		let mut state = state_with(Graph::seed());
		let mut cat = None;
		let mut animal = None;
		state.graph.visit_nodes(|node| match node.data.user_data.id.as_str() {
			"cat" => cat = Some(node.index()),
			"animal" => animal = Some(node.index()),
			_ => {}
		});
		let (cat, animal) = (cat.unwrap(), animal.unwrap());

		state.set_hover(Some(cat));
		for _ in 0..60 {
			state.tick(0.016);
		}
		assert!(state.highlight.node(cat) > 0.9);
		// Animal is two hops away from Cat.
		assert_eq!(state.highlight.node(animal), 0.0);

		state.set_hover(None);
		for _ in 0..240 {
			state.tick(0.016);
		}
		assert_eq!(state.highlight.node(cat), 0.0);
		assert_eq!(state.highlight.peak(), 0.0);
	}
}
