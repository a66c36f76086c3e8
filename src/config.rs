//! Runtime configuration.
//!
//! The host page may embed a JSON document in
//! `<script id="graph-config" type="application/json">`; any field it omits
//! falls back to the defaults below.

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
	/// Id of the element the canvas is mounted into.
	pub container_id: String,
	/// Id of the button that clears the graph.
	pub clear_button_id: String,
	/// Id of the button that generates a new random graph.
	pub randomize_button_id: String,
	/// Name of a theme preset (see [`Theme::by_name`](crate::components::force_graph::Theme::by_name)).
	pub theme: String,
	pub poll: PollConfig,
	pub layout: LayoutConfig,
	pub generator: GeneratorConfig,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			container_id: "graph-container".into(),
			clear_button_id: "clear".into(),
			randomize_button_id: "randomize".into(),
			theme: "default".into(),
			poll: PollConfig::default(),
			layout: LayoutConfig::default(),
			generator: GeneratorConfig::default(),
		}
	}
}

/// Availability polling before the first engine instance is created.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct PollConfig {
	/// Delay between two checks, in milliseconds.
	pub interval_ms: u32,
	/// Checks performed before giving up for good.
	pub max_attempts: u32,
}

impl Default for PollConfig {
	fn default() -> Self {
		Self {
			interval_ms: 50,
			max_attempts: 200,
		}
	}
}

/// Force layout and viewport fitting.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
	/// Screen-space margin kept free around the fitted graph, in pixels.
	pub padding: f64,
	/// Simulation steps run by a single relayout.
	pub iterations: usize,
	/// Simulation time step, in seconds.
	pub time_step: f32,
	/// Upper bound on the zoom chosen when fitting small graphs.
	pub max_zoom: f64,
	/// Radius of the circle nodes are scattered on before simulating.
	pub spread: f64,
	/// Frames the simulation keeps running after a drag is released.
	pub settle_frames: u32,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			padding: 30.0,
			iterations: 300,
			time_step: 0.016,
			max_zoom: 2.0,
			spread: 100.0,
			settle_frames: 90,
		}
	}
}

/// Parameters of the random graph generator.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorConfig {
	pub min_nodes: usize,
	pub max_nodes: usize,
	pub min_out_degree: usize,
	pub max_out_degree: usize,
	/// Label given to every generated edge.
	pub edge_label: String,
}

impl Default for GeneratorConfig {
	fn default() -> Self {
		Self {
			min_nodes: 3,
			max_nodes: 10,
			min_out_degree: 1,
			max_out_degree: 3,
			edge_label: "links_to".into(),
		}
	}
}
