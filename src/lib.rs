//! graph-playground: an interactive force-directed canvas for small labeled
//! graphs.
//!
//! The page shows a seed graph once the rendering backend is available, and
//! offers two triggers: Clear empties the canvas, Randomize replaces the graph
//! with a freshly generated one and lays it out again.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

// Enables the `js` backend for `rand` on wasm32.
#[cfg(target_arch = "wasm32")]
use getrandom as _;

pub mod components;
pub mod config;
pub mod error;
pub mod lifecycle;

pub use components::force_graph::{Edge, Graph, GraphView, Node};
pub use config::AppConfig;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("graph-playground: logging initialized");
}

/// Parses the JSON body of `<script id="{id}">`, if the page has one.
fn read_script_json<T: DeserializeOwned>(id: &str) -> Option<T> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<T>(&json_text) {
		Ok(value) => Some(value),
		Err(e) => {
			warn!("graph-playground: ignoring #{id}: {e}");
			None
		}
	}
}

/// Load configuration from a script element with id="graph-config".
fn load_config() -> AppConfig {
	read_script_json("graph-config").unwrap_or_default()
}

/// Load the seed graph from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], edges: [...] }
fn load_seed_graph() -> Graph {
	match read_script_json::<Graph>("graph-data") {
		Some(graph) => {
			info!(
				"graph-playground: loaded seed with {} nodes, {} edges",
				graph.node_count(),
				graph.edge_count()
			);
			graph
		}
		None => Graph::seed(),
	}
}

/// Main application component.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config();
	let seed = load_seed_graph();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Graph Playground" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="playground">
			<h1>"Graph Playground"</h1>
			<p class="subtitle">"Drag nodes to reposition. Scroll to zoom. Drag background to pan."</p>
			<GraphView config=config seed=seed />
		</main>
	}
}
