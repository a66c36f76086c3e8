//! Interactive force-directed graph rendering.
//!
//! A [`Graph`] of labeled nodes and directed, labeled edges is bound to a
//! container through a [`RenderEngine`]:
//! - Physics-based layout via force simulation, fitted to the viewport
//! - Arrowed, curved edges with labels
//! - Pan, zoom, and node dragging interactions
//! - Smooth highlight transitions on hover
//! - Configurable theming and visual scaling
//!
//! # Example
//!
//! ```ignore
//! use graph_playground::components::force_graph::{Edge, Graph, Node};
//!
//! let graph = Graph::new(
//!     vec![Node::new("a", "Node A"), Node::new("b", "Node B")],
//!     vec![Edge::new("a-b", "a", "b", "links_to")],
//! )?;
//!
//! engine.replace_elements(graph)?;
//! engine.relayout()?;
//! ```

mod component;
pub mod engine;
mod generator;
mod render;
pub mod scale;
mod state;
pub mod theme;
mod types;

pub use component::{AppHandle, CanvasSurface, DomHost, GraphView};
pub use engine::{Host, RenderEngine, Surface};
pub use generator::RandomGraphGenerator;
pub use scale::ScaleConfig;
pub use state::ForceGraphState;
pub use theme::Theme;
pub use types::{Edge, Graph, Node};
