//! Error types for graph construction and render engine operations.

use thiserror::Error;

/// A graph failed validation on construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
	/// Two nodes share an id.
	#[error("duplicate node id `{0}`")]
	DuplicateNode(String),

	/// Two edges share an id.
	#[error("duplicate edge id `{0}`")]
	DuplicateEdge(String),

	/// An edge starts and ends on the same node.
	#[error("edge `{edge}` loops back onto node `{node}`")]
	SelfLoop { edge: String, node: String },

	/// An edge endpoint names a node that is not in the graph.
	#[error("edge `{edge}` references unknown node `{node}`")]
	UnknownEndpoint { edge: String, node: String },
}

/// A render engine operation could not be carried out.
///
/// None of these are surfaced to the user. The lifecycle manager logs them and
/// keeps the last good render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
	/// The drawing backend is not usable yet (document loading, no 2D canvas).
	#[error("rendering backend unavailable: {0}")]
	MissingDependency(String),

	/// The container element the engine binds to is absent from the document.
	#[error("container element `#{0}` not found")]
	MissingContainer(String),

	/// The operation needs a live engine instance.
	#[error("render engine is not initialized")]
	NotInitialized,
}
