//! Error type shared by every layout operation.

use crate::graph::NodeId;

/// Boxed error returned by external [`Reducer`](crate::layout::Reducer) implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("no graph node is covered by the embedding")]
    EmptyEmbedding,

    #[error("node {node} has no coordinate after placement")]
    MissingNode { node: NodeId },

    #[error("node {node} appears more than once")]
    DuplicateNode { node: NodeId },

    #[error("axis {axis} has zero range and cannot be normalized")]
    DegenerateRange { axis: usize },

    #[error("axis {axis} holds a non-finite value after placement")]
    NonFiniteAxis { axis: usize },

    #[error("invalid layout strategy: {reason}")]
    InvalidStrategy { reason: String },

    #[error("unsupported layout dimension {dim}, expected 2 or 3")]
    InvalidDimension { dim: usize },

    #[error("shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: String },

    #[error("non-finite value for node {node}")]
    NonFinite { node: NodeId },

    #[error("radius {radius} for node {node} must be finite and positive")]
    InvalidRadius { node: NodeId, radius: f64 },

    #[error("parameter {name} = {value} is out of range")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("random walk system is singular")]
    SingularMatrix,

    #[error("eigenvector centrality did not converge in {iterations} iterations")]
    NoConvergence { iterations: usize },

    #[error(transparent)]
    Reduction(BoxError),
}

pub type Result<T, E = LayoutError> = std::result::Result<T, E>;
