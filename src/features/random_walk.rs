//! Random walk with restart, the "global" feature matrix.

use crate::error::{LayoutError, Result};
use crate::features::{adjacency_matrix, node_columns, FeatureMatrix};
use crate::graph::LayoutGraph;
use nalgebra::DMatrix;

/// Parameters of the random walk with restart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomWalk {
    /// Probability of continuing the walk. Must lie in `(0, 1)`.
    pub restart: f64,
    /// Weight of the graph edges against uniform teleportation. Must lie in `[0, 1]`.
    pub alpha: f64,
}

impl Default for RandomWalk {
    fn default() -> Self {
        Self {
            restart: 0.9,
            alpha: 1.0,
        }
    }
}

/// Diffusion matrix `(1 - r) (I - r M)^-1`, where `M` is the column-normalized
/// adjacency matrix blended with uniform teleportation.
///
/// Row `i` of the result is the stationary visiting profile of a walk restarting at
/// node `i`.
pub fn random_walk_matrix(graph: &LayoutGraph, walk: RandomWalk) -> Result<FeatureMatrix> {
    let RandomWalk { restart, alpha } = walk;
    if !(restart > 0.0 && restart < 1.0) {
        return Err(LayoutError::InvalidParameter {
            name: "restart",
            value: restart,
        });
    }
    if !(0.0..=1.0).contains(&alpha) {
        return Err(LayoutError::InvalidParameter {
            name: "alpha",
            value: alpha,
        });
    }

    let n = graph.node_count();
    let adjacency = adjacency_matrix(graph)?;
    let teleport = if n == 0 { 0.0 } else { (1.0 - alpha) / n as f64 };
    let mut transition = adjacency.data().map(|a| alpha * a + teleport);
    for mut column in transition.column_iter_mut() {
        let sum: f64 = column.iter().map(|v| v.abs()).sum();
        if sum > 0.0 {
            column /= sum;
        }
    }

    let identity = DMatrix::<f64>::identity(n, n);
    let system = &identity - transition * restart;
    let inverse = system.try_inverse().ok_or(LayoutError::SingularMatrix)?;
    let diffusion = inverse * (1.0 - restart);

    FeatureMatrix::with_columns(graph.node_ids(), node_columns(graph), diffusion.transpose())
}
