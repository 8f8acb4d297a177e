use crate::error::Result;
use crate::features::{node_columns, FeatureMatrix};
use crate::graph::LayoutGraph;
use nalgebra::DMatrix;

/// Symmetric adjacency matrix in graph order. Each edge, self loops included, is `1.0`.
pub fn adjacency_matrix(graph: &LayoutGraph) -> Result<FeatureMatrix> {
    let n = graph.node_count();
    let mut data = DMatrix::zeros(n, n);
    for (a, b) in graph.edges() {
        data[(a, b)] = 1.0;
        data[(b, a)] = 1.0;
    }
    FeatureMatrix::with_columns(graph.node_ids(), node_columns(graph), data)
}
