//! Node-indexed feature matrices and the producers the layout strategies draw from.

pub mod adjacency;
pub mod centrality;
pub mod random_walk;

use crate::error::{LayoutError, Result};
use crate::graph::{LayoutGraph, NodeId};
use indexmap::IndexSet;
use nalgebra::DMatrix;

pub use adjacency::adjacency_matrix;
pub use centrality::centrality_matrix;
pub use random_walk::{random_walk_matrix, RandomWalk};

/// Feature table whose rows are labelled by node.
///
/// Row order is whatever the producer chose and is not required to match the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: Vec<NodeId>,
    columns: Vec<String>,
    data: DMatrix<f64>,
}

impl FeatureMatrix {
    /// Labels the rows of `data`. Columns are named by their index.
    pub fn new(rows: Vec<NodeId>, data: DMatrix<f64>) -> Result<Self> {
        let columns = (0..data.ncols()).map(|c| c.to_string()).collect();
        Self::with_columns(rows, columns, data)
    }

    pub fn with_columns(rows: Vec<NodeId>, columns: Vec<String>, data: DMatrix<f64>) -> Result<Self> {
        if rows.len() != data.nrows() {
            return Err(LayoutError::ShapeMismatch {
                expected: format!("{} labelled rows", rows.len()),
                found: format!("{} matrix rows", data.nrows()),
            });
        }
        if columns.len() != data.ncols() {
            return Err(LayoutError::ShapeMismatch {
                expected: format!("{} named columns", columns.len()),
                found: format!("{} matrix columns", data.ncols()),
            });
        }

        let mut seen = IndexSet::with_capacity(rows.len());
        for (i, id) in rows.iter().enumerate() {
            if !seen.insert(id) {
                return Err(LayoutError::DuplicateNode { node: id.clone() });
            }
            if data.row(i).iter().any(|value| !value.is_finite()) {
                return Err(LayoutError::NonFinite { node: id.clone() });
            }
        }

        Ok(Self {
            rows,
            columns,
            data,
        })
    }

    /// Builds a matrix from `(node, features)` rows of equal length.
    pub fn from_rows<I, N>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, Vec<f64>)>,
        N: Into<NodeId>,
    {
        let (ids, values): (Vec<NodeId>, Vec<Vec<f64>>) =
            rows.into_iter().map(|(id, row)| (id.into(), row)).unzip();
        let width = values.first().map_or(0, Vec::len);
        if let Some((id, row)) = ids.iter().zip(&values).find(|(_, row)| row.len() != width) {
            return Err(LayoutError::ShapeMismatch {
                expected: format!("{width} columns"),
                found: format!("{} columns for node {id}", row.len()),
            });
        }

        let data = DMatrix::from_fn(ids.len(), width, |r, c| values[r][c]);
        Self::new(ids, data)
    }

    /// Node labels in row order.
    pub fn row_ids(&self) -> &[NodeId] {
        &self.rows
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn data(&self) -> &DMatrix<f64> {
        &self.data
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// One row as a plain vector, e.g. to hand over to a reducer.
    pub fn row(&self, index: usize) -> Vec<f64> {
        self.data.row(index).iter().copied().collect()
    }
}

/// Neighbor positions per node, without self loops.
pub(crate) fn neighbor_lists(graph: &LayoutGraph) -> Vec<Vec<usize>> {
    (0..graph.node_count())
        .map(|node| {
            graph
                .neighbors(node)
                .filter(|&neighbor| neighbor != node)
                .collect()
        })
        .collect()
}

/// Column labels taken from the graph's node ids.
pub(crate) fn node_columns(graph: &LayoutGraph) -> Vec<String> {
    graph.nodes().map(|id| id.as_str().to_owned()).collect()
}
