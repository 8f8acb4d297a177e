//! Embeddings as explicit (node, row) pairs.
//!
//! A reducer returns one row per feature matrix row. Pairing each row with its node id
//! here means the placement mappers never depend on row order lining up with graph order.

use crate::error::{LayoutError, Result};
use crate::geometry::SphericalAngles;
use crate::graph::NodeId;
use glam::{DVec2, DVec3};

/// A value that can be read from one embedding row.
pub trait EmbeddingRow: Copy {
    /// Number of columns a row must have.
    const WIDTH: usize;

    fn from_row(row: &[f64]) -> Self;

    fn is_finite(&self) -> bool;
}

impl EmbeddingRow for DVec2 {
    const WIDTH: usize = 2;

    fn from_row(row: &[f64]) -> Self {
        DVec2::new(row[0], row[1])
    }

    fn is_finite(&self) -> bool {
        DVec2::is_finite(*self)
    }
}

impl EmbeddingRow for DVec3 {
    const WIDTH: usize = 3;

    fn from_row(row: &[f64]) -> Self {
        DVec3::new(row[0], row[1], row[2])
    }

    fn is_finite(&self) -> bool {
        DVec3::is_finite(*self)
    }
}

/// Rows are read as `(polar, azimuth)`.
impl EmbeddingRow for SphericalAngles {
    const WIDTH: usize = 2;

    fn from_row(row: &[f64]) -> Self {
        SphericalAngles::new(row[0], row[1])
    }

    fn is_finite(&self) -> bool {
        self.polar.is_finite() && self.azimuth.is_finite()
    }
}

/// Low-dimensional embedding with every row tagged by its node.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding<P> {
    rows: Vec<(NodeId, P)>,
}

impl<P> Embedding<P> {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn push(&mut self, id: impl Into<NodeId>, point: P) {
        self.rows.push((id.into(), point));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &P)> + '_ {
        self.rows.iter().map(|(id, point)| (id, point))
    }
}

impl<P: EmbeddingRow> Embedding<P> {
    /// Pairs `rows[i]` with the `i`-th id.
    ///
    /// `ids` is normally the row index of the feature matrix the embedding was computed
    /// from. Fails when the counts differ, when a row has the wrong width, or when a value
    /// is not finite.
    pub fn from_rows<I, R>(ids: I, rows: &[R]) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<NodeId>,
        R: AsRef<[f64]>,
    {
        let ids: Vec<NodeId> = ids.into_iter().map(Into::into).collect();
        if ids.len() != rows.len() {
            return Err(LayoutError::ShapeMismatch {
                expected: format!("{} embedding rows", ids.len()),
                found: format!("{} rows", rows.len()),
            });
        }

        let mut paired = Vec::with_capacity(rows.len());
        for (id, row) in ids.into_iter().zip(rows) {
            let row = row.as_ref();
            if row.len() != P::WIDTH {
                return Err(LayoutError::ShapeMismatch {
                    expected: format!("{} columns", P::WIDTH),
                    found: format!("{} columns for node {id}", row.len()),
                });
            }
            if row.iter().any(|value| !value.is_finite()) {
                return Err(LayoutError::NonFinite { node: id });
            }
            paired.push((id, P::from_row(row)));
        }

        Ok(Self { rows: paired })
    }
}

impl<P> Default for Embedding<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Into<NodeId>, P> FromIterator<(I, P)> for Embedding<P> {
    fn from_iter<T: IntoIterator<Item = (I, P)>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().map(|(id, point)| (id.into(), point)).collect(),
        }
    }
}
