//! Placement mappers: embedding rows onto graph nodes, fallback placement for the
//! rest, and per-axis normalization.
//!
//! Each mapper comes in two flavors. `place_*` returns the merged coordinates before
//! normalization, `map_*` additionally min-max normalizes every axis into `[0, 1]`.

pub mod planar;
pub mod spatial;
pub mod spherical;
pub mod topographic;

use crate::embedding::{Embedding, EmbeddingRow};
use crate::error::{LayoutError, Result};
use crate::geometry::{normalize_points, Coordinate, DegeneratePolicy, DEFAULT_PRECISION};
use crate::graph::{CoordinateMap, NodeId};
use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};

pub use planar::{map_2d, place_2d};
pub use spatial::{map_3d, place_3d};
pub use spherical::{map_sphere, place_sphere, RadiusMap, SphereOptions};
pub use topographic::map_topographic;

/// Options shared by the planar and spatial mappers.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementOptions {
    scale: f64,
    seed: u64,
    policy: DegeneratePolicy,
    precision: Option<u32>,
}

impl PlacementOptions {
    /// Defaults for [`map_2d`]: scale `1.2`.
    pub fn planar() -> Self {
        Self {
            scale: 1.2,
            seed: 42,
            policy: DegeneratePolicy::Zero,
            precision: Some(DEFAULT_PRECISION),
        }
    }

    /// Defaults for [`map_3d`]: scale `1.05`.
    pub fn spatial() -> Self {
        Self {
            scale: 1.05,
            ..Self::planar()
        }
    }

    /// Factor applied to the bounding radius of the embedded cloud when placing
    /// rest nodes. Values above `1.0` keep the rest nodes outside the cloud.
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Seed for the angles of rest nodes in the planar mapper.
    ///
    /// Default: `42`
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Handling of axes without spread.
    ///
    /// Default: [`DegeneratePolicy::Zero`]
    pub fn degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Decimal digits kept after normalization. `None` disables rounding.
    ///
    /// Default: `Some(10)`
    pub fn precision(mut self, precision: Option<u32>) -> Self {
        self.precision = precision;
        self
    }

    pub fn get_scale(&self) -> f64 {
        self.scale
    }

    pub fn get_seed(&self) -> u64 {
        self.seed
    }

    pub fn get_policy(&self) -> DegeneratePolicy {
        self.policy
    }

    pub fn get_precision(&self) -> Option<u32> {
        self.precision
    }
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self::planar()
    }
}

/// Graph nodes split into those covered by an embedding and the rest.
#[derive(Debug)]
pub(crate) struct Partition<P> {
    /// Embedded nodes in embedding order.
    pub embedded: IndexMap<NodeId, P>,
    /// Remaining nodes in graph order.
    pub rest: Vec<NodeId>,
}

/// Splits `nodes` by `embedding` coverage.
///
/// Fails on repeated ids and on non-finite points of graph nodes. Rows for nodes outside
/// the graph are skipped.
pub(crate) fn partition<P: EmbeddingRow>(
    nodes: &[NodeId],
    embedding: &Embedding<P>,
) -> Result<Partition<P>> {
    let mut graph_nodes = IndexSet::with_capacity(nodes.len());
    for node in nodes {
        if !graph_nodes.insert(node) {
            return Err(LayoutError::DuplicateNode { node: node.clone() });
        }
    }

    let mut embedded = IndexMap::with_capacity(embedding.len());
    let mut skipped = 0;
    for (id, point) in embedding.iter() {
        if !graph_nodes.contains(id) {
            skipped += 1;
            continue;
        }
        if !point.is_finite() {
            return Err(LayoutError::NonFinite { node: id.clone() });
        }
        if embedded.insert(id.clone(), *point).is_some() {
            return Err(LayoutError::DuplicateNode { node: id.clone() });
        }
    }
    if skipped > 0 {
        warn!("{skipped} embedding rows name nodes outside the graph and were ignored");
    }

    let rest: Vec<NodeId> = nodes
        .iter()
        .filter(|node| !embedded.contains_key(*node))
        .cloned()
        .collect();

    debug!(
        "Partitioned {} nodes: {} embedded, {} rest",
        nodes.len(),
        embedded.len(),
        rest.len()
    );

    Ok(Partition { embedded, rest })
}

/// Merges embedded and rest coordinates and re-keys them into `nodes` order.
pub(crate) fn assemble<P: Copy>(
    nodes: &[NodeId],
    embedded: IndexMap<NodeId, P>,
    rest: impl IntoIterator<Item = (NodeId, P)>,
) -> Result<CoordinateMap<P>> {
    let mut merged = embedded;
    merged.extend(rest);

    nodes
        .iter()
        .map(|node| match merged.get(node) {
            Some(point) => Ok((node.clone(), *point)),
            None => Err(LayoutError::MissingNode { node: node.clone() }),
        })
        .collect()
}

/// Min-max normalizes every axis of `map`, keeping its key order.
pub(crate) fn normalize_map<P: Coordinate>(
    map: CoordinateMap<P>,
    policy: DegeneratePolicy,
    precision: Option<u32>,
) -> Result<CoordinateMap<P>> {
    let points: Vec<P> = map.values().copied().collect();
    let normalized = normalize_points(&points, policy, precision)?;
    Ok(map.into_keys().zip(normalized).collect())
}
