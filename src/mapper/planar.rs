//! Two dimensional placement. Rest nodes go on a ring around the embedded cloud.

use crate::embedding::Embedding;
use crate::error::Result;
use crate::geometry::{bounding_radius, centroid, circle_points};
use crate::graph::{NodeId, PlanarMap};
use crate::mapper::{assemble, normalize_map, partition, PlacementOptions};
use glam::DVec2;
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Places every node of `nodes` without normalizing.
///
/// Embedded nodes keep their embedding row. Rest nodes are put on the circle of
/// `bounding radius * scale` around the centroid of the embedded nodes. Their angles come
/// from a generator seeded with `options.seed`.
pub fn place_2d(
    nodes: &[NodeId],
    embedding: &Embedding<DVec2>,
    options: &PlacementOptions,
) -> Result<PlanarMap> {
    let partition = partition(nodes, embedding)?;
    let points: Vec<DVec2> = partition.embedded.values().copied().collect();
    let center = centroid(&points)?;

    let rest_points = if partition.rest.is_empty() {
        Vec::new()
    } else {
        let radius = bounding_radius(&points, center, options.get_scale());
        debug!(
            "Ring for {} rest nodes: center {center}, radius {radius}",
            partition.rest.len()
        );
        let mut rng = StdRng::seed_from_u64(options.get_seed());
        circle_points(partition.rest.len(), radius, center, &mut rng)
    };

    assemble(
        nodes,
        partition.embedded,
        partition.rest.into_iter().zip(rest_points),
    )
}

/// Places every node and normalizes both axes into `[0, 1]`.
pub fn map_2d(
    nodes: &[NodeId],
    embedding: &Embedding<DVec2>,
    options: &PlacementOptions,
) -> Result<PlanarMap> {
    let placed = place_2d(nodes, embedding, options)?;
    normalize_map(placed, options.get_policy(), options.get_precision())
}
