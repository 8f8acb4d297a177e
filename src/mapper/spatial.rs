//! Three dimensional placement. Rest nodes go on a Fibonacci shell around the embedded
//! cloud, so they never collapse onto a single plane.

use crate::embedding::Embedding;
use crate::error::Result;
use crate::geometry::{bounding_radius, centroid, fibonacci_sphere};
use crate::graph::{NodeId, SpatialMap};
use crate::mapper::{assemble, normalize_map, partition, PlacementOptions};
use glam::DVec3;
use log::debug;

/// Places every node of `nodes` without normalizing.
///
/// Rest nodes are spread over the sphere of `bounding radius * scale` around the
/// centroid of the embedded nodes, in graph order along the lattice.
pub fn place_3d(
    nodes: &[NodeId],
    embedding: &Embedding<DVec3>,
    options: &PlacementOptions,
) -> Result<SpatialMap> {
    let partition = partition(nodes, embedding)?;
    let points: Vec<DVec3> = partition.embedded.values().copied().collect();
    let center = centroid(&points)?;

    let radius = bounding_radius(&points, center, options.get_scale());
    if !partition.rest.is_empty() {
        debug!(
            "Shell for {} rest nodes: center {center}, radius {radius}",
            partition.rest.len()
        );
    }
    let rest_points = fibonacci_sphere(partition.rest.len(), center, radius);

    assemble(
        nodes,
        partition.embedded,
        partition.rest.into_iter().zip(rest_points),
    )
}

/// Places every node and normalizes x, y and z into `[0, 1]`.
pub fn map_3d(
    nodes: &[NodeId],
    embedding: &Embedding<DVec3>,
    options: &PlacementOptions,
) -> Result<SpatialMap> {
    let placed = place_3d(nodes, embedding, options)?;
    normalize_map(placed, options.get_policy(), options.get_precision())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;

    #[test]
    fn rest_nodes_form_a_shell_around_the_cloud() {
        let nodes: Vec<NodeId> = (0u32..8).map(NodeId::from).collect();
        let embedding = Embedding::from_rows(
            [0u32, 1, 2],
            &[[1.0, 0.0, 0.0], [-1.0, 0.0, 2.0], [0.0, 3.0, 1.0]],
        )
        .unwrap();
        let options = PlacementOptions::spatial();

        let placed = place_3d(&nodes, &embedding, &options).unwrap();
        let center = DVec3::new(0.0, 1.0, 1.0);
        let radius = DVec3::new(0.0, 2.0, 0.0).length() * 1.05;

        let rest: Vec<DVec3> = (3u32..8).map(|id| placed[&NodeId::from(id)]).collect();
        for point in &rest {
            assert!(((*point - center).length() - radius).abs() < 1e-9);
        }
        // Not coplanar: the shell uses every z level.
        assert!(rest.iter().any(|p| p.z > center.z));
        assert!(rest.iter().any(|p| p.z < center.z));
    }

    #[test]
    fn every_axis_is_normalized() {
        let nodes: Vec<NodeId> = ["x", "y", "z", "w"].into_iter().map(NodeId::from).collect();
        let embedding = Embedding::from_rows(
            ["w", "x"],
            &[[5.0, -2.0, 0.5], [6.0, 4.0, 0.25]],
        )
        .unwrap();

        let mapped = map_3d(&nodes, &embedding, &PlacementOptions::spatial()).unwrap();
        assert_eq!(mapped.len(), 4);
        for point in mapped.values() {
            for axis in 0..3 {
                assert!((0.0..=1.0).contains(&point[axis]));
            }
        }
        for axis in 0..3 {
            assert!(mapped.values().any(|p| p[axis] == 0.0));
            assert!(mapped.values().any(|p| p[axis] == 1.0));
        }
    }

    #[test]
    fn alias_ids_count_as_embedded() {
        let nodes: Vec<NodeId> = (1u64..=4).map(NodeId::from).collect();
        let embedding =
            Embedding::from_rows(["3", "1"], &[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]).unwrap();
        let placed = place_3d(&nodes, &embedding, &PlacementOptions::spatial()).unwrap();
        assert_eq!(placed[&NodeId::from(3u64)], DVec3::ZERO);
        assert_eq!(placed[&NodeId::from(1u64)], DVec3::ONE);
    }

    #[test]
    fn no_embedded_node_is_an_error() {
        let nodes = vec![NodeId::from("a")];
        let embedding = Embedding::from_rows(["b"], &[[0.0, 0.0, 0.0]]).unwrap();
        let err = place_3d(&nodes, &embedding, &PlacementOptions::spatial()).unwrap_err();
        assert!(matches!(err, LayoutError::EmptyEmbedding));
    }
}
