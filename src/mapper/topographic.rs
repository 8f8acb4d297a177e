//! Lifts a planar layout into 3D by using a per-node score as height.

use crate::error::{LayoutError, Result};
use crate::geometry::{normalize_axis, DegeneratePolicy};
use crate::graph::{NodeId, PlanarMap, SpatialMap};
use indexmap::IndexMap;

/// Keeps x and y of `planar` and sets z to the min-max normalized height of each node.
///
/// Heights are looked up by node, so their map order does not matter. Extra height
/// entries are ignored.
pub fn map_topographic(
    planar: &PlanarMap,
    heights: &IndexMap<NodeId, f64>,
    policy: DegeneratePolicy,
) -> Result<SpatialMap> {
    let mut z = Vec::with_capacity(planar.len());
    for node in planar.keys() {
        match heights.get(node) {
            Some(height) if height.is_finite() => z.push(*height),
            Some(_) => return Err(LayoutError::NonFinite { node: node.clone() }),
            None => return Err(LayoutError::MissingNode { node: node.clone() }),
        }
    }
    let z = normalize_axis(&z, policy)?;

    Ok(planar
        .iter()
        .zip(z)
        .map(|((node, xy), z)| (node.clone(), xy.extend(z)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DVec2, DVec3};

    #[test]
    fn heights_are_matched_by_node() {
        let mut planar = PlanarMap::new();
        planar.insert(NodeId::from("a"), DVec2::new(0.0, 1.0));
        planar.insert(NodeId::from("b"), DVec2::new(1.0, 0.0));

        let mut heights = IndexMap::new();
        heights.insert(NodeId::from("b"), 10.0);
        heights.insert(NodeId::from("a"), 2.0);
        heights.insert(NodeId::from("zz"), 100.0);

        let lifted = map_topographic(&planar, &heights, DegeneratePolicy::Zero).unwrap();
        assert_eq!(lifted[&NodeId::from("a")], DVec3::new(0.0, 1.0, 0.0));
        assert_eq!(lifted[&NodeId::from("b")], DVec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn missing_height_is_reported() {
        let mut planar = PlanarMap::new();
        planar.insert(NodeId::from(1u32), DVec2::ZERO);
        let err = map_topographic(&planar, &IndexMap::new(), DegeneratePolicy::Zero).unwrap_err();
        assert!(matches!(err, LayoutError::MissingNode { .. }));
    }
}
