//! Geodesic placement: nodes sit on concentric spherical shells.
//!
//! Embedded nodes are projected from their angular embedding onto the unit sphere and
//! pushed outwards by their entry in the radius map. Nodes without any embedding share
//! one flat shell at `fallback_radius`, which keeps them visually apart from the
//! annotated nodes.

use crate::embedding::Embedding;
use crate::error::{LayoutError, Result};
use crate::geometry::{fibonacci_sphere, DegeneratePolicy, SphericalAngles, DEFAULT_PRECISION};
use crate::graph::{NodeId, SpatialMap};
use crate::mapper::{assemble, normalize_map, partition};
use glam::DVec3;
use indexmap::IndexMap;
use log::debug;

/// Per-node shell radius, usually derived from an importance or annotation score.
pub type RadiusMap = IndexMap<NodeId, f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct SphereOptions {
    fallback_radius: f64,
    embedded_default_radius: f64,
    policy: DegeneratePolicy,
    precision: Option<u32>,
}

impl SphereOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Radius of the shell holding nodes that are not embedded at all.
    ///
    /// Default: `20.0`
    pub fn fallback_radius(mut self, radius: f64) -> Self {
        self.fallback_radius = radius;
        self
    }

    /// Radius for embedded nodes missing from the radius map.
    ///
    /// An embedded node without a score stays on this shell next to the scored ones.
    ///
    /// Default: `1.0`
    pub fn embedded_default_radius(mut self, radius: f64) -> Self {
        self.embedded_default_radius = radius;
        self
    }

    /// Default: [`DegeneratePolicy::Zero`]
    pub fn degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Default: `Some(10)`
    pub fn precision(mut self, precision: Option<u32>) -> Self {
        self.precision = precision;
        self
    }
}

impl Default for SphereOptions {
    fn default() -> Self {
        Self {
            fallback_radius: 20.0,
            embedded_default_radius: 1.0,
            policy: DegeneratePolicy::Zero,
            precision: Some(DEFAULT_PRECISION),
        }
    }
}

fn check_option(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(LayoutError::InvalidParameter { name, value })
    }
}

fn check_radius(node: &NodeId, radius: f64) -> Result<f64> {
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(LayoutError::InvalidRadius {
            node: node.clone(),
            radius,
        })
    }
}

/// Places every node on its shell without normalizing.
///
/// The norm of an embedded node equals its radius map entry, or
/// `embedded_default_radius` without one. Rest nodes have norm `fallback_radius`.
/// Without any embedded node the whole graph shares the fallback shell.
pub fn place_sphere(
    nodes: &[NodeId],
    embedding: &Embedding<SphericalAngles>,
    radii: &RadiusMap,
    options: &SphereOptions,
) -> Result<SpatialMap> {
    let partition = partition(nodes, embedding)?;
    let default_radius = check_option(
        "embedded_default_radius",
        options.embedded_default_radius,
    )?;
    let fallback_radius = check_option("fallback_radius", options.fallback_radius)?;
    let mut unscored = 0;
    let mut embedded = IndexMap::with_capacity(partition.embedded.len());
    for (node, angles) in partition.embedded {
        let radius = match radii.get(&node) {
            Some(radius) => check_radius(&node, *radius)?,
            None => {
                unscored += 1;
                default_radius
            }
        };
        embedded.insert(node, angles.to_unit() * radius);
    }

    let ignored = radii.keys().filter(|node| !embedded.contains_key(*node)).count();
    debug!(
        "Sphere placement: {} embedded ({unscored} without radius), {} rest, {ignored} radii ignored",
        embedded.len(),
        partition.rest.len()
    );

    let rest_points = fibonacci_sphere(partition.rest.len(), DVec3::ZERO, fallback_radius);

    assemble(nodes, embedded, partition.rest.into_iter().zip(rest_points))
}

/// Places every node on its shell and normalizes each axis into `[0, 1]`.
pub fn map_sphere(
    nodes: &[NodeId],
    embedding: &Embedding<SphericalAngles>,
    radii: &RadiusMap,
    options: &SphereOptions,
) -> Result<SpatialMap> {
    let placed = place_sphere(nodes, embedding, radii, options)?;
    normalize_map(placed, options.policy, options.precision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    const EPS: f64 = 1e-9;

    fn fixture() -> (Vec<NodeId>, Embedding<SphericalAngles>, RadiusMap) {
        let nodes: Vec<NodeId> = ["g1", "g2", "g3", "g4", "g5"]
            .into_iter()
            .map(NodeId::from)
            .collect();
        let embedding = Embedding::from_rows(
            ["g2", "g1", "g3"],
            &[[FRAC_PI_2, 0.0], [FRAC_PI_4, PI], [PI, 0.5]],
        )
        .unwrap();
        let mut radii = RadiusMap::new();
        radii.insert(NodeId::from("g1"), 3.0);
        radii.insert(NodeId::from("g2"), 0.5);
        radii.insert(NodeId::from("g5"), 9.0);
        (nodes, embedding, radii)
    }

    #[test]
    fn shells_follow_the_radius_map() {
        let (nodes, embedding, radii) = fixture();
        let placed = place_sphere(&nodes, &embedding, &radii, &SphereOptions::new()).unwrap();

        let norm = |id: &str| placed[&NodeId::from(id)].length();
        assert!((norm("g1") - 3.0).abs() < EPS);
        assert!((norm("g2") - 0.5).abs() < EPS);
        // Embedded without a radius: unit sphere.
        assert!((norm("g3") - 1.0).abs() < EPS);
        // Not embedded, even with a radius entry: fallback shell.
        assert!((norm("g4") - 20.0).abs() < EPS);
        assert!((norm("g5") - 20.0).abs() < EPS);

        assert!((placed[&NodeId::from("g2")] - DVec3::new(0.5, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn normalized_output_is_in_unit_cube_and_graph_ordered() {
        let (nodes, embedding, radii) = fixture();
        let mapped = map_sphere(&nodes, &embedding, &radii, &SphereOptions::new()).unwrap();

        assert_eq!(mapped.keys().cloned().collect::<Vec<_>>(), nodes);
        for point in mapped.values() {
            for axis in 0..3 {
                assert!((0.0..=1.0).contains(&point[axis]));
            }
        }
    }

    #[test]
    fn rejects_non_positive_radius() {
        let (nodes, embedding, mut radii) = fixture();
        radii.insert(NodeId::from("g3"), 0.0);
        let err = place_sphere(&nodes, &embedding, &radii, &SphereOptions::new()).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidRadius { node, .. } if node.as_str() == "g3"));
    }

    #[test]
    fn rejects_bad_options() {
        let (nodes, embedding, radii) = fixture();
        let options = SphereOptions::new().fallback_radius(f64::INFINITY);
        let err = place_sphere(&nodes, &embedding, &radii, &options).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidParameter {
                name: "fallback_radius",
                ..
            }
        ));
    }

    #[test]
    fn unembedded_graph_uses_the_fallback_shell() {
        let (nodes, _, radii) = fixture();
        let placed = place_sphere(&nodes, &Embedding::new(), &radii, &SphereOptions::new()).unwrap();
        assert_eq!(placed.keys().cloned().collect::<Vec<_>>(), nodes);
        assert!(placed.values().all(|p| (p.length() - 20.0).abs() < EPS));

        let mapped = map_sphere(&nodes, &Embedding::new(), &radii, &SphereOptions::new()).unwrap();
        assert_eq!(mapped.len(), nodes.len());
    }

    #[test]
    fn non_finite_angles_are_rejected() {
        let (nodes, mut embedding, radii) = fixture();
        embedding.push("g4", SphericalAngles::new(f64::NAN, 0.0));
        let err = place_sphere(&nodes, &embedding, &radii, &SphereOptions::new()).unwrap_err();
        assert!(matches!(err, LayoutError::NonFinite { node } if node.as_str() == "g4"));
    }

    #[test]
    fn custom_fallback_radius() {
        let (nodes, embedding, radii) = fixture();
        let options = SphereOptions::new().fallback_radius(7.5);
        let placed = place_sphere(&nodes, &embedding, &radii, &options).unwrap();
        assert!((placed[&NodeId::from("g4")].length() - 7.5).abs() < EPS);
    }
}
