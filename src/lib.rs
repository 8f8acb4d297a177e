//! # Example
//! ```
//!use cartograph::prelude::*;
//!use glam::DVec2;
//!
//!let graph = LayoutGraph::from_edges([(1u32, 2u32), (2, 3), (3, 4), (4, 5)]);
//!
//!// Only three nodes have an embedding; 4 and 5 are placed on a ring around them.
//!let embedding: Embedding<DVec2> =
//!    Embedding::from_rows(["3", "1", "2"], &[[0.0, 1.0], [2.5, -1.0], [1.0, 4.0]]).unwrap();
//!
//!let layout = map_2d(&graph.node_ids(), &embedding, &PlacementOptions::planar()).unwrap();
//!assert_eq!(layout.len(), 5);
//!assert!(layout
//!    .values()
//!    .all(|p| (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y)));
//! ```

pub mod embedding;
pub mod error;
pub mod features;
pub mod geometry;
pub mod graph;
pub mod layout;
pub mod mapper;
pub mod spring;

/// Exports all the core types of the library.
pub mod prelude {
    pub use crate::embedding::Embedding;
    pub use crate::error::{BoxError, LayoutError, Result};
    pub use crate::features::{
        adjacency_matrix, centrality_matrix, random_walk_matrix, FeatureMatrix, RandomWalk,
    };
    pub use crate::geometry::{DegeneratePolicy, SphericalAngles};
    pub use crate::graph::{CoordinateMap, LayoutGraph, NodeId, PlanarMap, SpatialMap};
    pub use crate::layout::{
        generate_geodesic_layout, generate_layout, Layout, LayoutBuilder, Metric, Reducer,
        Reduction, Strategy, TsneParams, UmapParams,
    };
    pub use crate::mapper::{
        map_2d, map_3d, map_sphere, map_topographic, place_2d, place_3d, place_sphere,
        PlacementOptions, RadiusMap, SphereOptions,
    };
    pub use crate::spring::{SpringLayout, SpringLayoutBuilder};
}
