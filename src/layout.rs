//! Layout strategy dispatch.
//!
//! A layout request picks a feature construction ([`Strategy`]) and a dimensionality
//! reduction ([`Reduction`]). Features are built here, the reduction is delegated to a
//! caller supplied [`Reducer`], and the resulting embedding is handed to the placement
//! mappers.

use crate::embedding::Embedding;
use crate::error::{BoxError, LayoutError, Result};
use crate::features::{
    adjacency_matrix, centrality_matrix, random_walk_matrix, FeatureMatrix, RandomWalk,
};
use crate::geometry::{DegeneratePolicy, SphericalAngles};
use crate::graph::{LayoutGraph, PlanarMap, SpatialMap};
use crate::mapper::{map_2d, map_3d, map_sphere, PlacementOptions, RadiusMap, SphereOptions};
use glam::{DVec2, DVec3};
use log::{debug, info};
use std::borrow::Cow;

/// How the feature matrix of a layout is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// Adjacency rows: nodes with the same neighbors end up close.
    Local,
    /// Random walk with restart profiles: proximity in the network as a whole.
    Global(RandomWalk),
    /// Degree, closeness, betweenness and eigenvector centrality.
    Importance,
    /// A caller supplied matrix, e.g. functional annotations.
    Functional,
}

impl Strategy {
    /// Builds the feature matrix for `graph`.
    ///
    /// `matrix` is only used by [`Strategy::Functional`], which fails without one.
    pub fn features<'m>(
        &self,
        graph: &LayoutGraph,
        matrix: Option<&'m FeatureMatrix>,
    ) -> Result<Cow<'m, FeatureMatrix>> {
        if matrix.is_some() && *self != Strategy::Functional {
            debug!("Ignoring supplied matrix for {self:?} strategy");
        }
        let features = match self {
            Strategy::Local => adjacency_matrix(graph)?,
            Strategy::Global(walk) => random_walk_matrix(graph, *walk)?,
            Strategy::Importance => centrality_matrix(graph)?,
            Strategy::Functional => {
                return matrix
                    .map(Cow::Borrowed)
                    .ok_or_else(|| LayoutError::InvalidStrategy {
                        reason: "functional layouts need a feature matrix".to_string(),
                    });
            }
        };
        Ok(Cow::Owned(features))
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Local
    }
}

/// Distance used by the reducer in feature space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    #[default]
    Cosine,
    Euclidean,
    Manhattan,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TsneParams {
    pub perplexity: f64,
    /// Early exaggeration.
    pub density: f64,
    pub learning_rate: f64,
    pub steps: usize,
    pub metric: Metric,
}

impl Default for TsneParams {
    fn default() -> Self {
        Self {
            perplexity: 50.0,
            density: 12.0,
            learning_rate: 200.0,
            steps: 250,
            metric: Metric::Cosine,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UmapParams {
    pub n_neighbors: usize,
    pub spread: f64,
    pub min_dist: f64,
    pub metric: Metric,
}

impl Default for UmapParams {
    fn default() -> Self {
        Self {
            n_neighbors: 20,
            spread: 1.0,
            min_dist: 0.0,
            metric: Metric::Cosine,
        }
    }
}

/// Dimensionality reduction method and its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reduction {
    Tsne(TsneParams),
    Umap(UmapParams),
}

impl Default for Reduction {
    fn default() -> Self {
        Reduction::Umap(UmapParams::default())
    }
}

/// Dimensionality reduction backend.
///
/// Implementations wrap a t-SNE or UMAP library. They must return exactly one row per
/// feature matrix row, in the same order. Errors are passed through to the caller as
/// [`LayoutError::Reduction`].
pub trait Reducer {
    /// Embeds `features` into `dim` Cartesian columns.
    fn reduce(
        &self,
        features: &FeatureMatrix,
        method: &Reduction,
        dim: usize,
    ) -> std::result::Result<Vec<Vec<f64>>, BoxError>;

    /// Embeds `features` onto a sphere, one `(polar, azimuth)` pair per row.
    fn reduce_sphere(
        &self,
        _features: &FeatureMatrix,
        _params: &UmapParams,
    ) -> std::result::Result<Vec<[f64; 2]>, BoxError> {
        Err("this reducer has no spherical output".into())
    }
}

/// Normalized coordinates of a generated layout.
#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    Planar(PlanarMap),
    Spatial(SpatialMap),
}

impl Layout {
    pub fn dim(&self) -> usize {
        match self {
            Layout::Planar(_) => 2,
            Layout::Spatial(_) => 3,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Layout::Planar(map) => map.len(),
            Layout::Spatial(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_planar(&self) -> Option<&PlanarMap> {
        match self {
            Layout::Planar(map) => Some(map),
            Layout::Spatial(_) => None,
        }
    }

    pub fn as_spatial(&self) -> Option<&SpatialMap> {
        match self {
            Layout::Spatial(map) => Some(map),
            Layout::Planar(_) => None,
        }
    }
}

/// Builder for layout requests.
#[derive(Debug, Clone)]
pub struct LayoutBuilder {
    dim: usize,
    strategy: Strategy,
    reduction: Reduction,
    planar: PlacementOptions,
    spatial: PlacementOptions,
}

impl LayoutBuilder {
    /// Get a Instance of `LayoutBuilder` with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of output axes, `2` or `3`.
    ///
    /// Default: `2`
    pub fn dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }

    /// Default: [`Strategy::Local`]
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Default: UMAP with 20 neighbors, spread `1.0`, min distance `0.0`, cosine metric.
    pub fn reduction(mut self, reduction: Reduction) -> Self {
        self.reduction = reduction;
        self
    }

    /// Seed for rest node placement.
    ///
    /// Default: `42`
    pub fn seed(mut self, seed: u64) -> Self {
        self.planar = self.planar.seed(seed);
        self.spatial = self.spatial.seed(seed);
        self
    }

    /// Default: [`DegeneratePolicy::Zero`]
    pub fn degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.planar = self.planar.degenerate_policy(policy);
        self.spatial = self.spatial.degenerate_policy(policy);
        self
    }

    /// Default: `Some(10)`
    pub fn precision(mut self, precision: Option<u32>) -> Self {
        self.planar = self.planar.precision(precision);
        self.spatial = self.spatial.precision(precision);
        self
    }

    /// Ring scale for rest nodes in 2D.
    ///
    /// Default: `1.2`
    pub fn planar_scale(mut self, scale: f64) -> Self {
        self.planar = self.planar.scale(scale);
        self
    }

    /// Shell scale for rest nodes in 3D.
    ///
    /// Default: `1.05`
    pub fn spatial_scale(mut self, scale: f64) -> Self {
        self.spatial = self.spatial.scale(scale);
        self
    }

    /// Runs the request. The reducer is called at most once.
    pub fn generate<R: Reducer + ?Sized>(
        &self,
        graph: &LayoutGraph,
        matrix: Option<&FeatureMatrix>,
        reducer: &R,
    ) -> Result<Layout> {
        if !matches!(self.dim, 2 | 3) {
            return Err(LayoutError::InvalidDimension { dim: self.dim });
        }

        let features = self.strategy.features(graph, matrix)?;
        info!(
            "Generating {}D layout for {} nodes: {:?} features ({}x{}), {:?}",
            self.dim,
            graph.node_count(),
            self.strategy,
            features.nrows(),
            features.ncols(),
            self.reduction
        );

        let rows = reducer
            .reduce(&features, &self.reduction, self.dim)
            .map_err(LayoutError::Reduction)?;
        let nodes = graph.node_ids();

        let layout = match self.dim {
            2 => {
                let embedding = Embedding::<DVec2>::from_rows(features.row_ids(), &rows)?;
                Layout::Planar(map_2d(&nodes, &embedding, &self.planar)?)
            }
            _ => {
                let embedding = Embedding::<DVec3>::from_rows(features.row_ids(), &rows)?;
                Layout::Spatial(map_3d(&nodes, &embedding, &self.spatial)?)
            }
        };

        info!("Finished {}D layout with {} nodes", layout.dim(), layout.len());
        Ok(layout)
    }
}

impl Default for LayoutBuilder {
    fn default() -> Self {
        Self {
            dim: 2,
            strategy: Strategy::default(),
            reduction: Reduction::default(),
            planar: PlacementOptions::planar(),
            spatial: PlacementOptions::spatial(),
        }
    }
}

/// Generates a normalized `dim`-dimensional layout of `graph`.
///
/// Fails with [`LayoutError::InvalidDimension`] unless `dim` is 2 or 3 and with
/// [`LayoutError::InvalidStrategy`] for a functional layout without `matrix`.
pub fn generate_layout<R: Reducer + ?Sized>(
    graph: &LayoutGraph,
    dim: usize,
    strategy: Strategy,
    reduction: Reduction,
    matrix: Option<&FeatureMatrix>,
    reducer: &R,
) -> Result<Layout> {
    LayoutBuilder::new()
        .dim(dim)
        .strategy(strategy)
        .reduction(reduction)
        .generate(graph, matrix, reducer)
}

/// Generates a geodesic layout: nodes on spherical shells whose radius comes from
/// `radii`.
///
/// Without a matrix (or with an empty one) the random walk features of the graph are
/// used.
pub fn generate_geodesic_layout<R: Reducer + ?Sized>(
    graph: &LayoutGraph,
    radii: &RadiusMap,
    matrix: Option<&FeatureMatrix>,
    params: &UmapParams,
    reducer: &R,
    options: &SphereOptions,
) -> Result<SpatialMap> {
    let features = match matrix {
        Some(matrix) if !matrix.is_empty() => Cow::Borrowed(matrix),
        _ => Cow::Owned(random_walk_matrix(graph, RandomWalk::default())?),
    };
    info!(
        "Generating geodesic layout for {} nodes ({} radii)",
        graph.node_count(),
        radii.len()
    );

    let rows = reducer
        .reduce_sphere(&features, params)
        .map_err(LayoutError::Reduction)?;
    let embedding = Embedding::<SphericalAngles>::from_rows(features.row_ids(), &rows)?;
    map_sphere(&graph.node_ids(), &embedding, radii, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeId;
    use std::cell::Cell;

    /// Takes the first `dim` feature columns, padding with the row index.
    struct FirstColumns {
        calls: Cell<usize>,
    }

    impl FirstColumns {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
            }
        }
    }

    impl Reducer for FirstColumns {
        fn reduce(
            &self,
            features: &FeatureMatrix,
            _method: &Reduction,
            dim: usize,
        ) -> std::result::Result<Vec<Vec<f64>>, BoxError> {
            self.calls.set(self.calls.get() + 1);
            Ok((0..features.nrows())
                .map(|r| {
                    let row = features.row(r);
                    (0..dim)
                        .map(|c| row.get(c).copied().unwrap_or(r as f64))
                        .collect()
                })
                .collect())
        }
    }

    struct Broken;

    impl Reducer for Broken {
        fn reduce(
            &self,
            _features: &FeatureMatrix,
            _method: &Reduction,
            _dim: usize,
        ) -> std::result::Result<Vec<Vec<f64>>, BoxError> {
            Err("backend crashed".into())
        }
    }

    fn square() -> LayoutGraph {
        LayoutGraph::from_edges([("a", "b"), ("b", "c"), ("c", "d"), ("d", "a"), ("a", "c")])
    }

    #[test]
    fn dispatches_each_strategy() {
        let graph = square();
        for strategy in [
            Strategy::Local,
            Strategy::Global(RandomWalk::default()),
            Strategy::Importance,
        ] {
            for dim in [2, 3] {
                let reducer = FirstColumns::new();
                let layout =
                    generate_layout(&graph, dim, strategy, Reduction::default(), None, &reducer)
                        .unwrap();
                assert_eq!(layout.dim(), dim);
                assert_eq!(layout.len(), 4);
                assert_eq!(reducer.calls.get(), 1);
            }
        }
    }

    #[test]
    fn functional_uses_the_given_matrix() {
        let graph = square();
        let matrix = FeatureMatrix::from_rows([
            ("c", vec![0.0, 1.0]),
            ("a", vec![2.0, 3.0]),
        ])
        .unwrap();

        let layout = generate_layout(
            &graph,
            2,
            Strategy::Functional,
            Reduction::Tsne(TsneParams::default()),
            Some(&matrix),
            &FirstColumns::new(),
        )
        .unwrap();

        let planar = layout.as_planar().unwrap();
        let keys: Vec<_> = planar.keys().map(NodeId::as_str).collect();
        assert_eq!(keys, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn misuse_fails_loudly() {
        let graph = square();
        let reducer = FirstColumns::new();

        let err = generate_layout(&graph, 4, Strategy::Local, Reduction::default(), None, &reducer)
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidDimension { dim: 4 }));

        let err = generate_layout(
            &graph,
            2,
            Strategy::Functional,
            Reduction::default(),
            None,
            &reducer,
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidStrategy { .. }));
        assert_eq!(reducer.calls.get(), 0);
    }

    #[test]
    fn reducer_errors_pass_through() {
        let err = generate_layout(
            &square(),
            3,
            Strategy::Local,
            Reduction::default(),
            None,
            &Broken,
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::Reduction(_)));
        assert_eq!(err.to_string(), "backend crashed");
    }

    #[test]
    fn geodesic_needs_spherical_support() {
        let err = generate_geodesic_layout(
            &square(),
            &RadiusMap::new(),
            None,
            &UmapParams::default(),
            &FirstColumns::new(),
            &SphereOptions::new(),
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::Reduction(_)));
    }
}
