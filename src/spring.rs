//! Force directed spring layout (Fruchterman-Reingold) for graphs without an embedding.
//!
//! Nodes repel each other with `k^2 / d` and edges pull with `d^2 / k`. Every step moves
//! each node by the current temperature along its net force, and the temperature cools
//! linearly to zero. The final positions are normalized like every other layout.

use crate::error::Result;
use crate::features::adjacency_matrix;
use crate::geometry::{normalize_points, Coordinate, DegeneratePolicy, DEFAULT_PRECISION};
use crate::graph::{CoordinateMap, LayoutGraph, PlanarMap, SpatialMap};
use glam::{DVec2, DVec3};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Distances are clipped to this value so coincident nodes still push apart.
const MIN_DISTANCE: f64 = 0.01;

pub struct SpringLayout {
    iterations: usize,
    seed: u64,
    optimal_distance: Option<f64>,
    threshold: f64,
    policy: DegeneratePolicy,
    precision: Option<u32>,
}

impl SpringLayout {
    pub fn builder() -> SpringLayoutBuilder {
        SpringLayoutBuilder::default()
    }

    /// Normalized 2D spring layout of `graph`.
    pub fn layout_2d(&self, graph: &LayoutGraph) -> Result<PlanarMap> {
        self.layout::<DVec2>(graph)
    }

    /// Normalized 3D spring layout of `graph`.
    pub fn layout_3d(&self, graph: &LayoutGraph) -> Result<SpatialMap> {
        self.layout::<DVec3>(graph)
    }

    fn layout<P: Coordinate>(&self, graph: &LayoutGraph) -> Result<CoordinateMap<P>> {
        info!(
            "Spring layout for {} nodes in {}D ({} iterations)",
            graph.node_count(),
            P::DIM,
            self.iterations
        );
        let positions = self.simulate::<P>(graph)?;
        let positions = normalize_points(&positions, self.policy, self.precision)?;
        Ok(graph.nodes().cloned().zip(positions).collect())
    }

    /// Raw positions in graph order.
    fn simulate<P: Coordinate>(&self, graph: &LayoutGraph) -> Result<Vec<P>> {
        let n = graph.node_count();
        if n <= 1 {
            return Ok(vec![P::ZERO; n]);
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut axes = vec![0.0; P::DIM];
        let mut positions: Vec<P> = (0..n)
            .map(|_| {
                axes.iter_mut().for_each(|a| *a = rng.gen::<f64>());
                P::from_axes(&axes)
            })
            .collect();

        let adjacency = adjacency_matrix(graph)?;
        let adjacency = adjacency.data();
        let k = self
            .optimal_distance
            .unwrap_or_else(|| (1.0 / n as f64).sqrt());

        let mut temperature = extent(&positions) * 0.1;
        let cooling = temperature / (self.iterations + 1) as f64;

        for iteration in 0..self.iterations {
            let mut moved = 0.0;
            let displacements: Vec<P> = (0..n)
                .map(|i| {
                    let mut force = P::ZERO;
                    for j in 0..n {
                        let delta = positions[i] - positions[j];
                        let distance = delta.norm().max(MIN_DISTANCE);
                        let repulsion = k * k / (distance * distance);
                        let attraction = adjacency[(i, j)] * distance / k;
                        force = force + delta * (repulsion - attraction);
                    }
                    force
                })
                .collect();

            for (position, force) in positions.iter_mut().zip(displacements) {
                let length = force.norm();
                let length = if length < MIN_DISTANCE { 0.1 } else { length };
                let step = force * (temperature / length);
                moved += step.norm().powi(2);
                *position = *position + step;
            }

            temperature -= cooling;
            if moved.sqrt() / (n as f64) < self.threshold {
                debug!("Spring layout converged after {} iterations", iteration + 1);
                break;
            }
        }

        Ok(positions)
    }
}

/// Largest spread of `positions` along any axis.
fn extent<P: Coordinate>(positions: &[P]) -> f64 {
    (0..P::DIM)
        .map(|axis| {
            let values = positions.iter().map(|p| p.axis(axis));
            let max = values.clone().fold(f64::NEG_INFINITY, f64::max);
            let min = values.fold(f64::INFINITY, f64::min);
            max - min
        })
        .fold(0.0, f64::max)
}

/// Builder for `SpringLayout`
pub struct SpringLayoutBuilder {
    iterations: usize,
    seed: u64,
    optimal_distance: Option<f64>,
    threshold: f64,
    policy: DegeneratePolicy,
    precision: Option<u32>,
}

impl SpringLayoutBuilder {
    /// Get a Instance of `SpringLayoutBuilder` with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum number of simulation steps.
    ///
    /// Default: `50`
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Seed for the initial positions.
    ///
    /// Default: `42`
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Preferred distance between connected nodes.
    ///
    /// Default: `1 / sqrt(node count)`
    pub fn optimal_distance(mut self, distance: f64) -> Self {
        self.optimal_distance = Some(distance);
        self
    }

    /// Stop once the mean movement per node falls below `threshold`.
    ///
    /// Default: `1e-4`
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
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

    /// Constructs a instance of `SpringLayout`
    pub fn build(self) -> SpringLayout {
        SpringLayout {
            iterations: self.iterations,
            seed: self.seed,
            optimal_distance: self.optimal_distance,
            threshold: self.threshold,
            policy: self.policy,
            precision: self.precision,
        }
    }
}

impl Default for SpringLayoutBuilder {
    /// Get a Instance of `SpringLayoutBuilder` with default values
    fn default() -> Self {
        Self {
            iterations: 50,
            seed: 42,
            optimal_distance: None,
            threshold: 1e-4,
            policy: DegeneratePolicy::Zero,
            precision: Some(DEFAULT_PRECISION),
        }
    }
}
