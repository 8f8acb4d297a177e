//! Centrality vector per node, the "importance" feature matrix.
//!
//! Values follow the usual normalized definitions, so they can be compared with the
//! common graph toolkits:
//! - degree: `deg / (n - 1)`, self loops counting twice
//! - closeness: Wasserman-Faust, scaled by the reachable share of the graph
//! - betweenness: Brandes, normalized by `(n - 1)(n - 2)`
//! - eigenvector: power iteration on `A + I`

use crate::error::{LayoutError, Result};
use crate::features::{neighbor_lists, FeatureMatrix};
use crate::graph::LayoutGraph;
use nalgebra::DMatrix;
use std::collections::VecDeque;

pub const CENTRALITY_COLUMNS: [&str; 4] = ["degree", "closeness", "betweenness", "eigenvector"];

const EIGENVECTOR_MAX_ITERATIONS: usize = 100;
const EIGENVECTOR_TOLERANCE: f64 = 1e-6;

/// One row per node in graph order with the columns of [`CENTRALITY_COLUMNS`].
pub fn centrality_matrix(graph: &LayoutGraph) -> Result<FeatureMatrix> {
    let n = graph.node_count();
    let neighbors = neighbor_lists(graph);

    let columns = [
        degree(graph),
        closeness(&neighbors),
        betweenness(&neighbors),
        eigenvector(graph)?,
    ];
    let data = DMatrix::from_fn(n, columns.len(), |r, c| columns[c][r]);

    FeatureMatrix::with_columns(
        graph.node_ids(),
        CENTRALITY_COLUMNS.iter().map(|c| c.to_string()).collect(),
        data,
    )
}

fn degree(graph: &LayoutGraph) -> Vec<f64> {
    let n = graph.node_count();
    let mut degrees = vec![0.0; n];
    for (a, b) in graph.edges() {
        degrees[a] += 1.0;
        degrees[b] += 1.0;
    }
    if n <= 1 {
        return vec![1.0; n];
    }
    let scale = 1.0 / (n - 1) as f64;
    degrees.into_iter().map(|d| d * scale).collect()
}

/// Hop distances from `source`, `None` for unreachable nodes.
fn bfs_distances(neighbors: &[Vec<usize>], source: usize) -> Vec<Option<usize>> {
    let mut distances = vec![None; neighbors.len()];
    distances[source] = Some(0);
    let mut queue = VecDeque::from([source]);
    while let Some(node) = queue.pop_front() {
        let next = distances[node].map_or(0, |d| d + 1);
        for &neighbor in &neighbors[node] {
            if distances[neighbor].is_none() {
                distances[neighbor] = Some(next);
                queue.push_back(neighbor);
            }
        }
    }
    distances
}

fn closeness(neighbors: &[Vec<usize>]) -> Vec<f64> {
    let n = neighbors.len();
    (0..n)
        .map(|source| {
            let reached: Vec<usize> = bfs_distances(neighbors, source).into_iter().flatten().collect();
            let total: usize = reached.iter().sum();
            if total == 0 || n <= 1 {
                return 0.0;
            }
            let others = (reached.len() - 1) as f64;
            (others / total as f64) * (others / (n - 1) as f64)
        })
        .collect()
}

fn betweenness(neighbors: &[Vec<usize>]) -> Vec<f64> {
    let n = neighbors.len();
    let mut centrality = vec![0.0; n];

    for source in 0..n {
        let mut stack = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut paths = vec![0.0; n];
        let mut distance: Vec<Option<usize>> = vec![None; n];
        paths[source] = 1.0;
        distance[source] = Some(0);

        let mut queue = VecDeque::from([source]);
        while let Some(node) = queue.pop_front() {
            stack.push(node);
            let next = distance[node].map_or(0, |d| d + 1);
            for &neighbor in &neighbors[node] {
                if distance[neighbor].is_none() {
                    distance[neighbor] = Some(next);
                    queue.push_back(neighbor);
                }
                if distance[neighbor] == Some(next) {
                    paths[neighbor] += paths[node];
                    predecessors[neighbor].push(node);
                }
            }
        }

        let mut dependency = vec![0.0; n];
        while let Some(node) = stack.pop() {
            for &predecessor in &predecessors[node] {
                dependency[predecessor] += paths[predecessor] / paths[node] * (1.0 + dependency[node]);
            }
            if node != source {
                centrality[node] += dependency[node];
            }
        }
    }

    // Every unordered pair was visited from both ends.
    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        centrality.iter_mut().for_each(|c| *c *= scale);
    }
    centrality
}

fn eigenvector(graph: &LayoutGraph) -> Result<Vec<f64>> {
    let n = graph.node_count();
    if n == 0 {
        return Ok(Vec::new());
    }

    // Self loops contribute once, like every other neighbor.
    let mut adjacency = vec![Vec::new(); n];
    for (a, b) in graph.edges() {
        adjacency[a].push(b);
        if a != b {
            adjacency[b].push(a);
        }
    }

    let mut x = vec![1.0 / n as f64; n];
    for _ in 0..EIGENVECTOR_MAX_ITERATIONS {
        let last = x.clone();
        for (node, neighbors) in adjacency.iter().enumerate() {
            for &neighbor in neighbors {
                x[neighbor] += last[node];
            }
        }
        let norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
        let norm = if norm == 0.0 { 1.0 } else { norm };
        x.iter_mut().for_each(|v| *v /= norm);

        let change: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if change < n as f64 * EIGENVECTOR_TOLERANCE {
            return Ok(x);
        }
    }

    Err(LayoutError::NoConvergence {
        iterations: EIGENVECTOR_MAX_ITERATIONS,
    })
}
