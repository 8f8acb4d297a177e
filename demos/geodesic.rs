use cartograph::prelude::*;
use petgraph::Undirected;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::f64::consts::{PI, TAU};

/// Projects every feature row onto fixed random directions.
///
/// Stands in for a real UMAP or t-SNE binding.
struct RandomProjection {
    seed: u64,
}

impl RandomProjection {
    fn project(&self, features: &FeatureMatrix, dim: usize) -> Vec<Vec<f64>> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let directions: Vec<Vec<f64>> = (0..dim)
            .map(|_| (0..features.ncols()).map(|_| rng.gen_range(-1.0..1.0)).collect())
            .collect();
        (0..features.nrows())
            .map(|r| {
                let row = features.row(r);
                directions
                    .iter()
                    .map(|d| d.iter().zip(&row).map(|(a, b)| a * b).sum())
                    .collect()
            })
            .collect()
    }
}

impl Reducer for RandomProjection {
    fn reduce(
        &self,
        features: &FeatureMatrix,
        _method: &Reduction,
        dim: usize,
    ) -> Result<Vec<Vec<f64>>, BoxError> {
        Ok(self.project(features, dim))
    }

    fn reduce_sphere(
        &self,
        features: &FeatureMatrix,
        _params: &UmapParams,
    ) -> Result<Vec<[f64; 2]>, BoxError> {
        let squash = |v: f64| 1.0 / (1.0 + (-10.0 * v).exp());
        Ok(self
            .project(features, 2)
            .into_iter()
            .map(|row| [PI * squash(row[0]), TAU * squash(row[1])])
            .collect())
    }
}

#[derive(Serialize)]
struct Point {
    id: String,
    x: f64,
    y: f64,
    z: f64,
}

fn main() -> Result<(), BoxError> {
    let mut rng = StdRng::seed_from_u64(1);
    let graph: petgraph::Graph<(), (), Undirected> =
        petgraph_gen::barabasi_albert_graph(&mut rng, 200, 1, None);
    let graph = LayoutGraph::from(&graph);

    // Hubs go on the inner shells.
    let centrality = centrality_matrix(&graph)?;
    let radii: RadiusMap = centrality
        .row_ids()
        .iter()
        .enumerate()
        .take(150)
        .map(|(r, id)| (id.clone(), 1.0 + 4.0 * (1.0 - centrality.row(r)[0])))
        .collect();

    let layout = generate_geodesic_layout(
        &graph,
        &radii,
        None,
        &UmapParams::default(),
        &RandomProjection { seed: 3 },
        &SphereOptions::new(),
    )?;

    let points: Vec<Point> = layout
        .iter()
        .map(|(id, p)| Point {
            id: id.to_string(),
            x: p.x,
            y: p.y,
            z: p.z,
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&points)?);
    Ok(())
}
