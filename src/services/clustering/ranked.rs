//! Distance-ranked dealing
//!
//! Stops are ranked by distance from the depot and dealt round-robin to `k`
//! vehicles, so every vehicle gets a mix of near and far stops.

use crate::services::geo::distance;
use crate::types::Coordinates;

/// Label per point: `rank mod k`, rank by ascending depot distance (stable).
pub fn fit(points: &[Coordinates], depot: &Coordinates, k: usize) -> Vec<usize> {
    if k == 0 {
        return vec![];
    }

    let mut ranked: Vec<(usize, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, distance(depot, p)))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut labels = vec![0usize; points.len()];
    for (rank, (i, _)) in ranked.into_iter().enumerate() {
        labels[i] = rank % k;
    }
    labels
}
