//! Density-Based Spatial Clustering of Applications with Noise (DBSCAN)
//!
//! The number of groups comes from the data. A point is a core point when at least
//! `min_samples` points (itself included) lie within `eps`; clusters grow from core
//! points in input order, and points reachable from no core point are noise.

use super::ClusterLabel;
use crate::services::geo::distance;
use crate::types::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointState {
    Unvisited,
    Noise,
    Clustered(usize),
}

/// Label every point; cluster ids are contiguous from 0 in discovery order.
pub fn fit(points: &[Coordinates], eps: f64, min_samples: usize) -> Vec<ClusterLabel> {
    let n = points.len();
    let mut states = vec![PointState::Unvisited; n];
    let mut next_cluster = 0;

    for i in 0..n {
        if states[i] != PointState::Unvisited {
            continue;
        }

        let neighbors = region_query(points, i, eps);
        if neighbors.len() < min_samples {
            states[i] = PointState::Noise;
            continue;
        }

        let cluster = next_cluster;
        next_cluster += 1;
        states[i] = PointState::Clustered(cluster);

        let mut queued = vec![false; n];
        for &j in &neighbors {
            queued[j] = true;
        }
        let mut queue = neighbors;
        let mut index = 0;

        while index < queue.len() {
            let j = queue[index];
            index += 1;

            match states[j] {
                PointState::Clustered(_) => continue,
                // border point: reachable but not dense itself
                PointState::Noise => {
                    states[j] = PointState::Clustered(cluster);
                    continue;
                }
                PointState::Unvisited => states[j] = PointState::Clustered(cluster),
            }

            let expansion = region_query(points, j, eps);
            if expansion.len() >= min_samples {
                for k in expansion {
                    if !queued[k] {
                        queued[k] = true;
                        queue.push(k);
                    }
                }
            }
        }
    }

    states
        .into_iter()
        .map(|state| match state {
            PointState::Clustered(c) => ClusterLabel::Cluster(c),
            _ => ClusterLabel::Noise,
        })
        .collect()
}

/// Indices within `eps` of point `i`, itself included, in input order
fn region_query(points: &[Coordinates], i: usize, eps: f64) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| distance(&points[i], p) <= eps)
        .map(|(j, _)| j)
        .collect()
}
