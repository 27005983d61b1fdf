//! K-Means over stop coordinates
//!
//! k-means++ seeding, Lloyd iterations, several restarts from one seeded RNG; the
//! restart with the lowest inertia wins. Empty clusters are refilled with the point
//! farthest from its centroid, so `1 <= k <= n` always yields `k` non-empty groups.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::services::config::ClusteringConfig;
use crate::services::geo::{centroid, squared_distance};
use crate::types::Coordinates;

/// Outcome of one k-means fit
#[derive(Debug, Clone)]
pub struct KMeansFit {
    /// Label per input point, numbered by first appearance in input order
    pub labels: Vec<usize>,
    pub centroids: Vec<Coordinates>,
    /// Total squared distance of points to their centroid
    pub inertia: f64,
    /// Lloyd iterations used by the winning restart
    pub iterations: usize,
}

/// Partition `points` into exactly `k` groups. Caller guarantees `1 <= k <= points.len()`.
pub fn fit(points: &[Coordinates], k: usize, config: &ClusteringConfig) -> KMeansFit {
    if points.is_empty() || k == 0 {
        return KMeansFit {
            labels: vec![],
            centroids: vec![],
            inertia: 0.0,
            iterations: 0,
        };
    }
    let k = k.min(points.len());

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut best: Option<KMeansFit> = None;

    for restart in 0..config.kmeans_restarts.max(1) {
        let candidate = run_once(points, k, config, &mut rng);
        debug!(
            "k-means restart {}: inertia={:.6} iterations={}",
            restart, candidate.inertia, candidate.iterations
        );
        let better = match &best {
            Some(current) => candidate.inertia < current.inertia,
            None => true,
        };
        if better {
            best = Some(candidate);
        }
    }

    let best = best.unwrap_or_else(|| run_once(points, k, config, &mut rng));
    relabel_by_first_appearance(best, k)
}

fn run_once(points: &[Coordinates], k: usize, config: &ClusteringConfig, rng: &mut StdRng) -> KMeansFit {
    let mut centroids = seed_plus_plus(points, k, rng);
    let mut labels = vec![0usize; points.len()];
    let mut iterations = 0;

    for _ in 0..config.kmeans_max_iterations.max(1) {
        iterations += 1;
        assign_nearest(points, &centroids, &mut labels);
        repair_empty_clusters(points, &centroids, &mut labels, k);

        let updated = recompute_centroids(points, &labels, &centroids);
        let shift = centroids
            .iter()
            .zip(&updated)
            .map(|(old, new)| squared_distance(old, new))
            .fold(0.0, f64::max)
            .sqrt();
        centroids = updated;

        if shift <= config.kmeans_tolerance {
            break;
        }
    }

    assign_nearest(points, &centroids, &mut labels);
    repair_empty_clusters(points, &centroids, &mut labels, k);
    let centroids = recompute_centroids(points, &labels, &centroids);
    let inertia = points
        .iter()
        .zip(&labels)
        .map(|(p, &label)| squared_distance(p, &centroids[label]))
        .sum();

    KMeansFit {
        labels,
        centroids,
        inertia,
        iterations,
    }
}

/// k-means++: first centroid uniform, the rest drawn proportional to squared
/// distance from the nearest chosen centroid.
fn seed_plus_plus(points: &[Coordinates], k: usize, rng: &mut StdRng) -> Vec<Coordinates> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..n)]);

    let mut nearest_sq: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = nearest_sq.iter().sum();

        let chosen = if total > 0.0 {
            let target = rng.gen::<f64>() * total;
            let mut cumulative = 0.0;
            let mut pick = None;
            for (i, &d) in nearest_sq.iter().enumerate() {
                if d <= 0.0 {
                    continue;
                }
                cumulative += d;
                pick = Some(i);
                if cumulative >= target {
                    break;
                }
            }
            pick.unwrap_or_else(|| rng.gen_range(0..n))
        } else {
            // Every point coincides with a centroid already
            rng.gen_range(0..n)
        };

        let c = points[chosen];
        centroids.push(c);
        for (d, p) in nearest_sq.iter_mut().zip(points) {
            *d = d.min(squared_distance(p, &c));
        }
    }

    centroids
}

fn assign_nearest(points: &[Coordinates], centroids: &[Coordinates], labels: &mut [usize]) {
    for (label, point) in labels.iter_mut().zip(points) {
        let mut best = 0;
        let mut best_d = f64::INFINITY;
        for (j, c) in centroids.iter().enumerate() {
            let d = squared_distance(point, c);
            if d < best_d {
                best_d = d;
                best = j;
            }
        }
        *label = best;
    }
}

/// Give every empty cluster the point farthest from its own centroid,
/// taken from a cluster that keeps at least one member.
fn repair_empty_clusters(points: &[Coordinates], centroids: &[Coordinates], labels: &mut [usize], k: usize) {
    let mut counts = vec![0usize; k];
    for &label in labels.iter() {
        counts[label] += 1;
    }

    for empty in 0..k {
        if counts[empty] > 0 {
            continue;
        }

        let mut donor: Option<(usize, f64)> = None;
        for (i, (&label, point)) in labels.iter().zip(points).enumerate() {
            if counts[label] <= 1 {
                continue;
            }
            let d = squared_distance(point, &centroids[label]);
            match donor {
                Some((_, best_d)) if d <= best_d => {}
                _ => donor = Some((i, d)),
            }
        }

        if let Some((i, _)) = donor {
            counts[labels[i]] -= 1;
            labels[i] = empty;
            counts[empty] += 1;
        }
    }
}

fn recompute_centroids(points: &[Coordinates], labels: &[usize], previous: &[Coordinates]) -> Vec<Coordinates> {
    let mut members: Vec<Vec<Coordinates>> = vec![Vec::new(); previous.len()];
    for (point, &label) in points.iter().zip(labels) {
        members[label].push(*point);
    }

    members
        .iter()
        .zip(previous)
        .map(|(group, old)| centroid(group).unwrap_or(*old))
        .collect()
}

fn relabel_by_first_appearance(fit: KMeansFit, k: usize) -> KMeansFit {
    let mut mapping: Vec<Option<usize>> = vec![None; k];
    let mut next = 0;
    for &label in &fit.labels {
        if mapping[label].is_none() {
            mapping[label] = Some(next);
            next += 1;
        }
    }

    let mut centroids = fit.centroids.clone();
    for (old, new) in mapping.iter().enumerate() {
        if let Some(new) = new {
            centroids[*new] = fit.centroids[old];
        }
    }

    KMeansFit {
        labels: fit
            .labels
            .iter()
            .map(|&label| mapping[label].unwrap_or(label))
            .collect(),
        centroids,
        inertia: fit.inertia,
        iterations: fit.iterations,
    }
}
