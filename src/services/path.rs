//! Path builder
//!
//! Orders one cluster's stops with the nearest-neighbor heuristic. This is not an
//! optimal tour: late long "backtrack" legs are expected and priced by the
//! surcharge evaluator.

use tracing::debug;

use super::config::PathStart;
use super::geo;
use crate::types::{Coordinates, Stop};

/// Order stops by repeatedly visiting the nearest unvisited one.
///
/// Ties go to the stop that comes first in input order. Returns a permutation of
/// `stops`; empty input gives an empty path.
pub fn build_path(stops: &[Stop], depot: &Coordinates, start: PathStart) -> Vec<Stop> {
    let points: Vec<Coordinates> = stops.iter().map(|s| s.coordinates).collect();
    let start_idx = match start {
        PathStart::FirstInput => 0,
        PathStart::NearestToDepot => nearest_index(&points, depot, |_| true).unwrap_or(0),
    };

    let order = nearest_neighbor_order(&points, start_idx);
    debug!("Built path over {} stops starting at index {}", order.len(), start_idx);

    order.into_iter().map(|i| stops[i].clone()).collect()
}

/// Nearest neighbor heuristic
/// Returns indices into `points` in visit order, beginning with `start`
pub fn nearest_neighbor_order(points: &[Coordinates], start: usize) -> Vec<usize> {
    let n = points.len();
    if n == 0 {
        return vec![];
    }
    let start = start.min(n - 1);

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);

    visited[start] = true;
    order.push(start);
    let mut current = start;

    for _ in 1..n {
        let next = match nearest_index(points, &points[current], |j| !visited[j]) {
            Some(next) => next,
            None => break,
        };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    order
}

/// Index of the point nearest to `from` among those accepted by `eligible`.
/// Strict comparison keeps the first of equally distant points.
fn nearest_index<F>(points: &[Coordinates], from: &Coordinates, eligible: F) -> Option<usize>
where
    F: Fn(usize) -> bool,
{
    let mut best: Option<(usize, f64)> = None;

    for (j, point) in points.iter().enumerate() {
        if !eligible(j) {
            continue;
        }
        let d = geo::distance(from, point);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((j, d)),
        }
    }

    best.map(|(j, _)| j)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(path: &[Stop]) -> Vec<&str> {
        path.iter().map(|s| s.name.as_str()).collect()
    }

    fn origin() -> Coordinates {
        Coordinates::new(0.0, 0.0)
    }

    #[test]
    fn test_empty_input() {
        assert!(build_path(&[], &origin(), PathStart::FirstInput).is_empty());
        assert!(nearest_neighbor_order(&[], 0).is_empty());
    }

    #[test]
    fn test_single_stop() {
        let stops = vec![Stop::retailer("Only", 1.0, 1.0)];
        let path = build_path(&stops, &origin(), PathStart::FirstInput);
        assert_eq!(names(&path), vec!["Only"]);
    }

    #[test]
    fn test_starts_at_first_input_stop() {
        let stops = vec![
            Stop::retailer("Far", 0.0, 10.0),
            Stop::retailer("Near", 0.0, 1.0),
            Stop::retailer("Mid", 0.0, 5.0),
        ];

        let path = build_path(&stops, &origin(), PathStart::FirstInput);

        // Far -> Mid (5 away) -> Near (4 away)
        assert_eq!(names(&path), vec!["Far", "Mid", "Near"]);
    }

    #[test]
    fn test_nearest_to_depot_start() {
        let stops = vec![
            Stop::retailer("Far", 0.0, 10.0),
            Stop::retailer("Near", 0.0, 1.0),
            Stop::retailer("Mid", 0.0, 5.0),
        ];

        let path = build_path(&stops, &origin(), PathStart::NearestToDepot);

        assert_eq!(names(&path), vec!["Near", "Mid", "Far"]);
    }

    #[test]
    fn test_ties_broken_by_input_order() {
        let stops = vec![
            Stop::retailer("Start", 0.0, 0.0),
            Stop::retailer("East", 0.0, 1.0),
            Stop::retailer("West", 0.0, -1.0),
        ];

        let path = build_path(&stops, &origin(), PathStart::FirstInput);

        assert_eq!(names(&path), vec!["Start", "East", "West"]);
    }

    #[test]
    fn test_result_is_permutation() {
        let points: Vec<Coordinates> = (0..25)
            .map(|i| {
                let t = i as f64;
                Coordinates::new((t * 1.7).sin() * 3.0, (t * 0.9).cos() * 5.0)
            })
            .collect();

        let order = nearest_neighbor_order(&points, 7);

        assert_eq!(order.len(), points.len());
        assert_eq!(order[0], 7);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..points.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_colocated_stops_all_visited() {
        let stops = vec![
            Stop::retailer("A", 1.0, 1.0),
            Stop::retailer("B", 1.0, 1.0),
            Stop::retailer("C", 1.0, 1.0),
        ];
        let path = build_path(&stops, &origin(), PathStart::FirstInput);
        assert_eq!(names(&path), vec!["A", "B", "C"]);
    }
}
