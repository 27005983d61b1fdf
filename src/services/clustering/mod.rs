//! Cluster assignment
//!
//! Splits the delivery stops (depot excluded) into one group per vehicle.
//! Labelling never touches the loaded stops: it produces a new labelled collection.

mod dbscan;
mod kmeans;
mod ranked;

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::config::ClusteringConfig;
use crate::error::{PlannerError, Result};
use crate::types::{Coordinates, Stop};

/// Group label assigned to a stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClusterLabel {
    /// Not in any dense neighborhood; excluded from routing
    Noise,
    Cluster(usize),
}

impl ClusterLabel {
    pub const fn group(self) -> Option<usize> {
        match self {
            ClusterLabel::Noise => None,
            ClusterLabel::Cluster(c) => Some(c),
        }
    }
}

/// How stops are grouped into vehicles
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClusteringMode {
    /// Exactly `vehicles` groups (K-Means)
    FixedCount { vehicles: usize },
    /// Group count inferred from density (DBSCAN)
    Density { eps: f64, min_samples: usize },
    /// Stops ranked by depot distance and dealt round-robin to `vehicles` groups
    Ranked { vehicles: usize },
}

impl ClusteringMode {
    pub fn density_from(config: &ClusteringConfig) -> Self {
        ClusteringMode::Density {
            eps: config.dbscan_eps,
            min_samples: config.dbscan_min_samples,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            ClusteringMode::FixedCount { .. } => "fixed-count",
            ClusteringMode::Density { .. } => "density",
            ClusteringMode::Ranked { .. } => "ranked",
        }
    }

    /// Human-readable description used as diagram caption
    pub fn describe(&self) -> String {
        match self {
            ClusteringMode::FixedCount { vehicles } => format!("K-Means, K={}", vehicles),
            ClusteringMode::Density { eps, min_samples } => {
                format!("DBSCAN, Dynamic K, eps={}, min_samples={}", eps, min_samples)
            }
            ClusteringMode::Ranked { vehicles } => format!("Distance-ranked, K={}", vehicles),
        }
    }
}

/// Stops grouped by label, noise kept aside
#[derive(Debug, Clone, Default)]
pub struct Clusters {
    /// Ordered by label; members keep input order
    pub groups: BTreeMap<usize, Vec<Stop>>,
    pub noise: Vec<Stop>,
}

impl Clusters {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn assigned_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Label each stop according to `mode`. Output is parallel to `stops`.
pub fn label_stops(
    stops: &[Stop],
    depot: &Coordinates,
    mode: &ClusteringMode,
    config: &ClusteringConfig,
) -> Result<Vec<ClusterLabel>> {
    let points: Vec<Coordinates> = stops.iter().map(|s| s.coordinates).collect();

    let labels = match *mode {
        ClusteringMode::FixedCount { vehicles } => {
            validate_vehicle_count(vehicles, points.len())?;
            let fit = kmeans::fit(&points, vehicles, config);
            debug!(
                "k-means converged: inertia={:.6} iterations={}",
                fit.inertia, fit.iterations
            );
            fit.labels.into_iter().map(ClusterLabel::Cluster).collect()
        }
        ClusteringMode::Density { eps, min_samples } => {
            if !(eps > 0.0) || min_samples == 0 {
                return Err(PlannerError::configuration(format!(
                    "density clustering needs eps > 0 and min_samples >= 1 (got eps={}, min_samples={})",
                    eps, min_samples
                )));
            }
            dbscan::fit(&points, eps, min_samples)
        }
        ClusteringMode::Ranked { vehicles } => {
            validate_vehicle_count(vehicles, points.len())?;
            ranked::fit(&points, depot, vehicles)
                .into_iter()
                .map(ClusterLabel::Cluster)
                .collect()
        }
    };

    Ok(labels)
}

/// Collect stops per label, dropping noise into `Clusters::noise`
pub fn group_by_label(stops: &[Stop], labels: &[ClusterLabel]) -> Clusters {
    let mut clusters = Clusters::default();

    for (stop, label) in stops.iter().zip(labels) {
        match label.group() {
            Some(group) => clusters.groups.entry(group).or_default().push(stop.clone()),
            None => {
                debug!("Stop '{}' labelled noise, excluded from routing", stop.name);
                clusters.noise.push(stop.clone());
            }
        }
    }

    clusters
}

/// Label and group in one step
pub fn assign_clusters(
    stops: &[Stop],
    depot: &Coordinates,
    mode: &ClusteringMode,
    config: &ClusteringConfig,
) -> Result<Clusters> {
    let labels = label_stops(stops, depot, mode, config)?;
    let clusters = group_by_label(stops, &labels);

    info!(
        "Clustered {} stops into {} groups ({}), {} noise",
        stops.len(),
        clusters.len(),
        mode.name(),
        clusters.noise.len()
    );

    Ok(clusters)
}

fn validate_vehicle_count(vehicles: usize, stops: usize) -> Result<()> {
    if vehicles == 0 {
        return Err(PlannerError::configuration("vehicle count must be a positive integer"));
    }
    if vehicles > stops {
        return Err(PlannerError::configuration(format!(
            "vehicle count {} exceeds the {} delivery stops",
            vehicles, stops
        )));
    }
    Ok(())
}
