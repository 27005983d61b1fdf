//! Planner configuration

use std::str::FromStr;

use crate::defaults::*;
use crate::error::{PlannerError, Result};

/// Configuration for a planning run
#[derive(Debug, Clone, Default)]
pub struct PlannerConfig {
    pub data: DataConfig,
    pub clustering: ClusteringConfig,
    pub pricing: PricingConfig,
    pub path_start: PathStart,
    pub render: RenderConfig,
}

impl PlannerConfig {
    /// Reject tunables that cannot produce a meaningful plan
    pub fn validate(&self) -> Result<()> {
        let c = &self.clustering;
        if !(c.dbscan_eps > 0.0) {
            return Err(PlannerError::configuration(format!(
                "dbscan eps must be positive (got {})",
                c.dbscan_eps
            )));
        }
        if c.dbscan_min_samples == 0 {
            return Err(PlannerError::configuration("dbscan min_samples must be at least 1"));
        }
        if c.kmeans_restarts == 0 || c.kmeans_max_iterations == 0 {
            return Err(PlannerError::configuration(
                "k-means restarts and max iterations must be at least 1",
            ));
        }

        let p = &self.pricing;
        if !(p.outlier_threshold > 0.0) {
            return Err(PlannerError::configuration(format!(
                "outlier threshold must be positive (got {})",
                p.outlier_threshold
            )));
        }
        if !(p.billing_unit_km > 0.0) {
            return Err(PlannerError::configuration(format!(
                "billing unit must be positive (got {} km)",
                p.billing_unit_km
            )));
        }
        if p.km_per_degree < 0.0 || p.rate_per_unit < 0.0 {
            return Err(PlannerError::configuration(
                "km per degree and surcharge rate must not be negative",
            ));
        }

        if self.render.width == 0 || self.render.height == 0 {
            return Err(PlannerError::configuration("image size must be non-zero"));
        }
        Ok(())
    }
}

/// Input handling
#[derive(Debug, Clone)]
pub struct DataConfig {
    /// Store-kind value marking the depot (case-insensitive)
    pub depot_kind: String,
    /// Fail instead of dropping rows that have no partner in the other table
    pub strict_join: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            depot_kind: DEFAULT_DEPOT_KIND.to_string(),
            strict_join: false,
        }
    }
}

/// Clustering tunables for every mode
#[derive(Debug, Clone)]
pub struct ClusteringConfig {
    pub dbscan_eps: f64,
    pub dbscan_min_samples: usize,
    /// Independent k-means++ seedings; the lowest inertia wins
    pub kmeans_restarts: usize,
    pub kmeans_max_iterations: usize,
    /// Convergence bound on the largest centroid shift
    pub kmeans_tolerance: f64,
    pub seed: u64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            dbscan_eps: DEFAULT_DBSCAN_EPS,
            dbscan_min_samples: DEFAULT_DBSCAN_MIN_SAMPLES,
            kmeans_restarts: DEFAULT_KMEANS_RESTARTS,
            kmeans_max_iterations: DEFAULT_KMEANS_MAX_ITERATIONS,
            kmeans_tolerance: DEFAULT_KMEANS_TOLERANCE,
            seed: DEFAULT_KMEANS_SEED,
        }
    }
}

/// Detour pricing
#[derive(Debug, Clone)]
pub struct PricingConfig {
    pub outlier_threshold: f64,
    pub km_per_degree: f64,
    pub billing_unit_km: f64,
    pub rate_per_unit: f64,
    pub basis: SurchargeBasis,
    pub baseline: OutlierBaseline,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            outlier_threshold: DEFAULT_OUTLIER_THRESHOLD,
            km_per_degree: DEFAULT_KM_PER_DEGREE,
            billing_unit_km: DEFAULT_BILLING_UNIT_KM,
            rate_per_unit: DEFAULT_SURCHARGE_PER_UNIT,
            basis: SurchargeBasis::default(),
            baseline: OutlierBaseline::default(),
        }
    }
}

/// Which part of a detour leg is billed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurchargeBasis {
    /// The whole detour leg
    #[default]
    Leg,
    /// Only the length above `outlier_threshold × average`
    Excess,
}

impl FromStr for SurchargeBasis {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "leg" | "full" => Ok(SurchargeBasis::Leg),
            "excess" => Ok(SurchargeBasis::Excess),
            other => Err(format!("unknown surcharge basis '{}' (expected leg or excess)", other)),
        }
    }
}

/// Average a leg is compared against when deciding whether it is a detour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutlierBaseline {
    /// Mean of all legs of the route, the tested leg included
    #[default]
    RouteMean,
    /// Mean of the route's other legs
    OtherLegs,
}

impl FromStr for OutlierBaseline {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "other-legs" | "others" => Ok(OutlierBaseline::OtherLegs),
            "route-mean" | "mean" => Ok(OutlierBaseline::RouteMean),
            other => Err(format!(
                "unknown outlier baseline '{}' (expected other-legs or route-mean)",
                other
            )),
        }
    }
}

/// Where the nearest-neighbor path starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathStart {
    /// First stop of the cluster in input order
    #[default]
    FirstInput,
    /// Stop closest to the depot
    NearestToDepot,
}

impl FromStr for PathStart {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "first-input" | "first" => Ok(PathStart::FirstInput),
            "nearest-to-depot" | "nearest" => Ok(PathStart::NearestToDepot),
            other => Err(format!(
                "unknown path start '{}' (expected first-input or nearest-to-depot)",
                other
            )),
        }
    }
}

/// Diagram size in pixels
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_IMAGE_WIDTH,
            height: DEFAULT_IMAGE_HEIGHT,
        }
    }
}
