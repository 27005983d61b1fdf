//! Planning pipeline
//!
//! Load and join the tables, pick the depot, cluster, build one route per cluster,
//! price detours, then assemble the report and the diagram from the same routes.

use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};
use uuid::Uuid;

use super::clustering::{self, ClusteringMode, Clusters};
use super::config::PlannerConfig;
use super::loader::{self, DeliverySet, LocationRow, RequirementRow};
use super::{geo, path, render, report, surcharge};
use crate::error::{PlannerError, Result};
use crate::types::{DeliveryReport, PlannedRoute, Stop};

/// Clustering mode requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanMode {
    FixedCount,
    Density,
    Ranked,
}

impl PlanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanMode::FixedCount => "fixed-count",
            PlanMode::Density => "density",
            PlanMode::Ranked => "ranked",
        }
    }
}

impl FromStr for PlanMode {
    type Err = PlannerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed-count" | "fixed" | "kmeans" => Ok(PlanMode::FixedCount),
            "density" | "dbscan" => Ok(PlanMode::Density),
            "ranked" => Ok(PlanMode::Ranked),
            other => Err(PlannerError::configuration(format!(
                "unknown clustering mode '{}'",
                other
            ))),
        }
    }
}

/// A single planning request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub mode: PlanMode,
    /// Required for `fixed-count` and `ranked`, ignored for `density`
    pub vehicles: Option<usize>,
}

impl PlanRequest {
    pub fn fixed_count(vehicles: usize) -> Self {
        Self { mode: PlanMode::FixedCount, vehicles: Some(vehicles) }
    }

    pub fn density() -> Self {
        Self { mode: PlanMode::Density, vehicles: None }
    }

    pub fn ranked(vehicles: usize) -> Self {
        Self { mode: PlanMode::Ranked, vehicles: Some(vehicles) }
    }

    /// Resolve into a concrete clustering mode
    pub fn clustering_mode(&self, config: &PlannerConfig) -> Result<ClusteringMode> {
        let vehicles = || {
            self.vehicles.ok_or_else(|| {
                PlannerError::configuration(format!(
                    "{} mode requires a vehicle count",
                    self.mode.as_str()
                ))
            })
        };

        Ok(match self.mode {
            PlanMode::FixedCount => ClusteringMode::FixedCount { vehicles: vehicles()? },
            PlanMode::Density => ClusteringMode::density_from(&config.clustering),
            PlanMode::Ranked => ClusteringMode::Ranked { vehicles: vehicles()? },
        })
    }
}

/// Diagram and report produced together by one run
#[derive(Debug, Clone)]
pub struct PlanOutput {
    pub run_id: Uuid,
    /// SVG document
    pub image: Vec<u8>,
    pub report: DeliveryReport,
    /// Clustering description shown in the diagram title
    pub caption: String,
    pub routes: Vec<PlannedRoute>,
    /// Stops excluded as density noise
    pub unrouted: Vec<Stop>,
}

/// Image and report in a single JSON document
#[derive(Debug, Clone, Serialize)]
pub struct PlanBundle<'a> {
    /// Base64-encoded SVG
    pub plot: String,
    pub report: &'a DeliveryReport,
}

impl PlanOutput {
    pub fn bundle(&self) -> PlanBundle<'_> {
        PlanBundle {
            plot: base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &self.image),
            report: &self.report,
        }
    }
}

/// Runs the planning pipeline with a fixed configuration
pub struct RoutePlanner {
    config: PlannerConfig,
}

impl RoutePlanner {
    pub fn new(config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Read both CSV files fresh and plan
    pub fn run(
        &self,
        locations_path: &Path,
        requirements_path: &Path,
        request: &PlanRequest,
    ) -> Result<PlanOutput> {
        let locations = loader::load_locations(locations_path)?;
        let requirements = loader::load_requirements(requirements_path)?;
        self.plan(&locations, &requirements, request)
    }

    /// Join the tables and select the depot without planning
    pub fn delivery_set(
        &self,
        locations: &[LocationRow],
        requirements: &[RequirementRow],
    ) -> Result<DeliverySet> {
        let stops = loader::join_delivery_stops(locations, requirements, &self.config.data)?;
        loader::split_depot(stops)
    }

    /// Plan from already loaded tables
    pub fn plan(
        &self,
        locations: &[LocationRow],
        requirements: &[RequirementRow],
        request: &PlanRequest,
    ) -> Result<PlanOutput> {
        let set = self.delivery_set(locations, requirements)?;
        self.plan_delivery_set(&set, request)
    }

    /// Plan routes for a depot and its delivery stops
    pub fn plan_delivery_set(&self, set: &DeliverySet, request: &PlanRequest) -> Result<PlanOutput> {
        let run_id = Uuid::new_v4();
        let span = info_span!("plan", %run_id, mode = request.mode.as_str());
        let _guard = span.enter();
        let started_at = Instant::now();

        let mode = request.clustering_mode(&self.config)?;
        info!(
            "Planning {} stops from depot '{}' ({})",
            set.stops.len(),
            set.depot.name,
            mode.describe()
        );

        let clusters = clustering::assign_clusters(
            &set.stops,
            &set.depot.coordinates,
            &mode,
            &self.config.clustering,
        )?;
        let routes = self.build_routes(&set.depot, &clusters);

        let report = report::assemble(&set.depot, &routes);
        let caption = mode.describe();
        let image = render::render_routes(&set.depot, &routes, &caption, &self.config.render)?;

        info!(
            "Planned {} routes, {} stops, surcharge ${:.2} in {} ms",
            report.routes.len(),
            report.stop_count(),
            report.surcharge_total(),
            started_at.elapsed().as_millis()
        );

        Ok(PlanOutput {
            run_id,
            image,
            report,
            caption,
            routes,
            unrouted: clusters.noise,
        })
    }

    fn build_routes(&self, depot: &Stop, clusters: &Clusters) -> Vec<PlannedRoute> {
        clusters
            .groups
            .iter()
            .map(|(&label, members)| self.plan_route(label, depot, members))
            .collect()
    }

    /// Order one cluster's stops and price its legs
    pub fn plan_route(&self, label: usize, depot: &Stop, members: &[Stop]) -> PlannedRoute {
        let stops = path::build_path(members, &depot.coordinates, self.config.path_start);
        let legs = geo::route_legs(&depot.coordinates, &stops);
        let surcharges = surcharge::evaluate(&legs, &self.config.pricing);

        let route = PlannedRoute { label, stops, legs, surcharges };
        debug!(
            "Route {}: {} stops, distance {:.3}, {} detours, surcharge ${:.2}",
            label,
            route.len(),
            route.total_distance(),
            route.detour_count(),
            route.surcharge_total()
        );
        route
    }
}

impl Default for RoutePlanner {
    fn default() -> Self {
        Self { config: PlannerConfig::default() }
    }
}
