//! Configuration management

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

use route_planner::defaults::*;
use route_planner::services::config::PlannerConfig;
use route_planner::services::loader::parse_flag;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Store-location CSV
    pub locations_csv: PathBuf,

    /// Delivery-requirement CSV
    pub requirements_csv: PathBuf,

    /// Directory for the rolling log file
    pub logs_dir: String,

    /// Planner tunables
    pub planner: PlannerConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut planner = PlannerConfig::default();

        if let Some(kind) = var("DEPOT_KIND") {
            planner.data.depot_kind = kind.trim().to_string();
        }
        if let Some(raw) = var("STRICT_JOIN") {
            planner.data.strict_join = parse_flag(&raw)
                .ok_or_else(|| anyhow!("expected yes/no, got '{}'", raw))
                .context("Invalid STRICT_JOIN")?;
        }

        let pricing = &mut planner.pricing;
        set(&var, "OUTLIER_THRESHOLD", &mut pricing.outlier_threshold)?;
        set(&var, "KM_PER_DEGREE", &mut pricing.km_per_degree)?;
        set(&var, "BILLING_UNIT_KM", &mut pricing.billing_unit_km)?;
        set(&var, "SURCHARGE_PER_UNIT", &mut pricing.rate_per_unit)?;
        set(&var, "SURCHARGE_BASIS", &mut pricing.basis)?;
        set(&var, "OUTLIER_BASELINE", &mut pricing.baseline)?;

        let clustering = &mut planner.clustering;
        set(&var, "DBSCAN_EPS", &mut clustering.dbscan_eps)?;
        set(&var, "DBSCAN_MIN_SAMPLES", &mut clustering.dbscan_min_samples)?;
        set(&var, "KMEANS_RESTARTS", &mut clustering.kmeans_restarts)?;
        set(&var, "KMEANS_MAX_ITERATIONS", &mut clustering.kmeans_max_iterations)?;
        set(&var, "KMEANS_TOLERANCE", &mut clustering.kmeans_tolerance)?;
        set(&var, "KMEANS_SEED", &mut clustering.seed)?;

        set(&var, "PATH_START", &mut planner.path_start)?;
        set(&var, "IMAGE_WIDTH", &mut planner.render.width)?;
        set(&var, "IMAGE_HEIGHT", &mut planner.render.height)?;

        planner.validate().context("Invalid planner configuration")?;

        Ok(Self {
            locations_csv: var("LOCATIONS_CSV")
                .unwrap_or_else(|| DEFAULT_LOCATIONS_CSV.to_string())
                .into(),
            requirements_csv: var("REQUIREMENTS_CSV")
                .unwrap_or_else(|| DEFAULT_REQUIREMENTS_CSV.to_string())
                .into(),
            logs_dir: var("LOGS_DIR").unwrap_or_else(|| DEFAULT_LOGS_DIR.to_string()),
            planner,
        })
    }
}

/// Overwrite `target` when `key` is set
fn set<T, V>(var: &V, key: &str, target: &mut T) -> Result<()>
where
    T: FromStr,
    T::Err: Display,
    V: Fn(&str) -> Option<String>,
{
    if let Some(raw) = var(key) {
        *target = raw
            .trim()
            .parse()
            .map_err(|e: T::Err| anyhow!("{}", e))
            .with_context(|| format!("Invalid {}='{}'", key, raw))?;
    }
    Ok(())
}
