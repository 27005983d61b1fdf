//! CLI argument parsing for the route-planner binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use route_planner::services::pipeline::{PlanMode, PlanRequest};

#[derive(Parser)]
#[command(name = "route-planner", about = "Cluster delivery stops into vehicle routes and price detours")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Plan routes and write the diagram and report
    Plan(PlanArgs),
    /// Load and join the tables without planning
    Validate(InputArgs),
}

/// Input tables (fall back to LOCATIONS_CSV / REQUIREMENTS_CSV)
#[derive(clap::Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Store-location CSV
    #[arg(long)]
    pub locations: Option<PathBuf>,

    /// Delivery-requirement CSV
    #[arg(long)]
    pub requirements: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct PlanArgs {
    /// Clustering mode
    #[arg(long, value_enum)]
    pub mode: ModeArg,

    /// Number of vehicles (fixed-count and ranked modes)
    #[arg(long)]
    pub vehicles: Option<usize>,

    #[command(flatten)]
    pub input: InputArgs,

    /// Where to write the SVG diagram
    #[arg(long, default_value = "delivery_routes.svg")]
    pub image: PathBuf,

    /// Where to write the JSON report (stdout when omitted)
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Where to write the plain-text summary
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Where to write the combined plot + report JSON
    #[arg(long)]
    pub bundle: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// K-Means with exactly --vehicles groups
    FixedCount,
    /// DBSCAN, group count from stop density
    Density,
    /// Stops ranked by depot distance, dealt round-robin
    Ranked,
}

impl From<ModeArg> for PlanMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::FixedCount => PlanMode::FixedCount,
            ModeArg::Density => PlanMode::Density,
            ModeArg::Ranked => PlanMode::Ranked,
        }
    }
}

impl PlanArgs {
    pub fn request(&self) -> PlanRequest {
        PlanRequest {
            mode: self.mode.into(),
            vehicles: self.vehicles,
        }
    }
}
