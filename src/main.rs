//! Route Planner - delivery clustering, routing and detour surcharges
//!
//! Reads the store and requirement tables, plans one route per vehicle and writes
//! the diagram and the cost report.

mod cli;
mod config;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use route_planner::services::loader;
use route_planner::services::pipeline::RoutePlanner;
use route_planner::services::render;
use route_planner::services::report::render_text;

use cli::{Cli, Command, InputArgs, PlanArgs};
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    std::fs::create_dir_all(&config.logs_dir).ok();

    // File appender for persistent logs (daily rotation)
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &config.logs_dir, "planner.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Initialize logging - both stdout and file
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,route_planner=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)) // console
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false)) // file
        .init();

    let result = match cli.command {
        Command::Plan(args) => plan(&config, &args),
        Command::Validate(input) => validate(&config, &input),
    };

    if let Err(e) = &result {
        error!("Run failed: {:#}", e);
    }
    result
}

fn input_paths(config: &Config, input: &InputArgs) -> (PathBuf, PathBuf) {
    (
        input.locations.clone().unwrap_or_else(|| config.locations_csv.clone()),
        input.requirements.clone().unwrap_or_else(|| config.requirements_csv.clone()),
    )
}

fn plan(config: &Config, args: &PlanArgs) -> Result<()> {
    let (locations, requirements) = input_paths(config, &args.input);
    let planner = RoutePlanner::new(config.planner.clone())?;

    let output = planner.run(&locations, &requirements, &args.request())?;

    render::write_image(&args.image, &output.image)
        .with_context(|| format!("Failed to write diagram to {}", args.image.display()))?;
    info!("Diagram written to {} ({})", args.image.display(), render::IMAGE_CONTENT_TYPE);

    let report_json = serde_json::to_string_pretty(&output.report)?;
    match &args.report {
        Some(path) => {
            write_text(path, &report_json)?;
            info!("Report written to {}", path.display());
        }
        None => println!("{}", report_json),
    }

    if let Some(path) = &args.summary {
        write_text(path, &render_text(&output.report))?;
        info!("Summary written to {}", path.display());
    }

    if let Some(path) = &args.bundle {
        write_text(path, &serde_json::to_string(&output.bundle())?)?;
        info!("Bundle written to {}", path.display());
    }

    Ok(())
}

fn validate(config: &Config, input: &InputArgs) -> Result<()> {
    let (locations, requirements) = input_paths(config, input);
    let planner = RoutePlanner::new(config.planner.clone())?;

    let set = planner.delivery_set(
        &loader::load_locations(&locations)?,
        &loader::load_requirements(&requirements)?,
    )?;

    println!(
        "Depot '{}' with {} delivery stops",
        set.depot.name,
        set.stops.len()
    );
    Ok(())
}

fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
