//! Delivery route planning
//!
//! Clusters delivery stops into one group per vehicle, orders each group with a
//! nearest-neighbor path from the depot, prices detour legs and produces a JSON
//! report together with an SVG route diagram.

pub mod defaults;
pub mod error;
pub mod services;
pub mod types;

pub use error::{PlannerError, Result};
pub use services::config::PlannerConfig;
pub use services::pipeline::{PlanMode, PlanOutput, PlanRequest, RoutePlanner};
