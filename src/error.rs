//! Planner error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlannerError>;

/// Failure of a planning run. There are no partial results: any of these aborts the run.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Invalid or missing vehicle count, or nonsensical tunables
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input loaded fine but cannot be planned (no depot, empty delivery set, duplicates)
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// A tabular source could not be opened, read or parsed
    #[error("Failed to load {table} table: {message}")]
    UpstreamData { table: &'static str, message: String },

    #[error("Failed to render route diagram: {0}")]
    Render(String),
}

impl PlannerError {
    pub fn configuration(message: impl Into<String>) -> Self {
        PlannerError::Configuration(message.into())
    }

    pub fn data_integrity(message: impl Into<String>) -> Self {
        PlannerError::DataIntegrity(message.into())
    }

    pub fn upstream(table: &'static str, message: impl ToString) -> Self {
        PlannerError::UpstreamData {
            table,
            message: message.to_string(),
        }
    }

    /// Stable code for callers translating failures into responses
    pub const fn code(&self) -> &'static str {
        match self {
            PlannerError::Configuration(_) => "CONFIGURATION_ERROR",
            PlannerError::DataIntegrity(_) => "DATA_INTEGRITY_ERROR",
            PlannerError::UpstreamData { .. } => "UPSTREAM_DATA_ERROR",
            PlannerError::Render(_) => "RENDER_ERROR",
        }
    }
}
