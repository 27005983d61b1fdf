//! Delivery report types (wire format of the cost report)

use serde::{Deserialize, Serialize};

pub const REPORT_TITLE: &str = "Delivery Summary Report";

/// Full report payload for one planning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub title: String,
    pub routes: Vec<RouteReport>,
}

impl DeliveryReport {
    pub fn new(routes: Vec<RouteReport>) -> Self {
        Self {
            title: REPORT_TITLE.to_string(),
            routes,
        }
    }

    pub fn stop_count(&self) -> usize {
        self.routes.iter().map(|r| r.stops.len()).sum()
    }

    pub fn surcharge_total(&self) -> f64 {
        self.routes.iter().map(|r| r.surcharge_total).sum()
    }
}

/// Per-route section of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteReport {
    /// 1-based
    pub route_number: usize,
    /// Depot name
    pub starting_point: String,
    /// Rounded to 3 decimals
    pub total_distance: f64,
    /// Rounded to 2 decimals
    pub surcharge_total: f64,
    pub stops: Vec<StopReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopReport {
    /// 1-based position in the route
    pub stop_number: usize,
    pub name: String,
    pub surcharge: f64,
    pub has_detour: bool,
}
