//! Stop types

use serde::{Deserialize, Serialize};

/// Coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Store kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopKind {
    Depot,
    Retailer,
}

impl StopKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            StopKind::Depot => "depot",
            StopKind::Retailer => "retailer",
        }
    }

    /// Classify a raw store-kind value. Anything that is not the depot kind is a retailer.
    pub fn classify(raw: &str, depot_kind: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case(depot_kind.trim()) {
            StopKind::Depot
        } else {
            StopKind::Retailer
        }
    }
}

/// A store taking part in a planning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    /// Store name, unique within a run
    pub name: String,
    pub coordinates: Coordinates,
    pub requires_delivery: bool,
    pub kind: StopKind,
}

impl Stop {
    pub fn new(name: impl Into<String>, lat: f64, lng: f64, kind: StopKind) -> Self {
        Self {
            name: name.into(),
            coordinates: Coordinates::new(lat, lng),
            requires_delivery: true,
            kind,
        }
    }

    pub fn retailer(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self::new(name, lat, lng, StopKind::Retailer)
    }

    pub fn depot(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self::new(name, lat, lng, StopKind::Depot)
    }

    pub fn is_depot(&self) -> bool {
        self.kind == StopKind::Depot
    }
}
