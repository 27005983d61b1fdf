//! Route types

use super::{Coordinates, Stop};

/// Segment between two consecutive points of a route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub from: Coordinates,
    pub to: Coordinates,
    /// Euclidean length in coordinate degrees
    pub length: f64,
}

/// Detour pricing attached to a stop (for its incoming leg)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurchargeRecord {
    /// Amount in dollars, rounded to cents
    pub amount: f64,
    pub is_detour: bool,
}

impl SurchargeRecord {
    pub const fn none() -> Self {
        Self { amount: 0.0, is_detour: false }
    }
}

/// One vehicle's ordered visiting sequence.
///
/// The depot is the implicit origin and never appears in `stops`.
/// `legs[i]` and `surcharges[i]` both belong to `stops[i]` (its incoming leg).
#[derive(Debug, Clone)]
pub struct PlannedRoute {
    /// Cluster label the route was built from
    pub label: usize,
    pub stops: Vec<Stop>,
    pub legs: Vec<Leg>,
    pub surcharges: Vec<SurchargeRecord>,
}

impl PlannedRoute {
    pub fn total_distance(&self) -> f64 {
        self.legs.iter().map(|leg| leg.length).sum()
    }

    pub fn surcharge_total(&self) -> f64 {
        self.surcharges.iter().map(|s| s.amount).sum()
    }

    pub fn detour_count(&self) -> usize {
        self.surcharges.iter().filter(|s| s.is_detour).count()
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}
