//! Detour surcharge evaluation
//!
//! A leg much longer than the route's typical leg is a detour; the stop at its far
//! end pays for it. Distances are coordinate degrees converted to kilometers with a
//! flat factor.

use super::config::{OutlierBaseline, PricingConfig, SurchargeBasis};
use crate::types::{Leg, SurchargeRecord};

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Surcharge per leg, parallel to `legs` (so to the route's stops).
pub fn evaluate(legs: &[Leg], pricing: &PricingConfig) -> Vec<SurchargeRecord> {
    let lengths: Vec<f64> = legs.iter().map(|leg| leg.length).collect();
    evaluate_lengths(&lengths, pricing)
}

pub fn evaluate_lengths(lengths: &[f64], pricing: &PricingConfig) -> Vec<SurchargeRecord> {
    // A lone leg has nothing to be compared with
    if lengths.len() < 2 {
        return vec![SurchargeRecord::none(); lengths.len()];
    }

    let total: f64 = lengths.iter().sum();
    let count = lengths.len() as f64;

    lengths
        .iter()
        .map(|&length| {
            let baseline = match pricing.baseline {
                OutlierBaseline::RouteMean => total / count,
                OutlierBaseline::OtherLegs => (total - length) / (count - 1.0),
            };
            price_leg(length, baseline, pricing)
        })
        .collect()
}

/// Price one leg against the average it is compared with
pub fn price_leg(length: f64, baseline: f64, pricing: &PricingConfig) -> SurchargeRecord {
    let limit = pricing.outlier_threshold * baseline;
    if !(length > limit) {
        return SurchargeRecord::none();
    }

    let chargeable = match pricing.basis {
        SurchargeBasis::Leg => length,
        SurchargeBasis::Excess => length - limit,
    };
    let km = chargeable * pricing.km_per_degree;
    let amount = round_to(km / pricing.billing_unit_km * pricing.rate_per_unit, 2);

    SurchargeRecord {
        amount,
        is_detour: true,
    }
}
