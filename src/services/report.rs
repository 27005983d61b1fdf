//! Route report assembly
//!
//! Turns planned routes into the JSON cost report and its plain-text summary.

use super::surcharge::round_to;
use crate::types::{DeliveryReport, PlannedRoute, RouteReport, Stop, StopReport};

/// Build the report; routes are emitted in increasing label order and numbered from 1.
pub fn assemble(depot: &Stop, routes: &[PlannedRoute]) -> DeliveryReport {
    let mut ordered: Vec<&PlannedRoute> = routes.iter().collect();
    ordered.sort_by_key(|route| route.label);

    DeliveryReport::new(
        ordered
            .into_iter()
            .enumerate()
            .map(|(i, route)| route_report(i + 1, &depot.name, route))
            .collect(),
    )
}

pub fn route_report(route_number: usize, depot_name: &str, route: &PlannedRoute) -> RouteReport {
    let stops: Vec<StopReport> = route
        .stops
        .iter()
        .zip(&route.surcharges)
        .enumerate()
        .map(|(i, (stop, surcharge))| StopReport {
            stop_number: i + 1,
            name: stop.name.clone(),
            surcharge: round_to(surcharge.amount, 2),
            has_detour: surcharge.is_detour,
        })
        .collect();

    // Summed from the rounded per-stop amounts so the total matches its lines
    let surcharge_total = round_to(stops.iter().map(|s| s.surcharge).sum(), 2);

    RouteReport {
        route_number,
        starting_point: depot_name.to_string(),
        total_distance: round_to(route.total_distance(), 3),
        surcharge_total,
        stops,
    }
}

/// Plain-text delivery summary
pub fn render_text(report: &DeliveryReport) -> String {
    let rule = "====================================";
    let mut text = format!("{}\n{}\n\n", report.title, rule);

    if report.routes.is_empty() {
        text.push_str("No routes planned.\n\n");
    }

    for route in &report.routes {
        text.push_str(&format!(
            "Route #{} (Starting at {}):\n",
            route.route_number, route.starting_point
        ));
        text.push_str(&format!("Total Distance: {:.3} units\n", route.total_distance));
        text.push_str("Stops:\n");

        for stop in &route.stops {
            text.push_str(&format!("  {}. {}", stop.stop_number, stop.name));
            if stop.has_detour {
                text.push_str(&format!("  (+${:.2} surcharge for detour)", stop.surcharge));
            }
            text.push('\n');
        }

        if route.surcharge_total > 0.0 {
            text.push_str(&format!("Total Surcharge: ${:.2}\n", route.surcharge_total));
        }
        text.push('\n');
    }

    text.push_str(rule);
    text.push_str("\nEnd of Report.\n");
    text
}
