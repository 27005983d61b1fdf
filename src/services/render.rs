//! Route diagram rendering
//!
//! Draws the depot, every route polyline and the stop labels into an SVG document
//! held in memory, so callers never need a filesystem.

use std::path::Path;

use plotters::prelude::*;
use tracing::debug;

use super::config::RenderConfig;
use super::geo::Bounds;
use crate::error::{PlannerError, Result};
use crate::types::{Coordinates, PlannedRoute, Stop};

pub const IMAGE_CONTENT_TYPE: &str = "image/svg+xml";

const ROUTE_COLORS: [RGBColor; 6] = [
    RGBColor(220, 20, 60),   // red
    RGBColor(34, 139, 34),   // green
    RGBColor(128, 0, 128),   // purple
    RGBColor(255, 140, 0),   // orange
    RGBColor(0, 170, 190),   // cyan
    RGBColor(199, 21, 133),  // magenta
];

const DEPOT_COLOR: RGBColor = RGBColor(30, 60, 200);
const FONT: &str = "sans-serif";

fn render_err<E: std::fmt::Display>(err: E) -> PlannerError {
    PlannerError::Render(err.to_string())
}

/// Color of the route at `index` (cycles through the palette)
pub fn route_color(index: usize) -> RGBColor {
    ROUTE_COLORS[index % ROUTE_COLORS.len()]
}

/// Render the routes as SVG and return the encoded bytes.
/// Routes are drawn in the order given; an empty slice still yields a diagram with the depot.
pub fn render_routes(
    depot: &Stop,
    routes: &[PlannedRoute],
    caption: &str,
    config: &RenderConfig,
) -> Result<Vec<u8>> {
    let mut points: Vec<Coordinates> = vec![depot.coordinates];
    points.extend(routes.iter().flat_map(|r| r.stops.iter().map(|s| s.coordinates)));
    let bounds = Bounds::around(&points).ok_or_else(|| PlannerError::Render("nothing to draw".into()))?;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (config.width, config.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("Optimized Delivery Routes ({})", caption), (FONT, 24))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(bounds.min_lng..bounds.max_lng, bounds.min_lat..bounds.max_lat)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc("Longitude")
            .y_desc("Latitude")
            .light_line_style(RGBColor(235, 235, 235).stroke_width(1))
            .draw()
            .map_err(render_err)?;

        let depot_xy = (depot.coordinates.lng, depot.coordinates.lat);

        for (idx, route) in routes.iter().enumerate() {
            let color = route_color(idx);
            let path: Vec<(f64, f64)> = std::iter::once(depot_xy)
                .chain(route.stops.iter().map(|s| (s.coordinates.lng, s.coordinates.lat)))
                .collect();

            chart
                .draw_series(LineSeries::new(path, color.stroke_width(2)))
                .map_err(render_err)?
                .label(format!("Route {}", idx + 1))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

            chart
                .draw_series(route.stops.iter().map(|s| {
                    EmptyElement::at((s.coordinates.lng, s.coordinates.lat))
                        + Circle::new((0, 0), 5, color.filled())
                        + Text::new(s.name.clone(), (-10, 8), (FONT, 11).into_font())
                }))
                .map_err(render_err)?;
        }

        chart
            .draw_series(std::iter::once(
                EmptyElement::at(depot_xy)
                    + Rectangle::new([(-8, -8), (8, 8)], DEPOT_COLOR.filled())
                    + Text::new(depot.name.clone(), (-10, -24), (FONT, 13).into_font()),
            ))
            .map_err(render_err)?
            .label(format!("Depot: {}", depot.name))
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], DEPOT_COLOR.filled()));

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }

    debug!("Rendered {} routes into {} bytes of SVG", routes.len(), svg.len());
    Ok(svg.into_bytes())
}

/// Write rendered bytes to disk
pub fn write_image(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)
}
