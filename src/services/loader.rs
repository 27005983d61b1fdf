//! Store and delivery-requirement tables
//!
//! Reads the two CSV sources, joins them on store name and selects the depot.
//! Every call reads fresh data; nothing is cached between runs.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::config::DataConfig;
use crate::error::{PlannerError, Result};
use crate::types::{Coordinates, Stop, StopKind};

const LOCATIONS_TABLE: &str = "store locations";
const REQUIREMENTS_TABLE: &str = "delivery requirements";

/// Accepted header spellings per required column
const LOCATION_COLUMNS: &[&[&str]] = &[
    &["Name", "name"],
    &["Latitude", "latitude", "lat"],
    &["Longitude", "longitude", "lng"],
    &["Type", "type", "kind"],
];
const REQUIREMENT_COLUMNS: &[&[&str]] = &[&["Name", "name"], &["RequiresDelivery", "requires_delivery"]];

/// Row of the store-location table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LocationRow {
    #[serde(rename = "Name", alias = "name")]
    pub name: String,
    /// `None` when the cell is empty
    #[serde(rename = "Latitude", alias = "latitude", alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude", alias = "longitude", alias = "lng")]
    pub longitude: Option<f64>,
    #[serde(rename = "Type", alias = "type", alias = "kind")]
    pub kind: String,
}

/// Row of the delivery-requirement table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequirementRow {
    #[serde(rename = "Name", alias = "name")]
    pub name: String,
    #[serde(rename = "RequiresDelivery", alias = "requires_delivery")]
    pub requires_delivery: String,
}

/// Delivery-required stops with the depot split out
#[derive(Debug, Clone)]
pub struct DeliverySet {
    pub depot: Stop,
    /// Non-depot stops in table order
    pub stops: Vec<Stop>,
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn read_rows<R, T>(reader: R, table: &'static str, columns: &[&[&str]]) -> Result<Vec<T>>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
{
    let mut reader = csv_reader(reader);

    let headers = reader.headers().map_err(|e| PlannerError::upstream(table, e))?;
    for aliases in columns {
        if !headers.iter().any(|h| aliases.contains(&h)) {
            return Err(PlannerError::upstream(table, format!("missing column '{}'", aliases[0])));
        }
    }

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: T = result.map_err(|e| PlannerError::upstream(table, e))?;
        rows.push(row);
    }
    Ok(rows)
}

fn open(path: &Path, table: &'static str) -> Result<File> {
    File::open(path).map_err(|e| PlannerError::upstream(table, format!("{}: {}", path.display(), e)))
}

pub fn read_locations<R: Read>(reader: R) -> Result<Vec<LocationRow>> {
    read_rows(reader, LOCATIONS_TABLE, LOCATION_COLUMNS)
}

pub fn read_requirements<R: Read>(reader: R) -> Result<Vec<RequirementRow>> {
    read_rows(reader, REQUIREMENTS_TABLE, REQUIREMENT_COLUMNS)
}

pub fn load_locations(path: &Path) -> Result<Vec<LocationRow>> {
    let rows = read_locations(open(path, LOCATIONS_TABLE)?)?;
    debug!("Loaded {} store locations from {}", rows.len(), path.display());
    Ok(rows)
}

pub fn load_requirements(path: &Path) -> Result<Vec<RequirementRow>> {
    let rows = read_requirements(open(path, REQUIREMENTS_TABLE)?)?;
    debug!("Loaded {} delivery requirements from {}", rows.len(), path.display());
    Ok(rows)
}

/// Parse a yes/no style flag
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Join both tables on name and keep the stores requiring delivery, in location-table order.
///
/// Rows without a partner in the other table are dropped with a warning, or rejected
/// when `strict_join` is set.
pub fn join_delivery_stops(
    locations: &[LocationRow],
    requirements: &[RequirementRow],
    config: &DataConfig,
) -> Result<Vec<Stop>> {
    let mut location_names = HashSet::new();
    let mut coordinates = Vec::with_capacity(locations.len());
    for (i, row) in locations.iter().enumerate() {
        if row.name.is_empty() {
            return Err(missing_field(LOCATIONS_TABLE, i, "name"));
        }
        let (lat, lng) = match (row.latitude, row.longitude) {
            (Some(lat), Some(lng)) => (lat, lng),
            (None, _) => return Err(missing_field(LOCATIONS_TABLE, i, "latitude")),
            (_, None) => return Err(missing_field(LOCATIONS_TABLE, i, "longitude")),
        };
        if !lat.is_finite() || !lng.is_finite() {
            return Err(PlannerError::upstream(
                LOCATIONS_TABLE,
                format!("row {}: '{}' has non-finite coordinates", i + 1, row.name),
            ));
        }
        if row.kind.is_empty() {
            return Err(missing_field(LOCATIONS_TABLE, i, "type"));
        }
        coordinates.push(Coordinates::new(lat, lng));
        if !location_names.insert(row.name.as_str()) {
            return Err(PlannerError::data_integrity(format!(
                "store '{}' appears more than once in the {} table",
                row.name, LOCATIONS_TABLE
            )));
        }
    }

    let mut required: HashMap<&str, bool> = HashMap::new();
    for (i, row) in requirements.iter().enumerate() {
        if row.name.is_empty() {
            return Err(missing_field(REQUIREMENTS_TABLE, i, "name"));
        }
        if row.requires_delivery.is_empty() {
            return Err(missing_field(REQUIREMENTS_TABLE, i, "delivery flag"));
        }
        let flag = parse_flag(&row.requires_delivery).ok_or_else(|| {
            PlannerError::upstream(
                REQUIREMENTS_TABLE,
                format!(
                    "row {}: '{}' has invalid delivery flag '{}'",
                    i + 1,
                    row.name,
                    row.requires_delivery
                ),
            )
        })?;
        if required.insert(row.name.as_str(), flag).is_some() {
            return Err(PlannerError::data_integrity(format!(
                "store '{}' appears more than once in the {} table",
                row.name, REQUIREMENTS_TABLE
            )));
        }
    }

    let unmatched_locations: Vec<&str> = locations
        .iter()
        .map(|r| r.name.as_str())
        .filter(|name| !required.contains_key(name))
        .collect();
    let unmatched_requirements: Vec<&str> = requirements
        .iter()
        .map(|r| r.name.as_str())
        .filter(|name| !location_names.contains(name))
        .collect();

    if !unmatched_locations.is_empty() || !unmatched_requirements.is_empty() {
        if config.strict_join {
            return Err(PlannerError::data_integrity(format!(
                "join mismatch: stores without requirement [{}], requirements without store [{}]",
                unmatched_locations.join(", "),
                unmatched_requirements.join(", ")
            )));
        }
        for name in &unmatched_locations {
            warn!("Store '{}' has no delivery requirement row, skipping", name);
        }
        for name in &unmatched_requirements {
            warn!("Delivery requirement for unknown store '{}', skipping", name);
        }
    }

    let stops: Vec<Stop> = locations
        .iter()
        .zip(coordinates)
        .filter(|(row, _)| required.get(row.name.as_str()).copied().unwrap_or(false))
        .map(|(row, coordinates)| {
            let kind = StopKind::classify(&row.kind, &config.depot_kind);
            debug!("Store '{}' requires delivery ({})", row.name, kind.as_str());
            Stop {
                name: row.name.clone(),
                coordinates,
                requires_delivery: true,
                kind,
            }
        })
        .collect();

    info!(
        "Joined {} stores with {} requirements: {} require delivery",
        locations.len(),
        requirements.len(),
        stops.len()
    );

    Ok(stops)
}

fn missing_field(table: &str, index: usize, field: &str) -> PlannerError {
    PlannerError::data_integrity(format!(
        "{} table row {}: required field '{}' is empty",
        table,
        index + 1,
        field
    ))
}

/// Pick the depot (first depot-kind stop) and keep the rest as delivery stops.
pub fn split_depot(stops: Vec<Stop>) -> Result<DeliverySet> {
    let depot_idx = stops.iter().position(Stop::is_depot).ok_or_else(|| {
        PlannerError::data_integrity("no depot found among stores requiring delivery")
    })?;

    let mut stops = stops;
    let depot = stops.remove(depot_idx);

    let extra_depots = stops.iter().filter(|s| s.is_depot()).count();
    if extra_depots > 0 {
        warn!(
            "{} more depot-kind stores require delivery; '{}' is the depot, the others are routed as stops",
            extra_depots, depot.name
        );
    }

    if stops.is_empty() {
        return Err(PlannerError::data_integrity(format!(
            "no delivery stops besides depot '{}'",
            depot.name
        )));
    }

    Ok(DeliverySet { depot, stops })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LOCATIONS: &str = "\
Name,Latitude,Longitude,Type
Central,43.6532,-79.3832,Depot
North,43.7001,-79.4163,Retailer
East,43.6677,-79.3000,Retailer
West,43.6400,-79.4500,Retailer
";

    const REQUIREMENTS: &str = "\
Name,RequiresDelivery
Central,Yes
North,Yes
East,No
West,yes
";

    fn names(stops: &[Stop]) -> Vec<&str> {
        stops.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_read_and_join() {
        let locations = read_locations(LOCATIONS.as_bytes()).unwrap();
        let requirements = read_requirements(REQUIREMENTS.as_bytes()).unwrap();

        let stops = join_delivery_stops(&locations, &requirements, &DataConfig::default()).unwrap();

        assert_eq!(names(&stops), vec!["Central", "North", "West"]);
        assert_eq!(stops[0].kind, StopKind::Depot);
        assert_eq!(stops[1].kind, StopKind::Retailer);
        assert!((stops[1].coordinates.lat - 43.7001).abs() < 1e-12);
        assert!((stops[1].coordinates.lng + 79.4163).abs() < 1e-12);
        assert!(stops.iter().all(|s| s.requires_delivery));
    }

    #[test]
    fn test_lowercase_headers_and_whitespace() {
        let csv = "name, latitude , longitude,kind\n  Central , 1.5, 2.5 , depot\n";
        let rows = read_locations(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].name, "Central");
        assert_eq!(rows[0].longitude, Some(2.5));
        assert_eq!(rows[0].kind, "depot");
    }

    #[test]
    fn test_missing_column_is_upstream_error() {
        let csv = "Name,Latitude,Type\nCentral,1.0,Depot\n";
        let err = read_locations(csv.as_bytes()).unwrap_err();
        assert_eq!(err.code(), "UPSTREAM_DATA_ERROR");
        assert!(err.to_string().contains("Longitude"));
    }

    #[test]
    fn test_unparsable_coordinate_is_upstream_error() {
        let csv = "Name,Latitude,Longitude,Type\nCentral,north,1.0,Depot\n";
        let err = read_locations(csv.as_bytes()).unwrap_err();
        assert_eq!(err.code(), "UPSTREAM_DATA_ERROR");
        assert!(err.to_string().contains("store locations"));
    }

    #[test]
    fn test_empty_name_is_data_integrity_error() {
        let locations = read_locations("Name,Latitude,Longitude,Type\n,1.0,2.0,Retailer\n".as_bytes()).unwrap();
        let requirements = read_requirements(REQUIREMENTS.as_bytes()).unwrap();
        let err = join_delivery_stops(&locations, &requirements, &DataConfig::default()).unwrap_err();
        assert_eq!(err.code(), "DATA_INTEGRITY_ERROR");
        assert!(err.to_string().contains("'name'"));

        let locations = read_locations(LOCATIONS.as_bytes()).unwrap();
        let requirements = read_requirements("Name,RequiresDelivery\n  ,Yes\n".as_bytes()).unwrap();
        let err = join_delivery_stops(&locations, &requirements, &DataConfig::default()).unwrap_err();
        assert_eq!(err.code(), "DATA_INTEGRITY_ERROR");
    }

    #[test]
    fn test_empty_coordinate_is_data_integrity_error() {
        let requirements = read_requirements(REQUIREMENTS.as_bytes()).unwrap();

        let locations = read_locations("Name,Latitude,Longitude,Type\nCentral,,-79.38,Depot\n".as_bytes()).unwrap();
        assert_eq!(locations[0].latitude, None);
        let err = join_delivery_stops(&locations, &requirements, &DataConfig::default()).unwrap_err();
        assert_eq!(err.code(), "DATA_INTEGRITY_ERROR");
        assert!(err.to_string().contains("'latitude'"));

        let locations = read_locations("Name,Latitude,Longitude,Type\nCentral,43.65, ,Depot\n".as_bytes()).unwrap();
        let err = join_delivery_stops(&locations, &requirements, &DataConfig::default()).unwrap_err();
        assert_eq!(err.code(), "DATA_INTEGRITY_ERROR");
        assert!(err.to_string().contains("'longitude'"));
    }

    #[test]
    fn test_empty_type_is_data_integrity_error() {
        let locations = read_locations("Name,Latitude,Longitude,Type\nCentral,1.0,2.0,\n".as_bytes()).unwrap();
        let requirements = read_requirements(REQUIREMENTS.as_bytes()).unwrap();
        let err = join_delivery_stops(&locations, &requirements, &DataConfig::default()).unwrap_err();
        assert_eq!(err.code(), "DATA_INTEGRITY_ERROR");
    }

    #[test]
    fn test_empty_flag_is_data_integrity_error() {
        let locations = read_locations(LOCATIONS.as_bytes()).unwrap();
        let requirements = read_requirements("Name,RequiresDelivery\nCentral,\n".as_bytes()).unwrap();
        let err = join_delivery_stops(&locations, &requirements, &DataConfig::default()).unwrap_err();
        assert_eq!(err.code(), "DATA_INTEGRITY_ERROR");
        assert!(err.to_string().contains("delivery flag"));
    }

    #[test]
    fn test_missing_requirement_column_is_upstream_error() {
        let err = read_requirements("Name,Delivery\nCentral,Yes\n".as_bytes()).unwrap_err();
        assert_eq!(err.code(), "UPSTREAM_DATA_ERROR");
        assert!(err.to_string().contains("RequiresDelivery"));
    }

    #[test]
    fn test_invalid_flag_is_upstream_error() {
        let locations = read_locations(LOCATIONS.as_bytes()).unwrap();
        let requirements = read_requirements("Name,RequiresDelivery\nCentral,maybe\n".as_bytes()).unwrap();

        let err = join_delivery_stops(&locations, &requirements, &DataConfig::default()).unwrap_err();
        assert_eq!(err.code(), "UPSTREAM_DATA_ERROR");
    }

    #[test]
    fn test_unmatched_rows_dropped_by_default() {
        let locations = read_locations(LOCATIONS.as_bytes()).unwrap();
        let requirements = read_requirements(
            "Name,RequiresDelivery\nCentral,Yes\nNorth,Yes\nGhost,Yes\n".as_bytes(),
        )
        .unwrap();

        let stops = join_delivery_stops(&locations, &requirements, &DataConfig::default()).unwrap();
        assert_eq!(names(&stops), vec!["Central", "North"]);
    }

    #[test]
    fn test_unmatched_rows_rejected_when_strict() {
        let locations = read_locations(LOCATIONS.as_bytes()).unwrap();
        let requirements = read_requirements(
            "Name,RequiresDelivery\nCentral,Yes\nNorth,Yes\nGhost,Yes\n".as_bytes(),
        )
        .unwrap();
        let config = DataConfig {
            strict_join: true,
            ..DataConfig::default()
        };

        let err = join_delivery_stops(&locations, &requirements, &config).unwrap_err();
        assert_eq!(err.code(), "DATA_INTEGRITY_ERROR");
        assert!(err.to_string().contains("Ghost"));
        assert!(err.to_string().contains("East"));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let csv = "Name,Latitude,Longitude,Type\nA,1,1,Retailer\nA,2,2,Retailer\n";
        let locations = read_locations(csv.as_bytes()).unwrap();
        let requirements = read_requirements("Name,RequiresDelivery\nA,Yes\n".as_bytes()).unwrap();

        let err = join_delivery_stops(&locations, &requirements, &DataConfig::default()).unwrap_err();
        assert_eq!(err.code(), "DATA_INTEGRITY_ERROR");
    }

    #[test]
    fn test_custom_depot_kind() {
        let csv = "Name,Latitude,Longitude,Type\nHub,1,1,Flagship\nShop,2,2,Retailer\n";
        let locations = read_locations(csv.as_bytes()).unwrap();
        let requirements = read_requirements("Name,RequiresDelivery\nHub,Yes\nShop,Yes\n".as_bytes()).unwrap();
        let config = DataConfig {
            depot_kind: "flagship".to_string(),
            ..DataConfig::default()
        };

        let stops = join_delivery_stops(&locations, &requirements, &config).unwrap();
        assert!(stops[0].is_depot());
    }

    #[test]
    fn test_split_depot_first_wins() {
        let stops = vec![
            Stop::retailer("A", 0.0, 0.0),
            Stop::depot("D1", 1.0, 1.0),
            Stop::depot("D2", 2.0, 2.0),
        ];

        let set = split_depot(stops).unwrap();

        assert_eq!(set.depot.name, "D1");
        assert_eq!(names(&set.stops), vec!["A", "D2"]);
    }

    #[test]
    fn test_split_depot_requires_depot() {
        let err = split_depot(vec![Stop::retailer("A", 0.0, 0.0)]).unwrap_err();
        assert_eq!(err.code(), "DATA_INTEGRITY_ERROR");
    }

    #[test]
    fn test_split_depot_requires_stops() {
        let err = split_depot(vec![Stop::depot("D", 0.0, 0.0)]).unwrap_err();
        assert_eq!(err.code(), "DATA_INTEGRITY_ERROR");
    }

    #[test]
    fn test_depot_not_requiring_delivery_is_not_selected() {
        let locations = read_locations(LOCATIONS.as_bytes()).unwrap();
        let requirements = read_requirements(
            "Name,RequiresDelivery\nCentral,No\nNorth,Yes\nEast,Yes\nWest,Yes\n".as_bytes(),
        )
        .unwrap();

        let stops = join_delivery_stops(&locations, &requirements, &DataConfig::default()).unwrap();
        let err = split_depot(stops).unwrap_err();
        assert!(err.to_string().contains("no depot"));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("Yes"), Some(true));
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("no"), Some(false));
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let locations_path = dir.path().join("locations.csv");
        let requirements_path = dir.path().join("requirements.csv");
        File::create(&locations_path).unwrap().write_all(LOCATIONS.as_bytes()).unwrap();
        File::create(&requirements_path).unwrap().write_all(REQUIREMENTS.as_bytes()).unwrap();

        assert_eq!(load_locations(&locations_path).unwrap().len(), 4);
        assert_eq!(load_requirements(&requirements_path).unwrap().len(), 4);
    }

    #[test]
    fn test_missing_file_is_upstream_error() {
        let err = load_locations(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert_eq!(err.code(), "UPSTREAM_DATA_ERROR");
        assert!(err.to_string().contains("here.csv"));
    }
}
