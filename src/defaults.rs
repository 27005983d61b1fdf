pub const DEFAULT_LOCATIONS_CSV: &str = "data/store_locations.csv";
pub const DEFAULT_REQUIREMENTS_CSV: &str = "data/delivery_requirements.csv";
pub const DEFAULT_DEPOT_KIND: &str = "Depot";
pub const DEFAULT_LOGS_DIR: &str = "./logs";

/// Leg is a detour if longer than this multiple of the route's average leg
pub const DEFAULT_OUTLIER_THRESHOLD: f64 = 2.0;
/// Approximate length of one coordinate degree
pub const DEFAULT_KM_PER_DEGREE: f64 = 111.0;
pub const DEFAULT_BILLING_UNIT_KM: f64 = 3.0;
/// Dollars per billing unit
pub const DEFAULT_SURCHARGE_PER_UNIT: f64 = 1.50;

pub const DEFAULT_DBSCAN_EPS: f64 = 0.025;
pub const DEFAULT_DBSCAN_MIN_SAMPLES: usize = 2;

pub const DEFAULT_KMEANS_RESTARTS: usize = 10;
pub const DEFAULT_KMEANS_MAX_ITERATIONS: usize = 300;
pub const DEFAULT_KMEANS_TOLERANCE: f64 = 1e-4;
pub const DEFAULT_KMEANS_SEED: u64 = 0;

pub const DEFAULT_IMAGE_WIDTH: u32 = 1000;
pub const DEFAULT_IMAGE_HEIGHT: u32 = 800;
