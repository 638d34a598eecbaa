//! Application constants for the REDD store
//!
//! File layout names, building and channel numbering rules, and the
//! device models REDD was recorded with.

// =============================================================================
// Dataset Identity
// =============================================================================

/// Dataset name reported in building and meter metadata
pub const DATASET_NAME: &str = "REDD";

/// The only utility REDD measures
pub const ELECTRIC_UTILITY: &str = "electric";

// =============================================================================
// Directory and File Layout
// =============================================================================

/// House directories are named `house_<N>`
pub const HOUSE_DIR_PREFIX: &str = "house_";

/// Channel files are named `channel_<N>.dat`
pub const CHANNEL_FILE_PREFIX: &str = "channel_";
pub const CHANNEL_FILE_EXTENSION: &str = "dat";

/// Per-house channel label file
pub const LABELS_FILENAME: &str = "labels.dat";

/// Channel files are single-space separated
pub const CHANNEL_FILE_SEPARATOR: u8 = b' ';

/// Column names used while parsing channel files
pub mod columns {
    pub const TIMESTAMP: &str = "timestamp";
    pub const POWER: &str = "power";
}

// =============================================================================
// Hierarchy Numbering
// =============================================================================

/// Lowest building number in the dataset
pub const MIN_BUILDING: u32 = 1;

/// Highest building number in the dataset
pub const MAX_BUILDING: u32 = 6;

/// Meter carrying the whole-house aggregate (mains channel 1)
pub const SITE_METER: u32 = 1;

/// Second mains channel, folded into the site meter
pub const SECONDARY_MAINS_CHANNEL: u32 = 2;

/// Key element prefixes
pub const BUILDING_KEY_PREFIX: &str = "building";
pub const METER_KEY_PREFIX: &str = "meter";

// =============================================================================
// Meter Devices
// =============================================================================

/// Submeter hardware model
pub const EMONITOR_MODEL: &str = "eMonitor";
pub const EMONITOR_MANUFACTURER: &str = "Powerhouse Dynamics";
pub const EMONITOR_MANUFACTURER_URL: &str = "http://powerhousedynamics.com";
pub const EMONITOR_SAMPLE_PERIOD: u32 = 3;
pub const EMONITOR_MAX_SAMPLE_PERIOD: u32 = 50;
pub const EMONITOR_UPPER_LIMIT: f64 = 5_000.0;

/// Whole-house mains recorder
pub const WHOLE_HOUSE_MODEL: &str = "REDD_whole_house";
pub const WHOLE_HOUSE_SAMPLE_PERIOD: u32 = 1;
pub const WHOLE_HOUSE_MAX_SAMPLE_PERIOD: u32 = 30;
pub const WHOLE_HOUSE_UPPER_LIMIT: f64 = 50_000.0;

// =============================================================================
// Loader Defaults
// =============================================================================

/// REDD houses are in the Boston area
pub const DEFAULT_TIMEZONE: &str = "US/Eastern";

/// Rows handed to windowed computations after each window's end
pub const DEFAULT_LOOK_AHEAD_ROWS: usize = 10;

/// Environment variable naming the dataset root for the CLI
pub const DATASET_PATH_ENV: &str = "REDD_PATH";
