//! Store configuration.
//!
//! Holds the settings that shape loaded readings: the local time zone the
//! unix timestamps are converted into, and how many look-ahead rows follow
//! each windowed segment.

use crate::constants::DEFAULT_LOOK_AHEAD_ROWS;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Configuration for a [`ReddStore`](crate::store::ReddStore)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Time zone readings are reported in
    pub timezone: Tz,

    /// Maximum rows kept in each segment's look-ahead buffer
    pub look_ahead_rows: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::US::Eastern,
            look_ahead_rows: DEFAULT_LOOK_AHEAD_ROWS,
        }
    }
}

impl StoreConfig {
    /// Report readings in a different time zone
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Set the look-ahead buffer length
    pub fn with_look_ahead_rows(mut self, rows: usize) -> Self {
        self.look_ahead_rows = rows;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_TIMEZONE;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.timezone.name(), DEFAULT_TIMEZONE);
        assert_eq!(config.look_ahead_rows, 10);
    }

    #[test]
    fn test_builder_methods() {
        let config = StoreConfig::default()
            .with_timezone(chrono_tz::UTC)
            .with_look_ahead_rows(3);

        assert_eq!(config.timezone, chrono_tz::UTC);
        assert_eq!(config.look_ahead_rows, 3);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = StoreConfig::default().with_look_ahead_rows(5);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("US/Eastern"));

        let parsed: StoreConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
