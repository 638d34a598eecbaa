//! Hierarchical keys addressing a location in a dataset.
//!
//! A key names a building, optionally a utility within it, and optionally
//! a meter: `/building1`, `/building1/electric`, `/building1/electric/meter3`.
//! The dataset root has no key; callers pass `None` for it.

use crate::constants::{BUILDING_KEY_PREFIX, METER_KEY_PREFIX};
use crate::error::{ReddError, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    building: u32,
    utility: Option<String>,
    meter: Option<u32>,
}

impl Key {
    /// Key for a whole building
    pub fn building(building: u32) -> Self {
        Self {
            building,
            utility: None,
            meter: None,
        }
    }

    /// Narrow the key to a utility within the building
    pub fn with_utility(mut self, utility: impl Into<String>) -> Self {
        self.utility = Some(utility.into());
        self
    }

    /// Narrow the key to a meter within the building
    pub fn with_meter(mut self, meter: u32) -> Self {
        self.meter = Some(meter);
        self
    }

    /// Parse a key string such as `/building2/electric/meter4`
    pub fn parse(key: &str) -> Result<Self> {
        let elements: Vec<&str> = key
            .trim()
            .trim_matches('/')
            .split('/')
            .filter(|element| !element.is_empty())
            .collect();

        let (first, rest) = elements
            .split_first()
            .ok_or_else(|| ReddError::invalid_key(key, "the dataset root is not a key"))?;

        let building = parse_numbered(first, BUILDING_KEY_PREFIX).ok_or_else(|| {
            ReddError::invalid_key(
                key,
                format!("the first element must be 'building<N>', not '{first}'"),
            )
        })?;

        let mut parsed = Self::building(building);
        match rest {
            [] => {}
            [only] => match parse_numbered(only, METER_KEY_PREFIX) {
                Some(meter) => parsed.meter = Some(meter),
                None => parsed.utility = Some((*only).to_string()),
            },
            [utility, meter] => {
                let meter = parse_numbered(meter, METER_KEY_PREFIX).ok_or_else(|| {
                    ReddError::invalid_key(
                        key,
                        format!("the last element must be 'meter<N>', not '{meter}'"),
                    )
                })?;
                parsed.utility = Some((*utility).to_string());
                parsed.meter = Some(meter);
            }
            _ => {
                return Err(ReddError::invalid_key(
                    key,
                    "keys have at most three elements",
                ));
            }
        }

        Ok(parsed)
    }

    /// Parse an optional key, where `/` or an empty string means the root
    pub fn parse_optional(key: &str) -> Result<Option<Self>> {
        if key.trim().trim_matches('/').is_empty() {
            Ok(None)
        } else {
            Self::parse(key).map(Some)
        }
    }

    pub fn building_number(&self) -> u32 {
        self.building
    }

    pub fn utility(&self) -> Option<&str> {
        self.utility.as_deref()
    }

    pub fn meter(&self) -> Option<u32> {
        self.meter
    }
}

/// Parse `<prefix><N>`, e.g. `meter12`
fn parse_numbered(element: &str, prefix: &str) -> Option<u32> {
    element.strip_prefix(prefix)?.parse().ok()
}

impl FromStr for Key {
    type Err = ReddError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}{}", BUILDING_KEY_PREFIX, self.building)?;
        if let Some(utility) = &self.utility {
            write!(f, "/{utility}")?;
        }
        if let Some(meter) = self.meter {
            write!(f, "/{}{}", METER_KEY_PREFIX, meter)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_key() {
        let key = Key::parse("/building2/electric/meter4").unwrap();
        assert_eq!(key.building_number(), 2);
        assert_eq!(key.utility(), Some("electric"));
        assert_eq!(key.meter(), Some(4));
    }

    #[test]
    fn test_parse_partial_keys() {
        let key = Key::parse("/building5").unwrap();
        assert_eq!(key.building_number(), 5);
        assert_eq!(key.utility(), None);
        assert_eq!(key.meter(), None);

        let key = Key::parse("building1/electric/").unwrap();
        assert_eq!(key.utility(), Some("electric"));
        assert_eq!(key.meter(), None);

        let key = Key::parse("/building3/meter7").unwrap();
        assert_eq!(key.utility(), None);
        assert_eq!(key.meter(), Some(7));
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        assert!(Key::parse("/").is_err());
        assert!(Key::parse("/house1").is_err());
        assert!(Key::parse("/buildingX").is_err());
        assert!(Key::parse("/building1/electric/channel3").is_err());
        assert!(Key::parse("/building1/electric/meter3/extra").is_err());

        match Key::parse("/house1").unwrap_err() {
            ReddError::InvalidKey { key, .. } => assert_eq!(key, "/house1"),
            other => panic!("Expected InvalidKey error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_optional_root() {
        assert_eq!(Key::parse_optional("/").unwrap(), None);
        assert_eq!(Key::parse_optional("").unwrap(), None);
        assert_eq!(
            Key::parse_optional("/building1").unwrap(),
            Some(Key::building(1))
        );
    }

    #[test]
    fn test_display_matches_parse() {
        let key = Key::building(1).with_utility("electric").with_meter(3);
        assert_eq!(key.to_string(), "/building1/electric/meter3");
        assert_eq!(key.to_string().parse::<Key>().unwrap(), key);

        assert_eq!(Key::building(6).to_string(), "/building6");
    }
}
