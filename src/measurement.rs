//! Measurement tags labelling the value column of a reading stream.

use serde::{Serialize, Serializer};
use std::fmt;

/// AC power flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AcType {
    Active,
    Reactive,
    Apparent,
}

impl AcType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcType::Active => "active",
            AcType::Reactive => "reactive",
            AcType::Apparent => "apparent",
        }
    }
}

/// What a column of readings measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Measurement {
    Power(AcType),
}

impl Measurement {
    /// Active power in watts, the only measurement REDD low-frequency data carries
    pub const ACTIVE_POWER: Measurement = Measurement::Power(AcType::Active);
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measurement::Power(ac_type) => write!(f, "power/{}", ac_type.as_str()),
        }
    }
}

// Serialized as a string so it can key JSON maps
impl Serialize for Measurement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_display() {
        assert_eq!(Measurement::ACTIVE_POWER.to_string(), "power/active");
        assert_eq!(
            Measurement::Power(AcType::Apparent).to_string(),
            "power/apparent"
        );
    }

    #[test]
    fn test_serializes_as_map_key() {
        let mut limits = BTreeMap::new();
        limits.insert(Measurement::ACTIVE_POWER, 5000);

        let json = serde_json::to_string(&limits).unwrap();
        assert_eq!(json, r#"{"power/active":5000}"#);
    }
}
