//! REDD channel labels and their canonical appliance descriptions.
//!
//! Each house directory carries a `labels.dat` file naming what every
//! channel measures, using REDD's own short vocabulary (typos included).
//! [`describe`] maps that vocabulary onto categories, rooms and appliance
//! types understood by generic tooling.

use crate::constants::LABELS_FILENAME;
use crate::error::{ReddError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// An appliance type a channel label stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplianceType {
    pub type_name: &'static str,
    /// Several identical instances may exist in one house
    pub multiple: bool,
}

/// Canonical description of a REDD channel label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelDescription {
    pub category: Option<&'static str>,
    pub room: Option<&'static str>,
    pub appliances: &'static [ApplianceType],
}

const fn appliance(type_name: &'static str) -> ApplianceType {
    ApplianceType {
        type_name,
        multiple: false,
    }
}

const fn appliances(list: &'static [ApplianceType]) -> LabelDescription {
    LabelDescription {
        category: None,
        room: None,
        appliances: list,
    }
}

const fn circuit(room: Option<&'static str>, category: &'static str) -> LabelDescription {
    LabelDescription {
        category: Some(category),
        room,
        appliances: &[],
    }
}

const AIR_CONDITIONER: &[ApplianceType] = &[appliance("air conditioner")];
const DISH_WASHER: &[ApplianceType] = &[appliance("dish washer")];
const WASTE_DISPOSAL_UNIT: &[ApplianceType] = &[appliance("waste disposal unit")];
const ELECTRIC_SPACE_HEATER: &[ApplianceType] = &[appliance("electric space heater")];
const ELECTRIC_BOILER: &[ApplianceType] = &[appliance("electric boiler")];
const MICROWAVE: &[ApplianceType] = &[appliance("microwave")];
const ELECTRIC_OVEN: &[ApplianceType] = &[appliance("electric oven")];
const FRIDGE: &[ApplianceType] = &[appliance("fridge")];
const SMOKE_ALARM: &[ApplianceType] = &[ApplianceType {
    type_name: "smoke alarm",
    multiple: true,
}];
const ELECTRIC_STOVE: &[ApplianceType] = &[appliance("electric stove")];
const WASHER_DRYER: &[ApplianceType] = &[appliance("washer dryer")];

/// REDD label vocabulary. Spellings must match `labels.dat` verbatim.
const LABEL_TABLE: &[(&str, LabelDescription)] = &[
    ("air_conditioning", appliances(AIR_CONDITIONER)),
    // GFI: ground fault interrupter circuit
    ("bathroom_gfi", circuit(Some("bathroom"), "misc")),
    ("dishwaser", appliances(DISH_WASHER)),
    ("disposal", appliances(WASTE_DISPOSAL_UNIT)),
    ("electric_heat", appliances(ELECTRIC_SPACE_HEATER)),
    ("electronics", circuit(None, "consumer electronics")),
    ("furance", appliances(ELECTRIC_BOILER)),
    ("kitchen_outlets", circuit(Some("kitchen"), "sockets")),
    ("lighting", circuit(None, "lighting")),
    ("microwave", appliances(MICROWAVE)),
    ("miscellaeneous", circuit(None, "misc")),
    ("outdoor_outlets", circuit(Some("outdoors"), "sockets")),
    ("outlets_unknown", circuit(None, "sockets")),
    ("oven", appliances(ELECTRIC_OVEN)),
    ("refrigerator", appliances(FRIDGE)),
    ("smoke_alarms", appliances(SMOKE_ALARM)),
    ("stove", appliances(ELECTRIC_STOVE)),
    // A subpanel feeds other circuits; it is not an appliance
    ("subpanel", appliances(&[])),
    ("washer_dryer", appliances(WASHER_DRYER)),
];

/// Look up the canonical description of a REDD label
pub fn describe(label: &str) -> Option<&'static LabelDescription> {
    LABEL_TABLE
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, description)| description)
}

/// All labels with a known description
pub fn known_labels() -> impl Iterator<Item = &'static str> {
    LABEL_TABLE.iter().map(|(name, _)| *name)
}

/// Read `labels.dat` from a house directory.
///
/// Returns channel number → label, ordered by channel number. The file is
/// read afresh on every call.
pub fn load_labels(house_dir: &Path) -> Result<BTreeMap<u32, String>> {
    let path = house_dir.join(LABELS_FILENAME);
    let contents = fs::read_to_string(&path)?;

    let mut labels = BTreeMap::new();
    for (index, line) in contents.lines().enumerate() {
        let mut fields = line.split_whitespace();
        let Some(channel) = fields.next() else {
            continue;
        };

        let format_error = |reason: String| ReddError::LabelsFormat {
            path: path.clone(),
            line: index + 1,
            reason,
        };

        let channel: u32 = channel
            .parse()
            .map_err(|_| format_error(format!("'{channel}' is not a channel number")))?;
        let label = fields
            .next()
            .ok_or_else(|| format_error(format!("channel {channel} has no label")))?;

        labels.insert(channel, label.to_string());
    }

    debug!("Loaded {} channel labels from {}", labels.len(), path.display());
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_describe_appliance_label() {
        let description = describe("refrigerator").unwrap();
        assert_eq!(description.category, None);
        assert_eq!(description.room, None);
        assert_eq!(description.appliances, FRIDGE);
    }

    #[test]
    fn test_describe_circuit_label() {
        let description = describe("kitchen_outlets").unwrap();
        assert_eq!(description.category, Some("sockets"));
        assert_eq!(description.room, Some("kitchen"));
        assert!(description.appliances.is_empty());
    }

    #[test]
    fn test_describe_keeps_redd_spellings() {
        assert!(describe("dishwaser").is_some());
        assert!(describe("furance").is_some());
        assert!(describe("miscellaeneous").is_some());
        assert!(describe("dishwasher").is_none());
    }

    #[test]
    fn test_mains_and_unknown_labels_unmapped() {
        assert!(describe("mains").is_none());
        assert!(describe("jacuzzi").is_none());
    }

    #[test]
    fn test_smoke_alarms_expect_multiple() {
        let description = describe("smoke_alarms").unwrap();
        assert!(description.appliances[0].multiple);
    }

    #[test]
    fn test_subpanel_is_empty() {
        let description = describe("subpanel").unwrap();
        assert_eq!(description.category, None);
        assert_eq!(description.room, None);
        assert!(description.appliances.is_empty());
    }

    #[test]
    fn test_known_labels_complete() {
        assert_eq!(known_labels().count(), 19);
    }

    #[test]
    fn test_load_labels() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(LABELS_FILENAME),
            "1 mains\n2 mains\n3 oven\n\n10 lighting\n",
        )
        .unwrap();

        let labels = load_labels(temp_dir.path()).unwrap();
        assert_eq!(labels.len(), 4);
        assert_eq!(labels[&3], "oven");
        assert_eq!(labels.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 10]);
    }

    #[test]
    fn test_load_labels_malformed_line() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(LABELS_FILENAME), "1 mains\nthree oven\n").unwrap();

        match load_labels(temp_dir.path()).unwrap_err() {
            ReddError::LabelsFormat { line, .. } => assert_eq!(line, 2),
            other => panic!("Expected LabelsFormat error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_labels_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            load_labels(temp_dir.path()),
            Err(ReddError::Io(_))
        ));
    }
}
