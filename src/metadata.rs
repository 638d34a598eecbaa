//! Metadata records describing the dataset hierarchy.
//!
//! Three levels exist: the dataset as a whole (the meter hardware used),
//! a building, and a single meter with the appliances it monitors.
//! All records serialize to the JSON shape generic tooling consumes.

use crate::constants::{
    DATASET_NAME, EMONITOR_MANUFACTURER, EMONITOR_MANUFACTURER_URL, EMONITOR_MAX_SAMPLE_PERIOD,
    EMONITOR_MODEL, EMONITOR_SAMPLE_PERIOD, EMONITOR_UPPER_LIMIT, HOUSE_DIR_PREFIX,
    WHOLE_HOUSE_MAX_SAMPLE_PERIOD, WHOLE_HOUSE_MODEL, WHOLE_HOUSE_SAMPLE_PERIOD,
    WHOLE_HOUSE_UPPER_LIMIT,
};
use crate::labels::LabelDescription;
use crate::measurement::Measurement;
use serde::Serialize;
use std::collections::BTreeMap;

/// Metadata for any level of the hierarchy
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Metadata {
    Dataset(DatasetMetadata),
    Building(BuildingMetadata),
    Meter(MeterMetadata),
}

impl Metadata {
    pub fn as_dataset(&self) -> Option<&DatasetMetadata> {
        match self {
            Metadata::Dataset(dataset) => Some(dataset),
            _ => None,
        }
    }

    pub fn as_building(&self) -> Option<&BuildingMetadata> {
        match self {
            Metadata::Building(building) => Some(building),
            _ => None,
        }
    }

    pub fn as_meter(&self) -> Option<&MeterMetadata> {
        match self {
            Metadata::Meter(meter) => Some(meter),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetMetadata {
    pub meter_devices: BTreeMap<String, MeterDevice>,
}

impl DatasetMetadata {
    /// The two device classes REDD was recorded with
    pub fn redd() -> Self {
        let mut meter_devices = BTreeMap::new();
        meter_devices.insert(
            EMONITOR_MODEL.to_string(),
            MeterDevice {
                model: Some(EMONITOR_MODEL.to_string()),
                manufacturer: Some(EMONITOR_MANUFACTURER.to_string()),
                manufacturer_url: Some(EMONITOR_MANUFACTURER_URL.to_string()),
                sample_period: EMONITOR_SAMPLE_PERIOD,
                max_sample_period: EMONITOR_MAX_SAMPLE_PERIOD,
                measurements: vec![Measurement::ACTIVE_POWER],
                measurement_limits: active_power_limits(EMONITOR_UPPER_LIMIT),
            },
        );
        meter_devices.insert(
            WHOLE_HOUSE_MODEL.to_string(),
            MeterDevice {
                model: None,
                manufacturer: None,
                manufacturer_url: None,
                sample_period: WHOLE_HOUSE_SAMPLE_PERIOD,
                max_sample_period: WHOLE_HOUSE_MAX_SAMPLE_PERIOD,
                measurements: vec![Measurement::ACTIVE_POWER],
                measurement_limits: active_power_limits(WHOLE_HOUSE_UPPER_LIMIT),
            },
        );
        Self { meter_devices }
    }
}

fn active_power_limits(upper_limit: f64) -> BTreeMap<Measurement, MeasurementLimits> {
    let mut limits = BTreeMap::new();
    limits.insert(
        Measurement::ACTIVE_POWER,
        MeasurementLimits {
            lower_limit: 0.0,
            upper_limit,
        },
    );
    limits
}

/// A class of metering hardware
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeterDevice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer_url: Option<String>,
    /// Nominal seconds between samples
    pub sample_period: u32,
    /// Gaps longer than this many seconds mean the meter was off
    pub max_sample_period: u32,
    pub measurements: Vec<Measurement>,
    pub measurement_limits: BTreeMap<Measurement, MeasurementLimits>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasurementLimits {
    pub lower_limit: f64,
    pub upper_limit: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildingMetadata {
    pub instance: u32,
    pub dataset: String,
    pub original_name: String,
}

impl BuildingMetadata {
    pub fn new(building: u32) -> Self {
        Self {
            instance: building,
            dataset: DATASET_NAME.to_string(),
            original_name: format!("{HOUSE_DIR_PREFIX}{building}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeterMetadata {
    pub device_model: String,
    pub instance: u32,
    pub building: u32,
    pub dataset: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub site_meter: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_channels: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submeter_of: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<Room>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub appliances: Vec<Appliance>,
}

impl MeterMetadata {
    /// The base record shared by every meter
    pub fn new(building: u32, meter: u32, device_model: &str) -> Self {
        Self {
            device_model: device_model.to_string(),
            instance: meter,
            building,
            dataset: DATASET_NAME.to_string(),
            site_meter: false,
            additional_channels: Vec::new(),
            submeter_of: None,
            category: None,
            room: None,
            appliances: Vec::new(),
        }
    }

    /// Copy category, room and appliance types from a label description.
    /// Every appliance gets `instance`.
    pub fn apply_label(&mut self, description: &LabelDescription, instance: u32) {
        self.category = description.category.map(str::to_string);
        self.room = description.room.map(|name| Room {
            name: name.to_string(),
        });
        self.appliances = description
            .appliances
            .iter()
            .map(|appliance| Appliance {
                type_name: appliance.type_name.to_string(),
                multiple: appliance.multiple,
                instance,
            })
            .collect();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appliance {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub multiple: bool,
    /// Position of this appliance among same-labelled channels in the house, from 1
    pub instance: u32,
}
