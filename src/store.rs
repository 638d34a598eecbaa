//! The REDD data store.
//!
//! [`ReddStore`] implements the generic [`DataStore`] interface over a REDD
//! low-frequency directory tree:
//!
//! ```text
//! low_freq/
//!   house_1/
//!     labels.dat        "1 mains", "2 mains", "3 oven", ...
//!     channel_1.dat     "1303132929 222.20", ...
//!     channel_2.dat
//!     ...
//!   house_2/
//!   ...
//!   house_6/
//! ```
//!
//! Every call is a stateless read: labels are re-read from disk each time.

use crate::config::StoreConfig;
use crate::constants::{
    BUILDING_KEY_PREFIX, CHANNEL_FILE_EXTENSION, CHANNEL_FILE_PREFIX, ELECTRIC_UTILITY, EMONITOR_MODEL,
    HOUSE_DIR_PREFIX, MAX_BUILDING, METER_KEY_PREFIX, MIN_BUILDING, SECONDARY_MAINS_CHANNEL,
    SITE_METER, WHOLE_HOUSE_MODEL,
};
use crate::error::{ReddError, Result};
use crate::key::Key;
use crate::labels::{describe, load_labels};
use crate::loader::{ChannelSegment, ChannelSegments, read_channel};
use crate::metadata::{BuildingMetadata, DatasetMetadata, Metadata, MeterMetadata};
use crate::timeframe::TimeFrame;

use std::path::{Path, PathBuf};
use tracing::debug;

/// Generic read interface over a metered-energy dataset
pub trait DataStore {
    /// Iterator over the loaded segments of one channel
    type Segments: Iterator<Item = ChannelSegment>;

    /// Load a channel's readings, one segment per window in `periods`, or a
    /// single segment for the whole channel when no windows are given.
    fn load(&self, key: &Key, periods: Option<&[TimeFrame]>) -> Result<Self::Segments>;

    /// Metadata for the dataset (`None`), a building, or a meter
    fn load_metadata(&self, key: Option<&Key>) -> Result<Metadata>;

    /// Identifiers one level below `key`; `None` is the dataset root
    fn elements_below_key(&self, key: Option<&Key>) -> Result<Vec<String>>;
}

#[derive(Debug, Clone)]
pub struct ReddStore {
    path: PathBuf,
    config: StoreConfig,
}

impl ReddStore {
    /// Open a REDD directory tree rooted at `path`
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_dir() {
            return Err(ReddError::NotADirectory { path });
        }

        debug!("Opened REDD store at {}", path.display());
        Ok(Self {
            path,
            config: StoreConfig::default(),
        })
    }

    /// Replace the store configuration
    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn house_path(&self, building: u32) -> Result<PathBuf> {
        let path = self.path.join(format!("{HOUSE_DIR_PREFIX}{building}"));
        if !path.is_dir() {
            return Err(ReddError::BuildingNotFound { path });
        }
        Ok(path)
    }

    fn channel_path(&self, building: u32, meter: u32) -> Result<PathBuf> {
        let path = self.house_path(building)?.join(format!(
            "{CHANNEL_FILE_PREFIX}{meter}.{CHANNEL_FILE_EXTENSION}"
        ));
        if !path.is_file() {
            return Err(ReddError::ChannelNotFound { path });
        }
        Ok(path)
    }

    fn meter_metadata(&self, building: u32, meter: u32) -> Result<MeterMetadata> {
        if meter == SITE_METER {
            let mut metadata = MeterMetadata::new(building, meter, WHOLE_HOUSE_MODEL);
            metadata.site_meter = true;
            metadata.additional_channels = vec![SECONDARY_MAINS_CHANNEL];
            return Ok(metadata);
        }
        if meter == SECONDARY_MAINS_CHANNEL {
            return Err(ReddError::SecondaryMainsChannel);
        }

        let mut metadata = MeterMetadata::new(building, meter, EMONITOR_MODEL);
        metadata.submeter_of = Some(SITE_METER);

        let labels = load_labels(&self.house_path(building)?)?;
        let label = labels
            .get(&meter)
            .ok_or(ReddError::UnknownMeter { meter, building })?;
        let description = describe(label).ok_or_else(|| ReddError::UnrecognisedLabel {
            label: label.clone(),
            meter,
            building,
        })?;

        // Nth channel carrying this label in the house, counting from 1
        let earlier = labels
            .range(..meter)
            .filter(|(_, other)| *other == label)
            .count();
        let instance = u32::try_from(earlier + 1).unwrap_or(u32::MAX);

        debug!(
            "Building {} meter {} is '{}' (instance {})",
            building, meter, label, instance
        );
        metadata.apply_label(description, instance);
        Ok(metadata)
    }
}

/// Reject buildings outside the dataset's numbering
fn check_building(building: u32) -> Result<()> {
    if (MIN_BUILDING..=MAX_BUILDING).contains(&building) {
        Ok(())
    } else {
        Err(ReddError::InvalidBuilding { building })
    }
}

impl DataStore for ReddStore {
    type Segments = ChannelSegments;

    fn load(&self, key: &Key, periods: Option<&[TimeFrame]>) -> Result<ChannelSegments> {
        let meter = key
            .meter()
            .ok_or_else(|| ReddError::invalid_key(key.to_string(), "loading requires a meter"))?;
        let path = self.channel_path(key.building_number(), meter)?;

        debug!("Loading {} from {}", key, path.display());
        let data = read_channel(&path, self.config.timezone)?;
        Ok(ChannelSegments::new(
            data,
            periods,
            self.config.look_ahead_rows,
        ))
    }

    fn load_metadata(&self, key: Option<&Key>) -> Result<Metadata> {
        let Some(key) = key else {
            return Ok(Metadata::Dataset(DatasetMetadata::redd()));
        };

        let building = key.building_number();
        check_building(building)?;

        match key.meter() {
            None => Ok(Metadata::Building(BuildingMetadata::new(building))),
            Some(meter) => self.meter_metadata(building, meter).map(Metadata::Meter),
        }
    }

    fn elements_below_key(&self, key: Option<&Key>) -> Result<Vec<String>> {
        let Some(key) = key else {
            return Ok((MIN_BUILDING..=MAX_BUILDING)
                .map(|building| format!("{BUILDING_KEY_PREFIX}{building}"))
                .collect());
        };

        if key.meter().is_some() {
            return Err(ReddError::invalid_key(
                key.to_string(),
                "meters have no elements below them",
            ));
        }

        let building = key.building_number();
        check_building(building)?;

        match key.utility() {
            None => Ok(vec![ELECTRIC_UTILITY.to_string()]),
            Some(ELECTRIC_UTILITY) => {
                let labels = load_labels(&self.house_path(building)?)?;
                // Channel 2 is the second half of the mains, loaded as meter 1
                Ok(labels
                    .keys()
                    .filter(|&&channel| channel != SECONDARY_MAINS_CHANNEL)
                    .map(|channel| format!("{METER_KEY_PREFIX}{channel}"))
                    .collect())
            }
            Some(other) => Err(ReddError::invalid_key(
                key.to_string(),
                format!("'{other}' is not a utility in this dataset"),
            )),
        }
    }
}
