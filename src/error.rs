//! Error handling for REDD dataset access.
//!
//! Every failure the store can raise is a variant here. Apart from the
//! wrapped I/O and Polars errors they all describe invalid input: a bad
//! path, building, meter, key or label.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReddError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("'{path}' is not a valid path")]
    NotADirectory { path: PathBuf },

    #[error("Building {building} is not a valid building instance.")]
    InvalidBuilding { building: u32 },

    #[error("House directory not found: {path}")]
    BuildingNotFound { path: PathBuf },

    #[error("Channel file not found: {path}")]
    ChannelNotFound { path: PathBuf },

    #[error("{meter} is not a recognised meter instance for building {building}.")]
    UnknownMeter { meter: u32, building: u32 },

    #[error("Mains channel 2 is loaded by meter1.")]
    SecondaryMainsChannel,

    #[error("Label '{label}' of meter {meter} in building {building} has no appliance mapping")]
    UnrecognisedLabel {
        label: String,
        meter: u32,
        building: u32,
    },

    #[error("Invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Invalid labels file {path} at line {line}: {reason}")]
    LabelsFormat {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Timestamp {timestamp} is outside the representable range")]
    InvalidTimestamp { timestamp: f64 },

    #[error("Invalid time frame: {reason}")]
    InvalidTimeFrame { reason: String },
}

impl ReddError {
    /// Create an invalid key error
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by the caller's input rather than the
    /// underlying I/O or parsing machinery.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::Polars(_))
    }
}

pub type Result<T> = std::result::Result<T, ReddError>;
