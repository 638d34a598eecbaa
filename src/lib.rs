//! REDD Store Library
//!
//! Data access for the REDD home-electricity submetering dataset through a
//! generic, dataset-agnostic interface.
//!
//! This library provides tools for:
//! - Streaming a channel's power readings, optionally cut into time windows
//!   with look-ahead rows for windowed computations
//! - Resolving building and meter metadata, mapping REDD's channel labels onto
//!   canonical appliance types with per-house instance numbers
//! - Enumerating the dataset hierarchy: buildings, utilities and meters
//!
//! ```no_run
//! use redd_store::{DataStore, Key, ReddStore};
//!
//! let store = ReddStore::new("/data/REDD/low_freq")?;
//! let fridge = Key::parse("/building1/electric/meter5")?;
//! println!("{:?}", store.load_metadata(Some(&fridge))?);
//! for segment in store.load(&fridge, None)? {
//!     println!("{} readings", segment.len());
//! }
//! # Ok::<(), redd_store::ReddError>(())
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod key;
pub mod labels;
pub mod loader;
pub mod measurement;
pub mod metadata;
pub mod store;
pub mod timeframe;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::StoreConfig;
pub use error::{ReddError, Result};
pub use key::Key;
pub use loader::{ChannelSegment, ChannelSegments, PowerReading};
pub use measurement::{AcType, Measurement};
pub use metadata::Metadata;
pub use store::{DataStore, ReddStore};
pub use timeframe::TimeFrame;
