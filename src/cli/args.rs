//! Command-line argument definitions for the REDD store
//!
//! Defines the `redd` CLI using the clap derive API. Each subcommand maps
//! onto one [`DataStore`](crate::store::DataStore) operation.

use crate::constants::DATASET_PATH_ENV;
use crate::error::{ReddError, Result};
use crate::key::Key;
use crate::timeframe::TimeFrame;
use chrono_tz::Tz;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the REDD dataset browser
///
/// Reads channel data and metadata from a REDD low-frequency directory tree
/// (house_1/ .. house_6/ with labels.dat and channel_N.dat files).
#[derive(Debug, Clone, Parser)]
#[command(
    name = "redd",
    version,
    about = "Browse REDD energy-submetering data: hierarchy, metadata and channel readings"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Args {
    /// Log level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// List the identifiers one level below a key
    List(ListArgs),
    /// Print metadata for the dataset, a building or a meter as JSON
    Metadata(MetadataArgs),
    /// Load a meter's readings, optionally split into time windows
    Load(LoadArgs),
}

/// Location of the dataset on disk
#[derive(Debug, Clone, ClapArgs)]
pub struct DatasetArgs {
    /// Root of the REDD directory tree (containing house_1/ .. house_6/)
    ///
    /// Falls back to the REDD_PATH environment variable, then to
    /// <user data dir>/redd/low_freq.
    #[arg(short = 'd', long = "dataset", value_name = "PATH", env = DATASET_PATH_ENV)]
    pub dataset_path: Option<PathBuf>,
}

impl DatasetArgs {
    /// Resolve the dataset root, applying the default location
    pub fn resolve(&self) -> Option<PathBuf> {
        self.dataset_path
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join("redd").join("low_freq")))
    }
}

#[derive(Debug, Clone, ClapArgs)]
pub struct ListArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Key to list below, e.g. /building1 or /building1/electric (default: root)
    #[arg(value_name = "KEY", default_value = "/")]
    pub key: String,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct MetadataArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Key to describe, e.g. /building1/electric/meter5 (default: whole dataset)
    #[arg(value_name = "KEY", default_value = "/")]
    pub key: String,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct LoadArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Meter key to load, e.g. /building1/electric/meter1
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Time window as START,END unix seconds; repeat for several windows
    #[arg(short = 'w', long = "window", value_name = "START,END")]
    pub windows: Vec<WindowArg>,

    /// Number of readings to print from each segment
    #[arg(long, value_name = "N", default_value = "5")]
    pub head: usize,

    /// Time zone readings are reported in
    #[arg(long, value_name = "TZ", default_value = crate::constants::DEFAULT_TIMEZONE)]
    pub timezone: Tz,

    /// Look-ahead rows kept after each window's end
    #[arg(long, value_name = "ROWS", default_value_t = crate::constants::DEFAULT_LOOK_AHEAD_ROWS)]
    pub look_ahead: usize,
}

impl LoadArgs {
    /// Windows as time frames in the requested zone; `None` when no windows were given
    pub fn time_frames(&self) -> Result<Option<Vec<TimeFrame>>> {
        if self.windows.is_empty() {
            return Ok(None);
        }
        self.windows
            .iter()
            .map(|window| TimeFrame::from_unix(window.start, window.end, self.timezone))
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }
}

/// A `START,END` pair of unix seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowArg {
    pub start: i64,
    pub end: i64,
}

impl FromStr for WindowArg {
    type Err = ReddError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| ReddError::InvalidTimeFrame {
            reason: format!("'{s}': {reason}"),
        };

        let (start, end) = s
            .split_once(',')
            .ok_or_else(|| invalid("expected START,END"))?;
        let start: i64 = start
            .trim()
            .parse()
            .map_err(|_| invalid("START is not a unix timestamp"))?;
        let end: i64 = end
            .trim()
            .parse()
            .map_err(|_| invalid("END is not a unix timestamp"))?;

        if start > end {
            return Err(invalid("START is after END"));
        }
        Ok(Self { start, end })
    }
}

/// Parse a key argument where `/` names the dataset root
pub fn parse_key_arg(key: &str) -> Result<Option<Key>> {
    Key::parse_optional(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_command() {
        let args = Args::parse_from(["redd", "list", "--dataset", "/data/redd", "/building2"]);
        assert_eq!(args.get_log_level(), "info");

        match args.command {
            Commands::List(list) => {
                assert_eq!(list.key, "/building2");
                assert_eq!(list.dataset.dataset_path, Some(PathBuf::from("/data/redd")));
            }
            other => panic!("Expected list command, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_load_command_with_windows() {
        let args = Args::parse_from([
            "redd",
            "-v",
            "load",
            "/building1/electric/meter1",
            "-w",
            "100,200",
            "--window",
            "300,400",
            "--timezone",
            "UTC",
        ]);
        assert_eq!(args.get_log_level(), "debug");

        let Commands::Load(load) = args.command else {
            panic!("Expected load command");
        };
        assert_eq!(
            load.windows,
            vec![
                WindowArg { start: 100, end: 200 },
                WindowArg { start: 300, end: 400 }
            ]
        );
        assert_eq!(load.timezone, chrono_tz::UTC);
        assert_eq!(load.head, 5);

        let frames = load.time_frames().unwrap().unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].start().unwrap().timestamp(), 100);
    }

    #[test]
    fn test_window_arg_validation() {
        assert!("5,10".parse::<WindowArg>().is_ok());
        assert!("10".parse::<WindowArg>().is_err());
        assert!("a,10".parse::<WindowArg>().is_err());
        assert!("10,5".parse::<WindowArg>().is_err());
    }

    #[test]
    fn test_metadata_defaults_to_root() {
        let args = Args::parse_from(["redd", "metadata", "-q"]);
        assert_eq!(args.get_log_level(), "warn");

        let Commands::Metadata(metadata) = args.command else {
            panic!("Expected metadata command");
        };
        assert_eq!(parse_key_arg(&metadata.key).unwrap(), None);
    }
}
