//! Command implementations for the REDD CLI
//!
//! Each subcommand opens the store, runs one [`DataStore`] operation and
//! prints the result to stdout. Logging goes to stderr.

use crate::cli::args::{Args, Commands, DatasetArgs, ListArgs, LoadArgs, MetadataArgs, parse_key_arg};
use crate::config::StoreConfig;
use crate::key::Key;
use crate::loader::ChannelSegment;
use crate::store::{DataStore, ReddStore};
use crate::timeframe::TimeFrame;

use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::debug;

/// Main command runner
pub fn run(args: Args) -> Result<()> {
    setup_logging(&args)?;

    match args.command {
        Commands::List(list_args) => run_list(&list_args),
        Commands::Metadata(metadata_args) => run_metadata(&metadata_args),
        Commands::Load(load_args) => run_load(&load_args, args.quiet),
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("redd_store={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .context("Failed to initialise logging")?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

fn open_store(dataset: &DatasetArgs, config: StoreConfig) -> Result<ReddStore> {
    let path = dataset
        .resolve()
        .context("No dataset path given and no user data directory to default to")?;
    let store = ReddStore::new(&path)
        .with_context(|| format!("Failed to open REDD dataset at {}", path.display()))?;
    Ok(store.with_config(config))
}

fn run_list(args: &ListArgs) -> Result<()> {
    let store = open_store(&args.dataset, StoreConfig::default())?;
    let key = parse_key_arg(&args.key)?;

    let elements = store
        .elements_below_key(key.as_ref())
        .with_context(|| format!("Failed to list elements below '{}'", args.key))?;

    for element in elements {
        println!("{}", element);
    }
    Ok(())
}

fn run_metadata(args: &MetadataArgs) -> Result<()> {
    let store = open_store(&args.dataset, StoreConfig::default())?;
    let key = parse_key_arg(&args.key)?;

    let metadata = store
        .load_metadata(key.as_ref())
        .with_context(|| format!("Failed to load metadata for '{}'", args.key))?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&metadata)?
    } else {
        serde_json::to_string(&metadata)?
    };
    println!("{}", json);
    Ok(())
}

fn run_load(args: &LoadArgs, quiet: bool) -> Result<()> {
    let config = StoreConfig::default()
        .with_timezone(args.timezone)
        .with_look_ahead_rows(args.look_ahead);
    let store = open_store(&args.dataset, config)?;
    let key = Key::parse(&args.key)?;
    let windows = args.time_frames()?;

    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .context("Invalid progress template")?,
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    };
    spinner.set_message(format!("Reading {}", key));

    let segments = store
        .load(&key, windows.as_deref())
        .with_context(|| format!("Failed to load '{}'", key));
    spinner.finish_and_clear();
    let segments = segments?;

    println!(
        "{} {} ({})",
        "Channel span:".bright_cyan(),
        describe_timeframe(&segments.channel_timeframe()),
        key
    );

    for (index, segment) in segments.enumerate() {
        print_segment(index + 1, &segment, args.head);
    }
    Ok(())
}

fn print_segment(number: usize, segment: &ChannelSegment, head: usize) {
    println!();
    println!(
        "{} {}",
        format!("Segment {}:", number).bright_green().bold(),
        describe_timeframe(&segment.timeframe)
    );
    println!(
        "  {} {}  {} {}  {} {}",
        "Readings:".bright_cyan(),
        segment.len().to_string().bright_white().bold(),
        "Look-ahead:".bright_cyan(),
        segment.look_ahead.len(),
        "Measurement:".bright_cyan(),
        segment.measurement
    );

    for reading in segment.readings.iter().take(head) {
        println!(
            "  {}  {:>10.2}",
            reading.timestamp.format("%Y-%m-%d %H:%M:%S%.3f %Z"),
            reading.power
        );
    }
    if segment.len() > head {
        println!("  {}", format!("... {} more", segment.len() - head).bright_black());
    }
}

fn describe_timeframe(timeframe: &TimeFrame) -> String {
    let bound = |value: Option<chrono::DateTime<chrono_tz::Tz>>| {
        value
            .map(|timestamp| timestamp.format("%Y-%m-%d %H:%M:%S %Z").to_string())
            .unwrap_or_else(|| "unbounded".to_string())
    };
    let close = if timeframe.include_end() { "]" } else { ")" };

    format!("[{}, {}{}", bound(timeframe.start()), bound(timeframe.end()), close)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_describe_timeframe() {
        let frame = TimeFrame::from_unix(0, 60, chrono_tz::UTC).unwrap();
        assert_eq!(
            describe_timeframe(&frame),
            "[1970-01-01 00:00:00 UTC, 1970-01-01 00:01:00 UTC)"
        );

        let closed = frame.with_include_end(true);
        assert!(describe_timeframe(&closed).ends_with(']'));

        assert_eq!(
            describe_timeframe(&TimeFrame::unbounded()),
            "[unbounded, unbounded)"
        );
    }

    #[test]
    fn test_describe_timeframe_local_zone() {
        let start = chrono_tz::US::Eastern.timestamp_opt(1303132929, 0).unwrap();
        let frame = TimeFrame::new(Some(start), None).unwrap();
        assert!(describe_timeframe(&frame).starts_with("[2011-04-18 09:22:09 EDT"));
    }
}
