//! Channel file loading and windowed segmentation.
//!
//! REDD channel files hold one `unix_timestamp power` pair per line,
//! separated by a single space, with no header. Rows are not guaranteed to
//! be in time order. [`read_channel`] parses a file with the Polars CSV
//! reader, sorts the rows and converts timestamps to the configured local
//! time zone. [`ChannelSegments`] then hands the result out one segment per
//! requested window.

use crate::constants::{CHANNEL_FILE_SEPARATOR, columns};
use crate::error::{ReddError, Result};
use crate::measurement::Measurement;
use crate::timeframe::TimeFrame;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// A single power sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerReading {
    pub timestamp: DateTime<Tz>,
    /// Watts
    pub power: f32,
}

/// The full, time-ordered contents of one channel file
#[derive(Debug, Clone)]
pub struct ChannelData {
    pub readings: Vec<PowerReading>,
    /// `[first, last]` reading, end inclusive. Unbounded for an empty file.
    pub timeframe: TimeFrame,
}

/// One piece of a loaded channel
#[derive(Debug, Clone)]
pub struct ChannelSegment {
    pub readings: Vec<PowerReading>,
    /// The requested window intersected with the channel's span
    pub timeframe: TimeFrame,
    /// Rows at or after the window's end, ignoring any following window
    pub look_ahead: Vec<PowerReading>,
    pub measurement: Measurement,
}

impl ChannelSegment {
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

/// Read, sort and localise a channel file
pub fn read_channel(path: &Path, timezone: Tz) -> Result<ChannelData> {
    // Polars refuses empty CSV input
    if std::fs::metadata(path)?.len() == 0 {
        warn!("Channel file {} is empty", path.display());
        return Ok(ChannelData {
            readings: Vec::new(),
            timeframe: TimeFrame::unbounded().with_include_end(true),
        });
    }

    let schema = Schema::from_iter([
        Field::new(columns::TIMESTAMP.into(), DataType::Float64),
        Field::new(columns::POWER.into(), DataType::Float32),
    ]);

    let frame = CsvReadOptions::default()
        .with_has_header(false)
        .with_schema(Some(Arc::new(schema)))
        .map_parse_options(|options| options.with_separator(CHANNEL_FILE_SEPARATOR))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let timestamps = frame.column(columns::TIMESTAMP)?.f64()?;
    let powers = frame.column(columns::POWER)?.f32()?;

    let mut readings = Vec::with_capacity(frame.height());
    for (timestamp, power) in timestamps.into_iter().zip(powers.into_iter()) {
        let (Some(timestamp), Some(power)) = (timestamp, power) else {
            continue;
        };
        readings.push(PowerReading {
            timestamp: localise(timestamp, timezone)?,
            power,
        });
    }

    // Raw REDD data isn't always sorted
    readings.sort_by_key(|reading| reading.timestamp);

    let timeframe = match (readings.first(), readings.last()) {
        (Some(first), Some(last)) => {
            TimeFrame::new(Some(first.timestamp), Some(last.timestamp))?.with_include_end(true)
        }
        _ => TimeFrame::unbounded().with_include_end(true),
    };

    debug!(
        "Loaded {} readings from {} ({} rows skipped)",
        readings.len(),
        path.display(),
        frame.height() - readings.len()
    );

    Ok(ChannelData {
        readings,
        timeframe,
    })
}

/// Convert fractional unix seconds to a zoned timestamp
fn localise(timestamp: f64, timezone: Tz) -> Result<DateTime<Tz>> {
    let secs = timestamp.floor();
    let nanos = ((timestamp - secs) * 1e9).round().min(999_999_999.0) as u32;

    DateTime::<Utc>::from_timestamp(secs as i64, nanos)
        .filter(|_| timestamp.is_finite())
        .map(|utc| utc.with_timezone(&timezone))
        .ok_or(ReddError::InvalidTimestamp { timestamp })
}

enum SegmentPlan {
    Whole { yielded: bool },
    Windows(std::vec::IntoIter<TimeFrame>),
}

/// Lazily yields the segments of one loaded channel.
///
/// Without windows the whole channel comes out as a single segment. With
/// windows, each call to `next` slices out the following window only.
pub struct ChannelSegments {
    data: ChannelData,
    plan: SegmentPlan,
    look_ahead_rows: usize,
}

impl ChannelSegments {
    pub fn new(data: ChannelData, windows: Option<&[TimeFrame]>, look_ahead_rows: usize) -> Self {
        let plan = match windows {
            Some(windows) if !windows.is_empty() => SegmentPlan::Windows(windows.to_vec().into_iter()),
            _ => SegmentPlan::Whole { yielded: false },
        };

        Self {
            data,
            plan,
            look_ahead_rows,
        }
    }

    /// Span of the whole channel, independent of the requested windows
    pub fn channel_timeframe(&self) -> TimeFrame {
        self.data.timeframe
    }

    fn window_segment(&self, window: &TimeFrame) -> ChannelSegment {
        let readings = window.slice(&self.data.readings).to_vec();

        let look_ahead = match window.end() {
            Some(end) => {
                let from = self
                    .data
                    .readings
                    .partition_point(|reading| reading.timestamp < end);
                self.data.readings[from..]
                    .iter()
                    .take(self.look_ahead_rows)
                    .copied()
                    .collect()
            }
            None => Vec::new(),
        };

        debug!(
            "Window {:?}..{:?}: {} readings, {} look-ahead",
            window.start(),
            window.end(),
            readings.len(),
            look_ahead.len()
        );

        ChannelSegment {
            readings,
            timeframe: window.intersect(&self.data.timeframe),
            look_ahead,
            measurement: Measurement::ACTIVE_POWER,
        }
    }
}

impl Iterator for ChannelSegments {
    type Item = ChannelSegment;

    fn next(&mut self) -> Option<ChannelSegment> {
        match &mut self.plan {
            SegmentPlan::Whole { yielded } => {
                if *yielded {
                    return None;
                }
                *yielded = true;
                Some(ChannelSegment {
                    readings: std::mem::take(&mut self.data.readings),
                    timeframe: self.data.timeframe,
                    look_ahead: Vec::new(),
                    measurement: Measurement::ACTIVE_POWER,
                })
            }
            SegmentPlan::Windows(windows) => {
                let window = windows.next()?;
                Some(self.window_segment(&window))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match &self.plan {
            SegmentPlan::Whole { yielded } => usize::from(!*yielded),
            SegmentPlan::Windows(windows) => windows.len(),
        };
        (remaining, Some(remaining))
    }
}
