//! Time windows over reading streams.
//!
//! A [`TimeFrame`] is a half-open interval `[start, end)` by default; either
//! bound may be missing, meaning unbounded on that side. Setting
//! `include_end` closes the interval at `end`.

use crate::error::{ReddError, Result};
use crate::loader::PowerReading;
use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFrame {
    start: Option<DateTime<Tz>>,
    end: Option<DateTime<Tz>>,
    include_end: bool,
}

impl TimeFrame {
    /// Create a window; `start` must not be after `end`
    pub fn new(start: Option<DateTime<Tz>>, end: Option<DateTime<Tz>>) -> Result<Self> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(ReddError::InvalidTimeFrame {
                    reason: format!("start {start} is after end {end}"),
                });
            }
        }

        Ok(Self {
            start,
            end,
            include_end: false,
        })
    }

    /// A window with no bounds at all
    pub fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
            include_end: false,
        }
    }

    /// Build a bounded window from unix seconds, reported in `timezone`
    pub fn from_unix(start: i64, end: i64, timezone: Tz) -> Result<Self> {
        let start = timezone
            .timestamp_opt(start, 0)
            .single()
            .ok_or(ReddError::InvalidTimestamp {
                timestamp: start as f64,
            })?;
        let end = timezone
            .timestamp_opt(end, 0)
            .single()
            .ok_or(ReddError::InvalidTimestamp {
                timestamp: end as f64,
            })?;
        Self::new(Some(start), Some(end))
    }

    pub fn with_include_end(mut self, include_end: bool) -> Self {
        self.include_end = include_end;
        self
    }

    pub fn start(&self) -> Option<DateTime<Tz>> {
        self.start
    }

    pub fn end(&self) -> Option<DateTime<Tz>> {
        self.end
    }

    pub fn include_end(&self) -> bool {
        self.include_end
    }

    /// True when no instant can fall inside the window
    pub fn is_empty(&self) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) if self.include_end => start > end,
            (Some(start), Some(end)) => start >= end,
            _ => false,
        }
    }

    /// Whether `timestamp` falls inside the window
    pub fn contains(&self, timestamp: &DateTime<Tz>) -> bool {
        let after_start = self.start.is_none_or(|start| *timestamp >= start);
        let before_end = self.end.is_none_or(|end| {
            *timestamp < end || (self.include_end && *timestamp == end)
        });
        after_start && before_end
    }

    /// The overlap of two windows. Disjoint windows give an empty frame.
    pub fn intersect(&self, other: &TimeFrame) -> TimeFrame {
        let start = match (self.start, other.start) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };

        let (end, include_end) = match (self.end, other.end) {
            (Some(a), Some(b)) if a < b => (Some(a), self.include_end),
            (Some(a), Some(b)) if b < a => (Some(b), other.include_end),
            (Some(a), Some(_)) => (Some(a), self.include_end && other.include_end),
            (Some(a), None) => (Some(a), self.include_end),
            (None, Some(b)) => (Some(b), other.include_end),
            (None, None) => (None, false),
        };

        TimeFrame {
            start,
            end,
            include_end,
        }
    }

    /// The contiguous run of time-ordered `readings` inside the window
    pub fn slice<'a>(&self, readings: &'a [PowerReading]) -> &'a [PowerReading] {
        let lower = match self.start {
            Some(start) => readings.partition_point(|reading| reading.timestamp < start),
            None => 0,
        };
        let upper = match self.end {
            Some(end) if self.include_end => {
                readings.partition_point(|reading| reading.timestamp <= end)
            }
            Some(end) => readings.partition_point(|reading| reading.timestamp < end),
            None => readings.len(),
        };

        if lower >= upper {
            &[]
        } else {
            &readings[lower..upper]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Tz> {
        chrono_tz::UTC.timestamp_opt(secs, 0).unwrap()
    }

    fn readings(timestamps: &[i64]) -> Vec<PowerReading> {
        timestamps
            .iter()
            .map(|&secs| PowerReading {
                timestamp: at(secs),
                power: secs as f32,
            })
            .collect()
    }

    #[test]
    fn test_new_rejects_reversed_bounds() {
        assert!(TimeFrame::new(Some(at(10)), Some(at(5))).is_err());
        assert!(TimeFrame::new(Some(at(5)), Some(at(5))).is_ok());
        assert!(TimeFrame::from_unix(20, 10, chrono_tz::UTC).is_err());
    }

    #[test]
    fn test_contains_half_open() {
        let frame = TimeFrame::from_unix(10, 20, chrono_tz::UTC).unwrap();
        assert!(frame.contains(&at(10)));
        assert!(frame.contains(&at(19)));
        assert!(!frame.contains(&at(20)));
        assert!(!frame.contains(&at(9)));

        let closed = frame.with_include_end(true);
        assert!(closed.contains(&at(20)));
    }

    #[test]
    fn test_unbounded_contains_everything() {
        let frame = TimeFrame::unbounded();
        assert!(frame.contains(&at(0)));
        assert!(frame.contains(&at(i32::MAX as i64)));
        assert!(!frame.is_empty());
    }

    #[test]
    fn test_intersect_overlapping() {
        let a = TimeFrame::from_unix(0, 100, chrono_tz::UTC)
            .unwrap()
            .with_include_end(true);
        let b = TimeFrame::from_unix(50, 150, chrono_tz::UTC).unwrap();

        let both = a.intersect(&b);
        assert_eq!(both.start(), Some(at(50)));
        assert_eq!(both.end(), Some(at(100)));
        assert!(both.include_end());
    }

    #[test]
    fn test_intersect_disjoint_is_empty() {
        let a = TimeFrame::from_unix(0, 10, chrono_tz::UTC).unwrap();
        let b = TimeFrame::from_unix(20, 30, chrono_tz::UTC).unwrap();
        assert!(a.intersect(&b).is_empty());
    }

    #[test]
    fn test_intersect_with_unbounded() {
        let a = TimeFrame::from_unix(5, 15, chrono_tz::UTC).unwrap();
        assert_eq!(a.intersect(&TimeFrame::unbounded()), a);
        assert_eq!(TimeFrame::unbounded().intersect(&a), a);
    }

    #[test]
    fn test_slice() {
        let data = readings(&[1, 2, 3, 4, 5, 6]);

        let frame = TimeFrame::from_unix(2, 5, chrono_tz::UTC).unwrap();
        let sliced: Vec<i64> = frame
            .slice(&data)
            .iter()
            .map(|r| r.timestamp.timestamp())
            .collect();
        assert_eq!(sliced, vec![2, 3, 4]);

        let closed = frame.with_include_end(true);
        assert_eq!(closed.slice(&data).len(), 4);

        let outside = TimeFrame::from_unix(10, 20, chrono_tz::UTC).unwrap();
        assert!(outside.slice(&data).is_empty());
    }
}
