//! Teaching periods and wall-clock resolution.
//!
//! This module provides [`PeriodCatalogue`], the ordered list of named
//! teaching periods of one school day, and [`PeriodSpan`], the result of
//! resolving a wall-clock interval against it.
//!
//! Resolution uses an inclusive overlap test: a period is hit when
//! `from <= period.end && to >= period.start`, so an interval touching only
//! the boundary minute of a period still counts.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Label used when an interval covers (nearly) the whole school day.
pub const WHOLE_DAY_LABEL: &str = "whole day";

/// Default format for bare time-of-day values.
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M";

const STAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// A single named teaching period with inclusive wall-clock bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// Display name of the period (usually its ordinal, e.g. `"3"`).
    pub name: String,
    /// First minute of the period.
    pub start: NaiveTime,
    /// Last minute of the period.
    pub end: NaiveTime,
}

impl Period {
    /// Creates a new period.
    pub fn new(name: impl Into<String>, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    /// Returns true if the inclusive interval `[from, to]` touches this period.
    pub fn overlaps(&self, from: NaiveTime, to: NaiveTime) -> bool {
        from <= self.end && to >= self.start
    }

    /// Returns the numeric value of the period name, if it is a number.
    pub fn number(&self) -> Option<u32> {
        self.name.trim().parse().ok()
    }
}

/// The periods of an interval together with their compact label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSpan {
    /// Names of the hit periods, in catalogue order.
    pub periods: Vec<String>,
    /// Compact label: a single name, `"first-last"`, [`WHOLE_DAY_LABEL`], or empty.
    pub label: String,
}

impl PeriodSpan {
    /// Returns true if the span was labelled as the whole day.
    pub fn is_whole_day(&self) -> bool {
        self.label == WHOLE_DAY_LABEL
    }

    /// Returns true if no period was hit and no label was derived.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty() && self.label.is_empty()
    }
}

/// The ordered catalogue of teaching periods for one school day.
///
/// Periods are non-overlapping and strictly increasing in start time; the
/// constructor rejects anything else. A catalogue is never mutated after
/// construction and can be shared freely between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodCatalogue {
    periods: Vec<Period>,
}

impl PeriodCatalogue {
    /// Creates a catalogue, validating the ordering invariant.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCatalogue`] if the list is empty, a period
    /// ends before it starts, or two periods overlap or are out of order.
    pub fn new(periods: Vec<Period>) -> CoreResult<Self> {
        if periods.is_empty() {
            return Err(CoreError::invalid_catalogue("catalogue has no periods"));
        }

        for period in &periods {
            if period.end < period.start {
                return Err(CoreError::invalid_catalogue(format!(
                    "period {:?} ends before it starts",
                    period.name
                )));
            }
        }

        for pair in periods.windows(2) {
            if pair[1].start <= pair[0].end {
                return Err(CoreError::invalid_catalogue(format!(
                    "period {:?} overlaps or precedes period {:?}",
                    pair[1].name, pair[0].name
                )));
            }
        }

        Ok(Self { periods })
    }

    /// The school's standard eight-period day.
    pub fn standard() -> Self {
        let periods = vec![
            Period::new("1", hm(7, 55), hm(8, 40)),
            Period::new("2", hm(8, 45), hm(9, 30)),
            Period::new("3", hm(9, 35), hm(10, 20)),
            Period::new("4", hm(10, 30), hm(11, 15)),
            Period::new("5", hm(11, 35), hm(12, 20)),
            Period::new("6", hm(12, 25), hm(13, 10)),
            Period::new("7", hm(13, 15), hm(14, 0)),
            Period::new("8", hm(14, 5), hm(14, 50)),
        ];
        Self { periods }
    }

    /// Returns the periods in order.
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Returns the number of periods.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Always false for a validated catalogue.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Minimum number of hit periods that is labelled as the whole day.
    ///
    /// One less than the catalogue size, so a day missing only its last
    /// period still reads as the whole day. Never below two, so a single
    /// hit keeps its own name.
    pub fn whole_day_threshold(&self) -> usize {
        self.periods.len().saturating_sub(1).max(2)
    }

    /// Resolves a wall-clock interval to the periods it overlaps.
    pub fn resolve(&self, from: NaiveTime, to: NaiveTime) -> PeriodSpan {
        if from == NaiveTime::MIN && to == NaiveTime::MIN {
            return PeriodSpan {
                periods: Vec::new(),
                label: WHOLE_DAY_LABEL.to_string(),
            };
        }

        let periods: Vec<String> = self
            .periods
            .iter()
            .filter(|p| p.overlaps(from, to))
            .map(|p| p.name.clone())
            .collect();

        let label = match periods.as_slice() {
            [] => String::new(),
            hit if hit.len() == self.periods.len() || hit.len() >= self.whole_day_threshold() => {
                WHOLE_DAY_LABEL.to_string()
            }
            [single] => single.clone(),
            [first, .., last] => format!("{first}-{last}"),
        };

        PeriodSpan { periods, label }
    }

    /// Resolves two date-time stamps (ISO-8601, with or without offset).
    ///
    /// Only the wall-clock part of each stamp is considered; an offset, if
    /// present, is kept as local time.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTime`] if either stamp cannot be parsed.
    pub fn resolve_stamps(&self, from: &str, to: &str) -> CoreResult<PeriodSpan> {
        let from = parse_stamp(from)?;
        let to = parse_stamp(to)?;
        Ok(self.resolve(from.time(), to.time()))
    }

    /// Resolves two bare time-of-day strings parsed with `format`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTime`] if either value does not match `format`.
    pub fn resolve_strings(&self, from: &str, to: &str, format: &str) -> CoreResult<PeriodSpan> {
        let from = parse_time(from, format)?;
        let to = parse_time(to, format)?;
        Ok(self.resolve(from, to))
    }
}

impl Default for PeriodCatalogue {
    fn default() -> Self {
        Self::standard()
    }
}

/// Parses an ISO-8601 date-time stamp into its local wall-clock value.
///
/// Accepts RFC 3339 stamps with an offset, naive stamps with `T` or space
/// separators (seconds and fractions optional), and bare dates (midnight).
///
/// # Errors
///
/// Returns [`CoreError::InvalidTime`] for anything else, including an empty string.
pub fn parse_stamp(value: &str) -> CoreResult<NaiveDateTime> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_local());
    }

    if let Some(dt) = STAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
    {
        return Ok(dt);
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| CoreError::invalid_time(value))
}

/// Parses a bare time-of-day value with an explicit chrono format.
///
/// # Errors
///
/// Returns [`CoreError::InvalidTime`] if `value` does not match `format`.
pub fn parse_time(value: &str, format: &str) -> CoreResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), format)
        .map_err(|_| CoreError::invalid_time_with_format(value, format))
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}
