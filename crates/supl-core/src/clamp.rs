//! Day-end truncation of period labels.
//!
//! When a school day is configured to end early (for example on a day of
//! parent meetings), records starting after the last taught period are
//! dropped and records straddling it have their displayed range shortened.
//! Labels that cannot be read as a period range are passed through.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::period::WHOLE_DAY_LABEL;
use crate::record::CandidateRecord;

/// Range the whole-day label stands for.
pub const WHOLE_DAY_RANGE: (u32, u32) = (1, u32::MAX);

static RANGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)\s*(?:-\s*(\d+)\s*)?$").expect("Invalid period range regex")
});

/// Parses a period label back into a numeric `(start, end)` range.
///
/// Accepts a bare number (`"3"`), a dash-joined range (`"3-5"`) and the
/// whole-day label. Returns `None` for anything else.
pub fn parse_period_range(label: &str) -> Option<(u32, u32)> {
    if label.trim() == WHOLE_DAY_LABEL {
        return Some(WHOLE_DAY_RANGE);
    }

    let caps = RANGE_REGEX.captures(label)?;
    let start: u32 = caps.get(1)?.as_str().parse().ok()?;
    let end: u32 = match caps.get(2) {
        Some(end) => end.as_str().parse().ok()?,
        None => start,
    };
    Some((start, end))
}

/// Truncates records to the day ending at `max_period`.
///
/// A no-op when `max_period` is `None`. Order is preserved; records are only
/// ever dropped, never reordered or duplicated.
pub fn clamp(records: Vec<CandidateRecord>, max_period: Option<u32>) -> Vec<CandidateRecord> {
    let Some(max_period) = max_period else {
        return records;
    };

    let before = records.len();
    let clamped: Vec<CandidateRecord> = records
        .into_iter()
        .filter_map(|record| clamp_record(record, max_period))
        .collect();

    debug!(
        max_period,
        dropped = before - clamped.len(),
        "applied day-end clamp"
    );
    clamped
}

fn clamp_record(mut record: CandidateRecord, max_period: u32) -> Option<CandidateRecord> {
    let Some((start, end)) = parse_period_range(&record.period) else {
        return Some(record);
    };

    if start > max_period {
        return None;
    }

    if end > max_period {
        record.period = if start == max_period {
            start.to_string()
        } else {
            format!("{start}-{max_period}")
        };
    }

    Some(record)
}
