//! Resolved engine settings.
//!
//! [`EngineSettings`] is built once per run by whoever loads configuration
//! and passed explicitly into extraction and clamping. The engine itself never
//! reads files or the environment.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Abbreviations of non-teaching staff left out of the absence report by default.
pub const DEFAULT_ABSENCE_SKIP: &[&str] = &["KOP", "HRN", "HEI"];

/// Settings consumed by the reconciliation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Only report these classes (takes precedence over `exclude`).
    pub include: Vec<String>,

    /// Never report these classes.
    pub exclude: Vec<String>,

    /// Last period of the day; later records are dropped or truncated.
    #[serde(alias = "day_end_hour", skip_serializing_if = "Option::is_none")]
    pub day_end_period: Option<u32>,

    /// Teacher abbreviations excluded from the absence report.
    pub absence_skip: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            day_end_period: None,
            absence_skip: DEFAULT_ABSENCE_SKIP.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl EngineSettings {
    /// Builds the class filter from `include` and `exclude`.
    pub fn class_filter(&self) -> ClassFilter {
        ClassFilter::new(&self.include, &self.exclude)
    }

    /// Returns the absence denylist, upper-cased.
    pub fn absence_denylist(&self) -> HashSet<String> {
        normalize_all(&self.absence_skip)
    }

    /// Builder method to add included classes.
    pub fn with_include<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(classes.into_iter().map(Into::into));
        self
    }

    /// Builder method to add excluded classes.
    pub fn with_exclude<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(classes.into_iter().map(Into::into));
        self
    }

    /// Builder method to set the last period of the day.
    pub fn with_day_end_period(mut self, period: Option<u32>) -> Self {
        self.day_end_period = period;
        self
    }
}

/// The class inclusion/exclusion policy.
///
/// Inclusion takes precedence: with a non-empty include set only listed
/// classes pass, whatever the exclude set says. Class names are compared
/// trimmed and upper-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassFilter {
    include: HashSet<String>,
    exclude: HashSet<String>,
}

impl ClassFilter {
    /// Creates a filter from include and exclude lists.
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Self {
        Self {
            include: normalize_all(include),
            exclude: normalize_all(exclude),
        }
    }

    /// A filter that keeps everything.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Returns true if records of `class` should be kept.
    pub fn allows(&self, class: &str) -> bool {
        if !self.include.is_empty() {
            return self.include.contains(&normalize(class));
        }
        if !self.exclude.is_empty() {
            return !self.exclude.contains(&normalize(class));
        }
        true
    }
}

/// Trims and upper-cases a class name or abbreviation.
pub fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}

fn normalize_all<S: AsRef<str>>(values: &[S]) -> HashSet<String> {
    values
        .iter()
        .map(|v| normalize(v.as_ref()))
        .filter(|v| !v.is_empty())
        .collect()
}
