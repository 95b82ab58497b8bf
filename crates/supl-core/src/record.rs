//! Flat record types handed to report renderers.
//!
//! - [`CandidateRecord`]: one substitution row for a class slot
//! - [`AbsenceRecord`]: one absent teacher
//! - [`Resolution`]: how a lesson was resolved (cancelled or free text)
//! - [`SlotKey`]: the `(Class, Period)` pair used for reconciliation
//!
//! Field names in the serialized form are the report contract and must not
//! change: `Class`, `Period`, `Subject`, `Group`, `Room`, `Teacher`,
//! `Teacher_Abbreviation`, `Resolution`, `Note`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The literal the source system uses for a cancelled lesson.
pub const CANCELLED_LABEL: &str = "odpadá";

/// Prefix of the note back-filled on a substitution that replaces a cancelled lesson.
pub const IN_PLACE_OF_PREFIX: &str = "in place of";

/// How a timetable slot was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Resolution {
    /// The lesson does not take place.
    Cancelled,
    /// Any other disposition, kept verbatim (e.g. `"supluje"`, `"spojeno"`).
    Disposition(String),
}

impl Resolution {
    /// Parses the source text; surrounding whitespace is ignored for the
    /// cancellation check but kept in a disposition.
    pub fn parse(text: &str) -> Self {
        if text.trim() == CANCELLED_LABEL {
            Self::Cancelled
        } else {
            Self::Disposition(text.to_string())
        }
    }

    /// Returns true for a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns the display text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cancelled => CANCELLED_LABEL,
            Self::Disposition(text) => text,
        }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::Disposition(String::new())
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Resolution {
    fn from(text: String) -> Self {
        if text.trim() == CANCELLED_LABEL {
            Self::Cancelled
        } else {
            Self::Disposition(text)
        }
    }
}

impl From<Resolution> for String {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Cancelled => CANCELLED_LABEL.to_string(),
            Resolution::Disposition(text) => text,
        }
    }
}

/// The grouping key of the conflict resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub class: String,
    pub period: String,
}

/// A substitution row for one class slot.
///
/// Created by the extractor; the reconciler may set `note` and the day-end
/// clamp may rewrite `period`, nothing else changes afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(rename = "Class")]
    pub class: String,
    #[serde(rename = "Period")]
    pub period: String,
    #[serde(rename = "Subject")]
    pub subject: String,
    /// Subgroup label; empty when the whole class is affected.
    #[serde(rename = "Group")]
    pub group: String,
    /// Room abbreviations, comma separated.
    #[serde(rename = "Room")]
    pub room: String,
    /// Teacher display names, comma separated.
    #[serde(rename = "Teacher")]
    pub teacher: String,
    #[serde(rename = "Teacher_Abbreviation")]
    pub teacher_abbreviation: String,
    #[serde(rename = "Resolution")]
    pub resolution: Resolution,
    #[serde(rename = "Note")]
    pub note: String,
}

impl CandidateRecord {
    /// Creates a record for a class slot and subject.
    pub fn new(
        class: impl Into<String>,
        period: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            class: class.into(),
            period: period.into(),
            subject: subject.into(),
            ..Self::default()
        }
    }

    /// Returns the `(Class, Period)` slot key.
    pub fn slot_key(&self) -> SlotKey {
        SlotKey {
            class: self.class.clone(),
            period: self.period.clone(),
        }
    }

    /// A cancellation of the whole class: no subgroup, resolution cancelled.
    pub fn is_general_cancellation(&self) -> bool {
        self.group.trim().is_empty() && self.resolution.is_cancelled()
    }

    /// Anything that actually takes place in the slot.
    pub fn is_substitution(&self) -> bool {
        !self.resolution.is_cancelled()
    }

    /// Builder method to set the subgroup label.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Builder method to set the room label.
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = room.into();
        self
    }

    /// Builder method to set teacher names and abbreviations.
    pub fn with_teacher(
        mut self,
        name: impl Into<String>,
        abbreviation: impl Into<String>,
    ) -> Self {
        self.teacher = name.into();
        self.teacher_abbreviation = abbreviation.into();
        self
    }

    /// Builder method to set the resolution.
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Builder method to mark the record as cancelled.
    pub fn cancelled(self) -> Self {
        self.with_resolution(Resolution::Cancelled)
    }

    /// Builder method to set the note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// An absent teacher and the part of the day they miss.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AbsenceRecord {
    pub teacher: String,
    pub reason: String,
    /// Start of the absence, `HH:MM`.
    pub from: String,
    /// End of the absence, `HH:MM`.
    pub to: String,
    /// Period label of the absence (see [`crate::period::PeriodSpan`]).
    pub periods: String,
}
