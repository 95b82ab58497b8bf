//! Record extraction for the teachers export.
//!
//! The teachers export lists one row per substituting teacher and lesson.
//! Rows carry the teacher directly (`OSOBA_ID`) and label the class by its
//! position in the group hierarchy, so a seminar of 3A reads `"3A (Seminar B)"`.

use tracing::debug;

use supl_core::record::{CandidateRecord, Resolution};

use crate::index::IdentifierIndex;
use crate::tree::Document;

/// Row element of the teachers export.
pub const TEACHER_ROW: &str = "VypisSuplovani";

/// Extracts one record per teachers-export row, in document order.
///
/// Teacher names are rendered `"Prijmeni Jmeno"`. The static period label is
/// kept as is; the teachers export carries no times to refine it.
pub fn extract_teacher_substitutions(doc: &Document, index: &IdentifierIndex) -> Vec<CandidateRecord> {
    let records: Vec<CandidateRecord> = doc
        .elements(TEACHER_ROW)
        .map(|row| {
            let event_id = row.field_or_default("UDALOST_ID");
            let teacher = index.teacher(row.field_or_default("OSOBA_ID"));

            CandidateRecord::new(
                index.group_path(index.event_group(event_id)),
                index.period(row.field_or_default("OBDOBI_DNE_ID")),
                index.subject(row.field_or_default("REALIZACE_ID")),
            )
            .with_room(index.event_rooms(event_id).join(", "))
            .with_teacher(teacher.sorted_name(), teacher.abbreviation.as_str())
            .with_resolution(Resolution::parse(row.field_or_default("ZpusobReseni")))
            .with_note(row.field_or_default("Poznamka"))
        })
        .collect();

    debug!(extracted = records.len(), "extracted teachers substitutions");
    records
}
