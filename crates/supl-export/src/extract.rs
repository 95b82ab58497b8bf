//! Record extraction for the students export and for teacher absences.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use supl_core::period::{PeriodCatalogue, parse_stamp};
use supl_core::record::{AbsenceRecord, CandidateRecord, Resolution};
use supl_core::settings::{ClassFilter, normalize};

use crate::error::{ExportError, ExportResult};
use crate::index::IdentifierIndex;
use crate::tree::{Document, Element};

/// Row element of the students export.
pub const STUDENT_ROW: &str = "VypisSuplovaniZaka";
/// An absence of a resource (a teacher) during the day.
pub const ABSENCE_ROW: &str = "AbsenceZdrojeVeDni";
/// Links an absence event to the absent teacher.
pub const ABSENCE_TEACHER_ROW: &str = "AbsenceUcitele";

/// Reason used when an absence has no known reason.
pub const UNKNOWN_REASON: &str = "Unknown reason";
/// Name used when an absent teacher is not in the index.
pub const UNKNOWN_TEACHER: &str = "Unknown teacher";

/// Extracts one candidate record per students-export row, in document order.
///
/// The period label comes from the row's `OBDOBI_DNE_ID`; when the row also
/// carries `CasOd`/`CasDo`, the label resolved from those times replaces it.
/// Rows of classes rejected by `filter` are left out.
///
/// # Errors
///
/// Returns an `InvalidTime` error if `CasOd` or `CasDo` is present but not a
/// valid date-time.
pub fn extract_substitutions(
    doc: &Document,
    index: &IdentifierIndex,
    catalogue: &PeriodCatalogue,
    filter: &ClassFilter,
) -> ExportResult<Vec<CandidateRecord>> {
    let mut records = Vec::new();
    let mut filtered = 0usize;

    for row in doc.elements(STUDENT_ROW) {
        let record = substitution_from_row(row, index, catalogue)?;
        if filter.allows(&record.class) {
            records.push(record);
        } else {
            filtered += 1;
        }
    }

    debug!(
        extracted = records.len(),
        filtered, "extracted students substitutions"
    );
    Ok(records)
}

fn substitution_from_row(
    row: &Element,
    index: &IdentifierIndex,
    catalogue: &PeriodCatalogue,
) -> ExportResult<CandidateRecord> {
    let event_id = row.field_or_default("UDALOST_ID");
    let group = index.group(index.event_group(event_id));

    let class = group.class.as_str();
    let group_name = if group.name == group.class {
        ""
    } else {
        group.name.as_str()
    };

    let mut period = index.period(row.field_or_default("OBDOBI_DNE_ID")).to_string();
    if let (Some(from), Some(to)) = (row.field("CasOd"), row.field("CasDo")) {
        let span = catalogue
            .resolve_stamps(from, to)
            .map_err(|e| ExportError::from(e).with_element(STUDENT_ROW))?;
        if span.label != period {
            period = span.label;
        }
    }

    let teachers: Vec<_> = index
        .event_teachers(event_id)
        .iter()
        .map(|id| index.teacher(id))
        .collect();
    let names = join_non_empty(teachers.iter().map(|t| t.display_name()));
    let abbreviations = join_non_empty(teachers.iter().map(|t| t.abbreviation.clone()));

    Ok(
        CandidateRecord::new(class, period, index.subject(row.field_or_default("REALIZACE_ID")))
            .with_group(group_name)
            .with_room(index.event_rooms(event_id).join(", "))
            .with_teacher(names, abbreviations)
            .with_resolution(Resolution::parse(row.field_or_default("ZpusobReseni")))
            .with_note(row.field_or_default("Poznamka")),
    )
}

pub(crate) fn join_non_empty(values: impl Iterator<Item = String>) -> String {
    values
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Extracts absent teachers, one record per (absence, teacher) pair.
///
/// Teachers whose abbreviation is in `skip` are left out. A teacher row
/// without `OSOBA_ID` is logged and skipped.
///
/// # Errors
///
/// Returns an `InvalidTime` error if an absence with teachers has a missing
/// or malformed `Od`/`Do`.
pub fn extract_absences(
    doc: &Document,
    index: &IdentifierIndex,
    catalogue: &PeriodCatalogue,
    skip: &HashSet<String>,
) -> ExportResult<Vec<AbsenceRecord>> {
    let mut teachers_by_event: HashMap<&str, Vec<&Element>> = HashMap::new();
    for row in doc.elements(ABSENCE_TEACHER_ROW) {
        if let Some(event_id) = row.field("UDALOST_ID") {
            teachers_by_event.entry(event_id).or_default().push(row);
        }
    }

    let mut absences = Vec::new();
    for absence in doc.elements(ABSENCE_ROW) {
        let Some(teacher_rows) = absence
            .field("UDALOST_ID")
            .and_then(|id| teachers_by_event.get(id))
        else {
            continue;
        };

        let reason = index
            .absence_reason(absence.field_or_default("SUPL_DRUH_ABSENCE_ID"))
            .unwrap_or(UNKNOWN_REASON);

        let from = absence_stamp(absence, "Od")?;
        let to = absence_stamp(absence, "Do")?;
        let periods = catalogue.resolve(from.time(), to.time()).label;

        for row in teacher_rows {
            let Some(teacher_id) = row.field("OSOBA_ID") else {
                warn!(
                    event = absence.field_or_default("UDALOST_ID"),
                    "absence row without teacher id, skipping"
                );
                continue;
            };

            let teacher = index.teacher(teacher_id);
            if skip.contains(&normalize(&teacher.abbreviation)) {
                debug!(teacher = %teacher.abbreviation, "skipping non-teaching staff absence");
                continue;
            }

            let name = if teacher.is_unknown() {
                UNKNOWN_TEACHER.to_string()
            } else {
                teacher.display_name()
            };

            absences.push(AbsenceRecord {
                teacher: name,
                reason: reason.to_string(),
                from: from.format("%H:%M").to_string(),
                to: to.format("%H:%M").to_string(),
                periods: periods.clone(),
            });
        }
    }

    debug!(absences = absences.len(), "extracted absences");
    Ok(absences)
}

fn absence_stamp(absence: &Element, field: &str) -> ExportResult<chrono::NaiveDateTime> {
    let value = absence.field(field).ok_or_else(|| {
        ExportError::invalid_time(format!("absence is missing {field}")).with_element(ABSENCE_ROW)
    })?;
    parse_stamp(value).map_err(|e| ExportError::from(e).with_element(ABSENCE_ROW))
}
