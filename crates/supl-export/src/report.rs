//! The full per-document pipeline: detect, index, extract, reconcile, clamp.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use supl_core::period::{PeriodCatalogue, parse_stamp};
use supl_core::record::{AbsenceRecord, CandidateRecord};
use supl_core::settings::EngineSettings;
use supl_core::{clamp, reconcile};

use crate::error::{ExportError, ExportResult};
use crate::extract::{STUDENT_ROW, extract_absences, extract_substitutions};
use crate::index::IdentifierIndex;
use crate::teachers::{TEACHER_ROW, extract_teacher_substitutions};
use crate::tree::Document;

/// Which report an export was generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Substitutions per class, rows `VypisSuplovaniZaka`.
    Students,
    /// Substitutions per teacher, rows `VypisSuplovani`.
    Teachers,
}

impl DocumentKind {
    /// Detects the kind from the row elements present. A document carrying
    /// students rows is a students export even if it also has teacher rows.
    pub fn detect(doc: &Document) -> Option<Self> {
        if doc.contains(STUDENT_ROW) {
            Some(Self::Students)
        } else if doc.contains(TEACHER_ROW) {
            Some(Self::Teachers)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Students => "students",
            Self::Teachers => "teachers",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the date the export was generated for (`Kalendar/Datum`).
///
/// # Errors
///
/// Returns an `InvalidTime` error if the date is present but malformed.
pub fn document_date(doc: &Document) -> ExportResult<Option<NaiveDate>> {
    let Some(value) = doc.elements("Kalendar").find_map(|k| k.field("Datum")) else {
        return Ok(None);
    };
    parse_stamp(value)
        .map(|stamp| Some(stamp.date()))
        .map_err(|e| ExportError::from(e).with_element("Kalendar"))
}

/// The processed export, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub kind: DocumentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekday: Option<Weekday>,
    pub substitutions: Vec<CandidateRecord>,
    pub absences: Vec<AbsenceRecord>,
}

/// Runs the whole pipeline over one document.
///
/// Students exports are filtered by class and reconciled; teachers exports
/// are taken as they are. Both are then clamped to the configured last
/// period. Absences are extracted for either kind.
///
/// # Errors
///
/// Returns an `UnsupportedDocument` error when the kind cannot be detected,
/// and an `InvalidTime` error for malformed dates or times.
pub fn process(
    doc: &Document,
    settings: &EngineSettings,
    catalogue: &PeriodCatalogue,
) -> ExportResult<Report> {
    let kind = DocumentKind::detect(doc).ok_or_else(|| {
        ExportError::unsupported_document(format!(
            "no {STUDENT_ROW} or {TEACHER_ROW} rows found"
        ))
    })?;
    let date = document_date(doc)?;
    let index = IdentifierIndex::build(doc);

    let substitutions = match kind {
        DocumentKind::Students => {
            let filter = settings.class_filter();
            let candidates = extract_substitutions(doc, &index, catalogue, &filter)?;
            reconcile(candidates)
        }
        DocumentKind::Teachers => extract_teacher_substitutions(doc, &index),
    };
    let substitutions = clamp(substitutions, settings.day_end_period);
    let absences = extract_absences(doc, &index, catalogue, &settings.absence_denylist())?;

    debug!(%kind, ?date, "processed export");
    info!(
        substitutions = substitutions.len(),
        absences = absences.len(),
        "{kind} report ready"
    );

    Ok(Report {
        kind,
        date,
        weekday: date.map(|d| d.weekday()),
        substitutions,
        absences,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportErrorCode;

    mod detection {
        use super::*;

        #[test]
        fn students_rows_win() {
            let doc = Document::parse_str(
                "<r><VypisSuplovani/><VypisSuplovaniZaka/></r>",
            )
            .unwrap();
            assert_eq!(DocumentKind::detect(&doc), Some(DocumentKind::Students));
        }

        #[test]
        fn teachers_rows() {
            let doc = Document::parse_str("<r><x><VypisSuplovani/></x></r>").unwrap();
            assert_eq!(DocumentKind::detect(&doc), Some(DocumentKind::Teachers));
            assert_eq!(DocumentKind::Teachers.to_string(), "teachers");
        }

        #[test]
        fn unknown_document() {
            let doc = Document::parse_str("<r><Predmet/></r>").unwrap();
            assert_eq!(DocumentKind::detect(&doc), None);

            let err = process(&doc, &EngineSettings::default(), &PeriodCatalogue::standard())
                .unwrap_err();
            assert_eq!(err.code(), ExportErrorCode::UnsupportedDocument);
        }
    }

    mod date {
        use super::*;

        #[test]
        fn reads_calendar_date() {
            let doc = Document::parse_str(
                "<r><Kalendar><Datum>2025-03-10T00:00:00</Datum></Kalendar></r>",
            )
            .unwrap();
            assert_eq!(
                document_date(&doc).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 10)
            );
        }

        #[test]
        fn missing_date_is_none() {
            let doc = Document::parse_str("<r><Kalendar/></r>").unwrap();
            assert_eq!(document_date(&doc).unwrap(), None);
        }

        #[test]
        fn malformed_date_is_an_error() {
            let doc = Document::parse_str("<r><Kalendar><Datum>10.3.2025</Datum></Kalendar></r>")
                .unwrap();
            let err = document_date(&doc).unwrap_err();
            assert_eq!(err.code(), ExportErrorCode::InvalidTime);
        }
    }

    #[test]
    fn teachers_export_is_clamped_but_not_filtered() {
        let doc = Document::parse_str(
            r#"<r>
              <Kalendar><Datum>2025-03-14</Datum></Kalendar>
              <TridaSkupinaSeminar><SKUPINA_ID>g</SKUPINA_ID><Nazev>3A</Nazev></TridaSkupinaSeminar>
              <UdalostStudijniSkupiny><UDALOST_ID>e</UDALOST_ID><SKUPINA_ID>g</SKUPINA_ID></UdalostStudijniSkupiny>
              <VyucovaciHodinaOd><OBDOBI_DNE_ID>h</OBDOBI_DNE_ID><Nazev>5</Nazev><HodinaOd>5</HodinaOd><HodinaDo>7</HodinaDo></VyucovaciHodinaOd>
              <VypisSuplovani><UDALOST_ID>e</UDALOST_ID><OBDOBI_DNE_ID>h</OBDOBI_DNE_ID></VypisSuplovani>
            </r>"#,
        )
        .unwrap();
        let settings = EngineSettings::default()
            .with_exclude(["3A"])
            .with_day_end_period(Some(6));

        let report = process(&doc, &settings, &PeriodCatalogue::standard()).unwrap();

        assert_eq!(report.kind, DocumentKind::Teachers);
        assert_eq!(report.weekday, Some(Weekday::Fri));
        assert_eq!(report.substitutions.len(), 1);
        assert_eq!(report.substitutions[0].class, "3A");
        assert_eq!(report.substitutions[0].period, "5-6");
        assert!(report.absences.is_empty());
    }
}
