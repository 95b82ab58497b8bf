//! Substitution export reading and processing.
//!
//! This crate turns a timetable-change export into a [`Report`]:
//!
//! 1. [`Document`] parses the XML into a generic element tree.
//! 2. [`IdentifierIndex`] resolves subject, room, teacher, class and group ids.
//! 3. The extractors build flat records, filtered by class.
//! 4. [`process`] reconciles, clamps and assembles the report.
//!
//! # Example
//!
//! ```ignore
//! use supl_core::{EngineSettings, PeriodCatalogue};
//! use supl_export::{Document, process};
//!
//! let doc = Document::from_path("suplovani.xml")?;
//! let report = process(&doc, &EngineSettings::default(), &PeriodCatalogue::standard())?;
//! for record in &report.substitutions {
//!     println!("{} {} {}", record.class, record.period, record.subject);
//! }
//! ```

pub mod error;
pub mod extract;
pub mod index;
pub mod report;
pub mod teachers;
pub mod tree;

pub use error::{ExportError, ExportErrorCode, ExportResult};
pub use extract::{extract_absences, extract_substitutions};
pub use index::{GroupInfo, IdentifierIndex, TeacherInfo};
pub use report::{DocumentKind, Report, document_date, process};
pub use teachers::extract_teacher_substitutions;
pub use tree::{Document, Element};
