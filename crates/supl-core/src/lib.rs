//! Core types: period catalogue, records, reconciliation, day-end clamp

pub mod clamp;
pub mod error;
pub mod period;
pub mod reconcile;
pub mod record;
pub mod settings;
pub mod tracing;

pub use clamp::{clamp, parse_period_range};
pub use error::{CoreError, CoreResult};
pub use period::{Period, PeriodCatalogue, PeriodSpan, WHOLE_DAY_LABEL, parse_stamp, parse_time};
pub use reconcile::reconcile;
pub use record::{AbsenceRecord, CandidateRecord, Resolution, SlotKey};
pub use settings::{ClassFilter, EngineSettings};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
