//! Domain layer for transit-classifier.
//!
//! Contains the canonical types shared across all modules:
//! - `SourceRow` / `PredictionRecord` / `ClassifiedRow`: the pipeline's records
//! - `PlanetLabel`: threshold-derived label, `PredictionTag`: scorer code tag
//! - `PipelineError`: top-level error type, `CorrelationWarning`: non-fatal join miss

pub mod error;
pub mod label;
pub mod row;
pub mod value;

pub use error::{CorrelationWarning, PipelineError};
pub use label::{PlanetLabel, PredictionTag, UnknownLabel};
pub use row::{ClassifiedRow, PredictionRecord, SourceRow};
pub use value::CellValue;
