//! Classification pipeline.
//!
//! Upload → validate → score → correlate → classify, then summary, paged view
//! and export over the published result. `Session` owns the state that
//! outlives a single run.

pub mod classifier;
pub mod correlator;
pub mod export;
pub mod session;
pub mod stages;
pub mod summary;
pub mod view;

pub use classifier::{DEFAULT_THRESHOLD, Threshold, classify};
pub use correlator::{Correlation, correlate};
pub use export::{
    EXPORT_HEADERS, EXPORT_ID_COLUMN, EXPORT_LABEL_COLUMN, ExportError, export_csv,
    export_file_name, write_export,
};
pub use session::{Session, UploadTicket};
pub use stages::{ClassifiedResult, ScoredUpload, ScoringOptions, Upload, ValidatedUpload};
pub use summary::{Summary, summarize, summarize_tags};
pub use view::{
    DEFAULT_PAGE_SIZE, LabelFilter, Page, ViewError, ViewState, project_page, total_pages,
};
