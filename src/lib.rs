#![warn(rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
#![allow(
    clippy::cast_precision_loss,      // Row counts never approach 2^52
    clippy::missing_errors_doc,       // Internal API
    clippy::module_name_repetitions,  // e.g. ScoringError in scoring module
    clippy::must_use_candidate,
    clippy::doc_markdown
)]

pub mod app;
pub mod domain;
pub mod parser;
pub mod pipeline;
pub mod scoring;

pub use app::{App, Config};
pub use domain::{ClassifiedRow, PipelineError, PlanetLabel};
pub use pipeline::{Session, Threshold};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
