//! Table loading and column-contract validation for uploaded files.

pub mod schema;
pub mod table;

pub use schema::{
    FEATURE_COLUMNS, ID_COLUMN, LABEL_COLUMN, ValidationError, ValidationMode, validate_headers,
    validate_text,
};
pub use table::{ParseError, Rows, Table, header_line, parse_header};
