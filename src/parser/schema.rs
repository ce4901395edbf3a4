use super::table::{header_line, parse_header};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier column joining uploaded rows to predictions.
pub const ID_COLUMN: &str = "transit_id";

/// Target column required for training uploads.
pub const LABEL_COLUMN: &str = "isPlanet";

/// Features the scorer consumes, in the order the service expects them.
pub const FEATURE_COLUMNS: [&str; 9] = [
    "pl_period",
    "pl_transit_duration",
    "pl_transit_depth",
    "pl_radius",
    "pl_eq_temp",
    "pl_insolation_flux",
    "st_eff_temp",
    "st_radius",
    "st_logg",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Missing columns: {}", missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<String>,
}

/// Which column contract an upload must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Scoring against the hosted model. Column names match exactly.
    #[default]
    Classification,
    /// Labelled data for a custom model. Column names match ignoring case.
    Training,
}

impl ValidationMode {
    pub fn required_columns(self) -> Vec<&'static str> {
        let mut columns = Vec::with_capacity(FEATURE_COLUMNS.len() + 2);
        columns.push(ID_COLUMN);
        columns.extend(FEATURE_COLUMNS);
        if self == ValidationMode::Training {
            columns.push(LABEL_COLUMN);
        }
        columns
    }

    pub fn case_sensitive(self) -> bool {
        matches!(self, ValidationMode::Classification)
    }
}

/// Check `headers` against the contract for `mode`.
///
/// Missing columns are reported in contract order.
pub fn validate_headers<S: AsRef<str>>(
    headers: &[S],
    mode: ValidationMode,
) -> Result<(), ValidationError> {
    let present: Vec<String> = headers
        .iter()
        .map(|h| {
            if mode.case_sensitive() {
                h.as_ref().to_string()
            } else {
                h.as_ref().to_lowercase()
            }
        })
        .collect();

    let missing: Vec<String> = mode
        .required_columns()
        .into_iter()
        .filter(|required| {
            let wanted = if mode.case_sensitive() {
                (*required).to_string()
            } else {
                required.to_lowercase()
            };
            !present.contains(&wanted)
        })
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { missing })
    }
}

/// Validate the first non-blank line of raw upload text.
///
/// Text without any header fails with every required column missing.
pub fn validate_text(text: &str, mode: ValidationMode) -> Result<(), ValidationError> {
    let headers = header_line(text).map(parse_header).unwrap_or_default();
    validate_headers(&headers, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_header() -> String {
        let mut cols = vec![ID_COLUMN];
        cols.extend(FEATURE_COLUMNS);
        cols.join(",")
    }

    #[test]
    fn complete_header_passes() {
        assert!(validate_text(&full_header(), ValidationMode::Classification).is_ok());
    }

    #[test]
    fn reports_exactly_the_missing_column() {
        let header = full_header().replace(",st_logg", "");
        let err = validate_text(&header, ValidationMode::Classification).unwrap_err();
        assert_eq!(err.missing, vec!["st_logg".to_string()]);
        assert_eq!(err.to_string(), "Missing columns: st_logg");
    }

    #[test]
    fn classification_is_case_sensitive() {
        let header = full_header().replace("pl_radius", "PL_RADIUS");
        let err = validate_text(&header, ValidationMode::Classification).unwrap_err();
        assert_eq!(err.missing, vec!["pl_radius".to_string()]);
    }

    #[test]
    fn training_is_case_insensitive_and_needs_label() {
        let upper = full_header().to_uppercase();
        let err = validate_text(&upper, ValidationMode::Training).unwrap_err();
        assert_eq!(err.missing, vec![LABEL_COLUMN.to_string()]);

        let with_label = format!("{upper},ISPLANET");
        assert!(validate_text(&with_label, ValidationMode::Training).is_ok());
    }

    #[test]
    fn quoted_headers_are_accepted() {
        let quoted = full_header()
            .split(',')
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(", ");
        assert!(validate_text(&quoted, ValidationMode::Classification).is_ok());
    }

    #[test]
    fn empty_text_misses_everything() {
        let err = validate_text("", ValidationMode::Classification).unwrap_err();
        assert_eq!(err.missing.len(), 10);
    }
}
