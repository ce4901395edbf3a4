use super::classifier::{Threshold, classify};
use crate::domain::ClassifiedRow;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const EXPORT_HEADERS: [&str; 8] = [
    "ID",
    "Classification",
    "Confidence (%)",
    "Orbital Period (days)",
    "Transit Duration (h)",
    "Radius (R⊕)",
    "Stellar Temp. (K)",
    "Stellar Radius (R☉)",
];

/// Identifier column of an exported file.
pub const EXPORT_ID_COLUMN: &str = "ID";
/// Label column of an exported file.
pub const EXPORT_LABEL_COLUMN: &str = "Classification";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("There are no results to export")]
    Empty,
    #[error("Failed to write export {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn export_line(row: &ClassifiedRow, threshold: Threshold) -> String {
    [
        row.id().to_string(),
        classify(row.confidence(), threshold).to_string(),
        format!("{:.1}", row.confidence() * 100.0),
        format!("{:.2}", row.feature("pl_period")),
        format!("{:.2}", row.feature("pl_transit_duration")),
        format!("{:.2}", row.feature("pl_radius")),
        format!("{:.0}", row.feature("st_eff_temp")),
        format!("{:.2}", row.feature("st_radius")),
    ]
    .join(",")
}

/// Render the full result set as CSV, labelled under `threshold`.
pub fn export_csv(rows: &[ClassifiedRow], threshold: Threshold) -> Result<String, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(EXPORT_HEADERS.join(","));
    lines.extend(rows.iter().map(|row| export_line(row, threshold)));
    Ok(lines.join("\n"))
}

/// `<prefix>_results_<YYYY-MM-DDTHH-MM-SS>.csv`
pub fn export_file_name(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{prefix}_results_{}.csv", at.format("%Y-%m-%dT%H-%M-%S"))
}

/// Write the export into `dir`. Nothing is written for an empty result set.
pub async fn write_export(
    dir: &Path,
    prefix: &str,
    rows: &[ClassifiedRow],
    threshold: Threshold,
) -> Result<PathBuf, ExportError> {
    let content = export_csv(rows, threshold)?;
    let path = dir.join(export_file_name(prefix, Utc::now()));

    tokio::fs::write(&path, content)
        .await
        .map_err(|source| ExportError::Write {
            path: path.display().to_string(),
            source,
        })?;

    info!(rows = rows.len(), path = %path.display(), "Export complete");
    Ok(path)
}
