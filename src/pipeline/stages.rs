use super::classifier::{Threshold, classify};
use super::correlator::correlate;
use super::summary::{Summary, summarize, summarize_tags};
use super::view::LabelFilter;
use crate::domain::{
    ClassifiedRow, CorrelationWarning, PipelineError, PredictionRecord, PredictionTag, SourceRow,
};
use crate::parser::{ID_COLUMN, ParseError, Table, ValidationMode, header_line, validate_text};
use crate::scoring::{
    Hyperparameters, Mission, Scorer, ScoringClient, ScoringRequest, TrainingReport,
    TrainingSubmission,
};
use std::collections::BTreeMap;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Raw contents of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub text: String,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            text: text.into(),
        }
    }

    /// Read an upload from disk.
    pub async fn read(path: &Path) -> Result<Self, PipelineError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| PipelineError::Read {
                path: path.display().to_string(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());
        Ok(Self { file_name, text })
    }
}

/// Per-run parameters forwarded to the scoring service.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringOptions {
    pub mission: Mission,
    /// Raw number sent with the request; not the band threshold.
    pub threshold: f64,
    pub model_id: Option<String>,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            mission: Mission::default(),
            threshold: 0.5,
            model_id: None,
        }
    }
}

/// An upload whose header satisfies the column contract and whose rows parsed.
#[derive(Debug, Clone)]
pub struct ValidatedUpload {
    upload: Upload,
    mode: ValidationMode,
    headers: Vec<String>,
    rows: Vec<SourceRow>,
}

impl ValidatedUpload {
    /// Check the column contract, then parse every row. Nothing has been sent
    /// anywhere when this fails.
    pub fn new(upload: Upload, mode: ValidationMode) -> Result<Self, PipelineError> {
        if header_line(&upload.text).is_none() {
            return Err(ParseError::Empty.into());
        }
        validate_text(&upload.text, mode)?;

        let table = Table::load_with_case(&upload.text, ID_COLUMN, mode.case_sensitive())?;
        let headers = table.headers().to_vec();
        let rows = table.collect_rows()?;

        info!(
            file = %upload.file_name,
            rows = rows.len(),
            mode = ?mode,
            "Upload validated"
        );

        Ok(Self {
            upload,
            mode,
            headers,
            rows,
        })
    }

    pub fn upload(&self) -> &Upload {
        &self.upload
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[SourceRow] {
        &self.rows
    }

    /// Issue the single scoring call for this upload.
    ///
    /// With a cancellation token, cancelling it abandons the in-flight call.
    pub async fn score<S: Scorer>(
        self,
        scorer: &S,
        options: &ScoringOptions,
        cancel: Option<&CancellationToken>,
    ) -> Result<ScoredUpload, PipelineError> {
        let request = ScoringRequest {
            file_name: &self.upload.file_name,
            contents: &self.upload.text,
            mission: options.mission,
            threshold: options.threshold,
            model_id: options.model_id.as_deref(),
        };

        let call = scorer.score(&request);
        let predictions = match cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => {
                    warn!(file = %self.upload.file_name, "Scoring cancelled");
                    return Err(PipelineError::Cancelled);
                }
                result = call => result?,
            },
            None => call.await?,
        };

        Ok(ScoredUpload {
            validated: self,
            predictions,
        })
    }

    /// Send a labelled upload to the remote trainer.
    pub async fn submit_training(
        &self,
        client: &ScoringClient,
        name: Option<&str>,
        hyperparameters: &Hyperparameters,
    ) -> Result<TrainingReport, PipelineError> {
        let submission = TrainingSubmission {
            file_name: &self.upload.file_name,
            contents: &self.upload.text,
            name,
            hyperparameters,
        };
        let report = client.submit_training(&submission).await?;
        info!(
            accuracy = report.metrics.accuracy,
            auc_roc = report.metrics.auc_roc,
            "Training completed"
        );
        Ok(report)
    }
}

/// A validated upload together with the service's predictions.
#[derive(Debug, Clone)]
pub struct ScoredUpload {
    validated: ValidatedUpload,
    predictions: Vec<PredictionRecord>,
}

impl ScoredUpload {
    pub fn predictions(&self) -> &[PredictionRecord] {
        &self.predictions
    }

    pub fn validated(&self) -> &ValidatedUpload {
        &self.validated
    }

    /// Join predictions to rows and label them under `threshold`.
    pub fn classify(self, threshold: Threshold) -> ClassifiedResult {
        let correlation = correlate(self.predictions, &self.validated.rows, threshold);
        info!(
            classified = correlation.rows.len(),
            unmatched = correlation.warnings.len(),
            "Classification complete"
        );
        ClassifiedResult {
            rows: correlation.rows,
            warnings: correlation.warnings,
            threshold,
        }
    }
}

/// The published outcome of a run.
#[derive(Debug, Clone)]
pub struct ClassifiedResult {
    rows: Vec<ClassifiedRow>,
    warnings: Vec<CorrelationWarning>,
    threshold: Threshold,
}

impl ClassifiedResult {
    pub fn rows(&self) -> &[ClassifiedRow] {
        &self.rows
    }

    pub fn warnings(&self) -> &[CorrelationWarning] {
        &self.warnings
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Recompute every label in place; row identities are untouched.
    pub fn relabel(&mut self, threshold: Threshold) {
        for row in &mut self.rows {
            row.set_label(classify(row.confidence(), threshold));
        }
        self.threshold = threshold;
    }

    pub fn summary(&self, filter: LabelFilter) -> Summary {
        summarize(&self.rows, filter)
    }

    pub fn tag_summary(&self) -> BTreeMap<PredictionTag, usize> {
        summarize_tags(&self.rows)
    }
}
