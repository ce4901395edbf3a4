use super::classifier::Threshold;
use super::export::{ExportError, export_csv, write_export};
use super::stages::{ClassifiedResult, ScoringOptions, Upload, ValidatedUpload};
use super::summary::{Summary, summarize};
use super::view::{LabelFilter, Page, ViewError, ViewState, project_page};
use crate::domain::{ClassifiedRow, PipelineError, PredictionTag};
use crate::parser::ValidationMode;
use crate::scoring::Scorer;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Marks which upload a run belongs to. Only the newest ticket may publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket {
    generation: u64,
}

impl UploadTicket {
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// Holds the classification threshold, the view state and the last published
/// result. Everything downstream of scoring reads its context from here.
#[derive(Debug, Clone, Default)]
pub struct Session {
    threshold: Threshold,
    view: ViewState,
    result: Option<ClassifiedResult>,
    generation: u64,
}

impl Session {
    pub fn new(threshold: Threshold, page_size: usize) -> Result<Self, ViewError> {
        Ok(Self {
            threshold,
            view: ViewState::new(page_size)?,
            result: None,
            generation: 0,
        })
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn result(&self) -> Option<&ClassifiedResult> {
        self.result.as_ref()
    }

    /// Start tracking a new upload. Any ticket issued earlier becomes stale.
    pub fn begin_upload(&mut self) -> UploadTicket {
        self.generation += 1;
        debug!(generation = self.generation, "Upload started");
        UploadTicket {
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: UploadTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Replace the published result wholesale.
    ///
    /// A result whose ticket is no longer current is discarded and the
    /// previous result stays visible.
    pub fn publish(
        &mut self,
        ticket: UploadTicket,
        mut result: ClassifiedResult,
    ) -> Result<&ClassifiedResult, PipelineError> {
        if !self.is_current(ticket) {
            warn!(
                stale = ticket.generation,
                current = self.generation,
                "Discarding result of superseded upload"
            );
            return Err(PipelineError::StaleUpload);
        }

        if result.threshold() != self.threshold {
            result.relabel(self.threshold);
        }
        self.view.first_page();
        let result = self.result.insert(result);
        info!(rows = result.len(), "Result published");
        Ok(result)
    }

    /// Validate, score, correlate, classify and publish one upload.
    ///
    /// On any error the previously published result is left as it was.
    pub async fn run<S: Scorer>(
        &mut self,
        scorer: &S,
        upload: Upload,
        options: &ScoringOptions,
        cancel: Option<&CancellationToken>,
    ) -> Result<&ClassifiedResult, PipelineError> {
        let ticket = self.begin_upload();
        let validated = ValidatedUpload::new(upload, ValidationMode::Classification)?;
        let scored = validated.score(scorer, options, cancel).await?;
        let result = scored.classify(self.threshold);
        self.publish(ticket, result)
    }

    /// Move the classification threshold. Labels, summary and pagination are
    /// recomputed locally; the scorer is not called again.
    pub fn set_threshold(&mut self, threshold: Threshold) {
        self.threshold = threshold;
        if let Some(result) = self.result.as_mut() {
            result.relabel(threshold);
            self.view.reconcile(result.rows());
        }
        debug!(threshold = threshold.value(), "Threshold updated");
    }

    pub fn set_filter(&mut self, filter: LabelFilter) {
        self.view.set_filter(filter);
    }

    pub fn go_to_page(&mut self, page: usize) -> Result<(), ViewError> {
        let rows = match &self.result {
            Some(result) => result.rows(),
            None => &[],
        };
        self.view.go_to(page, rows)
    }

    /// Label counts over the rows passing the current filter.
    pub fn summary(&self) -> Summary {
        summarize(self.rows(), self.view.filter())
    }

    pub fn tag_summary(&self) -> BTreeMap<PredictionTag, usize> {
        self.result
            .as_ref()
            .map(ClassifiedResult::tag_summary)
            .unwrap_or_default()
    }

    pub fn current_page(&self) -> Result<Page<'_>, ViewError> {
        self.view.project(self.rows())
    }

    pub fn page(&self, page: usize) -> Result<Page<'_>, ViewError> {
        project_page(
            self.rows(),
            self.view.filter(),
            page,
            self.view.page_size(),
        )
    }

    /// Export ignores the filter and the page; it always covers every row.
    pub fn export_csv(&self) -> Result<String, ExportError> {
        export_csv(self.rows(), self.threshold)
    }

    pub async fn write_export(&self, dir: &Path, prefix: &str) -> Result<PathBuf, ExportError> {
        write_export(dir, prefix, self.rows(), self.threshold).await
    }

    fn rows(&self) -> &[ClassifiedRow] {
        match &self.result {
            Some(result) => result.rows(),
            None => &[],
        }
    }
}
