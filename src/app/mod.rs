pub mod cli;
pub mod config;
pub mod logging_system;

pub use cli::{ClassifyArgs, Cli, Command, TrainArgs, ValidateArgs};
pub use config::{Config, ConfigError, LogFormat, LogLevel};
pub use logging_system::{LoggingError, LoggingSystem, setup_logging};

use crate::domain::{ClassifiedRow, CorrelationWarning, PlanetLabel, PredictionTag};
use crate::parser::ValidationMode;
use crate::pipeline::{Page, ScoringOptions, Session, Summary, Threshold, Upload, ValidatedUpload};
use crate::scoring::{Hyperparameters, ScoringClient, TrainingReport};
use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// One row as shown on a result page.
#[derive(Debug, Clone, Serialize)]
pub struct RowView {
    pub transit_id: String,
    pub classification: PlanetLabel,
    pub confidence: f64,
    pub pl_period: f64,
    pub pl_radius: f64,
    pub st_eff_temp: f64,
}

impl From<&ClassifiedRow> for RowView {
    fn from(row: &ClassifiedRow) -> Self {
        Self {
            transit_id: row.id().to_string(),
            classification: row.label(),
            confidence: row.confidence(),
            pl_period: row.feature("pl_period"),
            pl_radius: row.feature("pl_radius"),
            st_eff_temp: row.feature("st_eff_temp"),
        }
    }
}

/// Everything the `classify` command reports.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyReport {
    pub file: String,
    pub threshold: f64,
    pub classified: usize,
    pub warnings: Vec<CorrelationWarning>,
    pub summary: Summary,
    pub tags: BTreeMap<PredictionTag, usize>,
    pub page: usize,
    pub total_pages: usize,
    pub rows: Vec<RowView>,
    pub export: Option<PathBuf>,
}

impl ClassifyReport {
    fn render_text(&self) -> String {
        let mut out = format!(
            "{}: {} classified (threshold {:.2})\n",
            self.file, self.classified, self.threshold
        );
        for warning in &self.warnings {
            out.push_str(&format!("  warning: {warning}\n"));
        }
        for (label, count) in self.summary.iter() {
            out.push_str(&format!("  {:<18}{count:>6}\n", label.as_str()));
        }
        out.push_str(&format!("Page {}/{}\n", self.page, self.total_pages));
        for row in &self.rows {
            out.push_str(&format!(
                "  {:<16}{:<18}{:>6.1}%  period {:.2}d  radius {:.2}  teff {:.0}K\n",
                row.transit_id,
                row.classification.as_str(),
                row.confidence * 100.0,
                row.pl_period,
                row.pl_radius,
                row.st_eff_temp
            ));
        }
        if let Some(path) = &self.export {
            out.push_str(&format!("Exported to {}\n", path.display()));
        }
        out
    }
}

pub struct App {
    config: Config,
    client: ScoringClient,
}

impl App {
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let client = ScoringClient::new(config.client_config())
            .context("Failed to create scoring client")?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one command. Cancelling `cancel` aborts an in-flight service call.
    pub async fn execute(&self, command: Command, cancel: &CancellationToken) -> anyhow::Result<()> {
        match command {
            Command::Validate(args) => self.validate(args).await,
            Command::Classify(args) => {
                let report = self.classify(&args, cancel).await?;
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print!("{}", report.render_text());
                }
                Ok(())
            }
            Command::Train(args) => {
                let report = self.train(&args, cancel).await?;
                println!("{}", serde_json::to_string_pretty(&report)?);
                Ok(())
            }
        }
    }

    pub async fn validate(&self, args: ValidateArgs) -> anyhow::Result<()> {
        let upload = Upload::read(&args.input).await?;
        let validated = ValidatedUpload::new(upload, args.mode)?;
        println!(
            "{}: OK ({} rows, {} columns)",
            args.input.display(),
            validated.rows().len(),
            validated.headers().len()
        );
        Ok(())
    }

    pub async fn classify(
        &self,
        args: &ClassifyArgs,
        cancel: &CancellationToken,
    ) -> anyhow::Result<ClassifyReport> {
        let mut session = Session::new(Threshold::new(args.threshold), self.config.page_size)?;
        session.set_filter(args.filter);

        let upload = Upload::read(&args.input).await?;
        let file = upload.file_name.clone();
        let options = ScoringOptions {
            mission: args.mission,
            threshold: args.scoring_threshold,
            model_id: args.model_id.clone(),
        };

        let warnings = session
            .run(&self.client, upload, &options, Some(cancel))
            .await?
            .warnings()
            .to_vec();
        session.go_to_page(args.page)?;

        let export = match &args.export_dir {
            Some(dir) => {
                let prefix = args
                    .model_id
                    .clone()
                    .unwrap_or_else(|| args.mission.as_str().to_lowercase());
                Some(session.write_export(dir, &prefix).await?)
            }
            None => None,
        };

        let Page {
            rows,
            page,
            total_pages,
            ..
        } = session.current_page()?;

        Ok(ClassifyReport {
            file,
            threshold: session.threshold().value(),
            classified: session.result().map_or(0, |result| result.len()),
            warnings,
            summary: session.summary(),
            tags: session.tag_summary(),
            page,
            total_pages,
            rows: rows.into_iter().map(RowView::from).collect(),
            export,
        })
    }

    pub async fn train(
        &self,
        args: &TrainArgs,
        cancel: &CancellationToken,
    ) -> anyhow::Result<TrainingReport> {
        let hyperparameters = match &args.hyperparams {
            Some(path) => Hyperparameters::from_file(path)?,
            None => Hyperparameters::default(),
        };

        let upload = Upload::read(&args.input).await?;
        let validated = ValidatedUpload::new(upload, ValidationMode::Training)?;

        tokio::select! {
            _ = cancel.cancelled() => {
                warn!("Training submission cancelled");
                Err(crate::domain::PipelineError::Cancelled.into())
            }
            report = validated.submit_training(&self.client, args.name.as_deref(), &hyperparameters) => {
                Ok(report?)
            }
        }
    }
}

/// Cancel `token` on Ctrl-C.
pub fn cancel_on_interrupt(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling");
            token.cancel();
        }
    });
}

pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.config.clone().resolve()?;
    setup_logging(config.log_level, config.log_format, &config.log_directives)?;

    info!(
        version = %get_version(),
        endpoint = %config.endpoint,
        "Starting transit-classifier"
    );

    let app = App::from_config(config)?;
    let cancel = CancellationToken::new();
    cancel_on_interrupt(cancel.clone());

    app.execute(cli.command, &cancel).await
}
