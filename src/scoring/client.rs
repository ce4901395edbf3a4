use super::response::PredictionPayload;
use super::training::{Hyperparameters, TrainingReport};
use crate::domain::PredictionRecord;
use clap::ValueEnum;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder, Url};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const PREDICT_PATH: &str = "api/v1/predict";
const TRAIN_PATH: &str = "api/v1/train";

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("API Error: {status} - {message}")]
    HttpError { status: u16, message: String },
    #[error("Failed to decode response: {0}")]
    Decode(String),
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Survey the upload came from. Forwarded to the service, never used for validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
pub enum Mission {
    #[default]
    #[value(name = "KOI")]
    #[serde(rename = "KOI")]
    Koi,
    #[value(name = "K2")]
    #[serde(rename = "K2")]
    K2,
    #[value(name = "TESS")]
    #[serde(rename = "TESS")]
    Tess,
    #[value(name = "Custom")]
    #[serde(rename = "Custom")]
    Custom,
}

impl Mission {
    pub fn as_str(self) -> &'static str {
        match self {
            Mission::Koi => "KOI",
            Mission::K2 => "K2",
            Mission::Tess => "TESS",
            Mission::Custom => "Custom",
        }
    }
}

impl fmt::Display for Mission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one predict call carries.
#[derive(Debug, Clone)]
pub struct ScoringRequest<'a> {
    pub file_name: &'a str,
    pub contents: &'a str,
    pub mission: Mission,
    /// Raw threshold forwarded to the service; labels use the session threshold.
    pub threshold: f64,
    pub model_id: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct TrainingSubmission<'a> {
    pub file_name: &'a str,
    pub contents: &'a str,
    pub name: Option<&'a str>,
    pub hyperparameters: &'a Hyperparameters,
}

/// Remote scorer seam. The pipeline only needs one call per run.
pub trait Scorer: Send + Sync {
    fn score(
        &self,
        request: &ScoringRequest<'_>,
    ) -> impl std::future::Future<Output = Result<Vec<PredictionRecord>, ScoringError>> + Send;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub connect_timeout: Duration,
    /// `None` waits for the service indefinitely.
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            user_agent: format!("transit-classifier/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScoringClient {
    client: Client,
    base_url: Url,
}

impl ScoringClient {
    pub fn new(config: ClientConfig) -> Result<Self, ScoringError> {
        let mut base_url: Url = config.endpoint.parse().map_err(|e| {
            ScoringError::InvalidConfiguration(format!("Invalid endpoint URL: {e}"))
        })?;
        // Url::join replaces the last segment unless the path ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = ClientBuilder::new()
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            ScoringError::InvalidConfiguration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ScoringError> {
        self.base_url
            .join(path)
            .map_err(|e| ScoringError::InvalidConfiguration(format!("Invalid {path} URL: {e}")))
    }

    fn file_part(file_name: &str, contents: &str) -> Result<Part, ScoringError> {
        Ok(Part::bytes(contents.as_bytes().to_vec())
            .file_name(file_name.to_string())
            .mime_str("text/csv")?)
    }

    /// Upload the table and return the service's predictions in response order.
    pub async fn predict(
        &self,
        request: &ScoringRequest<'_>,
    ) -> Result<Vec<PredictionRecord>, ScoringError> {
        let url = self.endpoint(PREDICT_PATH)?;

        let mut form = Form::new()
            .part("file", Self::file_part(request.file_name, request.contents)?)
            .text("mission", request.mission.as_str())
            .text("threshold", request.threshold.to_string());
        if let Some(model_id) = request.model_id {
            form = form.text("model_id", model_id.to_string());
        }

        debug!(url = %url, mission = %request.mission, "submitting upload for scoring");

        let response = self.client.post(url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ScoringError::HttpError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let payload: PredictionPayload =
            serde_json::from_str(&body).map_err(|e| ScoringError::Decode(e.to_string()))?;
        let records = payload.into_records();

        info!(predictions = records.len(), "scoring service responded");
        Ok(records)
    }

    /// Submit a labelled upload to the remote trainer.
    pub async fn submit_training(
        &self,
        submission: &TrainingSubmission<'_>,
    ) -> Result<TrainingReport, ScoringError> {
        let url = self.endpoint(TRAIN_PATH)?;
        let hyperparams = serde_json::to_string(submission.hyperparameters)
            .map_err(|e| ScoringError::InvalidConfiguration(format!("Invalid hyperparameters: {e}")))?;

        let mut form = Form::new()
            .part(
                "file",
                Self::file_part(submission.file_name, submission.contents)?,
            )
            .text("hyperparams", hyperparams);
        if let Some(name) = submission.name {
            form = form.text("name", name.to_string());
        }

        debug!(url = %url, "submitting training upload");

        let response = self.client.post(url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ScoringError::HttpError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ScoringError::Decode(e.to_string()))
    }
}

impl Scorer for ScoringClient {
    async fn score(
        &self,
        request: &ScoringRequest<'_>,
    ) -> Result<Vec<PredictionRecord>, ScoringError> {
        self.predict(request).await
    }
}
