use serde::{Deserialize, Serialize};
use std::path::Path;

/// Gradient-boosting hyperparameters forwarded to the remote trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    pub n_estimators: u32,
    pub learning_rate: f64,
    pub lambda_l1: f64,
    pub lambda_l2: f64,
    pub num_leaves: u32,
    pub max_depth: i32,
    pub feature_fraction: f64,
    pub bagging_fraction: f64,
    pub bagging_freq: u32,
    pub min_child_samples: u32,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            n_estimators: 1600,
            learning_rate: 0.0028,
            lambda_l1: 1e-8,
            lambda_l2: 0.2,
            num_leaves: 350,
            max_depth: 10,
            feature_fraction: 0.88,
            bagging_fraction: 0.53,
            bagging_freq: 3,
            min_child_samples: 16,
        }
    }
}

impl Hyperparameters {
    /// Load overrides from a TOML file; unspecified keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, HyperparameterError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum HyperparameterError {
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Held-out metrics reported by the trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub accuracy: f64,
    pub auc_roc: f64,
    pub auc_prc: f64,
    pub recall_planet: f64,
    pub precision_planet: f64,
    pub f1_score_planet: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    #[serde(default)]
    pub message: String,
    pub metrics: TrainingMetrics,
    #[serde(default)]
    pub model_path: Option<String>,
}
