//! Client for the remote prediction and training service.

pub mod client;
pub mod response;
pub mod training;

pub use client::{
    ClientConfig, Mission, Scorer, ScoringClient, ScoringError, ScoringRequest, TrainingSubmission,
};
pub use response::{PredictionItem, PredictionPayload, Scalar};
pub use training::{HyperparameterError, Hyperparameters, TrainingMetrics, TrainingReport};
