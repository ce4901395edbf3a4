use crate::domain::PredictionRecord;
use serde::Deserialize;

/// A JSON scalar that may arrive as a string or a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    /// Numeric value when the scalar arrived as a JSON number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Integer(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Text(_) | Scalar::Bool(_) => None,
        }
    }

    /// Canonical text form. Integral floats print without a fraction so that
    /// `7.0` and `"7"` name the same identifier.
    pub fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s.trim().to_string(),
            Scalar::Integer(i) => i.to_string(),
            Scalar::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => u8::from(b).to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictionItem {
    #[serde(alias = "id")]
    pub transit_id: Scalar,
    pub prediction: Scalar,
    pub confidence: f64,
}

impl From<PredictionItem> for PredictionRecord {
    fn from(item: PredictionItem) -> Self {
        let numeric_id = item.transit_id.as_number();
        PredictionRecord {
            id: item.transit_id.into_text(),
            raw_label: item.prediction.into_text(),
            confidence: item.confidence,
            numeric_id,
        }
    }
}

/// The predict endpoint answers with a list, or with a bare object for a
/// single-row upload.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PredictionPayload {
    Many(Vec<PredictionItem>),
    One(PredictionItem),
}

impl PredictionPayload {
    pub fn into_records(self) -> Vec<PredictionRecord> {
        match self {
            PredictionPayload::Many(items) => items.into_iter().map(Into::into).collect(),
            PredictionPayload::One(item) => vec![item.into()],
        }
    }
}
