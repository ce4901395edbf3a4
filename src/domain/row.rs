use super::label::{PlanetLabel, PredictionTag};
use super::value::CellValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One uploaded record, keyed by the identifier column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRow {
    pub id: String,
    /// 1-based line number in the uploaded text.
    pub line: usize,
    pub values: HashMap<String, CellValue>,
}

impl SourceRow {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.values.get(column)
    }

    /// Numeric value of a column, `None` when absent or not numeric.
    pub fn number(&self, column: &str) -> Option<f64> {
        self.values.get(column).and_then(CellValue::as_number)
    }
}

/// One scored result returned by the prediction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: String,
    pub raw_label: String,
    pub confidence: f64,
    /// Set when the service sent the identifier as a JSON number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_id: Option<f64>,
}

/// A source row joined with its prediction.
///
/// Only the correlator builds these. The row's identifier is the uploaded
/// text, which may differ from a numeric form the service echoed back. The label is rewritten in place whenever the classification threshold moves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedRow {
    source: SourceRow,
    prediction: PredictionRecord,
    tag: PredictionTag,
    label: PlanetLabel,
}

impl ClassifiedRow {
    pub(crate) fn new(source: SourceRow, prediction: PredictionRecord, label: PlanetLabel) -> Self {
        let tag = PredictionTag::from_raw(&prediction.raw_label);
        Self {
            source,
            prediction,
            tag,
            label,
        }
    }

    pub fn id(&self) -> &str {
        &self.source.id
    }

    pub fn confidence(&self) -> f64 {
        self.prediction.confidence
    }

    pub fn label(&self) -> PlanetLabel {
        self.label
    }

    pub fn tag(&self) -> &PredictionTag {
        &self.tag
    }

    pub fn source(&self) -> &SourceRow {
        &self.source
    }

    pub fn prediction(&self) -> &PredictionRecord {
        &self.prediction
    }

    /// Feature value for display and export. Missing or textual cells read as zero.
    pub fn feature(&self, column: &str) -> f64 {
        self.source.number(column).unwrap_or(0.0)
    }

    pub(crate) fn set_label(&mut self, label: PlanetLabel) {
        self.label = label;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(id: &str) -> SourceRow {
        let mut values = HashMap::new();
        values.insert("transit_id".to_string(), CellValue::Text(id.to_string()));
        values.insert("pl_period".to_string(), CellValue::Number(3.5));
        values.insert("st_radius".to_string(), CellValue::Text("n/a".to_string()));
        SourceRow {
            id: id.to_string(),
            line: 2,
            values,
        }
    }

    #[test]
    fn feature_defaults_to_zero() {
        let row = ClassifiedRow::new(
            source("A"),
            PredictionRecord {
                id: "A".to_string(),
                raw_label: "1".to_string(),
                confidence: 0.9,
                numeric_id: None,
            },
            PlanetLabel::ConfirmedPlanet,
        );

        assert_eq!(row.feature("pl_period"), 3.5);
        assert_eq!(row.feature("st_radius"), 0.0);
        assert_eq!(row.feature("missing"), 0.0);
        assert_eq!(row.tag().as_str(), "CONFIRMED");
        assert_eq!(row.id(), "A");
    }
}
