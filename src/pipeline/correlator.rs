use super::classifier::{Threshold, classify};
use crate::domain::{ClassifiedRow, CorrelationWarning, PredictionRecord, SourceRow};
use std::collections::HashMap;
use tracing::warn;

/// Rows that matched a prediction, plus one warning per prediction that did not.
#[derive(Debug, Clone, Default)]
pub struct Correlation {
    pub rows: Vec<ClassifiedRow>,
    pub warnings: Vec<CorrelationWarning>,
}

/// Hash key for a finite number, with `-0.0` folded into `0.0`.
fn numeric_key(value: f64) -> Option<u64> {
    if !value.is_finite() {
        return None;
    }
    Some(if value == 0.0 { 0.0f64 } else { value }.to_bits())
}

/// Join predictions back to uploaded rows by identifier.
///
/// Identifiers match on exact text. A prediction whose identifier came back
/// as a JSON number falls back to numeric equality with uploaded identifiers
/// that parse as numbers, so `007` and `1.50` in the upload match `7` and
/// `1.5` from the service.
///
/// Output follows prediction order. With duplicate identifiers in the upload
/// the first row wins. Unmatched predictions are dropped and logged.
pub fn correlate(
    predictions: Vec<PredictionRecord>,
    sources: &[SourceRow],
    threshold: Threshold,
) -> Correlation {
    let mut by_id: HashMap<&str, &SourceRow> = HashMap::with_capacity(sources.len());
    let mut by_number: HashMap<u64, &SourceRow> = HashMap::new();
    for row in sources {
        by_id.entry(row.id.as_str()).or_insert(row);
        if let Some(key) = row.id.parse::<f64>().ok().and_then(numeric_key) {
            by_number.entry(key).or_insert(row);
        }
    }

    let mut correlation = Correlation {
        rows: Vec::with_capacity(predictions.len()),
        warnings: Vec::new(),
    };

    for prediction in predictions {
        let matched = by_id.get(prediction.id.as_str()).or_else(|| {
            prediction
                .numeric_id
                .and_then(numeric_key)
                .and_then(|key| by_number.get(&key))
        });
        match matched {
            Some(source) => {
                let label = classify(prediction.confidence, threshold);
                correlation
                    .rows
                    .push(ClassifiedRow::new((*source).clone(), prediction, label));
            }
            None => {
                warn!(transit_id = %prediction.id, "Row not found in upload for prediction");
                correlation.warnings.push(CorrelationWarning {
                    transit_id: prediction.id,
                });
            }
        }
    }

    correlation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CellValue, PlanetLabel};

    fn source(id: &str, period: f64) -> SourceRow {
        let mut values = HashMap::new();
        values.insert("transit_id".to_string(), CellValue::Text(id.to_string()));
        values.insert("pl_period".to_string(), CellValue::Number(period));
        SourceRow {
            id: id.to_string(),
            line: 0,
            values,
        }
    }

    fn prediction(id: &str, raw: &str, confidence: f64) -> PredictionRecord {
        PredictionRecord {
            id: id.to_string(),
            raw_label: raw.to_string(),
            confidence,
            numeric_id: None,
        }
    }

    fn numeric_prediction(value: f64, confidence: f64) -> PredictionRecord {
        PredictionRecord {
            id: value.to_string(),
            numeric_id: Some(value),
            ..prediction("", "1", confidence)
        }
    }

    #[test]
    fn unmatched_predictions_are_dropped_with_warning() {
        let sources: Vec<SourceRow> = (0..10)
            .map(|i| source(if i == 0 { "A" } else { "other" }, i as f64))
            .collect();
        let result = correlate(
            vec![prediction("A", "1", 0.9), prediction("B", "0", 0.2)],
            &sources,
            Threshold::default(),
        );

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].id(), "A");
        assert_eq!(
            result.warnings,
            vec![CorrelationWarning {
                transit_id: "B".to_string()
            }]
        );
    }

    #[test]
    fn output_follows_prediction_order() {
        let sources = vec![source("A", 1.0), source("B", 2.0), source("C", 3.0)];
        let result = correlate(
            vec![
                prediction("C", "1", 0.9),
                prediction("A", "0", 0.1),
                prediction("B", "1", 0.6),
            ],
            &sources,
            Threshold::default(),
        );

        let ids: Vec<&str> = result.rows.iter().map(ClassifiedRow::id).collect();
        assert_eq!(ids, ["C", "A", "B"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn duplicate_source_ids_use_first_match() {
        let sources = vec![source("A", 1.0), source("A", 99.0)];
        let result = correlate(vec![prediction("A", "1", 0.9)], &sources, Threshold::default());
        assert_eq!(result.rows[0].feature("pl_period"), 1.0);
    }

    #[test]
    fn rows_carry_tag_and_threshold_label() {
        let sources = vec![source("A", 1.0)];
        let result = correlate(
            vec![prediction("A", "0", 0.72)],
            &sources,
            Threshold::new(0.7),
        );
        let row = &result.rows[0];
        assert_eq!(row.tag().as_str(), "FALSE");
        assert_eq!(row.label(), PlanetLabel::ConfirmedPlanet);
    }

    #[test]
    fn numeric_identifiers_match_zero_padded_source_text() {
        let sources = vec![source("007", 1.0), source("1.50", 2.0), source("KOI-7", 3.0)];
        let result = correlate(
            vec![numeric_prediction(7.0, 0.9), numeric_prediction(1.5, 0.5)],
            &sources,
            Threshold::default(),
        );

        assert!(result.warnings.is_empty());
        let ids: Vec<&str> = result.rows.iter().map(ClassifiedRow::id).collect();
        assert_eq!(ids, ["007", "1.50"]);
        assert_eq!(result.rows[0].feature("pl_period"), 1.0);
        assert_eq!(result.rows[0].prediction().id, "7");
    }

    #[test]
    fn exact_text_match_wins_over_numeric_equality() {
        let sources = vec![source("007", 1.0), source("7", 2.0)];
        let result = correlate(vec![numeric_prediction(7.0, 0.9)], &sources, Threshold::default());
        assert_eq!(result.rows[0].id(), "7");
        assert_eq!(result.rows[0].feature("pl_period"), 2.0);
    }

    #[test]
    fn numeric_fallback_keeps_first_uploaded_row() {
        let sources = vec![source("07", 1.0), source("7.0", 2.0)];
        let result = correlate(vec![numeric_prediction(7.0, 0.9)], &sources, Threshold::default());
        assert_eq!(result.rows[0].id(), "07");
    }

    #[test]
    fn text_identifiers_do_not_fall_back_to_numbers() {
        let sources = vec![source("007", 1.0)];
        let result = correlate(vec![prediction("7", "1", 0.9)], &sources, Threshold::default());
        assert!(result.rows.is_empty());
        assert_eq!(result.warnings[0].transit_id, "7");
    }
}
