use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use transit_classifier::domain::{CellValue, ClassifiedRow, PlanetLabel, PredictionRecord, SourceRow};
use transit_classifier::parser::Table;
use transit_classifier::pipeline::{
    EXPORT_ID_COLUMN, EXPORT_LABEL_COLUMN, LabelFilter, Threshold, correlate, export_csv,
    project_page, summarize, total_pages,
};

fn classified(confidences: &[f64], threshold: f64) -> Vec<ClassifiedRow> {
    let sources: Vec<SourceRow> = confidences
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let mut values = HashMap::new();
            values.insert("pl_period".to_string(), CellValue::Number(i as f64 + 0.25));
            SourceRow {
                id: format!("KOI-{i:04}"),
                line: i + 2,
                values,
            }
        })
        .collect();
    let predictions = confidences
        .iter()
        .enumerate()
        .map(|(i, confidence)| PredictionRecord {
            id: format!("KOI-{i:04}"),
            raw_label: "1".to_string(),
            confidence: *confidence,
            numeric_id: None,
        })
        .collect();
    correlate(predictions, &sources, Threshold::new(threshold)).rows
}

fn filter_strategy() -> impl Strategy<Value = LabelFilter> {
    prop_oneof![
        Just(LabelFilter::All),
        Just(LabelFilter::Only(PlanetLabel::ConfirmedPlanet)),
        Just(LabelFilter::Only(PlanetLabel::StrongCandidate)),
        Just(LabelFilter::Only(PlanetLabel::WeakCandidate)),
        Just(LabelFilter::Only(PlanetLabel::FalsePositive)),
    ]
}

proptest! {
    #[test]
    fn test_summary_total_matches_filtered_count(
        confidences in prop::collection::vec(0.0f64..=1.0, 0..60),
        threshold in 0.0f64..=1.0,
        filter in filter_strategy(),
    ) {
        let rows = classified(&confidences, threshold);
        let expected = rows.iter().filter(|r| filter.matches(r.label())).count();
        let summary = summarize(&rows, filter);

        prop_assert_eq!(summary.total(), expected);
        prop_assert_eq!(summary.iter().count(), 4);
    }

    #[test]
    fn test_pages_partition_the_filtered_rows(
        confidences in prop::collection::vec(0.0f64..=1.0, 0..60),
        filter in filter_strategy(),
        page_size in 1usize..15,
    ) {
        let rows = classified(&confidences, 0.7);
        let filtered: Vec<&str> = rows
            .iter()
            .filter(|r| filter.matches(r.label()))
            .map(ClassifiedRow::id)
            .collect();
        let pages = total_pages(filtered.len(), page_size);

        let mut seen = Vec::new();
        for page in 1..=pages {
            let projected = project_page(&rows, filter, page, page_size).unwrap();
            prop_assert!(projected.rows.len() <= page_size);
            seen.extend(projected.rows.iter().map(|r| r.id()));
        }

        prop_assert_eq!(&seen, &filtered);
        let unique: HashSet<&str> = seen.iter().copied().collect();
        prop_assert_eq!(unique.len(), seen.len());
        prop_assert!(project_page(&rows, filter, pages + 1, page_size).is_err());
    }

    #[test]
    fn test_export_reparses_to_identical_ids_and_labels(
        confidences in prop::collection::vec(0.0f64..=1.0, 1..40),
        threshold in 0.0f64..=1.0,
    ) {
        let rows = classified(&confidences, threshold);
        let csv = export_csv(&rows, Threshold::new(threshold)).unwrap();
        let table = Table::load(&csv, EXPORT_ID_COLUMN).unwrap();
        let parsed = table.collect_rows().unwrap();

        prop_assert_eq!(parsed.len(), rows.len());
        for (row, back) in rows.iter().zip(&parsed) {
            prop_assert_eq!(row.id(), back.id.as_str());
            let label: PlanetLabel = back
                .get(EXPORT_LABEL_COLUMN)
                .and_then(CellValue::as_text)
                .unwrap()
                .parse()
                .unwrap();
            prop_assert_eq!(label, row.label());
        }
    }
}
