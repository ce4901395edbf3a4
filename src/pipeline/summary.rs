use super::view::LabelFilter;
use crate::domain::{ClassifiedRow, PlanetLabel, PredictionTag};
use serde::Serialize;
use std::collections::BTreeMap;

/// Label → count over a row set. All four labels are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    counts: BTreeMap<PlanetLabel, usize>,
}

impl Summary {
    pub fn count(&self, label: PlanetLabel) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlanetLabel, usize)> + '_ {
        self.counts.iter().map(|(label, count)| (*label, *count))
    }
}

/// Count current labels over the rows that pass `filter`.
///
/// Always rebuilt from scratch; callers recompute after any threshold or
/// row-set change.
pub fn summarize(rows: &[ClassifiedRow], filter: LabelFilter) -> Summary {
    let mut counts: BTreeMap<PlanetLabel, usize> =
        PlanetLabel::ALL.into_iter().map(|label| (label, 0)).collect();

    for row in rows.iter().filter(|row| filter.matches(row.label())) {
        *counts.entry(row.label()).or_insert(0) += 1;
    }

    Summary { counts }
}

/// Count of the scorer's own categorical tags, independent of the threshold.
pub fn summarize_tags(rows: &[ClassifiedRow]) -> BTreeMap<PredictionTag, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(row.tag().clone()).or_insert(0) += 1;
    }
    counts
}
