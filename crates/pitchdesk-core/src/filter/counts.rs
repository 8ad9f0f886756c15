//! Facet badge counts.
//!
//! Counts are taken over the unfiltered base records, so a badge answers "how
//! many records have this value" and does not move as other facets change.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::evaluate::date_in_window;
use super::facet::{Filterable, ALL};
use super::window::DateRange;

/// `facet id -> value -> count`, including the [`ALL`] total for each facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(transparent)]
pub struct FacetCounts(BTreeMap<String, BTreeMap<String, usize>>);

impl FacetCounts {
    /// Badge count for one facet value; 0 for anything not counted.
    pub fn get(&self, facet: &str, value: &str) -> usize {
        self.0
            .get(facet)
            .and_then(|values| values.get(value))
            .copied()
            .unwrap_or(0)
    }

    pub fn facet(&self, facet: &str) -> Option<&BTreeMap<String, usize>> {
        self.0.get(facet)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, usize>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn insert(&mut self, facet: &str, value: &str, count: usize) {
        self.0
            .entry(facet.to_string())
            .or_default()
            .insert(value.to_string(), count);
    }
}

/// Count every facet value of `R` over `records`.
pub fn facet_counts<R: Filterable>(records: &[R], now: NaiveDateTime) -> FacetCounts {
    let mut counts = FacetCounts::default();
    let total = records.len();

    for facet in R::facets() {
        counts.insert(facet.id, ALL, total);
        for value in facet.values {
            let n = records.iter().filter(|r| facet.matches(r, value, now)).count();
            counts.insert(facet.id, value, n);
        }
    }

    let date_facet = R::date_facet();
    for range in DateRange::RELATIVE {
        let n = match range.resolve(now) {
            Some(window) => records
                .iter()
                .filter(|r| date_in_window(r.record_date(), &window))
                .count(),
            None => continue,
        };
        counts.insert(date_facet.id, range.token(), n);
    }

    counts
}
