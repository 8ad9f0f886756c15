//! Predicate evaluation.
//!
//! A record passes when every constrained facet, the date window and the
//! search text all accept it. Checks run in that order and stop at the first
//! rejection.

use chrono::NaiveDateTime;

use crate::utils::parse_calendar_date;

use super::facet::{Facet, Filterable, ALL};
use super::state::FilterState;
use super::window::DateWindow;

/// A filter state compiled for repeated evaluation over one record kind.
pub struct Predicate<'s, R: Filterable> {
    facets: Vec<(&'static Facet<R>, &'s str)>,
    window: DateWindow,
    needle: Option<String>,
    now: NaiveDateTime,
}

impl<'s, R: Filterable> Predicate<'s, R> {
    pub fn compile(state: &'s FilterState, now: NaiveDateTime) -> Self {
        let facets = R::facets()
            .iter()
            .map(|facet| (facet, state.facet(facet.id)))
            .filter(|(_, value)| *value != ALL)
            .collect();

        let query = state.search_query().trim();
        let needle = (!query.is_empty()).then(|| query.to_lowercase());

        Self {
            facets,
            window: state.date_window(now),
            needle,
            now,
        }
    }

    pub fn matches(&self, record: &R) -> bool {
        self.facets.iter().all(|(facet, value)| facet.matches(record, value, self.now))
            && date_in_window(record.record_date(), &self.window)
            && self
                .needle
                .as_deref()
                .map_or(true, |needle| search_matches(record, needle))
    }

    /// Records that pass, in source order.
    pub fn filter<'a>(&self, records: &'a [R]) -> Vec<&'a R> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Evaluate one record against a filter state.
pub fn evaluate<R: Filterable>(record: &R, state: &FilterState, now: NaiveDateTime) -> bool {
    Predicate::compile(state, now).matches(record)
}

/// Date facet test. Missing or unparseable dates are kept.
pub fn date_in_window(raw: Option<&str>, window: &DateWindow) -> bool {
    if window.is_unbounded() {
        return true;
    }
    match raw.and_then(parse_calendar_date) {
        Some(date) => window.contains(date),
        None => true,
    }
}

/// Search test over the record's ordered search fields.
/// `needle` must already be lowercased.
pub fn search_matches<R: Filterable>(record: &R, needle: &str) -> bool {
    let haystack = record
        .search_fields()
        .into_iter()
        .map(|field| field.unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    haystack.contains(needle)
}
