//! Filter state and its reducer.
//!
//! `FilterState` is a plain value: the hosting screen owns one per list and
//! mutates it through [`FilterState::reduce`], or through the edit methods
//! that cannot fail.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::facet::{Filterable, ALL};
use super::window::{DateRange, DateWindow};
use super::FilterError;

/// One operator action on a list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    SetFacet { facet: String, value: String },
    SetSearch(String),
    SetDateRange(DateRange),
    SetDateFrom(Option<NaiveDate>),
    SetDateTo(Option<NaiveDate>),
    ApplyPreset(String),
    ResetAll,
}

/// Current selection for every facet of one list screen.
///
/// Facets at [`ALL`] are not stored, so two states that filter the same way
/// compare equal. Explicit date bounds exist only while the date range is
/// [`DateRange::Custom`]; otherwise the window is derived from the token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub(crate) facets: BTreeMap<String, String>,
    pub(crate) search_query: String,
    pub(crate) date_range: DateRange,
    pub(crate) date_from: Option<NaiveDate>,
    pub(crate) date_to: Option<NaiveDate>,
    pub(crate) active_preset: Option<String>,
}

impl FilterState {
    /// Selected value of a facet, [`ALL`] when unconstrained.
    pub fn facet(&self, id: &str) -> &str {
        self.facets.get(id).map(String::as_str).unwrap_or(ALL)
    }

    /// Constrained facets in id order.
    pub fn selections(&self) -> impl Iterator<Item = (&str, &str)> {
        self.facets.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn date_from(&self) -> Option<NaiveDate> {
        self.date_from
    }

    pub fn date_to(&self) -> Option<NaiveDate> {
        self.date_to
    }

    pub fn active_preset(&self) -> Option<&str> {
        self.active_preset.as_deref()
    }

    /// Absolute window the date facet currently filters on.
    pub fn date_window(&self, now: NaiveDateTime) -> DateWindow {
        self.date_range.resolve(now).unwrap_or(DateWindow {
            from: self.date_from,
            to: self.date_to,
        })
    }

    /// Number of constrained facets, counting the date facet once.
    pub fn active_filter_count(&self) -> usize {
        self.facets.len() + usize::from(self.date_range != DateRange::All)
    }

    /// True when nothing narrows the record set.
    pub fn is_unfiltered(&self) -> bool {
        self.facets.is_empty()
            && self.date_range == DateRange::All
            && self.search_query.trim().is_empty()
    }

    /// Apply one action for record kind `R`.
    ///
    /// Invalid actions are rejected and leave the state untouched. Only
    /// `ApplyPreset` and `ResetAll` change which preset is active; manual edits
    /// after a preset keep the preset highlighted.
    pub fn reduce<R: Filterable>(
        &mut self,
        action: FilterAction,
        now: NaiveDateTime,
    ) -> Result<(), FilterError> {
        match action {
            FilterAction::SetFacet { facet, value } => {
                if facet == R::date_facet().id {
                    let range = value.parse::<DateRange>()?;
                    self.set_date_range(range, now);
                    return Ok(());
                }
                let spec = R::facet(&facet).ok_or_else(|| FilterError::UnknownFacet(facet.clone()))?;
                if !spec.accepts(&value) {
                    return Err(FilterError::UnknownValue { facet, value });
                }
                self.select(&facet, &value);
            }
            FilterAction::SetSearch(query) => self.set_search(query),
            FilterAction::SetDateRange(range) => self.set_date_range(range, now),
            FilterAction::SetDateFrom(from) => self.set_date_from(from, now),
            FilterAction::SetDateTo(to) => self.set_date_to(to, now),
            FilterAction::ApplyPreset(id) => {
                let preset = R::preset(&id).ok_or(FilterError::UnknownPreset(id))?;
                *self = preset.to_state();
            }
            FilterAction::ResetAll => self.reset(),
        }
        Ok(())
    }

    // Edits that cannot fail for any record kind.

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Choosing `Custom` keeps the window that was showing as explicit bounds.
    pub fn set_date_range(&mut self, range: DateRange, now: NaiveDateTime) {
        if range == DateRange::Custom {
            self.materialize_custom(now);
        } else {
            self.select_date_range(range);
        }
    }

    /// Lower bound; switches to `Custom`. `None` opens the bound.
    pub fn set_date_from(&mut self, from: Option<NaiveDate>, now: NaiveDateTime) {
        self.materialize_custom(now);
        self.date_from = from;
    }

    /// Upper bound; switches to `Custom`. `None` opens the bound.
    pub fn set_date_to(&mut self, to: Option<NaiveDate>, now: NaiveDateTime) {
        self.materialize_custom(now);
        self.date_to = to;
    }

    /// Back to the unfiltered default with no active preset.
    pub fn reset(&mut self) {
        *self = FilterState::default();
    }

    pub(crate) fn select(&mut self, facet: &str, value: &str) {
        if value == ALL {
            self.facets.remove(facet);
        } else {
            self.facets.insert(facet.to_string(), value.to_string());
        }
    }

    /// Token-only switch; explicit bounds are dropped unless switching to
    /// `Custom`, which starts from the window that was showing.
    pub(crate) fn select_date_range(&mut self, range: DateRange) {
        self.date_range = range;
        if range != DateRange::Custom {
            self.date_from = None;
            self.date_to = None;
        }
    }

    /// Freeze the derived window into explicit bounds before a manual edit.
    fn materialize_custom(&mut self, now: NaiveDateTime) {
        if self.date_range == DateRange::Custom {
            return;
        }
        let window = self.date_window(now);
        self.date_range = DateRange::Custom;
        self.date_from = window.from;
        self.date_to = window.to;
    }
}
