//! Quick filter presets.
//!
//! A preset is a complete facet assignment. Applying one always starts from an
//! empty filter state, so the result never depends on what was selected before.

use super::state::FilterState;
use super::window::DateRange;

/// A named, atomic filter assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub id: &'static str,
    pub label: &'static str,
    /// `(facet id, value)` pairs merged after the reset.
    pub facets: &'static [(&'static str, &'static str)],
    pub date_range: Option<DateRange>,
}

impl Preset {
    pub const fn new(id: &'static str, label: &'static str) -> Self {
        Self {
            id,
            label,
            facets: &[],
            date_range: None,
        }
    }

    pub const fn with_facets(mut self, facets: &'static [(&'static str, &'static str)]) -> Self {
        self.facets = facets;
        self
    }

    pub const fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// The filter state this preset produces, independent of any prior state.
    pub fn to_state(&self) -> FilterState {
        let mut state = FilterState::default();
        for (facet, value) in self.facets {
            state.select(facet, value);
        }
        if let Some(range) = self.date_range {
            state.select_date_range(range);
        }
        state.active_preset = Some(self.id.to_string());
        state
    }
}

/// Whether a preset currently drives the filter chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetStatus<'a> {
    Idle,
    Active(&'a str),
}
