//! Facet registry types.
//!
//! A facet is one independent filter dimension. Each record kind declares its
//! facets as a static table (see the `Filterable` impls in `crate::models`),
//! so the evaluator and the count aggregator stay generic.

use chrono::NaiveDateTime;

use crate::models::Domain;

use super::preset::Preset;

/// Sentinel value meaning "no constraint" for every facet.
pub const ALL: &str = "all";

/// One filter dimension over records of type `R`.
pub struct Facet<R> {
    pub id: &'static str,
    pub label: &'static str,
    /// Selectable values, in display order, excluding [`ALL`].
    pub values: &'static [&'static str],
    /// Must be total over `values` and fail open on missing record fields.
    pub predicate: Rule<R>,
}

/// How a facet decides whether a record has a value.
pub enum Rule<R> {
    /// Reads only the record.
    Field(fn(&R, &str) -> bool),
    /// Reads the record and the evaluation time, for elapsed-time facets.
    Elapsed(fn(&R, &str, NaiveDateTime) -> bool),
}

impl<R> Facet<R> {
    /// Whether `value` is a legal selection for this facet.
    pub fn accepts(&self, value: &str) -> bool {
        value == ALL || self.values.contains(&value)
    }

    pub fn matches(&self, record: &R, value: &str, now: NaiveDateTime) -> bool {
        if value == ALL {
            return true;
        }
        match self.predicate {
            Rule::Field(f) => f(record, value),
            Rule::Elapsed(f) => f(record, value, now),
        }
    }
}

/// Describes the single date facet of a record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFacet {
    pub id: &'static str,
    pub label: &'static str,
}

/// A record kind the engine can filter.
pub trait Filterable: Sized + 'static {
    const DOMAIN: Domain;

    /// Ordered facet table; evaluation follows this order.
    fn facets() -> &'static [Facet<Self>];

    fn presets() -> &'static [Preset];

    fn date_facet() -> DateFacet;

    /// Raw value of the field the date facet filters on.
    fn record_date(&self) -> Option<&str>;

    /// Searchable fields in a fixed order; `None` reads as empty.
    fn search_fields(&self) -> Vec<Option<&str>>;

    fn facet(id: &str) -> Option<&'static Facet<Self>> {
        Self::facets().iter().find(|f| f.id == id)
    }

    fn preset(id: &str) -> Option<&'static Preset> {
        Self::presets().iter().find(|p| p.id == id)
    }
}

// ============================================================================
// Numeric bands
// ============================================================================

/// A named numeric range, `min <= x < max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub token: &'static str,
    pub min: f64,
    pub max: f64,
}

impl Band {
    pub const fn new(token: &'static str, min: f64, max: f64) -> Self {
        Self { token, min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }
}

/// Band-facet predicate: missing values and unknown tokens never exclude.
pub fn in_band(bands: &[Band], token: &str, value: Option<f64>) -> bool {
    let Some(value) = value else {
        return true;
    };
    match bands.iter().find(|b| b.token == token) {
        Some(band) => band.contains(value),
        None => true,
    }
}

/// Token list of a band table, for a facet's `values`.
pub const fn band_tokens<const N: usize>(bands: &[Band; N]) -> [&'static str; N] {
    let mut tokens = [""; N];
    let mut i = 0;
    while i < N {
        tokens[i] = bands[i].token;
        i += 1;
    }
    tokens
}

/// Case-insensitive equality predicate: a missing field never excludes.
pub fn eq_token(field: Option<&str>, value: &str) -> bool {
    match field {
        Some(field) if !field.trim().is_empty() => field.trim().eq_ignore_ascii_case(value),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANDS: [Band; 3] = [
        Band::new("low", f64::NEG_INFINITY, 11.0),
        Band::new("medium", 11.0, 19.0),
        Band::new("high", 19.0, f64::INFINITY),
    ];

    #[test]
    fn test_band_edges() {
        assert!(in_band(&BANDS, "low", Some(10.0)));
        assert!(!in_band(&BANDS, "low", Some(11.0)));
        assert!(in_band(&BANDS, "medium", Some(11.0)));
        assert!(in_band(&BANDS, "medium", Some(18.0)));
        assert!(!in_band(&BANDS, "medium", Some(19.0)));
        assert!(in_band(&BANDS, "high", Some(19.0)));
    }

    #[test]
    fn test_band_fails_open() {
        assert!(in_band(&BANDS, "high", None));
        assert!(in_band(&BANDS, "unheard-of", Some(3.0)));
    }

    #[test]
    fn test_band_tokens() {
        const TOKENS: [&str; 3] = band_tokens(&BANDS);
        assert_eq!(TOKENS, ["low", "medium", "high"]);
    }

    #[test]
    fn test_eq_token() {
        assert!(eq_token(Some("ACTIVE"), "active"));
        assert!(eq_token(Some(" active "), "active"));
        assert!(!eq_token(Some("inactive"), "active"));
        assert!(eq_token(None, "active"));
        assert!(eq_token(Some(""), "active"));
    }
}
