//! Per-screen filter engine.
//!
//! `FilterEngine` owns the filter state of one list screen and the clock used
//! to resolve relative dates. Records are borrowed per call: the record source
//! can be swapped (live vs fallback, or a finished fetch) without touching the
//! filter state.

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use super::counts::{facet_counts, FacetCounts};
use super::evaluate::Predicate;
use super::facet::{DateFacet, Facet, Filterable};
use super::preset::{Preset, PresetStatus};
use super::state::{FilterAction, FilterState};
use super::window::{Clock, DateRange, DateWindow, SystemClock};
use super::FilterError;

/// Everything the rendering layer needs after an operator action.
#[derive(Debug, Clone)]
pub struct FilterOutput<'a, R> {
    pub filtered: Vec<&'a R>,
    pub counts: FacetCounts,
    pub active_preset: Option<String>,
}

pub struct FilterEngine<R: Filterable> {
    state: FilterState,
    clock: Arc<dyn Clock>,
    _records: PhantomData<fn() -> R>,
}

impl<R: Filterable> Default for FilterEngine<R> {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl<R: Filterable> FilterEngine<R> {
    /// Fresh engine with an empty filter state.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: FilterState::default(),
            clock,
            _records: PhantomData,
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn facets(&self) -> &'static [Facet<R>] {
        R::facets()
    }

    pub fn presets(&self) -> &'static [Preset] {
        R::presets()
    }

    pub fn date_facet(&self) -> DateFacet {
        R::date_facet()
    }

    pub fn preset_status(&self) -> PresetStatus<'_> {
        match self.state.active_preset() {
            Some(id) => PresetStatus::Active(id),
            None => PresetStatus::Idle,
        }
    }

    pub fn active_filter_count(&self) -> usize {
        self.state.active_filter_count()
    }

    pub fn date_window(&self) -> DateWindow {
        self.state.date_window(self.clock.now())
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Run one action through the reducer.
    pub fn dispatch(&mut self, action: FilterAction) -> Result<(), FilterError> {
        debug!(domain = R::DOMAIN.as_str(), action = ?action, "filter action");
        let result = self.state.reduce::<R>(action, self.clock.now());
        if let Err(ref e) = result {
            debug!(domain = R::DOMAIN.as_str(), error = %e, "filter action rejected");
        }
        result
    }

    pub fn set_facet(&mut self, facet: &str, value: &str) -> Result<(), FilterError> {
        self.dispatch(FilterAction::SetFacet {
            facet: facet.to_string(),
            value: value.to_string(),
        })
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        let query = query.into();
        debug!(domain = R::DOMAIN.as_str(), query = %query, "set search");
        self.state.set_search(query);
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        debug!(domain = R::DOMAIN.as_str(), range = %range, "set date range");
        self.state.set_date_range(range, self.clock.now());
    }

    pub fn set_date_from(&mut self, from: Option<NaiveDate>) {
        debug!(domain = R::DOMAIN.as_str(), from = ?from, "set date from");
        self.state.set_date_from(from, self.clock.now());
    }

    pub fn set_date_to(&mut self, to: Option<NaiveDate>) {
        debug!(domain = R::DOMAIN.as_str(), to = ?to, "set date to");
        self.state.set_date_to(to, self.clock.now());
    }

    pub fn apply_preset(&mut self, id: &str) -> Result<(), FilterError> {
        self.dispatch(FilterAction::ApplyPreset(id.to_string()))
    }

    pub fn reset_all(&mut self) {
        debug!(domain = R::DOMAIN.as_str(), "reset all filters");
        self.state.reset();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Records passing the current filter, in source order.
    pub fn filtered<'a>(&self, records: &'a [R]) -> Vec<&'a R> {
        Predicate::compile(&self.state, self.clock.now()).filter(records)
    }

    /// Badge counts over the unfiltered `records`.
    pub fn counts(&self, records: &[R]) -> FacetCounts {
        facet_counts(records, self.clock.now())
    }

    pub fn snapshot<'a>(&self, records: &'a [R]) -> FilterOutput<'a, R> {
        let now = self.clock.now();
        let filtered = Predicate::compile(&self.state, now).filter(records);
        debug!(
            domain = R::DOMAIN.as_str(),
            total = records.len(),
            matched = filtered.len(),
            "filter snapshot"
        );
        FilterOutput {
            filtered,
            counts: facet_counts(records, now),
            active_preset: self.state.active_preset().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::evaluate::{evaluate, search_matches};
    use crate::filter::{FixedClock, ALL};
    use crate::models::{Match, Member, RecordPage, Team, TeamStats};
    use crate::source::load_fallback;

    fn engine<R: Filterable>() -> FilterEngine<R> {
        let today = NaiveDate::from_ymd_opt(2025, 10, 24).unwrap();
        FilterEngine::new(Arc::new(FixedClock::on(today)))
    }

    fn team(id: &str, name: &str, status: &str, members: u32, founded: &str) -> Team {
        Team {
            id: id.to_string(),
            name: Some(name.to_string()),
            region: Some("seoul".to_string()),
            status: Some(status.to_string()),
            founded_date: Some(founded.to_string()),
            stats: Some(TeamStats {
                total_members: Some(members),
                total_matches: Some(25),
                win_rate: Some(50.0),
                ..TeamStats::default()
            }),
            ..Team::default()
        }
    }

    fn teams() -> Vec<Team> {
        vec![
            team("t1", "Gangnam United FC", "active", 8, "2025-10-23"),
            team("t2", "Mapo Rovers", "active", 15, "2025-10-22"),
            team("t3", "Songpa Athletic", "inactive", 22, "2025-10-24"),
            team("t4", "Incheon Harbor", "disbanded", 12, "not-a-date"),
        ]
    }

    fn ids<'a>(records: &[&'a Team]) -> Vec<&'a str> {
        records.iter().map(|t| t.id.as_str()).collect()
    }

    fn member_ids<'a>(records: &[&'a Member]) -> Vec<&'a str> {
        records.iter().map(|m| m.id.as_str()).collect()
    }

    /// Member engine at 15:00 on the reference day, so elapsed-time facets
    /// see a mid-afternoon clock.
    fn member_engine() -> FilterEngine<Member> {
        let afternoon = NaiveDate::from_ymd_opt(2025, 10, 24)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap();
        FilterEngine::new(Arc::new(FixedClock::at(afternoon)))
    }

    // ------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------

    #[test]
    fn test_conjunction_law() {
        let records = teams();
        let mut eng = engine::<Team>();
        eng.set_facet("status", "active").unwrap();
        eng.set_facet("memberCount", "medium").unwrap();
        eng.set_search("rovers");

        let now = FixedClock::on(NaiveDate::from_ymd_opt(2025, 10, 24).unwrap()).now();
        for record in &records {
            let each = ["status", "memberCount"]
                .iter()
                .all(|id| Team::facet(id).unwrap().matches(record, eng.state().facet(id), now))
                && search_matches(record, "rovers");
            assert_eq!(evaluate(record, eng.state(), now), each, "{}", record.id);
        }
        assert_eq!(ids(&eng.filtered(&records)), vec!["t2"]);
    }

    #[test]
    fn test_member_count_medium_band() {
        let records: Vec<Team> = teams().into_iter().take(3).collect();
        let mut eng = engine::<Team>();

        eng.set_facet("memberCount", "medium").unwrap();
        assert_eq!(ids(&eng.filtered(&records)), vec!["t2"]);

        eng.set_facet("memberCount", ALL).unwrap();
        assert_eq!(eng.filtered(&records).len(), 3);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let records = teams();
        let mut eng = engine::<Team>();
        eng.set_search("  gangnam ");
        assert_eq!(ids(&eng.filtered(&records)), vec!["t1"]);

        eng.set_search("   ");
        assert_eq!(eng.filtered(&records).len(), records.len());
    }

    // ------------------------------------------------------------------
    // Dates
    // ------------------------------------------------------------------

    #[test]
    fn test_yesterday_window() {
        let records: Vec<Team> = teams().into_iter().take(3).collect();
        let mut eng = engine::<Team>();
        eng.set_date_range(DateRange::Yesterday);

        let day = NaiveDate::from_ymd_opt(2025, 10, 23).unwrap();
        assert_eq!(eng.date_window(), DateWindow::day(day));
        assert_eq!(ids(&eng.filtered(&records)), vec!["t1"]);
    }

    #[test]
    fn test_unparseable_date_is_kept_under_any_window() {
        let records = teams();
        let mut eng = engine::<Team>();
        for range in DateRange::RELATIVE {
            eng.set_date_range(range);
            assert!(ids(&eng.filtered(&records)).contains(&"t4"), "{}", range);
        }
        eng.set_date_from(NaiveDate::from_ymd_opt(2030, 1, 1));
        assert_eq!(ids(&eng.filtered(&records)), vec!["t4"]);
    }

    // ------------------------------------------------------------------
    // Presets and reset
    // ------------------------------------------------------------------

    #[test]
    fn test_preset_is_atomic_from_any_prior_state() {
        let mut first = engine::<Team>();
        first.set_facet("region", "busan").unwrap();
        first.set_date_range(DateRange::Last90Days);
        first.set_search("harbor");
        first.apply_preset("recruiting").unwrap();

        let mut second = engine::<Team>();
        second.apply_preset("verified").unwrap();
        second.apply_preset("recruiting").unwrap();
        second.apply_preset("recruiting").unwrap();

        assert_eq!(first.state(), second.state());
        assert_eq!(first.preset_status(), PresetStatus::Active("recruiting"));
    }

    #[test]
    fn test_unknown_preset_leaves_state() {
        let mut eng = engine::<Member>();
        eng.set_facet("role", "captain").unwrap();
        let before = eng.state().clone();
        assert!(eng.apply_preset("recruiting").is_err());
        assert_eq!(eng.state(), &before);
        assert_eq!(eng.preset_status(), PresetStatus::Idle);
    }

    #[test]
    fn test_member_presets() {
        let records = load_fallback::<Member>().unwrap();
        let mut eng = member_engine();
        let cases = [
            // 7 has an unparseable join date and no activity, so it is never excluded by them
            ("new-users", vec!["4", "7"]),
            ("active-today", vec!["1", "4", "6", "7"]),
            ("inactive", vec!["5", "7", "8"]),
            ("no-team", vec!["3", "4", "6", "7"]),
            ("high-attendance", vec!["1", "6", "7"]),
            ("suspended", vec!["5"]),
        ];
        for (preset, expected) in cases {
            eng.apply_preset(preset).unwrap();
            assert_eq!(member_ids(&eng.filtered(&records)), expected, "{}", preset);
            assert_eq!(eng.preset_status(), PresetStatus::Active(preset));
        }
    }

    #[test]
    fn test_member_activity_facet() {
        let records = load_fallback::<Member>().unwrap();
        let mut eng = member_engine();
        eng.set_facet("activity", "recent").unwrap();
        // 2 was seen yesterday afternoon, within 24 hours
        assert_eq!(member_ids(&eng.filtered(&records)), vec!["1", "2", "4", "6", "7"]);

        eng.set_facet("activity", "week").unwrap();
        assert_eq!(member_ids(&eng.filtered(&records)), vec!["1", "2", "3", "4", "6", "7"]);

        assert!(eng.set_facet("activity", "dormant").is_err());

        let counts = eng.counts(&records);
        assert_eq!(counts.get("activity", "today"), 4);
        assert_eq!(counts.get("activity", "inactive"), 3);
    }

    #[test]
    fn test_member_flat_profile_stats_are_filtered() {
        let json = r#"[
            { "id": 1, "totalMatchesPlayed": 3, "attendanceRate": 40 },
            { "id": 2, "totalMatchesPlayed": 80, "attendanceRate": 95 }
        ]"#;
        let page: RecordPage<Member> = serde_json::from_str(json).unwrap();
        let records = page.into_records();
        let mut eng = member_engine();

        eng.set_facet("matchesPlayed", "veteran").unwrap();
        assert_eq!(member_ids(&eng.filtered(&records)), vec!["2"]);

        eng.apply_preset("high-attendance").unwrap();
        assert_eq!(member_ids(&eng.filtered(&records)), vec!["2"]);
    }

    #[test]
    fn test_direct_setters_change_state() {
        let records = teams();
        let mut eng = engine::<Team>();
        eng.apply_preset("active").unwrap();
        eng.set_date_range(DateRange::Custom);
        eng.set_date_to(NaiveDate::from_ymd_opt(2025, 10, 22));
        eng.set_search("rovers");

        assert_eq!(eng.state().date_range(), DateRange::Custom);
        assert_eq!(eng.state().search_query(), "rovers");
        assert_eq!(eng.preset_status(), PresetStatus::Active("active"));
        assert_eq!(ids(&eng.filtered(&records)), vec!["t2"]);

        eng.reset_all();
        assert_eq!(eng.state(), &FilterState::default());
    }

    #[test]
    fn test_reset_restores_full_set() {
        let records = teams();
        let mut eng = engine::<Team>();
        eng.apply_preset("active").unwrap();
        eng.set_search("mapo");
        eng.reset_all();

        let out = eng.snapshot(&records);
        assert_eq!(out.filtered.len(), records.len());
        assert_eq!(out.active_preset, None);
        for facet in Team::facets() {
            assert_eq!(out.counts.get(facet.id, ALL), records.len());
        }
        assert_eq!(eng.active_filter_count(), 0);
    }

    // ------------------------------------------------------------------
    // Counts
    // ------------------------------------------------------------------

    #[test]
    fn test_badges_ignore_current_selection() {
        let records = teams();
        let mut eng = engine::<Team>();
        let before = eng.counts(&records);
        eng.set_facet("status", "active").unwrap();
        let after = eng.snapshot(&records).counts;

        assert_eq!(before, after);
        assert_eq!(after.get("status", "inactive"), 1);
        assert_eq!(after.get("status", "active"), 2);
    }

    #[test]
    fn test_date_badges() {
        let records = teams();
        let counts = engine::<Team>().counts(&records);
        // t4 has no parseable date and counts everywhere
        assert_eq!(counts.get("foundedDate", "today"), 2);
        assert_eq!(counts.get("foundedDate", "yesterday"), 2);
        assert_eq!(counts.get("foundedDate", "last7Days"), 4);
        assert_eq!(counts.get("foundedDate", "all"), 4);
    }

    #[test]
    fn test_match_presets() {
        let records = vec![
            Match {
                id: "g1".to_string(),
                status: Some("completed".to_string()),
                match_date: Some("2025-10-24T10:00:00".to_string()),
                ..Match::default()
            },
            Match {
                id: "g2".to_string(),
                status: Some("scheduled".to_string()),
                match_date: Some("2025-10-25".to_string()),
                ..Match::default()
            },
        ];
        let mut eng = engine::<Match>();
        eng.apply_preset("completed-today").unwrap();
        let filtered = eng.filtered(&records);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "g1");
        assert_eq!(eng.active_filter_count(), 2);

        eng.apply_preset("tomorrow").unwrap();
        let filtered = eng.filtered(&records);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "g2");
    }
}
