//! Plain-text rendering of filter results.

use chrono::{NaiveDate, Utc};
use pitchdesk_core::filter::{Filterable, FilterOutput, ALL};
use pitchdesk_core::models::{Match, Member, Team};
use pitchdesk_core::utils::truncate_string;
use pitchdesk_core::{DataSource, DateRange, FacetCounts, FilterState};

/// One printable row of a list screen.
pub trait ListRow {
    const HEADER: &'static str;

    fn row(&self) -> String;
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or("-")
}

impl ListRow for Member {
    const HEADER: &'static str = "ID     NAME                 STATUS     ROLE      REGION               JOINED";

    fn row(&self) -> String {
        format!(
            "{:<6} {:<20} {:<10} {:<9} {:<20} {}",
            truncate_string(&self.id, 6),
            truncate_string(self.display_name(), 20),
            or_dash(self.status.as_deref()),
            or_dash(self.role.as_deref()),
            truncate_string(or_dash(self.region.as_deref()), 20),
            or_dash(self.join_date.as_deref()),
        )
    }
}

impl ListRow for Team {
    const HEADER: &'static str = "ID     NAME                 STATUS     REGION     MEMBERS  WIN%   FOUNDED";

    fn row(&self) -> String {
        format!(
            "{:<6} {:<20} {:<10} {:<10} {:<8} {:<6} {}",
            truncate_string(&self.id, 6),
            truncate_string(self.display_name(), 20),
            or_dash(self.status.as_deref()),
            or_dash(self.region.as_deref()),
            self.member_count().map_or_else(|| "-".to_string(), |n| n.to_string()),
            self.win_rate().map_or_else(|| "-".to_string(), |r| format!("{:.0}", r)),
            or_dash(self.founded_date.as_deref()),
        )
    }
}

impl ListRow for Match {
    const HEADER: &'static str = "ID     FIXTURE                                  STATUS     REGION     DATE";

    fn row(&self) -> String {
        let fixture = match self.score() {
            Some(score) => format!("{} ({})", self.fixture(), score),
            None => self.fixture(),
        };
        format!(
            "{:<6} {:<40} {:<10} {:<10} {} {}",
            truncate_string(&self.id, 6),
            truncate_string(&fixture, 40),
            or_dash(self.status.as_deref()),
            or_dash(self.region.as_deref()),
            or_dash(self.match_date.as_deref()),
            self.kickoff.as_deref().unwrap_or(""),
        )
    }
}

/// Facets, values and presets of one list.
pub fn print_catalog<R: Filterable>() {
    println!("{} facets:", R::DOMAIN);
    for facet in R::facets() {
        println!("  {:<14} {:<16} {}, {}", facet.id, facet.label, ALL, facet.values.join(", "));
    }
    let date = R::date_facet();
    let tokens: Vec<&str> = DateRange::RELATIVE.iter().map(|r| r.token()).collect();
    println!("  {:<14} {:<16} {}, custom", date.id, date.label, tokens.join(", "));

    println!();
    println!("{} presets:", R::DOMAIN);
    for preset in R::presets() {
        let mut parts: Vec<String> = preset
            .facets
            .iter()
            .map(|(facet, value)| format!("{}={}", facet, value))
            .collect();
        if let Some(range) = preset.date_range {
            parts.push(format!("{}={}", date.id, range));
        }
        println!("  {:<16} {:<20} {}", preset.id, preset.label, parts.join(" "));
    }
}

pub fn print_result<R: Filterable + ListRow>(
    output: &FilterOutput<'_, R>,
    source: &DataSource<R>,
    state: &FilterState,
) {
    let active_filters = state.active_filter_count();
    println!(
        "{}: {} of {} ({} data, {} active filter{})",
        R::DOMAIN,
        output.filtered.len(),
        source.records().len(),
        source.kind().as_str(),
        active_filters,
        if active_filters == 1 { "" } else { "s" }
    );
    let fetched = source
        .fetched_age(Utc::now())
        .map(|age| format!(", fetched {}", age))
        .unwrap_or_default();
    println!(
        "sources: {} live, {} fallback{}",
        source.live_len(),
        source.fallback_len(),
        fetched
    );
    println!("filters: {}", describe_filters::<R>(state));
    if let Some(ref preset) = output.active_preset {
        println!("preset: {}", preset);
    }
    println!();

    println!("{}", R::HEADER);
    for record in &output.filtered {
        println!("{}", record.row());
    }
    if output.filtered.is_empty() {
        println!("(no matching records)");
    }

    println!();
    print_counts(&output.counts);
}

/// One-line summary of what narrows the list, e.g. `status=active search="fc"`.
fn describe_filters<R: Filterable>(state: &FilterState) -> String {
    if state.is_unfiltered() {
        return "none".to_string();
    }

    let mut parts: Vec<String> = state
        .selections()
        .map(|(facet, value)| format!("{}={}", facet, value))
        .collect();

    let date_id = R::date_facet().id;
    match state.date_range() {
        DateRange::All => {}
        DateRange::Custom => {
            let bound = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
            parts.push(format!(
                "{}={}..{}",
                date_id,
                bound(state.date_from()),
                bound(state.date_to())
            ));
        }
        range => parts.push(format!("{}={}", date_id, range)),
    }

    let query = state.search_query().trim();
    if !query.is_empty() {
        parts.push(format!("search=\"{}\"", query));
    }
    parts.join(" ")
}

fn print_counts(counts: &FacetCounts) {
    for (facet, values) in counts.iter() {
        let badges: Vec<String> = values
            .iter()
            .map(|(value, n)| format!("{} {}", value, n))
            .collect();
        println!("{:<14} {}", facet, badges.join(" | "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchdesk_core::{FilterEngine, FixedClock};
    use std::sync::Arc;

    #[test]
    fn test_rows_tolerate_missing_fields() {
        assert!(Member::default().row().contains("(unnamed)"));
        assert!(Team::default().row().contains('-'));
        assert!(Match::default().row().contains("TBD vs TBD"));
    }

    #[test]
    fn test_match_row_shows_score() {
        let m = Match {
            id: "g1".to_string(),
            home_team: Some("Gangnam United FC".to_string()),
            away_team: Some("Hongdae Kickoff".to_string()),
            home_score: Some(3),
            away_score: Some(1),
            ..Match::default()
        };
        assert!(m.row().contains("Gangnam United FC vs Hongdae Kickoff (3-1)"));
    }

    #[test]
    fn test_describe_filters() {
        let today = NaiveDate::from_ymd_opt(2025, 10, 24).unwrap();
        let mut engine = FilterEngine::<Team>::new(Arc::new(FixedClock::on(today)));
        assert_eq!(describe_filters::<Team>(engine.state()), "none");

        engine.set_facet("status", "active").unwrap();
        engine.set_facet("region", "seoul").unwrap();
        engine.set_date_range(DateRange::Last30Days);
        engine.set_search(" rovers ");
        assert_eq!(
            describe_filters::<Team>(engine.state()),
            "region=seoul status=active foundedDate=last30Days search=\"rovers\""
        );

        engine.reset_all();
        engine.set_date_to(Some(today));
        assert_eq!(describe_filters::<Team>(engine.state()), "foundedDate=..2025-10-24");
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("  ")), "-");
        assert_eq!(or_dash(Some("seoul")), "seoul");
    }
}
