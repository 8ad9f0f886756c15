use serde::{Deserialize, Serialize};

use crate::filter::facet::{eq_token, DateFacet, Facet, Filterable, Rule};
use crate::filter::{DateRange, Preset};

use super::region::{region_matches, REGION_TOKENS};
use super::{id_from_string_or_number, Domain};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    #[serde(default, deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub venue: Option<String>,
    pub region: Option<String>,
    #[serde(alias = "gameDate", alias = "date")]
    pub match_date: Option<String>,
    /// Local kick-off time, e.g. "19:30".
    pub kickoff: Option<String>,
    pub status: Option<String>,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
}

impl Match {
    /// "Home vs Away" with placeholders for unannounced sides.
    pub fn fixture(&self) -> String {
        format!(
            "{} vs {}",
            self.home_team.as_deref().unwrap_or("TBD"),
            self.away_team.as_deref().unwrap_or("TBD")
        )
    }

    pub fn score(&self) -> Option<String> {
        match (self.home_score, self.away_score) {
            (Some(h), Some(a)) => Some(format!("{}-{}", h, a)),
            _ => None,
        }
    }
}

fn by_status(m: &Match, value: &str) -> bool {
    eq_token(m.status.as_deref(), value)
}

fn by_region(m: &Match, value: &str) -> bool {
    region_matches(m.region.as_deref(), value)
}

static FACETS: [Facet<Match>; 2] = [
    Facet {
        id: "status",
        label: "Status",
        values: &["scheduled", "confirmed", "completed", "cancelled"],
        predicate: Rule::Field(by_status),
    },
    Facet {
        id: "region",
        label: "Region",
        values: &REGION_TOKENS,
        predicate: Rule::Field(by_region),
    },
];

static PRESETS: [Preset; 5] = [
    Preset::new("today", "Today").with_date_range(DateRange::Today),
    Preset::new("tomorrow", "Tomorrow").with_date_range(DateRange::Tomorrow),
    Preset::new("this-week", "This week").with_date_range(DateRange::ThisWeek),
    Preset::new("completed-today", "Completed today")
        .with_facets(&[("status", "completed")])
        .with_date_range(DateRange::Today),
    Preset::new("cancelled", "Cancelled").with_facets(&[("status", "cancelled")]),
];

impl Filterable for Match {
    const DOMAIN: Domain = Domain::Matches;

    fn facets() -> &'static [Facet<Self>] {
        &FACETS
    }

    fn presets() -> &'static [Preset] {
        &PRESETS
    }

    fn date_facet() -> DateFacet {
        DateFacet {
            id: "matchDate",
            label: "Match date",
        }
    }

    fn record_date(&self) -> Option<&str> {
        self.match_date.as_deref()
    }

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.id.as_str()),
            self.home_team.as_deref(),
            self.away_team.as_deref(),
            self.venue.as_deref(),
            self.region.as_deref(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_and_score() {
        let m = Match {
            home_team: Some("Gangnam United FC".to_string()),
            home_score: Some(2),
            away_score: Some(1),
            ..Match::default()
        };
        assert_eq!(m.fixture(), "Gangnam United FC vs TBD");
        assert_eq!(m.score().as_deref(), Some("2-1"));
        assert_eq!(Match::default().score(), None);
    }

    #[test]
    fn test_status_predicate() {
        let m = Match {
            status: Some("Completed".to_string()),
            ..Match::default()
        };
        assert!(by_status(&m, "completed"));
        assert!(!by_status(&m, "cancelled"));
        assert!(by_status(&Match::default(), "cancelled"));
    }

    #[test]
    fn test_region_accepts_korean_names() {
        let m = Match {
            region: Some("부산광역시".to_string()),
            ..Match::default()
        };
        assert!(by_region(&m, "busan"));
        assert!(!by_region(&m, "seoul"));
    }

    #[test]
    fn test_completed_today_preset_sets_both() {
        let preset = Match::preset("completed-today").unwrap();
        assert_eq!(preset.facets, &[("status", "completed")]);
        assert_eq!(preset.date_range, Some(DateRange::Today));
    }

    #[test]
    fn test_deserialize_game_date_alias() {
        let m: Match = serde_json::from_str(r#"{"id": 9, "gameDate": "2025-10-24T19:30:00"}"#).unwrap();
        assert_eq!(m.id, "9");
        assert_eq!(m.record_date(), Some("2025-10-24T19:30:00"));
    }
}
