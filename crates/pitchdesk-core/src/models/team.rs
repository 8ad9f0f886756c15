use serde::{Deserialize, Serialize};

use crate::filter::facet::{
    band_tokens, eq_token, in_band, Band, DateFacet, Facet, Filterable, Rule,
};
use crate::filter::{DateRange, Preset};

use super::region::{region_matches, REGION_TOKENS};
use super::{id_from_string_or_number, Domain};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub total_matches: Option<u32>,
    pub wins: Option<u32>,
    pub draws: Option<u32>,
    pub losses: Option<u32>,
    /// Percentage, 0–100.
    pub win_rate: Option<f64>,
    pub total_members: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Captain {
    #[serde(default, deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(default, deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(alias = "teamName")]
    pub name: Option<String>,
    pub region: Option<String>,
    #[serde(alias = "subregion")]
    pub sub_region: Option<String>,
    #[serde(alias = "createdAt")]
    pub founded_date: Option<String>,
    pub home_ground: Option<String>,
    #[serde(alias = "skillLevel")]
    pub team_level: Option<String>,
    pub status: Option<String>,
    pub verified: Option<bool>,
    pub stats: Option<TeamStats>,
    /// Roster cap; stands in for the member count when stats are absent.
    pub max_members: Option<u32>,
    pub captain: Option<Captain>,
}

impl Team {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }

    pub fn member_count(&self) -> Option<u32> {
        self.stats
            .as_ref()
            .and_then(|s| s.total_members)
            .or(self.max_members)
    }

    pub fn matches_played(&self) -> Option<u32> {
        self.stats.as_ref().and_then(|s| s.total_matches)
    }

    pub fn win_rate(&self) -> Option<f64> {
        self.stats.as_ref().and_then(|s| s.win_rate)
    }
}

// ============================================================================
// Facets
// ============================================================================

const MEMBER_COUNT_BANDS: [Band; 3] = [
    Band::new("low", f64::NEG_INFINITY, 11.0),
    Band::new("medium", 11.0, 19.0),
    Band::new("high", 19.0, f64::INFINITY),
];
const MEMBER_COUNT_VALUES: [&str; 3] = band_tokens(&MEMBER_COUNT_BANDS);

const MATCHES_PLAYED_BANDS: [Band; 4] = [
    Band::new("none", f64::NEG_INFINITY, 1.0),
    Band::new("beginner", 1.0, 21.0),
    Band::new("intermediate", 21.0, 41.0),
    Band::new("veteran", 41.0, f64::INFINITY),
];
const MATCHES_PLAYED_VALUES: [&str; 4] = band_tokens(&MATCHES_PLAYED_BANDS);

const WIN_RATE_BANDS: [Band; 3] = [
    Band::new("high", 60.0, f64::INFINITY),
    Band::new("medium", 40.0, 60.0),
    Band::new("low", f64::NEG_INFINITY, 40.0),
];
const WIN_RATE_VALUES: [&str; 3] = band_tokens(&WIN_RATE_BANDS);

fn by_status(t: &Team, value: &str) -> bool {
    eq_token(t.status.as_deref(), value)
}

fn by_region(t: &Team, value: &str) -> bool {
    region_matches(t.region.as_deref(), value)
}

fn by_member_count(t: &Team, value: &str) -> bool {
    in_band(&MEMBER_COUNT_BANDS, value, t.member_count().map(f64::from))
}

fn by_matches_played(t: &Team, value: &str) -> bool {
    in_band(&MATCHES_PLAYED_BANDS, value, t.matches_played().map(f64::from))
}

fn by_win_rate(t: &Team, value: &str) -> bool {
    in_band(&WIN_RATE_BANDS, value, t.win_rate())
}

fn by_level(t: &Team, value: &str) -> bool {
    eq_token(t.team_level.as_deref(), value)
}

fn by_verified(t: &Team, value: &str) -> bool {
    let Some(verified) = t.verified else {
        return true;
    };
    match value {
        "verified" => verified,
        "unverified" => !verified,
        _ => true,
    }
}

static FACETS: [Facet<Team>; 7] = [
    Facet {
        id: "status",
        label: "Status",
        values: &["active", "inactive", "disbanded"],
        predicate: Rule::Field(by_status),
    },
    Facet {
        id: "region",
        label: "Region",
        values: &REGION_TOKENS,
        predicate: Rule::Field(by_region),
    },
    Facet {
        id: "memberCount",
        label: "Members",
        values: &MEMBER_COUNT_VALUES,
        predicate: Rule::Field(by_member_count),
    },
    Facet {
        id: "matchesPlayed",
        label: "Matches played",
        values: &MATCHES_PLAYED_VALUES,
        predicate: Rule::Field(by_matches_played),
    },
    Facet {
        id: "winRate",
        label: "Win rate",
        values: &WIN_RATE_VALUES,
        predicate: Rule::Field(by_win_rate),
    },
    Facet {
        id: "level",
        label: "Level",
        values: &["beginner", "intermediate", "advanced"],
        predicate: Rule::Field(by_level),
    },
    Facet {
        id: "verified",
        label: "Verification",
        values: &["verified", "unverified"],
        predicate: Rule::Field(by_verified),
    },
];

static PRESETS: [Preset; 6] = [
    Preset::new("new-teams", "Founded this month").with_date_range(DateRange::Last30Days),
    Preset::new("active", "Active").with_facets(&[("status", "active"), ("matchesPlayed", "intermediate")]),
    Preset::new("recruiting", "Recruiting").with_facets(&[("memberCount", "low"), ("status", "active")]),
    Preset::new("high-winrate", "High win rate").with_facets(&[("winRate", "high")]),
    Preset::new("inactive", "Inactive").with_facets(&[("status", "inactive")]),
    Preset::new("verified", "Verified").with_facets(&[("verified", "verified")]),
];

impl Filterable for Team {
    const DOMAIN: Domain = Domain::Teams;

    fn facets() -> &'static [Facet<Self>] {
        &FACETS
    }

    fn presets() -> &'static [Preset] {
        &PRESETS
    }

    fn date_facet() -> DateFacet {
        DateFacet {
            id: "foundedDate",
            label: "Founded",
        }
    }

    fn record_date(&self) -> Option<&str> {
        self.founded_date.as_deref()
    }

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            self.name.as_deref(),
            self.region.as_deref(),
            self.sub_region.as_deref(),
            self.home_ground.as_deref(),
            Some(self.id.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team_with_members(id: &str, members: u32) -> Team {
        Team {
            id: id.to_string(),
            name: Some(format!("Team {}", id)),
            stats: Some(TeamStats {
                total_members: Some(members),
                ..TeamStats::default()
            }),
            ..Team::default()
        }
    }

    #[test]
    fn test_member_count_buckets() {
        assert!(by_member_count(&team_with_members("a", 8), "low"));
        assert!(by_member_count(&team_with_members("a", 10), "low"));
        assert!(!by_member_count(&team_with_members("a", 11), "low"));
        assert!(by_member_count(&team_with_members("a", 11), "medium"));
        assert!(by_member_count(&team_with_members("a", 18), "medium"));
        assert!(!by_member_count(&team_with_members("a", 19), "medium"));
        assert!(by_member_count(&team_with_members("a", 22), "high"));
    }

    #[test]
    fn test_member_count_falls_back_to_roster_cap() {
        let team = Team {
            max_members: Some(25),
            ..Team::default()
        };
        assert_eq!(team.member_count(), Some(25));
        assert!(by_member_count(&team, "high"));
        assert!(!by_member_count(&team, "low"));
    }

    #[test]
    fn test_win_rate_buckets() {
        let mut team = Team::default();
        team.stats = Some(TeamStats {
            win_rate: Some(59.9),
            ..TeamStats::default()
        });
        assert!(by_win_rate(&team, "medium"));
        assert!(!by_win_rate(&team, "high"));
    }

    #[test]
    fn test_verified() {
        let mut team = Team::default();
        assert!(by_verified(&team, "verified"));
        assert!(by_verified(&team, "unverified"));
        team.verified = Some(true);
        assert!(by_verified(&team, "verified"));
        assert!(!by_verified(&team, "unverified"));
    }

    #[test]
    fn test_level_matches_backend_casing() {
        let team = Team {
            team_level: Some("INTERMEDIATE".to_string()),
            ..Team::default()
        };
        assert!(by_level(&team, "intermediate"));
        assert!(!by_level(&team, "advanced"));
    }

    #[test]
    fn test_korean_region_matches_token() {
        let team = Team {
            region: Some("서울".to_string()),
            sub_region: Some("서초구".to_string()),
            ..Team::default()
        };
        assert!(by_region(&team, "seoul"));
        assert!(!by_region(&team, "incheon"));
    }

    #[test]
    fn test_deserialize_backend_team() {
        let json = r#"{
            "id": 7,
            "teamName": "Seocho United",
            "subregion": "Seocho-gu",
            "createdAt": "2025-09-01T10:00:00Z",
            "skillLevel": "ADVANCED",
            "maxMembers": 14,
            "captain": { "id": 3, "name": "Park" }
        }"#;
        let team: Team = serde_json::from_str(json).unwrap();
        assert_eq!(team.id, "7");
        assert_eq!(team.display_name(), "Seocho United");
        assert_eq!(team.sub_region.as_deref(), Some("Seocho-gu"));
        assert_eq!(team.member_count(), Some(14));
        assert_eq!(team.captain.map(|c| c.id), Some("3".to_string()));
    }
}
