use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::filter::facet::{
    band_tokens, eq_token, in_band, Band, DateFacet, Facet, Filterable, Rule,
};
use crate::filter::{DateRange, Preset};
use crate::utils::parse_timestamp;

use super::region::{region_matches, REGION_TOKENS};
use super::{id_from_string_or_number, Domain};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStats {
    pub matches_played: Option<u32>,
    pub win_rate: Option<f64>,
    /// Percentage of confirmed matches actually attended.
    pub attendance: Option<f64>,
    /// 0–5 scale.
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawMember")]
pub struct Member {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub join_date: Option<String>,
    pub last_active_at: Option<String>,
    pub region: Option<String>,
    pub status: Option<String>,
    pub role: Option<String>,
    pub stats: Option<MemberStats>,
    pub teams: Option<Vec<String>>,
}

impl Member {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }

    pub fn matches_played(&self) -> Option<u32> {
        self.stats.as_ref().and_then(|s| s.matches_played)
    }

    pub fn attendance(&self) -> Option<f64> {
        self.stats.as_ref().and_then(|s| s.attendance)
    }

    /// Last activity, if the timestamp parses.
    pub fn last_seen(&self) -> Option<NaiveDateTime> {
        self.last_active_at.as_deref().and_then(parse_timestamp)
    }
}

// ============================================================================
// Wire shape
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAccount {
    email: Option<String>,
}

/// Every spelling the profile service and the fallback data use.
///
/// The profile service sends flat stats (`totalMatchesPlayed`,
/// `attendanceRate`, `winRate`, `mannerTemperature`) and nests the email under
/// `account`. Fallback data uses the nested `stats` object. Flat values win.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMember {
    #[serde(default, deserialize_with = "id_from_string_or_number")]
    id: String,
    name: Option<String>,
    nickname: Option<String>,
    email: Option<String>,
    account: Option<RawAccount>,
    phone: Option<String>,
    phone_number: Option<String>,
    join_date: Option<String>,
    created_at: Option<String>,
    last_active_at: Option<String>,
    region: Option<String>,
    sub_region: Option<String>,
    location: Option<String>,
    status: Option<String>,
    account_status: Option<String>,
    role: Option<String>,
    stats: Option<MemberStats>,
    total_matches_played: Option<u32>,
    win_rate: Option<f64>,
    attendance_rate: Option<f64>,
    manner_temperature: Option<f64>,
    teams: Option<Vec<String>>,
}

/// Manner temperature (0–100) on the 0–5 rating scale, one decimal.
fn rating_from_temperature(temperature: f64) -> f64 {
    (temperature / 20.0 * 10.0).round() / 10.0
}

impl From<RawMember> for Member {
    fn from(raw: RawMember) -> Self {
        let nested = raw.stats.unwrap_or_default();
        let stats = MemberStats {
            matches_played: raw.total_matches_played.or(nested.matches_played),
            win_rate: raw.win_rate.or(nested.win_rate),
            attendance: raw.attendance_rate.or(nested.attendance),
            rating: raw
                .manner_temperature
                .map(rating_from_temperature)
                .or(nested.rating),
        };

        let region = match (raw.region, raw.sub_region) {
            (Some(region), Some(sub)) => Some(format!("{} {}", region, sub)),
            (region, _) => region.or(raw.location),
        };

        Self {
            id: raw.id,
            name: raw.name.or(raw.nickname),
            email: raw.email.or(raw.account.and_then(|a| a.email)),
            phone: raw.phone_number.or(raw.phone),
            join_date: raw.created_at.or(raw.join_date),
            last_active_at: raw.last_active_at,
            region,
            status: raw.status.or(raw.account_status),
            role: raw.role,
            stats: (stats != MemberStats::default()).then_some(stats),
            teams: raw.teams,
        }
    }
}

// ============================================================================
// Facets
// ============================================================================

const MATCHES_PLAYED_BANDS: [Band; 4] = [
    Band::new("none", f64::NEG_INFINITY, 1.0),
    Band::new("beginner", 1.0, 21.0),
    Band::new("intermediate", 21.0, 51.0),
    Band::new("veteran", 51.0, f64::INFINITY),
];
const MATCHES_PLAYED_VALUES: [&str; 4] = band_tokens(&MATCHES_PLAYED_BANDS);

const ATTENDANCE_BANDS: [Band; 3] = [
    Band::new("high", 90.0, f64::INFINITY),
    Band::new("medium", 70.0, 90.0),
    Band::new("low", f64::NEG_INFINITY, 70.0),
];
const ATTENDANCE_VALUES: [&str; 3] = band_tokens(&ATTENDANCE_BANDS);

fn by_status(m: &Member, value: &str) -> bool {
    eq_token(m.status.as_deref(), value)
}

fn by_role(m: &Member, value: &str) -> bool {
    eq_token(m.role.as_deref(), value)
}

fn by_region(m: &Member, value: &str) -> bool {
    region_matches(m.region.as_deref(), value)
}

fn by_matches_played(m: &Member, value: &str) -> bool {
    in_band(&MATCHES_PLAYED_BANDS, value, m.matches_played().map(f64::from))
}

fn by_attendance(m: &Member, value: &str) -> bool {
    in_band(&ATTENDANCE_BANDS, value, m.attendance())
}

/// `today`: seen since midnight. `recent`: within 24 hours. `week`: within
/// 7 days. `inactive`: not seen for 7 days or more.
fn by_activity(m: &Member, value: &str, now: NaiveDateTime) -> bool {
    let Some(seen) = m.last_seen() else {
        return true;
    };
    let idle = now - seen;
    match value {
        "today" => seen.date() >= now.date(),
        "recent" => idle < Duration::hours(24),
        "week" => idle < Duration::days(7),
        "inactive" => idle >= Duration::days(7),
        _ => true,
    }
}

fn by_team(m: &Member, value: &str) -> bool {
    let Some(teams) = m.teams.as_ref() else {
        return true;
    };
    match value {
        "has-team" => !teams.is_empty(),
        "no-team" => teams.is_empty(),
        _ => true,
    }
}

static FACETS: [Facet<Member>; 7] = [
    Facet {
        id: "status",
        label: "Status",
        values: &["active", "inactive", "suspended", "banned"],
        predicate: Rule::Field(by_status),
    },
    Facet {
        id: "role",
        label: "Role",
        values: &["player", "captain", "referee"],
        predicate: Rule::Field(by_role),
    },
    Facet {
        id: "region",
        label: "Region",
        values: &REGION_TOKENS,
        predicate: Rule::Field(by_region),
    },
    Facet {
        id: "activity",
        label: "Last active",
        values: &["today", "recent", "week", "inactive"],
        predicate: Rule::Elapsed(by_activity),
    },
    Facet {
        id: "matchesPlayed",
        label: "Matches played",
        values: &MATCHES_PLAYED_VALUES,
        predicate: Rule::Field(by_matches_played),
    },
    Facet {
        id: "attendance",
        label: "Attendance",
        values: &ATTENDANCE_VALUES,
        predicate: Rule::Field(by_attendance),
    },
    Facet {
        id: "team",
        label: "Team",
        values: &["has-team", "no-team"],
        predicate: Rule::Field(by_team),
    },
];

static PRESETS: [Preset; 6] = [
    Preset::new("new-users", "Joined today").with_date_range(DateRange::Today),
    Preset::new("active-today", "Active today").with_facets(&[("activity", "today")]),
    Preset::new("inactive", "Inactive").with_facets(&[("activity", "inactive")]),
    Preset::new("no-team", "Without a team").with_facets(&[("team", "no-team")]),
    Preset::new("high-attendance", "High attendance").with_facets(&[("attendance", "high")]),
    Preset::new("suspended", "Suspended").with_facets(&[("status", "suspended")]),
];

impl Filterable for Member {
    const DOMAIN: Domain = Domain::Members;

    fn facets() -> &'static [Facet<Self>] {
        &FACETS
    }

    fn presets() -> &'static [Preset] {
        &PRESETS
    }

    fn date_facet() -> DateFacet {
        DateFacet {
            id: "joinDate",
            label: "Joined",
        }
    }

    fn record_date(&self) -> Option<&str> {
        self.join_date.as_deref()
    }

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            self.name.as_deref(),
            self.email.as_deref(),
            self.phone.as_deref(),
            self.region.as_deref(),
            Some(self.id.as_str()),
        ]
    }
}
