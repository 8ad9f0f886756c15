//! Data models for the admin list screens.
//!
//! - `Member`: registered players, captains and referees
//! - `Team`: clubs with their season stats
//! - `Match`: scheduled and completed fixtures
//!
//! Every field a facet predicate reads is optional: backend payloads and the
//! bundled fallback data are both allowed to omit it, and a missing field
//! never excludes a record from a filter.

pub mod matches;
pub mod member;
pub mod region;
pub mod team;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

pub use matches::Match;
pub use member::{Member, MemberStats};
pub use team::{Captain, Team, TeamStats};

/// The three record kinds the dashboard lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Members,
    Teams,
    Matches,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Members, Domain::Teams, Domain::Matches];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Members => "members",
            Domain::Teams => "teams",
            Domain::Matches => "matches",
        }
    }

    /// REST path below the owning service's base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Domain::Members => "profiles",
            Domain::Teams => "teams",
            Domain::Matches => "matches",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "members" | "member" | "users" => Ok(Domain::Members),
            "teams" | "team" => Ok(Domain::Teams),
            "matches" | "match" => Ok(Domain::Matches),
            other => Err(format!("unknown domain '{}'", other)),
        }
    }
}

/// A list endpoint answers either with a Spring-style page or a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecordPage<T> {
    Paged { content: Vec<T> },
    Bare(Vec<T>),
}

impl<T> RecordPage<T> {
    pub fn into_records(self) -> Vec<T> {
        match self {
            RecordPage::Paged { content } => content,
            RecordPage::Bare(records) => records,
        }
    }
}

/// Backend ids arrive as numbers, fallback ids as strings.
pub(crate) fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(s)) => s,
        Some(RawId::Int(n)) => n.to_string(),
        Some(RawId::Float(n)) => n.to_string(),
        None => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_from_str() {
        assert_eq!("members".parse::<Domain>(), Ok(Domain::Members));
        assert_eq!("Teams".parse::<Domain>(), Ok(Domain::Teams));
        assert_eq!("match".parse::<Domain>(), Ok(Domain::Matches));
        assert!("venues".parse::<Domain>().is_err());
    }

    #[test]
    fn test_record_page_shapes() {
        let paged: RecordPage<u32> = serde_json::from_str(r#"{"content":[1,2],"totalElements":2}"#).unwrap();
        assert_eq!(paged.into_records(), vec![1, 2]);

        let bare: RecordPage<u32> = serde_json::from_str("[3]").unwrap();
        assert_eq!(bare.into_records(), vec![3]);
    }
}
