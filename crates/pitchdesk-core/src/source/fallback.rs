//! Bundled fallback datasets.
//!
//! One JSON array per record kind is compiled into the crate so every list
//! screen has something to show before (or without) the backend.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::filter::Filterable;
use crate::models::{Domain, RecordPage};

const MEMBERS_JSON: &str = include_str!("../../data/members.json");
const TEAMS_JSON: &str = include_str!("../../data/teams.json");
const MATCHES_JSON: &str = include_str!("../../data/matches.json");

fn bundled(domain: Domain) -> &'static str {
    match domain {
        Domain::Members => MEMBERS_JSON,
        Domain::Teams => TEAMS_JSON,
        Domain::Matches => MATCHES_JSON,
    }
}

/// The bundled fallback records of kind `R`.
pub fn load_fallback<R>() -> Result<Vec<R>>
where
    R: Filterable + DeserializeOwned,
{
    let records = parse::<R>(bundled(R::DOMAIN))
        .with_context(|| format!("Failed to parse bundled {} data", R::DOMAIN))?;
    debug!(domain = R::DOMAIN.as_str(), count = records.len(), "Loaded bundled fallback data");
    Ok(records)
}

/// Fallback records of kind `R` from `<dir>/<domain>.json`.
pub fn load_from_dir<R>(dir: &Path) -> Result<Vec<R>>
where
    R: Filterable + DeserializeOwned,
{
    let path = dir.join(format!("{}.json", R::DOMAIN));
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read fallback data from {}", path.display()))?;
    let records = parse::<R>(&contents)
        .with_context(|| format!("Failed to parse fallback data at {}", path.display()))?;
    debug!(path = %path.display(), count = records.len(), "Loaded fallback data");
    Ok(records)
}

fn parse<R: DeserializeOwned>(json: &str) -> Result<Vec<R>> {
    let page: RecordPage<R> = serde_json::from_str(json)?;
    Ok(page.into_records())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Match, Member, Team};

    #[test]
    fn test_bundled_data_parses() {
        assert!(!load_fallback::<Member>().unwrap().is_empty());
        assert!(!load_fallback::<Team>().unwrap().is_empty());
        assert!(!load_fallback::<Match>().unwrap().is_empty());
    }

    #[test]
    fn test_bundled_ids_are_unique() {
        let teams = load_fallback::<Team>().unwrap();
        let mut ids: Vec<&str> = teams.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), teams.len());
    }

    #[test]
    fn test_load_from_missing_dir_fails() {
        let err = load_from_dir::<Team>(Path::new("/nonexistent/pitchdesk")).unwrap_err();
        assert!(format!("{:#}", err).contains("teams.json"));
    }
}
