//! Core library for pitchdesk.
//!
//! Faceted filtering and quick presets for the members, teams and matches
//! screens of a sports-community admin dashboard, plus the record sources
//! that feed them.
//!
//! - `filter`: the generic engine (facets, presets, date windows, counts)
//! - `models`: record types and their facet tables
//! - `source`: live/fallback record switching
//! - `api`: REST client for the backend services
//! - `config`: persisted settings and environment overrides

pub mod api;
pub mod config;
pub mod filter;
pub mod models;
pub mod source;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use config::Config;
pub use filter::{
    Clock, DateRange, FacetCounts, FilterAction, FilterEngine, FilterError, FilterOutput,
    FilterState, Filterable, FixedClock, Preset, PresetStatus, SystemClock,
};
pub use models::{Domain, Match, Member, Team};
pub use source::{load_fallback, DataSource, SourceKind};
