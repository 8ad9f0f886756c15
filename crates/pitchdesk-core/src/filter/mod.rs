//! Faceted filtering and quick presets for the admin list screens.
//!
//! - `facet`: facet tables and the `Filterable` record contract
//! - `state`: `FilterState` and its reducer
//! - `window`: relative date tokens, windows and clocks
//! - `evaluate`: the conjunctive record predicate
//! - `preset`: named, atomic facet assignments
//! - `counts`: badge counts over the unfiltered base set
//! - `engine`: `FilterEngine`, one per list screen

pub mod counts;
pub mod engine;
pub mod error;
pub mod evaluate;
pub mod facet;
pub mod preset;
pub mod state;
pub mod window;

pub use counts::{facet_counts, FacetCounts};
pub use engine::{FilterEngine, FilterOutput};
pub use error::FilterError;
pub use evaluate::{evaluate, Predicate};
pub use facet::{Band, DateFacet, Facet, Filterable, Rule, ALL};
pub use preset::{Preset, PresetStatus};
pub use state::{FilterAction, FilterState};
pub use window::{Clock, DateRange, DateWindow, FixedClock, SystemClock};
