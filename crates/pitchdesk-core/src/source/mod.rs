//! Record sources for the list screens.
//!
//! A list screen shows either live records fetched from the backend or the
//! bundled fallback dataset. `DataSource` owns both arrays and the toggle that
//! picks between them; the filter engine only ever sees the current slice.

pub mod data_source;
pub mod fallback;

pub use data_source::{DataSource, SourceKind};
pub use fallback::{load_fallback, load_from_dir};
