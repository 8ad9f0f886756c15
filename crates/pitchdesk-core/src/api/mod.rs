//! REST client for the user, team and recruit services.
//!
//! `ApiClient` fetches one page of records per call; `DataSource` in
//! `crate::source` decides whether those records are shown.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
