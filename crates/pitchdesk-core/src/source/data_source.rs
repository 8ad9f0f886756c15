use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::filter::Filterable;

/// Which array `DataSource::records` is currently serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Live,
    Fallback,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Live => "live",
            SourceKind::Fallback => "fallback",
        }
    }
}

/// Live and fallback records for one list screen.
///
/// Live records are served only while the toggle is on and at least one live
/// record exists. Flipping the toggle never touches filter state.
#[derive(Debug, Clone)]
pub struct DataSource<R> {
    live: Vec<R>,
    fallback: Vec<R>,
    use_live: bool,
    loading: bool,
    last_error: Option<String>,
    fetched_at: Option<DateTime<Utc>>,
}

impl<R: Filterable> DataSource<R> {
    pub fn new(fallback: Vec<R>) -> Self {
        Self {
            live: Vec::new(),
            fallback,
            use_live: false,
            loading: false,
            last_error: None,
            fetched_at: None,
        }
    }

    /// The slice the filter engine should work on right now.
    pub fn records(&self) -> &[R] {
        match self.kind() {
            SourceKind::Live => &self.live,
            SourceKind::Fallback => &self.fallback,
        }
    }

    pub fn kind(&self) -> SourceKind {
        if self.use_live && !self.live.is_empty() {
            SourceKind::Live
        } else {
            SourceKind::Fallback
        }
    }

    pub fn use_live(&self) -> bool {
        self.use_live
    }

    pub fn set_use_live(&mut self, on: bool) {
        self.use_live = on;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn live_len(&self) -> usize {
        self.live.len()
    }

    pub fn fallback_len(&self) -> usize {
        self.fallback.len()
    }

    /// Mark a fetch as in flight and clear the previous error.
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.last_error = None;
    }

    /// Record the outcome of a fetch started with `begin_load`.
    ///
    /// A non-empty result switches the toggle on. A failure keeps whatever
    /// live records were already held and serves them as before.
    pub fn finish_load(&mut self, result: anyhow::Result<Vec<R>>) {
        self.loading = false;
        match result {
            Ok(records) => {
                debug!(domain = R::DOMAIN.as_str(), count = records.len(), "Live records loaded");
                self.fetched_at = Some(Utc::now());
                if !records.is_empty() {
                    self.use_live = true;
                }
                self.live = records;
            }
            Err(e) => {
                warn!(domain = R::DOMAIN.as_str(), error = %e, "Failed to fetch live records");
                self.last_error = Some(format!("{:#}", e));
            }
        }
    }

    /// Fetch one page from the backend and fold the result in.
    pub async fn refresh(&mut self, client: &ApiClient, page: u32, size: u32)
    where
        R: DeserializeOwned,
    {
        self.begin_load();
        let result = client.fetch_records::<R>(page, size).await;
        self.finish_load(result);
    }

    /// Human-readable age of the last successful fetch, e.g. "5m ago".
    pub fn fetched_age(&self, now: DateTime<Utc>) -> Option<String> {
        self.fetched_at.map(|at| age_display((now - at).num_minutes()))
    }
}

fn age_display(minutes: i64) -> String {
    if minutes < 1 {
        // Clock skew lands here too
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}
