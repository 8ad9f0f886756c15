//! API client for the dashboard's backend services.
//!
//! Members come from the user service, teams from the team service and
//! matches from the recruit service. Each list endpoint takes `page` and
//! `size` query parameters and answers with either a page object or a bare
//! array.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::filter::Filterable;
use crate::models::{Domain, RecordPage};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: Config,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// List URL for one page of `domain` records.
    pub fn records_url(&self, domain: Domain, page: u32, size: u32) -> String {
        format!(
            "{}/{}?page={}&size={}",
            self.config.service_url(domain).trim_end_matches('/'),
            domain.endpoint(),
            page,
            size
        )
    }

    /// Fetch one page of records of kind `R`.
    pub async fn fetch_records<R>(&self, page: u32, size: u32) -> Result<Vec<R>>
    where
        R: Filterable + DeserializeOwned,
    {
        let url = self.records_url(R::DOMAIN, page, size);
        let body: RecordPage<R> = self.get(&url).await?;
        let records = body.into_records();
        debug!(domain = R::DOMAIN.as_str(), count = records.len(), "Fetched records");
        Ok(records)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        if let Some(ref token) = self.config.api_token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(response: reqwest::Response) -> Result<Option<reqwest::Response>> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .get(url)
                .headers(self.auth_headers()?)
                .send()
                .await
                .map_err(ApiError::from)
                .with_context(|| format!("Failed to send GET request to {}", url))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    let text = response
                        .text()
                        .await
                        .map_err(ApiError::from)
                        .with_context(|| format!("Failed to read response from {}", url))?;
                    return serde_json::from_str(&text)
                        .map_err(|e| ApiError::InvalidResponse(e.to_string()))
                        .with_context(|| format!("Failed to parse JSON response from {}", url));
                }
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(url = url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Team;

    fn client() -> ApiClient {
        let config = Config {
            team_service_url: "https://teams.example.com/api/".to_string(),
            ..Config::default()
        };
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_records_url_per_domain() {
        let api = client();
        assert_eq!(
            api.records_url(Domain::Members, 0, 100),
            "http://localhost:8082/api/profiles?page=0&size=100"
        );
        assert_eq!(
            api.records_url(Domain::Teams, 2, 50),
            "https://teams.example.com/api/teams?page=2&size=50"
        );
        assert_eq!(
            api.records_url(Domain::Matches, 0, 10),
            "http://localhost:8084/api/matches?page=0&size=10"
        );
    }

    #[test]
    fn test_auth_headers() {
        let api = client();
        assert!(api.auth_headers().unwrap().get(header::AUTHORIZATION).is_none());

        let config = Config {
            api_token: Some("abc".to_string()),
            ..Config::default()
        };
        let api = ApiClient::new(&config).unwrap();
        assert_eq!(
            api.auth_headers().unwrap().get(header::AUTHORIZATION).unwrap(),
            "Bearer abc"
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_is_an_error() {
        let config = Config {
            team_service_url: "http://127.0.0.1:9/api".to_string(),
            ..Config::default()
        };
        let api = ApiClient::new(&config).unwrap();
        let err = api.fetch_records::<Team>(0, 10).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::NetworkError(_))));
        assert!(format!("{:#}", err).contains("127.0.0.1:9"));
    }
}
