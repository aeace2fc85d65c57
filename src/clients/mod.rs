/// External API clients module
use crate::domain::{RequestParams, Rover};
use crate::errors::{QueryError, QueryResult};
use crate::utils::redact_api_key;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Imagery tile width in degrees
const EARTH_DIM: &str = "0.1";

/// HTTP client wrapper with common configuration
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("nasa-query/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }
}

/// Upstream calls behind the query dispatcher
#[async_trait]
pub trait SpaceDataApi: Send + Sync {
    /// Astronomy Picture of the Day
    async fn apod(&self, params: &RequestParams) -> QueryResult<Value>;

    /// Rover photos taken on the given earth date
    async fn mars_photos(&self, params: &RequestParams, rover: Rover) -> QueryResult<Value>;

    /// Landsat imagery asset near a coordinate
    async fn earth_assets(&self, params: &RequestParams, lat: &str, lon: &str)
        -> QueryResult<Value>;

    /// Near Earth Objects feed for a single day
    async fn neo_feed(&self, params: &RequestParams) -> QueryResult<Value>;

    /// DONKI solar flares
    async fn donki_flares(&self, params: &RequestParams) -> QueryResult<Value>;

    /// DONKI coronal mass ejections
    async fn donki_cmes(&self, params: &RequestParams) -> QueryResult<Value>;
}

/// NASA open APIs client (APOD, Mars photos, Earth, NeoWs, DONKI)
pub struct NasaClient {
    http_client: HttpClient,
    base_url: String,
    timeout_secs: u64,
}

impl NasaClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> reqwest::Result<Self> {
        Ok(Self {
            http_client: HttpClient::new(Duration::from_secs(timeout_secs))?,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> QueryResult<Value> {
        debug!("GET {}", path);
        let resp = self
            .http_client
            .get_client()
            .get(self.endpoint(path))
            .query(query)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!("{} returned HTTP {}", path, status);
            return Err(QueryError::Upstream {
                status: Some(status.as_u16()),
                message: format!("HTTP {} from {}", status, path),
                body: upstream_body(&text),
            });
        }

        let text = resp.text().await.map_err(|e| self.transport_error(e))?;
        if text.trim().is_empty() {
            // DONKI answers an empty window with an empty body
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| {
            QueryError::ShapeMismatch(format!("invalid JSON from {}: {}", path, e))
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> QueryError {
        if err.is_timeout() {
            return QueryError::Timeout(self.timeout_secs);
        }
        QueryError::Upstream {
            status: err.status().map(|s| s.as_u16()),
            message: redact_api_key(&err.to_string()),
            body: None,
        }
    }

    fn day_window(
        params: &RequestParams,
        start: &'static str,
        end: &'static str,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("api_key", params.api_key.clone()),
            (start, params.date_str()),
            (end, params.date_str()),
        ]
    }
}

#[async_trait]
impl SpaceDataApi for NasaClient {
    async fn apod(&self, params: &RequestParams) -> QueryResult<Value> {
        let query = [
            ("api_key", params.api_key.clone()),
            ("date", params.date_str()),
        ];
        self.get_json("/planetary/apod", &query).await
    }

    async fn mars_photos(&self, params: &RequestParams, rover: Rover) -> QueryResult<Value> {
        let path = format!("/mars-photos/api/v1/rovers/{}/photos", rover.api_name());
        let query = [
            ("api_key", params.api_key.clone()),
            ("earth_date", params.date_str()),
        ];
        self.get_json(&path, &query).await
    }

    async fn earth_assets(
        &self,
        params: &RequestParams,
        lat: &str,
        lon: &str,
    ) -> QueryResult<Value> {
        let query = [
            ("api_key", params.api_key.clone()),
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("dim", EARTH_DIM.to_string()),
            ("date", params.date_str()),
        ];
        self.get_json("/planetary/earth/assets", &query).await
    }

    async fn neo_feed(&self, params: &RequestParams) -> QueryResult<Value> {
        let query = Self::day_window(params, "start_date", "end_date");
        self.get_json("/neo/rest/v1/feed", &query).await
    }

    async fn donki_flares(&self, params: &RequestParams) -> QueryResult<Value> {
        let query = Self::day_window(params, "startDate", "endDate");
        self.get_json("/DONKI/FLR", &query).await
    }

    async fn donki_cmes(&self, params: &RequestParams) -> QueryResult<Value> {
        let query = Self::day_window(params, "startDate", "endDate");
        self.get_json("/DONKI/CME", &query).await
    }
}

/// Error body as JSON when it parses, raw text otherwise
fn upstream_body(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string())))
}
