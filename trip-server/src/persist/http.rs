//! HTTP persistence endpoint client.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::debug;

use crate::domain::Place;

use super::TripStore;
use super::error::PersistenceError;
use super::record::TripRecord;

/// Configuration for the HTTP trip store.
#[derive(Debug, Clone)]
pub struct HttpStoreConfig {
    /// Endpoint that accepts `POST` of a [`TripRecord`] and serves the last
    /// one on `GET`
    pub url: String,
    /// Optional bearer token
    pub token: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl HttpStoreConfig {
    /// Create a new config for the given endpoint.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
            timeout_secs: 30,
        }
    }

    /// Authenticate with a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Trip store backed by a remote HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpTripStore {
    http: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl HttpTripStore {
    /// Create a new HTTP store.
    pub fn new(config: HttpStoreConfig) -> Result<Self, PersistenceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
            token: config.token,
        })
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, &self.url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

impl TripStore for HttpTripStore {
    async fn save(&self, stops: &[Place]) -> Result<(), PersistenceError> {
        let record = TripRecord::now(stops);

        let response = self
            .request(reqwest::Method::POST)
            .json(&record)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PersistenceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        debug!(url = %self.url, stops = stops.len(), "Trip saved over HTTP");
        Ok(())
    }

    async fn load(&self) -> Result<Vec<Place>, PersistenceError> {
        let response = self.request(reqwest::Method::GET).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND || status == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PersistenceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let record: TripRecord =
            serde_json::from_str(&body).map_err(|e| PersistenceError::Json {
                message: e.to_string(),
            })?;

        Ok(record.places)
    }
}
