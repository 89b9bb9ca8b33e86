//! Sync Gateway
//!
//! The only place that talks to the remote media resource. It turns local
//! intents into REST calls:
//!
//! | Operation    | Request                 | Success body                  |
//! |--------------|-------------------------|-------------------------------|
//! | `fetch_all`  | `GET {collection}`      | JSON array of records         |
//! | `create`     | `POST {collection}`     | stored record with its `id`   |
//! | `update`     | `PATCH {collection}/id` | updated record                |
//! | `delete`     | `DELETE {collection}/id`| ignored                       |
//!
//! Mutations are never retried automatically and never touch local state;
//! the caller applies the confirmed result to the record store.

use crate::error::{Result, SyncError};
use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
use core_library::models::decode_records;
use core_library::{MediaId, MediaPatch, MediaRecord, NewMediaRecord};
use core_runtime::config::CatalogConfig;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Outcome of loading the collection.
///
/// Loading never fails outright: on error `records` is empty and `error`
/// says why, so the view can still be derived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchResult {
    pub records: Vec<MediaRecord>,
    pub error: Option<SyncError>,
}

impl FetchResult {
    fn failed(error: SyncError) -> Self {
        Self {
            records: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[async_trait]
pub trait MediaGateway: Send + Sync {
    /// Load the whole collection.
    async fn fetch_all(&self) -> FetchResult;

    /// Store a new record and return it with its server-assigned id.
    async fn create(&self, record: &NewMediaRecord) -> Result<MediaRecord>;

    /// Apply a partial update and return the fields the server now holds.
    async fn update(&self, id: &MediaId, patch: &MediaPatch) -> Result<Map<String, Value>>;

    async fn delete(&self, id: &MediaId) -> Result<()>;
}

/// REST implementation of [`MediaGateway`] over the injected [`HttpClient`].
pub struct HttpMediaGateway {
    http_client: Arc<dyn HttpClient>,
    config: CatalogConfig,
}

impl HttpMediaGateway {
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            http_client: Arc::clone(&config.http_client),
            config: config.clone(),
        }
    }

    fn timeout(&self) -> Duration {
        self.config.request_timeout
    }

    /// Send one request and classify the outcome.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = request.method;
        let url = request.url.clone();

        let response = self
            .http_client
            .execute_with_retry(request.timeout(self.timeout()), RetryPolicy::no_retry())
            .await
            .map_err(|e| {
                warn!(method = method.as_str(), url = %url, error = %e, "Media request failed");
                SyncError::from(e)
            })?;

        if !response.is_success() {
            let body = response.text().unwrap_or_default();
            warn!(
                method = method.as_str(),
                url = %url,
                status = response.status,
                "Media request rejected"
            );
            return Err(SyncError::RemoteRejected {
                status: response.status,
                body,
            });
        }

        debug!(method = method.as_str(), url = %url, status = response.status, "Media request ok");
        Ok(response)
    }

    fn parse_body(response: &HttpResponse) -> Result<Value> {
        serde_json::from_slice(&response.body)
            .map_err(|e| SyncError::MalformedResponse(format!("invalid JSON body: {}", e)))
    }

    fn json_request<T: serde::Serialize>(
        method: HttpMethod,
        url: String,
        body: &T,
    ) -> Result<HttpRequest> {
        HttpRequest::new(method, url)
            .header("Accept", "application/json")
            .json(body)
            .map_err(|e| SyncError::validation("body", e.to_string()))
    }
}

#[async_trait]
impl MediaGateway for HttpMediaGateway {
    #[instrument(skip_all)]
    async fn fetch_all(&self) -> FetchResult {
        let request = HttpRequest::new(HttpMethod::Get, self.config.collection_url())
            .header("Accept", "application/json");

        let response = match self.send(request).await {
            Ok(response) => response,
            Err(e) => return FetchResult::failed(e),
        };

        match Self::parse_body(&response) {
            Ok(Value::Array(items)) => {
                let total = items.len();
                let records = decode_records(items);
                info!(loaded = records.len(), skipped = total - records.len(), "Fetched media collection");
                FetchResult {
                    records,
                    error: None,
                }
            }
            Ok(_) => {
                warn!("Media collection is not a JSON array; treating as empty");
                FetchResult::failed(SyncError::MalformedResponse(
                    "expected a JSON array of records".to_string(),
                ))
            }
            Err(e) => {
                warn!(error = %e, "Media collection body unreadable; treating as empty");
                FetchResult::failed(e)
            }
        }
    }

    #[instrument(skip_all, fields(title = %record.title))]
    async fn create(&self, record: &NewMediaRecord) -> Result<MediaRecord> {
        let request = Self::json_request(HttpMethod::Post, self.config.collection_url(), record)?;
        let response = self.send(request).await?;

        let stored: MediaRecord = serde_json::from_value(Self::parse_body(&response)?)
            .map_err(|e| SyncError::MalformedResponse(format!("created record: {}", e)))?;

        info!(id = %stored.id, "Created media record");
        Ok(stored)
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn update(&self, id: &MediaId, patch: &MediaPatch) -> Result<Map<String, Value>> {
        let request = Self::json_request(HttpMethod::Patch, self.config.item_url(id), patch)?;
        let response = self.send(request).await?;

        match Self::parse_body(&response)? {
            Value::Object(fields) => {
                info!(fields = ?patch.field_names(), "Updated media record");
                Ok(fields)
            }
            _ => Err(SyncError::MalformedResponse(
                "expected the updated record as a JSON object".to_string(),
            )),
        }
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn delete(&self, id: &MediaId) -> Result<()> {
        let request = HttpRequest::new(HttpMethod::Delete, self.config.item_url(id));
        self.send(request).await?;
        info!("Deleted media record");
        Ok(())
    }
}
