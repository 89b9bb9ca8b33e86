//! # Core Configuration Module
//!
//! Provides configuration management for the media catalog core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `CatalogConfig` holding the injected bridges and the endpoint settings for
//! the remote media resource. `build()` validates everything up front so a
//! misconfigured catalog fails before the first request is sent.
//!
//! ## Dependencies
//!
//! - `HttpClient` - Required. With the `desktop-shims` feature a
//!   `ReqwestHttpClient` is injected automatically when none is provided.
//! - `Clock` - Optional, defaults to `SystemClock`.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{CatalogConfig, MetadataApiConfig};
//!
//! let config = CatalogConfig::builder()
//!     .api_base_url("http://localhost:3001")
//!     .collection("media")
//!     .metadata_api_config(
//!         MetadataApiConfig::new().with_tmdb_access_token(token),
//!     )
//!     .build()?;
//!
//! assert_eq!(config.collection_url(), "http://localhost:3001/media");
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use crate::logging::redact_if_sensitive;
use bridge_traits::{Clock, HttpClient, SystemClock};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default location of the media REST resource (a local json-server).
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001";

/// Default collection name under the base URL.
pub const DEFAULT_COLLECTION: &str = "media";

/// Default per-request timeout handed to the desktop HTTP client.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Core configuration for the media catalog.
///
/// Use [`CatalogConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CatalogConfig {
    /// Base URL of the remote store, without trailing slash
    pub api_base_url: String,

    /// Collection path segment (`GET {base}/{collection}`)
    pub collection: String,

    /// Transport used for every remote call
    pub http_client: Arc<dyn HttpClient>,

    /// Time source used to stamp `dateAdded`
    pub clock: Arc<dyn Clock>,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Capacity of the event bus channel
    pub event_buffer_size: usize,

    /// Third-party search API configuration
    pub metadata_api_config: MetadataApiConfig,
}

impl fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("api_base_url", &self.api_base_url)
            .field("collection", &self.collection)
            .field("http_client", &"HttpClient { ... }")
            .field("clock", &"Clock { ... }")
            .field("request_timeout", &self.request_timeout)
            .field("event_buffer_size", &self.event_buffer_size)
            .field("metadata_api_config", &self.metadata_api_config)
            .finish()
    }
}

impl CatalogConfig {
    /// Creates a new builder for constructing a `CatalogConfig`.
    pub fn builder() -> CatalogConfigBuilder {
        CatalogConfigBuilder::default()
    }

    /// URL of the whole collection.
    pub fn collection_url(&self) -> String {
        format!("{}/{}", self.api_base_url, self.collection)
    }

    /// URL of a single record.
    pub fn item_url(&self, id: impl fmt::Display) -> String {
        // Ids are opaque; anything outside the unreserved set is escaped
        let id = id.to_string();
        format!("{}/{}", self.collection_url(), urlencoding::encode(&id))
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(Error::Config("API base URL cannot be empty".to_string()));
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(Error::Config(format!(
                "API base URL must start with http:// or https://, got '{}'",
                self.api_base_url
            )));
        }

        if self.collection.is_empty() || self.collection.contains('/') {
            return Err(Error::Config(
                "Collection must be a single non-empty path segment".to_string(),
            ));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        self.metadata_api_config.validate()
    }
}

/// Configuration for the third-party search collaborators.
///
/// API keys should never be hardcoded in the binary. Load them from the
/// environment or the host's secure configuration and inject them here.
#[derive(Clone, PartialEq, Eq)]
pub struct MetadataApiConfig {
    /// TMDB v4 read access token (bearer auth)
    pub tmdb_access_token: Option<String>,

    /// Google Books API key
    pub google_books_api_key: Option<String>,

    /// Language passed to TMDB (e.g. "uk-UA")
    pub language: String,

    /// Maximum number of Google Books results per search
    pub max_results: u32,
}

impl fmt::Debug for MetadataApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataApiConfig")
            .field(
                "tmdb_access_token",
                &self
                    .tmdb_access_token
                    .as_deref()
                    .map(|t| redact_if_sensitive("access_token", t)),
            )
            .field(
                "google_books_api_key",
                &self
                    .google_books_api_key
                    .as_deref()
                    .map(|k| redact_if_sensitive("api_key", k)),
            )
            .field("language", &self.language)
            .field("max_results", &self.max_results)
            .finish()
    }
}

impl Default for MetadataApiConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataApiConfig {
    /// Creates a new MetadataApiConfig with no API keys configured
    pub fn new() -> Self {
        Self {
            tmdb_access_token: None,
            google_books_api_key: None,
            language: "uk-UA".to_string(),
            max_results: 20,
        }
    }

    pub fn with_tmdb_access_token(mut self, token: impl Into<String>) -> Self {
        self.tmdb_access_token = Some(token.into());
        self
    }

    pub fn with_google_books_api_key(mut self, key: impl Into<String>) -> Self {
        self.google_books_api_key = Some(key.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(ref token) = self.tmdb_access_token {
            if token.trim().is_empty() {
                return Err(Error::Config("TMDB access token cannot be blank".to_string()));
            }
        }

        if let Some(ref key) = self.google_books_api_key {
            if key.trim().is_empty() {
                return Err(Error::Config(
                    "Google Books API key cannot be blank".to_string(),
                ));
            }
        }

        if self.language.trim().is_empty() {
            return Err(Error::Config("Search language cannot be empty".to_string()));
        }

        if self.max_results == 0 || self.max_results > 40 {
            return Err(Error::Config(
                "Google Books max results must be between 1 and 40".to_string(),
            ));
        }

        Ok(())
    }

    pub fn has_tmdb(&self) -> bool {
        self.tmdb_access_token.is_some()
    }

    pub fn has_google_books(&self) -> bool {
        self.google_books_api_key.is_some()
    }
}

/// Builder for [`CatalogConfig`].
#[derive(Default)]
pub struct CatalogConfigBuilder {
    api_base_url: Option<String>,
    collection: Option<String>,
    http_client: Option<Arc<dyn HttpClient>>,
    clock: Option<Arc<dyn Clock>>,
    request_timeout: Option<Duration>,
    event_buffer_size: Option<usize>,
    metadata_api_config: Option<MetadataApiConfig>,
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::with_timeout(timeout).map_err(|e| Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: e.to_string(),
    })?;
    let client: Arc<dyn HttpClient> = Arc::new(client);
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    Err(Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "No HTTP client implementation provided. \
                  Desktop: enable the 'desktop-shims' feature to use ReqwestHttpClient. \
                  Other hosts: inject a platform-native adapter with .http_client()."
            .to_string(),
    })
}

impl CatalogConfigBuilder {
    /// Sets the base URL of the remote store. A trailing slash is dropped.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.api_base_url = Some(url.trim_end_matches('/').to_string());
        self
    }

    /// Sets the collection path segment.
    ///
    /// Default: `media`
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Injects the HTTP transport.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Injects the time source.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the per-request timeout.
    ///
    /// Default: 30 seconds
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the event bus capacity.
    ///
    /// Default: 100
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    pub fn metadata_api_config(mut self, config: MetadataApiConfig) -> Self {
        self.metadata_api_config = Some(config);
        self
    }

    /// Builds the final `CatalogConfig` instance.
    ///
    /// # Errors
    ///
    /// - `CapabilityMissing` when no `HttpClient` is injected and the
    ///   `desktop-shims` feature is off
    /// - `Config` when any value fails validation
    pub fn build(self) -> Result<CatalogConfig> {
        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(request_timeout)?,
        };

        let config = CatalogConfig {
            api_base_url: self
                .api_base_url
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            collection: self
                .collection
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            http_client,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            request_timeout,
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            metadata_api_config: self.metadata_api_config.unwrap_or_default(),
        };

        config.validate()?;

        Ok(config)
    }
}
