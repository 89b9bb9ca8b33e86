//! External Search Providers
//!
//! This module contains clients for third-party catalog services:
//! - TMDB - movie search and details (with credits)
//! - Google Books - volume search and details
//!
//! Each provider turns a free-text query into [`ExternalCandidate`]s and a
//! chosen candidate into a [`MediaDraft`] ready for the regular create flow.

pub mod google_books;
pub mod tmdb;

pub use google_books::GoogleBooksClient;
pub use tmdb::TmdbClient;

use crate::error::{MetadataError, Result};
use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpRequest};
use core_library::{MediaDraft, MediaType};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Rating used when a provider has no score for an item.
pub const DEFAULT_EXTERNAL_RATING: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalSource {
    Tmdb,
    GoogleBooks,
}

impl ExternalSource {
    pub fn display_name(&self) -> &'static str {
        match self {
            ExternalSource::Tmdb => "TMDB",
            ExternalSource::GoogleBooks => "Google Books",
        }
    }

    pub fn media_type(&self) -> MediaType {
        match self {
            ExternalSource::Tmdb => MediaType::Movie,
            ExternalSource::GoogleBooks => MediaType::Book,
        }
    }
}

/// One search hit from a third-party service, before the details lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalCandidate {
    pub source: ExternalSource,
    pub external_id: String,
    pub title: String,
    pub year: Option<i32>,
    /// Provider's own scale (TMDB 0-10, Google Books 1-5)
    pub score: Option<f64>,
    pub overview: Option<String>,
    pub cover_url: Option<String>,
    /// Authors for books
    pub byline: Option<String>,
}

impl ExternalCandidate {
    pub fn media_type(&self) -> MediaType {
        self.source.media_type()
    }
}

/// A searchable third-party catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaSearchProvider: Send + Sync {
    fn source(&self) -> ExternalSource;

    /// Search by free-text title.
    async fn search(&self, query: &str) -> Result<Vec<ExternalCandidate>>;

    /// Fetch full details for `external_id` and map them to a draft.
    ///
    /// `current_year` stands in for a missing release date.
    async fn draft(&self, external_id: &str, current_year: i32) -> Result<MediaDraft>;
}

/// Execute a GET and decode a JSON body, classifying failures.
pub(crate) async fn get_json<T: DeserializeOwned>(
    http_client: &dyn HttpClient,
    request: HttpRequest,
    provider: &str,
) -> Result<T> {
    debug!(provider, method = request.method.as_str(), "Querying external catalog");

    let response = http_client
        .execute(request)
        .await
        .map_err(|e| MetadataError::NetworkError(format!("{} request failed: {}", provider, e)))?;

    if response.status == 429 {
        let retry_after = response
            .header("Retry-After")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);
        return Err(MetadataError::RateLimited {
            provider: provider.to_string(),
            retry_after_seconds: retry_after,
        });
    }

    if !response.is_success() {
        return Err(MetadataError::HttpError {
            status: response.status,
            body: String::from_utf8_lossy(&response.body).to_string(),
        });
    }

    serde_json::from_slice(&response.body).map_err(|e| MetadataError::parse(provider, e))
}

/// Leading four-digit year of a provider date such as `1965`, `1965-08` or `2021-09-15`.
pub(crate) fn year_prefix(date: Option<&str>) -> Option<i32> {
    let date = date?.trim();
    let digits: String = date.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 {
        return None;
    }
    digits[..4].parse().ok()
}

/// Drop `None`/blank strings.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
