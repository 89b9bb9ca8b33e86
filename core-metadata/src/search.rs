//! Search across the configured external catalogs.
//!
//! [`MetadataSearch`] routes a query to TMDB, Google Books or both depending
//! on the [`SearchScope`]. A provider that fails, or was never configured,
//! contributes a [`SearchWarning`] instead of failing the whole search.

use crate::error::{MetadataError, Result};
use crate::providers::{
    ExternalCandidate, ExternalSource, GoogleBooksClient, MediaSearchProvider, TmdbClient,
};
use bridge_traits::time::Clock;
use chrono::Datelike;
use core_library::{MediaDraft, SearchScope};
use core_runtime::config::CatalogConfig;
use std::sync::Arc;
use tracing::{debug, warn};

/// A provider that could not contribute results.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchWarning {
    pub source: ExternalSource,
    pub error: MetadataError,
}

impl SearchWarning {
    pub fn message(&self) -> String {
        match &self.error {
            MetadataError::NotConfigured { .. } => format!(
                "{} search is unavailable: no credentials configured",
                self.source.display_name()
            ),
            other => format!("{} search failed: {}", self.source.display_name(), other),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    /// Movies first, then books
    pub candidates: Vec<ExternalCandidate>,
    pub warnings: Vec<SearchWarning>,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

pub struct MetadataSearch {
    movies: Option<Arc<dyn MediaSearchProvider>>,
    books: Option<Arc<dyn MediaSearchProvider>>,
    clock: Arc<dyn Clock>,
}

impl MetadataSearch {
    pub fn new(
        movies: Option<Arc<dyn MediaSearchProvider>>,
        books: Option<Arc<dyn MediaSearchProvider>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            movies,
            books,
            clock,
        }
    }

    /// Build providers for whichever credentials the config carries.
    pub fn from_config(config: &CatalogConfig) -> Self {
        let api = &config.metadata_api_config;

        let movies = api.tmdb_access_token.as_ref().map(|token| {
            Arc::new(TmdbClient::new(
                config.http_client.clone(),
                token.clone(),
                api.language.clone(),
            )) as Arc<dyn MediaSearchProvider>
        });
        let books = api.google_books_api_key.as_ref().map(|key| {
            Arc::new(GoogleBooksClient::new(
                config.http_client.clone(),
                key.clone(),
                api.max_results,
            )) as Arc<dyn MediaSearchProvider>
        });

        if movies.is_none() {
            debug!("TMDB access token not set; movie search disabled");
        }
        if books.is_none() {
            debug!("Google Books API key not set; book search disabled");
        }

        Self::new(movies, books, config.clock.clone())
    }

    pub fn has_movies(&self) -> bool {
        self.movies.is_some()
    }

    pub fn has_books(&self) -> bool {
        self.books.is_some()
    }

    /// Run `query` against the providers selected by `scope`.
    ///
    /// A blank query or [`SearchScope::Local`] returns an empty outcome
    /// without touching the network. With [`SearchScope::All`] both
    /// providers are queried concurrently.
    pub async fn search(&self, scope: SearchScope, query: &str) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() || !scope.is_external() {
            return SearchOutcome::default();
        }

        let (movies, books) = match scope {
            SearchScope::All => futures::join!(
                self.search_one(ExternalSource::Tmdb, query),
                self.search_one(ExternalSource::GoogleBooks, query)
            ),
            SearchScope::Movies => (self.search_one(ExternalSource::Tmdb, query).await, Ok(vec![])),
            SearchScope::Books => (Ok(vec![]), self.search_one(ExternalSource::GoogleBooks, query).await),
            SearchScope::Local => (Ok(vec![]), Ok(vec![])),
        };

        let mut outcome = SearchOutcome::default();
        for (source, result) in [
            (ExternalSource::Tmdb, movies),
            (ExternalSource::GoogleBooks, books),
        ] {
            match result {
                Ok(candidates) => outcome.candidates.extend(candidates),
                Err(error) => {
                    warn!(source = source.display_name(), error = %error, "External search failed");
                    outcome.warnings.push(SearchWarning { source, error });
                }
            }
        }
        outcome
    }

    /// Fetch full details for a candidate and map them to a draft.
    pub async fn draft_for(&self, candidate: &ExternalCandidate) -> Result<MediaDraft> {
        let provider = self.provider(candidate.source)?;
        let current_year = self.clock.now().year();
        provider.draft(&candidate.external_id, current_year).await
    }

    async fn search_one(&self, source: ExternalSource, query: &str) -> Result<Vec<ExternalCandidate>> {
        self.provider(source)?.search(query).await
    }

    fn provider(&self, source: ExternalSource) -> Result<&Arc<dyn MediaSearchProvider>> {
        let provider = match source {
            ExternalSource::Tmdb => self.movies.as_ref(),
            ExternalSource::GoogleBooks => self.books.as_ref(),
        };
        provider.ok_or_else(|| MetadataError::NotConfigured {
            provider: source.display_name().to_string(),
        })
    }
}
