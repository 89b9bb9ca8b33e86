//! TMDB API Client
//!
//! Movie search backed by The Movie Database.
//!
//! ## API Endpoints
//!
//! - **Search**: `GET /3/search/movie?query={q}&include_adult=false&language={lang}&page=1`
//! - **Details**: `GET /3/movie/{id}?language={lang}&append_to_response=credits`
//!
//! Both use a v4 read access token as bearer auth.
//!
//! ## Usage
//!
//! ```ignore
//! use core_metadata::providers::TmdbClient;
//!
//! let client = TmdbClient::new(http_client, token, "uk-UA");
//! let hits = client.search("Dune").await?;
//! let draft = client.draft(&hits[0].external_id, 2025).await?;
//! ```

use super::{
    get_json, non_blank, year_prefix, ExternalCandidate, ExternalSource, MediaSearchProvider,
    DEFAULT_EXTERNAL_RATING,
};
use crate::error::{MetadataError, Result};
use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use core_library::{MediaDraft, MediaType, MovieFields};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// TMDB API base URL
const TMDB_API_BASE: &str = "https://api.themoviedb.org/3";

/// Poster size used in search results
const SEARCH_POSTER_BASE: &str = "https://image.tmdb.org/t/p/w200";

/// Poster size stored on records
const DETAIL_POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_ACTORS: usize = 5;

const PROVIDER: &str = "TMDB";

pub struct TmdbClient {
    http_client: Arc<dyn HttpClient>,
    access_token: String,
    language: String,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<MovieSummary>,
}

#[derive(Debug, Deserialize)]
struct MovieSummary {
    id: u64,
    #[serde(default)]
    title: String,
    release_date: Option<String>,
    vote_average: Option<f64>,
    overview: Option<String>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Genre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CrewMember {
    #[serde(default)]
    job: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct CastMember {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct Credits {
    #[serde(default)]
    crew: Vec<CrewMember>,
    #[serde(default)]
    cast: Vec<CastMember>,
}

/// Movie details with appended credits.
#[derive(Debug, Deserialize)]
pub struct MovieDetails {
    id: u64,
    #[serde(default)]
    title: String,
    release_date: Option<String>,
    vote_average: Option<f64>,
    overview: Option<String>,
    poster_path: Option<String>,
    runtime: Option<u32>,
    #[serde(default)]
    genres: Vec<Genre>,
    #[serde(default)]
    credits: Credits,
}

impl TmdbClient {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        access_token: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            access_token: access_token.into(),
            language: language.into(),
            api_base: TMDB_API_BASE.to_string(),
        }
    }

    /// Point the client at a different host (tests, proxies).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn request(&self, url: String) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, url)
            .bearer_token(&self.access_token)
            .header("Accept", "application/json")
            .timeout(REQUEST_TIMEOUT)
    }

    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetails> {
        let url = format!(
            "{}/movie/{}?language={}&append_to_response=credits",
            self.api_base,
            movie_id,
            urlencoding::encode(&self.language)
        );
        get_json(self.http_client.as_ref(), self.request(url), PROVIDER).await
    }
}

#[async_trait]
impl MediaSearchProvider for TmdbClient {
    fn source(&self) -> ExternalSource {
        ExternalSource::Tmdb
    }

    async fn search(&self, query: &str) -> Result<Vec<ExternalCandidate>> {
        let url = format!(
            "{}/search/movie?query={}&include_adult=false&language={}&page=1",
            self.api_base,
            urlencoding::encode(query),
            urlencoding::encode(&self.language)
        );

        let response: SearchResponse =
            get_json(self.http_client.as_ref(), self.request(url), PROVIDER).await?;

        info!(query, hits = response.results.len(), "TMDB search completed");

        Ok(response
            .results
            .into_iter()
            .map(|movie| ExternalCandidate {
                source: ExternalSource::Tmdb,
                external_id: movie.id.to_string(),
                title: movie.title,
                year: year_prefix(movie.release_date.as_deref()),
                score: movie.vote_average.filter(|v| *v > 0.0),
                overview: non_blank(movie.overview),
                cover_url: movie
                    .poster_path
                    .map(|path| format!("{}{}", SEARCH_POSTER_BASE, path)),
                byline: None,
            })
            .collect())
    }

    async fn draft(&self, external_id: &str, current_year: i32) -> Result<MediaDraft> {
        let movie_id: u64 = external_id.parse().map_err(|_| MetadataError::RemoteApi {
            provider: PROVIDER.to_string(),
            message: format!("invalid movie id '{}'", external_id),
        })?;

        let details = self.movie_details(movie_id).await?;
        Ok(movie_draft(details, current_year))
    }
}

/// Map TMDB movie details to a draft.
pub fn movie_draft(details: MovieDetails, current_year: i32) -> MediaDraft {
    let director = details
        .credits
        .crew
        .iter()
        .find(|member| member.job == "Director")
        .map(|member| member.name.clone())
        .unwrap_or_else(|| "Unknown director".to_string());

    let actors = details
        .credits
        .cast
        .into_iter()
        .take(MAX_ACTORS)
        .map(|member| member.name)
        .collect();

    // TMDB scores out of 10; catalog cards show the halved value
    let rating = details
        .vote_average
        .filter(|v| *v > 0.0)
        .map(|v| (v / 2.0 * 10.0).round() / 10.0)
        .unwrap_or(DEFAULT_EXTERNAL_RATING);

    let mut draft = MediaDraft::new(
        MediaType::Movie,
        details.title,
        year_prefix(details.release_date.as_deref()).unwrap_or(current_year),
        rating,
        non_blank(details.overview).unwrap_or_else(|| "No description available".to_string()),
    )
    .with_tags(details.genres.into_iter().map(|g| g.name))
    .with_movie_fields(MovieFields {
        director: Some(director),
        duration: details.runtime.filter(|r| *r > 0),
        trailer: None,
        actors,
        tmdb_id: Some(details.id),
    });

    if let Some(path) = details.poster_path {
        draft = draft.with_cover(format!("{}{}", DETAIL_POSTER_BASE, path));
    }
    draft
}
