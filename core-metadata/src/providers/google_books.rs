//! Google Books API Client
//!
//! ## API Endpoints
//!
//! - **Search**: `GET /books/v1/volumes?q={q}&maxResults={n}&key={key}`
//! - **Details**: `GET /books/v1/volumes/{id}?key={key}`
//!
//! The API key goes in the query string, so request URLs are never logged.

use super::{
    get_json, non_blank, year_prefix, ExternalCandidate, ExternalSource, MediaSearchProvider,
    DEFAULT_EXTERNAL_RATING,
};
use crate::error::Result;
use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use core_library::{BookFields, MediaDraft, MediaType};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Google Books API base URL
const GOOGLE_BOOKS_API_BASE: &str = "https://www.googleapis.com/books/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER: &str = "Google Books";

pub struct GoogleBooksClient {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    max_results: u32,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct VolumeList {
    #[serde(default)]
    items: Vec<Volume>,
}

/// A volume resource; only `volumeInfo` matters here.
#[derive(Debug, Deserialize)]
pub struct Volume {
    id: String,
    #[serde(rename = "volumeInfo", default)]
    info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    published_date: Option<String>,
    description: Option<String>,
    page_count: Option<u32>,
    #[serde(default)]
    categories: Vec<String>,
    average_rating: Option<f64>,
    image_links: Option<ImageLinks>,
    #[serde(default)]
    industry_identifiers: Vec<IndustryIdentifier>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageLinks {
    thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IndustryIdentifier {
    identifier: String,
}

impl VolumeInfo {
    fn byline(&self) -> Option<String> {
        if self.authors.is_empty() {
            None
        } else {
            Some(self.authors.join(", "))
        }
    }

    fn secure_thumbnail(&self) -> Option<String> {
        self.image_links
            .as_ref()
            .and_then(|links| links.thumbnail.as_deref())
            .map(secure_url)
    }
}

impl GoogleBooksClient {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>, max_results: u32) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            max_results: max_results.clamp(1, 40),
            api_base: GOOGLE_BOOKS_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn request(&self, url: String) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, url)
            .header("Accept", "application/json")
            .timeout(REQUEST_TIMEOUT)
    }

    async fn volume(&self, volume_id: &str) -> Result<Volume> {
        let url = format!(
            "{}/volumes/{}?key={}",
            self.api_base,
            urlencoding::encode(volume_id),
            urlencoding::encode(&self.api_key)
        );
        get_json(self.http_client.as_ref(), self.request(url), PROVIDER).await
    }
}

#[async_trait]
impl MediaSearchProvider for GoogleBooksClient {
    fn source(&self) -> ExternalSource {
        ExternalSource::GoogleBooks
    }

    async fn search(&self, query: &str) -> Result<Vec<ExternalCandidate>> {
        let url = format!(
            "{}/volumes?q={}&maxResults={}&key={}",
            self.api_base,
            urlencoding::encode(query),
            self.max_results,
            urlencoding::encode(&self.api_key)
        );

        let list: VolumeList =
            get_json(self.http_client.as_ref(), self.request(url), PROVIDER).await?;

        info!(query, hits = list.items.len(), "Google Books search completed");

        Ok(list
            .items
            .into_iter()
            .map(|volume| {
                let byline = volume.info.byline();
                let cover_url = volume.info.secure_thumbnail();
                ExternalCandidate {
                    source: ExternalSource::GoogleBooks,
                    external_id: volume.id,
                    title: volume
                        .info
                        .title
                        .unwrap_or_else(|| "Untitled".to_string()),
                    year: year_prefix(volume.info.published_date.as_deref()),
                    score: volume.info.average_rating,
                    overview: non_blank(volume.info.description),
                    cover_url,
                    byline,
                }
            })
            .collect())
    }

    async fn draft(&self, external_id: &str, current_year: i32) -> Result<MediaDraft> {
        let volume = self.volume(external_id).await?;
        Ok(book_draft(volume, current_year))
    }
}

/// Map a Google Books volume to a draft.
pub fn book_draft(volume: Volume, current_year: i32) -> MediaDraft {
    let info = volume.info;
    let author = info.byline().unwrap_or_else(|| "Unknown author".to_string());
    let cover = info.secure_thumbnail();
    let isbn = info
        .industry_identifiers
        .into_iter()
        .next()
        .map(|id| id.identifier);

    let mut draft = MediaDraft::new(
        MediaType::Book,
        non_blank(info.title).unwrap_or_else(|| "Untitled".to_string()),
        year_prefix(info.published_date.as_deref()).unwrap_or(current_year),
        info.average_rating
            .filter(|r| *r > 0.0)
            .unwrap_or(DEFAULT_EXTERNAL_RATING),
        non_blank(info.description).unwrap_or_else(|| "No description available".to_string()),
    )
    .with_book_fields(BookFields {
        author: Some(author),
        pages: info.page_count.filter(|p| *p > 0),
        genre: info.categories.first().cloned(),
        isbn,
        google_books_id: Some(volume.id),
    })
    .with_tags(info.categories);

    if let Some(cover) = cover {
        draft = draft.with_cover(cover);
    }
    draft
}

/// Thumbnails come back as `http://`; browsers block them as mixed content.
fn secure_url(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetadataError;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::http::HttpResponse;
    use mockall::mock;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    const VOLUME: &str = r#"{
        "id": "B1hSG45JCX4C",
        "volumeInfo": {
            "title": "Dune",
            "authors": ["Frank Herbert"],
            "publishedDate": "1965-08",
            "description": "Set on the desert planet Arrakis...",
            "pageCount": 412,
            "categories": ["Fiction", "Science Fiction"],
            "averageRating": 4.5,
            "imageLinks": {"thumbnail": "http://books.google.com/books/content?id=B1hSG45JCX4C"},
            "industryIdentifiers": [
                {"type": "ISBN_13", "identifier": "9780441013593"},
                {"type": "ISBN_10", "identifier": "0441013597"}
            ]
        }
    }"#;

    #[test]
    fn test_book_draft_mapping() {
        let volume: Volume = serde_json::from_str(VOLUME).unwrap();
        let draft = book_draft(volume, 2030);

        assert_eq!(draft.media_type, MediaType::Book);
        assert_eq!(draft.title, "Dune");
        assert_eq!(draft.year, 1965);
        assert_eq!(draft.rating, 4.5);
        assert_eq!(
            draft.cover.as_deref(),
            Some("https://books.google.com/books/content?id=B1hSG45JCX4C")
        );
        assert_eq!(draft.tags, vec!["Fiction", "Science Fiction"]);
        assert_eq!(draft.book.author.as_deref(), Some("Frank Herbert"));
        assert_eq!(draft.book.genre.as_deref(), Some("Fiction"));
        assert_eq!(draft.book.pages, Some(412));
        assert_eq!(draft.book.isbn.as_deref(), Some("9780441013593"));
        assert_eq!(draft.book.google_books_id.as_deref(), Some("B1hSG45JCX4C"));
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_book_draft_fallbacks() {
        let volume: Volume =
            serde_json::from_str(r#"{"id": "x", "volumeInfo": {"authors": []}}"#).unwrap();
        let draft = book_draft(volume, 2030);

        assert_eq!(draft.title, "Untitled");
        assert_eq!(draft.year, 2030);
        assert_eq!(draft.rating, DEFAULT_EXTERNAL_RATING);
        assert_eq!(draft.book.author.as_deref(), Some("Unknown author"));
        assert_eq!(draft.book.genre, None);
        assert_eq!(draft.cover, None);
    }

    #[test]
    fn test_secure_url() {
        assert_eq!(secure_url("http://a/b"), "https://a/b");
        assert_eq!(secure_url("https://a/b"), "https://a/b");
    }

    #[tokio::test]
    async fn test_search_request_and_mapping() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(|req| {
                req.url
                    == "https://www.googleapis.com/books/v1/volumes?q=dune%20herbert&maxResults=20&key=k%2B1"
            })
            .times(1)
            .returning(|_| {
                Ok(HttpResponse::new(
                    200,
                    r#"{"totalItems": 2, "items": [
                        {"id": "a", "volumeInfo": {"title": "Dune", "authors": ["Frank Herbert", "Brian Herbert"],
                         "publishedDate": "1965"}},
                        {"id": "b", "volumeInfo": {}}
                    ]}"#,
                ))
            });

        let client = GoogleBooksClient::new(Arc::new(mock), "k+1", 20);
        let hits = client.search("dune herbert").await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].byline.as_deref(), Some("Frank Herbert, Brian Herbert"));
        assert_eq!(hits[0].year, Some(1965));
        assert_eq!(hits[1].title, "Untitled");
        assert_eq!(hits[1].byline, None);
    }

    #[tokio::test]
    async fn test_search_without_items_is_empty() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"kind": "books#volumes", "totalItems": 0}"#)));

        let client = GoogleBooksClient::new(Arc::new(mock), "k", 5);
        assert!(client.search("zzzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_draft_fetches_volume() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(|req| req.url == "https://www.googleapis.com/books/v1/volumes/B1hSG45JCX4C?key=k")
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, VOLUME)));

        let client = GoogleBooksClient::new(Arc::new(mock), "k", 20);
        let draft = client.draft("B1hSG45JCX4C", 2030).await.unwrap();
        assert_eq!(draft.book.author.as_deref(), Some("Frank Herbert"));
    }

    #[tokio::test]
    async fn test_transport_and_rate_limit_errors() {
        let mut mock = MockHttpClient::new();
        let mut calls = 0;
        mock.expect_execute().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(BridgeError::Network("offline".to_string()))
            } else {
                let mut response = HttpResponse::new(429, "");
                // reqwest hands header names over lower-cased
                response.headers.insert("retry-after".to_string(), "5".to_string());
                Ok(response)
            }
        });

        let client = GoogleBooksClient::new(Arc::new(mock), "k", 20);
        assert!(matches!(
            client.search("a").await,
            Err(MetadataError::NetworkError(_))
        ));
        assert!(matches!(
            client.search("a").await,
            Err(MetadataError::RateLimited {
                retry_after_seconds: 5,
                ..
            })
        ));
    }
}
