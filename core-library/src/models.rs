//! Domain models for the media catalog
//!
//! The remote resource is a plain JSON document store, so the models are
//! forgiving on the way in (numbers sent as strings, missing counters,
//! free-form dates) and strict on the way out.

use crate::error::{LibraryError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::warn;

/// Lowest year accepted for a new record.
pub const MIN_YEAR: i32 = 1;
/// Highest year accepted for a new record.
pub const MAX_YEAR: i32 = 2100;
/// Upper bound of the rating scale.
pub const MAX_RATING: f64 = 10.0;

const MOVIE_PLACEHOLDER: &str = "data:image/svg+xml;utf8,<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"300\" height=\"450\" viewBox=\"0 0 300 450\"><rect width=\"300\" height=\"450\" fill=\"%233b82f6\"/><text x=\"150\" y=\"225\" font-family=\"Arial\" font-size=\"24\" fill=\"white\" text-anchor=\"middle\">Movie</text></svg>";
const BOOK_PLACEHOLDER: &str = "data:image/svg+xml;utf8,<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"300\" height=\"450\" viewBox=\"0 0 300 450\"><rect width=\"300\" height=\"450\" fill=\"%236366f1\"/><text x=\"150\" y=\"225\" font-family=\"Arial\" font-size=\"24\" fill=\"white\" text-anchor=\"middle\">Book</text></svg>";

// =============================================================================
// ID Types
// =============================================================================

/// Identifier assigned by the remote store.
///
/// Document stores hand out either auto-increment numbers or short strings;
/// both are kept in their original JSON kind so they round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaId {
    Number(u64),
    Text(String),
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaId::Number(n) => write!(f, "{}", n),
            MediaId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for MediaId {
    fn from(value: u64) -> Self {
        MediaId::Number(value)
    }
}

impl From<&str> for MediaId {
    fn from(value: &str) -> Self {
        MediaId::Text(value.to_string())
    }
}

impl From<String> for MediaId {
    fn from(value: String) -> Self {
        MediaId::Text(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Book,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Book => "book",
        }
    }

    /// Inline SVG cover used when a record has no cover of its own.
    pub fn placeholder_cover(&self) -> &'static str {
        match self {
            MediaType::Movie => MOVIE_PLACEHOLDER,
            MediaType::Book => BOOK_PLACEHOLDER,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Domain Models
// =============================================================================

/// Movie-only attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    /// Runtime in minutes
    #[serde(
        default,
        deserialize_with = "lenient::optional_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailer: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::string_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub actors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u64>,
}

/// Book-only attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_books_id: Option<String>,
}

/// One movie or book entry as stored remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: MediaId,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub title: String,
    #[serde(default, deserialize_with = "lenient::year")]
    pub year: i32,
    #[serde(default, deserialize_with = "lenient::rating")]
    pub rating: f64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    /// Insertion order is kept for display
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub tags: Vec<String>,
    /// `None` when the stored value is missing or unreadable
    #[serde(
        rename = "dateAdded",
        default,
        with = "lenient::date_added",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub views: u64,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub watched: bool,
    #[serde(flatten)]
    pub movie: MovieFields,
    #[serde(flatten)]
    pub book: BookFields,
}

impl MediaRecord {
    pub fn is_movie(&self) -> bool {
        self.media_type == MediaType::Movie
    }

    pub fn is_book(&self) -> bool {
        self.media_type == MediaType::Book
    }

    /// Director for movies, author for books.
    pub fn creator(&self) -> Option<&str> {
        self.movie
            .director
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.book.author.as_deref())
    }

    pub fn cover_or_placeholder(&self) -> &str {
        match self.cover.as_deref() {
            Some(cover) if !cover.trim().is_empty() => cover,
            _ => self.media_type.placeholder_cover(),
        }
    }

    /// Exact, case-insensitive tag membership.
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == wanted)
    }

    pub fn toggle_favorite_patch(&self) -> MediaPatch {
        MediaPatch::default().with_favorite(!self.favorite)
    }

    /// Marking as watched counts as the first view when nothing was counted yet.
    pub fn toggle_watched_patch(&self) -> MediaPatch {
        let watched = !self.watched;
        let patch = MediaPatch::default().with_watched(watched);
        if watched && self.views == 0 {
            patch.with_views(1)
        } else {
            patch
        }
    }

    pub fn increment_views_patch(&self) -> MediaPatch {
        MediaPatch::default().with_views(self.views.saturating_add(1))
    }

    /// Overlay fields returned by the remote store onto this record.
    ///
    /// `id` and `type` never change once assigned, so they are ignored in
    /// `fields`. On error the record is left as it was.
    pub fn apply_remote(&mut self, fields: &Map<String, Value>) -> Result<()> {
        let mut merged = match serde_json::to_value(&*self)? {
            Value::Object(map) => map,
            _ => return Err(LibraryError::invalid("record", "record is not a JSON object")),
        };

        for (key, value) in fields {
            if key == "id" || key == "type" {
                continue;
            }
            merged.insert(key.clone(), value.clone());
        }

        *self = serde_json::from_value(Value::Object(merged))?;
        Ok(())
    }
}

/// Decode records from a JSON array, skipping entries that do not describe a
/// record instead of failing the whole batch.
pub fn decode_records(values: Vec<Value>) -> Vec<MediaRecord> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<MediaRecord>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed media record");
                None
            }
        })
        .collect()
}

// =============================================================================
// Drafts and Patches
// =============================================================================

/// User-entered (or externally sourced) data for a record that does not exist yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDraft {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub description: String,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub movie: MovieFields,
    #[serde(flatten)]
    pub book: BookFields,
}

impl MediaDraft {
    pub fn new(
        media_type: MediaType,
        title: impl Into<String>,
        year: i32,
        rating: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            media_type,
            title: title.into(),
            year,
            rating,
            description: description.into(),
            cover: None,
            tags: Vec::new(),
            movie: MovieFields::default(),
            book: BookFields::default(),
        }
    }

    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover = Some(cover.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_movie_fields(mut self, movie: MovieFields) -> Self {
        self.movie = movie;
        self
    }

    pub fn with_book_fields(mut self, book: BookFields) -> Self {
        self.book = book;
        self
    }

    /// Checks the fields a new record cannot do without.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(LibraryError::invalid("title", "Title cannot be empty"));
        }
        validate_year(self.year)?;
        validate_rating(self.rating)?;
        if self.description.trim().is_empty() {
            return Err(LibraryError::invalid(
                "description",
                "Description cannot be empty",
            ));
        }
        Ok(())
    }

    /// Stamp the draft with its creation time and zeroed counters.
    ///
    /// Fields belonging to the other media type are dropped.
    pub fn into_new_record(self, now: DateTime<Utc>) -> Result<NewMediaRecord> {
        self.validate()?;

        let cover = self
            .cover
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| self.media_type.placeholder_cover().to_string());

        let (movie, book) = match self.media_type {
            MediaType::Movie => (self.movie, BookFields::default()),
            MediaType::Book => (MovieFields::default(), self.book),
        };

        Ok(NewMediaRecord {
            media_type: self.media_type,
            title: self.title.trim().to_string(),
            year: self.year,
            rating: self.rating,
            description: self.description,
            cover,
            tags: normalize_tags(self.tags),
            date_added: now,
            views: 0,
            favorite: false,
            watched: false,
            movie,
            book,
        })
    }
}

/// Body of a create request: a record without its server-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMediaRecord {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub description: String,
    pub cover: String,
    pub tags: Vec<String>,
    #[serde(rename = "dateAdded", serialize_with = "lenient::serialize_timestamp")]
    pub date_added: DateTime<Utc>,
    pub views: u64,
    pub favorite: bool,
    pub watched: bool,
    #[serde(flatten)]
    pub movie: MovieFields,
    #[serde(flatten)]
    pub book: BookFields,
}

impl NewMediaRecord {
    pub fn into_record(self, id: MediaId) -> MediaRecord {
        MediaRecord {
            id,
            media_type: self.media_type,
            title: self.title,
            year: self.year,
            rating: self.rating,
            description: self.description,
            cover: Some(self.cover),
            tags: self.tags,
            date_added: Some(self.date_added),
            views: self.views,
            favorite: self.favorite,
            watched: self.watched,
            movie: self.movie,
            book: self.book,
        }
    }
}

/// Partial update sent with PATCH. Unset fields are not serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watched: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
}

impl MediaPatch {
    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = Some(favorite);
        self
    }

    pub fn with_watched(mut self, watched: bool) -> Self {
        self.watched = Some(watched);
        self
    }

    pub fn with_views(mut self, views: u64) -> Self {
        self.views = Some(views);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// JSON names of the fields this patch sets.
    pub fn field_names(&self) -> Vec<String> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Validate the patch against the record it will be applied to.
    pub fn validate_against(&self, record: &MediaRecord) -> Result<()> {
        if self.is_empty() {
            return Err(LibraryError::invalid("patch", "Nothing to update"));
        }
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(LibraryError::invalid("title", "Title cannot be empty"));
            }
        }
        if let Some(description) = &self.description {
            if description.trim().is_empty() {
                return Err(LibraryError::invalid(
                    "description",
                    "Description cannot be empty",
                ));
            }
        }
        if let Some(year) = self.year {
            validate_year(year)?;
        }
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        if let Some(views) = self.views {
            if views < record.views {
                return Err(LibraryError::invalid(
                    "views",
                    format!("View count cannot decrease ({} -> {})", record.views, views),
                ));
            }
        }
        Ok(())
    }
}

fn validate_year(year: i32) -> Result<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(LibraryError::invalid(
            "year",
            format!("Year must be between {} and {}", MIN_YEAR, MAX_YEAR),
        ));
    }
    Ok(())
}

fn validate_rating(rating: f64) -> Result<()> {
    if !rating.is_finite() || !(0.0..=MAX_RATING).contains(&rating) {
        return Err(LibraryError::invalid(
            "rating",
            format!("Rating must be between 0 and {}", MAX_RATING),
        ));
    }
    Ok(())
}

/// Trim tags, drop empty ones and exact duplicates, keep first-seen order.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Parse a stored `dateAdded` value: RFC 3339, a date-time without offset
/// (read as UTC) or a plain `YYYY-MM-DD` date.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

mod lenient {
    use super::parse_timestamp;
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    fn number(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn year<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(0),
            other => number(&other)
                .map(|n| n.trunc() as i32)
                .ok_or_else(|| D::Error::custom(format!("invalid year: {}", other))),
        }
    }

    pub fn rating<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(0.0),
            other => number(&other)
                .filter(|n| n.is_finite())
                .ok_or_else(|| D::Error::custom(format!("invalid rating: {}", other))),
        }
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(0),
            other => number(&other)
                .filter(|n| n.is_finite() && *n >= 0.0)
                .map(|n| n.floor() as u64)
                .ok_or_else(|| D::Error::custom(format!("invalid count: {}", other))),
        }
    }

    pub fn optional_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(number(&value)
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n as u32))
    }

    pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn serialize_timestamp<S: Serializer>(
        value: &DateTime<Utc>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub mod date_added {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => super::serialize_timestamp(dt, s),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let value = Value::deserialize(d)?;
            Ok(value.as_str().and_then(parse_timestamp))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn dune_movie() -> MediaRecord {
        serde_json::from_value(json!({
            "id": 1,
            "type": "movie",
            "title": "Dune",
            "year": 2021,
            "rating": 8.0,
            "tags": ["scifi"],
            "dateAdded": "2024-01-01",
            "views": 5,
            "favorite": true,
            "watched": true,
            "director": "Denis Villeneuve",
            "actors": ["Timothée Chalamet", "Zendaya"]
        }))
        .unwrap()
    }

    #[test]
    fn test_record_deserialization() {
        let record = dune_movie();
        assert_eq!(record.id, MediaId::Number(1));
        assert_eq!(record.media_type, MediaType::Movie);
        assert_eq!(record.description, "");
        assert_eq!(
            record.date_added,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(record.movie.director.as_deref(), Some("Denis Villeneuve"));
        assert_eq!(record.movie.actors.len(), 2);
        assert_eq!(record.book, BookFields::default());
        assert_eq!(record.creator(), Some("Denis Villeneuve"));
    }

    #[test]
    fn test_lenient_numbers_and_defaults() {
        let record: MediaRecord = serde_json::from_value(json!({
            "id": "a1b2",
            "type": "book",
            "title": "Kobzar",
            "year": "1840",
            "rating": "4.5",
            "description": null,
            "tags": null,
            "dateAdded": "not a date",
            "pages": "320"
        }))
        .unwrap();

        assert_eq!(record.id, MediaId::Text("a1b2".into()));
        assert_eq!(record.year, 1840);
        assert_eq!(record.rating, 4.5);
        assert!(record.tags.is_empty());
        assert_eq!(record.date_added, None);
        assert_eq!(record.views, 0);
        assert!(!record.favorite && !record.watched);
        assert_eq!(record.book.pages, Some(320));

        for views in [json!(5.0), json!("5"), json!(5.7)] {
            let record: MediaRecord = serde_json::from_value(json!({
                "id": 3, "type": "movie", "title": "Heat", "views": views
            }))
            .unwrap();
            assert_eq!(record.views, 5);
        }
        let kept = decode_records(vec![json!({
            "id": 4, "type": "movie", "title": "Alien", "views": 5.0
        })]);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_date_added_without_offset_is_utc() {
        let record: MediaRecord = serde_json::from_value(json!({
            "id": 5, "type": "movie", "title": "Arrival", "dateAdded": "2024-03-01T10:00:00"
        }))
        .unwrap();
        assert_eq!(
            record.date_added,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2024-03-01T10:00:00.250").map(|dt| dt.timestamp_millis() % 1000),
            Some(250)
        );
    }

    #[test]
    fn test_id_keeps_json_kind() {
        let record = dune_movie();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], json!(1));
        assert_eq!(value["dateAdded"], json!("2024-01-01T00:00:00.000Z"));
        assert!(value.get("author").is_none());
    }

    #[test]
    fn test_cover_placeholder() {
        let mut record = dune_movie();
        assert!(record.cover_or_placeholder().starts_with("data:image/svg+xml"));

        record.cover = Some("   ".into());
        assert_eq!(record.cover_or_placeholder(), MediaType::Movie.placeholder_cover());

        record.cover = Some("https://image.tmdb.org/t/p/w500/dune.jpg".into());
        assert_eq!(
            record.cover_or_placeholder(),
            "https://image.tmdb.org/t/p/w500/dune.jpg"
        );
        assert_ne!(
            MediaType::Movie.placeholder_cover(),
            MediaType::Book.placeholder_cover()
        );
    }

    #[test]
    fn test_toggle_watched_counts_first_view() {
        let mut record = dune_movie();
        record.watched = false;
        record.views = 0;

        let patch = record.toggle_watched_patch();
        assert_eq!(patch.watched, Some(true));
        assert_eq!(patch.views, Some(1));

        record.views = 3;
        let patch = record.toggle_watched_patch();
        assert_eq!(patch.views, None);

        record.watched = true;
        let patch = record.toggle_watched_patch();
        assert_eq!(patch.watched, Some(false));
        assert_eq!(patch.views, None);
    }

    #[test]
    fn test_apply_remote_keeps_identity() {
        let mut record = dune_movie();
        let fields = json!({
            "id": 99,
            "type": "book",
            "favorite": false,
            "views": 6,
            "updatedBy": "server"
        });

        record.apply_remote(fields.as_object().unwrap()).unwrap();

        assert_eq!(record.id, MediaId::Number(1));
        assert_eq!(record.media_type, MediaType::Movie);
        assert!(!record.favorite);
        assert_eq!(record.views, 6);
        assert_eq!(record.title, "Dune");
    }

    #[test]
    fn test_apply_remote_rejects_bad_fields() {
        let mut record = dune_movie();
        let before = record.clone();
        let fields = json!({ "title": 42 });

        assert!(record.apply_remote(fields.as_object().unwrap()).is_err());
        assert_eq!(record, before);
    }

    #[test]
    fn test_decode_records_skips_malformed() {
        let values = vec![
            json!({"id": 1, "type": "movie", "title": "Dune", "year": 2021, "rating": 8}),
            json!({"id": 2, "type": "podcast", "title": "Nope"}),
            json!("garbage"),
        ];
        let records = decode_records(values);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Dune");
    }

    #[test]
    fn test_draft_validation() {
        let draft = MediaDraft::new(MediaType::Book, "Dune", 1965, 9.0, "Desert planet");
        assert!(draft.validate().is_ok());

        let mut bad = draft.clone();
        bad.title = "  ".into();
        assert!(matches!(
            bad.validate(),
            Err(LibraryError::InvalidInput { field, .. }) if field == "title"
        ));

        let mut bad = draft.clone();
        bad.rating = 11.0;
        assert!(bad.validate().is_err());

        let mut bad = draft.clone();
        bad.year = 0;
        assert!(bad.validate().is_err());

        let mut bad = draft;
        bad.description = String::new();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_draft_into_new_record() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();
        let draft = MediaDraft::new(MediaType::Book, " Dune ", 1965, 9.0, "Desert planet")
            .with_tags(["scifi", " classic", "", "scifi"])
            .with_book_fields(BookFields {
                author: Some("Frank Herbert".into()),
                ..Default::default()
            })
            .with_movie_fields(MovieFields {
                director: Some("should be dropped".into()),
                ..Default::default()
            });

        let new_record = draft.into_new_record(now).unwrap();
        assert_eq!(new_record.title, "Dune");
        assert_eq!(new_record.tags, vec!["scifi", "classic"]);
        assert_eq!(new_record.views, 0);
        assert!(!new_record.favorite && !new_record.watched);
        assert_eq!(new_record.cover, MediaType::Book.placeholder_cover());
        assert_eq!(new_record.movie, MovieFields::default());

        let body = serde_json::to_value(&new_record).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["type"], json!("book"));
        assert_eq!(body["author"], json!("Frank Herbert"));
        assert_eq!(body["dateAdded"], json!("2025-03-14T12:00:00.000Z"));
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = MediaPatch::default().with_favorite(true);
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"favorite": true}));
        assert_eq!(patch.field_names(), vec!["favorite".to_string()]);
        assert!(MediaPatch::default().is_empty());
    }

    #[test]
    fn test_patch_rejects_decreasing_views() {
        let record = dune_movie();
        let patch = MediaPatch::default().with_views(2);
        assert!(patch.validate_against(&record).is_err());

        let patch = record.increment_views_patch();
        assert_eq!(patch.views, Some(6));
        assert!(patch.validate_against(&record).is_ok());

        assert!(MediaPatch::default().validate_against(&record).is_err());
    }
}
