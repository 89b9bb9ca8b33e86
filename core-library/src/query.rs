//! View configuration and the filter/sort pipeline.
//!
//! Everything here is a pure function of a record slice and a [`ViewConfig`]:
//! nothing reads ambient state and nothing mutates its input. The pipeline
//! runs four narrowing stages in a fixed order (category, free-text search,
//! advanced filters, selected tags) and then sorts an owned copy.

use crate::error::{LibraryError, Result};
use crate::models::{MediaRecord, MediaType};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Records rated at or above this value count as highly rated.
pub const HIGH_RATING_THRESHOLD: f64 = 8.0;

/// Coarse partition applied before every other filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[default]
    All,
    Movie,
    Book,
    Favorites,
    HighRating,
    Watched,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::All,
        Category::Movie,
        Category::Book,
        Category::Favorites,
        Category::HighRating,
        Category::Watched,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Movie => "movie",
            Category::Book => "book",
            Category::Favorites => "favorites",
            Category::HighRating => "high-rating",
            Category::Watched => "watched",
        }
    }

    pub fn matches(&self, record: &MediaRecord) -> bool {
        match self {
            Category::All => true,
            Category::Movie => record.media_type == MediaType::Movie,
            Category::Book => record.media_type == MediaType::Book,
            Category::Favorites => record.favorite,
            Category::HighRating => record.rating >= HIGH_RATING_THRESHOLD,
            Category::Watched => record.watched,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| LibraryError::invalid("category", format!("Unknown category: {}", s)))
    }
}

/// Year/rating ranges and the free-text tag filter.
///
/// Unset bounds never block a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancedFilter {
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub rating_from: Option<f64>,
    /// Comma-separated terms; a record passes if ANY term is a substring of ANY of its tags
    pub tags_text: Option<String>,
}

impl AdvancedFilter {
    pub fn is_empty(&self) -> bool {
        self.year_from.is_none()
            && self.year_to.is_none()
            && self.rating_from.is_none()
            && self.tag_terms().is_empty()
    }

    /// Trimmed, lower-cased, non-empty terms of `tags_text`.
    pub fn tag_terms(&self) -> Vec<String> {
        self.tags_text
            .as_deref()
            .map(|text| {
                text.split(',')
                    .map(|term| term.trim().to_lowercase())
                    .filter(|term| !term.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn matches(&self, record: &MediaRecord) -> bool {
        if self.year_from.is_some_and(|from| record.year < from) {
            return false;
        }
        if self.year_to.is_some_and(|to| record.year > to) {
            return false;
        }
        if self.rating_from.is_some_and(|from| record.rating < from) {
            return false;
        }

        let terms = self.tag_terms();
        if terms.is_empty() {
            return true;
        }
        record.tags.iter().any(|tag| {
            let tag = tag.to_lowercase();
            terms.iter().any(|term| tag.contains(term.as_str()))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    Title,
    Year,
    Rating,
    Views,
    #[default]
    DateAdded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Process-local view state: which records are visible and in what order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub category: Category,
    /// Stored lower-cased and trimmed
    pub search: String,
    pub advanced: AdvancedFilter,
    /// Insertion-ordered, no exact duplicates
    pub selected_tags: Vec<String>,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl ViewConfig {
    pub fn set_search(&mut self, query: &str) {
        self.search = query.trim().to_lowercase();
    }

    /// Add a tag to the selected set.
    ///
    /// Returns `Ok(false)` when the tag is already selected.
    pub fn select_tag(&mut self, tag: &str) -> Result<bool> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(LibraryError::invalid("tag", "Tag cannot be empty"));
        }
        if self.selected_tags.iter().any(|t| t == tag) {
            return Ok(false);
        }
        self.selected_tags.push(tag.to_string());
        Ok(true)
    }

    /// Returns whether the tag was selected.
    pub fn deselect_tag(&mut self, tag: &str) -> bool {
        let before = self.selected_tags.len();
        self.selected_tags.retain(|t| t != tag);
        self.selected_tags.len() != before
    }

    /// Flip membership of `tag`; returns whether it is selected afterwards.
    pub fn toggle_tag(&mut self, tag: &str) -> Result<bool> {
        if self.deselect_tag(tag.trim()) {
            Ok(false)
        } else {
            self.select_tag(tag)
        }
    }

    pub fn clear_tags(&mut self) {
        self.selected_tags.clear();
    }
}

// =============================================================================
// Filter Pipeline
// =============================================================================

fn matches_search(record: &MediaRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    let contains = |text: &str| text.to_lowercase().contains(&query);

    contains(record.title.as_str())
        || record.creator().is_some_and(contains)
        || record.tags.iter().any(|tag| contains(tag.as_str()))
        || contains(record.description.as_str())
}

fn matches_selected_tags(record: &MediaRecord, selected: &[String]) -> bool {
    selected.iter().all(|tag| record.has_tag(tag))
}

/// Records passing every filter stage of `config`, in their original order.
pub fn filter_records(records: &[MediaRecord], config: &ViewConfig) -> Vec<MediaRecord> {
    records
        .iter()
        .filter(|r| config.category.matches(r))
        .filter(|r| matches_search(r, &config.search))
        .filter(|r| config.advanced.matches(r))
        .filter(|r| matches_selected_tags(r, &config.selected_tags))
        .cloned()
        .collect()
}

// =============================================================================
// Sort Stage
// =============================================================================

fn compare_by(a: &MediaRecord, b: &MediaRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortKey::Year => a.year.cmp(&b.year),
        SortKey::Rating => a.rating.total_cmp(&b.rating),
        SortKey::Views => a.views.cmp(&b.views),
        // Missing dates sort as the oldest
        SortKey::DateAdded => a.date_added.cmp(&b.date_added),
    }
}

/// Sort an owned list. Equal keys may end up in either relative order.
pub fn sort_records(
    mut records: Vec<MediaRecord>,
    key: SortKey,
    direction: SortDirection,
) -> Vec<MediaRecord> {
    records.sort_by(|a, b| {
        let ordering = compare_by(a, b, key);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    records
}

/// Filter then sort: the visible list for `config`.
pub fn derive_view(records: &[MediaRecord], config: &ViewConfig) -> Vec<MediaRecord> {
    sort_records(
        filter_records(records, config),
        config.sort_key,
        config.sort_direction,
    )
}

// =============================================================================
// Quick search routing
// =============================================================================

/// Where a quick search is sent for the active category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    /// External movie and book search
    All,
    Movies,
    Books,
    /// Local free-text filter
    Local,
}

impl SearchScope {
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::All => SearchScope::All,
            Category::Movie => SearchScope::Movies,
            Category::Book => SearchScope::Books,
            Category::Favorites | Category::HighRating | Category::Watched => SearchScope::Local,
        }
    }

    pub fn is_external(&self) -> bool {
        !matches!(self, SearchScope::Local)
    }
}
