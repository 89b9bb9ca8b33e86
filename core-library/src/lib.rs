//! # Media Library Module
//!
//! Owns the in-memory media collection and every pure computation over it.
//!
//! ## Overview
//!
//! This module manages:
//! - The `MediaRecord` model with lenient decoding of remote documents
//! - The record store (full set plus derived view)
//! - The filter pipeline and sort stage driven by a `ViewConfig`
//! - Tag statistics and per-category counts over the full set
//! - Export/import snapshots

pub mod error;
pub mod models;
pub mod query;
pub mod snapshot;
pub mod stats;
pub mod store;
pub mod tags;

pub use error::{LibraryError, Result};
pub use models::{
    BookFields, MediaDraft, MediaId, MediaPatch, MediaRecord, MediaType, MovieFields,
    NewMediaRecord,
};
pub use query::{
    derive_view, filter_records, sort_records, AdvancedFilter, Category, SearchScope, SortDirection,
    SortKey, ViewConfig,
};
pub use snapshot::CatalogSnapshot;
pub use stats::CategoryCounts;
pub use store::RecordStore;
pub use tags::{all_tags, popular_tags, tag_counts, TagCount};
