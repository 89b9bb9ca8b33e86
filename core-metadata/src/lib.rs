//! # External Metadata Module
//!
//! Looks up movies and books in third-party catalogs and turns a chosen hit
//! into a [`core_library::MediaDraft`].
//!
//! ## Overview
//!
//! This module handles:
//! - Movie search and details via TMDB (bearer token)
//! - Book search and details via Google Books (API key)
//! - Routing a query by [`core_library::SearchScope`] with per-provider warnings
//!
//! Providers are only built for the credentials present in
//! [`core_runtime::config::MetadataApiConfig`].

pub mod error;
pub mod providers;
pub mod search;

pub use error::{MetadataError, Result};
pub use providers::{
    ExternalCandidate, ExternalSource, GoogleBooksClient, MediaSearchProvider, TmdbClient,
    DEFAULT_EXTERNAL_RATING,
};
pub use search::{MetadataSearch, SearchOutcome, SearchWarning};
