//! # Sync Gateway Module
//!
//! Keeps the local catalog consistent with the remote media store.
//!
//! ## Overview
//!
//! All network I/O against the media collection goes through
//! [`MediaGateway`]. The REST implementation, [`HttpMediaGateway`], is built
//! from a [`CatalogConfig`](core_runtime::config::CatalogConfig) and sends
//! every request through the injected `HttpClient`.
//!
//! ## Error taxonomy
//!
//! - [`SyncError::Transport`]: no response
//! - [`SyncError::RemoteRejected`]: non-2xx status
//! - [`SyncError::MalformedResponse`]: 2xx with an unexpected body
//! - [`SyncError::Validation`]: rejected locally before any request
//!
//! Callers treat all four the same way: notify and leave local state as it was.

pub mod error;
pub mod gateway;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;

pub use error::{Result, SyncError};
pub use gateway::{FetchResult, HttpMediaGateway, MediaGateway};
