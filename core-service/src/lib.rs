//! Core service façade and bootstrap helpers.
//!
//! This crate ties the catalog together: the record store and view pipeline
//! from `core-library`, the REST gateway from `core-sync` and the external
//! search providers from `core-metadata`, all driven through
//! [`CatalogService::dispatch`]. Desktop hosts typically enable the
//! `desktop-shims` feature so the configuration builder falls back to the
//! reqwest-backed HTTP client from `bridge-desktop`.
//!
//! ```ignore
//! use core_runtime::config::CatalogConfig;
//! use core_service::{bootstrap, Command};
//!
//! let config = CatalogConfig::builder().api_base_url("http://localhost:3001").build()?;
//! let mut catalog = bootstrap(&config).await;
//! catalog.dispatch(Command::SetCategory(Category::Movie)).await?;
//! ```

pub mod command;
pub mod error;
pub mod service;

pub use command::{Command, CommandOutcome};
pub use error::{Result, ServiceError};
pub use service::CatalogService;

use core_runtime::config::CatalogConfig;
use tracing::warn;

/// Build a service from `config` and load the collection.
///
/// A failed initial load is not fatal: the catalog starts empty, an error
/// notification is published and the host may dispatch [`Command::Reload`].
pub async fn bootstrap(config: &CatalogConfig) -> CatalogService {
    let mut service = CatalogService::new(config);
    if let Err(error) = service.dispatch(Command::Reload).await {
        warn!(error = %error, "Starting with an empty catalog");
    }
    service
}
