//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`
//!
//! The clock bridge needs no desktop-specific code; `bridge_traits::SystemClock`
//! is used directly.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new()?);
//! let config = CatalogConfig::builder().http_client(http_client).build()?;
//! ```

mod http;

pub use http::ReqwestHttpClient;
