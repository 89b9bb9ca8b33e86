//! # Host Bridge Traits
//!
//! Capability traits that the catalog core requires from its host.
//!
//! ## Overview
//!
//! The catalog core never talks to the network or the system clock directly.
//! Every such capability is expressed as a trait here and injected at
//! construction time, so the same core runs against `reqwest` on desktop, a
//! browser `fetch` shim, or an in-memory fake in tests.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations against the media
//!   REST resource and third-party search APIs
//! - [`Clock`](time::Clock) - Time source used to stamp new records
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). An `Err` from
//! [`HttpClient::execute`](http::HttpClient::execute) always means the request
//! produced no response; a non-2xx status comes back as an `Ok` response so
//! callers can tell transport failures from remote rejections.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so implementations can be shared
//! behind `Arc` across async tasks.

pub mod error;
pub mod http;
pub mod time;

pub use error::BridgeError;

pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use time::{Clock, ConsoleLogger, FixedClock, LogEntry, LogLevel, LoggerSink, SystemClock};
