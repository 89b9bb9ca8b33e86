//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the media catalog core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus carrying catalog events and user-facing notifications
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the other core crates depend on.
//! It establishes the logging conventions, the configuration builder and the
//! broadcast channel through which the presentation layer learns about
//! catalog changes and failures.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
