//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (e.g., `core-service`, `core-metadata`). Host applications
//! can depend on `catalog-workspace` and enable the documented features without
//! needing to wire each crate individually.

#[cfg(feature = "desktop-shims")]
pub use core_service as service;

#[cfg(feature = "external-search")]
pub use core_metadata as metadata;
