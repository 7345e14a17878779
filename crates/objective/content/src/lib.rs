//! Data-driven content for the objective scheduler.
//!
//! This crate turns persisted documents into already-parsed values the
//! scheduler consumes:
//! - Scheduler tunables (TOML)
//! - World-target fixtures (RON)
//!
//! The scheduler itself never reads files; everything here is handed to
//! `objective-core` as plain structs.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LoadResult, WorldLoader};
