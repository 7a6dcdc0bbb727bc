//! Data-driven content for the stat engine.
//!
//! This crate reads and writes the files a character is built from:
//! - Base-value tables (TOML or RON)
//! - Engine configuration (TOML)
//! - Save files (RON)
//!
//! All loaders use stats-core types directly with serde for RON/TOML
//! deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, LoadResult, SaveFile, TableLoader};
