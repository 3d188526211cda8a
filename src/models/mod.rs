// src/models/mod.rs

//! Domain models for the archiver.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod record;
mod report;
mod selectors;

// Re-export all public types
pub use config::{Config, CrawlerConfig, OutputConfig, SourceConfig};
pub use record::{NamedEntry, Record, UNKNOWN_DATE};
pub use report::{DroppedUnit, RunReport};
pub use selectors::{SelectorConfig, parse_selector};
