//! Service layer for the archiver.
//!
//! This module contains the business logic for:
//! - Page fetching (`PageFetcher`, `HttpFetcher`)
//! - Index link resolution (`IndexResolver`)
//! - Record extraction (`RecordExtractor`)
//! - Collision-free naming (`uniquify`, `sanitize_stem`)

mod fetch;
mod index;
pub mod naming;
mod record;

pub use fetch::{HttpFetcher, PageFetcher};
pub use index::IndexResolver;
pub use naming::{ARCHIVE_SUFFIX, ENTRY_SUFFIX, sanitize_stem, uniquify};
pub use record::RecordExtractor;
