//! Run outcome reported to the caller.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A detail page that was dropped during fan-out.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DroppedUnit {
    /// Detail page URL
    pub url: String,

    /// Human-readable cause (fetch failure or missing field)
    pub reason: String,
}

/// Summary of a successful pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Name the persistence layer finally stored the archive under
    pub archive_name: String,

    /// Entry names in the order they were added
    pub entries: Vec<String>,

    /// Units omitted from the archive and why
    pub dropped: Vec<DroppedUnit>,

    /// Number of detail links resolved from the index page
    pub link_count: usize,

    /// Size of the sealed archive in bytes
    pub archive_bytes: usize,

    /// Hex SHA-256 of the sealed archive
    pub sha256: String,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
