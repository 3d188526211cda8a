//! Storage abstractions for archive persistence.
//!
//! The pipeline only needs two things from a destination: the names already
//! present there, and a way to store a sealed archive under a name.
//!
//! ## Directory Structure
//!
//! ```text
//! downloads/
//! ├── xml_archive.zip
//! ├── xml_archive_1.zip
//! └── xml_archive_2.zip
//! ```

pub mod local;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use local::LocalStorage;

/// Trait for archive storage backends.
#[async_trait]
pub trait ArchiveStorage: Send + Sync {
    /// Names already present at the destination.
    async fn list_existing_names(&self) -> Result<HashSet<String>>;

    /// Store `bytes` under `desired_name` and return the name actually used.
    ///
    /// Backends may pick a different name if `desired_name` was taken in
    /// the meantime. Failures are reported as `WriteFailed`.
    async fn write(&self, bytes: &[u8], desired_name: &str) -> Result<String>;
}
