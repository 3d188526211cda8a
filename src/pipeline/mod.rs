//! Pipeline entry points.
//!
//! - `ArchivePipeline`: index → concurrent detail fetch → zip → storage
//! - `ArchiveBuilder`: uniquely named entries sealed into one zip

pub mod archive;
pub mod run;

pub use archive::ArchiveBuilder;
pub use run::{ArchivePipeline, PipelineState, run_archiver};
