// src/pipeline/run.rs

//! Archive pipeline orchestration.
//!
//! `Idle → ResolvingIndex → FetchingDetails → Packaging → Persisting → Done`
//!
//! Only the index stage, packaging and the final write can fail the run.
//! Detail units that fail to fetch, extract or be added are dropped and
//! listed in the report.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use sha2::{Digest, Sha256};

use crate::error::{AppError, Result};
use crate::models::{Config, DroppedUnit, Record, RunReport};
use crate::pipeline::ArchiveBuilder;
use crate::services::{
    ARCHIVE_SUFFIX, HttpFetcher, IndexResolver, PageFetcher, RecordExtractor, uniquify,
};
use crate::storage::{ArchiveStorage, LocalStorage};

/// Stage of a single pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    ResolvingIndex,
    FetchingDetails,
    Packaging,
    Persisting,
    Done,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::ResolvingIndex => "resolving-index",
            PipelineState::FetchingDetails => "fetching-details",
            PipelineState::Packaging => "packaging",
            PipelineState::Persisting => "persisting",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Mutable state owned by one run.
struct RunContext {
    state: PipelineState,
    builder: ArchiveBuilder,
    dropped: Vec<DroppedUnit>,
    link_count: usize,
    started_at: DateTime<Utc>,
}

impl RunContext {
    fn new() -> Self {
        Self {
            state: PipelineState::Idle,
            builder: ArchiveBuilder::new(),
            dropped: Vec::new(),
            link_count: 0,
            started_at: Utc::now(),
        }
    }

    fn transition(&mut self, next: PipelineState) {
        log::debug!("Pipeline state: {} -> {}", self.state, next);
        self.state = next;
    }

    fn drop_unit(&mut self, url: String, error: AppError) {
        log::warn!("Dropping {}: {}", url, error);
        self.dropped.push(DroppedUnit {
            url,
            reason: error.to_string(),
        });
    }

    fn fail(&mut self, error: AppError) -> AppError {
        log::error!("Pipeline failed during {} ({}): {}", self.state, error.kind(), error);
        self.transition(PipelineState::Failed);
        error
    }
}

/// Resolves an index page, archives every extractable speech and stores
/// the archive under a collision-free name.
pub struct ArchivePipeline {
    fetcher: Arc<dyn PageFetcher>,
    storage: Arc<dyn ArchiveStorage>,
    index: IndexResolver,
    extractor: RecordExtractor,
    base_url: String,
    archive_base_name: String,
    max_concurrent: usize,
}

impl ArchivePipeline {
    /// Create a pipeline with explicit fetch and storage boundaries.
    pub fn new(
        config: &Config,
        fetcher: Arc<dyn PageFetcher>,
        storage: Arc<dyn ArchiveStorage>,
    ) -> Result<Self> {
        Ok(Self {
            fetcher,
            storage,
            index: IndexResolver::new(&config.selectors)?,
            extractor: RecordExtractor::new(&config.selectors)?,
            base_url: config.source.base_url.clone(),
            archive_base_name: config.output.archive_base_name.clone(),
            max_concurrent: config.crawler.max_concurrent,
        })
    }

    /// Create a pipeline that fetches over HTTP and writes to `output.dir`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::new(&config.crawler)?);
        let storage = Arc::new(LocalStorage::new(&config.output.dir));
        Self::new(config, fetcher, storage)
    }

    /// Fetch the index page and resolve its detail links.
    pub async fn resolve_links(&self, index_url: &str) -> Result<Vec<String>> {
        let html = self.fetcher.fetch(index_url).await?;
        self.index.resolve(&html, &self.base_url)
    }

    /// Run the whole pipeline for one index page.
    pub async fn run(&self, index_url: &str) -> Result<RunReport> {
        let mut ctx = RunContext::new();

        ctx.transition(PipelineState::ResolvingIndex);
        let links = match self.resolve_links(index_url).await {
            Ok(links) => links,
            Err(e) => return Err(ctx.fail(e)),
        };
        ctx.link_count = links.len();
        log::info!("Found {} speeches on {}", links.len(), index_url);

        ctx.transition(PipelineState::FetchingDetails);
        self.collect_records(links, &mut ctx).await;
        log::info!(
            "Extracted {} of {} speeches ({} dropped)",
            ctx.builder.len(),
            ctx.link_count,
            ctx.dropped.len()
        );

        ctx.transition(PipelineState::Packaging);
        let entries = ctx.builder.entry_names().to_vec();
        let bytes = match std::mem::take(&mut ctx.builder).seal() {
            Ok(bytes) => bytes,
            Err(e) => return Err(ctx.fail(e)),
        };
        let sha256 = hex::encode(Sha256::digest(&bytes));

        ctx.transition(PipelineState::Persisting);
        let archive_name = match self.persist(&bytes).await {
            Ok(name) => name,
            Err(e) => return Err(ctx.fail(e)),
        };

        ctx.transition(PipelineState::Done);
        Ok(RunReport {
            archive_name,
            entries,
            dropped: ctx.dropped,
            link_count: ctx.link_count,
            archive_bytes: bytes.len(),
            sha256,
            started_at: ctx.started_at,
            finished_at: Utc::now(),
        })
    }

    /// Fetch and extract every link concurrently, adding records to the
    /// archive as they complete. Every failure here drops its unit only.
    async fn collect_records(&self, links: Vec<String>, ctx: &mut RunContext) {
        let concurrency = match self.max_concurrent {
            0 => links.len().max(1),
            n => n,
        };

        let mut units = stream::iter(links)
            .map(|url| async move {
                let result = self.fetch_record(&url).await;
                (url, result)
            })
            .buffer_unordered(concurrency);

        while let Some((url, result)) = units.next().await {
            match result.and_then(|record| ctx.builder.add_record(&record)) {
                Ok(entry) => log::debug!("Added {} from {}", entry.name, url),
                Err(e) => ctx.drop_unit(url, e),
            }
        }
    }

    async fn fetch_record(&self, url: &str) -> Result<Record> {
        let html = self.fetcher.fetch(url).await?;
        self.extractor.extract(&html)
    }

    /// Pick a name unused at the destination and hand the archive over.
    async fn persist(&self, bytes: &[u8]) -> Result<String> {
        let existing = self.storage.list_existing_names().await?;
        let name = uniquify(&self.archive_base_name, ARCHIVE_SUFFIX, &existing);
        log::debug!("Writing archive as {} ({} bytes)", name, bytes.len());
        self.storage.write(bytes, &name).await
    }
}

/// Build the default pipeline from `config` and run it.
pub async fn run_archiver(config: &Config, index_url: &str) -> Result<RunReport> {
    let pipeline = ArchivePipeline::from_config(config)?;
    pipeline.run(index_url).await
}
