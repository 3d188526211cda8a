//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::SelectorConfig;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where the index page lives and how its links are resolved
    #[serde(default)]
    pub source: SourceConfig,

    /// HTTP and fan-out behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Structural selectors for index and detail pages
    #[serde(default)]
    pub selectors: SelectorConfig,

    /// Archive destination settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        Url::parse(&self.source.base_url)
            .map_err(|e| AppError::validation(format!("source.base_url is invalid: {e}")))?;
        if let Some(index_url) = &self.source.index_url {
            Url::parse(index_url)
                .map_err(|e| AppError::validation(format!("source.index_url is invalid: {e}")))?;
        }

        let base_name = self.output.archive_base_name.trim();
        if base_name.is_empty() {
            return Err(AppError::validation("output.archive_base_name is empty"));
        }
        if base_name.contains(['/', '\\']) {
            return Err(AppError::validation(
                "output.archive_base_name must not contain path separators",
            ));
        }

        self.selectors.validate()?;
        Ok(())
    }
}

/// Index page location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Index page to start from (the CLI may override it)
    #[serde(default)]
    pub index_url: Option<String>,

    /// Origin that relative detail links are resolved against
    #[serde(default = "defaults::base_url")]
    pub base_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            index_url: None,
            base_url: defaults::base_url(),
        }
    }
}

/// HTTP client and fan-out settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum concurrent detail fetches; 0 fetches every link at once
    #[serde(default)]
    pub max_concurrent: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: 0,
        }
    }
}

/// Archive output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the archive is written into
    #[serde(default = "defaults::output_dir")]
    pub dir: String,

    /// Archive file stem before uniquifying
    #[serde(default = "defaults::archive_base_name")]
    pub archive_base_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: defaults::output_dir(),
            archive_base_name: defaults::archive_base_name(),
        }
    }
}

mod defaults {
    pub fn base_url() -> String {
        "https://www.academie-francaise.fr/".into()
    }

    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; speech-archiver/0.1)".into()
    }

    pub fn timeout() -> u64 {
        30
    }

    pub fn output_dir() -> String {
        "downloads".into()
    }

    pub fn archive_base_name() -> String {
        "xml_archive".into()
    }
}
