// src/services/index.rs

//! Index page link resolution.
//!
//! Finds the speech list on the index page and turns every row with a
//! single anchor into an absolute detail-page URL.

use scraper::{Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{SelectorConfig, parse_selector};

/// Extracts detail-page links from an index page.
///
/// Malformed rows (no anchor, several anchors, no href, unresolvable href)
/// are skipped with a warning; only a missing container is fatal.
#[derive(Debug, Clone)]
pub struct IndexResolver {
    container_css: String,
    container: Selector,
    row: Selector,
    link: Selector,
    link_attr: String,
}

impl IndexResolver {
    /// Build a resolver from the configured selectors.
    pub fn new(selectors: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            container_css: selectors.index_container.clone(),
            container: parse_selector(&selectors.index_container)?,
            row: parse_selector(&selectors.link_row)?,
            link: parse_selector(&selectors.link)?,
            link_attr: selectors.link_attr.clone(),
        })
    }

    /// Resolve the ordered list of absolute detail links.
    pub fn resolve(&self, html: &str, base_url: &str) -> Result<Vec<String>> {
        let base = Url::parse(base_url)?;
        let document = Html::parse_document(html);

        let container = document
            .select(&self.container)
            .next()
            .ok_or_else(|| AppError::missing_container(&self.container_css))?;

        let mut links = Vec::new();
        for (position, row) in container.select(&self.row).enumerate() {
            let anchors: Vec<_> = row.select(&self.link).collect();
            let [anchor] = anchors.as_slice() else {
                log::warn!(
                    "Skipping index row {}: expected one link, found {}",
                    position + 1,
                    anchors.len()
                );
                continue;
            };

            let Some(href) = anchor.value().attr(&self.link_attr) else {
                log::warn!(
                    "Skipping index row {}: link has no '{}' attribute",
                    position + 1,
                    self.link_attr
                );
                continue;
            };

            match base.join(href.trim()) {
                Ok(url) => links.push(url.to_string()),
                Err(e) => log::warn!(
                    "Skipping index row {}: cannot resolve '{}': {}",
                    position + 1,
                    href,
                    e
                ),
            }
        }

        log::debug!("Resolved {} detail links from index page", links.len());
        Ok(links)
    }
}
