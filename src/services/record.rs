// src/services/record.rs

//! Detail page record extraction.

use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{Record, SelectorConfig, UNKNOWN_DATE, parse_selector};

/// Extracts a [`Record`] from a fetched detail page.
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    body: Selector,
    author_block: Selector,
    author_link: Selector,
    date: Selector,
    date_attr: String,
}

impl RecordExtractor {
    /// Build an extractor from the configured selectors.
    pub fn new(selectors: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            body: parse_selector(&selectors.body)?,
            author_block: parse_selector(&selectors.author_block)?,
            author_link: parse_selector(&selectors.author_link)?,
            date: parse_selector(&selectors.date)?,
            date_attr: selectors.date_attr.clone(),
        })
    }

    /// Extract author, date and body, or fail with `MissingFields`.
    pub fn extract(&self, html: &str) -> Result<Record> {
        let document = Html::parse_document(html);

        let body_elem = document
            .select(&self.body)
            .next()
            .ok_or_else(|| AppError::missing_field("body"))?;
        let author_block = document
            .select(&self.author_block)
            .next()
            .ok_or_else(|| AppError::missing_field("author"))?;

        let author: String = author_block
            .select(&self.author_link)
            .next()
            .map(|a| a.text().collect())
            .unwrap_or_default();
        if author.trim().is_empty() {
            return Err(AppError::missing_field("author"));
        }

        // Body text is kept verbatim.
        let body: String = body_elem.text().collect();
        if body.trim().is_empty() {
            return Err(AppError::missing_field("body"));
        }

        let date = document
            .select(&self.date)
            .next()
            .and_then(|el| el.value().attr(&self.date_attr))
            .unwrap_or(UNKNOWN_DATE);

        Ok(Record {
            author,
            date: date.to_string(),
            body,
        })
    }
}
