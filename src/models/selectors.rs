// src/models/selectors.rs

//! CSS selectors for the index and detail pages.

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// CSS selectors locating the link list and record fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Container holding the detail links on the index page
    #[serde(default = "defaults::index_container")]
    pub index_container: String,

    /// Each link-bearing row inside the container
    #[serde(default = "defaults::link_row")]
    pub link_row: String,

    /// The anchor inside a row
    #[serde(default = "defaults::link")]
    pub link: String,

    /// HTML attribute holding the link target (usually "href")
    #[serde(default = "defaults::link_attr")]
    pub link_attr: String,

    /// Body container on a detail page
    #[serde(default = "defaults::body")]
    pub body: String,

    /// Author-category block on a detail page
    #[serde(default = "defaults::author_block")]
    pub author_block: String,

    /// Anchor inside the author block whose text is the author
    #[serde(default = "defaults::author_link")]
    pub author_link: String,

    /// Date metadata element on a detail page
    #[serde(default = "defaults::date")]
    pub date: String,

    /// Attribute of the date element holding the date
    #[serde(default = "defaults::date_attr")]
    pub date_attr: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            index_container: defaults::index_container(),
            link_row: defaults::link_row(),
            link: defaults::link(),
            link_attr: defaults::link_attr(),
            body: defaults::body(),
            author_block: defaults::author_block(),
            author_link: defaults::author_link(),
            date: defaults::date(),
            date_attr: defaults::date_attr(),
        }
    }
}

impl SelectorConfig {
    /// Check that every selector parses.
    pub fn validate(&self) -> Result<()> {
        for css in [
            &self.index_container,
            &self.link_row,
            &self.link,
            &self.body,
            &self.author_block,
            &self.author_link,
            &self.date,
        ] {
            parse_selector(css)?;
        }
        Ok(())
    }
}

/// Parse a CSS selector into a `scraper::Selector`.
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

mod defaults {
    pub fn index_container() -> String {
        ".speeches".into()
    }
    pub fn link_row() -> String {
        "p".into()
    }
    pub fn link() -> String {
        "a".into()
    }
    pub fn link_attr() -> String {
        "href".into()
    }
    pub fn body() -> String {
        ".academie-columns.academie-columns-1".into()
    }
    pub fn author_block() -> String {
        ".category.color".into()
    }
    pub fn author_link() -> String {
        "a".into()
    }
    pub fn date() -> String {
        r#"[property="dc:date dc:created"]"#.into()
    }
    pub fn date_attr() -> String {
        "content".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selector_valid() {
        assert!(parse_selector("div.class").is_ok());
        assert!(parse_selector(r#"[property="dc:date dc:created"]"#).is_ok());
    }

    #[test]
    fn test_parse_selector_invalid() {
        assert!(parse_selector("[[invalid").is_err());
    }

    #[test]
    fn test_default_selectors_compile() {
        assert!(SelectorConfig::default().validate().is_ok());
    }
}
