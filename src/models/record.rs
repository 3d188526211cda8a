//! Speech record data structures.

use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};

/// Date recorded when a detail page carries no date metadata.
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// One speech extracted from a detail page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    /// Speaker name, never empty
    pub author: String,

    /// Publication date or [`UNKNOWN_DATE`]
    pub date: String,

    /// Full text of the speech, never empty
    pub body: String,
}

impl Record {
    /// Serialize as a tagged text record.
    ///
    /// ```text
    /// <Text author="..." date="...">
    /// body
    /// </Text>
    /// ```
    pub fn to_xml(&self) -> String {
        format!(
            "<Text author=\"{}\" date=\"{}\">\n{}\n</Text>\n",
            escape(self.author.as_str()),
            escape(self.date.as_str()),
            escape(self.body.as_str())
        )
    }
}

/// An archive entry: a unique name and its serialized record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedEntry {
    pub name: String,
    pub payload: String,
}
