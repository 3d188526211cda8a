// src/pipeline/archive.rs

//! In-memory zip archive of speech records.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::Result;
use crate::models::{NamedEntry, Record};
use crate::services::{ENTRY_SUFFIX, sanitize_stem, uniquify};

/// Accumulates uniquely named entries; sealed once into zip bytes.
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    names: HashSet<String>,
    entries: Vec<String>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            names: HashSet::new(),
            entries: Vec::new(),
        }
    }

    /// Name a record after its author and append it.
    pub fn add_record(&mut self, record: &Record) -> Result<NamedEntry> {
        let name = uniquify(&sanitize_stem(&record.author), ENTRY_SUFFIX, &self.names);
        let entry = NamedEntry {
            name,
            payload: record.to_xml(),
        };
        self.add_entry(&entry)?;
        Ok(entry)
    }

    fn add_entry(&mut self, entry: &NamedEntry) -> Result<()> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.writer.start_file(entry.name.as_str(), options)?;
        self.writer.write_all(entry.payload.as_bytes())?;

        self.names.insert(entry.name.clone());
        self.entries.push(entry.name.clone());
        Ok(())
    }

    /// Entry names in insertion order.
    pub fn entry_names(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finish the zip and return its bytes.
    pub fn seal(self) -> Result<Vec<u8>> {
        let cursor = self.writer.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}
