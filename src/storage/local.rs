//! Local filesystem storage implementation.
//!
//! Archives are written into a single directory. Each write goes to its own
//! hidden temp file first and is then hard-linked into place, so a reader
//! never sees a half-written archive and an existing archive is never
//! replaced.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::services::uniquify;
use crate::storage::ArchiveStorage;

/// Distinguishes temp files of concurrent writes within this process.
static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a file name.
    fn path(&self, name: &str) -> PathBuf {
        self.root_dir.join(name)
    }

    /// Read the directory listing, treating a missing directory as empty.
    async fn read_names(&self) -> std::io::Result<HashSet<String>> {
        let mut names = HashSet::new();
        let mut entries = match tokio::fs::read_dir(&self.root_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(e),
        };

        while let Some(entry) = entries.next_entry().await? {
            if let Some(name) = entry.file_name().to_str() {
                names.insert(name.to_string());
            }
        }
        Ok(names)
    }

    /// Write `bytes` to a temp file private to this write.
    async fn write_temp(&self, bytes: &[u8]) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.root_dir).await?;

        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let tmp = self.path(&format!(".archive-{}-{seq}.tmp", std::process::id()));
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp)
            .await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        Ok(tmp)
    }

    /// Link the temp file into place under the first free name, starting
    /// from `desired_name`. Never replaces an existing file.
    async fn publish(&self, tmp: &Path, desired_name: &str) -> Result<String> {
        let (stem, suffix) = split_name(desired_name);
        let mut name = desired_name.to_string();

        loop {
            match tokio::fs::hard_link(tmp, self.path(&name)).await {
                Ok(()) => return Ok(name),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    let existing = self
                        .read_names()
                        .await
                        .map_err(|e| AppError::write_failed(&name, e))?;
                    let next = uniquify(stem, suffix, &existing);
                    log::warn!(
                        "{} already exists in {}, storing as {}",
                        name,
                        self.root_dir.display(),
                        next
                    );
                    name = next;
                }
                Err(e) => return Err(AppError::write_failed(&name, e)),
            }
        }
    }
}

/// Split `name.ext` into (`name`, `.ext`).
fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

#[async_trait]
impl ArchiveStorage for LocalStorage {
    async fn list_existing_names(&self) -> Result<HashSet<String>> {
        self.read_names().await.map_err(|e| {
            AppError::write_failed(self.root_dir.display().to_string(), e)
        })
    }

    async fn write(&self, bytes: &[u8], desired_name: &str) -> Result<String> {
        let tmp = self
            .write_temp(bytes)
            .await
            .map_err(|e| AppError::write_failed(desired_name, e))?;

        let published = self.publish(&tmp, desired_name).await;
        if let Err(e) = tokio::fs::remove_file(&tmp).await {
            log::warn!("Failed to remove temp file {}: {}", tmp.display(), e);
        }
        let final_name = published?;

        log::info!(
            "Archive written to {}",
            self.path(&final_name).display()
        );
        Ok(final_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_and_list() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let name = storage.write(b"zip-bytes", "xml_archive.zip").await.unwrap();
        assert_eq!(name, "xml_archive.zip");

        let names = storage.list_existing_names().await.unwrap();
        assert_eq!(names, HashSet::from(["xml_archive.zip".to_string()]));
        assert_eq!(std::fs::read(tmp.path().join(&name)).unwrap(), b"zip-bytes");
    }

    #[tokio::test]
    async fn test_missing_directory_lists_empty_and_is_created() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("nested/downloads"));

        assert!(storage.list_existing_names().await.unwrap().is_empty());

        storage.write(b"data", "xml_archive.zip").await.unwrap();
        assert!(tmp.path().join("nested/downloads/xml_archive.zip").exists());
    }

    #[tokio::test]
    async fn test_write_renames_on_collision() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("xml_archive.zip"), b"old").unwrap();
        let storage = LocalStorage::new(tmp.path());

        let name = storage.write(b"new", "xml_archive.zip").await.unwrap();
        assert_eq!(name, "xml_archive_1.zip");
        assert_eq!(std::fs::read(tmp.path().join("xml_archive.zip")).unwrap(), b"old");
        assert_eq!(std::fs::read(tmp.path().join("xml_archive_1.zip")).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        storage.write(b"data", "xml_archive.zip").await.unwrap();

        let names = storage.list_existing_names().await.unwrap();
        assert!(names.iter().all(|n| !n.ends_with(".tmp")));
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();
        let storage = LocalStorage::new(&blocker);

        let err = storage.write(b"data", "xml_archive.zip").await.unwrap_err();
        assert!(matches!(err, AppError::WriteFailed { .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_never_share_a_name() {
        for _ in 0..20 {
            let tmp = TempDir::new().unwrap();
            let storage = LocalStorage::new(tmp.path());

            let (a, b) = tokio::join!(
                storage.write(b"one", "xml_archive.zip"),
                storage.write(b"two", "xml_archive.zip")
            );
            let (a, b) = (a.unwrap(), b.unwrap());
            assert_ne!(a, b);

            let mut contents = vec![
                std::fs::read(tmp.path().join(&a)).unwrap(),
                std::fs::read(tmp.path().join(&b)).unwrap(),
            ];
            contents.sort();
            assert_eq!(contents, vec![b"one".to_vec(), b"two".to_vec()]);

            let names = storage.list_existing_names().await.unwrap();
            assert_eq!(
                names,
                HashSet::from(["xml_archive.zip".to_string(), "xml_archive_1.zip".to_string()])
            );
        }
    }

    #[tokio::test]
    async fn test_parallel_writers_with_shared_storage() {
        let tmp = TempDir::new().unwrap();
        let storage = std::sync::Arc::new(LocalStorage::new(tmp.path()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let storage = std::sync::Arc::clone(&storage);
                tokio::spawn(async move {
                    storage
                        .write(format!("archive {i}").as_bytes(), "xml_archive.zip")
                        .await
                })
            })
            .collect();

        let mut names = HashSet::new();
        for handle in handles {
            assert!(names.insert(handle.await.unwrap().unwrap()));
        }
        assert_eq!(names.len(), 8);
        assert_eq!(storage.list_existing_names().await.unwrap(), names);
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("xml_archive.zip"), ("xml_archive", ".zip"));
        assert_eq!(split_name("noext"), ("noext", ""));
        assert_eq!(split_name(".hidden"), (".hidden", ""));
    }
}
