//! System of record for the portfolio document: one JSON file, replaced
//! wholesale on every save, with a rolling set of timestamped backups next
//! to it.

use crate::models::ContentDocument;
use anyhow::{Context, Result};
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

const BACKUP_PREFIX: &str = "content-backup-";
const BACKUP_SUFFIX: &str = ".json";

// Fixed-width and lexically monotonic, so sorting backup filenames as
// strings sorts them chronologically.
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S-%3fZ";

pub struct ContentStore {
    content_path: PathBuf,
    backups_dir: PathBuf,
    max_backups: usize,
    write_lock: Mutex<()>,
}

impl ContentStore {
    pub fn new(data_dir: &Path, max_backups: usize) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data dir {}", data_dir.display()))?;
        Ok(Self {
            content_path: data_dir.join("content.json"),
            backups_dir: data_dir.to_path_buf(),
            max_backups,
            write_lock: Mutex::new(()),
        })
    }

    /// The last-saved document, or `None` if nothing was ever saved.
    pub async fn load(&self) -> Result<Option<ContentDocument>> {
        match fs::read(&self.content_path).await {
            Ok(bytes) => {
                let document = serde_json::from_slice(&bytes).with_context(|| {
                    format!("Corrupt content file {}", self.content_path.display())
                })?;
                Ok(Some(document))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| {
                format!("Failed to read {}", self.content_path.display())
            }),
        }
    }

    pub async fn load_or_default(&self) -> Result<ContentDocument> {
        Ok(self.load().await?.unwrap_or_default())
    }

    /// Replace the stored document. The write is a temp-file rename so
    /// readers never observe a partial file; a timestamped backup is written
    /// afterwards and old backups pruned. Backup failures are logged, not
    /// surfaced.
    pub async fn save(&self, document: &ContentDocument) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let json = serde_json::to_string_pretty(document)?;
        let tmp_path = self.content_path.with_extension("json.tmp");
        fs::write(&tmp_path, &json)
            .await
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.content_path)
            .await
            .with_context(|| format!("Failed to replace {}", self.content_path.display()))?;

        if let Err(err) = self.write_backup(&json).await {
            tracing::warn!(error = %err, "Backup creation failed");
        }
        if let Err(err) = self.prune_backups().await {
            tracing::warn!(error = %err, "Backup cleanup failed");
        }

        Ok(())
    }

    /// Snapshot the current document on demand. Returns the backup filename,
    /// or `None` when there is no document yet.
    pub async fn backup_current(&self) -> Result<Option<String>> {
        let _guard = self.write_lock.lock().await;

        let Some(document) = self.load().await? else {
            return Ok(None);
        };
        let json = serde_json::to_string_pretty(&document)?;
        let path = self.write_backup(&json).await?;
        if let Err(err) = self.prune_backups().await {
            tracing::warn!(error = %err, "Backup cleanup failed");
        }

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Some(name))
    }

    async fn write_backup(&self, json: &str) -> Result<PathBuf> {
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT);
        let path = self
            .backups_dir
            .join(format!("{}{}{}", BACKUP_PREFIX, timestamp, BACKUP_SUFFIX));
        fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write backup {}", path.display()))?;
        Ok(path)
    }

    async fn prune_backups(&self) -> Result<()> {
        let mut names = self.backup_names().await?;
        // Newest first by embedded timestamp.
        names.sort_by(|a, b| b.cmp(a));

        for name in names.iter().skip(self.max_backups) {
            let path = self.backups_dir.join(name);
            if let Err(err) = fs::remove_file(&path).await {
                tracing::warn!(error = %err, backup = %name, "Failed to delete old backup");
            }
        }
        Ok(())
    }

    async fn backup_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.backups_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(BACKUP_PREFIX) && name.ends_with(BACKUP_SUFFIX) {
                names.push(name);
            }
        }
        Ok(names)
    }

    #[cfg(test)]
    async fn backups_sorted(&self) -> Vec<String> {
        let mut names = self.backup_names().await.unwrap();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::About;
    use std::time::Duration;
    use tempfile::tempdir;

    fn document(name: &str) -> ContentDocument {
        ContentDocument {
            about: About {
                name: name.to_string(),
                title: "Engineer".to_string(),
                description: vec![],
            },
            ..Default::default()
        }
    }

    fn store_with(max_backups: usize) -> (ContentStore, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let store = ContentStore::new(temp_dir.path(), max_backups).unwrap();
        (store, temp_dir)
    }

    // Backup names carry millisecond timestamps; keep successive saves in
    // distinct milliseconds.
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(3)).await;
    }

    #[tokio::test]
    async fn absent_file_loads_as_none() {
        let (store, _dir) = store_with(10);
        assert_eq!(store.load().await.unwrap(), None);
        assert_eq!(store.load_or_default().await.unwrap(), ContentDocument::default());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let (store, _dir) = store_with(10);
        let doc = document("Ada");
        store.save(&doc).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(doc));
    }

    #[tokio::test]
    async fn saving_the_loaded_document_changes_nothing_and_adds_one_backup() {
        let (store, dir) = store_with(10);
        store.save(&document("Ada")).await.unwrap();
        let before = std::fs::read_to_string(dir.path().join("content.json")).unwrap();
        settle().await;

        let loaded = store.load().await.unwrap().unwrap();
        store.save(&loaded).await.unwrap();

        let after = std::fs::read_to_string(dir.path().join("content.json")).unwrap();
        assert_eq!(before, after);
        assert_eq!(store.backups_sorted().await.len(), 2);
    }

    #[tokio::test]
    async fn retention_keeps_only_the_newest_backups() {
        let (store, _dir) = store_with(3);

        let mut seen: Vec<String> = Vec::new();
        for i in 0..5 {
            store.save(&document(&format!("v{}", i))).await.unwrap();
            for name in store.backups_sorted().await {
                if !seen.contains(&name) {
                    seen.push(name);
                }
            }
            settle().await;
        }

        assert_eq!(seen.len(), 5);
        let kept = store.backups_sorted().await;
        // Exactly the three most recently written backups survive.
        assert_eq!(kept, seen[2..].to_vec());
    }

    #[tokio::test]
    async fn manual_backup_requires_a_document() {
        let (store, _dir) = store_with(10);
        assert_eq!(store.backup_current().await.unwrap(), None);

        store.save(&document("Ada")).await.unwrap();
        settle().await;
        let name = store.backup_current().await.unwrap().unwrap();
        assert!(name.starts_with(BACKUP_PREFIX));
        assert!(name.ends_with(BACKUP_SUFFIX));
        assert_eq!(store.backups_sorted().await.len(), 2);
    }

    #[tokio::test]
    async fn corrupt_content_file_is_an_error() {
        let (store, dir) = store_with(10);
        std::fs::write(dir.path().join("content.json"), "not json").unwrap();
        assert!(store.load().await.is_err());
    }
}
