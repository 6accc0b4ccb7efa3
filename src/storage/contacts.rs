//! Contact submissions, persisted as one JSON list, newest first. Every
//! mutation is a load-mutate-write held under a single lock so concurrent
//! requests cannot interleave partial updates.

use crate::models::{ContactRecord, ContactSubmission};
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

pub struct ContactStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ContactStore {
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data dir {}", parent.display()))?;
        }
        Ok(Self {
            path: path.to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    pub async fn list(&self) -> Result<Vec<ContactRecord>> {
        self.read_all().await
    }

    pub async fn get(&self, id: &str) -> Result<Option<ContactRecord>> {
        let contacts = self.read_all().await?;
        Ok(contacts.into_iter().find(|contact| contact.id == id))
    }

    pub async fn unread_count(&self) -> Result<usize> {
        let contacts = self.read_all().await?;
        Ok(contacts.iter().filter(|contact| !contact.read).count())
    }

    /// Persist a new submission at the head of the list.
    pub async fn create(&self, submission: ContactSubmission) -> Result<ContactRecord> {
        let _guard = self.write_lock.lock().await;
        let mut contacts = self.read_all().await?;
        let record = ContactRecord::from_submission(submission);
        contacts.insert(0, record.clone());
        self.write_all(&contacts).await?;
        Ok(record)
    }

    /// Flip the read flag. Returns false when the id is unknown.
    pub async fn mark_read(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut contacts = self.read_all().await?;
        let Some(contact) = contacts.iter_mut().find(|contact| contact.id == id) else {
            return Ok(false);
        };
        contact.read = true;
        self.write_all(&contacts).await?;
        Ok(true)
    }

    /// Remove one record. Returns false when the id is unknown.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut contacts = self.read_all().await?;
        let before = contacts.len();
        contacts.retain(|contact| contact.id != id);
        if contacts.len() == before {
            return Ok(false);
        }
        self.write_all(&contacts).await?;
        Ok(true)
    }

    async fn read_all(&self) -> Result<Vec<ContactRecord>> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("Corrupt contacts file {}", self.path.display())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        }
    }

    async fn write_all(&self, contacts: &[ContactRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(contacts)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .await
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}
