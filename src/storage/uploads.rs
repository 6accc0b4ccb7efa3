use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct UploadedFile {
    pub name: String,
    pub url: String,
    pub size: u64,
}

/// Binary assets referenced from the content document, kept in one flat
/// directory and served statically under `/uploads`.
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create uploads dir {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store bytes under a unique name derived from the original filename.
    pub async fn save_file(&self, original_name: &str, bytes: &[u8]) -> Result<UploadedFile> {
        let name = unique_name(original_name);
        let path = self.dir.join(&name);
        fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write upload {}", path.display()))?;
        Ok(UploadedFile {
            url: format!("/uploads/{}", name),
            size: bytes.len() as u64,
            name,
        })
    }

    pub async fn list(&self) -> Result<Vec<UploadedFile>> {
        let mut files = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            files.push(UploadedFile {
                url: format!("/uploads/{}", name),
                size: metadata.len(),
                name,
            });
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    /// Remove a stored file by name. Returns false when it does not exist
    /// or the name is not a plain filename.
    pub async fn delete(&self, name: &str) -> Result<bool> {
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
            return Ok(false);
        }
        match fs::remove_file(self.dir.join(name)).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to delete upload {}", name))
            }
        }
    }
}

/// Prefix with a UUID and keep only safe filename characters.
fn unique_name(original: &str) -> String {
    let base = Path::new(original)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let safe: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let safe = if safe.is_empty() {
        "file".to_string()
    } else {
        safe
    };
    format!("{}-{}", Uuid::new_v4().simple(), safe)
}
