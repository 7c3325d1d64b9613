// Filesystem persistence adapter - Saves downloaded artifacts to a directory

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Saves artifacts under one directory, never overwriting an existing file
pub struct FsPersistenceAdapter {
    directory: PathBuf,
}

impl FsPersistenceAdapter {
    /// Create new filesystem persistence adapter
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Claim the first free name in the browser style: `name.ext`,
    /// `name (1).ext`, ... The empty placeholder created here holds the name
    /// until the finished download is renamed over it.
    async fn reserve_path(&self, suggested_name: &str) -> Result<PathBuf, DomainError> {
        let suggested = Path::new(suggested_name);
        let stem = suggested
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "download".to_string());
        let extension = suggested
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let mut counter = 0;
        loop {
            let candidate = if counter == 0 {
                self.directory.join(format!("{}{}", stem, extension))
            } else {
                self.directory
                    .join(format!("{} ({}){}", stem, counter, extension))
            };

            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
                .await
            {
                Ok(_) => return Ok(candidate),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => counter += 1,
                Err(e) => return Err(persistence("Failed to reserve download name", e)),
            }
        }
    }
}

fn persistence(context: &str, error: std::io::Error) -> DomainError {
    DomainError::PersistenceFailure(format!("{}: {}", context, error))
}

/// Drop the partial file and release the reserved name
async fn discard(partial: &Path, target: &Path) {
    let _ = tokio::fs::remove_file(partial).await;
    let _ = tokio::fs::remove_file(target).await;
}

#[async_trait]
impl PersistencePort for FsPersistenceAdapter {
    async fn save(&self, bytes: &[u8], suggested_name: &str) -> Result<SavedArtifact, DomainError> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| persistence("Failed to create download directory", e))?;

        let target = self.reserve_path(suggested_name).await?;
        let partial = target.with_extension(format!(
            "{}.part",
            target
                .extension()
                .map(|ext| ext.to_string_lossy().to_string())
                .unwrap_or_default()
        ));

        // Write beside the target, then rename over the placeholder.
        if let Err(e) = tokio::fs::write(&partial, bytes).await {
            discard(&partial, &target).await;
            return Err(persistence("Failed to write download", e));
        }
        if let Err(e) = tokio::fs::rename(&partial, &target).await {
            discard(&partial, &target).await;
            return Err(persistence("Failed to move download into place", e));
        }

        tracing::info!(path = %target.display(), bytes = bytes.len(), "Saved artifact");
        Ok(SavedArtifact {
            location: target.display().to_string(),
            bytes: bytes.len(),
        })
    }
}
