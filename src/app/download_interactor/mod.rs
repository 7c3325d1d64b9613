// Download interactor - Fetches a trimmed artifact and persists it

use std::sync::Arc;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Hands the bytes behind a result URL to the persistence collaborator
pub struct DownloadCoordinator {
    fetch_port: Arc<dyn ArtifactFetchPort>,
    persistence_port: Arc<dyn PersistencePort>,
}

impl DownloadCoordinator {
    /// Create new download coordinator with injected ports
    pub fn new(
        fetch_port: Arc<dyn ArtifactFetchPort>,
        persistence_port: Arc<dyn PersistencePort>,
    ) -> Self {
        Self {
            fetch_port,
            persistence_port,
        }
    }

    /// Fetch `url` and save it as [`DOWNLOAD_FILENAME`]
    pub async fn download(&self, url: &str) -> Result<SavedArtifact, DomainError> {
        tracing::info!(%url, "Downloading trimmed video");
        let bytes = self.fetch_port.fetch(url).await?;
        self.persistence_port.save(&bytes, DOWNLOAD_FILENAME).await
    }
}
