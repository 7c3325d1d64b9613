// Ports - Interface definitions (contracts)

use crate::domain::errors::*;
use crate::domain::model::*;
use async_trait::async_trait;

/// Port for the remote media ingestion/trim service
#[async_trait]
pub trait MediaServicePort: Send + Sync {
    /// Ingest raw media bytes
    async fn ingest_bytes(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<IngestResult, DomainError>;

    /// Ingest media the service fetches itself from `url`
    async fn ingest_url(&self, url: &str) -> Result<IngestResult, DomainError>;

    /// Cut `[start_timecode, end_timecode]` out of an ingested asset
    async fn trim(&self, request: &TrimRequest) -> Result<TrimResult, DomainError>;
}

/// Port for retrieving the bytes behind a result URL
#[async_trait]
pub trait ArtifactFetchPort: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DomainError>;
}

/// Port for the media playback component.
///
/// `load`, `unload` and `seek` are fire-and-forget UI commands; the duration
/// notification is awaited separately.
#[async_trait]
pub trait PlaybackPort: Send + Sync {
    /// Start loading a new source (local path or URL)
    fn load(&self, source: &str);

    /// Drop the current source
    fn unload(&self);

    /// Move the playhead
    fn seek(&self, offset: f64);

    /// Wait for the loaded source's duration; `None` if it never becomes known
    async fn await_duration(&self) -> Option<f64>;
}

/// Port for saving an artifact to the user's device
#[async_trait]
pub trait PersistencePort: Send + Sync {
    async fn save(&self, bytes: &[u8], suggested_name: &str) -> Result<SavedArtifact, DomainError>;
}
