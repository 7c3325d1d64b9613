use std::sync::Arc;

use crate::adapters::toml_config::ClipFlowConfig;
use crate::adapters::{FfprobePlaybackAdapter, FsPersistenceAdapter, HttpMediaServiceAdapter};
use crate::app::session::{SessionPorts, WorkflowSession};
use crate::domain::model::MetadataPolicy;
use crate::error::ClipFlowResult;
use crate::ports::{ArtifactFetchPort, MediaServicePort, PersistencePort, PlaybackPort};

pub trait AppContainer: Send + Sync {
    /// A fresh session wired to this container's collaborators
    fn new_session(&self) -> WorkflowSession;
    fn playback(&self) -> Arc<dyn PlaybackPort>;
}

pub struct DefaultAppContainer {
    media_service: Arc<HttpMediaServiceAdapter>,
    playback: Arc<FfprobePlaybackAdapter>,
    persistence: Arc<FsPersistenceAdapter>,
    metadata_policy: MetadataPolicy,
}

impl DefaultAppContainer {
    /// Wire the production adapters; fails only if the HTTP client cannot be built
    pub fn from_config(config: &ClipFlowConfig) -> ClipFlowResult<Self> {
        let media_service = Arc::new(HttpMediaServiceAdapter::new(config.service.clone())?);
        let playback = Arc::new(FfprobePlaybackAdapter::new(&config.playback));
        let persistence = Arc::new(FsPersistenceAdapter::new(&config.download.directory));

        tracing::debug!(
            base_url = %config.service.base_url,
            download_dir = %config.download.directory.display(),
            "Application container ready"
        );

        Ok(Self {
            media_service,
            playback,
            persistence,
            metadata_policy: config.metadata.policy(),
        })
    }
}

impl AppContainer for DefaultAppContainer {
    fn new_session(&self) -> WorkflowSession {
        WorkflowSession::new(
            SessionPorts {
                media_service: Arc::clone(&self.media_service) as Arc<dyn MediaServicePort>,
                artifact_fetch: Arc::clone(&self.media_service) as Arc<dyn ArtifactFetchPort>,
                playback: Arc::clone(&self.playback) as Arc<dyn PlaybackPort>,
                persistence: Arc::clone(&self.persistence) as Arc<dyn PersistencePort>,
            },
            self.metadata_policy,
        )
    }

    fn playback(&self) -> Arc<dyn PlaybackPort> {
        Arc::clone(&self.playback) as Arc<dyn PlaybackPort>
    }
}
