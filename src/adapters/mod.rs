// Adapters - External system implementations

pub mod ffprobe_playback;
pub mod fs_persistence;
pub mod http_service;
pub mod in_memory;
pub mod toml_config;

// Re-export adapters
pub use ffprobe_playback::FfprobePlaybackAdapter;
pub use fs_persistence::FsPersistenceAdapter;
pub use http_service::HttpMediaServiceAdapter;
pub use in_memory::{InMemoryMediaService, MemoryPersistence, RecordingPlayback};
pub use toml_config::{ClipFlowConfig, TomlConfigAdapter};
