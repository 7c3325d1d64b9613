//! In-memory adapters
//!
//! Scriptable stand-ins for the service, playback and persistence
//! collaborators. Every call is recorded so callers can assert on what the
//! workflow sent.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One call received by [`InMemoryMediaService`]
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceCall {
    IngestBytes { file_name: String, size: usize },
    IngestUrl(String),
    Trim(TrimRequest),
    Fetch(String),
}

/// Media service answering from queues of scripted replies
#[derive(Default)]
pub struct InMemoryMediaService {
    ingest_replies: Mutex<VecDeque<Result<IngestResult, DomainError>>>,
    trim_replies: Mutex<VecDeque<Result<TrimResult, DomainError>>>,
    fetch_replies: Mutex<VecDeque<Result<Vec<u8>, DomainError>>>,
    calls: Mutex<Vec<ServiceCall>>,
}

impl InMemoryMediaService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ingest(&self, reply: Result<IngestResult, DomainError>) {
        guard(&self.ingest_replies).push_back(reply);
    }

    pub fn push_trim(&self, reply: Result<TrimResult, DomainError>) {
        guard(&self.trim_replies).push_back(reply);
    }

    pub fn push_fetch(&self, reply: Result<Vec<u8>, DomainError>) {
        guard(&self.fetch_replies).push_back(reply);
    }

    pub fn calls(&self) -> Vec<ServiceCall> {
        guard(&self.calls).clone()
    }

    /// Trim requests received so far
    pub fn trim_requests(&self) -> Vec<TrimRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ServiceCall::Trim(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ServiceCall) {
        guard(&self.calls).push(call);
    }

    fn unscripted(what: &str) -> DomainError {
        DomainError::TransportFailure(format!("no scripted reply for {}", what))
    }
}

#[async_trait]
impl MediaServicePort for InMemoryMediaService {
    async fn ingest_bytes(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<IngestResult, DomainError> {
        self.record(ServiceCall::IngestBytes {
            file_name: file_name.to_string(),
            size: bytes.len(),
        });
        guard(&self.ingest_replies)
            .pop_front()
            .unwrap_or_else(|| Err(Self::unscripted("ingest")))
    }

    async fn ingest_url(&self, url: &str) -> Result<IngestResult, DomainError> {
        self.record(ServiceCall::IngestUrl(url.to_string()));
        guard(&self.ingest_replies)
            .pop_front()
            .unwrap_or_else(|| Err(Self::unscripted("ingest")))
    }

    async fn trim(&self, request: &TrimRequest) -> Result<TrimResult, DomainError> {
        self.record(ServiceCall::Trim(request.clone()));
        guard(&self.trim_replies)
            .pop_front()
            .unwrap_or_else(|| Err(Self::unscripted("trim")))
    }
}

#[async_trait]
impl ArtifactFetchPort for InMemoryMediaService {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DomainError> {
        self.record(ServiceCall::Fetch(url.to_string()));
        guard(&self.fetch_replies)
            .pop_front()
            .unwrap_or_else(|| Err(Self::unscripted("fetch")))
    }
}

/// Playback command seen by [`RecordingPlayback`]
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackCommand {
    Load(String),
    Unload,
    Seek(f64),
}

/// Playback component that records commands and reports a scripted duration
#[derive(Default)]
pub struct RecordingPlayback {
    duration: Mutex<Option<f64>>,
    commands: Mutex<Vec<PlaybackCommand>>,
}

impl RecordingPlayback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(seconds: f64) -> Self {
        let playback = Self::default();
        playback.set_duration(Some(seconds));
        playback
    }

    pub fn set_duration(&self, seconds: Option<f64>) {
        *guard(&self.duration) = seconds;
    }

    pub fn commands(&self) -> Vec<PlaybackCommand> {
        guard(&self.commands).clone()
    }

    /// Offsets of every seek, in order
    pub fn seeks(&self) -> Vec<f64> {
        self.commands()
            .into_iter()
            .filter_map(|command| match command {
                PlaybackCommand::Seek(offset) => Some(offset),
                _ => None,
            })
            .collect()
    }

    /// Most recently loaded source, unless unloaded since
    pub fn current_source(&self) -> Option<String> {
        let mut current = None;
        for command in self.commands() {
            match command {
                PlaybackCommand::Load(source) => current = Some(source),
                PlaybackCommand::Unload => current = None,
                PlaybackCommand::Seek(_) => {}
            }
        }
        current
    }
}

#[async_trait]
impl PlaybackPort for RecordingPlayback {
    fn load(&self, source: &str) {
        guard(&self.commands).push(PlaybackCommand::Load(source.to_string()));
    }

    fn unload(&self) {
        guard(&self.commands).push(PlaybackCommand::Unload);
    }

    fn seek(&self, offset: f64) {
        guard(&self.commands).push(PlaybackCommand::Seek(offset));
    }

    async fn await_duration(&self) -> Option<f64> {
        *guard(&self.duration)
    }
}

/// Persistence collaborator keeping saved artifacts in memory
#[derive(Default)]
pub struct MemoryPersistence {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
    failure: Mutex<Option<String>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following save fail with `message`
    pub fn fail_with(&self, message: &str) {
        *guard(&self.failure) = Some(message.to_string());
    }

    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        guard(&self.saved).clone()
    }
}

#[async_trait]
impl PersistencePort for MemoryPersistence {
    async fn save(&self, bytes: &[u8], suggested_name: &str) -> Result<SavedArtifact, DomainError> {
        if let Some(message) = guard(&self.failure).clone() {
            return Err(DomainError::PersistenceFailure(message));
        }
        guard(&self.saved).push((suggested_name.to_string(), bytes.to_vec()));
        Ok(SavedArtifact {
            location: format!("memory://{}", suggested_name),
            bytes: bytes.len(),
        })
    }
}
