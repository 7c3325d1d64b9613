//! Workflow session - the single controller owning all page state
//!
//! Every user action and collaborator callback is a method here; nothing
//! else mutates the selection, the two workflows, the duration or the range.
//! Requests are split into `begin_*` / `complete_*` so a response can be
//! checked against the request token that is current when it arrives.

use std::path::PathBuf;
use std::sync::Arc;

use crate::app::download_interactor::DownloadCoordinator;
use crate::app::trim_interactor::{TrimInteractor, TrimTicket, TrimWorkflow};
use crate::app::upload_interactor::{UploadInteractor, UploadTicket, UploadWorkflow};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::{DurationUpdate, MediaMetadataTracker, RangeSelector};
use crate::ports::*;

pub const PROMPT_SELECT_FILE: &str = "Please select a file to upload.";
pub const PROMPT_UPLOAD_AND_RANGE: &str = "Please upload a file and specify start and end times.";
pub const MSG_UPLOAD_FAILED: &str = "Error uploading file";
pub const MSG_TRIM_FAILED: &str = "Error trimming video";
pub const MSG_TRIM_SUCCEEDED: &str = "Video trimmed successfully";
pub const MSG_DOWNLOAD_FAILED: &str = "Error downloading video";

/// Collaborators a session talks to
pub struct SessionPorts {
    pub media_service: Arc<dyn MediaServicePort>,
    pub artifact_fetch: Arc<dyn ArtifactFetchPort>,
    pub playback: Arc<dyn PlaybackPort>,
    pub persistence: Arc<dyn PersistencePort>,
}

/// Snapshot of what the page shows
#[derive(Debug, Clone, PartialEq)]
pub struct ControlsView {
    pub upload_enabled: bool,
    pub upload_label: &'static str,
    pub preview_visible: bool,
    pub trim_section_visible: bool,
    pub duration_label: String,
    pub start_label: String,
    pub end_label: String,
    pub range_enabled: bool,
    pub range_max: f64,
    pub range_step: f64,
    pub trim_enabled: bool,
    pub trim_label: &'static str,
    pub message: String,
    pub trimmed_url: Option<String>,
}

pub struct WorkflowSession {
    selection: InputSelection,
    generation: u64,
    sequence: u64,
    upload: UploadWorkflow,
    metadata: MediaMetadataTracker,
    range: RangeSelector,
    trim: TrimWorkflow,
    message: Option<String>,
    upload_interactor: UploadInteractor,
    trim_interactor: TrimInteractor,
    downloader: DownloadCoordinator,
    playback: Arc<dyn PlaybackPort>,
}

impl WorkflowSession {
    pub fn new(ports: SessionPorts, policy: MetadataPolicy) -> Self {
        Self {
            selection: InputSelection::None,
            generation: 0,
            sequence: 0,
            upload: UploadWorkflow::new(),
            metadata: MediaMetadataTracker::new(policy),
            range: RangeSelector::new(),
            trim: TrimWorkflow::new(),
            message: None,
            upload_interactor: UploadInteractor::new(Arc::clone(&ports.media_service)),
            trim_interactor: TrimInteractor::new(ports.media_service),
            downloader: DownloadCoordinator::new(ports.artifact_fetch, ports.persistence),
            playback: ports.playback,
        }
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    pub fn select_local_file(&mut self, path: impl Into<PathBuf>) {
        self.select(InputSelection::LocalFile(MediaBlob::new(path)));
    }

    /// Blank text clears the selection
    pub fn select_remote_url(&mut self, text: &str) {
        self.select(InputSelection::remote(text));
    }

    pub fn clear_selection(&mut self) {
        self.select(InputSelection::None);
    }

    fn select(&mut self, selection: InputSelection) {
        self.generation += 1;
        self.upload.reset();
        self.metadata.reset();
        self.range.reset();
        self.trim.reset();
        self.message = None;

        match selection.preview_source() {
            Some(source) => self.playback.load(&source),
            None => self.playback.unload(),
        }
        tracing::info!(generation = self.generation, selection = %selection, "Input selected");
        self.selection = selection;
    }

    // ---------------------------------------------------------------------
    // Upload
    // ---------------------------------------------------------------------

    pub fn begin_upload(&mut self) -> Result<UploadTicket, DomainError> {
        if self.selection.is_none() {
            self.message = Some(PROMPT_SELECT_FILE.to_string());
            tracing::warn!("Upload requested with no selection");
            return Err(DomainError::NoSelection);
        }

        let token = self.next_token();
        let ticket = self.upload.begin(&self.selection, token)?;
        tracing::debug!(?token, "Upload in flight");
        Ok(ticket)
    }

    pub fn complete_upload(
        &mut self,
        ticket: &UploadTicket,
        outcome: Result<IngestResult, DomainError>,
    ) -> CompletionOutcome {
        let error = outcome.as_ref().err().cloned();
        if self.upload.complete(ticket.token, outcome) == CompletionOutcome::Discarded {
            tracing::debug!(token = ?ticket.token, "Discarding stale upload response");
            return CompletionOutcome::Discarded;
        }

        match (self.upload.result().cloned(), error) {
            (Some(ingest), _) => {
                // Fresh media: old duration, range and trim no longer apply.
                self.trim.reset();
                self.range.reset();
                self.metadata.arm();
                self.playback.load(&ingest.preview_url);
                tracing::info!(
                    content_id = %ingest.content_id,
                    version_id = %ingest.version_id,
                    "Upload succeeded"
                );
            }
            (None, error) => {
                self.message = Some(MSG_UPLOAD_FAILED.to_string());
                if let Some(error) = error {
                    tracing::error!(%error, remote = error.is_remote(), "Upload failed");
                }
            }
        }
        CompletionOutcome::Applied
    }

    /// Begin, perform and complete an upload of the current selection
    pub async fn upload(&mut self) -> Result<CompletionOutcome, DomainError> {
        let ticket = self.begin_upload()?;
        let outcome = self.upload_interactor.execute(&ticket).await;
        let error = outcome.as_ref().err().cloned();

        match (self.complete_upload(&ticket, outcome), error) {
            (CompletionOutcome::Applied, Some(error)) => Err(error),
            (completion, _) => Ok(completion),
        }
    }

    // ---------------------------------------------------------------------
    // Metadata and range
    // ---------------------------------------------------------------------

    /// Duration notification from the playback component; returns whether the
    /// range was (re)initialized
    pub fn on_duration_known(&mut self, seconds: f64) -> bool {
        let update = self.metadata.on_duration_known(seconds);
        self.apply_duration(update)
    }

    /// The playback component will not report a duration for this media
    pub fn on_metadata_unavailable(&mut self) -> bool {
        let update = self.metadata.on_metadata_unavailable();
        self.apply_duration(update)
    }

    fn apply_duration(&mut self, update: DurationUpdate) -> bool {
        match update {
            DurationUpdate::Initialized(seconds) => {
                self.range.initialize(seconds);
                tracing::info!(duration = seconds, "Range initialized");
                true
            }
            DurationUpdate::Unchanged => false,
        }
    }

    pub fn set_start(&mut self, value: f64) -> bool {
        match self.range.set_start(value) {
            Some(accepted) => {
                self.playback.seek(accepted);
                true
            }
            None => {
                tracing::debug!(value, range = ?self.range.range(), "Start change dropped");
                false
            }
        }
    }

    pub fn set_end(&mut self, value: f64) -> bool {
        match self.range.set_end(value) {
            Some(accepted) => {
                self.playback.seek(accepted);
                true
            }
            None => {
                tracing::debug!(value, range = ?self.range.range(), "End change dropped");
                false
            }
        }
    }

    // ---------------------------------------------------------------------
    // Trim
    // ---------------------------------------------------------------------

    pub fn begin_trim(&mut self) -> Result<TrimTicket, DomainError> {
        if self.trim.status() == WorkflowStatus::InFlight {
            return Err(DomainError::WorkflowBusy(
                "a trim is already in flight".to_string(),
            ));
        }
        if self.selection.is_none() {
            self.message = Some(PROMPT_UPLOAD_AND_RANGE.to_string());
            return Err(DomainError::NoSelection);
        }

        let ingest = match self.upload.status() {
            WorkflowStatus::Succeeded => self.upload.result().cloned(),
            _ => None,
        };
        let token = self.next_token();
        match self.trim.begin(ingest.as_ref(), &self.range, token) {
            Ok(ticket) => {
                tracing::debug!(?token, "Trim in flight");
                Ok(ticket)
            }
            Err(error) => {
                self.message = Some(PROMPT_UPLOAD_AND_RANGE.to_string());
                tracing::warn!(%error, "Trim refused");
                Err(error)
            }
        }
    }

    pub fn complete_trim(
        &mut self,
        ticket: &TrimTicket,
        outcome: Result<TrimResult, DomainError>,
    ) -> CompletionOutcome {
        let error = outcome.as_ref().err().cloned();
        if self.trim.complete(ticket.token, outcome) == CompletionOutcome::Discarded {
            tracing::debug!(token = ?ticket.token, "Discarding stale trim response");
            return CompletionOutcome::Discarded;
        }

        match (self.trim.result(), error) {
            (Some(result), _) => {
                tracing::info!(url = %result.url, "Trim succeeded");
                self.message = Some(MSG_TRIM_SUCCEEDED.to_string());
            }
            (None, error) => {
                if let Some(error) = error {
                    tracing::error!(%error, remote = error.is_remote(), "Trim failed");
                }
                self.message = Some(MSG_TRIM_FAILED.to_string());
            }
        }
        CompletionOutcome::Applied
    }

    /// Begin, perform and complete a trim of the current range
    pub async fn trim(&mut self) -> Result<CompletionOutcome, DomainError> {
        let ticket = self.begin_trim()?;
        let outcome = self.trim_interactor.execute(&ticket).await;
        let error = outcome.as_ref().err().cloned();

        match (self.complete_trim(&ticket, outcome), error) {
            (CompletionOutcome::Applied, Some(error)) => Err(error),
            (completion, _) => Ok(completion),
        }
    }

    // ---------------------------------------------------------------------
    // Download
    // ---------------------------------------------------------------------

    /// Download the current trim result
    pub async fn download(&mut self) -> Result<SavedArtifact, DomainError> {
        let url = self
            .trim
            .result()
            .map(|result| result.url.clone())
            .ok_or(DomainError::NothingToDownload)?;
        self.download_url(&url).await
    }

    /// Download an arbitrary result URL; never touches the trim result
    pub async fn download_url(&mut self, url: &str) -> Result<SavedArtifact, DomainError> {
        match self.downloader.download(url).await {
            Ok(saved) => Ok(saved),
            Err(error) => {
                tracing::error!(%error, %url, "Download failed");
                self.message = Some(MSG_DOWNLOAD_FAILED.to_string());
                Err(error)
            }
        }
    }

    // ---------------------------------------------------------------------
    // Read side
    // ---------------------------------------------------------------------

    pub fn selection(&self) -> &InputSelection {
        &self.selection
    }

    pub fn ingest_result(&self) -> Option<&IngestResult> {
        self.upload.result()
    }

    pub fn duration(&self) -> Option<f64> {
        self.metadata.duration()
    }

    pub fn range(&self) -> RangeSelection {
        self.range.range()
    }

    pub fn trim_result(&self) -> Option<&TrimResult> {
        self.trim.result()
    }

    pub fn upload_status(&self) -> WorkflowStatus {
        self.upload.status()
    }

    pub fn trim_status(&self) -> WorkflowStatus {
        self.trim.status()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn view(&self) -> ControlsView {
        let range = self.range.range();
        let uploading = self.upload.status() == WorkflowStatus::InFlight;
        let trimming = self.trim.status() == WorkflowStatus::InFlight;
        let uploaded = self.upload.status() == WorkflowStatus::Succeeded;

        ControlsView {
            upload_enabled: !self.selection.is_none() && !uploading,
            upload_label: if uploading { "Uploading..." } else { "Upload" },
            preview_visible: !self.selection.is_none(),
            trim_section_visible: self.upload.result().is_some(),
            duration_label: Timecode::encode(self.metadata.duration().unwrap_or(0.0)),
            start_label: Timecode::encode(range.start),
            end_label: Timecode::encode(range.end),
            range_enabled: self.range.is_actionable(),
            range_max: self.range.upper_bound().unwrap_or(0.0),
            range_step: RANGE_STEP_SECONDS,
            trim_enabled: uploaded
                && self.range.is_trimmable()
                && range.is_distinct_on_wire()
                && !trimming,
            trim_label: if trimming { "Trimming..." } else { "Trim Video" },
            message: self.message.clone().unwrap_or_default(),
            trimmed_url: self.trim.result().map(|result| result.url.clone()),
        }
    }

    fn next_token(&mut self) -> RequestToken {
        self.sequence += 1;
        RequestToken {
            generation: self.generation,
            sequence: self.sequence,
        }
    }
}
