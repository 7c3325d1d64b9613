// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Suggested filename handed to the persistence collaborator on download
pub const DOWNLOAD_FILENAME: &str = "trimmed_video.mp4";

/// Granularity of the range controls, in seconds
pub const RANGE_STEP_SECONDS: f64 = 0.02;

/// Wire timecode codec (`M:SS`, minutes unpadded, seconds truncated)
pub struct Timecode;

impl Timecode {
    /// Encode a non-negative offset in seconds as `M:SS`
    ///
    /// The fractional part is truncated, so `encode(65.7) == "1:05"`.
    /// Negative and non-finite inputs encode as `0:00`.
    pub fn encode(seconds: f64) -> String {
        let total = if seconds.is_finite() && seconds > 0.0 {
            seconds.floor() as u64
        } else {
            0
        };
        format!("{}:{:02}", total / 60, total % 60)
    }

    /// Decode an `M:SS` timecode back into whole seconds
    pub fn decode(timecode: &str) -> Result<f64, DomainError> {
        let trimmed = timecode.trim();
        let (minutes, seconds) = trimmed.split_once(':').ok_or_else(|| {
            DomainError::BadArgs(format!("Timecode '{}' is not in M:SS form", trimmed))
        })?;

        let minutes = minutes
            .parse::<u64>()
            .map_err(|_| DomainError::BadArgs(format!("Invalid minutes in '{}'", trimmed)))?;
        if seconds.len() != 2 {
            return Err(DomainError::BadArgs(format!(
                "Seconds in '{}' must have two digits",
                trimmed
            )));
        }
        let seconds = seconds
            .parse::<u64>()
            .map_err(|_| DomainError::BadArgs(format!("Invalid seconds in '{}'", trimmed)))?;
        if seconds >= 60 {
            return Err(DomainError::BadArgs(format!(
                "Seconds in '{}' must be less than 60",
                trimmed
            )));
        }

        minutes
            .checked_mul(60)
            .and_then(|total| total.checked_add(seconds))
            .map(|total| total as f64)
            .ok_or_else(|| {
                DomainError::BadArgs(format!("Timecode '{}' is out of range", trimmed))
            })
    }

    /// Parse a user-supplied offset: plain seconds (`12.5`) or a timecode (`1:05`)
    pub fn parse_offset(input: &str) -> Result<f64, DomainError> {
        let trimmed = input.trim();

        if let Ok(seconds) = trimmed.parse::<f64>() {
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(DomainError::BadArgs(
                    "Offset must be a non-negative number of seconds".to_string(),
                ));
            }
            return Ok(seconds);
        }

        Self::decode(trimmed)
    }
}

/// Local media chosen by the user
#[derive(Debug, Clone, PartialEq)]
pub struct MediaBlob {
    pub path: PathBuf,
    pub file_name: String,
}

impl MediaBlob {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload.bin".to_string());
        Self { path, file_name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// The user's chosen input; exactly one is active at a time
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputSelection {
    #[default]
    None,
    LocalFile(MediaBlob),
    RemoteUrl(String),
}

impl InputSelection {
    /// Build a remote selection; blank text means no selection
    pub fn remote(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            InputSelection::None
        } else {
            InputSelection::RemoteUrl(trimmed.to_string())
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, InputSelection::None)
    }

    /// Source string handed to the playback component for a local preview
    pub fn preview_source(&self) -> Option<String> {
        match self {
            InputSelection::None => None,
            InputSelection::LocalFile(blob) => Some(blob.path.to_string_lossy().to_string()),
            InputSelection::RemoteUrl(url) => Some(url.clone()),
        }
    }
}

impl fmt::Display for InputSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSelection::None => write!(f, "<none>"),
            InputSelection::LocalFile(blob) => write!(f, "file:{}", blob.path.display()),
            InputSelection::RemoteUrl(url) => write!(f, "url:{}", url),
        }
    }
}

/// Identifier pair plus playable URL returned by a successful ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResult {
    pub content_id: String,
    pub version_id: String,
    pub preview_url: String,
}

/// The in/out points handed to the trim service, already encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimRequest {
    pub content_id: String,
    pub version_id: String,
    pub start_timecode: String,
    pub end_timecode: String,
}

/// Location of a trimmed artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimResult {
    pub url: String,
}

/// User-chosen `[start, end]` sub-interval, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RangeSelection {
    pub start: f64,
    pub end: f64,
}

impl RangeSelection {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Trim needs a strictly positive span
    pub fn is_trimmable(&self) -> bool {
        self.start < self.end
    }

    /// Whether start and end still differ once truncated to wire timecodes
    pub fn is_distinct_on_wire(&self) -> bool {
        Timecode::encode(self.start) != Timecode::encode(self.end)
    }

    pub fn span(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// Lifecycle of one asynchronous request/response workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowStatus {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowStatus::Idle => "idle",
            WorkflowStatus::InFlight => "in-flight",
            WorkflowStatus::Succeeded => "succeeded",
            WorkflowStatus::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// What to do when the playback component never reports a usable duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetadataPolicy {
    /// Range controls stay disabled until a positive duration arrives
    Disabled,
    /// Range controls open on `[0, max_seconds]`
    Fallback { max_seconds: f64 },
}

impl Default for MetadataPolicy {
    fn default() -> Self {
        MetadataPolicy::Disabled
    }
}

/// Tag carried by every begun request; a completion is applied only when
/// its token still matches the workflow's in-flight token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken {
    pub generation: u64,
    pub sequence: u64,
}

/// Whether a completion changed session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    Applied,
    Discarded,
}

/// Where a downloaded artifact ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    pub location: String,
    pub bytes: usize,
}
