//! ClipFlow media trimming client library
//!
//! Drives the select, upload, range and trim workflow against a remote media
//! service and persists the trimmed result locally.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::session::{ControlsView, SessionPorts, WorkflowSession};
pub use domain::errors::DomainError;
pub use domain::model::{IngestResult, InputSelection, RangeSelection, Timecode, TrimResult};
pub use error::{ClipFlowError, ClipFlowResult};
