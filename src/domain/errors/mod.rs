// Domain errors - Error types for the workflow layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// An action needing an input was attempted with nothing selected
    NoSelection,
    /// Trim attempted with `start >= end`, before the duration is known,
    /// or without a successful upload behind it
    InvalidRange(String),
    /// The workflow already has a request in flight
    WorkflowBusy(String),
    /// The selected local file could not be read
    SourceUnreadable(String),
    /// Network-level failure contacting a service
    TransportFailure(String),
    /// Service answered with a non-success status
    ServiceRejected { status: u16, message: String },
    /// Service answered successfully but the body could not be decoded
    MalformedResponse(String),
    /// Saving a downloaded artifact failed
    PersistenceFailure(String),
    /// Download requested with no trimmed artifact available
    NothingToDownload,
    /// Invalid arguments provided
    BadArgs(String),
}

impl DomainError {
    /// Whether the error came from talking to a remote service
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            DomainError::TransportFailure(_)
                | DomainError::ServiceRejected { .. }
                | DomainError::MalformedResponse(_)
        )
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NoSelection => write!(f, "No input selected"),
            DomainError::InvalidRange(msg) => write!(f, "Invalid range: {}", msg),
            DomainError::WorkflowBusy(msg) => write!(f, "Workflow busy: {}", msg),
            DomainError::SourceUnreadable(msg) => write!(f, "Source unreadable: {}", msg),
            DomainError::TransportFailure(msg) => write!(f, "Transport failure: {}", msg),
            DomainError::ServiceRejected { status, message } => {
                write!(f, "Service rejected request (HTTP {}): {}", status, message)
            }
            DomainError::MalformedResponse(msg) => write!(f, "Malformed response: {}", msg),
            DomainError::PersistenceFailure(msg) => write!(f, "Persistence failure: {}", msg),
            DomainError::NothingToDownload => write!(f, "No trimmed video to download"),
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_classification() {
        assert!(DomainError::TransportFailure("refused".to_string()).is_remote());
        assert!(DomainError::ServiceRejected {
            status: 502,
            message: "bad gateway".to_string()
        }
        .is_remote());
        assert!(!DomainError::NoSelection.is_remote());
        assert!(!DomainError::PersistenceFailure("disk full".to_string()).is_remote());
    }

    #[test]
    fn test_display() {
        let error = DomainError::ServiceRejected {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Service rejected request (HTTP 500): boom"
        );
    }
}
