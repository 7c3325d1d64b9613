// Upload interactor - Orchestrates media ingestion use case

use std::sync::Arc;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// A begun upload: what to send and the token its completion must match
#[derive(Debug, Clone, PartialEq)]
pub struct UploadTicket {
    pub token: RequestToken,
    pub source: InputSelection,
}

/// Upload status lifecycle: `Idle -> InFlight -> {Succeeded | Failed}`
#[derive(Debug, Clone, Default)]
pub struct UploadWorkflow {
    status: WorkflowStatus,
    result: Option<IngestResult>,
    in_flight: Option<RequestToken>,
}

impl UploadWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    /// Identifier pair of the last successful upload
    pub fn result(&self) -> Option<&IngestResult> {
        self.result.as_ref()
    }

    /// Back to `Idle`; an outstanding request becomes stale
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Move to `InFlight` for `source`
    pub fn begin(
        &mut self,
        source: &InputSelection,
        token: RequestToken,
    ) -> Result<UploadTicket, DomainError> {
        if source.is_none() {
            return Err(DomainError::NoSelection);
        }
        if self.status == WorkflowStatus::InFlight {
            return Err(DomainError::WorkflowBusy(
                "an upload is already in flight".to_string(),
            ));
        }

        self.status = WorkflowStatus::InFlight;
        self.in_flight = Some(token);
        Ok(UploadTicket {
            token,
            source: source.clone(),
        })
    }

    /// Apply a response, unless it belongs to a request this workflow no
    /// longer waits for
    pub fn complete(
        &mut self,
        token: RequestToken,
        outcome: Result<IngestResult, DomainError>,
    ) -> CompletionOutcome {
        if self.in_flight != Some(token) {
            return CompletionOutcome::Discarded;
        }

        self.in_flight = None;
        match outcome {
            Ok(result) => {
                self.status = WorkflowStatus::Succeeded;
                self.result = Some(result);
            }
            Err(_) => {
                self.status = WorkflowStatus::Failed;
                self.result = None;
            }
        }
        CompletionOutcome::Applied
    }
}

/// Interactor performing the ingestion call for a ticket
pub struct UploadInteractor {
    media_service: Arc<dyn MediaServicePort>,
}

impl UploadInteractor {
    /// Create new upload interactor with injected ports
    pub fn new(media_service: Arc<dyn MediaServicePort>) -> Self {
        Self { media_service }
    }

    /// Send the ticket's source to the ingestion service
    pub async fn execute(&self, ticket: &UploadTicket) -> Result<IngestResult, DomainError> {
        match &ticket.source {
            InputSelection::None => Err(DomainError::NoSelection),
            InputSelection::LocalFile(blob) => {
                let bytes = tokio::fs::read(blob.path()).await.map_err(|e| {
                    DomainError::SourceUnreadable(format!("{}: {}", blob.path().display(), e))
                })?;
                tracing::info!(
                    file = %blob.file_name,
                    size = bytes.len(),
                    "Uploading local media"
                );
                self.media_service
                    .ingest_bytes(&blob.file_name, bytes)
                    .await
            }
            InputSelection::RemoteUrl(url) => {
                tracing::info!(%url, "Submitting remote media for ingestion");
                self.media_service.ingest_url(url).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::in_memory::{InMemoryMediaService, ServiceCall};

    fn token(sequence: u64) -> RequestToken {
        RequestToken {
            generation: 1,
            sequence,
        }
    }

    fn ingest() -> IngestResult {
        IngestResult {
            content_id: "c1".to_string(),
            version_id: "v1".to_string(),
            preview_url: "u1".to_string(),
        }
    }

    #[test]
    fn test_begin_requires_selection() {
        let mut workflow = UploadWorkflow::new();
        assert_eq!(
            workflow.begin(&InputSelection::None, token(1)),
            Err(DomainError::NoSelection)
        );
        assert_eq!(workflow.status(), WorkflowStatus::Idle);
    }

    #[test]
    fn test_reentrant_begin_is_refused() {
        let mut workflow = UploadWorkflow::new();
        let source = InputSelection::remote("https://cdn.example/a.mp4");
        workflow.begin(&source, token(1)).unwrap();
        assert!(matches!(
            workflow.begin(&source, token(2)),
            Err(DomainError::WorkflowBusy(_))
        ));
        assert_eq!(workflow.status(), WorkflowStatus::InFlight);
    }

    #[test]
    fn test_complete_success_and_failure() {
        let mut workflow = UploadWorkflow::new();
        let source = InputSelection::remote("https://cdn.example/a.mp4");

        let ticket = workflow.begin(&source, token(1)).unwrap();
        assert_eq!(
            workflow.complete(ticket.token, Ok(ingest())),
            CompletionOutcome::Applied
        );
        assert_eq!(workflow.status(), WorkflowStatus::Succeeded);
        assert_eq!(workflow.result(), Some(&ingest()));

        let retry = workflow.begin(&source, token(2)).unwrap();
        workflow.complete(
            retry.token,
            Err(DomainError::ServiceRejected {
                status: 500,
                message: "boom".to_string(),
            }),
        );
        assert_eq!(workflow.status(), WorkflowStatus::Failed);
        assert_eq!(workflow.result(), None);
    }

    #[test]
    fn test_unknown_token_is_discarded() {
        let mut workflow = UploadWorkflow::new();
        let source = InputSelection::remote("https://cdn.example/a.mp4");
        let ticket = workflow.begin(&source, token(1)).unwrap();
        workflow.reset();

        assert_eq!(
            workflow.complete(ticket.token, Ok(ingest())),
            CompletionOutcome::Discarded
        );
        assert_eq!(workflow.status(), WorkflowStatus::Idle);
        assert_eq!(workflow.result(), None);
    }

    #[tokio::test]
    async fn test_execute_reads_local_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"0123456789").unwrap();

        let service = Arc::new(InMemoryMediaService::new());
        service.push_ingest(Ok(ingest()));
        let interactor = UploadInteractor::new(service.clone());

        let ticket = UploadTicket {
            token: token(1),
            source: InputSelection::LocalFile(MediaBlob::new(&path)),
        };
        assert_eq!(interactor.execute(&ticket).await.unwrap(), ingest());
        assert_eq!(
            service.calls(),
            vec![ServiceCall::IngestBytes {
                file_name: "clip.mp4".to_string(),
                size: 10,
            }]
        );
    }

    #[tokio::test]
    async fn test_execute_unreadable_file() {
        let service = Arc::new(InMemoryMediaService::new());
        let interactor = UploadInteractor::new(service.clone());
        let ticket = UploadTicket {
            token: token(1),
            source: InputSelection::LocalFile(MediaBlob::new("/no/such/clip.mp4")),
        };

        assert!(matches!(
            interactor.execute(&ticket).await,
            Err(DomainError::SourceUnreadable(_))
        ));
        assert!(service.calls().is_empty());
    }
}
