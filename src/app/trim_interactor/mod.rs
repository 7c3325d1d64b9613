// Trim interactor - Orchestrates server-side trim use case

use std::sync::Arc;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::RangeSelector;
use crate::ports::*;

/// A begun trim; the request is frozen when the ticket is issued
#[derive(Debug, Clone, PartialEq)]
pub struct TrimTicket {
    pub token: RequestToken,
    pub request: TrimRequest,
}

/// Trim status lifecycle: `Idle -> InFlight -> {Succeeded | Failed}`
#[derive(Debug, Clone, Default)]
pub struct TrimWorkflow {
    status: WorkflowStatus,
    result: Option<TrimResult>,
    in_flight: Option<RequestToken>,
}

impl TrimWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    pub fn result(&self) -> Option<&TrimResult> {
        self.result.as_ref()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Validate preconditions and freeze the request
    pub fn begin(
        &mut self,
        ingest: Option<&IngestResult>,
        range: &RangeSelector,
        token: RequestToken,
    ) -> Result<TrimTicket, DomainError> {
        if self.status == WorkflowStatus::InFlight {
            return Err(DomainError::WorkflowBusy(
                "a trim is already in flight".to_string(),
            ));
        }
        let ingest = ingest.ok_or_else(|| {
            DomainError::InvalidRange("no successfully uploaded media to trim".to_string())
        })?;
        if !range.is_actionable() {
            return Err(DomainError::InvalidRange(
                "media duration is not known yet".to_string(),
            ));
        }
        let selection = range.range();
        if !selection.is_trimmable() {
            return Err(DomainError::InvalidRange(format!(
                "start ({}) must be before end ({})",
                Timecode::encode(selection.start),
                Timecode::encode(selection.end)
            )));
        }

        if !selection.is_distinct_on_wire() {
            return Err(DomainError::InvalidRange(format!(
                "start and end both encode as {}",
                Timecode::encode(selection.start)
            )));
        }

        let request = TrimRequest {
            content_id: ingest.content_id.clone(),
            version_id: ingest.version_id.clone(),
            start_timecode: Timecode::encode(selection.start),
            end_timecode: Timecode::encode(selection.end),
        };
        self.status = WorkflowStatus::InFlight;
        self.in_flight = Some(token);
        Ok(TrimTicket { token, request })
    }

    pub fn complete(
        &mut self,
        token: RequestToken,
        outcome: Result<TrimResult, DomainError>,
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

/// Interactor performing the trim call for a ticket
pub struct TrimInteractor {
    media_service: Arc<dyn MediaServicePort>,
}

impl TrimInteractor {
    /// Create new trim interactor with injected ports
    pub fn new(media_service: Arc<dyn MediaServicePort>) -> Self {
        Self { media_service }
    }

    pub async fn execute(&self, ticket: &TrimTicket) -> Result<TrimResult, DomainError> {
        tracing::info!(
            content_id = %ticket.request.content_id,
            start = %ticket.request.start_timecode,
            end = %ticket.request.end_timecode,
            "Requesting trim"
        );
        self.media_service.trim(&ticket.request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(sequence: u64) -> RequestToken {
        RequestToken {
            generation: 3,
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

    fn open_range(duration: f64) -> RangeSelector {
        let mut range = RangeSelector::new();
        range.initialize(duration);
        range
    }

    #[test]
    fn test_begin_encodes_timecodes() {
        let mut workflow = TrimWorkflow::new();
        let mut range = open_range(125.4);
        range.set_end(10.0);
        range.set_start(5.0);

        let ticket = workflow.begin(Some(&ingest()), &range, token(1)).unwrap();
        assert_eq!(
            ticket.request,
            TrimRequest {
                content_id: "c1".to_string(),
                version_id: "v1".to_string(),
                start_timecode: "0:05".to_string(),
                end_timecode: "0:10".to_string(),
            }
        );
        assert_eq!(workflow.status(), WorkflowStatus::InFlight);
    }

    #[test]
    fn test_begin_refuses_without_upload() {
        let mut workflow = TrimWorkflow::new();
        let err = workflow.begin(None, &open_range(10.0), token(1)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidRange(_)));
        assert_eq!(workflow.status(), WorkflowStatus::Idle);
    }

    #[test]
    fn test_begin_refuses_unknown_duration_and_empty_range() {
        let mut workflow = TrimWorkflow::new();
        assert!(workflow
            .begin(Some(&ingest()), &RangeSelector::new(), token(1))
            .is_err());

        let mut range = open_range(30.0);
        range.set_start(30.0);
        assert!(workflow.begin(Some(&ingest()), &range, token(2)).is_err());
        assert_eq!(workflow.status(), WorkflowStatus::Idle);
    }

    #[test]
    fn test_begin_refuses_range_within_one_second() {
        let mut workflow = TrimWorkflow::new();
        let mut range = open_range(30.0);
        range.set_end(5.7);
        range.set_start(5.3);
        assert!(range.is_trimmable());

        let err = workflow.begin(Some(&ingest()), &range, token(1)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidRange(_)));
        assert_eq!(workflow.status(), WorkflowStatus::Idle);

        range.set_end(6.0);
        let ticket = workflow.begin(Some(&ingest()), &range, token(2)).unwrap();
        assert_eq!(ticket.request.start_timecode, "0:05");
        assert_eq!(ticket.request.end_timecode, "0:06");
    }

    #[test]
    fn test_double_submit_refused_and_stale_completion_dropped() {
        let mut workflow = TrimWorkflow::new();
        let range = open_range(30.0);
        let first = workflow.begin(Some(&ingest()), &range, token(1)).unwrap();
        assert!(matches!(
            workflow.begin(Some(&ingest()), &range, token(2)),
            Err(DomainError::WorkflowBusy(_))
        ));

        let forged = TrimTicket {
            token: token(99),
            ..first.clone()
        };
        assert_eq!(
            workflow.complete(forged.token, Ok(TrimResult { url: "x".to_string() })),
            CompletionOutcome::Discarded
        );
        assert_eq!(workflow.status(), WorkflowStatus::InFlight);

        assert_eq!(
            workflow.complete(first.token, Ok(TrimResult { url: "t1".to_string() })),
            CompletionOutcome::Applied
        );
        assert_eq!(workflow.result().map(|r| r.url.as_str()), Some("t1"));
    }

    #[test]
    fn test_failure_clears_result() {
        let mut workflow = TrimWorkflow::new();
        let range = open_range(30.0);
        let first = workflow.begin(Some(&ingest()), &range, token(1)).unwrap();
        workflow.complete(first.token, Ok(TrimResult { url: "t1".to_string() }));

        let second = workflow.begin(Some(&ingest()), &range, token(2)).unwrap();
        workflow.complete(
            second.token,
            Err(DomainError::TransportFailure("reset by peer".to_string())),
        );
        assert_eq!(workflow.status(), WorkflowStatus::Failed);
        assert_eq!(workflow.result(), None);
    }
}
