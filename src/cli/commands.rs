//! Command implementations

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::adapters::toml_config::{ClipFlowConfig, TomlConfigAdapter};
use crate::app::container::{AppContainer, DefaultAppContainer};
use crate::app::session::{
    WorkflowSession, MSG_DOWNLOAD_FAILED, MSG_TRIM_FAILED, MSG_UPLOAD_FAILED,
};
use crate::cli::args::{RunArgs, TimecodeArgs};
use crate::domain::model::Timecode;

/// Execute the run command
pub async fn run(config: &ClipFlowConfig, args: RunArgs) -> Result<()> {
    let container = DefaultAppContainer::from_config(config)
        .context("Failed to initialize media service client")?;
    let mut session = container.new_session();

    match (&args.file, &args.url) {
        (Some(path), _) => {
            if !path.exists() {
                bail!("Input file does not exist: {}", path.display());
            }
            session.select_local_file(path);
        }
        (None, Some(url)) => session.select_remote_url(url),
        (None, None) => bail!("Either --file or --url is required"),
    }

    session.upload().await.context(MSG_UPLOAD_FAILED)?;
    if let Some(ingest) = session.ingest_result() {
        info!(content_id = %ingest.content_id, "Media ingested");
    }

    match container.playback().await_duration().await {
        Some(seconds) => session.on_duration_known(seconds),
        None => {
            warn!("Duration metadata unavailable");
            session.on_metadata_unavailable()
        }
    };
    if session.duration().is_none() {
        bail!(
            "Media duration is unavailable; set metadata.policy = \"fallback\" to trim anyway"
        );
    }
    println!("Duration: {}", session.view().duration_label);

    apply_range(&mut session, args.start.as_deref(), args.end.as_deref())?;

    session.trim().await.context(MSG_TRIM_FAILED)?;
    let trimmed_url = session
        .trim_result()
        .map(|result| result.url.clone())
        .context("Trim response was superseded")?;
    println!("Trimmed: {}", trimmed_url);

    if args.no_download {
        return Ok(());
    }

    let saved = session.download().await.context(MSG_DOWNLOAD_FAILED)?;
    println!("Saved {} ({} bytes)", saved.location, saved.bytes);
    Ok(())
}

/// Move the range controls to the requested offsets
///
/// End is applied first so a start beyond the initial end is reachable.
pub fn apply_range(
    session: &mut WorkflowSession,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<()> {
    if let Some(end) = end {
        let seconds = Timecode::parse_offset(end)
            .with_context(|| format!("Invalid end time '{}'", end))?;
        if !session.set_end(seconds) {
            bail!(
                "End time {} is outside 0:00..{}",
                end,
                session.view().duration_label
            );
        }
    }

    if let Some(start) = start {
        let seconds = Timecode::parse_offset(start)
            .with_context(|| format!("Invalid start time '{}'", start))?;
        if !session.set_start(seconds) {
            bail!(
                "Start time {} must not be after end time {}",
                start,
                session.view().end_label
            );
        }
    }

    let view = session.view();
    info!(start = %view.start_label, end = %view.end_label, "Range selected");
    Ok(())
}

/// Execute the timecode command
pub fn timecode(args: TimecodeArgs) -> Result<()> {
    for seconds in args.seconds {
        println!("{}", Timecode::encode(seconds));
    }
    Ok(())
}

/// Execute the config command
pub fn show_config(config: &ClipFlowConfig) -> Result<()> {
    let rendered = TomlConfigAdapter::render(config).context("Failed to render configuration")?;
    print!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapters::in_memory::{InMemoryMediaService, MemoryPersistence, RecordingPlayback};
    use crate::app::session::SessionPorts;
    use crate::domain::model::{IngestResult, MetadataPolicy, RangeSelection};

    async fn uploaded_session(duration: f64) -> WorkflowSession {
        let service = Arc::new(InMemoryMediaService::new());
        service.push_ingest(Ok(IngestResult {
            content_id: "c1".to_string(),
            version_id: "v1".to_string(),
            preview_url: "u1".to_string(),
        }));
        let mut session = WorkflowSession::new(
            SessionPorts {
                media_service: service.clone(),
                artifact_fetch: service,
                playback: Arc::new(RecordingPlayback::new()),
                persistence: Arc::new(MemoryPersistence::new()),
            },
            MetadataPolicy::Disabled,
        );
        session.select_remote_url("https://cdn.example/a.mp4");
        session.upload().await.unwrap();
        session.on_duration_known(duration);
        session
    }

    #[tokio::test]
    async fn test_apply_range_accepts_mixed_formats() {
        let mut session = uploaded_session(125.4).await;
        apply_range(&mut session, Some("1:05"), Some("90")).unwrap();
        assert_eq!(session.range(), RangeSelection::new(65.0, 90.0));
    }

    #[tokio::test]
    async fn test_apply_range_defaults_to_full_duration() {
        let mut session = uploaded_session(30.0).await;
        apply_range(&mut session, None, None).unwrap();
        assert_eq!(session.range(), RangeSelection::new(0.0, 30.0));
    }

    #[tokio::test]
    async fn test_apply_range_rejects_out_of_bounds() {
        let mut session = uploaded_session(30.0).await;
        assert!(apply_range(&mut session, None, Some("45")).is_err());
        assert!(apply_range(&mut session, Some("20"), Some("10")).is_err());
        assert!(apply_range(&mut session, Some("abc"), None).is_err());
    }
}
