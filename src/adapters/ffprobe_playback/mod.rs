//! FFprobe adapter used as a headless playback component
//!
//! There is nothing to render in a terminal, so the adapter tracks the
//! loaded source and playhead and answers the duration question by running
//! `ffprobe` against the source (local path or URL).

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::adapters::toml_config::PlaybackConfig;
use crate::ports::*;

#[derive(Debug, Default)]
struct PlayerState {
    source: Option<String>,
    position: f64,
}

/// FFprobe-based playback adapter
pub struct FfprobePlaybackAdapter {
    ffprobe_path: String,
    probe_timeout: Duration,
    state: Mutex<PlayerState>,
}

impl FfprobePlaybackAdapter {
    /// Create new FFprobe playback adapter
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            ffprobe_path: config.ffprobe_path.clone(),
            probe_timeout: Duration::from_secs(config.probe_timeout_secs),
            state: Mutex::new(PlayerState::default()),
        }
    }

    /// Currently loaded source, if any
    pub fn source(&self) -> Option<String> {
        self.state.lock().ok().and_then(|state| state.source.clone())
    }

    /// Current playhead
    pub fn position(&self) -> f64 {
        self.state.lock().map(|state| state.position).unwrap_or(0.0)
    }

    /// Parse ffprobe's `format=duration` output
    fn parse_duration(stdout: &str) -> Option<f64> {
        stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .and_then(|line| line.parse::<f64>().ok())
            .filter(|seconds| seconds.is_finite() && *seconds > 0.0)
    }

    /// ffprobe arguments; the source always follows `-i` so it is never
    /// read as an option
    fn probe_args(source: &str) -> [&str; 8] {
        [
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
            "-i",
            source,
        ]
    }

    async fn probe_duration(&self, source: &str) -> Option<f64> {
        let probe = Command::new(&self.ffprobe_path)
            .args(Self::probe_args(source))
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.probe_timeout, probe).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, ffprobe = %self.ffprobe_path, "Failed to run ffprobe");
                return None;
            }
            Err(_) => {
                tracing::warn!(source, timeout = ?self.probe_timeout, "ffprobe timed out");
                return None;
            }
        };

        if !output.status.success() {
            tracing::warn!(
                source,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "ffprobe could not read media"
            );
            return None;
        }

        Self::parse_duration(&String::from_utf8_lossy(&output.stdout))
    }
}

#[async_trait]
impl PlaybackPort for FfprobePlaybackAdapter {
    fn load(&self, source: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.source = Some(source.to_string());
            state.position = 0.0;
        }
        tracing::debug!(source, "Playback source loaded");
    }

    fn unload(&self) {
        if let Ok(mut state) = self.state.lock() {
            *state = PlayerState::default();
        }
    }

    fn seek(&self, offset: f64) {
        if let Ok(mut state) = self.state.lock() {
            state.position = offset;
        }
        tracing::trace!(offset, "Playback seek");
    }

    async fn await_duration(&self) -> Option<f64> {
        let source = self.source()?;
        self.probe_duration(&source).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter(ffprobe: &str) -> FfprobePlaybackAdapter {
        FfprobePlaybackAdapter::new(&PlaybackConfig {
            ffprobe_path: ffprobe.to_string(),
            probe_timeout_secs: 5,
        })
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(FfprobePlaybackAdapter::parse_duration("125.400000\n"), Some(125.4));
        assert_eq!(FfprobePlaybackAdapter::parse_duration("\n  12.5 \n"), Some(12.5));
        assert_eq!(FfprobePlaybackAdapter::parse_duration("N/A\n"), None);
        assert_eq!(FfprobePlaybackAdapter::parse_duration("0.000000"), None);
        assert_eq!(FfprobePlaybackAdapter::parse_duration(""), None);
    }

    #[test]
    fn test_source_is_passed_as_input() {
        let args = FfprobePlaybackAdapter::probe_args("-f lavfi");
        assert_eq!(&args[args.len() - 2..], ["-i", "-f lavfi"]);

        let args = FfprobePlaybackAdapter::probe_args("https://cdn.example/u1.mp4");
        assert_eq!(args.last(), Some(&"https://cdn.example/u1.mp4"));
        assert_eq!(args.iter().filter(|arg| **arg == "-i").count(), 1);
    }

    #[test]
    fn test_load_seek_unload() {
        let player = adapter("ffprobe");
        player.load("https://cdn.example/u1.mp4");
        player.seek(12.5);
        assert_eq!(player.source().as_deref(), Some("https://cdn.example/u1.mp4"));
        assert_eq!(player.position(), 12.5);

        player.load("/tmp/other.mp4");
        assert_eq!(player.position(), 0.0);

        player.unload();
        assert_eq!(player.source(), None);
    }

    #[tokio::test]
    async fn test_await_duration_without_source() {
        let player = adapter("ffprobe");
        assert_eq!(player.await_duration().await, None);
    }

    #[tokio::test]
    async fn test_missing_ffprobe_binary_yields_none() {
        let player = adapter("/nonexistent/bin/ffprobe-clipflow");
        player.load("/tmp/whatever.mp4");
        assert_eq!(player.await_duration().await, None);
    }
}
