// Domain rules - Range and metadata invariants

use crate::domain::model::*;

/// Owner of the two range endpoints.
///
/// Holds `0 <= start <= end <= upper` at all times. Until an upper bound is
/// known the selector is not actionable and every setter is dropped.
#[derive(Debug, Clone, Default)]
pub struct RangeSelector {
    range: RangeSelection,
    upper: Option<f64>,
}

impl RangeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to `{0, 0}` with no known bound
    pub fn reset(&mut self) {
        self.range = RangeSelection::default();
        self.upper = None;
    }

    /// Open the full `[0, duration]` range
    pub fn initialize(&mut self, duration: f64) {
        self.upper = Some(duration);
        self.range = RangeSelection::new(0.0, duration);
    }

    pub fn range(&self) -> RangeSelection {
        self.range
    }

    pub fn upper_bound(&self) -> Option<f64> {
        self.upper
    }

    pub fn is_actionable(&self) -> bool {
        self.upper.is_some()
    }

    /// Trim gate: bound known and `start < end`
    pub fn is_trimmable(&self) -> bool {
        self.is_actionable() && self.range.is_trimmable()
    }

    /// Move the start point. Returns the accepted value (the seek target) or
    /// `None` when the value is dropped.
    pub fn set_start(&mut self, value: f64) -> Option<f64> {
        if !self.within_bounds(value) || value > self.range.end {
            return None;
        }
        self.range.start = value;
        Some(value)
    }

    /// Move the end point; symmetric to [`RangeSelector::set_start`]
    pub fn set_end(&mut self, value: f64) -> Option<f64> {
        if !self.within_bounds(value) || value < self.range.start {
            return None;
        }
        self.range.end = value;
        Some(value)
    }

    fn within_bounds(&self, value: f64) -> bool {
        match self.upper {
            Some(upper) => value.is_finite() && value >= 0.0 && value <= upper,
            None => false,
        }
    }
}

/// Result of feeding a duration notification to the tracker
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DurationUpdate {
    /// Nothing changed (repeat notification, unusable value, or not armed)
    Unchanged,
    /// The range must be re-initialized to `[0, seconds]`
    Initialized(f64),
}

/// Receives the playback component's duration notifications.
///
/// Only armed after a successful ingestion; repeated notifications with the
/// same value are no-ops.
#[derive(Debug, Clone, Default)]
pub struct MediaMetadataTracker {
    duration: Option<f64>,
    armed: bool,
    policy: MetadataPolicy,
}

impl MediaMetadataTracker {
    pub fn new(policy: MetadataPolicy) -> Self {
        Self {
            duration: None,
            armed: false,
            policy,
        }
    }

    pub fn policy(&self) -> MetadataPolicy {
        self.policy
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Forget the duration and wait for the next ingestion
    pub fn reset(&mut self) {
        self.duration = None;
        self.armed = false;
    }

    /// Start listening for the freshly ingested media
    pub fn arm(&mut self) {
        self.duration = None;
        self.armed = true;
    }

    pub fn on_duration_known(&mut self, seconds: f64) -> DurationUpdate {
        if !self.armed {
            return DurationUpdate::Unchanged;
        }
        // Zero is the "not yet known" sentinel.
        if !seconds.is_finite() || seconds <= 0.0 {
            return DurationUpdate::Unchanged;
        }
        if self.duration == Some(seconds) {
            return DurationUpdate::Unchanged;
        }

        self.duration = Some(seconds);
        DurationUpdate::Initialized(seconds)
    }

    /// The playback component gave up on metadata for the current media
    pub fn on_metadata_unavailable(&mut self) -> DurationUpdate {
        if !self.armed || self.duration.is_some() {
            return DurationUpdate::Unchanged;
        }

        match self.policy {
            MetadataPolicy::Disabled => DurationUpdate::Unchanged,
            MetadataPolicy::Fallback { max_seconds } => {
                self.duration = Some(max_seconds);
                DurationUpdate::Initialized(max_seconds)
            }
        }
    }
}
