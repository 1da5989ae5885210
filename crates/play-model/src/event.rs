//! Display-ready play events.
//!
//! A `PlayEvent` is the final product of an analysis run: a formatted
//! timestamp plus a label that is handed to a coach or to the feedback
//! service. Events are immutable once built.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::frame::FrameIndex;
use crate::rally::RallyInterval;
use crate::timecode::format_time;

/// What produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayEventKind {
    /// A segmented rally.
    Rally {
        start_frame: FrameIndex,
        end_frame: FrameIndex,
        duration_secs: f64,
    },
    /// A fixed-cadence frame sample.
    Sample { frame_index: FrameIndex },
}

/// A timestamped, labelled moment worth coaching feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayEvent {
    formatted_timestamp: String,
    label: String,
    time_secs: f64,
    #[serde(flatten)]
    kind: PlayEventKind,
}

impl PlayEvent {
    /// Event for a rally, anchored at the rally's midpoint.
    pub fn rally(rally: RallyInterval, fps: f64, label: impl Into<String>) -> Self {
        let time_secs = rally.mid_time_secs(fps);
        Self {
            formatted_timestamp: format_time(time_secs),
            label: label.into(),
            time_secs,
            kind: PlayEventKind::Rally {
                start_frame: rally.start_frame,
                end_frame: rally.end_frame,
                duration_secs: rally.duration_secs(fps),
            },
        }
    }

    /// Event for a single sampled frame.
    pub fn sample(frame_index: FrameIndex, fps: f64, label: impl Into<String>) -> Self {
        let time_secs = frame_index as f64 / fps;
        Self {
            formatted_timestamp: format_time(time_secs),
            label: label.into(),
            time_secs,
            kind: PlayEventKind::Sample { frame_index },
        }
    }

    pub fn formatted_timestamp(&self) -> &str {
        &self.formatted_timestamp
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn time_secs(&self) -> f64 {
        self.time_secs
    }

    pub fn kind(&self) -> PlayEventKind {
        self.kind
    }

    /// The rally this event describes, if any.
    pub fn rally_interval(&self) -> Option<RallyInterval> {
        match self.kind {
            PlayEventKind::Rally {
                start_frame,
                end_frame,
                ..
            } => Some(RallyInterval::new(start_frame, end_frame)),
            PlayEventKind::Sample { .. } => None,
        }
    }
}

impl fmt::Display for PlayEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} — {}", self.formatted_timestamp, self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rally_event_uses_midpoint() {
        let event = PlayEvent::rally(RallyInterval::new(30, 90), 30.0, "Rally (2.0s)");
        assert_eq!(event.formatted_timestamp(), "00:02.000");
        assert_eq!(event.rally_interval(), Some(RallyInterval::new(30, 90)));
        assert_eq!(event.to_string(), "00:02.000 — Rally (2.0s)");
    }

    #[test]
    fn test_sample_event_time() {
        let event = PlayEvent::sample(1965, 30.0, "Frame sample");
        assert_eq!(event.formatted_timestamp(), "01:05.500");
        assert_eq!(event.rally_interval(), None);
    }

    #[test]
    fn test_json_shape() {
        let event = PlayEvent::sample(60, 30.0, "Frame sample — analyze moment");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["formatted_timestamp"], "00:02.000");
        assert_eq!(json["kind"], "sample");
        assert_eq!(json["frame_index"], 60);

        let parsed: PlayEvent = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, event);
    }
}
