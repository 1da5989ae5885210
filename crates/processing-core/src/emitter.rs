//! Conversion of rallies and frame samples into play events.

use courtside_play_model::event::PlayEvent;
use courtside_play_model::frame::FrameIndex;
use courtside_play_model::rally::RallyInterval;

/// Label attached to every interval-mode sample.
pub const SAMPLE_LABEL: &str = "Frame sample — analyze moment";

/// Label for a rally of the given duration.
pub fn rally_label(duration_secs: f64) -> String {
    format!("Rally ({duration_secs:.1}s) — analyze key sequence")
}

/// Builds display-ready events for one stream.
#[derive(Debug, Clone, Copy)]
pub struct EventEmitter {
    fps: f64,
}

impl EventEmitter {
    pub fn new(fps: f64) -> Self {
        Self { fps }
    }

    /// One event per non-degenerate rally, timestamped at the rally midpoint.
    pub fn rally_events(&self, rallies: &[RallyInterval]) -> Vec<PlayEvent> {
        rallies
            .iter()
            .filter(|rally| !rally.is_degenerate())
            .map(|&rally| {
                let label = rally_label(rally.duration_secs(self.fps));
                PlayEvent::rally(rally, self.fps, label)
            })
            .collect()
    }

    /// One event per sampled frame.
    pub fn sample_events<I>(&self, frames: I) -> Vec<PlayEvent>
    where
        I: IntoIterator<Item = FrameIndex>,
    {
        frames
            .into_iter()
            .map(|frame| self.sample_event(frame))
            .collect()
    }

    pub fn sample_event(&self, frame_index: FrameIndex) -> PlayEvent {
        PlayEvent::sample(frame_index, self.fps, SAMPLE_LABEL)
    }
}
