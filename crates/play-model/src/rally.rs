//! Motion samples and rally intervals.

use serde::{Deserialize, Serialize};

use crate::frame::FrameIndex;

/// One point of the motion signal.
///
/// Frame 0 never produces a sample: it has no predecessor to compare with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    pub frame_index: FrameIndex,

    /// Mean absolute grayscale difference against the previous frame, in [0, 255].
    pub raw_magnitude: f64,

    /// Exponentially smoothed magnitude after this sample.
    pub smoothed_magnitude: f64,
}

/// A closed span of sustained motion, in frame indices (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RallyInterval {
    pub start_frame: FrameIndex,
    pub end_frame: FrameIndex,
}

impl RallyInterval {
    /// Build an interval, clamping `end_frame` so it never precedes `start_frame`.
    pub fn new(start_frame: FrameIndex, end_frame: FrameIndex) -> Self {
        Self {
            start_frame,
            end_frame: end_frame.max(start_frame),
        }
    }

    /// A rally that never sustained activity past its opening frame.
    pub fn is_degenerate(&self) -> bool {
        self.end_frame <= self.start_frame
    }

    /// Number of frames between start and end.
    pub fn span_frames(&self) -> u64 {
        self.end_frame - self.start_frame
    }

    pub fn duration_secs(&self, fps: f64) -> f64 {
        self.span_frames() as f64 / fps
    }

    /// Time of the interval's midpoint in seconds.
    pub fn mid_time_secs(&self, fps: f64) -> f64 {
        (self.start_frame + self.end_frame) as f64 / 2.0 / fps
    }
}
