//! Fixed-cadence frame sampling.

use courtside_play_model::frame::FrameIndex;

/// Selects every `frame_interval`-th frame, starting at frame 0.
#[derive(Debug, Clone, Copy)]
pub struct FixedIntervalSampler {
    frame_interval: u64,
}

impl FixedIntervalSampler {
    /// Sampler with the given cadence in frames; zero is raised to one.
    pub fn new(frame_interval: u64) -> Self {
        Self {
            frame_interval: frame_interval.max(1),
        }
    }

    /// Whether this frame is a sample point.
    pub fn is_sample(&self, frame_index: FrameIndex) -> bool {
        frame_index % self.frame_interval == 0
    }
}
