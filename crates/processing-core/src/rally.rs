//! Rally state machine.
//!
//! Consumes the smoothed motion signal one frame at a time and closes rally
//! intervals with threshold + gap-timeout hysteresis.
//!
//! # Transitions
//!
//! - **Idle → InRally:** smoothed value rises above the threshold. The current
//!   frame becomes the rally start.
//! - **InRally, above threshold:** the gap counter resets.
//! - **InRally, at or below threshold:** the sample counts toward the gap
//!   window. The low sample arriving after `gap_frames` low samples have
//!   accumulated closes the rally at `frame - gap_frames`, which trims the
//!   quiet tail off the interval.
//! - **End of stream while InRally:** the rally closes at the last seen frame.
//!
//! Samples must arrive in strict frame order.

use courtside_play_model::frame::FrameIndex;
use courtside_play_model::rally::RallyInterval;

/// Phase of the segmentation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RallyPhase {
    #[default]
    Idle,
    InRally,
}

/// Mutable per-video segmentation state.
///
/// Create one per video and pass it explicitly to every step; never share
/// it between videos.
#[derive(Debug, Clone, Default)]
pub struct SegmentationState {
    pub phase: RallyPhase,

    /// Running exponentially smoothed motion magnitude.
    pub smoothed_value: f64,

    /// First frame of the open rally. Meaningful only while `InRally`.
    pub rally_start_frame: FrameIndex,

    /// Consecutive low-motion samples seen in the open rally.
    pub gap_counter: u64,

    /// Most recent frame index observed, sample or not.
    pub last_frame: Option<FrameIndex>,
}

impl SegmentationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a frame was read, even if it produced no sample.
    pub fn observe(&mut self, frame_index: FrameIndex) {
        self.last_frame = Some(frame_index);
    }

    pub fn in_rally(&self) -> bool {
        self.phase == RallyPhase::InRally
    }
}

/// Threshold + gap-timeout rally detector.
#[derive(Debug, Clone, Copy)]
pub struct RallyStateMachine {
    motion_threshold: f64,
    gap_frames: u64,
}

impl RallyStateMachine {
    pub fn new(motion_threshold: f64, gap_frames: u64) -> Self {
        Self {
            motion_threshold,
            gap_frames,
        }
    }

    pub fn motion_threshold(&self) -> f64 {
        self.motion_threshold
    }

    pub fn gap_frames(&self) -> u64 {
        self.gap_frames
    }

    /// Advance by one smoothed sample. Returns a rally if this sample closed one.
    pub fn step(
        &self,
        state: &mut SegmentationState,
        frame_index: FrameIndex,
        smoothed: f64,
    ) -> Option<RallyInterval> {
        state.observe(frame_index);
        let active = smoothed > self.motion_threshold;

        match state.phase {
            RallyPhase::Idle => {
                if active {
                    state.phase = RallyPhase::InRally;
                    state.rally_start_frame = frame_index;
                    state.gap_counter = 0;
                    tracing::debug!(frame = frame_index, smoothed, "Rally opened");
                }
                None
            }
            RallyPhase::InRally if active => {
                state.gap_counter = 0;
                None
            }
            RallyPhase::InRally => {
                if state.gap_counter < self.gap_frames {
                    state.gap_counter += 1;
                    return None;
                }

                let end_frame = frame_index.saturating_sub(self.gap_frames);
                let rally = RallyInterval::new(state.rally_start_frame, end_frame);
                state.phase = RallyPhase::Idle;
                state.gap_counter = 0;
                tracing::debug!(
                    start = rally.start_frame,
                    end = rally.end_frame,
                    boundary = frame_index,
                    "Rally closed"
                );
                Some(rally)
            }
        }
    }

    /// Close any open rally at the last observed frame (stream ended).
    pub fn finish(&self, state: &mut SegmentationState) -> Option<RallyInterval> {
        if !state.in_rally() {
            return None;
        }

        let last = state.last_frame.unwrap_or(state.rally_start_frame);
        let rally = RallyInterval::new(state.rally_start_frame, last);
        state.phase = RallyPhase::Idle;
        state.gap_counter = 0;
        tracing::debug!(
            start = rally.start_frame,
            end = rally.end_frame,
            "Rally closed at end of stream"
        );
        Some(rally)
    }

    /// Drop any open rally without emitting it (run was cancelled).
    pub fn abandon(&self, state: &mut SegmentationState) {
        if state.in_rally() {
            tracing::debug!(
                start = state.rally_start_frame,
                "Discarding open rally on cancellation"
            );
        }
        state.phase = RallyPhase::Idle;
        state.gap_counter = 0;
    }
}
