//! Per-video rally segmentation driver.
//!
//! Wires the extractor, smoother, and state machine together around one
//! `SegmentationState`. Frames are pushed in order; the segmenter is
//! consumed when the stream ends or is cancelled.

use courtside_common::error::CourtsideResult;
use courtside_play_model::frame::{FrameIndex, VideoFrame};
use courtside_play_model::params::AnalysisParams;
use courtside_play_model::rally::{MotionSample, RallyInterval};

use crate::motion::MotionSignalExtractor;
use crate::rally::{RallyStateMachine, SegmentationState};
use crate::smoother::SignalSmoother;

/// Streaming rally segmenter for a single video.
#[derive(Debug)]
pub struct RallySegmenter {
    extractor: MotionSignalExtractor,
    smoother: SignalSmoother,
    machine: RallyStateMachine,
    state: SegmentationState,
    rallies: Vec<RallyInterval>,
    samples_seen: u64,
}

impl RallySegmenter {
    /// Create a segmenter for a stream running at `fps`.
    pub fn new(params: &AnalysisParams, fps: f64) -> Self {
        Self {
            extractor: MotionSignalExtractor::new(params.downscale_width),
            smoother: SignalSmoother::new(params.alpha),
            machine: RallyStateMachine::new(params.motion_threshold, params.gap_frames(fps)),
            state: SegmentationState::new(),
            rallies: Vec::new(),
            samples_seen: 0,
        }
    }

    /// Feed the next decoded frame.
    ///
    /// Returns the motion sample it produced, if any. The first frame (and
    /// any frame whose geometry changed) only primes the extractor. A frame
    /// that cannot be reduced is not recorded as seen.
    pub fn push_frame(&mut self, frame: &VideoFrame) -> CourtsideResult<Option<MotionSample>> {
        let raw = self.extractor.extract(frame)?;
        self.state.observe(frame.index);
        Ok(raw.map(|raw| self.push_raw(frame.index, raw)))
    }

    /// Feed a raw motion magnitude directly, bypassing frame differencing.
    pub fn push_raw(&mut self, frame_index: FrameIndex, raw: f64) -> MotionSample {
        let smoothed = self.smoother.next(self.state.smoothed_value, raw);
        self.state.smoothed_value = smoothed;
        self.samples_seen += 1;

        if let Some(rally) = self.machine.step(&mut self.state, frame_index, smoothed) {
            self.rallies.push(rally);
        }

        MotionSample {
            frame_index,
            raw_magnitude: raw,
            smoothed_magnitude: smoothed,
        }
    }

    /// Rallies closed so far.
    pub fn rallies(&self) -> &[RallyInterval] {
        &self.rallies
    }

    pub fn state(&self) -> &SegmentationState {
        &self.state
    }

    /// Motion samples processed so far.
    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }

    /// End of stream: close any open rally at the last seen frame.
    pub fn finish(mut self) -> Vec<RallyInterval> {
        if let Some(rally) = self.machine.finish(&mut self.state) {
            self.rallies.push(rally);
        }
        tracing::debug!(
            rallies = self.rallies.len(),
            samples = self.samples_seen,
            "Segmentation finished"
        );
        self.rallies
    }

    /// Cancellation: keep closed rallies, discard the open one.
    pub fn abandon(mut self) -> Vec<RallyInterval> {
        self.machine.abandon(&mut self.state);
        self.rallies
    }
}

/// Segment an already-extracted raw motion signal.
///
/// Each item is `(frame_index, raw_magnitude)`, in frame order.
pub fn segment_signal<I>(samples: I, params: &AnalysisParams, fps: f64) -> Vec<RallyInterval>
where
    I: IntoIterator<Item = (FrameIndex, f64)>,
{
    let mut segmenter = RallySegmenter::new(params, fps);
    for (frame_index, raw) in samples {
        segmenter.push_raw(frame_index, raw);
    }
    segmenter.finish()
}
