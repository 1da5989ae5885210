//! The streaming analysis loop.
//!
//! Pulls frames from a [`FrameSource`] one at a time and feeds either the
//! fixed-interval sampler or the rally segmenter. Memory use does not grow
//! with video length apart from the emitted events themselves.

use courtside_common::error::{CourtsideError, CourtsideResult};
use courtside_play_model::event::PlayEvent;
use courtside_play_model::frame::{normalize_fps, FrameIndex};
use courtside_play_model::params::{AnalysisMode, AnalysisParams};
use courtside_play_model::rally::RallyInterval;
use courtside_processing_core::{EventEmitter, FixedIntervalSampler, RallySegmenter};

use crate::cancel::CancelToken;
use crate::source::FrameSource;

/// Result of one pass over a stream.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// Events in timestamp order.
    pub events: Vec<PlayEvent>,

    /// Rally intervals before degenerate ones were dropped. Empty in interval mode.
    pub rallies: Vec<RallyInterval>,

    /// Frame rate used for every time conversion.
    pub fps: f64,

    /// Frames analyzed before the stream ended.
    pub frames_processed: u64,

    /// The loop stopped on request before the stream ended.
    pub cancelled: bool,
}

enum ModeDriver {
    Interval {
        sampler: FixedIntervalSampler,
        samples: Vec<FrameIndex>,
    },
    Rally(Box<RallySegmenter>),
}

impl ModeDriver {
    fn new(params: &AnalysisParams, fps: f64) -> Self {
        match params.mode {
            AnalysisMode::Interval => Self::Interval {
                sampler: FixedIntervalSampler::new(params.frame_interval(fps)),
                samples: Vec::new(),
            },
            AnalysisMode::Rally => Self::Rally(Box::new(RallySegmenter::new(params, fps))),
        }
    }
}

/// Run the analysis selected by `params.mode` over `source`.
///
/// A source or frame error before the first frame is returned as-is. Later
/// errors end the stream: any open rally closes at the last good frame.
/// When `cancel` trips, even if the source ended at the same moment, closed
/// rallies and samples taken so far are kept and an open rally is discarded.
pub fn analyze_stream(
    source: &mut dyn FrameSource,
    params: &AnalysisParams,
    cancel: &CancelToken,
) -> CourtsideResult<AnalysisOutcome> {
    let fps = normalize_fps(source.fps());
    if source.fps() != Some(fps) {
        tracing::debug!(reported = ?source.fps(), fps, "Using default frame rate");
    }

    let mut driver = ModeDriver::new(params, fps);
    let mut frames_processed: u64 = 0;
    let mut last_index: Option<FrameIndex> = None;
    let mut cancelled = false;

    tracing::info!(mode = params.mode.as_str(), fps, "Analysis started");

    loop {
        if cancel.is_cancelled() {
            cancelled = true;
            tracing::info!(frames = frames_processed, "Analysis cancelled");
            break;
        }

        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(err) if frames_processed > 0 => {
                tracing::warn!(
                    error = %err,
                    last_frame = ?last_index,
                    "Unreadable frame, treating as end of stream"
                );
                break;
            }
            Err(err) => return Err(err),
        };

        if let Some(previous) = last_index {
            if frame.index <= previous {
                return Err(CourtsideError::processing(format!(
                    "Frame {} arrived after frame {previous}",
                    frame.index
                )));
            }
        }

        let processed = match &mut driver {
            ModeDriver::Interval { sampler, samples } => {
                if sampler.is_sample(frame.index) {
                    samples.push(frame.index);
                }
                Ok(())
            }
            ModeDriver::Rally(segmenter) => segmenter.push_frame(&frame).map(|_| ()),
        };
        if let Err(err) = processed {
            if frames_processed == 0 {
                return Err(err);
            }
            tracing::warn!(
                error = %err,
                last_frame = ?last_index,
                "Unusable frame, treating as end of stream"
            );
            break;
        }

        last_index = Some(frame.index);
        frames_processed += 1;
    }

    // The source may have stopped because of the same interrupt that tripped the token.
    if !cancelled && cancel.is_cancelled() {
        cancelled = true;
        tracing::info!(frames = frames_processed, "Analysis cancelled");
    }

    let emitter = EventEmitter::new(fps);
    let (events, rallies) = match driver {
        ModeDriver::Interval { samples, .. } => (emitter.sample_events(samples), Vec::new()),
        ModeDriver::Rally(segmenter) => {
            let rallies = if cancelled {
                segmenter.abandon()
            } else {
                segmenter.finish()
            };
            (emitter.rally_events(&rallies), rallies)
        }
    };

    tracing::info!(
        mode = params.mode.as_str(),
        frames = frames_processed,
        events = events.len(),
        cancelled,
        "Analysis finished"
    );

    Ok(AnalysisOutcome {
        events,
        rallies,
        fps,
        frames_processed,
        cancelled,
    })
}
