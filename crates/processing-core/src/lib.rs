//! Courtside Processing Core — Rally Segmentation
//!
//! Turns a decoded frame stream into play events:
//! - **Motion:** Mean absolute difference between consecutive reduced frames
//! - **Smoothing:** Exponential moving average over the motion signal
//! - **Rallies:** Threshold + gap-timeout state machine over the smoothed signal
//! - **Sampling:** Fixed-cadence frame sampling for interval mode
//! - **Emission:** Timestamped, labelled play events
//!
//! This crate is pure computation — no I/O, no decoding.
//! Frames go in; rally intervals and events come out.

pub mod emitter;
pub mod interval;
pub mod motion;
pub mod rally;
pub mod segmenter;
pub mod smoother;

pub use emitter::EventEmitter;
pub use interval::FixedIntervalSampler;
pub use motion::MotionSignalExtractor;
pub use rally::{RallyPhase, RallyStateMachine, SegmentationState};
pub use segmenter::{segment_signal, RallySegmenter};
pub use smoother::SignalSmoother;
