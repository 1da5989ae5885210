//! Courtside Media
//!
//! Everything between a video file and the processing core:
//! - **Sources:** The `FrameSource` boundary and an in-memory implementation
//! - **FFmpeg:** Stream probing and grayscale frame decoding via `ffprobe`/`ffmpeg`
//! - **Queue:** Bounded, order-preserving decode thread
//! - **Pipeline:** The single-consumer analysis loop for both modes

pub mod cancel;
pub mod ffmpeg;
pub mod pipeline;
pub mod queue;
pub mod source;

pub use cancel::CancelToken;
pub use ffmpeg::{probe_stream, FfmpegFrameSource};
pub use pipeline::{analyze_stream, AnalysisOutcome};
pub use queue::DecodeQueue;
pub use source::{FrameSource, MemoryFrameSource};
