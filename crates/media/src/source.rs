//! The frame source boundary.

use std::collections::VecDeque;

use courtside_common::error::CourtsideResult;
use courtside_play_model::frame::VideoFrame;

/// A sequential supplier of decoded frames.
///
/// Implementations yield frames in strictly increasing index order and
/// return `Ok(None)` once the stream is exhausted. An error after the first
/// frame is treated by the analysis loop as the end of the stream.
pub trait FrameSource {
    /// Frame rate reported by the stream, if any.
    fn fps(&self) -> Option<f64>;

    /// Read the next frame.
    fn next_frame(&mut self) -> CourtsideResult<Option<VideoFrame>>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn fps(&self) -> Option<f64> {
        (**self).fps()
    }

    fn next_frame(&mut self) -> CourtsideResult<Option<VideoFrame>> {
        (**self).next_frame()
    }
}

/// Frames held in memory, for synthetic streams and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryFrameSource {
    fps: Option<f64>,
    frames: VecDeque<VideoFrame>,
}

impl MemoryFrameSource {
    pub fn new(fps: Option<f64>, frames: impl IntoIterator<Item = VideoFrame>) -> Self {
        Self {
            fps,
            frames: frames.into_iter().collect(),
        }
    }

    /// Remaining frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for MemoryFrameSource {
    fn fps(&self) -> Option<f64> {
        self.fps
    }

    fn next_frame(&mut self) -> CourtsideResult<Option<VideoFrame>> {
        Ok(self.frames.pop_front())
    }
}
