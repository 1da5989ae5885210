//! Decoded video frames and stream metadata.
//!
//! Pixel buffers are transient: a frame is handed to the analyzer, which
//! keeps at most one reduced copy of it for the next comparison.

use serde::{Deserialize, Serialize};

/// Zero-based index of a frame within its stream.
pub type FrameIndex = u64;

/// Frame rate assumed when the container reports none.
pub const DEFAULT_FPS: f64 = 30.0;

/// Replace a missing, zero, negative, or non-finite frame rate with [`DEFAULT_FPS`].
pub fn normalize_fps(fps: Option<f64>) -> f64 {
    match fps {
        Some(value) if value.is_finite() && value > 0.0 => value,
        _ => DEFAULT_FPS,
    }
}

/// Timestamp of a frame in seconds.
pub fn frame_timestamp_secs(index: FrameIndex, fps: f64) -> f64 {
    index as f64 / fps
}

/// Memory layout of a frame's pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// One byte per pixel, luma only.
    Gray8,
    /// Three bytes per pixel, packed R, G, B.
    Rgb24,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb24 => 3,
        }
    }
}

/// A single decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    /// Position in the stream, strictly increasing.
    pub index: FrameIndex,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    /// Row-major pixel data without padding.
    pub data: Vec<u8>,
}

impl VideoFrame {
    /// Create a grayscale frame.
    pub fn gray(index: FrameIndex, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            index,
            width,
            height,
            format: PixelFormat::Gray8,
            data,
        }
    }

    /// Create a packed RGB frame.
    pub fn rgb(index: FrameIndex, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            index,
            width,
            height,
            format: PixelFormat::Rgb24,
            data,
        }
    }

    /// Number of bytes a complete buffer of this geometry holds.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }

    pub fn timestamp_secs(&self, fps: f64) -> f64 {
        frame_timestamp_secs(self.index, fps)
    }
}

/// Properties of a video stream reported by the decoder before reading frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,

    /// Frame rate as reported by the container, if any.
    pub fps: Option<f64>,

    /// Container duration in seconds, if known.
    pub duration_secs: Option<f64>,

    /// Frame count from the stream header, if known.
    pub frame_count: Option<u64>,
}

impl StreamInfo {
    /// Frame rate with the default applied.
    pub fn effective_fps(&self) -> f64 {
        normalize_fps(self.fps)
    }
}
