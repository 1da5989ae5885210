//! Frame-difference motion signal.
//!
//! Each frame is reduced to an 8-bit grayscale image at a fixed working
//! width, then compared pixel by pixel with the previous reduced frame. The
//! mean absolute difference is the raw motion magnitude for that frame.
//!
//! # Reduction
//!
//! 1. **Grayscale:** RGB input goes through `imageops::grayscale`.
//! 2. **Downscale:** `imageops::thumbnail` (area averaging) to
//!    `working_width`, preserving aspect ratio. Frames already at or below
//!    the working width are left as-is.

use image::{imageops, GrayImage, RgbImage};

use courtside_common::error::{CourtsideError, CourtsideResult};
use courtside_play_model::frame::{PixelFormat, VideoFrame};

/// Converts consecutive frames into raw motion magnitudes.
///
/// Holds exactly one previous frame, overwritten on every call.
#[derive(Debug)]
pub struct MotionSignalExtractor {
    working_width: u32,
    previous: Option<GrayImage>,
}

impl MotionSignalExtractor {
    /// Create an extractor that reduces frames to `working_width` pixels wide.
    pub fn new(working_width: u32) -> Self {
        Self {
            working_width: working_width.max(1),
            previous: None,
        }
    }

    /// Feed the next frame.
    ///
    /// Returns `None` when there is nothing to compare against: for the
    /// first frame, and for a frame whose reduced size differs from its
    /// predecessor's. A frame that fails to reduce leaves the previous
    /// frame in place.
    pub fn extract(&mut self, frame: &VideoFrame) -> CourtsideResult<Option<f64>> {
        let reduced = reduce_frame(frame, self.working_width)?;

        let magnitude = match &self.previous {
            Some(prev) if prev.dimensions() == reduced.dimensions() => {
                Some(mean_abs_diff(prev.as_raw(), reduced.as_raw()))
            }
            Some(prev) => {
                tracing::warn!(
                    frame = frame.index,
                    previous = ?prev.dimensions(),
                    current = ?reduced.dimensions(),
                    "Frame geometry changed; skipping motion sample"
                );
                None
            }
            None => None,
        };

        self.previous = Some(reduced);
        Ok(magnitude)
    }
}

/// Reduce a frame to grayscale at the given working width.
pub fn reduce_frame(frame: &VideoFrame, working_width: u32) -> CourtsideResult<GrayImage> {
    if frame.width == 0 || frame.height == 0 {
        return Err(CourtsideError::processing(format!(
            "Frame {} has empty geometry {}x{}",
            frame.index, frame.width, frame.height
        )));
    }
    let expected = frame.expected_len();
    if frame.data.len() < expected {
        return Err(CourtsideError::processing(format!(
            "Frame {} buffer holds {} bytes, expected {}",
            frame.index,
            frame.data.len(),
            expected
        )));
    }

    let pixels = frame.data[..expected].to_vec();
    let gray = match frame.format {
        PixelFormat::Gray8 => GrayImage::from_raw(frame.width, frame.height, pixels),
        PixelFormat::Rgb24 => RgbImage::from_raw(frame.width, frame.height, pixels)
            .map(|rgb| imageops::grayscale(&rgb)),
    }
    .ok_or_else(|| {
        CourtsideError::processing(format!("Frame {} does not fit its geometry", frame.index))
    })?;

    if frame.width <= working_width {
        return Ok(gray);
    }

    let height = scaled_height(frame.width, frame.height, working_width);
    Ok(imageops::thumbnail(&gray, working_width, height))
}

/// Height that keeps the aspect ratio at the new width, at least 1.
fn scaled_height(width: u32, height: u32, new_width: u32) -> u32 {
    let h = (height as f64 * new_width as f64 / width as f64).round() as u32;
    h.max(1)
}

/// Mean of `|a - b|` over two equally sized buffers.
pub fn mean_abs_diff(a: &[u8], b: &[u8]) -> f64 {
    if a.is_empty() {
        return 0.0;
    }
    let total: u64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| x.abs_diff(y) as u64)
        .sum();
    total as f64 / a.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_gray(index: u64, width: u32, height: u32, value: u8) -> VideoFrame {
        VideoFrame::gray(index, width, height, vec![value; (width * height) as usize])
    }

    #[test]
    fn test_first_frame_has_no_magnitude() {
        let mut extractor = MotionSignalExtractor::new(640);
        assert_eq!(extractor.extract(&solid_gray(0, 4, 4, 10)).unwrap(), None);
    }

    #[test]
    fn test_magnitude_is_mean_absolute_difference() {
        let mut extractor = MotionSignalExtractor::new(640);
        extractor.extract(&solid_gray(0, 2, 2, 100)).unwrap();

        let frame = VideoFrame::gray(1, 2, 2, vec![110, 90, 100, 104]);
        let magnitude = extractor.extract(&frame).unwrap().unwrap();
        // (10 + 10 + 0 + 4) / 4
        assert!((magnitude - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_static_frames_have_zero_motion() {
        let mut extractor = MotionSignalExtractor::new(640);
        extractor.extract(&solid_gray(0, 8, 8, 42)).unwrap();
        for i in 1..5 {
            let magnitude = extractor.extract(&solid_gray(i, 8, 8, 42)).unwrap();
            assert_eq!(magnitude, Some(0.0));
        }
    }

    #[test]
    fn test_rgb_frames_become_luma() {
        let frame = VideoFrame::rgb(
            0,
            4,
            1,
            vec![0, 0, 0, 255, 0, 0, 0, 255, 0, 255, 255, 255],
        );
        let reduced = reduce_frame(&frame, 640).unwrap();
        let px = reduced.as_raw();
        assert_eq!(reduced.dimensions(), (4, 1));
        assert_eq!(px[0], 0);
        assert_eq!(px[3], 255);
        // Green carries more luma than red.
        assert!(px[2] > px[1] && px[1] > 0);
    }

    #[test]
    fn test_narrow_frames_are_not_resized() {
        let reduced = reduce_frame(&solid_gray(0, 320, 240, 7), 640).unwrap();
        assert_eq!(reduced.dimensions(), (320, 240));
    }

    #[test]
    fn test_downscale_preserves_aspect_ratio() {
        let reduced = reduce_frame(&solid_gray(0, 1920, 1080, 200), 640).unwrap();
        assert_eq!(reduced.dimensions(), (640, 360));
        assert!(reduced.as_raw().iter().all(|&p| p.abs_diff(200) <= 1));
    }

    #[test]
    fn test_downscale_averages_blocks() {
        // 4x2 -> 2x1: each output pixel covers a 2x2 block averaging 100.
        let frame = VideoFrame::gray(0, 4, 2, vec![0, 100, 200, 200, 100, 200, 0, 0]);
        let reduced = reduce_frame(&frame, 2).unwrap();
        assert_eq!(reduced.dimensions(), (2, 1));
        assert!(reduced.as_raw().iter().all(|&p| p.abs_diff(100) <= 1));
    }

    #[test]
    fn test_geometry_change_skips_sample() {
        let mut extractor = MotionSignalExtractor::new(640);
        extractor.extract(&solid_gray(0, 4, 4, 0)).unwrap();
        assert_eq!(extractor.extract(&solid_gray(1, 8, 4, 0)).unwrap(), None);
        assert_eq!(extractor.extract(&solid_gray(2, 8, 4, 10)).unwrap(), Some(10.0));
    }

    #[test]
    fn test_short_buffer_is_rejected_and_keeps_previous() {
        let mut extractor = MotionSignalExtractor::new(640);
        extractor.extract(&solid_gray(0, 4, 4, 0)).unwrap();

        let err = extractor.extract(&VideoFrame::gray(1, 4, 4, vec![0; 10])).unwrap_err();
        assert!(err.is_recoverable());

        assert_eq!(extractor.extract(&solid_gray(2, 4, 4, 20)).unwrap(), Some(20.0));
    }
}
