//! Analysis mode and tunables.
//!
//! Parameters arrive from config files and command-line flags. They are
//! heuristic knobs, not validated user input: anything missing or out of
//! range is replaced with its default instead of being rejected.

use serde::{Deserialize, Serialize};

/// How play events are acquired from a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Fixed-cadence frame sampling (`clip`).
    #[default]
    Interval,
    /// Motion-based rally segmentation (`match`).
    Rally,
}

impl AnalysisMode {
    /// Parse a mode name. Accepts `interval`/`clip` and `rally`/`match`,
    /// case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "interval" | "clip" => Some(Self::Interval),
            "rally" | "match" => Some(Self::Rally),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Interval => "interval",
            Self::Rally => "rally",
        }
    }
}

/// Unvalidated analysis parameters, as collected from config and flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAnalysisParams {
    pub mode: Option<String>,
    pub interval_sec: Option<f64>,
    pub motion_threshold: Option<f64>,
    pub gap_sec: Option<f64>,
    pub alpha: Option<f64>,
    pub downscale_width: Option<u32>,
}

/// Analysis parameters with every value inside its safe range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParams {
    pub mode: AnalysisMode,

    /// Seconds between interval-mode samples, at least 1.
    pub interval_sec: f64,

    /// Smoothed magnitude that must be exceeded to count as motion.
    pub motion_threshold: f64,

    /// Seconds of low motion that close a rally.
    pub gap_sec: f64,

    /// Weight of the previous smoothed value, in `[0, 1)`.
    pub alpha: f64,

    /// Working width for frame differencing.
    pub downscale_width: u32,
}

impl AnalysisParams {
    pub const DEFAULT_INTERVAL_SEC: f64 = 2.0;
    pub const MIN_INTERVAL_SEC: f64 = 1.0;
    pub const DEFAULT_MOTION_THRESHOLD: f64 = 4.0;
    pub const DEFAULT_GAP_SEC: f64 = 2.0;
    pub const DEFAULT_ALPHA: f64 = 0.9;
    pub const DEFAULT_DOWNSCALE_WIDTH: u32 = 640;

    /// Build parameters from raw values, substituting defaults for anything
    /// missing or out of range.
    pub fn coerce(raw: &RawAnalysisParams) -> Self {
        let mode = raw
            .mode
            .as_deref()
            .and_then(AnalysisMode::from_name)
            .unwrap_or_default();

        let interval_sec = match raw.interval_sec {
            Some(v) if v.is_finite() => v.max(Self::MIN_INTERVAL_SEC),
            _ => Self::DEFAULT_INTERVAL_SEC,
        };

        let motion_threshold = match raw.motion_threshold {
            Some(v) if v.is_finite() && v >= 0.0 => v,
            _ => Self::DEFAULT_MOTION_THRESHOLD,
        };

        let gap_sec = match raw.gap_sec {
            Some(v) if v.is_finite() && v >= 0.0 => v,
            _ => Self::DEFAULT_GAP_SEC,
        };

        let alpha = match raw.alpha {
            Some(v) if (0.0..1.0).contains(&v) => v,
            _ => Self::DEFAULT_ALPHA,
        };

        let downscale_width = match raw.downscale_width {
            Some(v) if v > 0 => v,
            _ => Self::DEFAULT_DOWNSCALE_WIDTH,
        };

        Self {
            mode,
            interval_sec,
            motion_threshold,
            gap_sec,
            alpha,
            downscale_width,
        }
    }

    /// Number of consecutive low-motion frames that end a rally.
    pub fn gap_frames(&self, fps: f64) -> u64 {
        (fps * self.gap_sec).round() as u64
    }

    /// Frame cadence of interval mode, never below 1.
    pub fn frame_interval(&self, fps: f64) -> u64 {
        ((fps * self.interval_sec).round() as u64).max(1)
    }
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self::coerce(&RawAnalysisParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_aliases() {
        assert_eq!(AnalysisMode::from_name("clip"), Some(AnalysisMode::Interval));
        assert_eq!(AnalysisMode::from_name("Interval"), Some(AnalysisMode::Interval));
        assert_eq!(AnalysisMode::from_name(" match "), Some(AnalysisMode::Rally));
        assert_eq!(AnalysisMode::from_name("RALLY"), Some(AnalysisMode::Rally));
        assert_eq!(AnalysisMode::from_name("highlights"), None);
    }

    #[test]
    fn test_defaults() {
        let params = AnalysisParams::default();
        assert_eq!(params.mode, AnalysisMode::Interval);
        assert_eq!(params.interval_sec, 2.0);
        assert_eq!(params.motion_threshold, 4.0);
        assert_eq!(params.gap_sec, 2.0);
        assert_eq!(params.alpha, 0.9);
        assert_eq!(params.downscale_width, 640);
    }

    #[test]
    fn test_out_of_range_values_fall_back() {
        let raw = RawAnalysisParams {
            mode: Some("unknown".into()),
            interval_sec: Some(0.25),
            motion_threshold: Some(-1.0),
            gap_sec: Some(f64::NAN),
            alpha: Some(1.5),
            downscale_width: Some(0),
        };
        let params = AnalysisParams::coerce(&raw);
        assert_eq!(params.mode, AnalysisMode::Interval);
        assert_eq!(params.interval_sec, 1.0);
        assert_eq!(params.motion_threshold, 4.0);
        assert_eq!(params.gap_sec, 2.0);
        assert_eq!(params.alpha, 0.9);
        assert_eq!(params.downscale_width, 640);
    }

    #[test]
    fn test_zero_alpha_is_kept() {
        let raw = RawAnalysisParams {
            alpha: Some(0.0),
            ..Default::default()
        };
        assert_eq!(AnalysisParams::coerce(&raw).alpha, 0.0);
    }

    #[test]
    fn test_frame_counts_round_to_nearest() {
        let params = AnalysisParams::default();
        assert_eq!(params.gap_frames(30.0), 60);
        assert_eq!(params.gap_frames(29.97), 60);
        assert_eq!(params.frame_interval(25.0), 50);

        let tiny = AnalysisParams {
            interval_sec: 1.0,
            ..params
        };
        assert_eq!(tiny.frame_interval(0.2), 1);
    }
}
