//! Exponential smoothing of the motion signal.

/// Exponential moving average with a fixed weight on the previous value.
///
/// `smoothed(t) = alpha * smoothed(t-1) + (1 - alpha) * raw(t)`, starting
/// from 0. The smoother itself is stateless: the running value lives in the
/// caller's segmentation state so one smoother can serve any number of videos.
#[derive(Debug, Clone, Copy)]
pub struct SignalSmoother {
    alpha: f64,
}

impl SignalSmoother {
    /// Create a smoother. `alpha` is clamped to `[0.0, 1.0]`.
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Next smoothed value from the previous one and the current raw sample.
    pub fn next(&self, previous: f64, raw: f64) -> f64 {
        self.alpha * previous + (1.0 - self.alpha) * raw
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}
