//! Relative motion scaling.
//!
//! The sending device reports pointer motion in its own pixels.  The host
//! display usually has a different resolution and DPI, so every delta is
//! multiplied by a [`ScaleFactor`] before injection.
//!
//! # Dead-zone
//!
//! Touch sensors report tiny sub-pixel jitter even when the finger is still.
//! A delta is dropped when *both* scaled axes are below the dead-zone
//! threshold (0.5 host pixels by default).  A dropped delta does not touch
//! the smoothing history.
//!
//! # Smoothing
//!
//! When enabled, the scaler keeps a [`MotionHistory`] of the last N scaled
//! deltas and injects their arithmetic mean instead of the instantaneous
//! value.  This trades a few packets of latency for a steadier cursor.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Scale factor applied when nothing else is configured.
pub const DEFAULT_SCALE: f64 = 1.6667;

/// Dead-zone threshold in scaled (host) pixels.
pub const DEFAULT_DEAD_ZONE: f64 = 0.5;

/// Number of deltas averaged by the smoothing variant.
pub const DEFAULT_HISTORY_LEN: usize = 5;

/// Magnitude of one scroll tick.
pub const DEFAULT_SCROLL_STEP: i32 = 100;

/// A finite motion multiplier.
///
/// Negative values mirror both axes and zero freezes the pointer; the device
/// is trusted to send what it means.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    /// Returns `None` unless `value` is finite.
    pub fn new(value: f64) -> Option<Self> {
        value.is_finite().then_some(Self(value))
    }

    /// The raw multiplier.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self(DEFAULT_SCALE)
    }
}

impl std::fmt::Display for ScaleFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pointer motion settings, stored under `[motion]` in the server config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MotionConfig {
    /// Scale factor in effect until the first `SET_SCALE`.
    #[serde(default = "default_scale")]
    pub default_scale: f64,
    /// Minimum scaled magnitude on either axis for a delta to be injected.
    #[serde(default = "default_dead_zone")]
    pub dead_zone: f64,
    /// Inject the moving average of recent deltas instead of each delta.
    #[serde(default)]
    pub smoothing: bool,
    /// Number of deltas averaged when `smoothing` is on.
    #[serde(default = "default_history_len")]
    pub history_len: usize,
    /// Magnitude of one `SCROLL_UP` / `SCROLL_DOWN` tick.
    #[serde(default = "default_scroll_step")]
    pub scroll_step: i32,
}

fn default_scale() -> f64 {
    DEFAULT_SCALE
}
fn default_dead_zone() -> f64 {
    DEFAULT_DEAD_ZONE
}
fn default_history_len() -> usize {
    DEFAULT_HISTORY_LEN
}
fn default_scroll_step() -> i32 {
    DEFAULT_SCROLL_STEP
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            default_scale: default_scale(),
            dead_zone: default_dead_zone(),
            smoothing: false,
            history_len: default_history_len(),
            scroll_step: default_scroll_step(),
        }
    }
}

/// Fixed-capacity ring buffer of recent scaled deltas.
#[derive(Debug, Clone)]
pub struct MotionHistory {
    entries: VecDeque<(f64, f64)>,
    capacity: usize,
}

impl MotionHistory {
    /// Creates an empty history.  A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a delta, evicting the oldest entry when full.
    pub fn push(&mut self, dx: f64, dy: f64) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((dx, dy));
    }

    /// Arithmetic mean of the stored deltas, or `None` when empty.
    pub fn mean(&self) -> Option<(f64, f64)> {
        if self.entries.is_empty() {
            return None;
        }
        let n = self.entries.len() as f64;
        let (sum_x, sum_y) = self
            .entries
            .iter()
            .fold((0.0, 0.0), |(ax, ay), (x, y)| (ax + x, ay + y));
        Some((sum_x / n, sum_y / n))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Converts device deltas into host cursor motion.
#[derive(Debug, Clone)]
pub struct MotionScaler {
    scale: ScaleFactor,
    dead_zone: f64,
    history: Option<MotionHistory>,
}

impl MotionScaler {
    /// Builds a scaler from configuration.
    ///
    /// A non-finite `default_scale` or `dead_zone` falls back to its default.
    pub fn new(config: &MotionConfig) -> Self {
        Self {
            scale: ScaleFactor::new(config.default_scale).unwrap_or_default(),
            dead_zone: if config.dead_zone.is_finite() {
                config.dead_zone.abs()
            } else {
                DEFAULT_DEAD_ZONE
            },
            history: config
                .smoothing
                .then(|| MotionHistory::new(config.history_len)),
        }
    }

    /// The scale factor currently in effect.
    pub fn scale(&self) -> ScaleFactor {
        self.scale
    }

    /// Replaces the scale factor.  The next call to [`apply`](Self::apply)
    /// uses the new value.
    pub fn set_scale(&mut self, scale: ScaleFactor) {
        self.scale = scale;
    }

    pub fn is_smoothing(&self) -> bool {
        self.history.is_some()
    }

    /// The smoothing history, if smoothing is enabled.
    pub fn history(&self) -> Option<&MotionHistory> {
        self.history.as_ref()
    }

    /// Scales a raw delta and returns the motion to inject.
    ///
    /// Returns `None` when the scaled delta falls inside the dead-zone on
    /// both axes.
    pub fn apply(&mut self, dx: f64, dy: f64) -> Option<(f64, f64)> {
        let factor = self.scale.get();
        let (sx, sy) = (dx * factor, dy * factor);

        if sx.abs() < self.dead_zone && sy.abs() < self.dead_zone {
            trace!("delta ({sx:.3},{sy:.3}) inside dead-zone, dropped");
            return None;
        }

        match self.history.as_mut() {
            Some(history) => {
                history.push(sx, sy);
                history.mean()
            }
            None => Some((sx, sy)),
        }
    }
}

impl Default for MotionScaler {
    fn default() -> Self {
        Self::new(&MotionConfig::default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn scaler(scale: f64, smoothing: bool, history_len: usize) -> MotionScaler {
        MotionScaler::new(&MotionConfig {
            default_scale: scale,
            smoothing,
            history_len,
            ..MotionConfig::default()
        })
    }

    // ── ScaleFactor ───────────────────────────────────────────────────────────

    #[test]
    fn test_scale_factor_rejects_only_non_finite() {
        assert_eq!(ScaleFactor::new(0.0).map(ScaleFactor::get), Some(0.0));
        assert_eq!(ScaleFactor::new(-2.0).map(ScaleFactor::get), Some(-2.0));
        assert!(ScaleFactor::new(f64::NAN).is_none());
        assert!(ScaleFactor::new(f64::INFINITY).is_none());
        assert_eq!(ScaleFactor::new(0.25).map(ScaleFactor::get), Some(0.25));
    }

    #[test]
    fn test_scale_factor_default_matches_constant() {
        assert_eq!(ScaleFactor::default().get(), DEFAULT_SCALE);
    }

    // ── Dead-zone ─────────────────────────────────────────────────────────────

    #[test]
    fn test_non_finite_dead_zone_falls_back_to_default() {
        let mut s = MotionScaler::new(&MotionConfig {
            default_scale: 1.0,
            dead_zone: f64::NAN,
            ..MotionConfig::default()
        });
        assert_eq!(s.apply(0.2, -0.2), None);
        assert_eq!(s.apply(1.0, 0.0), Some((1.0, 0.0)));
    }

    #[test]
    fn test_apply_inside_dead_zone_returns_none() {
        // Arrange – 0.2 * 2.0 = 0.4 on both axes, below 0.5
        let mut s = scaler(2.0, false, 1);

        // Act / Assert
        assert_eq!(s.apply(0.2, -0.2), None);
        assert_eq!(s.apply(0.0, 0.0), None);
    }

    #[test]
    fn test_apply_dead_zone_sweep_never_emits() {
        let mut s = scaler(1.0, false, 1);
        let mut v = -0.49;
        while v < 0.49 {
            assert_eq!(s.apply(v, -v), None, "delta {v} must be dropped");
            v += 0.01;
        }
    }

    #[test]
    fn test_apply_one_axis_at_threshold_passes() {
        // Arrange – exactly 0.5 on x is not below the threshold
        let mut s = scaler(1.0, false, 1);

        // Act / Assert
        assert_eq!(s.apply(0.5, 0.0), Some((0.5, 0.0)));
        assert_eq!(s.apply(0.1, -0.6), Some((0.1, -0.6)));
    }

    // ── Scaling ───────────────────────────────────────────────────────────────

    #[test]
    fn test_apply_scales_each_axis() {
        let mut s = scaler(2.0, false, 1);
        assert_eq!(s.apply(1.0, 1.0), Some((2.0, 2.0)));
        assert_eq!(s.apply(-3.0, 0.5), Some((-6.0, 1.0)));
    }

    #[test]
    fn test_set_scale_takes_effect_immediately() {
        // Arrange
        let mut s = scaler(1.0, false, 1);
        assert_eq!(s.apply(2.0, 0.0), Some((2.0, 0.0)));

        // Act
        s.set_scale(ScaleFactor::new(3.0).unwrap());

        // Assert
        assert_eq!(s.apply(2.0, 0.0), Some((6.0, 0.0)));
        assert_eq!(s.scale().get(), 3.0);
    }

    #[test]
    fn test_invalid_configured_scale_falls_back_to_default() {
        let s = scaler(-1.0, false, 1);
        assert_eq!(s.scale(), ScaleFactor::default());
    }

    // ── Smoothing ─────────────────────────────────────────────────────────────

    #[test]
    fn test_smoothing_single_entry_history_equals_instantaneous() {
        let mut s = scaler(2.0, true, 1);
        assert_eq!(s.apply(1.0, 1.0), Some((2.0, 2.0)));
        assert_eq!(s.apply(3.0, -1.0), Some((6.0, -2.0)));
    }

    #[test]
    fn test_smoothing_averages_recent_deltas() {
        // Arrange
        let mut s = scaler(1.0, true, 3);

        // Act
        s.apply(3.0, 0.0);
        s.apply(6.0, 0.0);
        let third = s.apply(9.0, 3.0);
        let fourth = s.apply(12.0, 0.0); // evicts (3, 0)

        // Assert
        assert_eq!(third, Some((6.0, 1.0)));
        assert_eq!(fourth, Some((9.0, 1.0)));
    }

    #[test]
    fn test_smoothing_dead_zone_drop_leaves_history_untouched() {
        let mut s = scaler(1.0, true, 5);
        s.apply(4.0, 4.0);
        assert_eq!(s.apply(0.1, 0.1), None);
        assert_eq!(s.history().map(MotionHistory::len), Some(1));
    }

    #[test]
    fn test_non_smoothing_scaler_has_no_history() {
        let s = scaler(1.0, false, 5);
        assert!(!s.is_smoothing());
        assert!(s.history().is_none());
    }

    // ── MotionHistory ─────────────────────────────────────────────────────────

    #[test]
    fn test_history_evicts_oldest_on_overflow() {
        let mut h = MotionHistory::new(2);
        h.push(1.0, 1.0);
        h.push(2.0, 2.0);
        h.push(4.0, 4.0);
        assert_eq!(h.len(), 2);
        assert_eq!(h.mean(), Some((3.0, 3.0)));
    }

    #[test]
    fn test_history_zero_capacity_is_clamped_to_one() {
        let mut h = MotionHistory::new(0);
        assert_eq!(h.capacity(), 1);
        h.push(5.0, 1.0);
        h.push(7.0, 3.0);
        assert_eq!(h.mean(), Some((7.0, 3.0)));
    }

    #[test]
    fn test_history_mean_of_empty_is_none() {
        let h = MotionHistory::new(3);
        assert!(h.is_empty());
        assert_eq!(h.mean(), None);
    }
}
