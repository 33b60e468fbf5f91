// config.rs - Host-supplied tunables
//
// The page passes a plain object; every field is optional and falls back to
// the values the pit was tuned with.

use serde::{Deserialize, Serialize};

use crate::error::PitError;

pub const DEFAULT_SEED: u64 = 0xDEAD_BEEF;

/// How per-frame easing factors are applied.
///
/// The factors were tuned against a ~60 Hz display. `PerFrame` applies them
/// verbatim every frame; `TimeScaled` rescales them by the frame's length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Smoothing {
    #[default]
    PerFrame,
    TimeScaled,
}

impl Smoothing {
    /// Effective easing factor for one step of `dt` seconds.
    #[inline]
    pub fn factor(self, per_frame: f32, dt: f32) -> f32 {
        match self {
            Smoothing::PerFrame => per_frame,
            // 1 - exp(-k*dt) with k = -60 ln(1 - f)
            Smoothing::TimeScaled => 1.0 - (1.0 - per_frame).powf(dt * 60.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PitConfig {
    pub width: f32,
    pub height: f32,
    pub seed: Option<u64>,
    pub reduced_motion: bool,
    pub smoothing: Smoothing,
    /// Snakes released when the gate opens.
    pub initial_snakes: usize,
    /// The trickle spawner stops once this many snakes exist.
    pub trickle_cap: usize,
    pub trickle_interval: f64,
    /// Seconds between crumb showers while extreme mode is on.
    pub rain_interval: f64,
    /// Smoothed frame rate below which eyes are shed.
    pub shed_fps: f32,
}

impl Default for PitConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 540.0,
            seed: None,
            reduced_motion: false,
            smoothing: Smoothing::PerFrame,
            initial_snakes: 6,
            trickle_cap: 20,
            trickle_interval: 3.5,
            rain_interval: 6.0,
            shed_fps: 30.0,
        }
    }
}

impl PitConfig {
    pub fn validate(&self) -> Result<(), PitError> {
        if !valid_extent(self.width) || !valid_extent(self.height) {
            return Err(PitError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.trickle_interval.is_finite() && self.trickle_interval > 0.0) {
            return Err(PitError::InvalidConfig(format!(
                "trickleInterval must be positive, got {}",
                self.trickle_interval
            )));
        }
        if !(self.rain_interval.is_finite() && self.rain_interval > 0.0) {
            return Err(PitError::InvalidConfig(format!(
                "rainInterval must be positive, got {}",
                self.rain_interval
            )));
        }
        if !self.shed_fps.is_finite() || self.shed_fps < 0.0 {
            return Err(PitError::InvalidConfig(format!(
                "shedFps must be a non-negative number, got {}",
                self.shed_fps
            )));
        }
        Ok(())
    }

    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }
}

#[inline]
pub fn valid_extent(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(PitConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_viewport() {
        let config = PitConfig { width: 0.0, ..PitConfig::default() };
        assert!(matches!(
            config.validate(),
            Err(PitError::InvalidDimensions { .. })
        ));

        let config = PitConfig { height: f32::NAN, ..PitConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_intervals() {
        let config = PitConfig { trickle_interval: 0.0, ..PitConfig::default() };
        assert!(matches!(config.validate(), Err(PitError::InvalidConfig(_))));
    }

    #[test]
    fn per_frame_smoothing_ignores_dt() {
        assert_eq!(Smoothing::PerFrame.factor(0.08, 0.001), 0.08);
        assert_eq!(Smoothing::PerFrame.factor(0.08, 0.05), 0.08);
    }

    #[test]
    fn time_scaled_smoothing_matches_at_sixty_hz() {
        let f = Smoothing::TimeScaled.factor(0.08, 1.0 / 60.0);
        assert!((f - 0.08).abs() < 1e-5);
        // Two half-length frames ease as far as one full frame.
        let half = Smoothing::TimeScaled.factor(0.08, 1.0 / 120.0);
        let combined = 1.0 - (1.0 - half) * (1.0 - half);
        assert!((combined - 0.08).abs() < 1e-5);
    }

    #[test]
    fn seed_falls_back_to_default() {
        assert_eq!(PitConfig::default().seed(), DEFAULT_SEED);
        let config = PitConfig { seed: Some(7), ..PitConfig::default() };
        assert_eq!(config.seed(), 7);
    }
}
