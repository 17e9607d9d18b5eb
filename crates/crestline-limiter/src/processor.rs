//! Self-contained limiter: core plus controls behind [`Effect`].
//!
//! [`Limiter`] owns a [`StereoLimiter`] and the [`LimiterControls`] feeding
//! it, so hosts that only speak [`Effect`] and [`ParameterInfo`] can drive
//! the limiter without wiring a provider themselves.
//!
//! ## Parameter Indices (`ParameterInfo`)
//!
//! | Index | Name | Range | Default |
//! |-------|------|-------|---------|
//! | 0 | Threshold | -60.0–0.0 dB | -1.0 |
//! | 1 | Attack | 1.0–50.0 ms | 10.0 |
//! | 2 | Hold | 0.0–1000.0 ms | 50.0 |
//! | 3 | Release | 50.0–1000.0 ms | 150.0 |
//! | 4 | Pre-gain | 0.0–120.0 dB | 0.0 |
//! | 5 | Bypass | 0 / 1 | 0 |

use crestline_core::{Effect, ParamDescriptor, ParameterInfo, StereoFrame, lookahead_samples};

use crate::controls::{DEFAULT_BYPASS_RAMP_MS, LimiterControls};
use crate::limiter::{LimiterConfig, LimiterOutput, Meters, StereoLimiter};
use crate::params::{
    ATTACK, BYPASS, HOLD, PARAM_COUNT, PRE_GAIN, RELEASE, THRESHOLD, descriptor,
};

/// Stereo limiter with built-in parameter smoothing.
///
/// # Example
///
/// ```rust
/// use crestline_core::{Effect, ParameterInfo, StereoFrame};
/// use crestline_limiter::Limiter;
///
/// let mut limiter = Limiter::new(48000.0);
/// limiter.controls_mut().set_threshold_db(-6.0);
/// limiter.controls_mut().snap_to_targets();
///
/// assert_eq!(limiter.latency_samples(), 480);
/// assert_eq!(limiter.find_param_by_name("release"), Some(3));
///
/// let out = limiter.process(StereoFrame::mono(1.0));
/// assert_eq!(out, StereoFrame::SILENCE); // still inside the look-ahead
/// ```
#[derive(Debug, Clone)]
pub struct Limiter {
    core: StereoLimiter,
    controls: LimiterControls,
    meters: Meters,
}

impl Limiter {
    /// Limiter with default buffer, crossfade and bypass ramp.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_config(sample_rate, LimiterConfig::default(), DEFAULT_BYPASS_RAMP_MS)
    }

    /// Limiter with explicit construction settings.
    pub fn with_config(sample_rate: f32, config: LimiterConfig, bypass_ramp_ms: f32) -> Self {
        Self {
            core: StereoLimiter::with_config(sample_rate, config),
            controls: LimiterControls::with_bypass_ramp(sample_rate, bypass_ramp_ms),
            meters: Meters::default(),
        }
    }

    /// Process one frame and return audio plus meters.
    #[inline]
    pub fn process_frame(&mut self, input: StereoFrame) -> LimiterOutput {
        let out = self.core.process_with(&mut self.controls, input);
        self.meters = out.meters;
        out
    }

    /// Meter readings after the last processed frame.
    pub fn meters(&self) -> Meters {
        self.meters
    }

    /// User controls.
    pub fn controls(&self) -> &LimiterControls {
        &self.controls
    }

    /// Mutable user controls.
    pub fn controls_mut(&mut self) -> &mut LimiterControls {
        &mut self.controls
    }

    /// The limiter core.
    pub fn core(&self) -> &StereoLimiter {
        &self.core
    }

    /// Sample rate fixed at construction.
    pub fn sample_rate(&self) -> f32 {
        self.core.sample_rate()
    }
}

impl Effect for Limiter {
    #[inline]
    fn process(&mut self, frame: StereoFrame) -> StereoFrame {
        self.process_frame(frame).audio
    }

    /// Clears signal state and meters; control targets are kept.
    fn reset(&mut self) {
        self.core.reset();
        self.controls.snap_to_targets();
        self.meters = Meters::default();
    }

    /// Look-ahead at the current attack target.
    fn latency_samples(&self) -> usize {
        lookahead_samples(self.controls.attack_ms() / 1000.0, self.core.sample_rate())
    }
}

impl ParameterInfo for Limiter {
    fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        descriptor(index)
    }

    fn get_param(&self, index: usize) -> f32 {
        let c = &self.controls;
        match index {
            THRESHOLD => c.threshold_db(),
            ATTACK => c.attack_ms(),
            HOLD => c.hold_ms(),
            RELEASE => c.release_ms(),
            PRE_GAIN => c.pre_gain_db(),
            BYPASS => {
                if c.is_bypassed() {
                    1.0
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let c = &mut self.controls;
        match index {
            THRESHOLD => c.set_threshold_db(value),
            ATTACK => c.set_attack_ms(value),
            HOLD => c.set_hold_ms(value),
            RELEASE => c.set_release_ms(value),
            PRE_GAIN => c.set_pre_gain_db(value),
            BYPASS => c.set_bypass(value >= 0.5),
            _ => {}
        }
    }
}
