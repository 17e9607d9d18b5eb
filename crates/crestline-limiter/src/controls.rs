//! Host-side control surface for the limiter.
//!
//! [`LimiterControls`] holds user-facing targets (dB, ms, on/off) and turns
//! them into one smoothed [`LimiterParams`] per frame. This is where range
//! clamping happens: every setter clamps through the parameter descriptor.
//!
//! | Control | Smoothing |
//! |---------|-----------|
//! | Threshold, pre-gain | exponential in dB, 10 ms |
//! | Attack, hold, release | exponential in seconds, 10 ms |
//! | Bypass | linear ramp, 20 ms by default |
//! | Peak reset | delivered for exactly one frame |

use crestline_core::{LinearSmoothedParam, SmoothedParam, db_to_linear};

use crate::params::{
    ATTACK, BYPASS, DESCRIPTORS, HOLD, LimiterParams, PRE_GAIN, ParamProvider, RELEASE, THRESHOLD,
};

/// Default bypass crossfade time in milliseconds.
pub const DEFAULT_BYPASS_RAMP_MS: f32 = 20.0;

/// Smoothed user controls implementing [`ParamProvider`].
///
/// # Example
///
/// ```rust
/// use crestline_limiter::{LimiterControls, ParamProvider};
///
/// let mut controls = LimiterControls::new(48000.0);
/// controls.set_threshold_db(-200.0); // clamped to -60 dB
/// assert_eq!(controls.threshold_db(), -60.0);
///
/// controls.set_bypass(true);
/// let first = controls.next_params();
/// assert!(first.bypass > 0.0 && first.bypass < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct LimiterControls {
    threshold_db: SmoothedParam,
    attack_s: SmoothedParam,
    hold_s: SmoothedParam,
    release_s: SmoothedParam,
    pre_gain_db: SmoothedParam,
    bypass: LinearSmoothedParam,
    bypassed: bool,
    reset_peak_pending: bool,
}

impl LimiterControls {
    /// Controls at the descriptor defaults with a 20 ms bypass ramp.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_bypass_ramp(sample_rate, DEFAULT_BYPASS_RAMP_MS)
    }

    /// Controls with a custom bypass ramp time.
    pub fn with_bypass_ramp(sample_rate: f32, bypass_ramp_ms: f32) -> Self {
        let bypassed = DESCRIPTORS[BYPASS].default >= 0.5;
        Self {
            threshold_db: SmoothedParam::standard(DESCRIPTORS[THRESHOLD].default, sample_rate),
            attack_s: SmoothedParam::standard(DESCRIPTORS[ATTACK].default / 1000.0, sample_rate),
            hold_s: SmoothedParam::standard(DESCRIPTORS[HOLD].default / 1000.0, sample_rate),
            release_s: SmoothedParam::standard(DESCRIPTORS[RELEASE].default / 1000.0, sample_rate),
            pre_gain_db: SmoothedParam::standard(DESCRIPTORS[PRE_GAIN].default, sample_rate),
            bypass: LinearSmoothedParam::with_config(
                if bypassed { 1.0 } else { 0.0 },
                sample_rate,
                bypass_ramp_ms,
            ),
            bypassed,
            reset_peak_pending: false,
        }
    }

    /// Set the threshold in dB (clamped to -60..0).
    pub fn set_threshold_db(&mut self, db: f32) {
        if let Some(db) = clamp_finite(THRESHOLD, db) {
            self.threshold_db.set_target(db);
        }
    }

    /// Set the attack time in ms (clamped to 1..50).
    ///
    /// Attack also sets the look-ahead delay, so changing it moves the
    /// output latency.
    pub fn set_attack_ms(&mut self, ms: f32) {
        if let Some(ms) = clamp_finite(ATTACK, ms) {
            self.attack_s.set_target(ms / 1000.0);
        }
    }

    /// Set the hold time in ms (clamped to 0..1000).
    pub fn set_hold_ms(&mut self, ms: f32) {
        if let Some(ms) = clamp_finite(HOLD, ms) {
            self.hold_s.set_target(ms / 1000.0);
        }
    }

    /// Set the release time in ms (clamped to 50..1000).
    pub fn set_release_ms(&mut self, ms: f32) {
        if let Some(ms) = clamp_finite(RELEASE, ms) {
            self.release_s.set_target(ms / 1000.0);
        }
    }

    /// Set the pre-gain in dB (clamped to 0..120).
    pub fn set_pre_gain_db(&mut self, db: f32) {
        if let Some(db) = clamp_finite(PRE_GAIN, db) {
            self.pre_gain_db.set_target(db);
        }
    }

    /// Engage or release bypass; the mix ramps over the bypass ramp time.
    pub fn set_bypass(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
        self.bypass.set_target(if bypassed { 1.0 } else { 0.0 });
    }

    /// Restart the peak meters on the next frame.
    pub fn request_peak_reset(&mut self) {
        self.reset_peak_pending = true;
    }

    /// Threshold target in dB.
    pub fn threshold_db(&self) -> f32 {
        self.threshold_db.target()
    }

    /// Attack target in ms.
    pub fn attack_ms(&self) -> f32 {
        self.attack_s.target() * 1000.0
    }

    /// Hold target in ms.
    pub fn hold_ms(&self) -> f32 {
        self.hold_s.target() * 1000.0
    }

    /// Release target in ms.
    pub fn release_ms(&self) -> f32 {
        self.release_s.target() * 1000.0
    }

    /// Pre-gain target in dB.
    pub fn pre_gain_db(&self) -> f32 {
        self.pre_gain_db.target()
    }

    /// Bypass target.
    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    /// Whether every smoother has reached its target.
    pub fn is_settled(&self) -> bool {
        self.threshold_db.is_settled()
            && self.attack_s.is_settled()
            && self.hold_s.is_settled()
            && self.release_s.is_settled()
            && self.pre_gain_db.is_settled()
            && self.bypass.is_settled()
    }

    /// Jump every smoother to its target.
    ///
    /// Used before offline processing so the first frame already runs at
    /// the configured settings.
    pub fn snap_to_targets(&mut self) {
        self.threshold_db.snap_to_target();
        self.attack_s.snap_to_target();
        self.hold_s.snap_to_target();
        self.release_s.snap_to_target();
        self.pre_gain_db.snap_to_target();
        self.bypass.snap_to_target();
    }

    /// Parameters as they would be with all smoothing finished.
    pub fn target_params(&self) -> LimiterParams {
        LimiterParams {
            threshold: db_to_linear(self.threshold_db.target()),
            attack: self.attack_s.target(),
            hold: self.hold_s.target(),
            release: self.release_s.target(),
            pre_gain: db_to_linear(self.pre_gain_db.target()),
            bypass: self.bypass.target(),
            reset_peak: false,
        }
    }
}

impl ParamProvider for LimiterControls {
    fn next_params(&mut self) -> LimiterParams {
        LimiterParams {
            threshold: db_to_linear(self.threshold_db.advance()),
            attack: self.attack_s.advance(),
            hold: self.hold_s.advance(),
            release: self.release_s.advance(),
            pre_gain: db_to_linear(self.pre_gain_db.advance()),
            bypass: self.bypass.advance(),
            reset_peak: core::mem::take(&mut self.reset_peak_pending),
        }
    }
}

/// Clamp `value` to the range of parameter `index`; `None` for NaN/inf.
fn clamp_finite(index: usize, value: f32) -> Option<f32> {
    value.is_finite().then(|| DESCRIPTORS[index].clamp(value))
}
