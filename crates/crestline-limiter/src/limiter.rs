//! Stereo look-ahead peak limiter.
//!
//! The limiter bounds the output to a threshold by computing its gain from
//! the *undelayed* signal and applying that gain to a copy delayed by the
//! attack time. The gain envelope therefore starts moving before the peak it
//! reacts to reaches the output.
//!
//! # Signal Flow
//!
//! ```text
//!             ┌── |L|,|R| max ── peak hold ×8 ── smoother ×4 ── gain ──┐
//! in ── pre ──┤                                                        × ── bypass mix ── out
//!             └── crossfade delay (L, R) ──────────────────────────────┘
//! ```
//!
//! 1. **Pre-gain**: both channels are multiplied by `pre_gain`.
//! 2. **Stereo link**: the detector sees `max(|L|, |R|)` so one gain serves
//!    both channels and the stereo balance survives limiting.
//! 3. **Peak hold**: eight timer/compare stages with `(attack + hold) / 8`
//!    each. Holding for at least the attack time guarantees the detector is
//!    still at the peak when the delayed peak reaches the output.
//! 4. **Smoothing**: four cutoff-corrected one-pole stages with the attack
//!    and release times give a fourth-order envelope with the nominal timing.
//! 5. **Gain**: `threshold / max(threshold, smoothed)`, always in `(0, 1]`.
//! 6. **Delay**: `round(attack · SR / 8) · 8` samples, the cumulative window
//!    of the peak-hold cascade. Length changes crossfade between taps.
//! 7. **Bypass**: `input · bypass + (1 - bypass) · limited`, where `input`
//!    is the raw frame before pre-gain.
//!
//! # Overshoot
//!
//! The IIR envelope approaches but never exactly reaches the held peak, so
//! the output can exceed the threshold by a tiny amount. For an isolated
//! impulse with 10 ms attack at 48 kHz the excess is about 0.03%.
//!
//! # References
//!
//! - Giannoulis, Massberg & Reiss, "Digital Dynamic Range Compressor Design -
//!   A Tutorial and Analysis", JAES vol. 60 no. 6, 2012.
//! - Zölzer, "DAFX: Digital Audio Effects" (2nd ed.), Ch. 4.

use crestline_core::{
    CrossfadeDelay, LOOKAHEAD_GRID, PEAK_FLOOR_DB, PeakHoldCascade, PeakMeter, SmootherCascade,
    StereoFrame, linear_to_db, lookahead_samples, seconds_to_samples,
};

use crate::params::{LimiterParams, ParamProvider};

/// Number of peak-hold stages in the detector.
pub const DETECTOR_STAGES: usize = LOOKAHEAD_GRID;

/// Number of one-pole stages in the gain smoother.
pub const SMOOTHER_STAGES: usize = 4;

/// Default length of the delay buffer in seconds.
pub const DEFAULT_MAX_DELAY_S: f32 = 0.1;

/// Default crossfade length for delay changes, in samples.
pub const DEFAULT_CROSSFADE_SAMPLES: u32 = 1024;

/// Lowest attenuation reading in dB.
pub const ATTENUATION_FLOOR_DB: f32 = -120.0;

/// Construction-time limiter settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimiterConfig {
    /// Longest look-ahead the delay buffers can hold, in seconds.
    pub max_delay_s: f32,
    /// Samples taken to crossfade between delay lengths.
    pub crossfade_samples: u32,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            max_delay_s: DEFAULT_MAX_DELAY_S,
            crossfade_samples: DEFAULT_CROSSFADE_SAMPLES,
        }
    }
}

/// Monitoring values produced alongside every output frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Meters {
    /// Held left output peak in dB, `[-60, 60]`.
    pub left_peak_db: f32,
    /// Held right output peak in dB, `[-60, 60]`.
    pub right_peak_db: f32,
    /// Current gain reduction in dB, `[-120, 0]`.
    pub attenuation_db: f32,
}

impl Default for Meters {
    fn default() -> Self {
        Self {
            left_peak_db: PEAK_FLOOR_DB,
            right_peak_db: PEAK_FLOOR_DB,
            attenuation_db: 0.0,
        }
    }
}

/// Result of one limiter step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LimiterOutput {
    /// Output frame.
    pub audio: StereoFrame,
    /// Meter readings after this frame.
    pub meters: Meters,
}

/// Gain that brings `smoothed` down to `threshold`.
///
/// `threshold / max(threshold, smoothed)`: unity while the envelope is below
/// the threshold, non-increasing in `smoothed` above it.
///
/// ```rust
/// use crestline_limiter::limiter_gain;
///
/// assert_eq!(limiter_gain(0.5, 0.25), 1.0);
/// assert_eq!(limiter_gain(0.5, 2.0), 0.25);
/// ```
#[inline]
pub fn limiter_gain(threshold: f32, smoothed: f32) -> f32 {
    let threshold = threshold.max(f32::MIN_POSITIVE);
    threshold / threshold.max(smoothed)
}

/// Stereo look-ahead peak limiter core.
///
/// Parameters arrive per frame through [`step`](Self::step) or a
/// [`ParamProvider`]; the limiter keeps no parameter state of its own beyond
/// cached filter coefficients.
///
/// # Example
///
/// ```rust
/// use crestline_core::StereoFrame;
/// use crestline_limiter::{LimiterParams, StereoLimiter};
///
/// let mut limiter = StereoLimiter::new(48000.0);
/// let params = LimiterParams::default().with_threshold_db(-6.0);
///
/// let mut last = StereoFrame::SILENCE;
/// for _ in 0..48000 {
///     last = limiter.step(StereoFrame::mono(1.0), &params).audio;
/// }
/// assert!(last.left <= 0.5013);
/// ```
#[derive(Debug, Clone)]
pub struct StereoLimiter {
    sample_rate: f32,
    detector: PeakHoldCascade<DETECTOR_STAGES>,
    envelope: SmootherCascade<SMOOTHER_STAGES>,
    delay_left: CrossfadeDelay,
    delay_right: CrossfadeDelay,
    meter_left: PeakMeter,
    meter_right: PeakMeter,
    delay_samples: usize,
    gain: f32,
    primed: bool,
}

impl StereoLimiter {
    /// Limiter with a 100 ms delay buffer and a 1024-sample crossfade.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_config(sample_rate, LimiterConfig::default())
    }

    /// Limiter with explicit buffer and crossfade settings.
    ///
    /// # Panics
    ///
    /// Panics if the sample rate or `max_delay_s` is not positive and
    /// finite, or if `crossfade_samples` is 0.
    pub fn with_config(sample_rate: f32, config: LimiterConfig) -> Self {
        assert!(
            sample_rate.is_finite() && sample_rate > 0.0,
            "Sample rate must be positive and finite"
        );
        assert!(
            config.max_delay_s.is_finite() && config.max_delay_s > 0.0,
            "Maximum delay must be positive and finite"
        );

        let capacity = seconds_to_samples(config.max_delay_s, sample_rate) + 1;
        let initial = LimiterParams::default();
        let delay_samples = lookahead_samples(initial.attack, sample_rate);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate,
            capacity,
            crossfade = config.crossfade_samples,
            "limiter constructed"
        );

        Self {
            sample_rate,
            detector: PeakHoldCascade::new(sample_rate),
            envelope: SmootherCascade::new(sample_rate),
            delay_left: CrossfadeDelay::new(capacity, config.crossfade_samples, delay_samples),
            delay_right: CrossfadeDelay::new(capacity, config.crossfade_samples, delay_samples),
            meter_left: PeakMeter::new(),
            meter_right: PeakMeter::new(),
            delay_samples,
            gain: 1.0,
            primed: false,
        }
    }

    /// Process one frame with the given parameters.
    #[inline]
    pub fn step(&mut self, input: StereoFrame, params: &LimiterParams) -> LimiterOutput {
        let driven = input.scaled(params.pre_gain);

        self.detector.set_window(params.attack + params.hold);
        let held = self.detector.process(driven.peak());

        self.envelope.set_times(params.attack, params.release);
        let smoothed = self.envelope.process(held);
        self.gain = limiter_gain(params.threshold, smoothed);

        self.delay_samples = lookahead_samples(params.attack, self.sample_rate);
        if !self.primed {
            // nothing has been heard yet, so start on the requested tap
            self.delay_left.jump_to(self.delay_samples);
            self.delay_right.jump_to(self.delay_samples);
            self.primed = true;
        }
        let delayed = StereoFrame::new(
            self.delay_left.process(driven.left, self.delay_samples),
            self.delay_right.process(driven.right, self.delay_samples),
        );
        let limited = delayed.scaled(self.gain);

        let bypass = params.bypass.clamp(0.0, 1.0);
        let audio = StereoFrame::new(
            input.left * bypass + (1.0 - bypass) * limited.left,
            input.right * bypass + (1.0 - bypass) * limited.right,
        );

        self.meter_left.process(audio.left, params.reset_peak);
        self.meter_right.process(audio.right, params.reset_peak);

        LimiterOutput {
            audio,
            meters: self.meters(),
        }
    }

    /// Poll `provider` once and process one frame.
    #[inline]
    pub fn process_with<P: ParamProvider + ?Sized>(
        &mut self,
        provider: &mut P,
        input: StereoFrame,
    ) -> LimiterOutput {
        let params = provider.next_params();
        self.step(input, &params)
    }

    /// Current meter readings.
    pub fn meters(&self) -> Meters {
        Meters {
            left_peak_db: self.meter_left.peak_db(),
            right_peak_db: self.meter_right.peak_db(),
            attenuation_db: linear_to_db(self.gain).clamp(ATTENUATION_FLOOR_DB, 0.0),
        }
    }

    /// Gain applied on the last frame.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Look-ahead requested on the last frame, in samples.
    ///
    /// The first frame after construction or [`reset`](Self::reset) starts
    /// directly on its own look-ahead; later changes crossfade.
    pub fn delay_samples(&self) -> usize {
        self.delay_samples
    }

    /// Look-ahead currently heard at the output, in samples.
    ///
    /// Differs from [`delay_samples`](Self::delay_samples) while a delay
    /// change is crossfading.
    pub fn effective_delay(&self) -> f32 {
        self.delay_left.effective_delay()
    }

    /// Longest look-ahead the buffers can hold, in samples.
    pub fn max_delay_samples(&self) -> usize {
        self.delay_left.max_delay()
    }

    /// Sample rate fixed at construction.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Restart both held peak meters.
    pub fn reset_meters(&mut self) {
        self.meter_left.reset();
        self.meter_right.reset();
    }

    /// Clear all signal state: detector, envelope, delay buffers and meters.
    pub fn reset(&mut self) {
        self.detector.reset();
        self.envelope.reset();
        self.delay_left.reset();
        self.delay_right.reset();
        self.reset_meters();
        self.gain = 1.0;
        self.primed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crestline_core::db_to_linear;

    const SR: f32 = 48000.0;

    #[test]
    fn gain_is_unity_below_threshold() {
        assert_eq!(limiter_gain(0.5, 0.0), 1.0);
        assert_eq!(limiter_gain(0.5, 0.5), 1.0);
    }

    #[test]
    fn gain_non_increasing_in_envelope() {
        let mut prev = 1.0;
        for i in 0..1000 {
            let g = limiter_gain(0.25, i as f32 * 0.01);
            assert!(g <= prev && g > 0.0);
            prev = g;
        }
    }

    #[test]
    fn gain_survives_zero_threshold() {
        let g = limiter_gain(0.0, 0.0);
        assert!(g.is_finite() && g > 0.0);
    }

    #[test]
    fn default_delay_matches_default_attack() {
        let limiter = StereoLimiter::new(SR);
        assert_eq!(limiter.delay_samples(), 480);
        assert!(limiter.max_delay_samples() >= 4800);
    }

    #[test]
    fn meters_start_at_rest() {
        let limiter = StereoLimiter::new(SR);
        assert_eq!(limiter.meters(), Meters::default());
    }

    #[test]
    fn attenuation_tracks_gain() {
        let mut limiter = StereoLimiter::new(SR);
        let params = LimiterParams::default().with_threshold_db(-12.0);
        for _ in 0..4800 {
            limiter.step(StereoFrame::mono(1.0), &params);
        }
        let meters = limiter.meters();
        assert!((meters.attenuation_db - (-12.0)).abs() < 0.05, "{meters:?}");
        assert!((limiter.gain() - db_to_linear(-12.0)).abs() < 1e-3);
    }

    #[test]
    fn reset_restores_rest_state() {
        let mut limiter = StereoLimiter::new(SR);
        let params = LimiterParams::default().with_threshold_db(-20.0);
        for _ in 0..2000 {
            limiter.step(StereoFrame::mono(1.0), &params);
        }
        limiter.reset();
        assert_eq!(limiter.gain(), 1.0);
        assert_eq!(limiter.meters(), Meters::default());
        let out = limiter.step(StereoFrame::SILENCE, &params);
        assert_eq!(out.audio, StereoFrame::SILENCE);
    }

    #[test]
    fn first_frame_starts_on_its_own_lookahead() {
        let mut limiter = StereoLimiter::new(SR);
        let params = LimiterParams::default().with_times_ms(2.0, 0.0, 150.0);
        limiter.step(StereoFrame::SILENCE, &params);
        assert_eq!(limiter.delay_samples(), 96);
        assert_eq!(limiter.effective_delay(), 96.0);
    }

    #[test]
    #[should_panic]
    fn rejects_zero_sample_rate() {
        let _ = StereoLimiter::new(0.0);
    }

    #[test]
    #[should_panic]
    fn rejects_zero_crossfade() {
        let _ = StereoLimiter::with_config(
            SR,
            LimiterConfig {
                max_delay_s: 0.1,
                crossfade_samples: 0,
            },
        );
    }
}
