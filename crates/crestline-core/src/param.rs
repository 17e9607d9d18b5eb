//! Host-side parameter smoothing.
//!
//! The limiter core consumes one already-smoothed scalar per parameter per
//! sample. These types turn stepwise user edits into such scalars:
//!
//! - [`SmoothedParam`] - exponential approach, for levels and times
//! - [`LinearSmoothedParam`] - fixed-duration linear ramp, for the bypass mix
//!
//! ```rust
//! use crestline_core::SmoothedParam;
//!
//! let mut threshold_db = SmoothedParam::standard(-1.0, 48000.0);
//! threshold_db.set_target(-6.0);
//! for _ in 0..480 {
//!     threshold_db.advance();
//! }
//! assert!(threshold_db.get() < -3.0);
//! ```

use libm::expf;

/// Default time constant for level-like parameters, in milliseconds.
pub const STANDARD_SMOOTHING_MS: f32 = 10.0;

/// Exponentially smoothed parameter value.
///
/// `y[n] = y[n-1] + coeff · (target - y[n-1])` with
/// `coeff = 1 - exp(-1 / (τ · SR))`. A time constant of 0 disables
/// smoothing.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    coeff: f32,
}

impl SmoothedParam {
    /// Parameter at `initial` approaching targets with time constant
    /// `smoothing_time_ms`.
    pub fn with_config(initial: f32, sample_rate: f32, smoothing_time_ms: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: smoothing_coeff_for(smoothing_time_ms, sample_rate),
        }
    }

    /// Smoothed with [`STANDARD_SMOOTHING_MS`].
    pub fn standard(initial: f32, sample_rate: f32) -> Self {
        Self::with_config(initial, sample_rate, STANDARD_SMOOTHING_MS)
    }

    /// Set the value to approach.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Current value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Value being approached.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Whether the value is within 1e-6 of its target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < 1e-6
    }

    /// Jump to the target.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }
}

fn smoothing_coeff_for(time_ms: f32, sample_rate: f32) -> f32 {
    if time_ms <= 0.0 || sample_rate <= 0.0 {
        1.0
    } else {
        1.0 - expf(-1000.0 / (time_ms * sample_rate))
    }
}

/// Parameter that ramps linearly to each new target over a fixed time.
///
/// The ramp length is fixed at the moment the target changes, so a
/// transition always lasts `transition_time_ms` regardless of distance.
#[derive(Debug, Clone)]
pub struct LinearSmoothedParam {
    current: f32,
    target: f32,
    increment: f32,
    samples_remaining: u32,
    sample_rate: f32,
    transition_time_ms: f32,
}

impl LinearSmoothedParam {
    /// Parameter at `initial` ramping over `transition_time_ms`.
    pub fn with_config(initial: f32, sample_rate: f32, transition_time_ms: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            increment: 0.0,
            samples_remaining: 0,
            sample_rate,
            transition_time_ms,
        }
    }

    /// Start a ramp toward `target`. Repeating the current target is a no-op.
    pub fn set_target(&mut self, target: f32) {
        if (target - self.target).abs() < 1e-9 {
            return;
        }
        self.target = target;

        let samples = self.transition_samples();
        if samples == 0 {
            self.snap_to_target();
        } else {
            self.increment = (target - self.current) / samples as f32;
            self.samples_remaining = samples;
        }
    }

    /// Duration of a ramp in samples at the current settings.
    pub fn transition_samples(&self) -> u32 {
        let samples = libm::roundf(self.transition_time_ms / 1000.0 * self.sample_rate);
        if samples > 0.0 { samples as u32 } else { 0 }
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.samples_remaining > 0 {
            self.current += self.increment;
            self.samples_remaining -= 1;
            if self.samples_remaining == 0 {
                self.current = self.target;
            }
        }
        self.current
    }

    /// Current value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Value being ramped to.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Whether the ramp has finished.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.samples_remaining == 0
    }

    /// End the ramp at the target.
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
        self.increment = 0.0;
        self.samples_remaining = 0;
    }
}
