//! Peak-hold detectors for look-ahead gain computation.
//!
//! [`PeakHold`] keeps the most recent high-water mark of `|x|` for a bounded
//! window and then forces a refresh, so an old peak cannot mask a later,
//! smaller one forever:
//!
//! ```text
//! new_peak = |x| >= held
//! timeout  = timer >= window
//! if new_peak || timeout { held = |x|; timer = 0 } else { timer += 1 }
//! ```
//!
//! A single stage with window `W` hides any smaller peak that arrives within
//! `W` samples of a larger one. [`PeakHoldCascade`] splits `W` over `M`
//! stages of `W/M` each: a secondary peak at least `W/M + 1` samples after
//! the primary expires out of the first stage and travels down the chain,
//! while the cascade as a whole still holds the primary for about `W`.
//! Peaks closer together than that are left to the release section of the
//! smoother cascade.

use crate::seconds_to_samples;

/// Single timer/compare peak-hold stage.
///
/// # Invariants
///
/// - `held` is never negative
/// - with a fixed window, `timer` never exceeds `window`
#[derive(Debug, Clone, Default)]
pub struct PeakHold {
    timer: u32,
    held: f32,
}

impl PeakHold {
    /// Create a stage with zero state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one sample with a hold window of `window` samples.
    ///
    /// Returns the held peak after the update.
    #[inline]
    pub fn process(&mut self, input: f32, window: u32) -> f32 {
        let magnitude = input.abs();
        let is_new_peak = magnitude >= self.held;
        let is_timeout = self.timer >= window;

        if is_new_peak || is_timeout {
            self.held = magnitude;
            self.timer = 0;
        } else {
            self.timer = self.timer.saturating_add(1);
        }
        self.held
    }

    /// Currently held peak.
    #[inline]
    pub fn held(&self) -> f32 {
        self.held
    }

    /// Samples elapsed since the held peak was captured.
    #[inline]
    pub fn timer(&self) -> u32 {
        self.timer
    }

    /// Return to `(timer, held) = (0, 0)`.
    pub fn reset(&mut self) {
        self.timer = 0;
        self.held = 0.0;
    }
}

/// `M` peak-hold stages in series, each holding for `window / M`.
///
/// # Example
///
/// ```rust
/// use crestline_core::PeakHoldCascade;
///
/// let mut detector: PeakHoldCascade<8> = PeakHoldCascade::new(48000.0);
/// detector.set_window(0.06);
/// assert_eq!(detector.stage_window(), 360);
///
/// assert_eq!(detector.process(-0.8), 0.8);
/// assert_eq!(detector.process(0.1), 0.8);
/// ```
#[derive(Debug, Clone)]
pub struct PeakHoldCascade<const M: usize> {
    stages: [PeakHold; M],
    sample_rate: f32,
    window_s: f32,
    stage_window: u32,
}

impl<const M: usize> PeakHoldCascade<M> {
    /// Create a cascade with a zero-length window.
    ///
    /// # Panics
    ///
    /// Panics if `M == 0` or the sample rate is not positive.
    pub fn new(sample_rate: f32) -> Self {
        assert!(M > 0, "Peak-hold cascade needs at least one stage");
        assert!(sample_rate > 0.0, "Sample rate must be > 0");
        Self {
            stages: core::array::from_fn(|_| PeakHold::new()),
            sample_rate,
            window_s: 0.0,
            stage_window: 0,
        }
    }

    /// Set the total hold window in seconds (split evenly across stages).
    ///
    /// Each stage holds for `round(window_s / M · SR)` samples.
    #[inline]
    pub fn set_window(&mut self, window_s: f32) {
        if window_s == self.window_s {
            return;
        }
        self.window_s = window_s;
        let samples = seconds_to_samples(window_s / M as f32, self.sample_rate);
        self.stage_window = u32::try_from(samples).unwrap_or(u32::MAX);
    }

    /// Per-stage window in samples.
    #[inline]
    pub fn stage_window(&self) -> u32 {
        self.stage_window
    }

    /// Run one sample through every stage.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let window = self.stage_window;
        self.stages
            .iter_mut()
            .fold(input, |signal, stage| stage.process(signal, window))
    }

    /// Output of the last stage without advancing.
    #[inline]
    pub fn value(&self) -> f32 {
        self.stages[M - 1].held()
    }

    /// Read-only view of the individual stages.
    pub fn stages(&self) -> &[PeakHold] {
        &self.stages
    }

    /// Clear every stage.
    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_zero() {
        let ph = PeakHold::new();
        assert_eq!(ph.held(), 0.0);
        assert_eq!(ph.timer(), 0);
    }

    #[test]
    fn holds_for_window_then_releases() {
        let mut ph = PeakHold::new();
        assert_eq!(ph.process(1.0, 4), 1.0);
        for n in 1..=4 {
            assert_eq!(ph.process(0.0, 4), 1.0, "still holding at n={n}");
        }
        // timer reached the window: the next sample takes the current input
        assert_eq!(ph.process(0.25, 4), 0.25);
        assert_eq!(ph.timer(), 0);
    }

    #[test]
    fn equal_peak_refreshes_timer() {
        let mut ph = PeakHold::new();
        ph.process(0.5, 10);
        ph.process(0.0, 10);
        ph.process(0.0, 10);
        assert_eq!(ph.timer(), 2);
        ph.process(-0.5, 10);
        assert_eq!(ph.timer(), 0);
    }

    #[test]
    fn timer_bounded_by_window() {
        let mut ph = PeakHold::new();
        ph.process(1.0, 16);
        for _ in 0..1000 {
            ph.process(0.1, 16);
            assert!(ph.timer() <= 16);
        }
    }

    #[test]
    fn zero_window_follows_magnitude() {
        let mut ph = PeakHold::new();
        assert_eq!(ph.process(0.9, 0), 0.9);
        assert_eq!(ph.process(-0.2, 0), 0.2);
    }

    #[test]
    fn cascade_window_splits_evenly() {
        let mut cascade: PeakHoldCascade<8> = PeakHoldCascade::new(48000.0);
        cascade.set_window(0.01);
        assert_eq!(cascade.stage_window(), 60);
        cascade.set_window(0.06);
        assert_eq!(cascade.stage_window(), 360);
    }

    #[test]
    fn cascade_holds_for_total_window() {
        let mut cascade: PeakHoldCascade<8> = PeakHoldCascade::new(48000.0);
        cascade.set_window(8.0 * 10.0 / 48000.0); // 10 samples per stage
        cascade.process(1.0);
        let mut held_for = 1;
        while cascade.process(0.0) > 0.0 {
            held_for += 1;
            assert!(held_for < 1000);
        }
        // the first stage holds for window + 1 samples, each later stage
        // extends that by one more window
        assert_eq!(held_for, 8 * 10 + 1);
    }

    #[test]
    fn cascade_output_never_negative() {
        let mut cascade: PeakHoldCascade<8> = PeakHoldCascade::new(48000.0);
        cascade.set_window(0.001);
        for i in 0..500 {
            let x = if i % 3 == 0 { -0.7 } else { 0.2 };
            assert!(cascade.process(x) >= 0.0);
        }
    }

    #[test]
    fn reset_clears_cascade() {
        let mut cascade: PeakHoldCascade<8> = PeakHoldCascade::new(48000.0);
        cascade.set_window(0.05);
        cascade.process(1.0);
        cascade.reset();
        assert_eq!(cascade.value(), 0.0);
        assert!(cascade.stages().iter().all(|s| s.timer() == 0));
    }
}
