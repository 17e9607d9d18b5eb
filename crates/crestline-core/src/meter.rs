//! Held peak meter.
//!
//! Tracks the largest `|x|` seen since the last reset and reports it in dB
//! within a display range. Metering never feeds back into the audio path.

use crate::linear_to_db;

/// Lowest peak reading in dB.
pub const PEAK_FLOOR_DB: f32 = -60.0;
/// Highest peak reading in dB.
pub const PEAK_CEILING_DB: f32 = 60.0;

/// Peak-hold meter with momentary reset.
///
/// ```rust
/// use crestline_core::PeakMeter;
///
/// let mut meter = PeakMeter::new();
/// meter.process(0.5, false);
/// meter.process(0.1, false);
/// assert!((meter.peak_db() - (-6.02)).abs() < 0.01);
///
/// // a reset pulse restarts the hold from the current sample
/// meter.process(0.1, true);
/// assert!((meter.peak_db() - (-20.0)).abs() < 0.01);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PeakMeter {
    peak: f32,
}

impl PeakMeter {
    /// Meter reading the floor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe one sample. With `reset` set, the held peak restarts at `|sample|`.
    #[inline]
    pub fn process(&mut self, sample: f32, reset: bool) {
        let magnitude = sample.abs();
        self.peak = if reset {
            magnitude
        } else {
            self.peak.max(magnitude)
        };
    }

    /// Held peak as a linear magnitude.
    #[inline]
    pub fn peak(&self) -> f32 {
        self.peak
    }

    /// Held peak in dB, clamped to `[PEAK_FLOOR_DB, PEAK_CEILING_DB]`.
    #[inline]
    pub fn peak_db(&self) -> f32 {
        linear_to_db(self.peak).clamp(PEAK_FLOOR_DB, PEAK_CEILING_DB)
    }

    /// Drop the held peak.
    pub fn reset(&mut self) {
        self.peak = 0.0;
    }
}
