//! Mathematical utility functions for limiter DSP.
//!
//! All functions are allocation-free and suitable for `no_std`.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Time Conversions
//!
//! - [`seconds_to_samples`] - Rounded whole-sample count for window lengths
//! - [`lookahead_samples`] - Attack time snapped to the peak-hold cascade grid
//!
//! # Utilities
//!
//! - [`flush_denormal`] - Denormal protection for recursive filters

use libm::{expf, logf, roundf};

/// Number of peak-hold stages the look-ahead delay is aligned to.
///
/// The look-ahead delay is rounded to a multiple of this so that it equals
/// the cumulative window of an eight-stage peak-hold cascade.
pub const LOOKAHEAD_GRID: usize = 8;

/// Convert decibels to linear gain.
///
/// # Arguments
/// * `db` - Value in decibels
///
/// # Returns
/// Linear gain value (e.g., 0 dB → 1.0, -6 dB → 0.5, +6 dB → 2.0)
///
/// # Example
/// ```rust
/// use crestline_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Inputs at or below `1e-10` are floored there, so silence reads −200 dB
/// instead of −∞.
///
/// # Example
/// ```rust
/// use crestline_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Convert a duration in seconds to a rounded, non-negative sample count.
///
/// ```rust
/// use crestline_core::seconds_to_samples;
///
/// assert_eq!(seconds_to_samples(0.01, 48000.0), 480);
/// assert_eq!(seconds_to_samples(-1.0, 48000.0), 0);
/// ```
#[inline]
pub fn seconds_to_samples(seconds: f32, sample_rate: f32) -> usize {
    let samples = roundf(seconds * sample_rate);
    if samples > 0.0 { samples as usize } else { 0 }
}

/// Look-ahead delay in samples for a given attack time.
///
/// `round(attack · SR / 8) · 8`, so the audio path is delayed by exactly the
/// cumulative window of the detector's eight peak-hold stages.
///
/// ```rust
/// use crestline_core::lookahead_samples;
///
/// assert_eq!(lookahead_samples(0.01, 48000.0), 480);
/// assert_eq!(lookahead_samples(0.001, 44100.0), 48);
/// ```
#[inline]
pub fn lookahead_samples(attack_s: f32, sample_rate: f32) -> usize {
    let blocks = roundf(attack_s * sample_rate / LOOKAHEAD_GRID as f32);
    if blocks > 0.0 {
        blocks as usize * LOOKAHEAD_GRID
    } else {
        0
    }
}

/// Flush denormal values to zero.
///
/// Recursive filters decaying toward zero can produce subnormal floats that
/// are dramatically slower on some CPUs.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_linear_inverse() {
        for db in [-60.0_f32, -20.0, -6.0, 0.0, 6.0, 60.0, 120.0] {
            let back = linear_to_db(db_to_linear(db));
            assert!((back - db).abs() < 1e-3, "{db} dB round-tripped to {back}");
        }
    }

    #[test]
    fn linear_to_db_floors_silence() {
        assert!((linear_to_db(0.0) - (-200.0)).abs() < 0.01);
    }

    #[test]
    fn lookahead_is_multiple_of_grid() {
        for i in 1..=50 {
            let attack = i as f32 / 1000.0;
            for sr in [44100.0, 48000.0, 96000.0] {
                let d = lookahead_samples(attack, sr);
                assert_eq!(d % LOOKAHEAD_GRID, 0, "attack={attack} sr={sr} gave {d}");
                assert!((d as f32 - attack * sr).abs() <= 4.0);
            }
        }
    }

    #[test]
    fn lookahead_rounds_to_nearest_block() {
        // 0.005 * 44100 = 220.5 → 220.5 / 8 = 27.56 → 28 blocks
        assert_eq!(lookahead_samples(0.005, 44100.0), 224);
    }

    #[test]
    fn flush_denormal_zeroes_tiny_values() {
        assert_eq!(flush_denormal(1e-25), 0.0);
        assert_eq!(flush_denormal(0.5), 0.5);
    }
}
