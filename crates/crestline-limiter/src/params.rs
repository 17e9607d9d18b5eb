//! Per-sample limiter parameters and the provider interface.
//!
//! The limiter polls a [`ParamProvider`] once per frame and receives a
//! [`LimiterParams`] of already-smoothed scalars. Range enforcement happens
//! in the provider; the limiter trusts what it receives.
//!
//! # Parameter Table
//!
//! | Index | Name | Range | Default |
//! |-------|------|-------|---------|
//! | 0 | Threshold | -60.0–0.0 dB | -1.0 |
//! | 1 | Attack | 1.0–50.0 ms | 10.0 |
//! | 2 | Hold | 0.0–1000.0 ms | 50.0 |
//! | 3 | Release | 50.0–1000.0 ms | 150.0 |
//! | 4 | Pre-gain | 0.0–120.0 dB | 0.0 |
//! | 5 | Bypass | off/on | off |

use crestline_core::{ParamDescriptor, ParamId, db_to_linear};

/// Index of the threshold parameter.
pub const THRESHOLD: usize = 0;
/// Index of the attack parameter.
pub const ATTACK: usize = 1;
/// Index of the hold parameter.
pub const HOLD: usize = 2;
/// Index of the release parameter.
pub const RELEASE: usize = 3;
/// Index of the pre-gain parameter.
pub const PRE_GAIN: usize = 4;
/// Index of the bypass parameter.
pub const BYPASS: usize = 5;

/// Number of user-facing parameters.
pub const PARAM_COUNT: usize = 6;

/// Descriptors for every user-facing parameter, in index order.
pub const DESCRIPTORS: [ParamDescriptor; PARAM_COUNT] = [
    ParamDescriptor::gain_db("Threshold", "Thresh", -60.0, 0.0, -1.0)
        .with_id(ParamId(1600), "threshold_db"),
    ParamDescriptor::time_ms("Attack", "Attack", 1.0, 50.0, 10.0)
        .with_id(ParamId(1601), "attack_ms"),
    ParamDescriptor::time_ms("Hold", "Hold", 0.0, 1000.0, 50.0).with_id(ParamId(1602), "hold_ms"),
    ParamDescriptor::time_ms("Release", "Rel", 50.0, 1000.0, 150.0)
        .with_id(ParamId(1603), "release_ms"),
    ParamDescriptor::gain_db("Pre-gain", "PreGain", 0.0, 120.0, 0.0)
        .with_id(ParamId(1604), "pre_gain_db"),
    ParamDescriptor::toggle("Bypass", "Bypass", false).with_id(ParamId(1605), "bypass"),
];

/// Descriptor for the parameter at `index`.
pub fn descriptor(index: usize) -> Option<ParamDescriptor> {
    DESCRIPTORS.get(index).copied()
}

/// Smoothed scalars consumed by the limiter for one frame.
///
/// Levels are linear, times are in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimiterParams {
    /// Output ceiling as a linear amplitude.
    pub threshold: f32,
    /// Attack time in seconds; also sets the look-ahead delay.
    pub attack: f32,
    /// Extra peak-hold time in seconds on top of the attack.
    pub hold: f32,
    /// Release time in seconds.
    pub release: f32,
    /// Linear gain applied before detection and delay.
    pub pre_gain: f32,
    /// Dry mix in `[0, 1]`: 0 is fully limited, 1 is the untouched input.
    pub bypass: f32,
    /// Restart the held peak meters on this frame.
    pub reset_peak: bool,
}

impl LimiterParams {
    /// Build from user-facing units.
    pub fn from_user_units(
        threshold_db: f32,
        attack_ms: f32,
        hold_ms: f32,
        release_ms: f32,
        pre_gain_db: f32,
        bypass: bool,
    ) -> Self {
        Self {
            threshold: db_to_linear(threshold_db),
            attack: attack_ms / 1000.0,
            hold: hold_ms / 1000.0,
            release: release_ms / 1000.0,
            pre_gain: db_to_linear(pre_gain_db),
            bypass: if bypass { 1.0 } else { 0.0 },
            reset_peak: false,
        }
    }

    /// Same parameters with a new threshold in dB.
    #[must_use]
    pub fn with_threshold_db(mut self, db: f32) -> Self {
        self.threshold = db_to_linear(db);
        self
    }

    /// Same parameters with new attack, hold and release times in ms.
    #[must_use]
    pub fn with_times_ms(mut self, attack_ms: f32, hold_ms: f32, release_ms: f32) -> Self {
        self.attack = attack_ms / 1000.0;
        self.hold = hold_ms / 1000.0;
        self.release = release_ms / 1000.0;
        self
    }

    /// Same parameters with a new pre-gain in dB.
    #[must_use]
    pub fn with_pre_gain_db(mut self, db: f32) -> Self {
        self.pre_gain = db_to_linear(db);
        self
    }

    /// Same parameters with a new bypass mix.
    #[must_use]
    pub fn with_bypass(mut self, bypass: f32) -> Self {
        self.bypass = bypass;
        self
    }
}

impl Default for LimiterParams {
    /// The descriptor defaults.
    fn default() -> Self {
        Self::from_user_units(
            DESCRIPTORS[THRESHOLD].default,
            DESCRIPTORS[ATTACK].default,
            DESCRIPTORS[HOLD].default,
            DESCRIPTORS[RELEASE].default,
            DESCRIPTORS[PRE_GAIN].default,
            DESCRIPTORS[BYPASS].default >= 0.5,
        )
    }
}

/// Source of per-frame parameters.
///
/// Polled exactly once per processed frame, so implementations can advance
/// their own smoothers inside [`next_params`](Self::next_params).
pub trait ParamProvider {
    /// Parameters for the next frame.
    fn next_params(&mut self) -> LimiterParams;
}

/// Constant parameters.
impl ParamProvider for LimiterParams {
    #[inline]
    fn next_params(&mut self) -> LimiterParams {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_descriptors() {
        let p = LimiterParams::default();
        assert!((p.threshold - db_to_linear(-1.0)).abs() < 1e-6);
        assert!((p.attack - 0.010).abs() < 1e-7);
        assert!((p.hold - 0.050).abs() < 1e-7);
        assert!((p.release - 0.150).abs() < 1e-7);
        assert!((p.pre_gain - 1.0).abs() < 1e-6);
        assert_eq!(p.bypass, 0.0);
        assert!(!p.reset_peak);
    }

    #[test]
    fn descriptor_indices_line_up() {
        assert_eq!(descriptor(THRESHOLD).map(|d| d.name), Some("Threshold"));
        assert_eq!(descriptor(ATTACK).map(|d| d.string_id), Some("attack_ms"));
        assert_eq!(descriptor(HOLD).map(|d| d.max), Some(1000.0));
        assert_eq!(descriptor(RELEASE).map(|d| d.min), Some(50.0));
        assert_eq!(descriptor(PRE_GAIN).map(|d| d.max), Some(120.0));
        assert_eq!(descriptor(BYPASS).map(|d| d.default), Some(0.0));
        assert!(descriptor(PARAM_COUNT).is_none());
    }

    #[test]
    fn ids_are_unique() {
        for (i, a) in DESCRIPTORS.iter().enumerate() {
            for b in &DESCRIPTORS[i + 1..] {
                assert_ne!(a.id, b.id);
                assert_ne!(a.string_id, b.string_id);
            }
        }
    }

    #[test]
    fn constant_provider_repeats() {
        let mut p = LimiterParams::default().with_threshold_db(-6.0);
        let first = p.next_params();
        assert_eq!(p.next_params(), first);
    }
}
