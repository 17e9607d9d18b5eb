//! Serializable limiter settings in user units.

use crestline_limiter::params::{ATTACK, BYPASS, HOLD, PRE_GAIN, RELEASE, THRESHOLD};
use crestline_limiter::{DESCRIPTORS, LimiterControls, LimiterParams};
use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationError, ValidationResult};

/// The six user-facing limiter controls as stored in a preset's `[limiter]`
/// table.
///
/// Missing keys take the descriptor defaults; unknown keys are rejected.
///
/// ```toml
/// [limiter]
/// threshold_db = -1.0
/// attack_ms = 10.0
/// hold_ms = 50.0
/// release_ms = 150.0
/// pre_gain_db = 0.0
/// bypass = false
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimiterSettings {
    /// Output ceiling in dB.
    pub threshold_db: f32,
    /// Attack (and look-ahead) time in ms.
    pub attack_ms: f32,
    /// Extra peak-hold time in ms.
    pub hold_ms: f32,
    /// Release time in ms.
    pub release_ms: f32,
    /// Gain before detection in dB.
    pub pre_gain_db: f32,
    /// Pass the input through untouched.
    pub bypass: bool,
}

impl Default for LimiterSettings {
    fn default() -> Self {
        Self {
            threshold_db: DESCRIPTORS[THRESHOLD].default,
            attack_ms: DESCRIPTORS[ATTACK].default,
            hold_ms: DESCRIPTORS[HOLD].default,
            release_ms: DESCRIPTORS[RELEASE].default,
            pre_gain_db: DESCRIPTORS[PRE_GAIN].default,
            bypass: DESCRIPTORS[BYPASS].default >= 0.5,
        }
    }
}

impl LimiterSettings {
    /// Continuous settings paired with their descriptor index.
    pub fn values(&self) -> [(usize, f32); 5] {
        [
            (THRESHOLD, self.threshold_db),
            (ATTACK, self.attack_ms),
            (HOLD, self.hold_ms),
            (RELEASE, self.release_ms),
            (PRE_GAIN, self.pre_gain_db),
        ]
    }

    /// Value of the parameter at descriptor `index`; bypass reads as 0 or 1.
    pub fn get(&self, index: usize) -> Option<f32> {
        match index {
            BYPASS => Some(if self.bypass { 1.0 } else { 0.0 }),
            _ => self
                .values()
                .into_iter()
                .find_map(|(i, v)| (i == index).then_some(v)),
        }
    }

    /// Set a parameter by any of its names after validating the value.
    ///
    /// ```rust
    /// use crestline_config::LimiterSettings;
    ///
    /// let mut settings = LimiterSettings::default();
    /// settings.set("threshold", -3.0).unwrap();
    /// settings.set("bypass", 1.0).unwrap();
    /// assert_eq!(settings.threshold_db, -3.0);
    /// assert!(settings.bypass);
    /// assert!(settings.set("attack_ms", 500.0).is_err());
    /// ```
    pub fn set(&mut self, name: &str, value: f32) -> ValidationResult<()> {
        let index = validation::param_index(name).ok_or_else(|| {
            ValidationError::UnknownParameter {
                param: name.to_string(),
            }
        })?;
        let value = validation::validate_value(&DESCRIPTORS[index], value)?;
        match index {
            THRESHOLD => self.threshold_db = value,
            ATTACK => self.attack_ms = value,
            HOLD => self.hold_ms = value,
            RELEASE => self.release_ms = value,
            PRE_GAIN => self.pre_gain_db = value,
            _ => self.bypass = value >= 0.5,
        }
        Ok(())
    }

    /// Check every value against the limiter's descriptors.
    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_settings(self)
    }

    /// Constant per-frame parameters for these settings.
    pub fn to_params(&self) -> LimiterParams {
        LimiterParams::from_user_units(
            self.threshold_db,
            self.attack_ms,
            self.hold_ms,
            self.release_ms,
            self.pre_gain_db,
            self.bypass,
        )
    }

    /// Set these values as control targets. Out-of-range values are clamped
    /// by the controls; call [`validate`](Self::validate) first to reject
    /// them instead.
    pub fn apply_to(&self, controls: &mut LimiterControls) {
        controls.set_threshold_db(self.threshold_db);
        controls.set_attack_ms(self.attack_ms);
        controls.set_hold_ms(self.hold_ms);
        controls.set_release_ms(self.release_ms);
        controls.set_pre_gain_db(self.pre_gain_db);
        controls.set_bypass(self.bypass);
    }

    /// Current control targets.
    pub fn from_controls(controls: &LimiterControls) -> Self {
        Self {
            threshold_db: controls.threshold_db(),
            attack_ms: controls.attack_ms(),
            hold_ms: controls.hold_ms(),
            release_ms: controls.release_ms(),
            pre_gain_db: controls.pre_gain_db(),
            bypass: controls.is_bypassed(),
        }
    }
}
