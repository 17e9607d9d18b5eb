//! Construction-time engine settings.

use crestline_limiter::{
    DEFAULT_BYPASS_RAMP_MS, DEFAULT_CROSSFADE_SAMPLES, DEFAULT_MAX_DELAY_S, Limiter,
    LimiterConfig,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::settings::LimiterSettings;
use crate::validation::{self, ValidationResult};

/// Settings fixed when a limiter is built, stored in a preset's optional
/// `[engine]` table.
///
/// ```toml
/// [engine]
/// block_size = 512
/// crossfade_samples = 1024
/// max_delay_s = 0.1
/// bypass_ramp_ms = 20.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Frames per offline processing block.
    pub block_size: usize,
    /// Samples taken to crossfade between look-ahead lengths.
    pub crossfade_samples: u32,
    /// Delay buffer length in seconds; bounds the usable attack time.
    pub max_delay_s: f32,
    /// Bypass ramp time in ms.
    pub bypass_ramp_ms: f32,
}

impl EngineConfig {
    /// Default offline block size.
    pub const DEFAULT_BLOCK_SIZE: usize = 512;
    /// Largest accepted block size.
    pub const MAX_BLOCK_SIZE: usize = 65536;
    /// Largest accepted crossfade.
    pub const MAX_CROSSFADE_SAMPLES: u32 = 65536;
    /// Largest accepted delay buffer in seconds.
    pub const MAX_DELAY_S: f32 = 10.0;
    /// Largest accepted bypass ramp in ms.
    pub const MAX_BYPASS_RAMP_MS: f32 = 1000.0;

    /// Check every field.
    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_engine(self)
    }

    /// Limiter core settings.
    pub fn limiter_config(&self) -> LimiterConfig {
        LimiterConfig {
            max_delay_s: self.max_delay_s,
            crossfade_samples: self.crossfade_samples,
        }
    }

    /// Validate everything and build a limiter whose controls already sit
    /// at `settings`.
    ///
    /// ```rust
    /// use crestline_config::{EngineConfig, LimiterSettings};
    /// use crestline_core::Effect;
    ///
    /// let settings = LimiterSettings { attack_ms: 5.0, ..LimiterSettings::default() };
    /// let limiter = EngineConfig::default().build_limiter(48000.0, &settings).unwrap();
    /// assert_eq!(limiter.latency_samples(), 240);
    ///
    /// assert!(EngineConfig::default().build_limiter(0.0, &settings).is_err());
    /// ```
    pub fn build_limiter(
        &self,
        sample_rate: f32,
        settings: &LimiterSettings,
    ) -> Result<Limiter, ConfigError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(ConfigError::InvalidSampleRate(sample_rate));
        }
        validation::validate_combined(settings, self, sample_rate)?;

        let mut limiter =
            Limiter::with_config(sample_rate, self.limiter_config(), self.bypass_ramp_ms);
        let controls = limiter.controls_mut();
        settings.apply_to(controls);
        controls.snap_to_targets();
        Ok(limiter)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            block_size: Self::DEFAULT_BLOCK_SIZE,
            crossfade_samples: DEFAULT_CROSSFADE_SAMPLES,
            max_delay_s: DEFAULT_MAX_DELAY_S,
            bypass_ramp_ms: DEFAULT_BYPASS_RAMP_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationError;
    use crestline_core::{ParameterInfo, StereoFrame};

    #[test]
    fn test_defaults_follow_limiter() {
        let config = EngineConfig::default();
        assert_eq!(config.limiter_config(), LimiterConfig::default());
        assert_eq!(config.bypass_ramp_ms, 20.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_build_applies_settings() {
        let settings = LimiterSettings {
            threshold_db: -12.0,
            release_ms: 300.0,
            ..LimiterSettings::default()
        };
        let mut limiter = EngineConfig::default().build_limiter(44100.0, &settings).unwrap();
        assert_eq!(limiter.get_param(0), -12.0);
        assert!(limiter.controls().is_settled());
        assert_eq!(limiter.sample_rate(), 44100.0);
        let out = limiter.process_frame(StereoFrame::SILENCE);
        assert_eq!(out.audio, StereoFrame::SILENCE);
    }

    #[test]
    fn test_build_rejects_invalid_settings() {
        let settings = LimiterSettings {
            hold_ms: -5.0,
            ..LimiterSettings::default()
        };
        let err = EngineConfig::default().build_limiter(48000.0, &settings).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_build_rejects_nan_sample_rate() {
        let err = EngineConfig::default()
            .build_limiter(f32::NAN, &LimiterSettings::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSampleRate(_)));
    }

    #[test]
    fn test_toml_table() {
        let config: EngineConfig = toml::from_str("block_size = 128\nmax_delay_s = 0.05").unwrap();
        assert_eq!(config.block_size, 128);
        assert_eq!(config.max_delay_s, 0.05);
        assert_eq!(config.crossfade_samples, 1024);
    }
}
