//! Limiter settings and engine configuration validation.
//!
//! Settings are checked against the parameter descriptor table exported by
//! `crestline-limiter`, so a preset is accepted exactly when every value
//! lies inside the range the limiter's controls would clamp it to. Every
//! problem is collected rather than stopping at the first one.
//!
//! # Example
//!
//! ```rust
//! use crestline_config::{LimiterSettings, ValidationError, validate_settings};
//!
//! let mut settings = LimiterSettings::default();
//! assert!(validate_settings(&settings).is_ok());
//!
//! settings.threshold_db = 3.0;
//! settings.attack_ms = f32::NAN;
//! let err = validate_settings(&settings).unwrap_err();
//! assert!(matches!(err, ValidationError::Multiple(ref errors) if errors.len() == 2));
//! ```

use crestline_core::{ParamDescriptor, lookahead_samples, seconds_to_samples};
use crestline_limiter::DESCRIPTORS;
use thiserror::Error;

use crate::engine::EngineConfig;
use crate::settings::LimiterSettings;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// No limiter parameter has this name.
    #[error("unknown parameter '{param}'")]
    UnknownParameter {
        /// The unrecognized name.
        param: String,
    },

    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// NaN or infinite value.
    #[error("parameter '{param}' is not a finite number")]
    NotFinite {
        /// Name of the parameter.
        param: String,
    },

    /// Engine configuration field rejected.
    #[error("invalid engine setting '{field}': {reason}")]
    InvalidEngine {
        /// Name of the field.
        field: &'static str,
        /// Description of the problem.
        reason: String,
    },

    /// The attack time needs a longer delay buffer than configured.
    #[error(
        "attack {attack_ms} ms needs {lookahead} samples of look-ahead but the \
         {max_delay_ms} ms delay buffer holds {max_delay}"
    )]
    LookaheadExceedsBuffer {
        /// Requested attack time.
        attack_ms: f32,
        /// Configured buffer length.
        max_delay_ms: f32,
        /// Look-ahead delay the attack time snaps to, in samples.
        lookahead: usize,
        /// Longest delay the buffer can hold, in samples.
        max_delay: usize,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Fold collected errors: none is `Ok`, one is returned as is, more become
/// [`ValidationError::Multiple`].
pub(crate) fn collect_errors(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

/// Index of a limiter parameter by string id (`threshold_db`), display name
/// (`Threshold`) or short name, ignoring ASCII case.
pub fn param_index(name: &str) -> Option<usize> {
    DESCRIPTORS.iter().position(|d| {
        d.string_id.eq_ignore_ascii_case(name)
            || d.name.eq_ignore_ascii_case(name)
            || d.short_name.eq_ignore_ascii_case(name)
    })
}

/// Descriptor of a limiter parameter looked up as in [`param_index`].
pub fn param_descriptor(name: &str) -> Option<ParamDescriptor> {
    param_index(name).map(|i| DESCRIPTORS[i])
}

/// Check one value against a descriptor.
pub fn validate_value(desc: &ParamDescriptor, value: f32) -> ValidationResult<f32> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            param: desc.string_id.to_string(),
        });
    }
    if !desc.contains(value) {
        return Err(ValidationError::OutOfRange {
            param: desc.string_id.to_string(),
            value,
            min: desc.min,
            max: desc.max,
        });
    }
    Ok(value)
}

/// Check a named parameter value.
///
/// ```rust
/// use crestline_config::validate_param;
///
/// assert_eq!(validate_param("attack_ms", 5.0), Ok(5.0));
/// assert!(validate_param("release", 10.0).is_err());
/// assert!(validate_param("ratio", 4.0).is_err());
/// ```
pub fn validate_param(name: &str, value: f32) -> ValidationResult<f32> {
    let desc = param_descriptor(name).ok_or_else(|| ValidationError::UnknownParameter {
        param: name.to_string(),
    })?;
    validate_value(&desc, value)
}

/// Check every continuous setting against its descriptor.
pub fn validate_settings(settings: &LimiterSettings) -> ValidationResult<()> {
    let errors = settings
        .values()
        .into_iter()
        .filter_map(|(index, value)| validate_value(&DESCRIPTORS[index], value).err())
        .collect();
    collect_errors(errors)
}

/// Check engine construction settings.
pub fn validate_engine(config: &EngineConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();
    let mut reject = |field: &'static str, reason: String| {
        errors.push(ValidationError::InvalidEngine { field, reason });
    };

    if !(1..=EngineConfig::MAX_BLOCK_SIZE).contains(&config.block_size) {
        reject(
            "block_size",
            format!("{} not in 1..={}", config.block_size, EngineConfig::MAX_BLOCK_SIZE),
        );
    }
    if !(1..=EngineConfig::MAX_CROSSFADE_SAMPLES).contains(&config.crossfade_samples) {
        reject(
            "crossfade_samples",
            format!(
                "{} not in 1..={}",
                config.crossfade_samples,
                EngineConfig::MAX_CROSSFADE_SAMPLES
            ),
        );
    }
    if !config.max_delay_s.is_finite()
        || config.max_delay_s <= 0.0
        || config.max_delay_s > EngineConfig::MAX_DELAY_S
    {
        reject(
            "max_delay_s",
            format!("{} not in (0, {}]", config.max_delay_s, EngineConfig::MAX_DELAY_S),
        );
    }
    if !config.bypass_ramp_ms.is_finite()
        || !(0.0..=EngineConfig::MAX_BYPASS_RAMP_MS).contains(&config.bypass_ramp_ms)
    {
        reject(
            "bypass_ramp_ms",
            format!(
                "{} not in [0, {}]",
                config.bypass_ramp_ms,
                EngineConfig::MAX_BYPASS_RAMP_MS
            ),
        );
    }

    collect_errors(errors)
}

/// Check settings, engine configuration and that the delay buffer can hold
/// the requested look-ahead at `sample_rate`.
///
/// The look-ahead is compared in samples after snapping to the detector
/// grid, so an attack time just under the buffer length can still be
/// rejected.
pub fn validate_combined(
    settings: &LimiterSettings,
    config: &EngineConfig,
    sample_rate: f32,
) -> ValidationResult<()> {
    let mut errors = Vec::new();
    for result in [validate_settings(settings), validate_engine(config)] {
        match result {
            Ok(()) => {}
            Err(ValidationError::Multiple(inner)) => errors.extend(inner),
            Err(e) => errors.push(e),
        }
    }

    let usable = |x: f32| x.is_finite() && x > 0.0;
    if settings.attack_ms.is_finite() && usable(config.max_delay_s) && usable(sample_rate) {
        let lookahead = lookahead_samples(settings.attack_ms / 1000.0, sample_rate);
        let max_delay = seconds_to_samples(config.max_delay_s, sample_rate);
        if lookahead > max_delay {
            errors.push(ValidationError::LookaheadExceedsBuffer {
                attack_ms: settings.attack_ms,
                max_delay_ms: config.max_delay_s * 1000.0,
                lookahead,
                max_delay,
            });
        }
    }

    collect_errors(errors)
}
