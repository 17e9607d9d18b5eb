//! Presets and configuration for the crestline limiter.
//!
//! - **Settings**: [`LimiterSettings`] mirrors the six user controls in
//!   user units and maps onto `LimiterControls`
//! - **Engine**: [`EngineConfig`] holds construction-time settings (delay
//!   buffer, crossfade length, bypass ramp, block size)
//! - **Presets**: [`Preset`] stores both as TOML
//! - **Validation**: values are checked against the limiter's parameter
//!   descriptors before anything is built
//! - **Paths**: platform preset and config directories
//! - **Factory presets**: built-in starting points
//!
//! # Example
//!
//! ```rust,no_run
//! use crestline_config::{Preset, LimiterSettings, paths};
//!
//! let preset = Preset::new("Late Night")
//!     .with_description("Quiet ceiling for night listening")
//!     .with_limiter(LimiterSettings {
//!         threshold_db: -12.0,
//!         ..LimiterSettings::default()
//!     });
//! preset.validate().unwrap();
//! preset.save(paths::user_preset_path("late_night")).unwrap();
//!
//! let mut limiter = Preset::resolve("late_night")
//!     .unwrap()
//!     .build_limiter(48000.0)
//!     .unwrap();
//! ```

mod engine;
mod error;
mod preset;
mod settings;

/// Platform-specific paths for presets and configuration.
pub mod paths;

/// Settings and engine validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use engine::EngineConfig;
pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset,
    is_factory_preset,
};
pub use paths::{
    ensure_user_config_dir, ensure_user_presets_dir, find_preset, list_all_presets,
    list_system_presets, list_user_presets, preset_name_from_path, system_presets_dir,
    user_config_dir, user_preset_path, user_presets_dir,
};
pub use preset::Preset;
pub use settings::LimiterSettings;
pub use validation::{
    ValidationError, ValidationResult, param_descriptor, param_index, validate_combined,
    validate_engine, validate_param, validate_settings,
};
