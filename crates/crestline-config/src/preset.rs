//! Preset file format and operations.

use crestline_limiter::Limiter;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::engine::EngineConfig;
use crate::error::ConfigError;
use crate::settings::LimiterSettings;
use crate::validation::{self, ValidationResult};
use crate::{factory_presets, paths};

/// A named limiter configuration.
///
/// Presets are stored as TOML files. They can be loaded from files, created
/// programmatically, and saved to disk.
///
/// # TOML Format
///
/// ```toml
/// name = "Mastering"
/// description = "Transparent ceiling for final mixes"
/// sample_rate = 48000
///
/// [limiter]
/// threshold_db = -1.0
/// attack_ms = 5.0
/// hold_ms = 20.0
/// release_ms = 200.0
///
/// [engine]          # optional
/// crossfade_samples = 2048
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sample rate hint (defaults to 48000).
    /// Files are processed at their own rate; this only matters for
    /// generated signals.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Limiter control values.
    #[serde(default)]
    pub limiter: LimiterSettings,

    /// Engine overrides; defaults apply when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<EngineConfig>,
}

fn default_sample_rate() -> u32 {
    48000
}

impl Preset {
    /// Preset at the default limiter settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: default_sample_rate(),
            limiter: LimiterSettings::default(),
            engine: None,
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate hint.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Replace the limiter settings.
    pub fn with_limiter(mut self, limiter: LimiterSettings) -> Self {
        self.limiter = limiter;
        self
    }

    /// Attach engine overrides.
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Engine settings: the overrides or the defaults.
    pub fn engine_config(&self) -> EngineConfig {
        self.engine.unwrap_or_default()
    }

    /// Check limiter settings, engine settings and their combination at the
    /// preset's sample rate.
    pub fn validate(&self) -> ValidationResult<()> {
        let sample_rate = self.sample_rate as f32;
        validation::validate_combined(&self.limiter, &self.engine_config(), sample_rate)
    }

    /// Validate and build a limiter at `sample_rate` with these settings.
    pub fn build_limiter(&self, sample_rate: f32) -> Result<Limiter, ConfigError> {
        self.engine_config().build_limiter(sample_rate, &self.limiter)
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Resolve a preset by name: factory presets first, then files found by
    /// [`paths::find_preset`].
    pub fn resolve(name: &str) -> Result<Self, ConfigError> {
        if let Some(preset) = factory_presets::get_factory_preset(name) {
            return Ok(preset);
        }
        match paths::find_preset(name) {
            Some(path) => Self::load(path),
            None => Err(ConfigError::PresetNotFound(name.to_string())),
        }
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
