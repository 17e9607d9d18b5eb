//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use clap::Args;
use crestline_config::{ConfigError, LimiterSettings, Preset};

/// Limiter control overrides accepted by `process` and `presets save`.
#[derive(Args, Debug, Default, Clone)]
pub struct SettingsArgs {
    /// Output ceiling in dB (-60 to 0)
    #[arg(short, long, allow_negative_numbers = true)]
    pub threshold: Option<f32>,

    /// Attack and look-ahead time in ms (1 to 50)
    #[arg(short, long)]
    pub attack: Option<f32>,

    /// Extra peak-hold time in ms (0 to 1000)
    #[arg(long)]
    pub hold: Option<f32>,

    /// Release time in ms (50 to 1000)
    #[arg(short, long)]
    pub release: Option<f32>,

    /// Gain before limiting in dB (0 to 120)
    #[arg(short = 'g', long)]
    pub pre_gain: Option<f32>,

    /// Pass audio through untouched and undelayed
    #[arg(long)]
    pub bypass: bool,

    /// Any parameter by name (e.g. "release_ms=300"), repeatable
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_param)]
    pub set: Vec<(String, f32)>,
}

impl SettingsArgs {
    /// Apply the overrides on top of `settings`, validating each value.
    pub fn apply(&self, settings: &mut LimiterSettings) -> anyhow::Result<()> {
        let named = [
            ("threshold_db", self.threshold),
            ("attack_ms", self.attack),
            ("hold_ms", self.hold),
            ("release_ms", self.release),
            ("pre_gain_db", self.pre_gain),
        ];
        let flags = named
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name.to_string(), v)));

        for (name, value) in flags.chain(self.set.iter().cloned()) {
            settings
                .set(&name, value)
                .with_context(|| format!("invalid value for '{name}'"))?;
        }
        if self.bypass {
            settings.bypass = true;
        }
        Ok(())
    }

    /// Whether any override was given.
    pub fn is_empty(&self) -> bool {
        self.threshold.is_none()
            && self.attack.is_none()
            && self.hold.is_none()
            && self.release.is_none()
            && self.pre_gain.is_none()
            && !self.bypass
            && self.set.is_empty()
    }
}

/// Parse a `name=value` pair for clap's `value_parser`.
pub fn parse_param(s: &str) -> Result<(String, f32), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid parameter format: '{s}' (expected name=value)"))?;
    let value: f32 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid number in '{s}'"))?;
    Ok((name.trim().to_string(), value))
}

/// Load a preset by factory name, user/system preset name, or path.
pub fn load_preset(name: &str) -> anyhow::Result<Preset> {
    match Preset::resolve(name) {
        Ok(preset) => Ok(preset),
        Err(ConfigError::PresetNotFound(_)) => anyhow::bail!(
            "preset '{name}' not found. Use 'crestline presets list' to see available presets."
        ),
        Err(e) => Err(e).with_context(|| format!("failed to load preset '{name}'")),
    }
}

/// dB value for display; silence reads as `-inf`.
pub fn format_db(db: f32) -> String {
    if db <= -120.0 || !db.is_finite() {
        "-inf dB".to_string()
    } else {
        format!("{db:.2} dB")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param() {
        assert_eq!(parse_param("attack=5"), Ok(("attack".to_string(), 5.0)));
        assert_eq!(
            parse_param(" threshold_db = -3.5"),
            Ok(("threshold_db".to_string(), -3.5))
        );
        assert!(parse_param("attack").is_err());
        assert!(parse_param("attack=fast").is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let args = SettingsArgs {
            threshold: Some(-6.0),
            bypass: true,
            set: vec![("Rel".to_string(), 400.0)],
            ..SettingsArgs::default()
        };
        let mut settings = LimiterSettings::default();
        args.apply(&mut settings).unwrap();
        assert_eq!(settings.threshold_db, -6.0);
        assert_eq!(settings.release_ms, 400.0);
        assert!(settings.bypass);
        assert!(!args.is_empty());
        assert!(SettingsArgs::default().is_empty());
    }

    #[test]
    fn test_apply_rejects_out_of_range() {
        let args = SettingsArgs {
            attack: Some(0.1),
            ..SettingsArgs::default()
        };
        let err = args.apply(&mut LimiterSettings::default()).unwrap_err();
        assert!(err.to_string().contains("attack_ms"));
    }

    #[test]
    fn test_format_db() {
        assert_eq!(format_db(-1.0), "-1.00 dB");
        assert_eq!(format_db(-120.0), "-inf dB");
        assert_eq!(format_db(f32::NEG_INFINITY), "-inf dB");
    }

    #[test]
    fn test_load_missing_preset_hint() {
        let err = load_preset("definitely_not_a_preset_9917").unwrap_err();
        assert!(err.to_string().contains("presets list"));
    }
}
