//! Integration tests for crestline-config.
//!
//! Presets travel from disk through validation into a running limiter.

use crestline_config::{
    ConfigError, EngineConfig, LimiterSettings, Preset, ValidationError, factory_presets,
    get_factory_preset, paths,
};
use crestline_core::{Effect, StereoFrame, db_to_linear};
use tempfile::TempDir;

/// Drive a limiter with a full-scale square wave and return the largest
/// output sample after the look-ahead has filled.
fn peak_after_settling(preset: &Preset, sample_rate: f32) -> f32 {
    let mut limiter = preset.build_limiter(sample_rate).unwrap();
    let latency = limiter.latency_samples();
    (0..sample_rate as usize / 2)
        .map(|i| {
            let x = if (i / 40) % 2 == 0 { 1.0 } else { -1.0 };
            (i, limiter.process(StereoFrame::new(x, x * 0.5)))
        })
        .filter(|(i, _)| *i > latency)
        .map(|(_, out)| out.peak())
        .fold(0.0, f32::max)
}

#[test]
fn test_save_load_build_process() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("ceiling.toml");

    let preset = Preset::new("Ceiling")
        .with_description("-6 dB ceiling")
        .with_limiter(LimiterSettings {
            threshold_db: -6.0,
            attack_ms: 2.0,
            ..LimiterSettings::default()
        });
    preset.save(&path).unwrap();

    let loaded = Preset::load(&path).unwrap();
    assert_eq!(loaded, preset);

    let peak = peak_after_settling(&loaded, 48000.0);
    assert!(peak <= db_to_linear(-6.0) * 1.001, "peak {peak}");
    assert!(peak > db_to_linear(-6.0) * 0.9, "peak {peak}");
}

#[test]
fn test_factory_presets_hold_their_ceiling() {
    for preset in factory_presets() {
        let ceiling = db_to_linear(preset.limiter.threshold_db);
        let peak = peak_after_settling(&preset, 44100.0);
        assert!(
            peak <= ceiling * 1.001,
            "{}: peak {peak} above ceiling {ceiling}",
            preset.name
        );
    }
}

#[test]
fn test_preset_latency_follows_attack() {
    let mastering = get_factory_preset("mastering").unwrap();
    let limiter = mastering.build_limiter(48000.0).unwrap();
    assert_eq!(limiter.latency_samples(), 240);

    let aggressive = get_factory_preset("aggressive").unwrap();
    let limiter = aggressive.build_limiter(48000.0).unwrap();
    assert_eq!(limiter.latency_samples(), 48);
    assert!(limiter.core().max_delay_samples() >= 960);
}

#[test]
fn test_longest_accepted_lookahead_is_exact() {
    let preset = Preset::new("Long")
        .with_limiter(LimiterSettings {
            attack_ms: 50.0,
            ..LimiterSettings::default()
        })
        .with_engine(EngineConfig {
            max_delay_s: 0.05,
            ..EngineConfig::default()
        });

    // 2205 samples of buffer at 44.1 kHz cannot hold the 2208-sample look-ahead
    let err = preset.build_limiter(44100.0).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Validation(ValidationError::LookaheadExceedsBuffer {
            lookahead: 2208,
            max_delay: 2205,
            ..
        })
    ));

    let mut limiter = preset.build_limiter(48000.0).unwrap();
    let latency = limiter.latency_samples();
    assert_eq!(latency, 2400);
    let arrival = (0..latency + 100).position(|i| {
        let x = if i == 0 { 0.5 } else { 0.0 };
        limiter.process(StereoFrame::new(x, x)).peak() > 0.25
    });
    assert_eq!(arrival, Some(latency));
}

#[test]
fn test_invalid_file_reports_every_problem() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(
        &path,
        r#"
name = "Broken"

[limiter]
threshold_db = 6.0
release_ms = 5.0

[engine]
max_delay_s = 0.001
"#,
    )
    .unwrap();

    let preset = Preset::load(&path).unwrap();
    let err = preset.build_limiter(48000.0).unwrap_err();
    match err {
        ConfigError::Validation(ValidationError::Multiple(errors)) => {
            assert_eq!(errors.len(), 3, "{errors:?}");
            assert!(
                errors
                    .iter()
                    .any(|e| matches!(e, ValidationError::LookaheadExceedsBuffer { .. }))
            );
        }
        other => panic!("expected collected validation errors, got {other}"),
    }
}

#[test]
fn test_unknown_keys_rejected_on_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("typo.toml");
    std::fs::write(&path, "name = \"Typo\"\n[limiter]\nthreshhold_db = -3.0\n").unwrap();

    assert!(matches!(Preset::load(&path), Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_missing_file_error_names_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");
    let err = Preset::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_resolve_accepts_paths() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("by_path.toml");
    Preset::new("By Path").save(&path).unwrap();

    let preset = Preset::resolve(path.to_str().unwrap()).unwrap();
    assert_eq!(preset.name, "By Path");
    assert_eq!(
        paths::preset_name_from_path(&path).as_deref(),
        Some("by_path")
    );
}

#[test]
fn test_engine_overrides_reach_limiter() {
    let preset = Preset::new("Long Buffer").with_engine(EngineConfig {
        max_delay_s: 0.5,
        ..EngineConfig::default()
    });
    let limiter = preset.build_limiter(48000.0).unwrap();
    assert!(limiter.core().max_delay_samples() >= 24000);
}
