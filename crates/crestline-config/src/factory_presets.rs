//! Factory presets bundled with the crestline library.
//!
//! These are always available without external files and cover the usual
//! places a brickwall limiter sits: a near-inaudible safety ceiling, the
//! last stage of a master, loudness-driven broadcast chains, and an
//! obviously pumping effect setting.

use crate::Preset;

/// Factory preset names, in listing order.
pub static FACTORY_PRESET_NAMES: &[&str] =
    &["default", "transparent", "mastering", "broadcast", "aggressive"];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("default", DEFAULT_PRESET),
    ("transparent", TRANSPARENT_PRESET),
    ("mastering", MASTERING_PRESET),
    ("broadcast", BROADCAST_PRESET),
    ("aggressive", AGGRESSIVE_PRESET),
];

const DEFAULT_PRESET: &str = r#"
name = "Default"
description = "Control defaults: -1 dB ceiling, 10 ms look-ahead"
"#;

/// Slow release and long hold so only stray peaks are touched.
const TRANSPARENT_PRESET: &str = r#"
name = "Transparent"
description = "Safety ceiling that only catches stray peaks"

[limiter]
threshold_db = -0.3
attack_ms = 15.0
hold_ms = 100.0
release_ms = 500.0
pre_gain_db = 0.0
"#;

const MASTERING_PRESET: &str = r#"
name = "Mastering"
description = "Final-stage ceiling with moderate drive"

[limiter]
threshold_db = -1.0
attack_ms = 5.0
hold_ms = 20.0
release_ms = 200.0
pre_gain_db = 3.0

[engine]
crossfade_samples = 2048
"#;

const BROADCAST_PRESET: &str = r#"
name = "Broadcast"
description = "Dense, level-consistent output for speech and radio"

[limiter]
threshold_db = -2.0
attack_ms = 2.0
hold_ms = 10.0
release_ms = 100.0
pre_gain_db = 9.0
"#;

/// Audible pumping; short look-ahead keeps the latency low.
const AGGRESSIVE_PRESET: &str = r#"
name = "Aggressive"
description = "Heavy drive into a fast release"

[limiter]
threshold_db = -6.0
attack_ms = 1.0
hold_ms = 0.0
release_ms = 50.0
pre_gain_db = 18.0

[engine]
max_delay_s = 0.02
crossfade_samples = 256
"#;

/// All factory presets.
///
/// ```rust
/// use crestline_config::factory_presets;
///
/// for preset in factory_presets() {
///     println!("{}: {}", preset.name, preset.description.as_deref().unwrap_or(""));
/// }
/// ```
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Factory preset by key (`"broadcast"`) or display name (`"Broadcast"`),
/// ignoring case.
///
/// ```rust
/// use crestline_config::get_factory_preset;
///
/// let preset = get_factory_preset("Mastering").unwrap();
/// assert_eq!(preset.limiter.attack_ms, 5.0);
/// assert!(get_factory_preset("fuzz").is_none());
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    if let Some((_, toml)) = FACTORY_PRESETS_TOML
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
    {
        return Preset::from_toml(toml).ok();
    }

    factory_presets()
        .into_iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}

/// Factory preset keys.
pub fn factory_preset_names() -> &'static [&'static str] {
    FACTORY_PRESET_NAMES
}

/// Whether `name` resolves to a factory preset.
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}
