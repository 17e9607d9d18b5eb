//! Where presets live on disk.
//!
//! | Location | Linux | macOS | Windows |
//! |----------|-------|-------|---------|
//! | User config | `~/.config/crestline/` | `~/Library/Application Support/crestline/` | `%APPDATA%\crestline\` |
//! | User presets | `<user config>/presets/` | same | same |
//! | System presets | `/usr/share/crestline/presets/` | `/Library/Application Support/crestline/presets/` | `%PROGRAMDATA%\crestline\presets\` |
//!
//! Lookups prefer the user directory, so a user preset shadows a system
//! preset of the same name.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

const APP_NAME: &str = "crestline";
const PRESETS_SUBDIR: &str = "presets";
const PRESET_EXTENSION: &str = "toml";

/// Per-user configuration directory; `./crestline` when the platform has
/// none.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Per-user presets directory.
pub fn user_presets_dir() -> PathBuf {
    user_config_dir().join(PRESETS_SUBDIR)
}

/// Read-only presets shipped with an installation.
pub fn system_presets_dir() -> PathBuf {
    system_data_root().join(APP_NAME).join(PRESETS_SUBDIR)
}

#[cfg(target_os = "linux")]
fn system_data_root() -> PathBuf {
    PathBuf::from("/usr/share")
}

#[cfg(target_os = "macos")]
fn system_data_root() -> PathBuf {
    PathBuf::from("/Library/Application Support")
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn system_data_root() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// File name for a preset: `name` with `.toml` appended unless present.
pub fn preset_file_name(name: &str) -> String {
    if Path::new(name)
        .extension()
        .is_some_and(|ext| ext == PRESET_EXTENSION)
    {
        name.to_string()
    } else {
        format!("{name}.{PRESET_EXTENSION}")
    }
}

/// Path a preset called `name` is saved to in the user directory.
pub fn user_preset_path(name: &str) -> PathBuf {
    user_presets_dir().join(preset_file_name(name))
}

/// Locate a preset file.
///
/// `name` is tried as a path first, then as a preset name in the user and
/// system directories.
///
/// ```rust,no_run
/// use crestline_config::paths::find_preset;
///
/// if let Some(path) = find_preset("late_night") {
///     println!("found {}", path.display());
/// }
/// ```
pub fn find_preset(name: &str) -> Option<PathBuf> {
    let direct = PathBuf::from(name);
    if direct.is_file() {
        return Some(direct);
    }

    let file_name = preset_file_name(name);
    [user_presets_dir(), system_presets_dir()]
        .into_iter()
        .map(|dir| dir.join(&file_name))
        .find(|path| path.is_file())
}

/// Create the user presets directory if needed and return it.
pub fn ensure_user_presets_dir() -> Result<PathBuf, ConfigError> {
    ensure_dir(user_presets_dir())
}

/// Create the user config directory if needed and return it.
pub fn ensure_user_config_dir() -> Result<PathBuf, ConfigError> {
    ensure_dir(user_config_dir())
}

fn ensure_dir(dir: PathBuf) -> Result<PathBuf, ConfigError> {
    if !dir.is_dir() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// Preset files in the user directory, sorted by path.
pub fn list_user_presets() -> Vec<PathBuf> {
    list_presets_in_dir(&user_presets_dir())
}

/// Preset files in the system directory, sorted by path.
pub fn list_system_presets() -> Vec<PathBuf> {
    list_presets_in_dir(&system_presets_dir())
}

/// User presets followed by system presets not shadowed by a user preset
/// of the same name.
pub fn list_all_presets() -> Vec<PathBuf> {
    merge_shadowed(list_user_presets(), list_system_presets())
}

fn merge_shadowed(mut primary: Vec<PathBuf>, secondary: Vec<PathBuf>) -> Vec<PathBuf> {
    let taken: Vec<_> = primary.iter().filter_map(|p| preset_name_from_path(p)).collect();
    primary.extend(secondary.into_iter().filter(|p| {
        preset_name_from_path(p).is_none_or(|name| !taken.contains(&name))
    }));
    primary
}

/// `.toml` files directly inside `dir`; empty when it cannot be read.
pub fn list_presets_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut presets: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|e| e == PRESET_EXTENSION))
        .collect();
    presets.sort();
    presets
}

/// Preset name for a file: its stem.
///
/// ```rust
/// use crestline_config::paths::preset_name_from_path;
/// use std::path::Path;
///
/// let name = preset_name_from_path(Path::new("/presets/late_night.toml"));
/// assert_eq!(name.as_deref(), Some("late_night"));
/// ```
pub fn preset_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_dirs_carry_app_name() {
        assert!(user_config_dir().ends_with(APP_NAME));
        assert!(user_presets_dir().ends_with(Path::new(APP_NAME).join(PRESETS_SUBDIR)));
        assert!(system_presets_dir().to_string_lossy().contains(APP_NAME));
    }

    #[test]
    fn test_preset_file_name() {
        assert_eq!(preset_file_name("loud"), "loud.toml");
        assert_eq!(preset_file_name("loud.toml"), "loud.toml");
        assert_eq!(preset_file_name("v1.2"), "v1.2.toml");
        assert!(user_preset_path("loud").ends_with("presets/loud.toml"));
    }

    #[test]
    fn test_find_preset_by_path() {
        let temp_dir = TempDir::new().unwrap();
        let preset_path = temp_dir.path().join("test.toml");
        fs::write(&preset_path, "name = \"test\"").unwrap();

        assert_eq!(find_preset(preset_path.to_str().unwrap()), Some(preset_path));
    }

    #[test]
    fn test_find_preset_not_found() {
        assert!(find_preset("nonexistent_preset_12345").is_none());
    }

    #[test]
    fn test_list_presets_filters_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.toml"), "").unwrap();
        fs::write(temp_dir.path().join("a.toml"), "").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(temp_dir.path().join("dir.toml")).unwrap();

        let names: Vec<_> = list_presets_in_dir(temp_dir.path())
            .iter()
            .filter_map(|p| preset_name_from_path(p))
            .collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn test_list_presets_missing_dir() {
        assert!(list_presets_in_dir(Path::new("/nonexistent/path/12345")).is_empty());
    }

    #[test]
    fn test_user_presets_shadow_system() {
        let merged = merge_shadowed(
            vec![PathBuf::from("/u/loud.toml")],
            vec![PathBuf::from("/s/loud.toml"), PathBuf::from("/s/soft.toml")],
        );
        assert_eq!(
            merged,
            [PathBuf::from("/u/loud.toml"), PathBuf::from("/s/soft.toml")]
        );
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("a").join("b");
        assert_eq!(ensure_dir(target.clone()).unwrap(), target);
        assert!(target.is_dir());
        // second call is a no-op
        assert!(ensure_dir(target).is_ok());
    }
}
