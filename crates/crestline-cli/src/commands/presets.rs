//! Preset management commands.

use super::common::{SettingsArgs, load_preset};
use anyhow::Context;
use clap::{Args, Subcommand};
use crestline_config::{
    Preset, ensure_user_presets_dir, factory_presets, is_factory_preset, list_user_presets,
    preset_name_from_path, system_presets_dir, user_config_dir, user_preset_path,
    user_presets_dir,
};
use std::path::PathBuf;

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List available presets (factory and user)
    List {
        /// Show only factory presets
        #[arg(long, conflicts_with = "user")]
        factory: bool,

        /// Show only user presets
        #[arg(long)]
        user: bool,
    },

    /// Print a preset as TOML
    Show {
        /// Preset name or path
        name: String,
    },

    /// Save limiter settings as a user preset
    Save {
        /// Name for the new preset
        name: String,

        /// Start from this preset instead of the defaults
        #[arg(long)]
        from: Option<String>,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Description of the preset
        #[arg(short, long)]
        description: Option<String>,

        /// Write to this path instead of the user presets directory
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite if the preset already exists
        #[arg(long)]
        force: bool,
    },

    /// Delete a user preset
    Delete {
        /// Preset name to delete
        name: String,

        /// Confirm deletion
        #[arg(long)]
        force: bool,
    },

    /// Copy a preset into the user presets for editing
    Copy {
        /// Source preset name or path
        source: String,

        /// New preset name (defaults to the source name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Show preset directories
    Paths,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List { factory, user } => list_presets(!user, !factory),
        PresetsCommand::Show { name } => show_preset(&name),
        PresetsCommand::Save {
            name,
            from,
            settings,
            description,
            path,
            force,
        } => {
            let target = path.unwrap_or_else(|| user_preset_path(&name));
            save_preset(&name, from.as_deref(), &settings, description, &target, force)
        }
        PresetsCommand::Delete { name, force } => delete_preset(&name, force),
        PresetsCommand::Copy { source, name } => copy_preset(&source, name.as_deref()),
        PresetsCommand::Paths => show_paths(),
    }
}

fn list_presets(show_factory: bool, show_user: bool) -> anyhow::Result<()> {
    if show_factory {
        println!("Factory Presets:");
        for preset in factory_presets() {
            println!("  {:14} {}", preset.name.to_lowercase(), summary(&preset));
        }
        println!();
    }

    if show_user {
        println!("User Presets:");
        let paths = list_user_presets();
        if paths.is_empty() {
            println!("  (none)  create one with: crestline presets save <name> --threshold -3");
        }
        for path in paths {
            let name = preset_name_from_path(&path).unwrap_or_default();
            match Preset::load(&path) {
                Ok(preset) => println!("  {:14} {}", name, summary(&preset)),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "unreadable preset");
                    println!("  {name:14} (error loading)");
                }
            }
        }
    }

    Ok(())
}

/// One-line description of a preset's limiter settings.
fn summary(preset: &Preset) -> String {
    let s = &preset.limiter;
    let mut line = format!(
        "{:>6.1} dB  atk {:>4} ms  rel {:>5} ms",
        s.threshold_db, s.attack_ms, s.release_ms
    );
    if s.pre_gain_db > 0.0 {
        line.push_str(&format!("  +{} dB drive", s.pre_gain_db));
    }
    if let Some(desc) = &preset.description {
        line.push_str("  - ");
        line.push_str(desc);
    }
    line
}

fn show_preset(name: &str) -> anyhow::Result<()> {
    let preset = load_preset(name)?;
    print!("{}", preset.to_toml()?);
    if let Err(e) = preset.validate() {
        println!();
        println!("# warning: {e}");
    }
    Ok(())
}

fn save_preset(
    name: &str,
    from: Option<&str>,
    settings: &SettingsArgs,
    description: Option<String>,
    target: &std::path::Path,
    force: bool,
) -> anyhow::Result<()> {
    if target.exists() && !force {
        anyhow::bail!("preset '{name}' already exists. Use --force to overwrite.");
    }

    let mut preset = match from {
        Some(source) => {
            let base = load_preset(source)?;
            Preset {
                name: name.to_string(),
                ..base
            }
        }
        None => Preset::new(name),
    };
    if description.is_some() {
        preset.description = description;
    }
    settings.apply(&mut preset.limiter)?;
    preset.validate()?;

    preset
        .save(target)
        .with_context(|| format!("failed to save preset '{name}'"))?;
    println!("Saved preset '{}' to {}", name, target.display());
    Ok(())
}

fn delete_preset(name: &str, force: bool) -> anyhow::Result<()> {
    let path = user_preset_path(name);
    if !path.is_file() {
        if is_factory_preset(name) {
            anyhow::bail!("'{name}' is a factory preset and cannot be deleted.");
        }
        anyhow::bail!("user preset '{name}' not found.");
    }
    if !force {
        anyhow::bail!("use --force to confirm deletion of preset '{name}'.");
    }

    std::fs::remove_file(&path).with_context(|| format!("failed to delete {}", path.display()))?;
    println!("Deleted preset '{name}'.");
    Ok(())
}

fn copy_preset(source: &str, new_name: Option<&str>) -> anyhow::Result<()> {
    let preset = load_preset(source)?;
    let target_name = new_name.unwrap_or(source);

    ensure_user_presets_dir()?;
    let path = user_preset_path(target_name);
    if path.exists() {
        anyhow::bail!(
            "preset '{target_name}' already exists in user presets. Choose a different name with --name."
        );
    }

    let copy = Preset {
        name: target_name.to_string(),
        ..preset
    };
    copy.save(&path)?;

    println!("Copied '{source}' to user preset '{target_name}'");
    println!("Path: {}", path.display());
    Ok(())
}

fn show_paths() -> anyhow::Result<()> {
    println!("User presets:   {}", user_presets_dir().display());
    println!("System presets: {}", system_presets_dir().display());
    println!("Config dir:     {}", user_config_dir().display());
    Ok(())
}
