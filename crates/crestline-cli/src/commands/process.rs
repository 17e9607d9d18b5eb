//! File-based limiting command.

use super::common::{SettingsArgs, format_db, load_preset};
use anyhow::Context;
use clap::Args;
use crestline_config::Preset;
use crestline_io::{ProcessingEngine, ProcessingStats, WavSpec, read_wav_stereo, write_wav_stereo};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file (always stereo)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Preset name or path to a preset TOML file
    #[arg(short, long)]
    preset: Option<String>,

    #[command(flatten)]
    settings: SettingsArgs,

    /// Processing block size (overrides the preset)
    #[arg(long)]
    block_size: Option<usize>,

    /// Keep the look-ahead delay at the start of the output
    #[arg(long)]
    keep_latency: bool,

    /// Output bit depth (16, 24, or 32 float)
    #[arg(long, default_value = "32")]
    bit_depth: u16,

    /// Print statistics as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    if !matches!(args.bit_depth, 16 | 24 | 32) {
        anyhow::bail!(
            "unsupported bit depth {} (expected 16, 24, or 32)",
            args.bit_depth
        );
    }

    let mut preset = match &args.preset {
        Some(name) => load_preset(name)?,
        None => Preset::new("command line"),
    };
    args.settings.apply(&mut preset.limiter)?;

    let mut engine_config = preset.engine_config();
    if let Some(block_size) = args.block_size {
        engine_config.block_size = block_size;
    }

    let (input, spec) = read_wav_stereo(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    tracing::info!(
        path = %args.input.display(),
        frames = input.len(),
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        "read input"
    );

    let limiter = engine_config
        .build_limiter(spec.sample_rate as f32, &preset.limiter)
        .with_context(|| format!("invalid settings in '{}'", preset.name))?;
    let mut engine = ProcessingEngine::with_limiter(limiter);
    engine.set_block_size(engine_config.block_size);
    engine.set_compensate_latency(!args.keep_latency);

    tracing::info!(
        preset = %preset.name,
        threshold_db = preset.limiter.threshold_db,
        attack_ms = preset.limiter.attack_ms,
        latency = engine.latency_samples(),
        "limiter ready"
    );

    let (output, stats) = if args.quiet || args.json {
        engine.process_buffer(&input)
    } else {
        let pb = progress_bar(input.len() as u64)?;
        let result =
            engine.process_buffer_with_progress(&input, |done, _| pb.set_position(done as u64));
        pb.finish_and_clear();
        result
    };

    let out_spec = WavSpec {
        channels: 2,
        sample_rate: spec.sample_rate,
        bits_per_sample: args.bit_depth,
    };
    write_wav_stereo(&args.output, &output, out_spec)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    tracing::info!(path = %args.output.display(), frames = output.len(), "wrote output");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats_json(&stats, spec.sample_rate))?);
    } else {
        print_stats(&stats, spec.sample_rate);
    }

    Ok(())
}

fn progress_bar(len: u64) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames ({eta})")?
            .progress_chars("##-"),
    );
    Ok(pb)
}

fn print_stats(stats: &ProcessingStats, sample_rate: u32) {
    println!("Frames:          {}", stats.frames);
    println!(
        "Input peak:      {} (L {}, R {})",
        format_db(stats.input_peak_db()),
        format_db(crestline_core::linear_to_db(stats.input_peak.left)),
        format_db(crestline_core::linear_to_db(stats.input_peak.right)),
    );
    println!(
        "Output peak:     {} (L {}, R {})",
        format_db(stats.output_peak_db()),
        format_db(crestline_core::linear_to_db(stats.output_peak.left)),
        format_db(crestline_core::linear_to_db(stats.output_peak.right)),
    );
    println!("Max reduction:   {:.2} dB", stats.max_attenuation_db);
    println!("Limited:         {:.1}%", stats.limited_ratio() * 100.0);
    if stats.latency_compensated > 0 {
        println!(
            "Latency removed: {} frames ({:.2} ms)",
            stats.latency_compensated,
            stats.latency_compensated as f32 * 1000.0 / sample_rate as f32
        );
    }
}

fn stats_json(stats: &ProcessingStats, sample_rate: u32) -> serde_json::Value {
    serde_json::json!({
        "frames": stats.frames,
        "sample_rate": sample_rate,
        "input_peak_db": stats.input_peak_db(),
        "output_peak_db": stats.output_peak_db(),
        "max_attenuation_db": stats.max_attenuation_db,
        "limited_ratio": stats.limited_ratio(),
        "latency_compensated": stats.latency_compensated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crestline_core::StereoFrame;

    #[test]
    fn test_stats_json_fields() {
        let stats = ProcessingStats {
            frames: 100,
            input_peak: StereoFrame::new(1.0, 0.5),
            output_peak: StereoFrame::new(0.5, 0.25),
            max_attenuation_db: -6.0,
            limited_frames: 50,
            latency_compensated: 480,
        };
        let json = stats_json(&stats, 48000);
        assert_eq!(json["frames"], 100);
        assert_eq!(json["latency_compensated"], 480);
        assert_eq!(json["limited_ratio"].as_f64(), Some(0.5));
        assert!(json["output_peak_db"].as_f64().unwrap() < -6.0);
    }
}
