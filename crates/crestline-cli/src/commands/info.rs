//! Display WAV file metadata.

use super::common::format_db;
use anyhow::Context;
use clap::Args;
use crestline_core::linear_to_db;
use crestline_io::{WavFormat, read_wav_info, read_wav_stereo};

/// Display WAV file information.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the WAV file
    pub file: std::path::PathBuf,

    /// Also read the samples and report per-channel peaks
    #[arg(long)]
    pub levels: bool,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let info = read_wav_info(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let format_str = match info.format {
        WavFormat::Pcm => "PCM",
        WavFormat::IeeeFloat => "IEEE Float",
    };

    println!("File:        {}", args.file.display());
    println!("Format:      {} {}-bit", format_str, info.bits_per_sample);
    println!("Channels:    {}", info.channels);
    println!("Sample Rate: {} Hz", info.sample_rate);
    println!(
        "Duration:    {:.3}s ({} frames)",
        info.duration_secs, info.num_frames
    );

    let file_size = std::fs::metadata(&args.file)?.len();
    println!("File Size:   {}", format_bytes(file_size));

    if args.levels {
        let (samples, _) = read_wav_stereo(&args.file)?;
        let peak = samples.peak();
        println!("Peak L:      {}", format_db(linear_to_db(peak.left)));
        println!("Peak R:      {}", format_db(linear_to_db(peak.right)));
        if info.channels > 2 {
            println!("             (channels beyond the first two are ignored)");
        }
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
