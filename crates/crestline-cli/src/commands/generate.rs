//! Test signal generation command.
//!
//! Every signal is written as a stereo WAV; `--right-gain` scales the right
//! channel so unbalanced material can exercise the stereo link.

use clap::{Args, Subcommand};
use crestline_core::{StereoBuffer, StereoFrame, db_to_linear};
use crestline_io::{WavSpec, write_wav_stereo};
use std::f32::consts::TAU;
use std::path::PathBuf;

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    command: GenerateCommand,
}

/// Options shared by every signal.
#[derive(Args)]
struct OutputArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Sample rate
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Right channel gain relative to the left (linear)
    #[arg(long, default_value = "1.0")]
    right_gain: f32,

    /// Output bit depth (16, 24, or 32 float)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate a sine tone
    Tone {
        #[command(flatten)]
        out: OutputArgs,

        /// Frequency in Hz
        #[arg(long, default_value = "440.0")]
        freq: f32,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,

        /// Amplitude (linear, may exceed 1 for float output)
        #[arg(long, default_value = "0.8")]
        amplitude: f32,
    },

    /// Generate an exponential sine sweep
    Sweep {
        #[command(flatten)]
        out: OutputArgs,

        /// Start frequency in Hz
        #[arg(long, default_value = "20.0")]
        start: f32,

        /// End frequency in Hz
        #[arg(long, default_value = "20000.0")]
        end: f32,

        /// Duration in seconds
        #[arg(long, default_value = "2.0")]
        duration: f32,

        /// Amplitude (linear)
        #[arg(long, default_value = "0.8")]
        amplitude: f32,
    },

    /// Generate a single-sample impulse
    Impulse {
        #[command(flatten)]
        out: OutputArgs,

        /// Length in frames
        #[arg(long, default_value = "48000")]
        length: usize,

        /// Frame the impulse lands on
        #[arg(long, default_value = "0")]
        position: usize,

        /// Impulse amplitude
        #[arg(long, default_value = "1.0")]
        amplitude: f32,
    },

    /// Generate white noise
    Noise {
        #[command(flatten)]
        out: OutputArgs,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,

        /// Amplitude (linear)
        #[arg(long, default_value = "0.5")]
        amplitude: f32,

        /// Random seed
        #[arg(long, default_value = "305419896")]
        seed: u32,
    },

    /// Generate tone bursts that alternate between two levels
    Bursts {
        #[command(flatten)]
        out: OutputArgs,

        /// Frequency in Hz
        #[arg(long, default_value = "1000.0")]
        freq: f32,

        /// Level of the loud bursts in dBFS
        #[arg(long, default_value = "6.0", allow_negative_numbers = true)]
        loud_db: f32,

        /// Level of the quiet bursts in dBFS
        #[arg(long, default_value = "-18.0", allow_negative_numbers = true)]
        quiet_db: f32,

        /// Length of each burst in ms
        #[arg(long, default_value = "250.0")]
        burst_ms: f32,

        /// Number of loud/quiet pairs
        #[arg(long, default_value = "4")]
        count: usize,
    },

    /// Generate silence
    Silence {
        #[command(flatten)]
        out: OutputArgs,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,
    },
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let (out, mono) = match args.command {
        GenerateCommand::Tone {
            out,
            freq,
            duration,
            amplitude,
        } => {
            println!("Generating {freq} Hz tone for {duration:.2}s...");
            let frames = frames_for(duration, out.sample_rate);
            let samples = tone(freq, amplitude, frames, out.sample_rate);
            (out, samples)
        }

        GenerateCommand::Sweep {
            out,
            start,
            end,
            duration,
            amplitude,
        } => {
            if start <= 0.0 || end <= 0.0 {
                anyhow::bail!("sweep frequencies must be positive");
            }
            println!("Generating sweep {start} Hz to {end} Hz over {duration:.2}s...");
            let samples = sweep(start, end, duration, amplitude, out.sample_rate);
            (out, samples)
        }

        GenerateCommand::Impulse {
            out,
            length,
            position,
            amplitude,
        } => {
            if position >= length {
                anyhow::bail!("impulse position {position} is outside {length} frames");
            }
            println!("Generating impulse at frame {position}...");
            let mut samples = vec![0.0; length];
            samples[position] = amplitude;
            (out, samples)
        }

        GenerateCommand::Noise {
            out,
            duration,
            amplitude,
            seed,
        } => {
            println!("Generating white noise for {duration:.2}s...");
            let samples = noise(seed, amplitude, frames_for(duration, out.sample_rate));
            (out, samples)
        }

        GenerateCommand::Bursts {
            out,
            freq,
            loud_db,
            quiet_db,
            burst_ms,
            count,
        } => {
            println!("Generating {count} burst pairs at {loud_db} / {quiet_db} dBFS...");
            let burst = frames_for(burst_ms / 1000.0, out.sample_rate);
            let samples = bursts(freq, loud_db, quiet_db, burst, count, out.sample_rate);
            (out, samples)
        }

        GenerateCommand::Silence { out, duration } => {
            println!("Generating silence for {duration:.2}s...");
            let samples = vec![0.0; frames_for(duration, out.sample_rate)];
            (out, samples)
        }
    };

    write_signal(&out, mono)
}

fn write_signal(out: &OutputArgs, mono: Vec<f32>) -> anyhow::Result<()> {
    let buffer: StereoBuffer = mono
        .into_iter()
        .map(|x| StereoFrame::new(x, x * out.right_gain))
        .collect();
    let spec = WavSpec {
        channels: 2,
        sample_rate: out.sample_rate,
        bits_per_sample: out.bit_depth,
    };
    write_wav_stereo(&out.output, &buffer, spec)?;
    println!("Wrote {} frames to {}", buffer.len(), out.output.display());
    Ok(())
}

fn frames_for(seconds: f32, sample_rate: u32) -> usize {
    (seconds.max(0.0) * sample_rate as f32).round() as usize
}

fn tone(freq: f32, amplitude: f32, frames: usize, sample_rate: u32) -> Vec<f32> {
    let step = TAU * freq / sample_rate as f32;
    (0..frames)
        .map(|i| (step * i as f32).sin() * amplitude)
        .collect()
}

/// Exponential sweep: instantaneous frequency moves from `start` to `end`
/// at a constant rate in octaves per second.
fn sweep(start: f32, end: f32, duration: f32, amplitude: f32, sample_rate: u32) -> Vec<f32> {
    let frames = frames_for(duration, sample_rate);
    let ratio = (end / start).ln();
    let k = duration / ratio;
    (0..frames)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let phase = if ratio.abs() < 1e-6 {
                TAU * start * t
            } else {
                TAU * start * k * ((t / k).exp() - 1.0)
            };
            phase.sin() * amplitude
        })
        .collect()
}

/// Uniform noise from a xorshift32 generator.
fn noise(seed: u32, amplitude: f32, frames: usize) -> Vec<f32> {
    let mut state = seed.max(1);
    (0..frames)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state as f32 / u32::MAX as f32 * 2.0 - 1.0) * amplitude
        })
        .collect()
}

fn bursts(
    freq: f32,
    loud_db: f32,
    quiet_db: f32,
    burst: usize,
    count: usize,
    sample_rate: u32,
) -> Vec<f32> {
    let carrier = tone(freq, 1.0, burst * 2 * count, sample_rate);
    let (loud, quiet) = (db_to_linear(loud_db), db_to_linear(quiet_db));
    carrier
        .into_iter()
        .enumerate()
        .map(|(i, x)| if (i / burst.max(1)) % 2 == 0 { x * loud } else { x * quiet })
        .collect()
}
