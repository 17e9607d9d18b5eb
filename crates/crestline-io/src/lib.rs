//! Audio file I/O and offline processing for the crestline limiter.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav_stereo`] and [`write_wav_stereo`] for loading/saving audio files
//! - **Offline limiting**: [`ProcessingEngine`] drives a [`Limiter`](crestline_limiter::Limiter)
//!   over a whole buffer in blocks and reports [`ProcessingStats`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use crestline_io::{ProcessingEngine, read_wav_stereo, write_wav_stereo};
//!
//! let (input, spec) = read_wav_stereo("input.wav")?;
//!
//! let mut engine = ProcessingEngine::new(spec.sample_rate as f32);
//! engine.limiter_mut().controls_mut().set_threshold_db(-1.0);
//! let (output, stats) = engine.process_buffer(&input);
//! println!("max attenuation {:.1} dB", stats.max_attenuation_db);
//!
//! write_wav_stereo("output.wav", &output, spec)?;
//! ```

mod engine;
mod wav;

pub use crestline_core::StereoBuffer;
pub use engine::{DEFAULT_BLOCK_SIZE, ProcessingEngine, ProcessingStats};
pub use wav::{WavFormat, WavInfo, WavSpec, read_wav_info, read_wav_stereo, write_wav_stereo};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
