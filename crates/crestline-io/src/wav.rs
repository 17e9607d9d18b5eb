//! WAV file reading and writing.
//!
//! Everything is read into planar stereo: mono files are duplicated to both
//! channels and files with more than two channels keep the first two.
//! Integer PCM is scaled to `[-1, 1)`; float files are passed through.

use crate::{Error, Result};
use crestline_core::{StereoBuffer, StereoFrame};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels in the file.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let num_frames = reader.duration() as u64;
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    let format = match spec.sample_format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format,
    })
}

/// Output file settings.
///
/// 32-bit files are written as IEEE float, 16- and 24-bit as integer PCM.
/// The channel count of the source is recorded but files are always written
/// as stereo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels in the source (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24 or 32).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl WavSpec {
    fn to_stereo_hound(self) -> Result<hound::WavSpec> {
        let sample_format = match self.bits_per_sample {
            32 => SampleFormat::Float,
            16 | 24 => SampleFormat::Int,
            other => {
                return Err(Error::UnsupportedFormat(format!(
                    "{other}-bit output (use 16, 24 or 32)"
                )));
            }
        };
        Ok(hound::WavSpec {
            channels: 2,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format,
        })
    }
}

/// Full-scale value for an integer bit depth.
fn int_scale(bits: u16) -> f32 {
    (1i64 << (bits - 1)) as f32
}

/// Read a WAV file as stereo samples along with its spec.
///
/// Mono files are expanded to stereo by duplicating to both channels.
/// Files with more than 2 channels use only the first two channels.
///
/// # Example
/// ```ignore
/// let (samples, spec) = read_wav_stereo("input.wav")?;
/// println!("Loaded {} frames at {} Hz", samples.len(), spec.sample_rate);
/// ```
pub fn read_wav_stereo<P: AsRef<Path>>(path: P) -> Result<(StereoBuffer, WavSpec)> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    let hound_spec = reader.spec();
    let spec = WavSpec::from(hound_spec);
    let channels = usize::from(spec.channels);
    if channels == 0 {
        return Err(Error::UnsupportedFormat("zero-channel file".to_string()));
    }

    let interleaved: Vec<f32> = match hound_spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let scale = int_scale(spec.bits_per_sample);
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let stereo = match channels {
        1 => StereoBuffer::from_mono(interleaved),
        2 => StereoBuffer::from_interleaved(&interleaved),
        _ => interleaved
            .chunks_exact(channels)
            .map(|chunk| StereoFrame::new(chunk[0], chunk[1]))
            .collect(),
    };

    tracing::debug!(
        path = %path.display(),
        channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        frames = stereo.len(),
        "read wav"
    );

    Ok((stereo, spec))
}

/// Write stereo samples to a WAV file.
///
/// Integer formats clamp to full scale; float output is written unclipped.
///
/// # Example
/// ```ignore
/// let samples = StereoBuffer::new(vec![0.0; 48000], vec![0.0; 48000]);
/// write_wav_stereo("output.wav", &samples, WavSpec::default())?;
/// ```
pub fn write_wav_stereo<P: AsRef<Path>>(
    path: P,
    samples: &StereoBuffer,
    spec: WavSpec,
) -> Result<()> {
    let path = path.as_ref();
    let hound_spec = spec.to_stereo_hound()?;
    let mut writer = WavWriter::create(path, hound_spec)?;

    if hound_spec.sample_format == SampleFormat::Float {
        for frame in samples.frames() {
            writer.write_sample(frame.left)?;
            writer.write_sample(frame.right)?;
        }
    } else {
        let scale = int_scale(spec.bits_per_sample);
        let quantize = |x: f32| (x * scale).clamp(-scale, scale - 1.0) as i32;
        for frame in samples.frames() {
            writer.write_sample(quantize(frame.left))?;
            writer.write_sample(quantize(frame.right))?;
        }
    }

    writer.finalize()?;
    tracing::debug!(path = %path.display(), frames = samples.len(), "wrote wav");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn test_signal(len: usize) -> StereoBuffer {
        let left = (0..len).map(|i| (i as f32 / 100.0).sin() * 0.9).collect();
        let right = (0..len).map(|i| (i as f32 / 70.0).cos() * 0.5).collect();
        StereoBuffer::new(left, right)
    }

    #[test]
    fn test_stereo_roundtrip_f32() {
        let samples = test_signal(1000);
        let file = NamedTempFile::new().unwrap();
        write_wav_stereo(file.path(), &samples, WavSpec::default()).unwrap();

        let (loaded, spec) = read_wav_stereo(file.path()).unwrap();
        assert_eq!(spec.sample_rate, 48000);
        assert_eq!(spec.channels, 2);
        assert_eq!(loaded, samples);
    }

    #[test]
    fn test_stereo_roundtrip_i16() {
        let samples = test_signal(1000);
        let spec = WavSpec {
            sample_rate: 44100,
            bits_per_sample: 16,
            ..WavSpec::default()
        };
        let file = NamedTempFile::new().unwrap();
        write_wav_stereo(file.path(), &samples, spec).unwrap();

        let (loaded, loaded_spec) = read_wav_stereo(file.path()).unwrap();
        assert_eq!(loaded_spec.sample_rate, 44100);
        assert_eq!(loaded.len(), samples.len());
        // 16-bit has less precision
        for (a, b) in samples.frames().zip(loaded.frames()) {
            assert!((a.left - b.left).abs() < 1e-4);
            assert!((a.right - b.right).abs() < 1e-4);
        }
    }

    #[test]
    fn test_integer_output_clamps() {
        let samples = StereoBuffer::new(vec![2.0, -2.0], vec![0.0, 0.0]);
        let spec = WavSpec {
            bits_per_sample: 24,
            ..WavSpec::default()
        };
        let file = NamedTempFile::new().unwrap();
        write_wav_stereo(file.path(), &samples, spec).unwrap();

        let (loaded, _) = read_wav_stereo(file.path()).unwrap();
        assert!(loaded.left[0] < 1.0 && loaded.left[0] > 0.999);
        assert_eq!(loaded.left[1], -1.0);
    }

    #[test]
    fn test_read_mono_as_stereo() {
        let file = NamedTempFile::new().unwrap();
        let mono_spec = hound::WavSpec {
            channels: 1,
            sample_rate: 22050,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mono: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();
        let mut writer = WavWriter::create(file.path(), mono_spec).unwrap();
        for &s in &mono {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let (stereo, spec) = read_wav_stereo(file.path()).unwrap();
        assert_eq!(spec.channels, 1);
        assert_eq!(stereo.left, mono);
        assert_eq!(stereo.right, mono);
    }

    #[test]
    fn test_unsupported_bit_depth() {
        let file = NamedTempFile::new().unwrap();
        let spec = WavSpec {
            bits_per_sample: 12,
            ..WavSpec::default()
        };
        let err = write_wav_stereo(file.path(), &test_signal(10), spec).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_info_without_samples() {
        let file = NamedTempFile::new().unwrap();
        write_wav_stereo(file.path(), &test_signal(4800), WavSpec::default()).unwrap();

        let info = read_wav_info(file.path()).unwrap();
        assert_eq!(info.channels, 2);
        assert_eq!(info.num_frames, 4800);
        assert_eq!(info.format, WavFormat::IeeeFloat);
        assert!((info.duration_secs - 0.1).abs() < 1e-9);
    }
}
