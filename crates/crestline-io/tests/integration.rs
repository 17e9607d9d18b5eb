//! Integration tests for crestline-io WAV I/O and the offline engine.

use crestline_core::{StereoBuffer, db_to_linear};
use crestline_io::{
    Error, ProcessingEngine, WavFormat, WavSpec, read_wav_info, read_wav_stereo,
    write_wav_stereo,
};
use crestline_limiter::{Limiter, LimiterConfig};
use tempfile::{NamedTempFile, tempdir};

/// Stereo sine pair at the given sample rate.
fn sine_pair(sample_rate: u32, freq_hz: f32, amplitude: f32, num_frames: usize) -> StereoBuffer {
    let phase = |i: usize| 2.0 * std::f32::consts::PI * freq_hz * i as f32 / sample_rate as f32;
    let left = (0..num_frames).map(|i| phase(i).sin() * amplitude).collect();
    let right = (0..num_frames)
        .map(|i| phase(i).cos() * amplitude * 0.5)
        .collect();
    StereoBuffer::new(left, right)
}

// ---------------------------------------------------------------------------
// WAV roundtrips
// ---------------------------------------------------------------------------

#[test]
fn wav_roundtrip_f32_across_rates() {
    for sr in [44100, 48000, 96000] {
        let samples = sine_pair(sr, 440.0, 0.8, sr as usize / 10);
        let spec = WavSpec {
            sample_rate: sr,
            ..WavSpec::default()
        };

        let file = NamedTempFile::new().unwrap();
        write_wav_stereo(file.path(), &samples, spec).unwrap();

        let (loaded, loaded_spec) = read_wav_stereo(file.path()).unwrap();
        assert_eq!(loaded_spec.sample_rate, sr);
        assert_eq!(loaded, samples, "f32 roundtrip at {sr} Hz");
    }
}

#[test]
fn wav_roundtrip_24bit_precision() {
    let samples = sine_pair(48000, 1000.0, 0.9, 4800);
    let spec = WavSpec {
        bits_per_sample: 24,
        ..WavSpec::default()
    };

    let file = NamedTempFile::new().unwrap();
    write_wav_stereo(file.path(), &samples, spec).unwrap();

    let info = read_wav_info(file.path()).unwrap();
    assert_eq!(info.format, WavFormat::Pcm);
    assert_eq!(info.bits_per_sample, 24);

    let (loaded, _) = read_wav_stereo(file.path()).unwrap();
    for (a, b) in samples.frames().zip(loaded.frames()) {
        assert!((a.left - b.left).abs() < 1e-6);
        assert!((a.right - b.right).abs() < 1e-6);
    }
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let err = read_wav_stereo(dir.path().join("nope.wav")).unwrap_err();
    assert!(matches!(err, Error::Wav(_)), "{err}");
}

// ---------------------------------------------------------------------------
// File -> engine -> file
// ---------------------------------------------------------------------------

#[test]
fn limit_file_end_to_end() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("hot.wav");
    let output_path = dir.path().join("limited.wav");

    let hot = sine_pair(48000, 220.0, 1.0, 48000);
    write_wav_stereo(&input_path, &hot, WavSpec::default()).unwrap();

    let (input, spec) = read_wav_stereo(&input_path).unwrap();
    let mut engine = ProcessingEngine::new(spec.sample_rate as f32);
    let controls = engine.limiter_mut().controls_mut();
    controls.set_threshold_db(-6.0);
    controls.snap_to_targets();
    engine.set_compensate_latency(true);

    let (output, stats) = engine.process_buffer(&input);
    write_wav_stereo(&output_path, &output, spec).unwrap();

    let (reloaded, _) = read_wav_stereo(&output_path).unwrap();
    assert_eq!(reloaded.len(), hot.len());
    let ceiling = db_to_linear(-6.0) * 1.001;
    assert!(reloaded.peak().left <= ceiling);
    assert!(reloaded.peak().right <= ceiling);
    assert!(stats.input_peak_db() > -0.1);
    assert!(stats.output_peak_db() <= -5.99);
    assert!(stats.limited_ratio() > 0.9);
}

#[test]
fn bypassed_engine_is_transparent() {
    let mut engine = ProcessingEngine::new(48000.0);
    let controls = engine.limiter_mut().controls_mut();
    controls.set_threshold_db(-20.0);
    controls.set_bypass(true);
    controls.snap_to_targets();

    let input = sine_pair(48000, 440.0, 0.9, 4800);
    let (output, _) = engine.process_buffer(&input);
    assert_eq!(output, input);
}

#[test]
fn engine_with_custom_limiter_config() {
    let config = LimiterConfig {
        max_delay_s: 0.05,
        crossfade_samples: 256,
    };
    let limiter = Limiter::with_config(44100.0, config, 5.0);
    let mut engine = ProcessingEngine::with_limiter(limiter);
    engine.set_block_size(64);

    assert_eq!(engine.sample_rate(), 44100.0);
    assert_eq!(engine.latency_samples(), 440);
    assert!(engine.limiter().core().max_delay_samples() >= 2205);

    let (output, stats) = engine.process_buffer(&sine_pair(44100, 100.0, 0.5, 1000));
    assert_eq!(output.len(), 1000);
    assert_eq!(stats.max_attenuation_db, 0.0);
}

#[test]
fn reset_between_files() {
    let mut engine = ProcessingEngine::new(48000.0);
    let loud = StereoBuffer::from_mono(vec![1.0; 4800]);
    engine.process_buffer(&loud);
    engine.reset();

    let quiet = StereoBuffer::from_mono(vec![0.0; 4800]);
    let (output, stats) = engine.process_buffer(&quiet);
    assert!(output.frames().all(|f| f.peak() == 0.0));
    assert_eq!(stats.max_attenuation_db, 0.0);
}
