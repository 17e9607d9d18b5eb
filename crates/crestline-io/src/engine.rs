//! Offline limiter processing engine.

use crestline_core::{Effect, StereoBuffer, StereoFrame, linear_to_db};
use crestline_limiter::Limiter;

/// Frames processed between progress callbacks.
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Summary of one offline run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessingStats {
    /// Frames written to the output.
    pub frames: usize,
    /// Per-channel input peak (linear).
    pub input_peak: StereoFrame,
    /// Per-channel output peak (linear).
    pub output_peak: StereoFrame,
    /// Deepest gain reduction seen, in dB (`<= 0`).
    pub max_attenuation_db: f32,
    /// Frames processed with any gain reduction.
    pub limited_frames: usize,
    /// Look-ahead latency removed from the output, in frames.
    pub latency_compensated: usize,
}

impl ProcessingStats {
    fn new() -> Self {
        Self {
            frames: 0,
            input_peak: StereoFrame::SILENCE,
            output_peak: StereoFrame::SILENCE,
            max_attenuation_db: 0.0,
            limited_frames: 0,
            latency_compensated: 0,
        }
    }

    /// Louder of the two output channel peaks, in dB.
    pub fn output_peak_db(&self) -> f32 {
        peak_db(self.output_peak)
    }

    /// Louder of the two input channel peaks, in dB.
    pub fn input_peak_db(&self) -> f32 {
        peak_db(self.input_peak)
    }

    /// Share of frames that were attenuated, `[0, 1]`.
    pub fn limited_ratio(&self) -> f32 {
        if self.frames == 0 {
            0.0
        } else {
            self.limited_frames as f32 / self.frames as f32
        }
    }

    fn track_input(&mut self, frame: StereoFrame) {
        self.input_peak = max_abs(self.input_peak, frame);
    }

    fn track_output(&mut self, frame: StereoFrame, attenuation_db: f32) {
        self.frames += 1;
        self.output_peak = max_abs(self.output_peak, frame);
        self.max_attenuation_db = self.max_attenuation_db.min(attenuation_db);
        if attenuation_db < 0.0 {
            self.limited_frames += 1;
        }
    }
}

fn max_abs(acc: StereoFrame, frame: StereoFrame) -> StereoFrame {
    StereoFrame::new(
        acc.left.max(frame.left.abs()),
        acc.right.max(frame.right.abs()),
    )
}

fn peak_db(frame: StereoFrame) -> f32 {
    linear_to_db(frame.peak())
}

/// Runs a [`Limiter`] over whole buffers.
///
/// The limiter's controls smooth toward their targets as the buffer plays,
/// exactly as they would in a live host. Call
/// [`LimiterControls::snap_to_targets`](crestline_limiter::LimiterControls::snap_to_targets)
/// through [`limiter_mut`](Self::limiter_mut) to start from the configured
/// settings instead.
///
/// # Example
///
/// ```rust
/// use crestline_io::{ProcessingEngine, StereoBuffer};
///
/// let mut engine = ProcessingEngine::new(48000.0);
/// engine.limiter_mut().controls_mut().set_threshold_db(-6.0);
/// engine.limiter_mut().controls_mut().snap_to_targets();
/// engine.set_compensate_latency(true);
///
/// let input = StereoBuffer::from_mono(vec![1.0; 9600]);
/// let (output, stats) = engine.process_buffer(&input);
/// assert_eq!(output.len(), input.len());
/// assert!(stats.max_attenuation_db < -5.9);
/// ```
#[derive(Debug, Clone)]
pub struct ProcessingEngine {
    limiter: Limiter,
    block_size: usize,
    compensate_latency: bool,
}

impl ProcessingEngine {
    /// Engine around a default limiter.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_limiter(Limiter::new(sample_rate))
    }

    /// Engine around an already configured limiter.
    pub fn with_limiter(limiter: Limiter) -> Self {
        Self {
            limiter,
            block_size: DEFAULT_BLOCK_SIZE,
            compensate_latency: false,
        }
    }

    /// Sample rate of the wrapped limiter.
    pub fn sample_rate(&self) -> f32 {
        self.limiter.sample_rate()
    }

    /// The wrapped limiter.
    pub fn limiter(&self) -> &Limiter {
        &self.limiter
    }

    /// Mutable access to the wrapped limiter.
    pub fn limiter_mut(&mut self) -> &mut Limiter {
        &mut self.limiter
    }

    /// Frames per progress block.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Set frames per progress block (minimum 1).
    pub fn set_block_size(&mut self, block_size: usize) {
        self.block_size = block_size.max(1);
    }

    /// When enabled, the look-ahead delay is removed so output lines up
    /// with input: the buffer is flushed with silence and the leading
    /// latency frames are dropped.
    ///
    /// A bypassed limiter passes its input through undelayed, so nothing is
    /// removed while bypass is engaged.
    pub fn set_compensate_latency(&mut self, enabled: bool) {
        self.compensate_latency = enabled;
    }

    /// Whether latency compensation is enabled.
    pub fn compensates_latency(&self) -> bool {
        self.compensate_latency
    }

    /// Current look-ahead latency in frames.
    pub fn latency_samples(&self) -> usize {
        self.limiter.latency_samples()
    }

    /// Frames that will be dropped from the start of the next buffer.
    pub fn compensation_samples(&self) -> usize {
        if self.compensate_latency && !self.limiter.controls().is_bypassed() {
            self.latency_samples()
        } else {
            0
        }
    }

    /// Clear the limiter's signal state and meters.
    pub fn reset(&mut self) {
        self.limiter.reset();
    }

    /// Process a whole buffer.
    ///
    /// Returns new samples with the same length as `input`.
    pub fn process_buffer(&mut self, input: &StereoBuffer) -> (StereoBuffer, ProcessingStats) {
        self.process_buffer_with_progress(input, |_, _| {})
    }

    /// Process a whole buffer, calling `progress(done, total)` after each
    /// block.
    pub fn process_buffer_with_progress<F>(
        &mut self,
        input: &StereoBuffer,
        mut progress: F,
    ) -> (StereoBuffer, ProcessingStats)
    where
        F: FnMut(usize, usize),
    {
        let total = input.len();
        let skip = self.compensation_samples();

        let mut stats = ProcessingStats::new();
        stats.latency_compensated = skip;
        let mut output = StereoBuffer::with_capacity(total);
        let mut produced = 0usize;

        tracing::debug!(
            frames = total,
            block_size = self.block_size,
            latency = skip,
            "processing buffer"
        );

        // input frames, then `skip` frames of silence to flush the delay
        let padded = input
            .frames()
            .chain(core::iter::repeat_n(StereoFrame::SILENCE, skip));
        let mut frames = padded.peekable();
        while frames.peek().is_some() {
            for frame in frames.by_ref().take(self.block_size) {
                stats.track_input(frame);
                let out = self.limiter.process_frame(frame);
                if produced >= skip {
                    output.push(out.audio);
                    stats.track_output(out.audio, out.meters.attenuation_db);
                }
                produced += 1;
            }
            progress(output.len(), total);
        }

        tracing::debug!(
            max_attenuation_db = stats.max_attenuation_db,
            limited_frames = stats.limited_frames,
            "buffer processed"
        );

        (output, stats)
    }
}
