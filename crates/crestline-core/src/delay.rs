//! Delay lines for the limiter's look-ahead path.
//!
//! # Types
//!
//! - [`DelayLine`] - Heap-allocated circular buffer with integer-sample taps
//! - [`CrossfadeDelay`] - Variable-length delay that changes length by
//!   crossfading between two taps instead of jumping
//!
//! # Why two taps
//!
//! Jumping a read pointer from one length to another splices two unrelated
//! parts of the waveform together and clicks. Sweeping the pointer
//! (fractional delay modulation) avoids the click but pitch-shifts the audio
//! while it moves. [`CrossfadeDelay`] keeps both taps at fixed integer
//! lengths and fades the output from one to the other:
//!
//! ```text
//!            ┌──────── tap "lower" ────────┐
//! x ──► buf ─┤                             ├─► lower·(1 − line) + upper·line
//!            └──────── tap "upper" ────────┘
//! ```
//!
//! At rest the line sits on one boundary and the opposite ("parked") tap
//! follows the requested length. When the request differs from the active
//! tap, the line ramps to the parked tap over `interpolation_len` samples;
//! both taps stay frozen during the ramp.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Circular buffer delay line with whole-sample taps.
///
/// The buffer is allocated once at construction and never reallocates.
///
/// # Example
///
/// ```rust
/// use crestline_core::DelayLine;
///
/// let mut delay = DelayLine::new(16);
/// delay.write(1.0);
/// delay.write(0.0);
/// delay.write(0.0);
/// assert_eq!(delay.read(2), 1.0);
/// assert_eq!(delay.read(0), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// Creates a delay line holding `capacity` samples.
    ///
    /// The longest readable delay is `capacity - 1`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Delay size must be > 0");
        Self {
            buffer: vec![0.0; capacity],
            write_pos: 0,
        }
    }

    /// Creates a delay line able to delay by `max_seconds` at `sample_rate`.
    pub fn from_time(sample_rate: f32, max_seconds: f32) -> Self {
        let max_samples = libm::ceilf(sample_rate * max_seconds).max(0.0) as usize;
        Self::new(max_samples + 1)
    }

    /// Writes a sample and advances the write position.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Reads the sample written `delay` writes ago (0 = most recent).
    ///
    /// Delays beyond [`max_delay`](Self::max_delay) are clamped.
    #[inline]
    pub fn read(&self, delay: usize) -> f32 {
        let len = self.buffer.len();
        let delay = delay.min(len - 1);
        self.buffer[(self.write_pos + len - delay - 1) % len]
    }

    /// Longest delay this line can produce, in samples.
    #[inline]
    pub fn max_delay(&self) -> usize {
        self.buffer.len() - 1
    }

    /// Buffer size in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Zeroes the buffer and rewinds the write position.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

/// Where the crossfade line currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossfadeState {
    /// `line == 0`: output is the lower tap; the upper tap is parked.
    AtLower,
    /// `line == 1`: output is the upper tap; the lower tap is parked.
    AtUpper,
    /// Fading from the lower tap to the upper tap.
    RampingUp,
    /// Fading from the upper tap to the lower tap.
    RampingDown,
}

/// Lengths of the two crossfade taps, in samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapLengths {
    /// Tap heard fully at `line == 0`.
    pub lower: usize,
    /// Tap heard fully at `line == 1`.
    pub upper: usize,
}

/// Variable-length delay with click-free length changes.
///
/// Each call to [`process`](Self::process) writes one input sample, applies
/// at most one state transition and returns the crossfaded output.
///
/// # Invariants
///
/// - tap lengths never exceed [`max_delay`](Self::max_delay)
/// - `line` stays in `[0, 1]`
/// - a ramp only starts toward a tap that was just reassigned while parked
///
/// # Example
///
/// ```rust
/// use crestline_core::{CrossfadeDelay, CrossfadeState};
///
/// let mut delay = CrossfadeDelay::new(64, 4, 8);
/// delay.process(1.0, 8);
/// assert_eq!(delay.state(), CrossfadeState::AtLower);
///
/// // request a new length: the line starts moving toward the parked tap
/// delay.process(0.0, 16);
/// assert_eq!(delay.state(), CrossfadeState::RampingUp);
/// ```
#[derive(Debug, Clone)]
pub struct CrossfadeDelay {
    line: DelayLine,
    state: CrossfadeState,
    taps: TapLengths,
    /// Ramp progress in samples, `0..=interpolation_len`.
    ramp: u32,
    interpolation_len: u32,
}

impl CrossfadeDelay {
    /// Creates a crossfading delay.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Buffer size in samples (longest delay is `capacity - 1`)
    /// * `interpolation_len` - Crossfade duration in samples
    /// * `initial_delay` - Length both taps start at (clamped to capacity)
    ///
    /// # Panics
    ///
    /// Panics if `capacity` or `interpolation_len` is 0.
    pub fn new(capacity: usize, interpolation_len: u32, initial_delay: usize) -> Self {
        assert!(interpolation_len > 0, "Crossfade length must be > 0");
        let line = DelayLine::new(capacity);
        let initial = initial_delay.min(line.max_delay());
        #[cfg(feature = "tracing")]
        if initial != initial_delay {
            tracing::debug!(
                requested = initial_delay,
                capacity,
                "initial delay clamped to buffer capacity"
            );
        }
        Self {
            line,
            state: CrossfadeState::AtLower,
            taps: TapLengths {
                lower: initial,
                upper: initial,
            },
            ramp: 0,
            interpolation_len,
        }
    }

    /// Writes `input`, tracks `requested_delay` and returns the delayed sample.
    #[inline]
    pub fn process(&mut self, input: f32, requested_delay: usize) -> f32 {
        let requested = requested_delay.min(self.line.max_delay());
        self.line.write(input);

        match self.state {
            CrossfadeState::AtLower => {
                self.taps.upper = requested;
                if requested != self.taps.lower {
                    self.state = CrossfadeState::RampingUp;
                }
            }
            CrossfadeState::AtUpper => {
                self.taps.lower = requested;
                if requested != self.taps.upper {
                    self.state = CrossfadeState::RampingDown;
                }
            }
            CrossfadeState::RampingUp | CrossfadeState::RampingDown => {}
        }

        match self.state {
            CrossfadeState::RampingUp => {
                self.ramp += 1;
                if self.ramp >= self.interpolation_len {
                    self.ramp = self.interpolation_len;
                    self.state = CrossfadeState::AtUpper;
                }
            }
            CrossfadeState::RampingDown => {
                self.ramp -= 1;
                if self.ramp == 0 {
                    self.state = CrossfadeState::AtLower;
                }
            }
            CrossfadeState::AtLower | CrossfadeState::AtUpper => {}
        }

        let line = self.position();
        let lower = self.line.read(self.taps.lower);
        let upper = self.line.read(self.taps.upper);
        lower * (1.0 - line) + upper * line
    }

    /// Crossfade position in `[0, 1]`.
    #[inline]
    pub fn position(&self) -> f32 {
        self.ramp as f32 / self.interpolation_len as f32
    }

    /// Current state of the crossfade state machine.
    #[inline]
    pub fn state(&self) -> CrossfadeState {
        self.state
    }

    /// Current tap lengths.
    #[inline]
    pub fn taps(&self) -> TapLengths {
        self.taps
    }

    /// Delay currently heard at the output, blended across taps.
    pub fn effective_delay(&self) -> f32 {
        let line = self.position();
        self.taps.lower as f32 * (1.0 - line) + self.taps.upper as f32 * line
    }

    /// Whether the line rests on a boundary.
    pub fn is_settled(&self) -> bool {
        matches!(self.state, CrossfadeState::AtLower | CrossfadeState::AtUpper)
    }

    /// Crossfade duration in samples.
    pub fn interpolation_len(&self) -> u32 {
        self.interpolation_len
    }

    /// Longest delay this line can produce, in samples.
    pub fn max_delay(&self) -> usize {
        self.line.max_delay()
    }

    /// Parks both taps on `delay` immediately, abandoning any ramp.
    ///
    /// The buffer is kept; only use this where a discontinuity is harmless,
    /// such as before the first sample.
    pub fn jump_to(&mut self, delay: usize) {
        let delay = delay.min(self.line.max_delay());
        self.taps = TapLengths {
            lower: delay,
            upper: delay,
        };
        self.ramp = 0;
        self.state = CrossfadeState::AtLower;
    }

    /// Clears the audio buffer and parks on the delay currently heard.
    pub fn reset(&mut self) {
        let active = if self.ramp * 2 >= self.interpolation_len {
            self.taps.upper
        } else {
            self.taps.lower
        };
        self.line.clear();
        self.taps = TapLengths {
            lower: active,
            upper: active,
        };
        self.ramp = 0;
        self.state = CrossfadeState::AtLower;
    }
}
