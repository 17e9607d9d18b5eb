//! Stereo sample frame and planar stereo buffer.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;

/// One sample per channel at a single instant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StereoFrame {
    /// Left channel sample.
    pub left: f32,
    /// Right channel sample.
    pub right: f32,
}

impl StereoFrame {
    /// Digital silence.
    pub const SILENCE: Self = Self {
        left: 0.0,
        right: 0.0,
    };

    /// Frame from two channel samples.
    #[inline]
    pub const fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// Same sample on both channels.
    #[inline]
    pub const fn mono(sample: f32) -> Self {
        Self {
            left: sample,
            right: sample,
        }
    }

    /// Both channels multiplied by `gain`.
    #[inline]
    #[must_use]
    pub fn scaled(self, gain: f32) -> Self {
        Self {
            left: self.left * gain,
            right: self.right * gain,
        }
    }

    /// Largest absolute sample across the two channels.
    ///
    /// This is the stereo-linked detector input.
    ///
    /// ```rust
    /// use crestline_core::StereoFrame;
    ///
    /// assert_eq!(StereoFrame::new(0.25, -0.75).peak(), 0.75);
    /// ```
    #[inline]
    pub fn peak(self) -> f32 {
        self.left.abs().max(self.right.abs())
    }
}

impl From<(f32, f32)> for StereoFrame {
    fn from((left, right): (f32, f32)) -> Self {
        Self { left, right }
    }
}

/// Planar stereo audio: one `Vec` per channel, equal lengths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoBuffer {
    /// Left channel samples.
    pub left: Vec<f32>,
    /// Right channel samples.
    pub right: Vec<f32>,
}

impl StereoBuffer {
    /// Buffer from two channels of equal length.
    ///
    /// # Panics
    ///
    /// Panics if the channel lengths differ.
    pub fn new(left: Vec<f32>, right: Vec<f32>) -> Self {
        assert_eq!(left.len(), right.len(), "Channels must have same length");
        Self { left, right }
    }

    /// Empty buffer with room for `frames` frames per channel.
    pub fn with_capacity(frames: usize) -> Self {
        Self {
            left: Vec::with_capacity(frames),
            right: Vec::with_capacity(frames),
        }
    }

    /// Mono signal copied to both channels.
    pub fn from_mono(mono: Vec<f32>) -> Self {
        Self {
            left: mono.clone(),
            right: mono,
        }
    }

    /// Deinterleave `L, R, L, R, ...`; a trailing odd sample is dropped.
    pub fn from_interleaved(interleaved: &[f32]) -> Self {
        interleaved
            .chunks_exact(2)
            .map(|pair| StereoFrame::new(pair[0], pair[1]))
            .collect()
    }

    /// Frames per channel.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// True when the buffer holds no frames.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Frame at `index`, if in range.
    pub fn frame(&self, index: usize) -> Option<StereoFrame> {
        Some(StereoFrame::new(
            *self.left.get(index)?,
            *self.right.get(index)?,
        ))
    }

    /// Append one frame.
    pub fn push(&mut self, frame: StereoFrame) {
        self.left.push(frame.left);
        self.right.push(frame.right);
    }

    /// Iterate over frames.
    pub fn frames(&self) -> impl Iterator<Item = StereoFrame> + '_ {
        self.left
            .iter()
            .zip(&self.right)
            .map(|(&l, &r)| StereoFrame::new(l, r))
    }

    /// Interleave to `L, R, L, R, ...`.
    pub fn to_interleaved(&self) -> Vec<f32> {
        self.frames().flat_map(|f| [f.left, f.right]).collect()
    }

    /// Largest absolute sample per channel as a frame.
    pub fn peak(&self) -> StereoFrame {
        self.frames().fold(StereoFrame::SILENCE, |acc, f| {
            StereoFrame::new(acc.left.max(f.left.abs()), acc.right.max(f.right.abs()))
        })
    }
}

impl FromIterator<StereoFrame> for StereoBuffer {
    fn from_iter<I: IntoIterator<Item = StereoFrame>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut buffer = Self::with_capacity(iter.size_hint().0);
        for frame in iter {
            buffer.push(frame);
        }
        buffer
    }
}
