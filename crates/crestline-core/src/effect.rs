//! Stereo processor trait.
//!
//! [`Effect`] is the interface hosts drive: one [`StereoFrame`] in, one out,
//! or whole channel blocks in place. It is object-safe so hosts can hold a
//! `Box<dyn Effect>`; static dispatch is preferred in hot loops.
//!
//! Implementations must not allocate, lock or block inside
//! [`process`](Effect::process).

use crate::StereoFrame;

/// A stereo audio processor.
///
/// # Example
///
/// ```rust
/// use crestline_core::{Effect, StereoFrame};
///
/// struct Swap;
///
/// impl Effect for Swap {
///     fn process(&mut self, frame: StereoFrame) -> StereoFrame {
///         StereoFrame::new(frame.right, frame.left)
///     }
///
///     fn reset(&mut self) {}
/// }
///
/// let mut fx = Swap;
/// assert_eq!(fx.process(StereoFrame::new(1.0, 0.0)), StereoFrame::new(0.0, 1.0));
/// ```
pub trait Effect {
    /// Process one frame.
    fn process(&mut self, frame: StereoFrame) -> StereoFrame;

    /// Process two channel buffers in place.
    ///
    /// Default implementation calls [`process`](Self::process) per frame.
    /// Only the common prefix is processed if the lengths differ.
    fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(
            left.len(),
            right.len(),
            "Channel buffers must have same length"
        );
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let out = self.process(StereoFrame::new(*l, *r));
            *l = out.left;
            *r = out.right;
        }
    }

    /// Clear internal state (delay lines, envelopes, meters) without
    /// touching parameters.
    fn reset(&mut self);

    /// Delay introduced between input and output, in samples.
    fn latency_samples(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Gain(f32);

    impl Effect for Gain {
        fn process(&mut self, frame: StereoFrame) -> StereoFrame {
            frame.scaled(self.0)
        }
        fn reset(&mut self) {}
    }

    #[test]
    fn block_processes_in_place() {
        let mut fx = Gain(0.5);
        let mut left = [1.0, 2.0];
        let mut right = [4.0, 8.0];
        fx.process_block(&mut left, &mut right);
        assert_eq!(left, [0.5, 1.0]);
        assert_eq!(right, [2.0, 4.0]);
    }

    #[test]
    fn default_latency_is_zero() {
        assert_eq!(Gain(1.0).latency_samples(), 0);
    }
}
