//! Crestline Core - DSP primitives for look-ahead peak limiting
//!
//! This crate holds the allocation-free building blocks the limiter is
//! assembled from. Every recursive element is a small state-holding struct
//! advanced once per sample.
//!
//! # Envelope Shaping
//!
//! - [`OnePoleSmoother`] - Exponential lowpass with separate attack/release coefficients
//! - [`SmootherCascade`] - N cutoff-corrected smoothers in series
//! - [`PeakHold`] - Timer/compare peak holder
//! - [`PeakHoldCascade`] - M peak holders in series for secondary-peak detection
//!
//! ## Delay Lines
//!
//! - [`DelayLine`] - Whole-sample circular buffer
//! - [`CrossfadeDelay`] - Variable-length delay that crossfades between two taps
//!
//! ## Parameters
//!
//! - [`SmoothedParam`] / [`LinearSmoothedParam`] - Host-side zipper-free smoothing
//! - [`ParameterInfo`] / [`ParamDescriptor`] - Index-based parameter metadata
//!
//! ## Processing
//!
//! - [`Effect`] - Object-safe stereo processor trait
//! - [`StereoFrame`] - One sample per channel
//! - [`StereoBuffer`] - Planar stereo audio for offline processing
//! - [`PeakMeter`] - Held output peak in dB
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build for embedded targets; the delay
//! lines then allocate through `alloc`.
//!
//! ```toml
//! [dependencies]
//! crestline-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use crestline_core::{PeakHoldCascade, SmootherCascade};
//!
//! let sample_rate = 48000.0;
//! let mut detector: PeakHoldCascade<8> = PeakHoldCascade::new(sample_rate);
//! let mut envelope: SmootherCascade<4> = SmootherCascade::new(sample_rate);
//! detector.set_window(0.06);
//! envelope.set_times(0.01, 0.15);
//!
//! let held = detector.process(0.9);
//! let smoothed = envelope.process(held);
//! assert!(smoothed > 0.0 && smoothed < 0.9);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod delay;
pub mod effect;
pub mod frame;
pub mod math;
pub mod meter;
pub mod param;
pub mod param_info;
pub mod peak_hold;
pub mod smoother;

pub use delay::{CrossfadeDelay, CrossfadeState, DelayLine, TapLengths};
pub use effect::Effect;
pub use frame::{StereoBuffer, StereoFrame};
pub use math::{
    LOOKAHEAD_GRID, db_to_linear, flush_denormal, linear_to_db, lookahead_samples,
    seconds_to_samples,
};
pub use meter::{PEAK_CEILING_DB, PEAK_FLOOR_DB, PeakMeter};
pub use param::{LinearSmoothedParam, STANDARD_SMOOTHING_MS, SmoothedParam};
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamUnit, ParameterInfo};
pub use peak_hold::{PeakHold, PeakHoldCascade};
pub use smoother::{
    OnePoleSmoother, SmootherCascade, SmootherCoeffs, cutoff_correction, smoothing_coeff,
};
