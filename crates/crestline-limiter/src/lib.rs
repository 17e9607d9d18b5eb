//! Crestline Limiter - stereo look-ahead peak limiting
//!
//! This crate assembles the crestline-core primitives into the limiter:
//!
//! - [`StereoLimiter`] - The per-sample core: detector, envelope, delay, meters
//! - [`LimiterParams`] / [`ParamProvider`] - Per-frame smoothed parameters and their source
//! - [`LimiterControls`] - User-facing controls that smooth into `LimiterParams`
//! - [`Limiter`] - Core plus controls behind the `Effect` and `ParameterInfo` traits
//!
//! ## Example
//!
//! ```rust
//! use crestline_core::StereoFrame;
//! use crestline_limiter::{LimiterControls, StereoLimiter};
//!
//! let mut limiter = StereoLimiter::new(48000.0);
//! let mut controls = LimiterControls::new(48000.0);
//! controls.set_threshold_db(-3.0);
//!
//! let out = limiter.process_with(&mut controls, StereoFrame::new(0.9, -0.4));
//! assert!(out.meters.attenuation_db <= 0.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod controls;
pub mod limiter;
pub mod params;
pub mod processor;

pub use controls::{DEFAULT_BYPASS_RAMP_MS, LimiterControls};
pub use limiter::{
    ATTENUATION_FLOOR_DB, DEFAULT_CROSSFADE_SAMPLES, DEFAULT_MAX_DELAY_S, DETECTOR_STAGES,
    LimiterConfig, LimiterOutput, Meters, SMOOTHER_STAGES, StereoLimiter, limiter_gain,
};
pub use params::{DESCRIPTORS, LimiterParams, PARAM_COUNT, ParamProvider};
pub use processor::Limiter;
