//! Parameter introspection for the limiter's user-facing controls.
//!
//! [`ParameterInfo`] exposes parameters by index with a [`ParamDescriptor`]
//! per parameter. The CLI lists them, the preset layer validates against
//! them, and host-side controls clamp through them.
//!
//! # Example
//!
//! ```rust
//! use crestline_core::{ParameterInfo, ParamDescriptor, ParamId};
//!
//! struct Trim {
//!     gain_db: f32,
//! }
//!
//! impl ParameterInfo for Trim {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::gain_db("Trim", "Trim", -24.0, 24.0, 0.0)
//!                 .with_id(ParamId(1), "trim_gain")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         if index == 0 { self.gain_db } else { 0.0 }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if index == 0 {
//!             self.gain_db = value.clamp(-24.0, 24.0);
//!         }
//!     }
//! }
//!
//! let trim = Trim { gain_db: 3.0 };
//! assert_eq!(trim.find_param_by_name("trim"), Some(0));
//! ```

/// Stable numeric parameter identifier.
///
/// Survives reordering of the parameter table; presets and automation key
/// on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Capability flags for a parameter.
///
/// ```rust
/// use crestline_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::STEPPED));
/// assert!(!ParamFlags::AUTOMATABLE.contains(ParamFlags::STEPPED));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// Can be changed while audio runs.
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Takes discrete values (toggles).
    pub const STEPPED: Self = Self(1 << 1);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Unit a parameter value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Decibels: threshold, pre-gain, meter readings.
    Decibels,
    /// Milliseconds: attack, hold, release.
    Milliseconds,
    /// Off/on switch stored as 0.0 / 1.0.
    Toggle,
}

impl ParamUnit {
    /// Display suffix, empty for toggles.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Decibels => "dB",
            Self::Milliseconds => "ms",
            Self::Toggle => "",
        }
    }
}

/// Metadata for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Display name, e.g. "Threshold".
    pub name: &'static str,
    /// Abbreviation of at most 8 characters.
    pub short_name: &'static str,
    /// Unit of `min`, `max`, `default` and the live value.
    pub unit: ParamUnit,
    /// Lowest accepted value.
    pub min: f32,
    /// Highest accepted value.
    pub max: f32,
    /// Value at construction.
    pub default: f32,
    /// Suggested increment for stepping controls.
    pub step: f32,
    /// Stable numeric ID. `ParamId(0)` means unassigned.
    pub id: ParamId,
    /// Stable key used in preset files, e.g. `"threshold_db"`.
    pub string_id: &'static str,
    /// Capability flags.
    pub flags: ParamFlags,
}

impl ParamDescriptor {
    /// Level parameter in decibels with a 0.5 dB step.
    pub const fn gain_db(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Decibels,
            min,
            max,
            default,
            step: 0.5,
            id: ParamId(0),
            string_id: "",
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// Time parameter in milliseconds with a 1 ms step.
    pub const fn time_ms(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Milliseconds,
            min,
            max,
            default,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// On/off switch stored as 0.0 / 1.0.
    pub const fn toggle(name: &'static str, short_name: &'static str, default_on: bool) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Toggle,
            min: 0.0,
            max: 1.0,
            default: if default_on { 1.0 } else { 0.0 },
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
        }
    }

    /// Assign the stable IDs.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Clamp `value` into `[min, max]`. Toggles snap to 0 or 1.
    ///
    /// ```rust
    /// use crestline_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::gain_db("Threshold", "Thresh", -60.0, 0.0, -1.0);
    /// assert_eq!(desc.clamp(-100.0), -60.0);
    /// assert_eq!(desc.clamp(3.0), 0.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        let clamped = if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        };
        if self.flags.contains(ParamFlags::STEPPED) {
            libm::roundf(clamped)
        } else {
            clamped
        }
    }

    /// Whether `value` is finite and inside `[min, max]`.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

/// Index-addressed parameter access.
///
/// Indices are stable for the lifetime of an instance. Implementations clamp
/// in [`set_param`](Self::set_param) and ignore out-of-range indices.
pub trait ParameterInfo {
    /// Number of parameters; valid indices are `0..param_count()`.
    fn param_count(&self) -> usize;

    /// Descriptor at `index`, `None` when out of range.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current (target) value at `index`, `0.0` when out of range.
    fn get_param(&self, index: usize) -> f32;

    /// Set the value at `index`, clamped to the descriptor's range.
    fn set_param(&mut self, index: usize, value: f32);

    /// Index of the parameter whose name, short name or string ID matches
    /// `name` case-insensitively.
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|desc| {
                desc.name.eq_ignore_ascii_case(name)
                    || desc.short_name.eq_ignore_ascii_case(name)
                    || desc.string_id.eq_ignore_ascii_case(name)
            })
        })
    }

    /// Stable ID of the parameter at `index`.
    fn param_id(&self, index: usize) -> Option<ParamId> {
        self.param_info(index).map(|d| d.id)
    }

    /// Index of the parameter with stable ID `id`.
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }
}
