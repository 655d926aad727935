//! Parameter introspection for discoverable effect parameters.
//!
//! [`ParameterInfo`] lets hosts, UIs, and preset systems discover and
//! manipulate an effect's parameters at runtime without compile-time
//! knowledge of the concrete type. Each parameter is described by a
//! [`ParamDescriptor`] carrying display metadata, the valid range, the
//! default value, and two stable identifiers:
//!
//! - [`ParamId`] — numeric ID for host automation and preset persistence
//! - `string_id` — human-readable stable key for serialization and debugging
//!
//! Parameters are addressed by zero-based index; indices must stay stable
//! for the lifetime of the effect instance.

/// Stable parameter identifier that survives reordering.
///
/// Used by hosts for automation recording and preset save/restore. Once
/// assigned, a `ParamId` must never change for a given parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Samples - for delay times and offsets denominated in samples.
    Samples,
    /// Milliseconds (ms) - for time parameters.
    Milliseconds,
    /// Percentage (%) - for mix and normalized parameters.
    Percent,
    /// No unit - for dimensionless or custom parameters.
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Samples => " smp",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Percent => "%",
            ParamUnit::None => "",
        }
    }
}

/// Describes a single parameter's metadata for display and validation.
///
/// The `short_name` field should be 8 characters or less for compatibility
/// with hardware displays. `step` is the recommended increment for
/// encoder-based control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Delay Time").
    pub name: &'static str,
    /// Short name for hardware displays, max 8 characters.
    pub short_name: &'static str,
    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,
    /// Minimum allowed value for this parameter.
    pub min: f32,
    /// Maximum allowed value for this parameter.
    pub max: f32,
    /// Default value when the effect is initialized or reset.
    pub default: f32,
    /// Recommended step increment for encoder-based control.
    pub step: f32,
    /// Stable numeric ID for host automation and preset persistence.
    pub id: ParamId,
    /// Human-readable stable ID for presets and serialization.
    pub string_id: &'static str,
}

impl ParamDescriptor {
    /// Time parameter denominated in samples.
    pub const fn samples(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Samples,
            min,
            max,
            default,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
        }
    }

    /// Dimensionless parameter (gain fractions, feedback, mix).
    pub const fn ratio(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min,
            max,
            default,
            step: 0.01,
            id: ParamId(0),
            string_id: "",
        }
    }

    /// On/off parameter encoded as 0.0 / 1.0.
    pub const fn toggle(name: &'static str, short_name: &'static str, default: f32) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min: 0.0,
            max: 1.0,
            default,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
        }
    }

    /// Sets the stable parameter ID and string ID.
    ///
    /// Builder pattern — call after a factory method or struct literal.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Clamps a value to this parameter's valid range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Converts a plain value to normalized range (0.0 to 1.0).
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        (value - self.min) / range
    }

    /// Converts a normalized value (0.0 to 1.0) to the actual range.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.min + normalized * (self.max - self.min)
    }
}

/// Trait for effects that expose introspectable parameters.
///
/// Implementations should clamp written values to the descriptor range and
/// ignore out-of-bounds indices rather than panic.
pub trait ParameterInfo {
    /// Returns the number of parameters this effect exposes.
    ///
    /// Valid parameter indices are `0..param_count()`.
    fn param_count(&self) -> usize;

    /// Returns the descriptor for the parameter at the given index.
    ///
    /// Returns `None` if `index >= param_count()`.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Gets the current value of the parameter at the given index.
    ///
    /// Returns `0.0` for out-of-bounds indices.
    fn get_param(&self, index: usize) -> f32;

    /// Sets the value of the parameter at the given index.
    ///
    /// Values are clamped to the descriptor range; out-of-bounds indices
    /// are ignored.
    fn set_param(&mut self, index: usize, value: f32);

    /// Returns the stable [`ParamId`] for the parameter at the given index.
    fn param_id(&self, index: usize) -> Option<ParamId> {
        self.param_info(index).map(|d| d.id)
    }

    /// Finds a parameter index by its stable string ID.
    ///
    /// Scans all parameters (O(n)) — suitable for setup paths, not audio.
    fn param_index_by_string_id(&self, string_id: &str) -> Option<usize> {
        (0..self.param_count())
            .find(|&i| self.param_info(i).is_some_and(|d| d.string_id == string_id))
    }
}
