//! Lock-free parameter store bridging the control and audio contexts.
//!
//! [`ParamStore`] holds every user-facing parameter as an independent
//! atomic scalar: floats as `AtomicU32` bit-casts, bypass as an
//! `AtomicBool`. The control thread writes through the setters (or the
//! keyed [`set_named`](ParamStore::set_named) path); the audio thread
//! calls [`snapshot`](ParamStore::snapshot) once per block and never
//! blocks.
//!
//! Updates are last-writer-wins per field. There is deliberately no
//! cross-field atomicity: every parameter is an independently meaningful
//! scalar, so observing a half-updated combination across one block
//! boundary is accepted behavior, not a bug.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use rebote_core::{ParamDescriptor, ParamId, ParameterInfo};

/// Parameter indices, matching [`DESCRIPTORS`] and the host surface.
pub mod index {
    /// Delay time in samples.
    pub const DELAY_TIME: usize = 0;
    /// Feedback amount.
    pub const FEEDBACK: usize = 1;
    /// Output gain.
    pub const GAIN: usize = 2;
    /// Wet/dry mix.
    pub const MIX: usize = 3;
    /// Left channel delay offset in samples.
    pub const OFFSET_L: usize = 4;
    /// Right channel delay offset in samples.
    pub const OFFSET_R: usize = 5;
    /// Bypass toggle.
    pub const BYPASS: usize = 6;
}

/// Descriptors for the full parameter surface.
///
/// Ranges and defaults are host-enforced; the store clamps writes to the
/// same ranges as a second line of validation.
pub const DESCRIPTORS: [ParamDescriptor; 7] = [
    ParamDescriptor::samples("Delay Time", "Time", 10.0, 5000.0, 1000.0)
        .with_id(ParamId(100), "delayTime"),
    ParamDescriptor::ratio("Feedback", "Fdbk", 0.0, 0.99, 0.3).with_id(ParamId(101), "feedback"),
    ParamDescriptor::ratio("Gain", "Gain", 0.0, 1.0, 0.0).with_id(ParamId(102), "gain"),
    ParamDescriptor::ratio("Mix", "Mix", 0.0, 1.0, 0.0).with_id(ParamId(103), "mix"),
    ParamDescriptor::samples("Offset L", "OffL", 0.0, 1000.0, 0.0)
        .with_id(ParamId(104), "offsetL"),
    ParamDescriptor::samples("Offset R", "OffR", 0.0, 1000.0, 0.0)
        .with_id(ParamId(105), "offsetR"),
    ParamDescriptor::toggle("Bypass", "Byp", 0.0).with_id(ParamId(106), "bypass"),
];

/// Plain-value view of the parameter surface, read once per block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    /// Delay time in samples.
    pub delay_time: f32,
    /// Feedback gain in `[0, 0.99]`.
    pub feedback: f32,
    /// Output gain in `[0, 1]`.
    pub gain: f32,
    /// Wet fraction in `[0, 1]`.
    pub mix: f32,
    /// Extra delay on the left tap, in samples.
    pub offset_l: f32,
    /// Extra delay on the right tap, in samples.
    pub offset_r: f32,
    /// Whether the bypass gate should mute the block.
    pub bypass: bool,
}

/// Wait-free parameter store shared between the control and audio threads.
///
/// Single writer per field from the control context, single reader from
/// the audio context. No lock is ever held; every access is one atomic
/// load or store.
#[derive(Debug)]
pub struct ParamStore {
    delay_time: AtomicU32,
    feedback: AtomicU32,
    gain: AtomicU32,
    mix: AtomicU32,
    offset_l: AtomicU32,
    offset_r: AtomicU32,
    bypass: AtomicBool,
}

impl ParamStore {
    /// Creates a store with every parameter at its descriptor default.
    pub fn new() -> Self {
        Self {
            delay_time: AtomicU32::new(DESCRIPTORS[index::DELAY_TIME].default.to_bits()),
            feedback: AtomicU32::new(DESCRIPTORS[index::FEEDBACK].default.to_bits()),
            gain: AtomicU32::new(DESCRIPTORS[index::GAIN].default.to_bits()),
            mix: AtomicU32::new(DESCRIPTORS[index::MIX].default.to_bits()),
            offset_l: AtomicU32::new(DESCRIPTORS[index::OFFSET_L].default.to_bits()),
            offset_r: AtomicU32::new(DESCRIPTORS[index::OFFSET_R].default.to_bits()),
            bypass: AtomicBool::new(false),
        }
    }

    /// Restores every parameter to its descriptor default.
    pub fn reset_to_defaults(&self) {
        self.store(&self.delay_time, DESCRIPTORS[index::DELAY_TIME].default);
        self.store(&self.feedback, DESCRIPTORS[index::FEEDBACK].default);
        self.store(&self.gain, DESCRIPTORS[index::GAIN].default);
        self.store(&self.mix, DESCRIPTORS[index::MIX].default);
        self.store(&self.offset_l, DESCRIPTORS[index::OFFSET_L].default);
        self.store(&self.offset_r, DESCRIPTORS[index::OFFSET_R].default);
        self.bypass.store(false, Ordering::Release);
    }

    #[inline]
    fn store(&self, field: &AtomicU32, value: f32) {
        field.store(value.to_bits(), Ordering::Release);
    }

    #[inline]
    fn load(&self, field: &AtomicU32) -> f32 {
        f32::from_bits(field.load(Ordering::Acquire))
    }

    // -- Typed setters (control context) --

    /// Set the delay time in samples (clamped to \[10, 5000\]).
    pub fn set_delay_time(&self, samples: f32) {
        self.store(
            &self.delay_time,
            DESCRIPTORS[index::DELAY_TIME].clamp(samples),
        );
    }

    /// Set the feedback amount (clamped to \[0, 0.99\]).
    pub fn set_feedback(&self, feedback: f32) {
        self.store(&self.feedback, DESCRIPTORS[index::FEEDBACK].clamp(feedback));
    }

    /// Set the output gain (clamped to \[0, 1\]).
    pub fn set_gain(&self, gain: f32) {
        self.store(&self.gain, DESCRIPTORS[index::GAIN].clamp(gain));
    }

    /// Set the wet/dry mix (clamped to \[0, 1\]).
    pub fn set_mix(&self, mix: f32) {
        self.store(&self.mix, DESCRIPTORS[index::MIX].clamp(mix));
    }

    /// Set the left tap offset in samples (clamped to \[0, 1000\]).
    pub fn set_offset_l(&self, samples: f32) {
        self.store(&self.offset_l, DESCRIPTORS[index::OFFSET_L].clamp(samples));
    }

    /// Set the right tap offset in samples (clamped to \[0, 1000\]).
    pub fn set_offset_r(&self, samples: f32) {
        self.store(&self.offset_r, DESCRIPTORS[index::OFFSET_R].clamp(samples));
    }

    /// Set the bypass flag.
    pub fn set_bypass(&self, bypassed: bool) {
        self.bypass.store(bypassed, Ordering::Release);
    }

    // -- Typed getters --

    /// Delay time in samples.
    pub fn delay_time(&self) -> f32 {
        self.load(&self.delay_time)
    }

    /// Feedback amount.
    pub fn feedback(&self) -> f32 {
        self.load(&self.feedback)
    }

    /// Output gain.
    pub fn gain(&self) -> f32 {
        self.load(&self.gain)
    }

    /// Wet/dry mix.
    pub fn mix(&self) -> f32 {
        self.load(&self.mix)
    }

    /// Left tap offset in samples.
    pub fn offset_l(&self) -> f32 {
        self.load(&self.offset_l)
    }

    /// Right tap offset in samples.
    pub fn offset_r(&self) -> f32 {
        self.load(&self.offset_r)
    }

    /// Bypass flag.
    pub fn bypass(&self) -> bool {
        self.bypass.load(Ordering::Acquire)
    }

    /// Applies a control update addressed by stable string ID.
    ///
    /// This is the single routing point for keyed parameter changes
    /// (host automation, state restore). Unknown IDs are ignored.
    /// Bypass treats values >= 0.5 as on.
    ///
    /// KNOWN QUIRK: `"offsetR"` currently updates the LEFT offset and
    /// leaves the right offset untouched, matching the shipped control
    /// mapping. Sessions and automation recorded against that routing
    /// depend on it.
    // TODO: confirm with product whether offsetR should target the right
    // offset before changing this routing.
    pub fn set_named(&self, string_id: &str, value: f32) {
        match string_id {
            "delayTime" => self.set_delay_time(value),
            "feedback" => self.set_feedback(value),
            "gain" => self.set_gain(value),
            "mix" => self.set_mix(value),
            "offsetL" => self.set_offset_l(value),
            "offsetR" => self.set_offset_l(value),
            "bypass" => self.set_bypass(value >= 0.5),
            _ => {}
        }
    }

    /// Reads every field once, producing the per-block snapshot.
    ///
    /// Fields are loaded independently; a concurrent control write may
    /// land between loads and only be visible for part of the snapshot.
    #[inline]
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            delay_time: self.delay_time(),
            feedback: self.feedback(),
            gain: self.gain(),
            mix: self.mix(),
            offset_l: self.offset_l(),
            offset_r: self.offset_r(),
            bypass: self.bypass(),
        }
    }
}

impl Default for ParamStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterInfo for ParamStore {
    fn param_count(&self) -> usize {
        DESCRIPTORS.len()
    }

    fn param_info(&self, idx: usize) -> Option<ParamDescriptor> {
        DESCRIPTORS.get(idx).copied()
    }

    fn get_param(&self, idx: usize) -> f32 {
        match idx {
            index::DELAY_TIME => self.delay_time(),
            index::FEEDBACK => self.feedback(),
            index::GAIN => self.gain(),
            index::MIX => self.mix(),
            index::OFFSET_L => self.offset_l(),
            index::OFFSET_R => self.offset_r(),
            index::BYPASS => {
                if self.bypass() {
                    1.0
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }

    fn set_param(&mut self, idx: usize, value: f32) {
        // Route through the keyed path so index-based and keyed writes
        // behave identically, quirk included.
        if let Some(desc) = DESCRIPTORS.get(idx) {
            self.set_named(desc.string_id, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_descriptors() {
        let store = ParamStore::new();
        let snap = store.snapshot();
        assert_eq!(snap.delay_time, 1000.0);
        assert_eq!(snap.feedback, 0.3);
        assert_eq!(snap.gain, 0.0);
        assert_eq!(snap.mix, 0.0);
        assert_eq!(snap.offset_l, 0.0);
        assert_eq!(snap.offset_r, 0.0);
        assert!(!snap.bypass);
    }

    #[test]
    fn setters_clamp_to_range() {
        let store = ParamStore::new();
        store.set_delay_time(1.0);
        assert_eq!(store.delay_time(), 10.0);
        store.set_delay_time(99999.0);
        assert_eq!(store.delay_time(), 5000.0);

        store.set_feedback(2.0);
        assert_eq!(store.feedback(), 0.99);
        store.set_feedback(-1.0);
        assert_eq!(store.feedback(), 0.0);

        store.set_offset_l(5000.0);
        assert_eq!(store.offset_l(), 1000.0);
    }

    #[test]
    fn named_updates_route_to_fields() {
        let store = ParamStore::new();
        store.set_named("delayTime", 2500.0);
        store.set_named("feedback", 0.5);
        store.set_named("gain", 0.8);
        store.set_named("mix", 0.6);
        store.set_named("offsetL", 100.0);
        store.set_named("bypass", 1.0);

        let snap = store.snapshot();
        assert_eq!(snap.delay_time, 2500.0);
        assert_eq!(snap.feedback, 0.5);
        assert_eq!(snap.gain, 0.8);
        assert_eq!(snap.mix, 0.6);
        assert_eq!(snap.offset_l, 100.0);
        assert!(snap.bypass);
    }

    #[test]
    fn offset_r_updates_left_offset() {
        // Pins the shipped (mis-)routing: "offsetR" writes the left
        // offset and the right offset stays put.
        let store = ParamStore::new();
        store.set_named("offsetR", 250.0);
        assert_eq!(store.offset_l(), 250.0);
        assert_eq!(store.offset_r(), 0.0);
    }

    #[test]
    fn unknown_named_id_ignored() {
        let store = ParamStore::new();
        store.set_named("resonance", 0.7);
        assert_eq!(store.snapshot(), ParamStore::new().snapshot());
    }

    #[test]
    fn parameter_info_surface() {
        let mut store = ParamStore::new();
        assert_eq!(store.param_count(), 7);

        let desc = store.param_info(index::DELAY_TIME).unwrap();
        assert_eq!(desc.string_id, "delayTime");
        assert_eq!(desc.min, 10.0);
        assert_eq!(desc.max, 5000.0);

        store.set_param(index::FEEDBACK, 0.7);
        assert!((store.get_param(index::FEEDBACK) - 0.7).abs() < 1e-6);

        // Index path runs through the same keyed routing as set_named.
        store.set_param(index::OFFSET_R, 300.0);
        assert_eq!(store.get_param(index::OFFSET_L), 300.0);
        assert_eq!(store.get_param(index::OFFSET_R), 0.0);

        store.set_param(index::BYPASS, 1.0);
        assert_eq!(store.get_param(index::BYPASS), 1.0);
    }

    #[test]
    fn reset_restores_defaults() {
        let store = ParamStore::new();
        store.set_named("delayTime", 4000.0);
        store.set_named("bypass", 1.0);
        store.reset_to_defaults();
        assert_eq!(store.snapshot(), ParamStore::new().snapshot());
    }
}
