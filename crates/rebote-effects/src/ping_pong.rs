//! Real-time stereo ping-pong delay processor.
//!
//! [`PingPongDelay`] is the audio-context half of the effect: the control
//! context owns a shared [`ParamStore`] handle and mutates it freely while
//! [`process_block`](PingPongDelay::process_block) runs. Each block samples
//! the store exactly once, so parameter values are stable within a block
//! and take effect at the next block boundary.
//!
//! The ping-pong topology does two cross-channel moves per frame: each
//! channel's feedback write carries the *opposite* channel's delayed tap,
//! and each channel's wet output is the opposite channel's tap as well.
//! An impulse on the left therefore first sounds on the right, then
//! bounces back to the left one delay period later, attenuated by the
//! feedback gain on every bounce.

use std::sync::Arc;

use rebote_core::{flush_denormal, wet_dry_mix, DelayBank};
use thiserror::Error;

use crate::params::{ParamSnapshot, ParamStore};

/// Per-channel delay capacity in samples: 3 seconds at 192 kHz.
pub const MAX_DELAY_SAMPLES: usize = 576_000;

/// Delay routing topology.
///
/// Closed set; variants select the per-frame routing in
/// [`PingPongDelay::process_block`] and are orthogonal to buffer state and
/// parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Algorithm {
    /// Cross-channel feedback and cross-channel wet taps.
    #[default]
    PingPong,
}

/// Block-level bypass gate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BypassState {
    /// Processing normally.
    Active,
    /// Processing skipped; output muted, delay lines frozen.
    Bypassed,
}

/// Samples the bypass flag once per block and holds it for the block's
/// duration, so a mid-block toggle never splits a block.
#[derive(Debug)]
pub struct BypassGate {
    state: BypassState,
}

impl BypassGate {
    /// Creates a gate in the active state.
    pub fn new() -> Self {
        Self {
            state: BypassState::Active,
        }
    }

    /// Latches the flag for the coming block and returns the new state.
    #[inline]
    pub fn update(&mut self, bypassed: bool) -> BypassState {
        self.state = if bypassed {
            BypassState::Bypassed
        } else {
            BypassState::Active
        };
        self.state
    }

    /// State latched by the last [`update`](Self::update).
    pub fn state(&self) -> BypassState {
        self.state
    }

    /// Returns to the active state.
    pub fn reset(&mut self) {
        self.state = BypassState::Active;
    }
}

impl Default for BypassGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors from [`PingPongDelay::prepare`].
#[derive(Debug, Error)]
pub enum PrepareError {
    /// The host asked for a channel layout the effect cannot serve.
    #[error("Unsupported channel count {0}: expected 1 (mono) or 2 (stereo)")]
    UnsupportedChannelCount(usize),
}

/// Stereo ping-pong delay with wait-free parameter control.
///
/// Lifecycle: construct, [`prepare`](Self::prepare) before the first block,
/// [`process_block`](Self::process_block) from the audio callback, and
/// [`release_resources`](Self::release_resources) when the stream stops.
/// Processing before `prepare` (or after `release_resources`) is a no-op.
pub struct PingPongDelay {
    params: Arc<ParamStore>,
    bank: Option<DelayBank>,
    channels: usize,
    sample_rate: f32,
    algorithm: Algorithm,
    gate: BypassGate,
}

impl PingPongDelay {
    /// Creates an unprepared processor with default parameters.
    pub fn new() -> Self {
        Self {
            params: Arc::new(ParamStore::new()),
            bank: None,
            channels: 0,
            sample_rate: 0.0,
            algorithm: Algorithm::PingPong,
            gate: BypassGate::new(),
        }
    }

    /// Shared handle to the parameter store for the control context.
    pub fn params(&self) -> Arc<ParamStore> {
        Arc::clone(&self.params)
    }

    /// The active routing topology.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Whether [`prepare`](Self::prepare) has been called and resources
    /// are live.
    pub fn is_prepared(&self) -> bool {
        self.bank.is_some()
    }

    /// Allocates delay storage and arms the processor for playback.
    ///
    /// Allocation happens here and only here; `process_block` never
    /// allocates. Calling `prepare` again reconfigures and clears all
    /// delay state.
    ///
    /// # Errors
    ///
    /// Returns [`PrepareError::UnsupportedChannelCount`] for channel
    /// counts other than 1 or 2.
    pub fn prepare(
        &mut self,
        sample_rate: f32,
        max_block_size: usize,
        channels: usize,
    ) -> Result<(), PrepareError> {
        if channels == 0 || channels > 2 {
            return Err(PrepareError::UnsupportedChannelCount(channels));
        }

        // Delay lines always come in a pair so the ping-pong routing has
        // both sides even when the host runs mono.
        self.bank = Some(DelayBank::new(MAX_DELAY_SAMPLES, 2));
        self.channels = channels;
        self.sample_rate = sample_rate;
        self.gate.reset();

        tracing::info!(
            sample_rate,
            max_block_size,
            channels,
            capacity = MAX_DELAY_SAMPLES,
            "Prepared ping-pong delay"
        );
        Ok(())
    }

    /// Drops delay storage; the processor goes back to the unprepared
    /// no-op state until the next [`prepare`](Self::prepare).
    pub fn release_resources(&mut self) {
        self.bank = None;
        self.channels = 0;
        tracing::debug!("Released ping-pong delay resources");
    }

    /// Clears delay history without touching parameters or allocation.
    pub fn reset(&mut self) {
        if let Some(bank) = &mut self.bank {
            bank.clear();
        }
        self.gate.reset();
    }

    /// Processes one block of audio in place.
    ///
    /// `buffer` holds one slice per channel; all channel slices must have
    /// equal length. Unprepared processors leave the buffer untouched.
    /// When bypassed, processing is skipped entirely: every output sample
    /// is forced to exactly `0.0` and the delay lines stay frozen, so
    /// un-bypassing replays the pre-bypass tail.
    pub fn process_block(&mut self, buffer: &mut [&mut [f32]]) {
        let Some(bank) = &mut self.bank else {
            return;
        };
        if buffer.is_empty() {
            return;
        }

        let snap = self.params.snapshot();

        if self.gate.update(snap.bypass) == BypassState::Bypassed {
            for channel in buffer.iter_mut() {
                channel.fill(0.0);
            }
            return;
        }

        let delay_l = snap.delay_time + snap.offset_l;
        let delay_r = snap.delay_time + snap.offset_r;

        match buffer {
            [left, right, ..] => {
                debug_assert_eq!(left.len(), right.len());
                for i in 0..left.len() {
                    Self::process_stereo_frame(
                        bank,
                        &snap,
                        delay_l,
                        delay_r,
                        &mut left[i],
                        &mut right[i],
                    );
                }
            }
            [mono] => {
                for sample in mono.iter_mut() {
                    Self::process_mono_frame(bank, &snap, delay_l, sample);
                }
            }
            [] => unreachable!(),
        }
    }

    /// One stereo frame: read both taps, cross-feed the writes, then
    /// cross-route the wet outputs.
    #[inline]
    fn process_stereo_frame(
        bank: &mut DelayBank,
        snap: &ParamSnapshot,
        delay_l: f32,
        delay_r: f32,
        left: &mut f32,
        right: &mut f32,
    ) {
        let in_l = *left;
        let in_r = *right;

        // Taps must be read before either push lands, or a zero-ish delay
        // would see this frame's own input.
        let tap_l = bank.pop(0, delay_l, true);
        let tap_r = bank.pop(1, delay_r, true);

        bank.push(0, flush_denormal(in_l + tap_r * snap.feedback));
        bank.push(1, flush_denormal(in_r + tap_l * snap.feedback));

        *left = wet_dry_mix(in_l, tap_r, snap.mix) * snap.gain;
        *right = wet_dry_mix(in_r, tap_l, snap.mix) * snap.gain;
    }

    /// Mono fallback: single line, self-feedback, left offset only.
    #[inline]
    fn process_mono_frame(bank: &mut DelayBank, snap: &ParamSnapshot, delay: f32, sample: &mut f32) {
        let input = *sample;
        let tap = bank.pop(0, delay, true);
        bank.push(0, flush_denormal(input + tap * snap.feedback));
        *sample = wet_dry_mix(input, tap, snap.mix) * snap.gain;
    }
}

impl Default for PingPongDelay {
    fn default() -> Self {
        Self::new()
    }
}
