//! Multi-channel circular delay bank for feedback delay effects.
//!
//! [`DelayBank`] owns one contiguous ring buffer per channel, each with an
//! independent write cursor. Reads support fractional delay times through
//! linear interpolation, which keeps delay-time changes free of stepping
//! artifacts.
//!
//! # Read/write convention
//!
//! The write cursor counts pushes modulo capacity. A read at delay `d`
//! resolves to index `(write_cursor + capacity - d) mod capacity`, so
//! `pop(ch, 1.0)` returns the most recently pushed sample and valid integer
//! delays span `[1, capacity - 1]`. Requested delays outside
//! `[0, capacity - 1]` are clamped to that range rather than allowed to wrap
//! into freshly written data.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::math::lerp;

/// Fixed-capacity, multi-channel circular delay buffer.
///
/// Storage is heap-allocated once at construction and never reallocates;
/// all processing-path methods are allocation-free.
///
/// # Example
///
/// ```rust
/// use rebote_core::DelayBank;
///
/// let mut bank = DelayBank::new(48_000, 2);
/// bank.push(0, 1.0);
/// bank.push(0, 0.5);
/// assert_eq!(bank.pop(0, 1.0, true), 0.5);
/// assert_eq!(bank.pop(0, 2.0, true), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct DelayBank {
    /// Channel-major sample storage, `channels * capacity` long.
    buffer: Vec<f32>,
    /// Ring capacity per channel, in samples.
    capacity: usize,
    /// Number of independent channels.
    channels: usize,
    /// Per-channel write cursor, advances once per push modulo capacity.
    write_pos: Vec<usize>,
}

impl DelayBank {
    /// Creates a delay bank with the given per-channel capacity.
    ///
    /// Allocates and zeroes `capacity * channels` samples. Not real-time
    /// safe; call during stream setup, never from the audio callback.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` or `channels` is 0.
    pub fn new(capacity: usize, channels: usize) -> Self {
        assert!(capacity > 0, "Delay capacity must be > 0");
        assert!(channels > 0, "Delay bank needs at least one channel");

        Self {
            buffer: vec![0.0; capacity * channels],
            capacity,
            channels,
            write_pos: vec![0; channels],
        }
    }

    /// Zeroes all stored samples and resets every write cursor.
    ///
    /// Keeps the existing allocation, so this is safe to call from the
    /// audio context between blocks.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos.fill(0);
    }

    /// Writes `value` at the channel's write cursor and advances the cursor.
    ///
    /// The cursor advances exactly once per push, wrapping modulo capacity.
    #[inline]
    pub fn push(&mut self, channel: usize, value: f32) {
        debug_assert!(channel < self.channels);
        let pos = self.write_pos[channel];
        self.buffer[channel * self.capacity + pos] = value;
        self.write_pos[channel] = (pos + 1) % self.capacity;
    }

    /// Reads the sample `delay_samples` pushes behind the write cursor.
    ///
    /// Fractional delays interpolate linearly between the samples at delays
    /// `floor(d)` and `floor(d) + 1`. The delay is clamped to
    /// `[0, capacity - 1]`.
    #[inline]
    pub fn read(&self, channel: usize, delay_samples: f32) -> f32 {
        debug_assert!(channel < self.channels);
        debug_assert!(delay_samples >= 0.0);

        let len = self.capacity;
        let delay_clamped = delay_samples.clamp(0.0, (len - 1) as f32);

        let delay_int = delay_clamped as usize;
        let frac = delay_clamped - delay_int as f32;

        let base = channel * len;
        let read_pos = (self.write_pos[channel] + len - delay_int) % len;
        let a = self.buffer[base + read_pos];
        if frac == 0.0 {
            return a;
        }
        // One sample further back, i.e. delay floor(d) + 1.
        let prev_pos = (read_pos + len - 1) % len;
        let b = self.buffer[base + prev_pos];
        lerp(a, b, frac)
    }

    /// Reads a delayed tap from the given channel.
    ///
    /// `advance` marks this read as the channel's canonical tap in
    /// multi-tap designs. With a single tap per channel it has no effect:
    /// cursors only move on [`push`](Self::push), and every read is pure.
    #[inline]
    pub fn pop(&self, channel: usize, delay_samples: f32, advance: bool) -> f32 {
        let _ = advance;
        self.read(channel, delay_samples)
    }

    /// Maximum delay capacity per channel, in samples.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of channels in the bank.
    pub fn channels(&self) -> usize {
        self.channels
    }
}
