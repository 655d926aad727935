//! Rebote Effects - Stereo ping-pong delay processor
//!
//! This crate provides the complete rebote effect built on rebote-core:
//!
//! - [`PingPongDelay`] - Real-time stereo delay with cross-channel feedback
//! - [`ParamStore`] - Wait-free atomic parameter bridge for control threads
//! - [`get_state`] / [`set_state`] - JSON parameter persistence
//!
//! ## Example
//!
//! ```rust
//! use rebote_effects::PingPongDelay;
//!
//! let mut fx = PingPongDelay::new();
//! fx.prepare(48_000.0, 512, 2).unwrap();
//!
//! // The control thread keeps a cloned handle to the parameters.
//! let params = fx.params();
//! params.set_delay_time(24_000.0);
//! params.set_feedback(0.4);
//! params.set_mix(0.5);
//! params.set_gain(1.0);
//!
//! let mut left = vec![0.0f32; 512];
//! let mut right = vec![0.0f32; 512];
//! let mut channels: [&mut [f32]; 2] = [&mut left, &mut right];
//! fx.process_block(&mut channels);
//! ```

pub mod params;
pub mod ping_pong;
pub mod state;

// Re-export main types at crate root
pub use params::{ParamSnapshot, ParamStore, DESCRIPTORS};
pub use ping_pong::{
    Algorithm, BypassGate, BypassState, PingPongDelay, PrepareError, MAX_DELAY_SAMPLES,
};
pub use state::{get_state, set_state, StateError};
