//! Rebote Core - DSP primitives for the rebote delay effect
//!
//! This crate provides the foundational building blocks for the rebote
//! stereo delay, designed for real-time audio processing with zero
//! allocation in the audio path.
//!
//! # Core Abstractions
//!
//! ## Delay Lines
//!
//! - [`DelayBank`] - Multi-channel circular delay buffer with independent
//!   per-channel write cursors and fractional-delay interpolated reads
//!
//! ## Parameter Introspection
//!
//! - [`ParameterInfo`] - Runtime parameter discovery for hosts and UIs
//! - [`ParamDescriptor`] - Range, default, and display metadata per parameter
//!
//! ## Utilities
//!
//! - [`lerp`], [`wet_dry_mix`], [`flush_denormal`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded audio applications.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! rebote-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths
//! - **No dependencies on std**: Pure `no_std` with `alloc` for buffers
//! - **Single-writer buffers**: the audio context exclusively owns delay
//!   cursors; control-thread state lives elsewhere

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod delay;
pub mod math;
pub mod param_info;

// Re-export main types at crate root
pub use delay::DelayBank;
pub use math::{flush_denormal, lerp, wet_dry_mix};
pub use param_info::{ParamDescriptor, ParamId, ParamUnit, ParameterInfo};
