//! BB84 protocol engine
//!
//! Models one photon's lifecycle and strings lifecycles together:
//!
//! - [`prepare_qubit`]: encode a bit in a basis
//! - [`intercept`]: intercept-resend eavesdropper, producing a new photon
//! - [`measure_qubit`]: projective measurement plus channel noise
//! - [`ProtocolEngine::simulate_step`]: one full transmission record
//! - [`ProtocolEngine::simulate`]: a batch of exactly `transmission_count`
//!   transmissions
//!
//! All draws come from the [`RandomSource`](bb84_core::RandomSource) the engine
//! is constructed with.

pub mod channel;
pub mod engine;

pub use channel::{intercept, measure_qubit, prepare_qubit, Interception};
pub use engine::ProtocolEngine;
