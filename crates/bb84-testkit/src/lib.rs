//! Test utilities for the BB84 simulator
//!
//! - [`ScriptedRandomSource`]: replays exact uniform draws
//! - [`fixtures`]: configurations and the four-transmission scenario
//! - [`strategies`]: proptest strategies for bits, bases and configs

pub mod fixtures;
pub mod scripted;
pub mod strategies;

pub use fixtures::{eavesdropped_config, four_transmission_script, noiseless_config, noisy_config};
pub use scripted::{basis_draw, bit_draw, ScriptedRandomSource};
