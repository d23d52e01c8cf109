//! BB84 Core: data model shared by the protocol engine and the controller
//!
//! This crate holds the types every other crate speaks:
//!
//! - **Bits and bases**: [`Bit`], [`MeasurementBasis`]
//! - **Photon states**: [`QuantumState`], [`QuantumBit`], [`MeasurementResult`]
//! - **Records**: [`SimulationStep`] and [`BatchResult`], the read-only views
//!   handed to presentation collaborators
//! - **Statistics**: [`Statistics`] derived from a step history, plus the
//!   observational [`EavesdropDetection`]
//! - **Configuration**: [`SimulationConfig`], validated at acceptance
//! - **Randomness**: the injectable [`RandomSource`] and its OS and seeded
//!   implementations
//!
//! Errors are unified in [`Bb84Error`].

pub mod basis;
pub mod config;
pub mod errors;
pub mod random;
pub mod record;
pub mod state;
pub mod statistics;

pub use basis::{Bit, MeasurementBasis};
pub use config::{SimulationConfig, DEFAULT_STEP_INTERVAL_MS, DEFAULT_TRANSMISSION_COUNT};
pub use errors::{Bb84Error, Result};
pub use random::{
    bernoulli, random_basis, random_bit, source_from_seed, OsRandomSource, RandomSource,
    SeededRandomSource,
};
pub use record::{
    sift_key, AliceView, BatchResult, BobView, InterceptionView, PhotonView, SimulationStep,
    StepResult, Transmission,
};
pub use state::{MeasurementResult, QuantumBit, QuantumState};
pub use statistics::{
    EavesdropDetection, Statistics, EAVESDROP_DETECTION_THRESHOLD, MAX_ACCEPTABLE_ERROR_RATE,
};
