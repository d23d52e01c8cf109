//! Property test strategies for simulator types
//!
//! ```rust
//! use bb84_testkit::strategies::arb_transmission;
//! use proptest::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn transmission_has_two_bases(t in arb_transmission()) {
//!         let _ = (t.alice_basis, t.bob_basis);
//!     }
//! }
//! ```

use proptest::prelude::*;

// Re-export proptest for convenience
pub use proptest;

use bb84_core::{Bit, MeasurementBasis, SimulationConfig, Transmission};

/// Either bit
pub fn arb_bit() -> impl Strategy<Value = Bit> {
    prop_oneof![Just(Bit::Zero), Just(Bit::One)]
}

/// Either basis
pub fn arb_basis() -> impl Strategy<Value = MeasurementBasis> {
    prop_oneof![
        Just(MeasurementBasis::Rectilinear),
        Just(MeasurementBasis::Diagonal)
    ]
}

/// Arbitrary Alice bit/basis and Bob basis
pub fn arb_transmission() -> impl Strategy<Value = Transmission> {
    (arb_bit(), arb_basis(), arb_basis()).prop_map(|(alice_bit, alice_basis, bob_basis)| {
        Transmission {
            alice_bit,
            alice_basis,
            bob_basis,
        }
    })
}

/// Configurations that pass validation
pub fn arb_valid_config(max_transmissions: usize) -> impl Strategy<Value = SimulationConfig> {
    (
        1..=max_transmissions.max(1),
        any::<bool>(),
        0.0f64..=1.0,
        1u64..5_000,
    )
        .prop_map(|(count, eavesdropper, error_rate, interval)| {
            SimulationConfig::default()
                .with_transmission_count(count)
                .with_eavesdropper(eavesdropper)
                .with_channel_error_rate(error_rate)
                .with_step_interval_ms(interval)
        })
}
