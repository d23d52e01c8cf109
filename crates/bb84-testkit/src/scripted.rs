//! Scripted randomness
//!
//! [`ScriptedRandomSource`] replays a fixed list of uniform values, one per
//! draw, so a test can spell out exactly which bits and bases the simulator
//! will pick.

use bb84_core::{Bit, MeasurementBasis, RandomSource};
use parking_lot::Mutex;

/// Uniform value that `random_bit` maps to `bit`
pub fn bit_draw(bit: Bit) -> f64 {
    match bit {
        Bit::Zero => 0.25,
        Bit::One => 0.75,
    }
}

/// Uniform value that `random_basis` maps to `basis`
pub fn basis_draw(basis: MeasurementBasis) -> f64 {
    match basis {
        MeasurementBasis::Rectilinear => 0.25,
        MeasurementBasis::Diagonal => 0.75,
    }
}

/// Replays a fixed sequence of uniform draws
///
/// Panics when the script runs out: a test that draws more than it scripted has
/// a wrong expectation about draw order.
#[derive(Debug)]
pub struct ScriptedRandomSource {
    draws: Mutex<(Vec<f64>, usize)>,
}

impl ScriptedRandomSource {
    /// Script the given values in order
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        Self {
            draws: Mutex::new((draws.into(), 0)),
        }
    }

    /// Number of draws consumed so far
    pub fn consumed(&self) -> usize {
        self.draws.lock().1
    }

    /// Number of scripted draws not consumed yet
    pub fn remaining(&self) -> usize {
        let guard = self.draws.lock();
        guard.0.len() - guard.1
    }
}

impl RandomSource for ScriptedRandomSource {
    fn next_u64(&self) -> u64 {
        ((self.next_f64() * (1u64 << 53) as f64) as u64) << 11
    }

    fn next_f64(&self) -> f64 {
        let mut guard = self.draws.lock();
        let (draws, position) = &mut *guard;
        let Some(value) = draws.get(*position).copied() else {
            panic!("scripted random source exhausted after {} draws", draws.len());
        };
        *position += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb84_core::{random_basis, random_bit};

    #[test]
    fn draws_map_back() {
        let source = ScriptedRandomSource::new(vec![
            bit_draw(Bit::One),
            basis_draw(MeasurementBasis::Diagonal),
            bit_draw(Bit::Zero),
        ]);
        assert_eq!(random_bit(&source), Bit::One);
        assert_eq!(random_basis(&source), MeasurementBasis::Diagonal);
        assert_eq!(random_bit(&source), Bit::Zero);
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    #[should_panic(expected = "exhausted")]
    fn exhausted_script_panics() {
        let source = ScriptedRandomSource::new(vec![0.1]);
        source.next_f64();
        source.next_f64();
    }
}
