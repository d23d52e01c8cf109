//! Plain-text rendering of steps and run summaries

use bb84_core::{Bit, SimulationStep, EAVESDROP_DETECTION_THRESHOLD, MAX_ACCEPTABLE_ERROR_RATE};
use bb84_simulator::SimulationState;
use std::fmt::Write;

/// One line per transmission
pub fn format_step(step: &SimulationStep) -> String {
    let mut line = format!(
        "#{:>4}  alice {} {} {:>3}°",
        step.index,
        step.alice.bit,
        step.alice.basis.symbol(),
        step.alice.angle,
    );
    if let Some(eve) = step.interception {
        let _ = write!(line, "  eve {} {}", eve.bit, eve.basis.symbol());
    }
    let _ = write!(
        line,
        "  photon {:>3}°  bob {} {} {:>3}°  {}",
        step.photon.polarization,
        step.bob.bit,
        step.bob.basis.symbol(),
        step.bob.angle,
        verdict(step),
    );
    line
}

fn verdict(step: &SimulationStep) -> &'static str {
    match (step.result.will_keep, step.result.bit_preserved) {
        (true, true) => "keep",
        (true, false) => "keep (error)",
        (false, _) => "discard",
    }
}

/// Bits as a compact string, e.g. `0110`
pub fn format_key(key: &[Bit]) -> String {
    key.iter().map(|bit| char::from(b'0' + bit.as_u8())).collect()
}

/// Multi-line summary of a run
pub fn format_summary(state: &SimulationState) -> String {
    let stats = &state.statistics;
    let detection = stats.eavesdrop_assessment(EAVESDROP_DETECTION_THRESHOLD);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "transmissions: {}/{}",
        state.current_step(),
        state.total_steps
    );
    let _ = writeln!(out, "matching bases: {}", stats.matching_bases);
    let _ = writeln!(
        out,
        "shared key ({} bits): {}",
        state.shared_key.len(),
        format_key(&state.shared_key)
    );
    let _ = writeln!(out, "key efficiency: {:.1}%", stats.key_efficiency * 100.0);
    let _ = write!(
        out,
        "error rate: {:.1}% ({} {:.0}% threshold, {} {:.0}% ceiling)",
        stats.error_rate * 100.0,
        if detection.detected { "above" } else { "within" },
        detection.threshold * 100.0,
        if stats.error_rate > MAX_ACCEPTABLE_ERROR_RATE { "above" } else { "within" },
        MAX_ACCEPTABLE_ERROR_RATE * 100.0
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb84_core::{SeededRandomSource, Statistics};
    use bb84_simulator::SimulationSession;
    use bb84_testkit::noiseless_config;
    use std::sync::Arc;

    fn session(transmissions: usize, seed: u64) -> SimulationSession {
        SimulationSession::new(
            noiseless_config(transmissions),
            Arc::new(SeededRandomSource::new(seed)),
        )
        .unwrap()
    }

    #[test]
    fn key_formatting() {
        assert_eq!(format_key(&[Bit::Zero, Bit::One, Bit::One]), "011");
        assert_eq!(format_key(&[]), "");
    }

    #[test]
    fn step_line_ends_with_verdict() {
        let mut session = session(1, 1);
        session.execute_step();
        let step = session.state().steps[0].clone();
        let line = format_step(&step);

        assert!(line.starts_with("#   1"));
        assert!(!line.contains("eve"));
        if step.result.bases_match {
            assert!(line.ends_with("keep"));
        } else {
            assert!(line.ends_with("discard"));
        }
    }

    #[test]
    fn summary_lists_statistics() {
        let mut session = session(8, 2);
        for _ in 0..8 {
            session.execute_step();
        }
        let summary = format_summary(session.state());
        assert!(summary.contains("transmissions: 8/8"));
        assert!(summary.contains("error rate: 0.0% (within 11% threshold, within 25% ceiling)"));
    }

    #[test]
    fn summary_flags_error_rate_above_ceiling() {
        let state = SimulationState {
            statistics: Statistics::from_counts(100, 50, 15, 50),
            total_steps: 100,
            ..SimulationState::default()
        };
        let summary = format_summary(&state);
        assert!(summary.contains("error rate: 30.0% (above 11% threshold, above 25% ceiling)"));
    }
}
