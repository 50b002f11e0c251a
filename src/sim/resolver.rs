//! Match/miss resolution between the runner and gates
//!
//! A gate is decided at most once. Overlapping the runner resolves it as a
//! match or a miss; a gate that slips behind the runner without overlapping
//! is harmless if it has the active color and fatal otherwise.

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::color::ColorChoice;
use super::gates::Gate;
use crate::tuning::Tuning;

/// Outcome of an overlap between runner and gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateOutcome {
    Match,
    Miss,
}

/// What happened to a gate during one check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateCheck {
    /// Overlapped with the active color
    Matched,
    /// Overlapped with a different color (speed penalty)
    Missed,
    /// Fell behind the runner unresolved, same color as the player
    Cleared,
    /// Fell behind the runner unresolved with a different color; ends the run
    WrongColorPassed,
}

/// Resolve an overlap. No-op (None) if the gate was already decided.
pub fn resolve(gate: &mut Gate, active: ColorChoice, linger_ms: f32) -> Option<GateOutcome> {
    if !gate.mark_passed() {
        return None;
    }
    let outcome = if gate.color == active {
        GateOutcome::Match
    } else {
        GateOutcome::Miss
    };
    gate.outcome = Some(outcome);
    gate.linger_ms = linger_ms;
    Some(outcome)
}

/// Speed after an overlap miss, floored at the minimum speed
pub fn apply_miss_penalty(speed: f32, tuning: &Tuning) -> f32 {
    (speed - tuning.miss_penalty).max(tuning.min_speed)
}

/// True once the gate centre has moved past the runner's trailing edge
pub fn is_behind(gate: &Gate, runner: &Rect) -> bool {
    gate.pos.x < runner.left()
}

/// Flag a gate that slipped behind the runner unresolved
pub fn pass_through(gate: &mut Gate, runner: &Rect, active: ColorChoice) -> Option<GateCheck> {
    if gate.passed || !is_behind(gate, runner) {
        return None;
    }
    gate.mark_passed();
    if gate.color == active {
        Some(GateCheck::Cleared)
    } else {
        Some(GateCheck::WrongColorPassed)
    }
}

/// Per-tick check for one live gate: overlap first, then pass-through
pub fn check_gate(
    gate: &mut Gate,
    runner: &Rect,
    active: ColorChoice,
    tuning: &Tuning,
) -> Option<GateCheck> {
    if gate.passed {
        return None;
    }
    if runner.overlaps(&gate.rect()) {
        return resolve(gate, active, tuning.gate_linger_ms).map(|outcome| match outcome {
            GateOutcome::Match => GateCheck::Matched,
            GateOutcome::Miss => GateCheck::Missed,
        });
    }
    pass_through(gate, runner, active)
}
