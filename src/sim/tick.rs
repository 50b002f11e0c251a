//! Simulation tick
//!
//! Advances one run by `dt` seconds and reports what happened as a list of
//! events. The tick performs no I/O; persistence, audio and drawing react to
//! the returned events.

use super::color::ColorChoice;
use super::economy::distance_delta;
use super::resolver::{GateCheck, apply_miss_penalty, check_gate, is_behind};
use super::state::{EndReason, GameEvent, RunPhase, RunState};
use crate::consts::MAX_TICK_DT;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start the run (ignored unless not yet started)
    pub start: bool,
    /// Select a color by letter code
    pub color_code: Option<char>,
    /// Step to the next color
    pub cycle_color: bool,
    /// End the run voluntarily
    pub end_run: bool,
    /// Demo mode - always pick the color of the next gate
    pub autopilot: bool,
}

/// Advance the run by one step.
///
/// Order within a running tick: distance, milestones, gate movement and
/// spawning, per-gate resolution, then a fatal pass-through ends the run.
/// `dt` is clamped to `0..=MAX_TICK_DT`; a non-finite `dt` counts as zero.
pub fn tick(state: &mut RunState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_TICK_DT)
    } else {
        0.0
    };
    let mut events = Vec::new();

    if input.start {
        events.extend(state.start());
    }
    if let Some(code) = input.color_code {
        events.extend(state.set_color(code));
    }
    if input.cycle_color {
        events.extend(state.cycle_color());
    }
    if input.end_run {
        events.extend(state.end_run(EndReason::Quit));
    }

    if state.phase != RunPhase::Running {
        return events;
    }

    if input.autopilot {
        if let Some(color) = autopilot_color(state) {
            if color != state.color {
                state.color = color;
                events.push(GameEvent::ColorChanged { color });
            }
        }
    }

    state.time_ticks += 1;

    // Distance
    state.distance += distance_delta(state.speed, dt, &state.tuning).max(0.0);

    // Milestones
    let awards = state.milestones.check(state.distance, &state.tuning);
    for _ in 0..awards.coin_bands {
        state.coins_collected += state.tuning.coin_reward;
        events.push(GameEvent::CoinsAwarded {
            amount: state.tuning.coin_reward,
        });
    }
    for _ in 0..awards.speed_bands {
        state.speed = state.tuning.clamp_speed(state.speed + state.tuning.speed_step);
        events.push(GameEvent::SpeedIncreased { speed: state.speed });
    }
    if awards.coin_bands > 0 || awards.speed_bands > 0 {
        log::debug!(
            "Milestone at {:.0}m: +{} coin awards, speed {}",
            state.distance,
            awards.coin_bands,
            state.speed
        );
    }

    if !state.record_beaten && state.distance > state.previous_best {
        state.record_beaten = true;
        events.push(GameEvent::RecordBeaten {
            distance: state.distance,
        });
    }

    // Move live gates, then bring in new ones at the leading edge
    state.gates.advance(state.speed, dt);
    let spawned = state.gates.update_timer(
        dt * 1000.0,
        state.tuning.gate_spawn_period_ms,
        &mut state.rng,
        &state.layout,
    );
    events.extend(
        spawned
            .into_iter()
            .map(|(id, color)| GameEvent::GateSpawned { id, color }),
    );

    // Resolve gates against the runner
    let runner = state.layout.runner_rect();
    let active = state.color;
    let mut fatal_gate = None;
    for gate in state.gates.gates_mut() {
        let Some(check) = check_gate(gate, &runner, active, &state.tuning) else {
            continue;
        };
        match check {
            GateCheck::Matched => events.push(GameEvent::GateMatched { id: gate.id }),
            GateCheck::Missed => {
                state.speed = apply_miss_penalty(state.speed, &state.tuning);
                events.push(GameEvent::GateMissed {
                    id: gate.id,
                    speed: state.speed,
                });
            }
            GateCheck::Cleared => events.push(GameEvent::GateCleared { id: gate.id }),
            GateCheck::WrongColorPassed => {
                fatal_gate = Some(gate.id);
                break;
            }
        }
    }

    events.extend(
        state
            .gates
            .retire(state.tuning.gate_despawn_x)
            .into_iter()
            .map(|id| GameEvent::GateRemoved { id }),
    );

    state.speed = state.tuning.clamp_speed(state.speed);

    if let Some(gate_id) = fatal_gate {
        events.extend(state.end_run(EndReason::WrongColorPassed { gate_id }));
    }

    events
}

/// Color of the closest unresolved gate still ahead of the runner
fn autopilot_color(state: &RunState) -> Option<ColorChoice> {
    let runner = state.layout.runner_rect();
    state
        .gates
        .gates()
        .iter()
        .filter(|g| !g.passed && !is_behind(g, &runner))
        .min_by(|a, b| {
            a.pos
                .x
                .partial_cmp(&b.pos.x)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|g| g.color)
}
