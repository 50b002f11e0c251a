//! Run state and core simulation types
//!
//! A `RunState` covers exactly one run. Restarting means building a new one.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::color::ColorChoice;
use super::economy::Milestones;
use super::gates::GateStream;
use super::layout::TrackLayout;
use crate::tuning::Tuning;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Waiting for the start action
    NotStarted,
    /// Active gameplay
    Running,
    /// Run over (terminal)
    Ended,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// A gate of another color slipped past the runner unresolved
    WrongColorPassed { gate_id: u32 },
    /// The player ended the run
    Quit,
}

/// Things that happened during a tick, for audio/scene/persistence to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    ColorChanged { color: ColorChoice },
    GateSpawned { id: u32, color: ColorChoice },
    GateMatched { id: u32 },
    GateMissed { id: u32, speed: f32 },
    /// Same-color gate passed without overlapping
    GateCleared { id: u32 },
    GateRemoved { id: u32 },
    CoinsAwarded { amount: u32 },
    SpeedIncreased { speed: f32 },
    /// Distance just beat the best from before this run (once per run)
    RecordBeaten { distance: f32 },
    RunEnded {
        reason: EndReason,
        distance: f32,
        new_record: bool,
    },
}

/// Complete per-run state (deterministic for a given seed and inputs)
#[derive(Debug, Clone)]
pub struct RunState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub layout: TrackLayout,
    pub phase: RunPhase,
    /// Meters travelled, never decreasing
    pub distance: f32,
    /// Current scroll speed, kept within the tuning bounds
    pub speed: f32,
    /// Coins earned this run
    pub coins_collected: u32,
    /// Player's active color
    pub color: ColorChoice,
    pub milestones: Milestones,
    /// Best distance recorded before this run started
    pub previous_best: f32,
    pub record_beaten: bool,
    pub gates: GateStream,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub end_reason: Option<EndReason>,
}

impl RunState {
    pub fn new(seed: u64, previous_best: f32, tuning: Tuning, layout: TrackLayout) -> Self {
        let speed = tuning.clamp_speed(tuning.start_speed);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            layout,
            phase: RunPhase::NotStarted,
            distance: 0.0,
            speed,
            coins_collected: 0,
            color: ColorChoice::default(),
            milestones: Milestones::default(),
            previous_best: previous_best.max(0.0),
            record_beaten: false,
            gates: GateStream::new(),
            time_ticks: 0,
            end_reason: None,
        }
    }

    pub fn is_started(&self) -> bool {
        self.phase != RunPhase::NotStarted
    }

    pub fn is_over(&self) -> bool {
        self.phase == RunPhase::Ended
    }

    /// NotStarted -> Running. Ignored in any other phase.
    pub fn start(&mut self) -> Option<GameEvent> {
        if self.phase != RunPhase::NotStarted {
            return None;
        }
        self.phase = RunPhase::Running;
        self.milestones.reset();
        self.gates.start();
        log::debug!("Run {} started", self.seed);
        Some(GameEvent::RunStarted)
    }

    /// Select a color by its letter code. Unknown codes and ended runs are ignored.
    pub fn set_color(&mut self, code: char) -> Option<GameEvent> {
        if self.is_over() {
            return None;
        }
        let color = ColorChoice::from_code(code)?;
        self.color = color;
        Some(GameEvent::ColorChanged { color })
    }

    /// Step to the next color in lane order
    pub fn cycle_color(&mut self) -> Option<GameEvent> {
        if self.is_over() {
            return None;
        }
        self.color = self.color.next();
        Some(GameEvent::ColorChanged { color: self.color })
    }

    /// Running -> Ended. Stops the gate stream and freezes distance and speed.
    pub fn end_run(&mut self, reason: EndReason) -> Option<GameEvent> {
        if self.phase != RunPhase::Running {
            return None;
        }
        self.phase = RunPhase::Ended;
        self.gates.stop();
        self.end_reason = Some(reason);
        Some(GameEvent::RunEnded {
            reason,
            distance: self.distance,
            new_record: self.distance > self.previous_best,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_state() -> RunState {
        RunState::new(1, 0.0, Tuning::default(), TrackLayout::default())
    }

    #[test]
    fn initial_state() {
        let state = new_state();
        assert_eq!(state.phase, RunPhase::NotStarted);
        assert_eq!(state.speed, 360.0);
        assert_eq!(state.distance, 0.0);
        assert!(!state.is_started());
        assert!(!state.is_over());
    }

    #[test]
    fn start_only_once() {
        let mut state = new_state();
        assert_eq!(state.start(), Some(GameEvent::RunStarted));
        assert!(state.gates.is_active());
        assert_eq!(state.start(), None);
    }

    #[test]
    fn color_selection_before_and_during_run() {
        let mut state = new_state();
        assert!(state.set_color('B').is_some());
        assert_eq!(state.color, ColorChoice::Blue);
        assert!(state.cycle_color().is_some());
        assert_eq!(state.color, ColorChoice::Red);

        state.start();
        assert!(state.set_color('y').is_some());
        assert_eq!(state.color, ColorChoice::Yellow);
    }

    #[test]
    fn invalid_code_is_ignored() {
        let mut state = new_state();
        state.set_color('O');
        assert_eq!(state.set_color('Z'), None);
        assert_eq!(state.color, ColorChoice::Orange);
    }

    #[test]
    fn ended_run_ignores_color_input() {
        let mut state = new_state();
        state.start();
        assert!(state.end_run(EndReason::Quit).is_some());
        assert_eq!(state.set_color('B'), None);
        assert_eq!(state.cycle_color(), None);
        assert_eq!(state.color, ColorChoice::Red);
    }

    #[test]
    fn end_run_requires_running() {
        let mut state = new_state();
        assert_eq!(state.end_run(EndReason::Quit), None);
        state.start();
        state.distance = 42.0;
        let event = state.end_run(EndReason::Quit);
        assert_eq!(
            event,
            Some(GameEvent::RunEnded {
                reason: EndReason::Quit,
                distance: 42.0,
                new_record: true,
            })
        );
        assert!(!state.gates.is_active());
        assert_eq!(state.end_run(EndReason::Quit), None);
    }

    #[test]
    fn no_record_when_short_of_previous_best() {
        let mut state = RunState::new(1, 100.0, Tuning::default(), TrackLayout::default());
        state.start();
        state.distance = 99.0;
        assert!(matches!(
            state.end_run(EndReason::Quit),
            Some(GameEvent::RunEnded { new_record: false, .. })
        ));
    }
}
