//! Gate spawning, scrolling and retirement
//!
//! Live gates are kept in a dense `Vec` ordered by id. Ids are never reused
//! within a run, so the scene can track visuals by id across frames.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::color::ColorChoice;
use super::layout::TrackLayout;
use super::resolver::GateOutcome;

/// A colored gate scrolling toward the runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gate {
    pub id: u32,
    pub color: ColorChoice,
    pub pos: Vec2,
    pub size: Vec2,
    /// Set exactly once: on overlap resolution or when it falls behind the runner
    pub passed: bool,
    /// Result of an overlap with the runner, if one happened
    pub outcome: Option<GateOutcome>,
    /// Remaining display time once resolved (ms)
    pub linger_ms: f32,
}

impl Gate {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Flip `passed` to true. Returns false if it was already set.
    pub fn mark_passed(&mut self) -> bool {
        if self.passed {
            return false;
        }
        self.passed = true;
        true
    }

    fn expired(&self, despawn_x: f32) -> bool {
        self.pos.x < despawn_x || (self.outcome.is_some() && self.linger_ms <= 0.0)
    }
}

/// Owner of all live gates plus the spawn timer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateStream {
    gates: Vec<Gate>,
    next_id: u32,
    active: bool,
    /// Sim time accumulated toward the next spawn (ms)
    timer_ms: f32,
}

impl GateStream {
    pub fn new() -> Self {
        Self {
            gates: Vec::new(),
            next_id: 1,
            active: false,
            timer_ms: 0.0,
        }
    }

    /// Begin emitting gates; the first one arrives a full period later
    pub fn start(&mut self) {
        if !self.active {
            self.active = true;
            self.timer_ms = 0.0;
        }
    }

    /// Halt emission. Safe to call when already stopped.
    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn gates_mut(&mut self) -> &mut [Gate] {
        &mut self.gates
    }

    pub fn get(&self, id: u32) -> Option<&Gate> {
        self.gates.iter().find(|g| g.id == id)
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Place a gate of the given color at the leading edge in its lane
    pub fn spawn(&mut self, color: ColorChoice, layout: &TrackLayout) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.gates.push(Gate {
            id,
            color,
            pos: Vec2::new(layout.spawn_x(), layout.lane_y(color)),
            size: layout.gate_size,
            passed: false,
            outcome: None,
            linger_ms: 0.0,
        });
        id
    }

    /// Advance the spawn timer; spawns one uniformly random gate per elapsed period.
    ///
    /// Returns the spawned `(id, color)` pairs in order.
    pub fn update_timer<R: Rng>(
        &mut self,
        dt_ms: f32,
        period_ms: f32,
        rng: &mut R,
        layout: &TrackLayout,
    ) -> Vec<(u32, ColorChoice)> {
        let mut spawned = Vec::new();
        if !self.active || period_ms <= 0.0 {
            return spawned;
        }
        self.timer_ms += dt_ms;
        while self.timer_ms >= period_ms {
            self.timer_ms -= period_ms;
            let color = ColorChoice::ALL[rng.random_range(0..ColorChoice::COUNT)];
            spawned.push((self.spawn(color, layout), color));
        }
        spawned
    }

    /// Scroll every gate left at the current speed. Gates re-read the speed each
    /// tick, so a speed change applies to all of them at once.
    pub fn advance(&mut self, speed: f32, dt: f32) {
        for gate in &mut self.gates {
            gate.pos.x -= speed * dt;
            if gate.outcome.is_some() {
                gate.linger_ms -= dt * 1000.0;
            }
        }
    }

    /// Drop gates that left the screen or finished lingering; returns their ids
    pub fn retire(&mut self, despawn_x: f32) -> Vec<u32> {
        let removed: Vec<u32> = self
            .gates
            .iter()
            .filter(|g| g.expired(despawn_x))
            .map(|g| g.id)
            .collect();
        if !removed.is_empty() {
            self.gates.retain(|g| !g.expired(despawn_x));
        }
        removed
    }
}
