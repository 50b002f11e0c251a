//! Data-driven game balance
//!
//! Every gameplay number the sim reads lives here so a run can be retuned
//! from JSON without recompiling. Defaults come from [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub min_speed: f32,
    pub max_speed: f32,
    pub start_speed: f32,
    pub miss_penalty: f32,
    pub distance_scale: f32,

    pub coin_interval: f32,
    pub coin_reward: u32,
    pub speed_interval: f32,
    pub speed_step: f32,

    pub gate_spawn_period_ms: f32,
    pub gate_linger_ms: f32,
    pub gate_despawn_x: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            start_speed: START_SPEED,
            miss_penalty: MISS_PENALTY,
            distance_scale: DISTANCE_SCALE,

            coin_interval: COIN_INTERVAL,
            coin_reward: COIN_REWARD,
            speed_interval: SPEED_INTERVAL,
            speed_step: SPEED_STEP,

            gate_spawn_period_ms: GATE_SPAWN_PERIOD_MS,
            gate_linger_ms: GATE_LINGER_MS,
            gate_despawn_x: GATE_DESPAWN_X,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides; missing fields keep their defaults.
    ///
    /// Malformed JSON is logged and yields the default tuning.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Tuning>(json) {
            Ok(tuning) => tuning.sanitized(),
            Err(e) => {
                log::warn!("Invalid tuning JSON ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Clamp a speed to the configured bounds
    #[inline]
    pub fn clamp_speed(&self, speed: f32) -> f32 {
        speed.clamp(self.min_speed, self.max_speed)
    }

    /// Repair values that would break the sim (inverted bounds, zero intervals)
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.min_speed > 0.0 && self.min_speed <= self.max_speed) {
            self.min_speed = defaults.min_speed;
            self.max_speed = defaults.max_speed;
        }
        self.start_speed = self.clamp_speed(self.start_speed);
        if self.coin_interval <= 0.0 {
            self.coin_interval = defaults.coin_interval;
        }
        if self.speed_interval <= 0.0 {
            self.speed_interval = defaults.speed_interval;
        }
        if self.gate_spawn_period_ms <= 0.0 {
            self.gate_spawn_period_ms = defaults.gate_spawn_period_ms;
        }
        self
    }
}
