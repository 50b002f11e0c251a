//! Color Dash - A color-matching endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (gates, milestones, run state)
//! - `progression`: Persisted best distance, coins and skins
//! - `game`: Run controller wiring the sim to storage, audio and the scene
//! - `renderer`: Scene collaborator interface
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod game;
pub mod platform;
pub mod progression;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod skins;
pub mod tuning;

pub use game::{Game, RunSummary};
pub use progression::{KeyValueStore, MemoryStore, ProgressionState, ProgressionStore};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the clock accounts for; anything slower is a hitch
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Largest `dt` a single tick accepts (one frame's worth of substeps)
    pub const MAX_TICK_DT: f32 = MAX_FRAME_DT * MAX_SUBSTEPS as f32;

    /// Runner speed bounds (pixels/s)
    pub const MIN_SPEED: f32 = 320.0;
    pub const MAX_SPEED: f32 = 840.0;
    pub const START_SPEED: f32 = 360.0;
    /// Speed lost when overlapping a gate of the wrong color
    pub const MISS_PENALTY: f32 = 30.0;

    /// Converts speed units travelled into distance (meters)
    pub const DISTANCE_SCALE: f32 = 0.1;

    /// Coin milestone: COIN_REWARD coins every COIN_INTERVAL meters
    pub const COIN_INTERVAL: f32 = 500.0;
    pub const COIN_REWARD: u32 = 5;
    /// Speed milestone: +SPEED_STEP every SPEED_INTERVAL meters
    pub const SPEED_INTERVAL: f32 = 1000.0;
    pub const SPEED_STEP: f32 = 10.0;

    /// Gate cadence (simulation milliseconds)
    pub const GATE_SPAWN_PERIOD_MS: f32 = 1300.0;
    /// How long a resolved gate stays on screen before removal
    pub const GATE_LINGER_MS: f32 = 80.0;
    /// Gates spawn this far past the leading (right) edge
    pub const GATE_SPAWN_MARGIN: f32 = 60.0;
    /// Gates are removed once their x drops below this
    pub const GATE_DESPAWN_X: f32 = -100.0;

    /// Entity sizes
    pub const GATE_WIDTH: f32 = 100.0;
    pub const GATE_HEIGHT: f32 = 70.0;
    pub const RUNNER_SIZE: f32 = 48.0;

    /// Default viewport
    pub const VIEW_WIDTH: f32 = 1280.0;
    pub const VIEW_HEIGHT: f32 = 720.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
