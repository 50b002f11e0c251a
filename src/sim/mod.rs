//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by gate ID)
//! - No rendering, storage or platform dependencies

pub mod collision;
pub mod color;
pub mod economy;
pub mod gates;
pub mod layout;
pub mod resolver;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use color::ColorChoice;
pub use economy::{MilestoneAwards, Milestones, distance_delta};
pub use gates::{Gate, GateStream};
pub use layout::TrackLayout;
pub use resolver::{GateCheck, GateOutcome, check_gate, resolve};
pub use state::{EndReason, GameEvent, RunPhase, RunState};
pub use tick::{TickInput, tick};
