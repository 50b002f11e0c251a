//! Scene collaborator
//!
//! The sim never draws. After each frame the controller mirrors the runner
//! and live gates into a [`Scene`] by id; the scene decides how they look.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasScene;

use std::collections::BTreeSet;

use glam::Vec2;

use crate::sim::{ColorChoice, GateOutcome, RunState};
use crate::skins::SkinShape;

/// Stable identity of a visual entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityId {
    Runner,
    Gate(u32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteKind {
    Runner(SkinShape),
    Gate {
        code: char,
        outcome: Option<GateOutcome>,
    },
}

/// Everything a scene needs to place one entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// 0xRRGGBB
    pub color: u32,
}

/// Place/update/remove visuals. No return values; drawing cannot fail the game.
pub trait Scene {
    fn place(&mut self, id: EntityId, sprite: &Sprite);
    fn remove(&mut self, id: EntityId);
}

/// Tracks which gates the scene currently shows
#[derive(Debug, Clone, Default)]
pub struct SceneSync {
    placed: BTreeSet<u32>,
}

impl SceneSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push the current run into `scene`, removing gates that have gone
    pub fn sync(&mut self, scene: &mut impl Scene, run: &RunState, shape: SkinShape) {
        scene.place(
            EntityId::Runner,
            &Sprite {
                kind: SpriteKind::Runner(shape),
                pos: run.layout.runner_pos(),
                size: run.layout.runner_size,
                color: run.color.rgb(),
            },
        );

        let live: BTreeSet<u32> = run.gates.gates().iter().map(|g| g.id).collect();
        for id in self.placed.difference(&live) {
            scene.remove(EntityId::Gate(*id));
        }

        for gate in run.gates.gates() {
            let sprite = gate_sprite(gate.color, gate.pos, gate.size, gate.outcome);
            scene.place(EntityId::Gate(gate.id), &sprite);
        }
        self.placed = live;
    }

    /// Remove every gate the scene still shows (restart)
    pub fn clear(&mut self, scene: &mut impl Scene) {
        for id in std::mem::take(&mut self.placed) {
            scene.remove(EntityId::Gate(id));
        }
    }

    pub fn placed(&self) -> &BTreeSet<u32> {
        &self.placed
    }
}

fn gate_sprite(color: ColorChoice, pos: Vec2, size: Vec2, outcome: Option<GateOutcome>) -> Sprite {
    Sprite {
        kind: SpriteKind::Gate {
            code: color.code(),
            outcome,
        },
        pos,
        size,
        color: color.rgb(),
    }
}
