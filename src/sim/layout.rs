//! Track geometry
//!
//! The track is a horizontal band spanning 25%..78% of the viewport height.
//! Lane `i` sits at `lerp(track_bottom, track_top, i / (lanes - 1))`, so Red
//! runs along the bottom and Blue along the top. The runner is fixed at 28% of
//! the width, vertically centred on the track.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::color::ColorChoice;
use crate::consts::*;
use crate::lerp;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackLayout {
    pub width: f32,
    pub height: f32,
    pub gate_size: Vec2,
    pub runner_size: Vec2,
}

impl Default for TrackLayout {
    fn default() -> Self {
        Self::new(VIEW_WIDTH, VIEW_HEIGHT)
    }
}

impl TrackLayout {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            gate_size: Vec2::new(GATE_WIDTH, GATE_HEIGHT),
            runner_size: Vec2::splat(RUNNER_SIZE),
        }
    }

    #[inline]
    pub fn track_top(&self) -> f32 {
        self.height * 0.25
    }

    #[inline]
    pub fn track_bottom(&self) -> f32 {
        self.height * 0.78
    }

    /// Lane centre y for a color
    pub fn lane_y(&self, color: ColorChoice) -> f32 {
        let t = color.index() as f32 / (ColorChoice::COUNT - 1) as f32;
        lerp(self.track_bottom(), self.track_top(), t)
    }

    pub fn runner_pos(&self) -> Vec2 {
        Vec2::new(
            self.width * 0.28,
            (self.track_top() + self.track_bottom()) / 2.0,
        )
    }

    pub fn runner_rect(&self) -> Rect {
        Rect::new(self.runner_pos(), self.runner_size)
    }

    /// Where new gates appear (just past the right edge)
    pub fn spawn_x(&self) -> f32 {
        self.width + GATE_SPAWN_MARGIN
    }
}
