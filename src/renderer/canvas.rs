//! Canvas 2D scene for the browser build

use std::collections::BTreeMap;

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{EntityId, Scene, Sprite, SpriteKind};
use crate::sim::{GateOutcome, TrackLayout};
use crate::skins::SkinShape;

pub struct CanvasScene {
    ctx: CanvasRenderingContext2d,
    layout: TrackLayout,
    sprites: BTreeMap<EntityId, Sprite>,
}

impl CanvasScene {
    pub fn new(canvas: &HtmlCanvasElement, layout: TrackLayout) -> Option<Self> {
        use wasm_bindgen::JsCast;

        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            layout,
            sprites: BTreeMap::new(),
        })
    }

    /// Redraw the track and every placed sprite
    pub fn draw(&self) {
        let ctx = &self.ctx;
        let (w, h) = (self.layout.width as f64, self.layout.height as f64);

        ctx.set_fill_style_str("#1a0b2e");
        ctx.fill_rect(0.0, 0.0, w, h);

        let top = self.layout.track_top() as f64;
        let bottom = self.layout.track_bottom() as f64;
        ctx.set_fill_style_str("rgba(255, 179, 217, 0.25)");
        ctx.fill_rect(0.0, top, w, bottom - top);

        // Gates first so the runner draws on top
        for (id, sprite) in self.sprites.iter().rev() {
            if *id != EntityId::Runner {
                self.draw_sprite(sprite);
            }
        }
        if let Some(runner) = self.sprites.get(&EntityId::Runner) {
            self.draw_sprite(runner);
        }
    }

    fn draw_sprite(&self, sprite: &Sprite) {
        let ctx = &self.ctx;
        let (x, y) = (sprite.pos.x as f64, sprite.pos.y as f64);
        let (w, h) = (sprite.size.x as f64, sprite.size.y as f64);
        ctx.set_fill_style_str(&format!("#{:06x}", sprite.color));
        ctx.set_stroke_style_str("#ffffff");
        ctx.set_line_width(4.0);

        match sprite.kind {
            SpriteKind::Gate { code, outcome } => {
                ctx.set_global_alpha(0.6);
                ctx.fill_rect(x - w / 2.0, y - h / 2.0, w, h);
                ctx.set_global_alpha(1.0);
                ctx.stroke_rect(x - w / 2.0, y - h / 2.0, w, h);
                let label = match outcome {
                    Some(GateOutcome::Match) => "MATCH!".to_string(),
                    Some(GateOutcome::Miss) => "MISS".to_string(),
                    None => code.to_string(),
                };
                ctx.set_fill_style_str("#ffffff");
                ctx.set_font("bold 16px Arial");
                ctx.set_text_align("center");
                ctx.set_text_baseline("middle");
                let _ = ctx.fill_text(&label, x, y);
            }
            SpriteKind::Runner(shape) => {
                ctx.begin_path();
                match shape {
                    SkinShape::Rectangle => ctx.rect(x - w / 2.0, y - h / 2.0, w, h),
                    SkinShape::Circle => {
                        let _ = ctx.arc(x, y, w / 2.0, 0.0, std::f64::consts::TAU);
                    }
                    SkinShape::Triangle => {
                        ctx.move_to(x, y - h / 2.0);
                        ctx.line_to(x - w * 0.42, y + h * 0.42);
                        ctx.line_to(x + w * 0.42, y + h * 0.42);
                        ctx.close_path();
                    }
                    SkinShape::Star => {
                        let (outer, inner) = (w / 2.0, w / 4.0);
                        for i in 0..10 {
                            let r = if i % 2 == 0 { outer } else { inner };
                            let a = i as f64 * std::f64::consts::PI / 5.0
                                - std::f64::consts::FRAC_PI_2;
                            let (px, py) = (x + a.cos() * r, y + a.sin() * r);
                            if i == 0 {
                                ctx.move_to(px, py);
                            } else {
                                ctx.line_to(px, py);
                            }
                        }
                        ctx.close_path();
                    }
                }
                ctx.fill();
                ctx.stroke();
            }
        }
    }
}

impl Scene for CanvasScene {
    fn place(&mut self, id: EntityId, sprite: &Sprite) {
        self.sprites.insert(id, *sprite);
    }

    fn remove(&mut self, id: EntityId) {
        self.sprites.remove(&id);
    }
}
