use eframe::egui::{Pos2, Vec2};

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 4.0;
const INITIAL_SCALE: f32 = 0.8;

/// Zoom/pan transform from world coordinates to surface-local screen
/// coordinates: `screen = translate + world * scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub translate: Vec2,
    pub scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Viewport {
    pub fn initial(size: Vec2) -> Self {
        Self {
            translate: size * 0.1,
            scale: INITIAL_SCALE,
        }
    }

    pub fn world_to_screen(&self, world: Vec2) -> Pos2 {
        (self.translate + world * self.scale).to_pos2()
    }

    pub fn screen_to_world(&self, screen: Pos2) -> Vec2 {
        (screen.to_vec2() - self.translate) / self.scale
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.translate += delta;
    }

    /// Scales by `factor` keeping the world point under `anchor` fixed.
    pub fn zoom_about(&mut self, anchor: Pos2, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let world = self.screen_to_world(anchor);
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        self.translate = anchor.to_vec2() - world * self.scale;
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn initial_transform_offsets_by_a_tenth_of_the_surface() {
        let viewport = Viewport::initial(vec2(800.0, 600.0));
        assert_eq!(viewport.translate, vec2(80.0, 60.0));
        assert_eq!(viewport.scale, 0.8);
        assert_eq!(viewport.world_to_screen(vec2(100.0, 100.0)), pos2(160.0, 140.0));
    }

    #[test]
    fn screen_and_world_mappings_invert_each_other() {
        let viewport = Viewport {
            translate: vec2(-30.0, 12.5),
            scale: 1.7,
        };
        let world = vec2(42.0, -7.0);
        let back = viewport.screen_to_world(viewport.world_to_screen(world));
        assert!((back - world).length() < 1e-4);
    }

    #[test]
    fn zoom_keeps_anchor_fixed_and_clamps() {
        let mut viewport = Viewport::initial(vec2(800.0, 600.0));
        let anchor = pos2(300.0, 200.0);
        let world = viewport.screen_to_world(anchor);

        viewport.zoom_about(anchor, 1.15);
        assert!((viewport.world_to_screen(world) - anchor).length() < 1e-3);

        for _ in 0..100 {
            viewport.zoom_about(anchor, 1.15);
        }
        assert_eq!(viewport.scale, MAX_SCALE);

        for _ in 0..200 {
            viewport.zoom_about(anchor, 0.85);
        }
        assert_eq!(viewport.scale, MIN_SCALE);
    }

    #[test]
    fn pan_translates_everything() {
        let mut viewport = Viewport::default();
        viewport.pan_by(vec2(5.0, -5.0));
        assert_eq!(viewport.world_to_screen(Vec2::ZERO), pos2(5.0, -5.0));
    }
}
