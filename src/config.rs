use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Tuning for the force simulation. Every field has a default, so a config
/// file only needs the keys it overrides.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub link_distance: f32,
    pub link_strength: f32,
    pub link_damping: f32,
    pub repulsion: f32,
    pub theta: f32,
    pub collision_spacing: f32,
    pub collision_strength: f32,
    pub center_pull: f32,
    pub center_strength: f32,
    pub velocity_decay: f32,
    pub max_speed: f32,
    pub alpha_decay: f32,
    pub alpha_min: f32,
    pub reheat_target: f32,
    pub carry_over_positions: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            link_distance: 100.0,
            link_strength: 0.4,
            link_damping: 0.08,
            repulsion: 100.0,
            theta: 0.9,
            collision_spacing: 2.0,
            collision_strength: 0.7,
            center_pull: 0.01,
            center_strength: 0.1,
            velocity_decay: 0.4,
            max_speed: 40.0,
            alpha_decay: 1.0 - 0.001_f32.powf(1.0 / 300.0),
            alpha_min: 0.001,
            reheat_target: 0.3,
            carry_over_positions: true,
        }
    }
}

impl LayoutConfig {
    pub fn sanitized(self) -> Self {
        Self {
            link_distance: self.link_distance.clamp(10.0, 600.0),
            link_strength: self.link_strength.clamp(0.0, 1.0),
            link_damping: self.link_damping.clamp(0.0, 0.5),
            repulsion: self.repulsion.clamp(0.0, 2_000.0),
            theta: self.theta.clamp(0.1, 1.5),
            collision_spacing: self.collision_spacing.clamp(1.0, 4.0),
            collision_strength: self.collision_strength.clamp(0.0, 1.0),
            center_pull: self.center_pull.clamp(0.0, 0.2),
            center_strength: self.center_strength.clamp(0.0, 1.0),
            velocity_decay: self.velocity_decay.clamp(0.05, 0.95),
            max_speed: self.max_speed.clamp(1.0, 200.0),
            alpha_decay: self.alpha_decay.clamp(0.001, 0.5),
            alpha_min: self.alpha_min.clamp(1e-4, 0.1),
            reheat_target: self.reheat_target.clamp(0.0, 1.0),
            carry_over_positions: self.carry_over_positions,
        }
    }
}

pub fn load_layout_config(path: &Path) -> Result<LayoutConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout config {}", path.display()))?;
    let config: LayoutConfig = serde_json::from_str(&raw)
        .with_context(|| format!("invalid layout config in {}", path.display()))?;
    Ok(config.sanitized())
}
