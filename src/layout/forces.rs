use eframe::egui::{Vec2, vec2};

use super::quadtree::Quad;

const SOFTENING: f32 = 1.0;

#[derive(Clone, Copy)]
pub(super) struct RepulsionParams {
    pub(super) strength: f32,
    pub(super) theta: f32,
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) spacing: f32,
    pub(super) strength: f32,
}

// Deterministic direction for points sitting exactly on top of each other.
fn separation_axis(first: usize, second: usize) -> Vec2 {
    let angle = ((first as f32) * 0.618_034 + (second as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

fn push_away(from: Vec2, to: Vec2, strength: f32, weight: f32, fallback: Vec2) -> Vec2 {
    let delta = from - to;
    let distance_sq = delta.length_sq();
    let distance = distance_sq.sqrt();
    let direction = if distance > 0.0001 {
        delta / distance
    } else {
        fallback
    };
    direction * (strength * weight / (distance_sq + SOFTENING).sqrt())
}

pub(super) fn accumulate_repulsion(
    quad: &Quad,
    index: usize,
    positions: &[Vec2],
    params: RepulsionParams,
    force: &mut Vec2,
) {
    if quad.weight <= 0.0 {
        return;
    }

    let point = positions[index];

    if quad.is_leaf() {
        for &other in &quad.members {
            if other != index {
                *force += push_away(
                    point,
                    positions[other],
                    params.strength,
                    1.0,
                    separation_axis(index, other),
                );
            }
        }
        return;
    }

    let distance = (point - quad.centroid).length().max(0.01);
    if !quad.square.contains(point) && quad.square.side() / distance < params.theta {
        *force += push_away(
            point,
            quad.centroid,
            params.strength,
            quad.weight,
            separation_axis(index, 0),
        );
        return;
    }

    for child in quad.children() {
        accumulate_repulsion(child, index, positions, params, force);
    }
}

fn collide_pair(
    first: usize,
    second: usize,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    forces: &mut [Vec2],
) {
    let delta = positions[first] - positions[second];
    let distance = delta.length();
    let min_distance = (radii[first] + radii[second]) * params.spacing;
    if distance >= min_distance {
        return;
    }

    let direction = if distance > 0.0001 {
        delta / distance
    } else {
        separation_axis(first, second)
    };
    let push = direction * ((min_distance - distance) * params.strength * 0.5);
    forces[first] += push;
    forces[second] -= push;
}

/// Pushes apart every pair closer than their spaced radii. Cell pairs whose
/// gap exceeds what their largest members could reach are skipped.
pub(super) fn accumulate_collisions(
    first: &Quad,
    second: &Quad,
    same: bool,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    forces: &mut [Vec2],
) {
    let reach = (first.max_radius + second.max_radius) * params.spacing;
    if first.square.gap_sq(second.square) > reach * reach {
        return;
    }

    if first.is_leaf() && second.is_leaf() {
        if same {
            for (offset, &a) in first.members.iter().enumerate() {
                for &b in &first.members[offset + 1..] {
                    collide_pair(a, b, positions, radii, params, forces);
                }
            }
        } else {
            for &a in &first.members {
                for &b in &second.members {
                    collide_pair(a, b, positions, radii, params, forces);
                }
            }
        }
        return;
    }

    if same {
        let children = first.children().collect::<Vec<_>>();
        for (offset, child) in children.iter().enumerate() {
            accumulate_collisions(child, child, true, positions, radii, params, forces);
            for other in &children[offset + 1..] {
                accumulate_collisions(child, other, false, positions, radii, params, forces);
            }
        }
        return;
    }

    let split_first = if first.is_leaf() {
        false
    } else if second.is_leaf() {
        true
    } else {
        first.square.half >= second.square.half
    };

    if split_first {
        for child in first.children() {
            accumulate_collisions(child, second, false, positions, radii, params, forces);
        }
    } else {
        for child in second.children() {
            accumulate_collisions(first, child, false, positions, radii, params, forces);
        }
    }
}
