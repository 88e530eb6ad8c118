mod forces;
mod quadtree;

use std::collections::HashMap;
use std::f32::consts::PI;

use eframe::egui::{Vec2, vec2};
use tracing::debug;

use crate::config::LayoutConfig;
use crate::graph::GraphModel;
use crate::util::stable_pair;
use forces::{CollisionParams, RepulsionParams, accumulate_collisions, accumulate_repulsion};
use quadtree::Quad;

pub const NODE_RADIUS: f32 = 20.0;
pub const EMPHASIZED_RADIUS: f32 = 25.0;

const SPIRAL_RADIUS: f32 = 10.0;
const SLEEP_SPEED_SQ: f32 = 1e-8;
const MOTION_EPSILON: f32 = 0.01;

/// Simulation state of one node. Position and pin are only changed through
/// [`LayoutEngine`] entry points.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub id: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pinned: Option<Vec2>,
}

impl Body {
    fn new(id: String, position: Vec2) -> Self {
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            radius: NODE_RADIUS,
            pinned: None,
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedPolicy {
    Fresh,
    // Survivors keep position and velocity; newcomers sit next to a placed neighbour.
    CarryOver,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    pub alpha: f32,
    pub max_displacement: f32,
    pub moving: bool,
}

struct Scratch {
    forces: Vec<Vec2>,
    positions: Vec<Vec2>,
    radii: Vec<f32>,
}

pub struct LayoutEngine {
    config: LayoutConfig,
    center: Vec2,
    bodies: Vec<Body>,
    index_by_id: HashMap<String, usize>,
    links: Vec<(usize, usize)>,
    alpha: f32,
    alpha_target: f32,
    running: bool,
    scratch: Scratch,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig, center: Vec2) -> Self {
        Self {
            config: config.sanitized(),
            center,
            bodies: Vec::new(),
            index_by_id: HashMap::new(),
            links: Vec::new(),
            alpha: 1.0,
            alpha_target: 0.0,
            running: true,
            scratch: Scratch {
                forces: Vec::new(),
                positions: Vec::new(),
                radii: Vec::new(),
            },
        }
    }

    pub fn config(&self) -> LayoutConfig {
        self.config
    }

    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config.sanitized();
        self.alpha = self.alpha.max(self.config.reheat_target);
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    pub fn reseed(&mut self, model: &GraphModel, policy: SeedPolicy) {
        let mut prior = match policy {
            SeedPolicy::Fresh => HashMap::new(),
            SeedPolicy::CarryOver => std::mem::take(&mut self.bodies)
                .into_iter()
                .map(|body| (body.id.clone(), body))
                .collect::<HashMap<_, _>>(),
        };

        let node_count = model.node_count();
        let mut bodies = Vec::with_capacity(node_count);
        let mut placed = vec![false; node_count];
        let mut carried = 0usize;
        for (index, node) in model.nodes().iter().enumerate() {
            match prior.remove(&node.id) {
                Some(previous) => {
                    let mut body = Body::new(node.id.clone(), previous.position);
                    body.velocity = previous.velocity;
                    bodies.push(body);
                    placed[index] = true;
                    carried += 1;
                }
                None => bodies.push(Body::new(node.id.clone(), Vec2::ZERO)),
            }
        }

        // New nodes attach to a placed neighbour; repeat so chains of new
        // nodes hanging off a survivor are all attached.
        let mut progress = carried > 0;
        while progress {
            progress = false;
            for index in 0..node_count {
                if placed[index] {
                    continue;
                }
                let Some(anchor) = model.neighbors(index).find(|&other| placed[other]) else {
                    continue;
                };
                let offset = Self::attach_offset(&bodies[index].id, index) * (self.config.link_distance * 0.6);
                bodies[index].position = bodies[anchor].position + offset;
                placed[index] = true;
                progress = true;
            }
        }

        for (index, body) in bodies.iter_mut().enumerate() {
            if !placed[index] {
                body.position = self.spiral_position(index);
            }
        }

        self.index_by_id = bodies
            .iter()
            .enumerate()
            .map(|(index, body)| (body.id.clone(), index))
            .collect();
        self.links = model
            .edge_endpoints()
            .iter()
            .copied()
            .filter(|(source, target)| source != target)
            .collect();
        self.bodies = bodies;
        self.alpha = 1.0;
        self.alpha_target = 0.0;

        debug!(
            nodes = node_count,
            links = self.links.len(),
            carried,
            ?policy,
            "reseeded layout"
        );
    }

    fn attach_offset(id: &str, index: usize) -> Vec2 {
        let (jx, jy) = stable_pair(id);
        let direction = vec2(jx, jy);
        if direction.length_sq() <= 0.0001 {
            let angle = ((index as f32) * 0.618_034 + 0.11) * std::f32::consts::TAU;
            vec2(angle.cos(), angle.sin())
        } else {
            direction.normalized()
        }
    }

    fn spiral_position(&self, index: usize) -> Vec2 {
        let golden_angle = PI * (3.0 - 5.0_f32.sqrt());
        let radius = SPIRAL_RADIUS * (0.5 + index as f32).sqrt();
        let angle = index as f32 * golden_angle;
        self.center + vec2(angle.cos(), angle.sin()) * radius
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.index_by_id.clear();
        self.links.clear();
        self.alpha_target = 0.0;
    }

    pub fn tick(&mut self) -> TickReport {
        if !self.running || self.bodies.is_empty() {
            return TickReport {
                alpha: self.alpha,
                max_displacement: 0.0,
                moving: false,
            };
        }

        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        let alpha = self.alpha;
        let config = self.config;
        let body_count = self.bodies.len();

        let scratch = &mut self.scratch;
        scratch.forces.clear();
        scratch.forces.resize(body_count, Vec2::ZERO);
        scratch.positions.clear();
        scratch.radii.clear();
        for body in &self.bodies {
            scratch.positions.push(body.position);
            scratch.radii.push(body.radius);
        }
        let forces = &mut scratch.forces;
        let positions = &scratch.positions;
        let radii = &scratch.radii;

        if body_count > 1
            && let Some(quad) = Quad::build(positions, radii)
        {
            let repulsion = RepulsionParams {
                strength: config.repulsion * alpha,
                theta: config.theta,
            };
            for (index, force) in forces.iter_mut().enumerate() {
                accumulate_repulsion(&quad, index, positions, repulsion, force);
            }

            let collision = CollisionParams {
                spacing: config.collision_spacing,
                strength: config.collision_strength * alpha,
            };
            accumulate_collisions(&quad, &quad, true, positions, radii, collision, forces);
        }

        for &(source, target) in &self.links {
            let delta = positions[target] - positions[source];
            let distance = delta.length();
            if distance <= 0.0001 {
                continue;
            }
            let direction = delta / distance;

            let stretch = (distance - config.link_distance) * config.link_strength * alpha;
            let separating = (self.bodies[target].velocity - self.bodies[source].velocity)
                .dot(direction)
                * config.link_damping;
            let correction = direction * ((stretch + separating) * 0.5);

            forces[source] += correction;
            forces[target] -= correction;
        }

        for (index, force) in forces.iter_mut().enumerate() {
            *force += (self.center - positions[index]) * (config.center_pull * alpha);
        }

        let retained = 1.0 - config.velocity_decay;
        let max_speed_sq = config.max_speed * config.max_speed;
        let mut max_displacement = 0.0_f32;
        let mut free_centroid = Vec2::ZERO;
        let mut free_count = 0usize;
        for (index, body) in self.bodies.iter_mut().enumerate() {
            if let Some(pin) = body.pinned {
                body.position = pin;
                body.velocity = Vec2::ZERO;
                continue;
            }

            let mut velocity = (body.velocity + forces[index]) * retained;
            let speed_sq = velocity.length_sq();
            if speed_sq > max_speed_sq {
                velocity *= config.max_speed / speed_sq.sqrt();
            } else if speed_sq < SLEEP_SPEED_SQ {
                velocity = Vec2::ZERO;
            }

            body.velocity = velocity;
            body.position += velocity;
            max_displacement = max_displacement.max(velocity.length());
            free_centroid += body.position;
            free_count += 1;
        }

        if free_count > 0 {
            free_centroid /= free_count as f32;
            let shift = (self.center - free_centroid) * (config.center_strength * alpha);
            if shift.length_sq() > SLEEP_SPEED_SQ {
                for body in self.bodies.iter_mut().filter(|body| !body.is_pinned()) {
                    body.position += shift;
                }
                max_displacement += shift.length();
            }
        }

        TickReport {
            alpha,
            max_displacement,
            moving: max_displacement > MOTION_EPSILON || !self.is_quiescent(),
        }
    }

    pub fn pin(&mut self, id: &str) -> bool {
        let Some(body) = self.body_mut(id) else {
            return false;
        };
        body.pinned = Some(body.position);
        body.velocity = Vec2::ZERO;
        true
    }

    /// Moves a pinned body. Unpinned bodies are left to the forces.
    pub fn set_pinned_position(&mut self, id: &str, position: Vec2) -> bool {
        let Some(body) = self.body_mut(id) else {
            return false;
        };
        if body.pinned.is_none() {
            return false;
        }
        body.pinned = Some(position);
        body.position = position;
        body.velocity = Vec2::ZERO;
        true
    }

    pub fn unpin(&mut self, id: &str) -> bool {
        let Some(body) = self.body_mut(id) else {
            return false;
        };
        body.pinned.take().is_some()
    }

    pub fn reheat(&mut self) {
        self.alpha_target = self.config.reheat_target;
    }

    pub fn cool(&mut self) {
        self.alpha_target = 0.0;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.alpha_target = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_quiescent(&self) -> bool {
        self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn set_radius(&mut self, id: &str, radius: f32) -> bool {
        let Some(body) = self.body_mut(id) else {
            return false;
        };
        body.radius = radius;
        true
    }

    pub fn reset_radii(&mut self) {
        for body in &mut self.bodies {
            body.radius = NODE_RADIUS;
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn links(&self) -> &[(usize, usize)] {
        &self.links
    }

    pub fn body(&self, id: &str) -> Option<&Body> {
        self.index_by_id.get(id).map(|&index| &self.bodies[index])
    }

    pub fn position(&self, id: &str) -> Option<Vec2> {
        self.body(id).map(|body| body.position)
    }

    fn body_mut(&mut self, id: &str) -> Option<&mut Body> {
        let index = *self.index_by_id.get(id)?;
        self.bodies.get_mut(index)
    }
}
