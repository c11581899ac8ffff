//! Projectile emitter with predictive ballistic aim
//!
//! The emitter lobs a projectile every `spawn_interval` seconds at where the
//! player will be, solving for the launch velocity that lands on that point
//! under projectile gravity. Shots are jittered so they are not perfect.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::KinematicBody;
use crate::level::{EmitterDesc, EmitterPath, Physics, ProjectileBounds};

/// The airborne enemy that fires projectiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emitter {
    pub pos: Vec2,
    home: Vec2,
    pub path: EmitterPath,
    /// False once the key is collected; hidden emitters never fire
    pub visible: bool,
    /// Spin angle (presentation only)
    pub rotation: f32,
}

impl Emitter {
    pub fn from_desc(desc: &EmitterDesc) -> Self {
        Self {
            pos: desc.position,
            home: desc.position,
            path: desc.path,
            visible: true,
            rotation: 0.0,
        }
    }

    /// Reposition along the configured path for a target at `target_x`
    pub fn follow(&mut self, target_x: f32, world_width: f32) {
        if let EmitterPath::FollowTarget { offset_x } = self.path {
            self.pos.x = (target_x + offset_x).clamp(0.0, world_width);
            self.pos.y = self.home.y;
        }
    }

    pub fn spin(&mut self, dt: f32, rate: f32) {
        if self.visible {
            self.rotation = (self.rotation + rate * dt) % std::f32::consts::TAU;
        }
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn reset(&mut self) {
        self.pos = self.home;
        self.visible = true;
        self.rotation = 0.0;
    }
}

/// Fixed-cadence spawn timer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    pub timer: f32,
}

impl Spawner {
    /// Accumulate `dt` and fire a projectile when the interval elapses
    ///
    /// Returns the new projectile body, or `None` when not yet due or when the
    /// emitter is hidden. A hidden emitter does not accumulate time.
    pub fn try_spawn<R: Rng>(
        &mut self,
        dt: f32,
        emitter: &Emitter,
        target: &KinematicBody,
        physics: &Physics,
        rng: &mut R,
    ) -> Option<KinematicBody> {
        if !emitter.visible {
            return None;
        }
        self.timer += dt;
        if self.timer < physics.spawn_interval {
            return None;
        }
        self.timer = 0.0;
        Some(fire(emitter.pos, target, physics, rng))
    }

    pub fn reset(&mut self) {
        self.timer = 0.0;
    }
}

/// Where the target will be after the prediction horizon
///
/// Vertical lead is damped because the target's vertical motion is mostly
/// jumps that reverse.
pub fn predict_target(target: &KinematicBody, horizon: f32, vertical_factor: f32) -> Vec2 {
    Vec2::new(
        target.pos.x + target.vel.x * horizon,
        target.pos.y + target.vel.y * horizon * vertical_factor,
    )
}

/// Launch velocity that reaches `to` from `from` under downward `gravity`
///
/// Flight time is the straight-line distance over `speed`; the vertical
/// component compensates for the drop accumulated over that time.
pub fn ballistic_velocity(from: Vec2, to: Vec2, speed: f32, gravity: f32) -> Vec2 {
    let delta = to - from;
    let distance = delta.length();
    if distance <= f32::EPSILON || speed <= 0.0 {
        return Vec2::ZERO;
    }
    let t = distance / speed;
    Vec2::new(delta.x / t, (delta.y - 0.5 * gravity * t * t) / t)
}

/// Symmetric random perturbation of each component by up to `spread / 2` of its magnitude
pub fn perturb<R: Rng>(vel: Vec2, spread: f32, rng: &mut R) -> Vec2 {
    let jx = rng.random::<f32>() - 0.5;
    let jy = rng.random::<f32>() - 0.5;
    Vec2::new(
        vel.x + jx * vel.x.abs() * spread,
        vel.y + jy * vel.y.abs() * spread,
    )
}

/// Build a projectile body aimed at the target's predicted position
pub fn fire<R: Rng>(origin: Vec2, target: &KinematicBody, physics: &Physics, rng: &mut R) -> KinematicBody {
    let aim = predict_target(target, physics.prediction_horizon, physics.vertical_prediction);
    let vel = ballistic_velocity(origin, aim, physics.projectile_speed, physics.projectile_gravity);
    let vel = perturb(vel, physics.spread, rng);

    let jitter = physics.spawn_jitter.abs();
    let spawn = origin
        + Vec2::new(
            rng.random_range(-jitter.x..=jitter.x),
            rng.random_range(-jitter.y..=jitter.y),
        );

    KinematicBody::new(spawn, physics.projectile_gravity, Some(physics.projectile_terminal)).with_velocity(vel)
}

/// A live projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub body: KinematicBody,
    /// Hit radius around the center
    pub radius: f32,
}

impl Projectile {
    /// Below the floor, beyond the view window centered on `view_x`, or not finite
    pub fn out_of_bounds(&self, view_x: f32, bounds: &ProjectileBounds) -> bool {
        let pos = self.body.pos;
        let reach = bounds.view_half_width + bounds.margin;
        !pos.is_finite() || pos.y > bounds.floor_y || pos.x < view_x - reach || pos.x > view_x + reach
    }

    pub fn hits(&self, point: Vec2) -> bool {
        self.body.pos.distance(point) < self.radius
    }
}
