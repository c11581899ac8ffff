//! Kinematic body integration
//!
//! Position + velocity with constant downward gravity and an optional
//! terminal velocity. Screen coordinates: +y points down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A falling entity (player or projectile)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicBody {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Cap on downward speed
    pub terminal_velocity: Option<f32>,
    pub grounded: bool,
}

impl KinematicBody {
    pub fn new(pos: Vec2, gravity: f32, terminal_velocity: Option<f32>) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            gravity,
            terminal_velocity,
            grounded: false,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    /// Advance one step using the body's own gravity
    #[inline]
    pub fn step(&mut self, dt: f32) {
        let gravity = self.gravity;
        integrate(self, gravity, dt);
    }

    /// Facing angle along the current velocity
    pub fn heading(&self) -> f32 {
        self.vel.y.atan2(self.vel.x)
    }
}

/// Semi-implicit Euler step: velocity first, then position
pub fn integrate(body: &mut KinematicBody, gravity_scale: f32, dt: f32) {
    body.vel.y += gravity_scale * dt;
    if let Some(terminal) = body.terminal_velocity {
        body.vel.y = body.vel.y.min(terminal);
    }
    body.pos += body.vel * dt;
}
