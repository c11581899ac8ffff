//! Player controller and resource state
//!
//! Input arrives as a normalized movement vector and a shield button. While
//! shielding the player cannot move or jump; otherwise horizontal speed is
//! rate-limited toward the input target and a jump is only possible from the
//! ground.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::KinematicBody;
use crate::Aabb;
use crate::level::Physics;

/// What the controller did this tick (for event notification)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlOutcome {
    pub shield_activated: bool,
    pub shield_released: bool,
    pub jumped: bool,
}

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub body: KinematicBody,
    pub size: Vec2,
    pub health: u8,
    pub shield: u8,
    pub max_shield: u8,
    pub shielding: bool,
    /// Remaining invulnerability (0 when vulnerable)
    pub invulnerable_for: f32,
    pub has_key: bool,
}

impl Player {
    pub fn new(spawn: Vec2, size: Vec2, health: u8, max_shield: u8, physics: &Physics) -> Self {
        Self {
            body: KinematicBody::new(spawn, physics.gravity, Some(physics.terminal_velocity)),
            size,
            health,
            shield: max_shield,
            max_shield,
            shielding: false,
            invulnerable_for: 0.0,
            has_key: false,
        }
    }

    #[inline]
    pub fn half(&self) -> Vec2 {
        self.size * 0.5
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.body.pos.y + self.size.y * 0.5
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.body.pos, self.size)
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_for > 0.0
    }

    /// Count down invulnerability
    pub fn tick_invulnerability(&mut self, dt: f32) {
        if self.invulnerable_for > 0.0 {
            self.invulnerable_for = (self.invulnerable_for - dt).max(0.0);
        }
    }

    /// Translate input into velocity changes
    pub fn apply_input(&mut self, movement: Vec2, shield_held: bool, dt: f32, physics: &Physics) -> ControlOutcome {
        let mut outcome = ControlOutcome::default();

        if shield_held && self.shield > 0 && !self.shielding {
            self.shielding = true;
            outcome.shield_activated = true;
        } else if !shield_held && self.shielding {
            self.shielding = false;
            outcome.shield_released = true;
        }

        if self.shielding {
            self.body.vel.x = 0.0;
            return outcome;
        }

        let vx = self.body.vel.x;
        self.body.vel.x = if movement.x != 0.0 {
            approach(vx, movement.x * physics.max_speed, physics.acceleration * dt)
        } else {
            approach(vx, 0.0, physics.deceleration * dt)
        };

        if movement.y < physics.jump_threshold && self.body.grounded {
            self.body.vel.y = physics.jump_velocity;
            self.body.grounded = false;
            outcome.jumped = true;
        }

        outcome
    }

    /// Keep the player inside the world horizontally and below the top edge
    pub fn clamp_to_world(&mut self, world_size: Vec2) {
        let half = self.half();
        let min_x = half.x;
        let max_x = (world_size.x - half.x).max(min_x);
        if self.body.pos.x < min_x || self.body.pos.x > max_x {
            self.body.pos.x = self.body.pos.x.clamp(min_x, max_x);
            self.body.vel.x = 0.0;
        }
        if self.body.pos.y < half.y {
            self.body.pos.y = half.y;
            self.body.vel.y = self.body.vel.y.max(0.0);
        }
    }
}

/// Move `current` toward `target` by at most `max_delta`
#[inline]
fn approach(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() > max_delta {
        current + delta.signum() * max_delta
    } else {
        target
    }
}
