//! Cloud Gate - a side-scrolling cloud platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, landing, decay, projectiles, game flow)
//! - `level`: Data-driven level layout and physics tuning
//! - `settings`: Player preferences (audio, touch tolerance profile)
//! - `audio`: Event-to-sound-cue mapping for the presentation layer
//! - `demo`: Autopilot input for headless runs

pub mod audio;
pub mod demo;
pub mod level;
pub mod settings;
pub mod sim;

pub use level::{LevelConfig, LevelError};
pub use settings::Settings;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest frame time the runner feeds into the accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Maximum simulation steps per frame
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 3000.0;
    pub const WORLD_HEIGHT: f32 = 1080.0;

    /// Cloud geometry
    pub const PLATFORM_COLLIDER_HEIGHT: f32 = 15.0;
    pub const CLOUD_SPRITE_SCALE: f32 = 1.5;

    /// Player physics
    pub const GRAVITY: f32 = 1000.0;
    pub const TERMINAL_VELOCITY: f32 = 800.0;
    pub const PLAYER_SPEED: f32 = 250.0;
    pub const PLAYER_ACCELERATION: f32 = 1000.0;
    pub const PLAYER_DECELERATION: f32 = 500.0;
    pub const JUMP_VELOCITY: f32 = -550.0;
    /// Vertical input below this counts as "up"
    pub const JUMP_INPUT_THRESHOLD: f32 = -0.5;

    /// Projectile physics
    pub const PROJECTILE_GRAVITY: f32 = 500.0;
    pub const PROJECTILE_TERMINAL: f32 = 600.0;
    pub const PROJECTILE_SPEED: f32 = 350.0;
    pub const PROJECTILE_HIT_RADIUS: f32 = 40.0;
    pub const SPAWN_INTERVAL: f32 = 0.4;

    /// Resources
    pub const PLAYER_MAX_HEALTH: u8 = 3;
    pub const MAX_SHIELD_HEALTH: u8 = 3;

    /// Timers (seconds)
    pub const PLATFORM_DECAY_TIME: f32 = 5.0;
    pub const INVULNERABILITY_TIME: f32 = 2.0;
    pub const DYING_FADE_TIME: f32 = 0.3;
    pub const LEVEL_COMPLETE_DELAY: f32 = 1.0;
}

/// Axis-aligned rectangle described by its center and half extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y - self.half.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y + self.half.y
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.half.y * 2.0
    }

    /// Inclusive overlap test (touching edges count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() <= other.right()
            && self.right() >= other.left()
            && self.top() <= other.bottom()
            && self.bottom() >= other.top()
    }
}

/// Clamp a value to [-1, 1], treating non-finite input as zero
#[inline]
pub fn clamp_unit(v: f32) -> f32 {
    if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 }
}
