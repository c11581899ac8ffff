//! Level layout and tuning
//!
//! One data structure describes the whole level: where the clouds, gate, key
//! and gems sit, how the emitter moves, and every physics constant. Loaded
//! from JSON or built from `Default` with the `with_*` helpers.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Aabb;
use crate::consts::*;

/// Collision box relative to an entity's position, independent of its visual size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColliderDesc {
    pub size: Vec2,
    /// Offset of the collider center from the entity position
    #[serde(default)]
    pub offset: Vec2,
}

impl ColliderDesc {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            offset: Vec2::ZERO,
        }
    }

    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.offset = Vec2::new(x, y);
        self
    }

    /// World-space rectangle for a collider attached at `position`
    pub fn rect_at(&self, position: Vec2) -> Aabb {
        Aabb::new(position + self.offset, self.size)
    }

    fn is_valid(&self) -> bool {
        self.size.is_finite() && self.size.x > 0.0 && self.size.y > 0.0 && self.offset.is_finite()
    }
}

/// A cloud platform placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformDesc {
    pub position: Vec2,
    /// Rendered size (presentation only)
    pub visual_size: Vec2,
    pub collider: ColliderDesc,
}

impl PlatformDesc {
    /// A cloud with a flat collider `width` wide, drawn at the collider width
    pub fn new(x: f32, y: f32, width: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            visual_size: Vec2::new(width, 100.0),
            collider: ColliderDesc::new(width, PLATFORM_COLLIDER_HEIGHT),
        }
    }

    /// Draw from a `width` x `height` sprite, enlarged by `CLOUD_SPRITE_SCALE`
    pub fn with_sprite(mut self, width: f32, height: f32) -> Self {
        self.visual_size = Vec2::new(width, height) * CLOUD_SPRITE_SCALE;
        self
    }
}

/// The exit gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateDesc {
    pub position: Vec2,
    pub collider: ColliderDesc,
}

/// A floating pickup (key or gem)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickupDesc {
    pub position: Vec2,
    pub size: Vec2,
}

impl PickupDesc {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Vec2::splat(50.0),
        }
    }
}

/// How the projectile emitter moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EmitterPath {
    /// Stays at its configured position
    Fixed,
    /// Tracks the target horizontally at its configured height
    FollowTarget { offset_x: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmitterDesc {
    pub position: Vec2,
    pub path: EmitterPath,
}

/// Physics constants (units per second, units per second squared)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    pub jump_velocity: f32,
    pub jump_threshold: f32,
    pub projectile_gravity: f32,
    pub projectile_terminal: f32,
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    pub spawn_interval: f32,
    /// Seconds of target velocity to lead shots by
    pub prediction_horizon: f32,
    /// Fraction of the horizon applied to vertical lead
    pub vertical_prediction: f32,
    /// Total width of the random velocity perturbation (0.15 = +/-7.5%)
    pub spread: f32,
    /// Random spawn point offset around the emitter
    pub spawn_jitter: Vec2,
    /// Pickup bobbing amplitude and speed
    pub float_range: f32,
    pub float_speed: f32,
    /// Emitter spin (radians per second, presentation only)
    pub emitter_spin: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            terminal_velocity: TERMINAL_VELOCITY,
            max_speed: PLAYER_SPEED,
            acceleration: PLAYER_ACCELERATION,
            deceleration: PLAYER_DECELERATION,
            jump_velocity: JUMP_VELOCITY,
            jump_threshold: JUMP_INPUT_THRESHOLD,
            projectile_gravity: PROJECTILE_GRAVITY,
            projectile_terminal: PROJECTILE_TERMINAL,
            projectile_speed: PROJECTILE_SPEED,
            projectile_radius: PROJECTILE_HIT_RADIUS,
            spawn_interval: SPAWN_INTERVAL,
            prediction_horizon: 1.0,
            vertical_prediction: 0.5,
            spread: 0.15,
            spawn_jitter: Vec2::new(15.0, 10.0),
            float_range: 10.0,
            float_speed: 20.0,
            emitter_spin: 0.5,
        }
    }
}

/// Countdown durations (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub platform_decay: f32,
    pub invulnerability: f32,
    pub dying_fade: f32,
    pub complete_delay: f32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            platform_decay: PLATFORM_DECAY_TIME,
            invulnerability: INVULNERABILITY_TIME,
            dying_fade: DYING_FADE_TIME,
            complete_delay: LEVEL_COMPLETE_DELAY,
        }
    }
}

/// Landing tolerances, before the display scale is applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Horizontal slack and depth below a surface top that still lands
    pub base: f32,
    /// Height above a surface top that still snaps down
    pub snap_above: f32,
    /// Device/display factor (2.0 for touch controls)
    pub scale: f32,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            base: 10.0,
            snap_above: 5.0,
            scale: 1.0,
        }
    }
}

impl Tolerances {
    #[inline]
    pub fn horizontal(&self) -> f32 {
        self.base * self.scale
    }

    #[inline]
    pub fn below(&self) -> f32 {
        self.base * self.scale
    }

    #[inline]
    pub fn above(&self) -> f32 {
        self.snap_above * self.scale
    }
}

/// Parameters of the off-level (fell off the clouds) predicate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffLevel {
    /// Absolute fall limit
    pub fall_limit_y: f32,
    /// Distance below the lowest surface that also counts as off-level
    pub fall_margin: f32,
    /// Horizontal center distance within which a surface still counts as near
    pub near_surface_distance: f32,
}

impl Default for OffLevel {
    fn default() -> Self {
        Self {
            fall_limit_y: 1000.0,
            fall_margin: 200.0,
            near_surface_distance: 150.0,
        }
    }
}

/// Where projectiles are culled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileBounds {
    pub floor_y: f32,
    /// Half-width of the view window centered on the player
    pub view_half_width: f32,
    pub margin: f32,
}

impl Default for ProjectileBounds {
    fn default() -> Self {
        Self {
            floor_y: 1100.0,
            view_half_width: 600.0,
            margin: 200.0,
        }
    }
}

/// Complete description of a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub world_size: Vec2,
    pub player_spawn: Vec2,
    pub player_size: Vec2,
    pub max_health: u8,
    pub max_shield: u8,
    pub platforms: Vec<PlatformDesc>,
    pub gate: GateDesc,
    pub key: PickupDesc,
    pub gems: Vec<PickupDesc>,
    pub emitter: EmitterDesc,
    pub physics: Physics,
    pub timings: Timings,
    pub tolerances: Tolerances,
    pub off_level: OffLevel,
    pub projectile_bounds: ProjectileBounds,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            world_size: Vec2::new(WORLD_WIDTH, WORLD_HEIGHT),
            player_spawn: Vec2::new(150.0, 480.0),
            player_size: Vec2::new(60.0, 110.0),
            max_health: PLAYER_MAX_HEALTH,
            max_shield: MAX_SHIELD_HEALTH,
            // Clouds climb left to right toward the gate; colliders are wider
            // than the drawn sprites
            platforms: vec![
                PlatformDesc::new(200.0, 550.0, 400.0).with_sprite(200.0, 70.0),
                PlatformDesc::new(550.0, 500.0, 350.0).with_sprite(180.0, 65.0),
                PlatformDesc::new(850.0, 450.0, 350.0).with_sprite(175.0, 60.0),
                PlatformDesc::new(1150.0, 400.0, 380.0).with_sprite(190.0, 70.0),
                PlatformDesc::new(1450.0, 350.0, 340.0).with_sprite(170.0, 60.0),
                PlatformDesc::new(1750.0, 300.0, 350.0).with_sprite(175.0, 65.0),
                PlatformDesc::new(2050.0, 250.0, 360.0).with_sprite(180.0, 60.0),
                PlatformDesc::new(2350.0, 200.0, 400.0).with_sprite(200.0, 70.0),
            ],
            gate: GateDesc {
                position: Vec2::new(2700.0, 300.0),
                collider: ColliderDesc::new(200.0, 20.0),
            },
            key: PickupDesc::at(1750.0, 230.0),
            gems: vec![
                PickupDesc::at(550.0, 350.0),
                PickupDesc::at(1150.0, 250.0),
                PickupDesc::at(2050.0, 100.0),
            ],
            emitter: EmitterDesc {
                position: Vec2::new(500.0, 100.0),
                path: EmitterPath::FollowTarget { offset_x: 0.0 },
            },
            physics: Physics::default(),
            timings: Timings::default(),
            tolerances: Tolerances::default(),
            off_level: OffLevel::default(),
            projectile_bounds: ProjectileBounds::default(),
        }
    }
}

impl LevelConfig {
    /// Parse and validate a level from JSON
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let config: Self = serde_json::from_str(json).map_err(LevelError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        // Plain data with no maps or non-string keys; serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn with_platforms(mut self, platforms: Vec<PlatformDesc>) -> Self {
        self.platforms = platforms;
        self
    }

    pub fn with_gems(mut self, gems: Vec<PickupDesc>) -> Self {
        self.gems = gems;
        self
    }

    pub fn with_key(mut self, key: PickupDesc) -> Self {
        self.key = key;
        self
    }

    pub fn with_gate(mut self, position: Vec2, collider: ColliderDesc) -> Self {
        self.gate = GateDesc { position, collider };
        self
    }

    pub fn with_emitter(mut self, position: Vec2, path: EmitterPath) -> Self {
        self.emitter = EmitterDesc { position, path };
        self
    }

    pub fn with_spawn(mut self, spawn: Vec2) -> Self {
        self.player_spawn = spawn;
        self
    }

    pub fn with_physics(mut self, physics: Physics) -> Self {
        self.physics = physics;
        self
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    /// Apply a device/display factor to the landing tolerances
    pub fn with_tolerance_scale(mut self, scale: f32) -> Self {
        self.tolerances.scale = scale;
        self
    }

    /// Check the level for values the simulation cannot work with
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.max_health == 0 {
            return Err(LevelError::InvalidResource("max_health"));
        }
        if !(self.world_size.is_finite() && self.world_size.x > 0.0 && self.world_size.y > 0.0) {
            return Err(LevelError::InvalidPosition("world_size"));
        }
        let positions = [
            ("player_spawn", self.player_spawn),
            ("gate", self.gate.position),
            ("key", self.key.position),
            ("emitter", self.emitter.position),
        ];
        for (name, position) in positions {
            if !position.is_finite() {
                return Err(LevelError::InvalidPosition(name));
            }
        }
        if self.gems.iter().any(|g| !g.position.is_finite()) {
            return Err(LevelError::InvalidPosition("gem"));
        }
        if matches!(self.emitter.path, EmitterPath::FollowTarget { offset_x } if !offset_x.is_finite()) {
            return Err(LevelError::InvalidPosition("emitter offset_x"));
        }

        if self.platforms.is_empty() {
            return Err(LevelError::NoPlatforms);
        }
        for (i, platform) in self.platforms.iter().enumerate() {
            if !platform.collider.is_valid() || !platform.position.is_finite() {
                return Err(LevelError::InvalidCollider(format!("platform {}", i)));
            }
        }
        if !self.gate.collider.is_valid() {
            return Err(LevelError::InvalidCollider("gate".into()));
        }
        if !(self.player_size.is_finite() && self.player_size.x > 0.0 && self.player_size.y > 0.0) {
            return Err(LevelError::InvalidCollider("player".into()));
        }
        let mut pickups = std::iter::once(&self.key).chain(self.gems.iter());
        if pickups.any(|p| !(p.size.is_finite() && p.size.x > 0.0 && p.size.y > 0.0)) {
            return Err(LevelError::InvalidCollider("pickup".into()));
        }

        let p = &self.physics;
        let positive = [
            ("terminal_velocity", p.terminal_velocity),
            ("max_speed", p.max_speed),
            ("acceleration", p.acceleration),
            ("deceleration", p.deceleration),
            ("projectile_terminal", p.projectile_terminal),
            ("projectile_speed", p.projectile_speed),
            ("projectile_radius", p.projectile_radius),
            ("spawn_interval", p.spawn_interval),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(LevelError::InvalidPhysics(name));
            }
        }
        if !(p.gravity.is_finite() && p.gravity >= 0.0) {
            return Err(LevelError::InvalidPhysics("gravity"));
        }
        if !(p.projectile_gravity.is_finite() && p.projectile_gravity >= 0.0) {
            return Err(LevelError::InvalidPhysics("projectile_gravity"));
        }
        if !(p.jump_velocity.is_finite() && p.jump_velocity < 0.0) {
            return Err(LevelError::InvalidPhysics("jump_velocity"));
        }
        let non_negative = [
            ("prediction_horizon", p.prediction_horizon),
            ("vertical_prediction", p.vertical_prediction),
            ("spread", p.spread),
            ("spawn_jitter.x", p.spawn_jitter.x),
            ("spawn_jitter.y", p.spawn_jitter.y),
            ("float_range", p.float_range),
            ("float_speed", p.float_speed),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(LevelError::InvalidPhysics(name));
            }
        }
        // Spawn offsets are sampled from -j..=j, whose width must stay finite
        if !(p.spawn_jitter * 2.0).is_finite() {
            return Err(LevelError::InvalidPhysics("spawn_jitter"));
        }
        if !p.jump_threshold.is_finite() {
            return Err(LevelError::InvalidPhysics("jump_threshold"));
        }
        if !p.emitter_spin.is_finite() {
            return Err(LevelError::InvalidPhysics("emitter_spin"));
        }

        let t = &self.timings;
        let durations = [
            ("platform_decay", t.platform_decay),
            ("invulnerability", t.invulnerability),
            ("dying_fade", t.dying_fade),
            ("complete_delay", t.complete_delay),
        ];
        for (name, value) in durations {
            if !(value.is_finite() && value > 0.0) {
                return Err(LevelError::InvalidDuration(name));
            }
        }
        let tol = &self.tolerances;
        if !(tol.scale.is_finite() && tol.scale > 0.0) {
            return Err(LevelError::InvalidPhysics("tolerance scale"));
        }
        if !(tol.base.is_finite() && tol.base >= 0.0) || !(tol.snap_above.is_finite() && tol.snap_above >= 0.0) {
            return Err(LevelError::InvalidPhysics("tolerances"));
        }

        let off = &self.off_level;
        if !(off.fall_limit_y.is_finite() && off.fall_margin.is_finite()) {
            return Err(LevelError::InvalidPosition("off_level"));
        }
        if !(off.near_surface_distance.is_finite() && off.near_surface_distance >= 0.0) {
            return Err(LevelError::InvalidPhysics("near_surface_distance"));
        }
        let b = &self.projectile_bounds;
        let extent = |v: f32| v.is_finite() && v >= 0.0;
        if !(b.floor_y.is_finite() && extent(b.view_half_width) && extent(b.margin)) {
            return Err(LevelError::InvalidPosition("projectile_bounds"));
        }
        Ok(())
    }
}

/// Why a level could not be loaded
#[derive(Debug)]
pub enum LevelError {
    Parse(serde_json::Error),
    NoPlatforms,
    InvalidCollider(String),
    InvalidPhysics(&'static str),
    InvalidDuration(&'static str),
    InvalidPosition(&'static str),
    /// A health or shield capacity the player cannot play with
    InvalidResource(&'static str),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Parse(e) => write!(f, "level JSON is malformed: {}", e),
            LevelError::NoPlatforms => write!(f, "level has no platforms"),
            LevelError::InvalidCollider(what) => write!(f, "{} has an empty or non-finite collider", what),
            LevelError::InvalidPhysics(name) => write!(f, "physics value `{}` is out of range", name),
            LevelError::InvalidDuration(name) => write!(f, "duration `{}` must be positive", name),
            LevelError::InvalidPosition(name) => write!(f, "`{}` is not a finite position", name),
            LevelError::InvalidResource(name) => write!(f, "`{}` must be at least 1", name),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Parse(e) => Some(e),
            _ => None,
        }
    }
}
