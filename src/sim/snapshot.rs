//! Read-only view of the game for renderers and tooling
//!
//! Flattened so a presentation layer never needs to reach into simulation
//! types, and serializable so headless runs can dump it.

use glam::Vec2;
use serde::Serialize;

use super::platform::{Lifecycle, OpacityTier};
use super::state::{GamePhase, GameState};
use crate::Aabb;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub grounded: bool,
    pub shielding: bool,
    pub invulnerable: bool,
    /// Remaining invulnerability, drives the damage blink
    pub invulnerable_for: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformView {
    pub id: u32,
    pub pos: Vec2,
    pub visual_size: Vec2,
    pub collider: Aabb,
    pub solid: bool,
    pub lifecycle: Lifecycle,
    pub opacity: OpacityTier,
    pub decay_remaining: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileView {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing along the velocity
    pub rotation: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickupView {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateView {
    pub pos: Vec2,
    pub collider: Aabb,
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmitterView {
    pub pos: Vec2,
    pub visible: bool,
    pub rotation: f32,
}

/// Everything visible about the game at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub completing: bool,
    pub health: u8,
    pub max_health: u8,
    pub shield: u8,
    pub max_shield: u8,
    pub has_key: bool,
    pub gate_open: bool,
    pub player: PlayerView,
    pub platforms: Vec<PlatformView>,
    pub projectiles: Vec<ProjectileView>,
    pub key: Option<PickupView>,
    pub gems: Vec<PickupView>,
    pub gate: GateView,
    pub emitter: EmitterView,
    pub last_landing: Vec2,
    pub world_size: Vec2,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        let player = &self.player;
        let pickup = |p: &super::state::FloatingPickup| PickupView {
            id: p.id,
            pos: p.pos,
            size: p.size,
        };

        Snapshot {
            phase: self.phase,
            completing: self.completing,
            health: player.health,
            max_health: self.config.max_health,
            shield: player.shield,
            max_shield: player.max_shield,
            has_key: player.has_key,
            gate_open: self.gate.open,
            player: PlayerView {
                pos: player.body.pos,
                vel: player.body.vel,
                size: player.size,
                grounded: player.body.grounded,
                shielding: player.shielding,
                invulnerable: player.is_invulnerable(),
                invulnerable_for: player.invulnerable_for,
            },
            platforms: self
                .platforms
                .iter()
                .map(|p| PlatformView {
                    id: p.id,
                    pos: p.pos,
                    visual_size: p.visual_size,
                    collider: p.collider,
                    solid: p.solid,
                    lifecycle: p.lifecycle(),
                    opacity: p.opacity(),
                    decay_remaining: p.decay,
                })
                .collect(),
            projectiles: self
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    id: p.id,
                    pos: p.body.pos,
                    vel: p.body.vel,
                    rotation: p.body.heading(),
                })
                .collect(),
            key: self.key.as_ref().map(pickup),
            gems: self.gems.iter().map(pickup).collect(),
            gate: GateView {
                pos: self.gate.pos,
                collider: self.gate.collider,
                open: self.gate.open,
            },
            emitter: EmitterView {
                pos: self.emitter.pos,
                visible: self.emitter.visible,
                rotation: self.emitter.rotation,
            },
            last_landing: self.last_landing,
            world_size: self.config.world_size,
        }
    }
}
