//! Demo autopilot
//!
//! Produces input from a snapshot so the game can play itself in headless
//! runs and attract mode. Heads for the key, then the gate, jumping at cloud
//! edges and raising the shield when a projectile closes in.

use crate::Aabb;
use crate::sim::{GamePhase, Snapshot, TickInput};

/// Projectiles closer than this are treated as incoming
const THREAT_RADIUS: f32 = 110.0;
/// Jump when this close to the edge of the current surface
const EDGE_MARGIN: f32 = 25.0;
/// Dead zone around the horizontal target
const ARRIVE_DISTANCE: f32 = 10.0;

/// Input the autopilot would give for this frame
pub fn autopilot(snap: &Snapshot) -> TickInput {
    match snap.phase {
        GamePhase::Start | GamePhase::GameOver | GamePhase::LevelComplete => {
            return TickInput {
                confirm: true,
                ..Default::default()
            };
        }
        GamePhase::Dying => return TickInput::default(),
        GamePhase::Playing if snap.completing => return TickInput::default(),
        GamePhase::Playing => {}
    }

    let player = &snap.player;
    let target = snap.key.as_ref().map_or(snap.gate.pos, |key| key.pos);
    let dx = target.x - player.pos.x;
    let move_x = if dx.abs() > ARRIVE_DISTANCE { dx.signum() } else { 0.0 };

    // Only shield on the ground; shielding zeroes horizontal speed mid-jump
    if player.grounded && snap.shield > 0 && incoming(snap) {
        return TickInput {
            shield_held: true,
            ..Default::default()
        };
    }

    let target_above = dx.abs() < 60.0 && target.y < player.pos.y - 60.0;
    let jump = player.grounded && (at_edge(snap, move_x) || target_above);

    TickInput {
        move_x,
        move_y: if jump { -1.0 } else { 0.0 },
        ..Default::default()
    }
}

/// Any projectile near the player and still approaching
fn incoming(snap: &Snapshot) -> bool {
    let pos = snap.player.pos;
    snap.projectiles
        .iter()
        .any(|p| p.pos.distance(pos) < THREAT_RADIUS && p.vel.dot(pos - p.pos) > 0.0)
}

/// Standing near the edge of the current surface in the direction of travel
fn at_edge(snap: &Snapshot, direction: f32) -> bool {
    if direction == 0.0 {
        return false;
    }
    let player = &snap.player;
    let bottom = player.pos.y + player.size.y * 0.5;
    let x = player.pos.x;

    let standing_on = |rect: &Aabb| (rect.top() - bottom).abs() < 1.0 && x >= rect.left() && x <= rect.right();
    let surface = snap
        .platforms
        .iter()
        .filter(|p| p.solid)
        .map(|p| p.collider)
        .chain(std::iter::once(snap.gate.collider))
        .find(|rect| standing_on(rect));

    match surface {
        Some(rect) if direction > 0.0 => rect.right() - x < EDGE_MARGIN,
        Some(rect) => x - rect.left() < EDGE_MARGIN,
        None => false,
    }
}
