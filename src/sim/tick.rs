//! Simulation tick
//!
//! One call advances the whole game by `dt`. Order within a Playing tick:
//! player control, integration, cloud decay, landing, pickups bobbing,
//! projectiles, spawning, collisions, off-level check.

use glam::Vec2;

use super::landing::{SurfaceKind, is_off_level, resolve_landing};
use super::spawner::Projectile;
use super::state::{GameEvent, GamePhase, GameState};
use crate::clamp_unit;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Horizontal stick / keys, -1 (left) to 1 (right)
    pub move_x: f32,
    /// Vertical stick / keys, -1 (up) to 1 (down)
    pub move_y: f32,
    /// Shield button held
    pub shield_held: bool,
    /// Start / restart (click, tap, enter)
    pub confirm: bool,
}

impl TickInput {
    /// Movement vector with each axis clamped to [-1, 1]
    pub fn movement(&self) -> Vec2 {
        let raw = Vec2::new(self.move_x, self.move_y);
        let clamped = Vec2::new(clamp_unit(raw.x), clamp_unit(raw.y));
        if clamped != raw {
            log::warn!("Movement input {raw} out of range, clamped to {clamped}");
        }
        clamped
    }
}

/// Advance the game state by `dt` seconds
///
/// Negative or non-finite `dt` is treated as zero. Events raised during this
/// call are available from `GameState::events` until the next call.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    let dt = if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        log::warn!("Ignoring invalid dt {dt}");
        0.0
    };

    if let Some(phase) = state.transitions.advance(dt) {
        enter_phase(state, phase);
    }

    match state.phase {
        GamePhase::Start | GamePhase::GameOver | GamePhase::LevelComplete => {
            if input.confirm {
                state.start();
            }
            return;
        }
        GamePhase::Dying => return,
        GamePhase::Playing => {}
    }

    // Cleared: frozen until the completion screen
    if state.completing {
        return;
    }

    state.time += dt;
    let prev_bottom = update_player(state, input, dt);
    update_platforms(state, dt);
    land_player(state, prev_bottom);
    update_pickups(state, dt);
    update_projectiles(state, dt);
    collect_pickups(state);
    apply_projectile_hits(state);

    let surfaces = state.solid_surfaces();
    let config = &state.config;
    if is_off_level(
        &state.player.body,
        state.player.half(),
        state.fall_threshold,
        &surfaces,
        &config.off_level,
        &config.tolerances,
    ) {
        log::info!("Player fell off the level at {}", state.player.body.pos);
        kill_player(state);
    }

    let spin = state.config.physics.emitter_spin;
    state.emitter.spin(dt, spin);
}

fn enter_phase(state: &mut GameState, phase: GamePhase) {
    state.phase = phase;
    match phase {
        GamePhase::GameOver => {
            state.events.push(GameEvent::GameOverShown);
            log::info!("Game over");
        }
        GamePhase::LevelComplete => {
            state.events.push(GameEvent::LevelCompleteShown);
            log::info!("Level complete after {:.1}s", state.time);
        }
        _ => {}
    }
}

/// Control and integrate the player; returns the bottom edge before moving
fn update_player(state: &mut GameState, input: &TickInput, dt: f32) -> f32 {
    state.player.tick_invulnerability(dt);

    let outcome = state
        .player
        .apply_input(input.movement(), input.shield_held, dt, &state.config.physics);
    if outcome.shield_activated {
        state.events.push(GameEvent::ShieldActivated);
    }
    if outcome.shield_released {
        state.events.push(GameEvent::ShieldDeactivated);
    }
    if outcome.jumped {
        state.events.push(GameEvent::Jumped);
    }

    let prev_bottom = state.player.bottom();
    state.player.body.step(dt);
    state.player.clamp_to_world(state.config.world_size);
    prev_bottom
}

fn update_platforms(state: &mut GameState, dt: f32) {
    for (i, platform) in state.platforms.iter_mut().enumerate() {
        if platform.update(dt) {
            log::debug!("Cloud {i} vanished");
            state.events.push(GameEvent::PlatformVanished { platform: i });
        }
    }
}

fn land_player(state: &mut GameState, prev_bottom: f32) {
    let surfaces = state.solid_surfaces();
    let half = state.player.half();

    let Some(kind) = resolve_landing(
        &mut state.player.body,
        half,
        prev_bottom,
        &surfaces,
        &state.config.tolerances,
    ) else {
        return;
    };

    match kind {
        SurfaceKind::Platform(i) => {
            let platform = &mut state.platforms[i];
            if platform.arm() {
                log::debug!("Cloud {i} armed");
                state.events.push(GameEvent::PlatformArmed { platform: i });
            }
            state.last_landing = platform.pos;
        }
        SurfaceKind::Gate => state.last_landing = state.gate.pos,
    }
}

fn update_pickups(state: &mut GameState, dt: f32) {
    let physics = &state.config.physics;
    let (range, speed) = (physics.float_range, physics.float_speed);
    if let Some(key) = state.key.as_mut() {
        key.bob(dt, range, speed);
    }
    for gem in &mut state.gems {
        gem.bob(dt, range, speed);
    }
}

fn update_projectiles(state: &mut GameState, dt: f32) {
    for projectile in &mut state.projectiles {
        projectile.body.step(dt);
    }

    let view_x = state.player.body.pos.x;
    let bounds = state.config.projectile_bounds;
    state.projectiles.retain(|p| !p.out_of_bounds(view_x, &bounds));

    let world_width = state.config.world_size.x;
    state.emitter.follow(view_x, world_width);

    let spawned = state.spawner.try_spawn(
        dt,
        &state.emitter,
        &state.player.body,
        &state.config.physics,
        &mut state.rng,
    );
    if let Some(body) = spawned {
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            body,
            radius: state.config.physics.projectile_radius,
        });
        state.events.push(GameEvent::ProjectileSpawned { id });
    }
}

fn collect_pickups(state: &mut GameState) {
    let bounds = state.player.bounds();

    let mut collected = Vec::new();
    state.gems.retain(|gem| {
        let hit = bounds.overlaps(&gem.bounds());
        if hit {
            collected.push(gem.id as usize);
        }
        !hit
    });
    for gem in collected {
        state.player.shield = state.player.max_shield;
        log::debug!("Gem {gem} collected, shield restored");
        state.events.push(GameEvent::GemCollected { gem });
    }

    if state.key.as_ref().is_some_and(|key| bounds.overlaps(&key.bounds())) {
        state.key = None;
        state.player.has_key = true;
        state.emitter.hide();
        state.projectiles.clear();
        state.events.push(GameEvent::KeyCollected);
        log::info!("Key collected");
        if state.gate.unlock() {
            state.events.push(GameEvent::GateOpened);
            log::info!("Gate opened");
        }
    }

    if state.player.has_key && state.gate.open && bounds.overlaps(&state.gate.collider) {
        state.completing = true;
        state.projectiles.clear();
        state.events.push(GameEvent::LevelCleared);
        let delay = state.config.timings.complete_delay;
        state.transitions.schedule(GamePhase::LevelComplete, delay);
        log::info!("Gate reached, level cleared");
    }
}

fn apply_projectile_hits(state: &mut GameState) {
    if state.completing {
        return;
    }

    let center = state.player.body.pos;
    let invulnerability = state.config.timings.invulnerability;
    let player = &mut state.player;
    let events = &mut state.events;

    state.projectiles.retain(|projectile| {
        if !projectile.hits(center) {
            return true;
        }
        if player.shielding && player.shield > 0 {
            player.shield -= 1;
            events.push(GameEvent::ShieldHit {
                remaining: player.shield,
            });
            if player.shield == 0 {
                player.shielding = false;
                events.push(GameEvent::ShieldBroken);
            }
            return false;
        }
        if player.is_invulnerable() {
            // Passes through while blinking
            return true;
        }
        player.health = player.health.saturating_sub(1);
        player.invulnerable_for = invulnerability;
        events.push(GameEvent::PlayerDamaged {
            health: player.health,
        });
        false
    });

    if state.player.health == 0 {
        kill_player(state);
    }
}

/// Enter Dying once; repeated calls in the same attempt do nothing
fn kill_player(state: &mut GameState) {
    if state.phase != GamePhase::Playing || state.completing {
        return;
    }
    state.phase = GamePhase::Dying;
    state.player.shielding = false;
    state.events.push(GameEvent::PlayerDied);
    let fade = state.config.timings.dying_fade;
    state.transitions.schedule(GamePhase::GameOver, fade);
    log::info!("Player died (health {})", state.player.health);
}
