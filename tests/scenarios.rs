//! End-to-end gameplay scenarios against the public API

use cloud_gate::LevelConfig;
use cloud_gate::consts::SIM_DT;
use cloud_gate::level::{PlatformDesc, Tolerances};
use cloud_gate::sim::{GameEvent, GamePhase, GameState, Projectile, TickInput, tick};
use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn playing(seed: u64) -> GameState {
    let mut state = GameState::new(LevelConfig::default(), seed);
    state.start();
    state
}

fn stand_on_cloud(state: &mut GameState, index: usize) {
    let rect = state.platforms[index].collider;
    state.player.body.pos = Vec2::new(rect.center.x, rect.top() - state.player.half().y);
    state.player.body.vel = Vec2::ZERO;
    state.player.body.grounded = true;
}

fn stand_on_gate(state: &mut GameState) {
    let rect = state.gate.collider;
    state.player.body.pos = Vec2::new(rect.center.x, rect.top() - state.player.half().y);
    state.player.body.vel = Vec2::ZERO;
    state.player.body.grounded = true;
}

/// A motionless projectile sitting on the player
fn projectile_on_player(state: &mut GameState, id: u32) {
    let mut body = state.player.body;
    body.gravity = 0.0;
    body.vel = Vec2::ZERO;
    body.grounded = false;
    state.projectiles.push(Projectile { id, body, radius: 40.0 });
}

fn idle(state: &mut GameState, dt: f32) {
    tick(state, &TickInput::default(), dt);
}

#[test]
fn landing_with_a_huge_step_arms_the_cloud() {
    let mut state = playing(1);
    stand_on_cloud(&mut state, 0);
    assert_eq!(state.config.physics.gravity, 1000.0);

    idle(&mut state, 1.0);
    assert!(state.player.body.grounded);
    assert_eq!(state.player.body.vel.y, 0.0);
    assert_eq!(state.platforms[0].decay, Some(state.config.timings.platform_decay));
    assert_eq!(state.last_landing, state.platforms[0].pos);
}

#[test]
fn huge_step_past_stacked_clouds_lands_on_the_upper_one() {
    let lower = PlatformDesc::new(200.0, 550.0, 200.0);
    let upper = PlatformDesc::new(200.0, 400.0, 200.0);
    let mut state = GameState::new(LevelConfig::default().with_platforms(vec![lower, upper]), 12);
    state.start();
    state.emitter.hide();

    let top = state.platforms[1].collider.top();
    state.player.body.pos = Vec2::new(200.0, top - 2.0 - state.player.half().y);
    state.player.body.vel = Vec2::ZERO;
    idle(&mut state, 1.0);

    assert!(state.player.body.grounded);
    assert_eq!(state.player.bottom(), top);
    assert_eq!(state.platforms[1].decay, Some(state.config.timings.platform_decay));
    assert_eq!(state.platforms[0].decay, None);
}

#[test]
fn shielded_hit_costs_shield_not_health() {
    let mut state = playing(2);
    stand_on_cloud(&mut state, 0);
    state.emitter.hide();
    let shield = TickInput {
        shield_held: true,
        ..Default::default()
    };
    tick(&mut state, &shield, SIM_DT);
    assert!(state.player.shielding);

    projectile_on_player(&mut state, 100);
    tick(&mut state, &shield, SIM_DT);
    assert_eq!(state.player.shield, 2);
    assert!(state.player.shielding);
    assert!(!state.player.is_invulnerable());
    assert_eq!(state.player.health, 3);
}

#[test]
fn last_unshielded_hit_starts_dying() {
    let mut state = playing(3);
    stand_on_cloud(&mut state, 0);
    state.emitter.hide();
    state.player.health = 1;
    projectile_on_player(&mut state, 100);

    idle(&mut state, SIM_DT);
    assert_eq!(state.player.health, 0);
    assert_eq!(state.phase, GamePhase::Dying);
}

#[test]
fn second_hit_at_zero_health_does_not_die_again() {
    let mut state = playing(4);
    stand_on_cloud(&mut state, 0);
    state.emitter.hide();
    state.player.health = 1;
    projectile_on_player(&mut state, 100);
    idle(&mut state, SIM_DT);
    assert!(state.events().contains(&GameEvent::PlayerDied));

    projectile_on_player(&mut state, 101);
    state.player.invulnerable_for = 0.0;
    idle(&mut state, SIM_DT);
    assert!(!state.events().contains(&GameEvent::PlayerDied));
    assert_eq!(state.player.health, 0);
    assert_eq!(state.phase, GamePhase::Dying);
}

#[test]
fn gate_needs_the_key() {
    let mut state = playing(5);
    state.emitter.hide();
    stand_on_gate(&mut state);
    for _ in 0..120 {
        idle(&mut state, SIM_DT);
    }
    assert_eq!(state.phase, GamePhase::Playing);
    assert!(!state.completing);

    // Collect the key
    let key = state.key.as_ref().map(|k| k.pos).unwrap_or_default();
    state.player.body.pos = key;
    idle(&mut state, SIM_DT);
    assert!(state.player.has_key);
    assert!(state.gate.open);

    stand_on_gate(&mut state);
    idle(&mut state, SIM_DT);
    assert!(state.completing);
    assert!(state.events().contains(&GameEvent::LevelCleared));
    assert_eq!(state.phase, GamePhase::Playing);

    let delay = state.config.timings.complete_delay;
    let steps = (delay / SIM_DT).ceil() as usize + 1;
    let mut shown = false;
    for _ in 0..steps {
        idle(&mut state, SIM_DT);
        shown |= state.events().contains(&GameEvent::LevelCompleteShown);
    }
    assert!(shown);
    assert_eq!(state.phase, GamePhase::LevelComplete);
}

#[test]
fn hidden_emitter_never_spawns() {
    let mut state = playing(6);
    state.emitter.hide();
    for _ in 0..50 {
        stand_on_cloud(&mut state, 0);
        idle(&mut state, 2.0);
        assert!(state.projectiles.is_empty());
        assert!(!state.events().iter().any(|e| matches!(e, GameEvent::ProjectileSpawned { .. })));
    }
    assert_eq!(state.spawner.timer, 0.0);
}

#[test]
fn reset_restores_the_initial_level() {
    let mut state = GameState::new(LevelConfig::default(), 7);
    let initial = state.snapshot();

    state.start();
    let right = TickInput {
        move_x: 1.0,
        ..Default::default()
    };
    let jump = TickInput {
        move_x: 1.0,
        move_y: -1.0,
        ..Default::default()
    };
    for i in 0..400 {
        tick(&mut state, if i % 40 == 0 { &jump } else { &right }, SIM_DT);
    }
    state.reset_level();

    assert_eq!(state.snapshot(), initial);
    assert_eq!(state.phase, GamePhase::Start);
}

#[test]
fn restart_from_game_over_drops_stale_transition() {
    let mut state = playing(8);
    stand_on_cloud(&mut state, 0);
    state.emitter.hide();
    state.player.health = 1;
    projectile_on_player(&mut state, 100);
    idle(&mut state, SIM_DT);
    assert_eq!(state.phase, GamePhase::Dying);

    idle(&mut state, 0.5);
    assert_eq!(state.phase, GamePhase::GameOver);

    let confirm = TickInput {
        confirm: true,
        ..Default::default()
    };
    tick(&mut state, &confirm, SIM_DT);
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.player.health, 3);
    for _ in 0..60 {
        idle(&mut state, SIM_DT);
        assert_ne!(state.phase, GamePhase::GameOver);
    }
}

#[test]
fn respawn_mid_fade_cancels_game_over() {
    let mut state = playing(9);
    stand_on_cloud(&mut state, 0);
    state.emitter.hide();
    state.player.health = 1;
    projectile_on_player(&mut state, 100);
    idle(&mut state, SIM_DT);
    assert_eq!(state.phase, GamePhase::Dying);

    state.respawn();
    for _ in 0..60 {
        idle(&mut state, SIM_DT);
    }
    assert_ne!(state.phase, GamePhase::GameOver);
}

#[test]
fn touch_profile_widens_landing() {
    let config = LevelConfig::default().with_tolerance_scale(2.0);
    assert_eq!(
        config.tolerances,
        Tolerances {
            scale: 2.0,
            ..Default::default()
        }
    );

    let mut state = GameState::new(config, 10);
    state.start();
    state.emitter.hide();
    // Just past the right edge of cloud 0, inside the doubled slack
    let rect = state.platforms[0].collider;
    let half = state.player.half();
    state.player.body.pos = Vec2::new(rect.right() + half.x + 15.0, rect.top() - half.y - 1.0);
    idle(&mut state, SIM_DT);
    assert!(state.player.body.grounded);
}

#[test]
fn same_seed_same_run() {
    let run = |seed| {
        let mut state = playing(seed);
        let mut rng = Pcg32::seed_from_u64(99);
        for _ in 0..600 {
            use rand::Rng;
            let input = TickInput {
                move_x: rng.random_range(-1.0..=1.0),
                move_y: if rng.random::<f32>() < 0.05 { -1.0 } else { 0.0 },
                shield_held: rng.random::<f32>() < 0.1,
                confirm: false,
            };
            tick(&mut state, &input, SIM_DT);
        }
        state.snapshot()
    };
    assert_eq!(run(11), run(11));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_resources_stay_in_range_and_death_is_once(
        seed in any::<u64>(),
        inputs in proptest::collection::vec(
            (-1.5f32..1.5, -1.5f32..1.5, any::<bool>(), 0.0f32..0.05),
            1..400,
        ),
    ) {
        let mut state = playing(seed);
        let max_health = state.config.max_health;
        let max_shield = state.config.max_shield;
        let mut deaths = 0;
        let mut died = false;

        for (move_x, move_y, shield_held, dt) in inputs {
            let input = TickInput { move_x, move_y, shield_held, confirm: false };
            tick(&mut state, &input, dt);

            deaths += state.events().iter().filter(|e| **e == GameEvent::PlayerDied).count();
            prop_assert!(state.player.health <= max_health);
            prop_assert!(state.player.shield <= max_shield);
            if state.player.health == 0 {
                prop_assert_ne!(state.phase, GamePhase::Playing);
            }
            if died {
                prop_assert_ne!(state.phase, GamePhase::Playing);
            }
            died |= deaths > 0;
            if state.player.body.grounded {
                prop_assert!(state.player.body.vel.y >= 0.0);
            }
        }
        prop_assert!(deaths <= 1);
    }
}
