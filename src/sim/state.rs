//! Game state and simulation context
//!
//! Everything the simulation mutates lives in `GameState`, owned by the
//! caller and passed to `tick::tick`. Layout comes from the `LevelConfig` so
//! a reset always rebuilds the same starting level.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::flow::Transitions;
use super::landing::{Surface, SurfaceKind, fall_threshold};
use super::platform::{Gate, Platform};
use super::player::Player;
use super::spawner::{Emitter, Projectile, Spawner};
use crate::Aabb;
use crate::level::{LevelConfig, PickupDesc};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for confirm
    Start,
    /// Active gameplay
    Playing,
    /// Death fade, leads to GameOver
    Dying,
    /// Run lost, confirm restarts
    GameOver,
    /// Gate reached, confirm restarts
    LevelComplete,
}

/// Fire-and-forget notifications for the presentation/audio layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted,
    Jumped,
    ShieldActivated,
    ShieldDeactivated,
    /// Shield absorbed a projectile
    ShieldHit { remaining: u8 },
    /// Shield absorbed its last hit
    ShieldBroken,
    PlayerDamaged { health: u8 },
    PlayerDied,
    Respawned,
    PlatformArmed { platform: usize },
    PlatformVanished { platform: usize },
    ProjectileSpawned { id: u32 },
    GemCollected { gem: usize },
    KeyCollected,
    GateOpened,
    /// Player entered the open gate with the key
    LevelCleared,
    GameOverShown,
    LevelCompleteShown,
}

/// A bobbing pickup (key or gem)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingPickup {
    pub id: u32,
    pub origin: Vec2,
    pub pos: Vec2,
    pub size: Vec2,
    /// +1 drifting down, -1 drifting up
    direction: f32,
}

impl FloatingPickup {
    pub fn from_desc(id: u32, desc: &PickupDesc) -> Self {
        Self {
            id,
            origin: desc.position,
            pos: desc.position,
            size: desc.size,
            direction: 1.0,
        }
    }

    /// Drift vertically, reversing at `range` from the origin
    pub fn bob(&mut self, dt: f32, range: f32, speed: f32) {
        if self.pos.y <= self.origin.y - range {
            self.direction = 1.0;
        } else if self.pos.y >= self.origin.y + range {
            self.direction = -1.0;
        }
        self.pos.y += self.direction * speed * dt;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Complete simulation context
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: LevelConfig,
    /// Seed the RNG was created from
    pub seed: u64,
    pub phase: GamePhase,
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub gate: Gate,
    /// `None` once collected
    pub key: Option<FloatingPickup>,
    pub gems: Vec<FloatingPickup>,
    pub emitter: Emitter,
    pub spawner: Spawner,
    /// Live projectiles (sorted by id)
    pub projectiles: Vec<Projectile>,
    /// Level cleared; gameplay frozen until the completion screen shows
    pub completing: bool,
    /// Position of the last surface landed on
    pub last_landing: Vec2,
    /// Seconds of gameplay since the level started
    pub time: f32,
    pub transitions: Transitions,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) fall_threshold: f32,
    next_id: u32,
}

impl GameState {
    /// Create a state for `config` (assumed validated), sitting on the start screen
    pub fn new(config: LevelConfig, seed: u64) -> Self {
        let player = Player::new(
            config.player_spawn,
            config.player_size,
            config.max_health,
            config.max_shield,
            &config.physics,
        );
        let gate = Gate::from_desc(&config.gate);
        let emitter = Emitter::from_desc(&config.emitter);
        let mut state = Self {
            seed,
            phase: GamePhase::Start,
            player,
            platforms: Vec::new(),
            gate,
            key: None,
            gems: Vec::new(),
            emitter,
            spawner: Spawner::default(),
            projectiles: Vec::new(),
            completing: false,
            last_landing: config.player_spawn,
            time: 0.0,
            transitions: Transitions::default(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            fall_threshold: 0.0,
            next_id: 1,
            config,
        };
        state.reset_level();
        state
    }

    /// Rebuild every entity from the level layout and return to the start screen
    ///
    /// Also invalidates any pending delayed transition.
    pub fn reset_level(&mut self) {
        let config = &self.config;
        self.player = Player::new(
            config.player_spawn,
            config.player_size,
            config.max_health,
            config.max_shield,
            &config.physics,
        );
        self.platforms = config
            .platforms
            .iter()
            .enumerate()
            .map(|(i, desc)| Platform::from_desc(i as u32, desc, config.timings.platform_decay))
            .collect();
        self.gate = Gate::from_desc(&config.gate);
        self.key = Some(FloatingPickup::from_desc(0, &config.key));
        self.gems = config
            .gems
            .iter()
            .enumerate()
            .map(|(i, desc)| FloatingPickup::from_desc(i as u32, desc))
            .collect();
        self.emitter = Emitter::from_desc(&config.emitter);
        self.spawner.reset();
        self.projectiles.clear();
        self.completing = false;
        self.last_landing = config.player_spawn;
        self.time = 0.0;
        self.fall_threshold = fall_threshold(self.platforms.iter().map(|p| p.collider.center.y), &config.off_level);
        self.next_id = 1;
        self.transitions.invalidate();
        self.phase = GamePhase::Start;
        log::info!(
            "Level reset: {} platforms, {} gems, fall threshold y={}",
            self.platforms.len(),
            self.gems.len(),
            self.fall_threshold
        );
    }

    /// Full reset and enter Playing
    pub fn start(&mut self) {
        self.reset_level();
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::GameStarted);
        log::info!("Game started (seed {})", self.seed);
    }

    /// Put the player back at the spawn point with full resources
    ///
    /// Clouds become solid again; if the key was held it is returned to the
    /// level along with the emitter, and the gate closes. Collected gems stay
    /// collected. Grants a fresh invulnerability window.
    pub fn respawn(&mut self) {
        let config = &self.config;
        self.player.body.pos = config.player_spawn;
        self.player.body.vel = Vec2::ZERO;
        self.player.body.grounded = false;
        self.player.health = config.max_health;
        self.player.shield = config.max_shield;
        self.player.shielding = false;
        self.player.invulnerable_for = config.timings.invulnerability;

        for platform in &mut self.platforms {
            platform.reset();
        }

        if self.player.has_key {
            self.player.has_key = false;
            self.gate.open = false;
            if self.key.is_none() {
                self.key = Some(FloatingPickup::from_desc(0, &config.key));
            }
            self.emitter.reset();
        }

        self.projectiles.clear();
        self.spawner.reset();
        self.completing = false;
        self.transitions.invalidate();
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Respawned);
        log::info!("Player respawned");
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Events raised by the most recent step
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take the events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Surfaces that can currently be landed on: solid clouds, then the gate
    pub fn solid_surfaces(&self) -> Vec<Surface> {
        self.platforms
            .iter()
            .enumerate()
            .filter(|(_, p)| p.solid)
            .map(|(i, p)| Surface {
                kind: SurfaceKind::Platform(i),
                rect: p.collider,
            })
            .chain(std::iter::once(Surface {
                kind: SurfaceKind::Gate,
                rect: self.gate.collider,
            }))
            .collect()
    }

    pub fn fall_threshold(&self) -> f32 {
        self.fall_threshold
    }
}
