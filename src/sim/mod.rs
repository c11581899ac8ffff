//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (level order, projectiles by ID)
//! - No rendering or platform dependencies

pub mod body;
pub mod flow;
pub mod landing;
pub mod platform;
pub mod player;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use body::{KinematicBody, integrate};
pub use flow::Transitions;
pub use landing::{Surface, SurfaceKind, can_land, resolve_landing};
pub use platform::{Gate, Lifecycle, OpacityTier, Platform};
pub use player::Player;
pub use snapshot::Snapshot;
pub use spawner::{Emitter, Projectile, Spawner, ballistic_velocity, predict_target};
pub use state::{FloatingPickup, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
