//! Delayed phase transitions
//!
//! Dying fades to the game-over screen and a cleared level reveals its
//! completion screen after a short delay. Each scheduled transition remembers
//! the generation it was scheduled in; a reset bumps the generation so a
//! transition left over from an earlier attempt is dropped instead of firing
//! into the new one.

use serde::{Deserialize, Serialize};

use super::state::GamePhase;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Scheduled {
    target: GamePhase,
    remaining: f32,
    generation: u32,
}

/// Countdown-driven phase changes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transitions {
    generation: u32,
    queue: Vec<Scheduled>,
}

impl Transitions {
    /// Enter `target` after `delay` seconds
    pub fn schedule(&mut self, target: GamePhase, delay: f32) {
        self.queue.push(Scheduled {
            target,
            remaining: delay.max(0.0),
            generation: self.generation,
        });
    }

    /// Invalidate everything scheduled so far
    pub fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Next live transition, if any
    pub fn pending(&self) -> Option<GamePhase> {
        self.queue
            .iter()
            .find(|s| s.generation == self.generation)
            .map(|s| s.target)
    }

    /// Count down and return the phase whose delay just elapsed
    ///
    /// At most one transition fires per call; stale ones are discarded when due.
    pub fn advance(&mut self, dt: f32) -> Option<GamePhase> {
        for s in &mut self.queue {
            s.remaining -= dt;
        }
        let generation = self.generation;
        self.queue.retain(|s| s.remaining > 0.0 || s.generation == generation);
        let due = self.queue.iter().position(|s| s.remaining <= 0.0)?;
        Some(self.queue.remove(due).target)
    }
}
