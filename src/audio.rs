//! Sound cue selection
//!
//! The simulation emits `GameEvent`s; this module decides which of them make
//! a sound and how loud. Playback itself belongs to the host.

use serde::Serialize;

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SoundEffect {
    /// Player left the ground
    Jump,
    ShieldActivate,
    /// Shield absorbed a projectile
    ShieldHit,
    /// Player lost health
    PlayerHit,
    PlayerDeath,
    GemCollect,
    KeyCollect,
    GateOpen,
    /// Emitter fired
    ProjectileSpawn,
    LevelComplete,
    GameOver,
    /// Menu confirm
    ButtonClick,
}

impl SoundEffect {
    /// Asset name for the host's sound bank
    pub fn asset(&self) -> &'static str {
        match self {
            SoundEffect::Jump => "jump",
            SoundEffect::ShieldActivate => "shield_activate",
            SoundEffect::ShieldHit => "shield_hit",
            SoundEffect::PlayerHit => "player_hit",
            SoundEffect::PlayerDeath => "player_death",
            SoundEffect::GemCollect => "gem",
            SoundEffect::KeyCollect => "key",
            SoundEffect::GateOpen => "gate_open",
            SoundEffect::ProjectileSpawn => "fireball_spawn",
            SoundEffect::LevelComplete => "level_complete",
            SoundEffect::GameOver => "game_over",
            SoundEffect::ButtonClick => "button_click",
        }
    }

    /// Mix level before the player's sfx volume is applied
    pub fn base_volume(&self) -> f32 {
        match self {
            SoundEffect::Jump => 0.6,
            SoundEffect::ShieldActivate => 0.5,
            SoundEffect::ShieldHit => 0.6,
            SoundEffect::PlayerHit => 0.7,
            SoundEffect::PlayerDeath => 0.8,
            SoundEffect::GemCollect => 0.6,
            SoundEffect::KeyCollect => 0.7,
            SoundEffect::GateOpen => 0.5,
            SoundEffect::ProjectileSpawn => 0.3,
            SoundEffect::LevelComplete => 0.8,
            SoundEffect::GameOver => 0.6,
            SoundEffect::ButtonClick => 1.0,
        }
    }
}

/// The sound an event should trigger, if any
pub fn cue_for(event: &GameEvent) -> Option<SoundEffect> {
    let effect = match event {
        GameEvent::GameStarted => SoundEffect::ButtonClick,
        GameEvent::Jumped => SoundEffect::Jump,
        GameEvent::ShieldActivated => SoundEffect::ShieldActivate,
        GameEvent::ShieldHit { .. } => SoundEffect::ShieldHit,
        GameEvent::PlayerDamaged { .. } => SoundEffect::PlayerHit,
        GameEvent::PlayerDied => SoundEffect::PlayerDeath,
        GameEvent::GemCollected { .. } => SoundEffect::GemCollect,
        GameEvent::KeyCollected => SoundEffect::KeyCollect,
        GameEvent::GateOpened => SoundEffect::GateOpen,
        GameEvent::ProjectileSpawned { .. } => SoundEffect::ProjectileSpawn,
        GameEvent::LevelCompleteShown => SoundEffect::LevelComplete,
        GameEvent::GameOverShown => SoundEffect::GameOver,
        _ => return None,
    };
    Some(effect)
}

/// A sound to play at a given volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cue {
    pub effect: SoundEffect,
    pub volume: f32,
}

/// Volume state for sound effects and music
#[derive(Debug, Clone)]
pub struct AudioManager {
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl AudioManager {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            muted: !settings.audio_enabled,
        }
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Flip mute. Returns true when audio is now enabled.
    pub fn toggle(&mut self) -> bool {
        self.muted = !self.muted;
        log::info!("Audio {}", if self.muted { "muted" } else { "enabled" });
        !self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Background music volume, zero while muted
    pub fn music_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.music_volume }
    }

    /// Playback volume for `effect`, `None` when silent
    pub fn volume_for(&self, effect: SoundEffect) -> Option<f32> {
        if self.muted {
            return None;
        }
        let vol = effect.base_volume() * self.sfx_volume;
        (vol > 0.0).then_some(vol)
    }

    /// Cues to play for a batch of events, in event order
    pub fn cues(&self, events: &[GameEvent]) -> Vec<Cue> {
        events
            .iter()
            .filter_map(cue_for)
            .filter_map(|effect| self.volume_for(effect).map(|volume| Cue { effect, volume }))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_scales_with_settings() {
        let audio = AudioManager::default();
        let vol = audio.volume_for(SoundEffect::Jump).unwrap();
        assert!((vol - 0.6 * 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_toggle_mutes_everything() {
        let mut audio = AudioManager::default();
        assert!(!audio.toggle());
        assert!(audio.is_muted());
        assert_eq!(audio.volume_for(SoundEffect::GameOver), None);
        assert_eq!(audio.music_volume(), 0.0);
        assert!(audio.toggle());
        assert_eq!(audio.music_volume(), 0.5);
    }

    #[test]
    fn test_disabled_in_settings_starts_muted() {
        let settings = Settings {
            audio_enabled: false,
            ..Default::default()
        };
        assert!(AudioManager::from_settings(&settings).is_muted());
    }

    #[test]
    fn test_zero_volume_is_silent() {
        let mut audio = AudioManager::default();
        audio.set_sfx_volume(0.0);
        assert!(audio.cues(&[GameEvent::Jumped]).is_empty());
    }

    #[test]
    fn test_cues_follow_event_order() {
        let audio = AudioManager::default();
        let events = [
            GameEvent::PlatformArmed { platform: 0 },
            GameEvent::KeyCollected,
            GameEvent::GateOpened,
            GameEvent::ShieldDeactivated,
        ];
        let effects: Vec<_> = audio.cues(&events).iter().map(|c| c.effect).collect();
        assert_eq!(effects, vec![SoundEffect::KeyCollect, SoundEffect::GateOpen]);
    }

    #[test]
    fn test_damage_and_shield_cues() {
        assert_eq!(cue_for(&GameEvent::PlayerDamaged { health: 2 }), Some(SoundEffect::PlayerHit));
        assert_eq!(cue_for(&GameEvent::ShieldHit { remaining: 1 }), Some(SoundEffect::ShieldHit));
        assert_eq!(cue_for(&GameEvent::Respawned), None);
    }
}
