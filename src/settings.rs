//! Player settings and preferences
//!
//! Read at startup from a small JSON file kept apart from level data. The
//! core never writes it back.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Master audio switch
    pub audio_enabled: bool,

    // === Input ===
    /// Touch input: doubles the landing tolerances
    pub touch_controls: bool,
    /// Display scale multiplier applied on top of the input profile
    pub display_scale: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sfx_volume: 0.7,
            music_volume: 0.5,
            audio_enabled: true,
            touch_controls: false,
            display_scale: 1.0,
        }
    }
}

impl Settings {
    /// Multiplier for the landing tolerance window
    pub fn landing_tolerance_scale(&self) -> f32 {
        let profile = if self.touch_controls { 2.0 } else { 1.0 };
        profile * self.display_scale
    }

    /// Clamp volumes to [0, 1] and replace a non-positive display scale
    pub fn sanitized(mut self) -> Self {
        let unit = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        self.sfx_volume = unit(self.sfx_volume);
        self.music_volume = unit(self.music_volume);
        if !(self.display_scale.is_finite() && self.display_scale > 0.0) {
            log::warn!("Invalid display scale {}, using 1.0", self.display_scale);
            self.display_scale = 1.0;
        }
        self
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("Using default settings ({}: {e})", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str::<Settings>(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Err(e) => {
                log::warn!("Ignoring malformed settings in {}: {e}", path.display());
                Self::default()
            }
        }
    }
}
