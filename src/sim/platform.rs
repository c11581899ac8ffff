//! Decaying cloud platforms and the exit gate
//!
//! A cloud is solid until the player first lands on it. Landing arms a
//! countdown; the cloud fades in steps and stops colliding once the
//! countdown runs out. Only a full level reset makes it solid again.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Aabb;
use crate::level::{GateDesc, PlatformDesc};

/// Lifecycle stage derived from the decay timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Never landed on
    Untouched,
    /// Armed, still in the full-opacity window
    Armed,
    /// Armed and visibly fading
    Fading,
    /// Timer expired, no longer collides
    Inert,
}

/// Step-wise opacity for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpacityTier {
    Full,
    Faded,
    Faint,
}

impl OpacityTier {
    pub fn alpha(&self) -> f32 {
        match self {
            OpacityTier::Full => 1.0,
            OpacityTier::Faded => 0.6,
            OpacityTier::Faint => 0.2,
        }
    }
}

/// A cloud platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub pos: Vec2,
    pub visual_size: Vec2,
    pub collider: Aabb,
    pub solid: bool,
    /// Remaining decay time, `None` until first landing
    pub decay: Option<f32>,
    /// Armed duration
    pub decay_total: f32,
}

impl Platform {
    pub fn from_desc(id: u32, desc: &PlatformDesc, decay_total: f32) -> Self {
        Self {
            id,
            pos: desc.position,
            visual_size: desc.visual_size,
            collider: desc.collider.rect_at(desc.position),
            solid: true,
            decay: None,
            decay_total,
        }
    }

    /// Start the countdown if it was never started. Returns true when armed now.
    pub fn arm(&mut self) -> bool {
        if self.decay.is_some() {
            return false;
        }
        self.decay = Some(self.decay_total);
        true
    }

    /// Advance the countdown. Returns true on the tick the cloud turns inert.
    pub fn update(&mut self, dt: f32) -> bool {
        let Some(remaining) = self.decay.as_mut() else {
            return false;
        };
        if *remaining <= 0.0 {
            return false;
        }
        *remaining -= dt;
        if *remaining <= 0.0 {
            self.solid = false;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.solid = true;
        self.decay = None;
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match self.decay {
            None => Lifecycle::Untouched,
            Some(t) if t <= 0.0 => Lifecycle::Inert,
            Some(t) if t > self.decay_total * 0.8 => Lifecycle::Armed,
            Some(_) => Lifecycle::Fading,
        }
    }

    pub fn opacity(&self) -> OpacityTier {
        match self.decay {
            None => OpacityTier::Full,
            Some(t) if t > self.decay_total * 0.8 => OpacityTier::Full,
            Some(t) if t > self.decay_total * 0.4 => OpacityTier::Faded,
            Some(_) => OpacityTier::Faint,
        }
    }
}

/// The exit gate: always solid, opens once when the key is collected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub pos: Vec2,
    pub collider: Aabb,
    pub open: bool,
}

impl Gate {
    pub fn from_desc(desc: &GateDesc) -> Self {
        Self {
            pos: desc.position,
            collider: desc.collider.rect_at(desc.position),
            open: false,
        }
    }

    /// Open the gate. Returns false if it was already open.
    pub fn unlock(&mut self) -> bool {
        !std::mem::replace(&mut self.open, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cloud() -> Platform {
        Platform::from_desc(1, &PlatformDesc::new(200.0, 550.0, 200.0), 5.0)
    }

    #[test]
    fn test_untouched_cloud_is_solid_and_opaque() {
        let mut p = cloud();
        assert!(!p.update(10.0));
        assert!(p.solid);
        assert_eq!(p.lifecycle(), Lifecycle::Untouched);
        assert_eq!(p.opacity(), OpacityTier::Full);
    }

    #[test]
    fn test_arm_only_once() {
        let mut p = cloud();
        assert!(p.arm());
        p.update(1.0);
        assert!(!p.arm());
        assert_eq!(p.decay, Some(4.0));
    }

    #[test]
    fn test_opacity_tiers() {
        let mut p = cloud();
        p.arm();
        assert_eq!(p.opacity(), OpacityTier::Full);
        assert_eq!(p.lifecycle(), Lifecycle::Armed);
        p.update(1.5); // 3.5 left
        assert_eq!(p.opacity(), OpacityTier::Faded);
        assert_eq!(p.lifecycle(), Lifecycle::Fading);
        p.update(2.0); // 1.5 left
        assert_eq!(p.opacity(), OpacityTier::Faint);
        assert!(p.solid);
        assert!(p.update(2.0));
        assert!(!p.solid);
        assert_eq!(p.opacity(), OpacityTier::Faint);
        assert_eq!(p.lifecycle(), Lifecycle::Inert);
    }

    #[test]
    fn test_inert_stays_inert_until_reset() {
        let mut p = cloud();
        p.arm();
        p.update(6.0);
        assert!(!p.solid);
        assert!(!p.update(1.0));
        assert!(!p.arm());
        assert!(!p.solid);
        p.reset();
        assert!(p.solid);
        assert_eq!(p.lifecycle(), Lifecycle::Untouched);
    }

    #[test]
    fn test_gate_opens_once() {
        let desc = GateDesc {
            position: Vec2::new(2700.0, 300.0),
            collider: crate::level::ColliderDesc::new(200.0, 20.0),
        };
        let mut gate = Gate::from_desc(&desc);
        assert!(gate.unlock());
        assert!(!gate.unlock());
        assert!(gate.open);
    }

    proptest! {
        #[test]
        fn prop_decay_monotonic(dts in proptest::collection::vec(0.001f32..1.0, 1..100)) {
            let mut p = cloud();
            p.arm();
            let mut flips = 0;
            let mut last = p.decay.unwrap();
            let mut was_solid = p.solid;
            for dt in dts {
                if p.update(dt) {
                    flips += 1;
                }
                let now = p.decay.unwrap();
                if last > 0.0 {
                    prop_assert!(now < last);
                } else {
                    prop_assert_eq!(now, last);
                }
                if !was_solid {
                    prop_assert!(!p.solid);
                }
                was_solid = p.solid;
                last = now;
            }
            prop_assert!(flips <= 1);
            prop_assert_eq!(p.solid, last > 0.0);
        }
    }
}
