//! Landing resolution against solid rectangles
//!
//! A body can only land while falling or resting, when it overlaps a surface
//! horizontally (with slack) and its bottom edge crossed the surface top this
//! tick. The bottom is tested as a sweep from the previous tick so a large dt
//! cannot tunnel through a thin cloud; a body whose bottom was already well
//! below the top never lands, which keeps inert clouds fall-through.

use glam::Vec2;

use super::body::KinematicBody;
use crate::Aabb;
use crate::level::{OffLevel, Tolerances};

/// What a body can stand on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Index into the platform list
    Platform(usize),
    Gate,
}

/// A solid rectangle considered for landing this tick
#[derive(Debug, Clone, Copy)]
pub struct Surface {
    pub kind: SurfaceKind,
    pub rect: Aabb,
}

/// Whether a body of half extents `half` can land on `rect`
///
/// `prev_bottom` is the body's bottom edge before this tick's integration.
pub fn can_land(body: &KinematicBody, half: Vec2, prev_bottom: f32, rect: &Aabb, tol: &Tolerances) -> bool {
    if body.vel.y < 0.0 {
        return false;
    }

    let slack = tol.horizontal();
    let left = body.pos.x - half.x;
    let right = body.pos.x + half.x;
    let horizontal = right >= rect.left() - slack && left <= rect.right() + slack;
    if !horizontal {
        return false;
    }

    let bottom = body.pos.y + half.y;
    let reached_top = bottom >= rect.top() - tol.above();
    let started_above = prev_bottom.min(bottom) <= rect.bottom() + tol.below();
    reached_top && started_above
}

/// Ground the body on the highest qualifying surface
///
/// A long step can sweep past several tops; the highest one is the first
/// the bottom edge crossed. Ties go to the earlier surface in `surfaces`.
/// Clears `grounded` first, so a body that walks off an edge or stands on a
/// cloud that just turned inert starts falling on the next tick.
pub fn resolve_landing(
    body: &mut KinematicBody,
    half: Vec2,
    prev_bottom: f32,
    surfaces: &[Surface],
    tol: &Tolerances,
) -> Option<SurfaceKind> {
    body.grounded = false;

    let hit = surfaces
        .iter()
        .filter(|s| can_land(body, half, prev_bottom, &s.rect, tol))
        .min_by(|a, b| a.rect.top().total_cmp(&b.rect.top()))?;

    body.pos.y = hit.rect.top() - half.y;
    body.vel.y = 0.0;
    body.grounded = true;
    Some(hit.kind)
}

/// Y beyond which an ungrounded body is considered off the level
///
/// The lower of the absolute fall limit and `fall_margin` below the lowest
/// surface center.
pub fn fall_threshold(surface_ys: impl IntoIterator<Item = f32>, off: &OffLevel) -> f32 {
    let lowest = surface_ys.into_iter().fold(f32::NEG_INFINITY, f32::max);
    if lowest.is_finite() {
        off.fall_limit_y.min(lowest + off.fall_margin)
    } else {
        off.fall_limit_y
    }
}

/// Ungrounded, past the threshold and out of reach of every solid surface
pub fn is_off_level(
    body: &KinematicBody,
    half: Vec2,
    threshold: f32,
    surfaces: &[Surface],
    off: &OffLevel,
    tol: &Tolerances,
) -> bool {
    if body.grounded || body.pos.y <= threshold {
        return false;
    }
    let bottom = body.pos.y + half.y;
    let near = surfaces.iter().any(|s| {
        (s.rect.center.x - body.pos.x).abs() < off.near_surface_distance
            && bottom <= s.rect.bottom() + tol.below()
    });
    !near
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const HALF: Vec2 = Vec2::new(30.0, 55.0);

    fn cloud_at(x: f32, top: f32) -> Surface {
        Surface {
            kind: SurfaceKind::Platform(0),
            rect: Aabb::new(Vec2::new(x, top + 7.5), Vec2::new(200.0, 15.0)),
        }
    }

    fn body_with_bottom(x: f32, bottom: f32, vy: f32) -> KinematicBody {
        KinematicBody::new(Vec2::new(x, bottom - HALF.y), 1000.0, Some(800.0)).with_velocity(Vec2::new(0.0, vy))
    }

    #[test]
    fn test_lands_and_snaps() {
        let tol = Tolerances::default();
        let surfaces = [cloud_at(200.0, 500.0)];
        let mut body = body_with_bottom(200.0, 503.0, 120.0);
        let hit = resolve_landing(&mut body, HALF, 498.0, &surfaces, &tol);
        assert_eq!(hit, Some(SurfaceKind::Platform(0)));
        assert!(body.grounded);
        assert_eq!(body.vel.y, 0.0);
        assert_eq!(body.pos.y + HALF.y, 500.0);
    }

    #[test]
    fn test_snaps_from_slightly_above() {
        let tol = Tolerances::default();
        let surfaces = [cloud_at(200.0, 500.0)];
        let mut body = body_with_bottom(200.0, 496.0, 0.0);
        assert!(resolve_landing(&mut body, HALF, 496.0, &surfaces, &tol).is_some());
        assert_eq!(body.pos.y + HALF.y, 500.0);
    }

    #[test]
    fn test_too_high_above_does_not_land() {
        let tol = Tolerances::default();
        let surfaces = [cloud_at(200.0, 500.0)];
        let mut body = body_with_bottom(200.0, 490.0, 50.0);
        assert!(resolve_landing(&mut body, HALF, 489.0, &surfaces, &tol).is_none());
        assert!(!body.grounded);
    }

    #[test]
    fn test_far_below_top_falls_through() {
        let tol = Tolerances::default();
        let surfaces = [cloud_at(200.0, 500.0)];
        let mut body = body_with_bottom(200.0, 560.0, 300.0);
        assert!(resolve_landing(&mut body, HALF, 555.0, &surfaces, &tol).is_none());
    }

    #[test]
    fn test_large_step_does_not_tunnel() {
        let tol = Tolerances::default();
        let surfaces = [cloud_at(200.0, 500.0)];
        // Resting at the top, then one huge step carried it 800 units down
        let mut body = body_with_bottom(200.0, 1300.0, 800.0);
        assert!(resolve_landing(&mut body, HALF, 500.0, &surfaces, &tol).is_some());
        assert_eq!(body.pos.y + HALF.y, 500.0);
    }

    #[test]
    fn test_large_step_lands_on_the_upper_of_stacked_clouds() {
        let tol = Tolerances::default();
        let mut upper = cloud_at(200.0, 400.0);
        upper.kind = SurfaceKind::Platform(1);
        // Lower cloud listed first; both tops lie inside this step's sweep
        let surfaces = [cloud_at(200.0, 550.0), upper];
        let mut body = body_with_bottom(200.0, 1200.0, 800.0);
        let hit = resolve_landing(&mut body, HALF, 398.0, &surfaces, &tol);
        assert_eq!(hit, Some(SurfaceKind::Platform(1)));
        assert_eq!(body.pos.y + HALF.y, 400.0);
    }

    #[test]
    fn test_horizontal_tolerance_scales() {
        let surfaces = [cloud_at(200.0, 500.0)];
        // Cloud spans 100..300, body left edge at 315
        let mut body = body_with_bottom(345.0, 501.0, 10.0);
        let desktop = Tolerances::default();
        assert!(resolve_landing(&mut body, HALF, 500.0, &surfaces, &desktop).is_none());
        let touch = Tolerances {
            scale: 2.0,
            ..Default::default()
        };
        let mut body = body_with_bottom(345.0, 501.0, 10.0);
        assert!(resolve_landing(&mut body, HALF, 500.0, &surfaces, &touch).is_some());
    }

    #[test]
    fn test_highest_top_wins() {
        let tol = Tolerances::default();
        let mut gate = cloud_at(200.0, 502.0);
        gate.kind = SurfaceKind::Gate;
        let surfaces = [cloud_at(200.0, 500.0), gate];
        let mut body = body_with_bottom(200.0, 501.0, 10.0);
        let hit = resolve_landing(&mut body, HALF, 499.0, &surfaces, &tol);
        assert_eq!(hit, Some(SurfaceKind::Platform(0)));
        assert_eq!(body.pos.y + HALF.y, 500.0);
    }

    #[test]
    fn test_walking_off_edge_ungrounds() {
        let tol = Tolerances::default();
        let surfaces = [cloud_at(200.0, 500.0)];
        let mut body = body_with_bottom(400.0, 500.0, 0.0);
        body.grounded = true;
        assert!(resolve_landing(&mut body, HALF, 500.0, &surfaces, &tol).is_none());
        assert!(!body.grounded);
    }

    #[test]
    fn test_fall_threshold_uses_lower_limit() {
        let off = OffLevel::default();
        assert_eq!(fall_threshold([550.0, 300.0], &off), 750.0);
        assert_eq!(fall_threshold([950.0], &off), 1000.0);
        assert_eq!(fall_threshold(std::iter::empty(), &off), 1000.0);
    }

    #[test]
    fn test_off_level() {
        let off = OffLevel::default();
        let tol = Tolerances::default();
        let surfaces = [cloud_at(200.0, 500.0)];
        let mut body = body_with_bottom(1000.0, 900.0, 400.0);
        assert!(is_off_level(&body, HALF, 750.0, &surfaces, &off, &tol));
        body.grounded = true;
        assert!(!is_off_level(&body, HALF, 750.0, &surfaces, &off, &tol));
        let above = body_with_bottom(1000.0, 700.0, 400.0);
        assert!(!is_off_level(&above, HALF, 750.0, &surfaces, &off, &tol));
    }

    #[test]
    fn test_near_surface_is_not_off_level() {
        let off = OffLevel::default();
        let tol = Tolerances::default();
        // A deep cloud whose landing window still reaches the body
        let surfaces = [cloud_at(200.0, 820.0)];
        let body = body_with_bottom(220.0, 830.0, 100.0);
        assert!(!is_off_level(&body, HALF, 750.0, &surfaces, &off, &tol));
    }

    proptest! {
        #[test]
        fn prop_never_grounded_while_rising(
            x in 0.0f32..400.0,
            bottom in 480.0f32..520.0,
            vy in -2000.0f32..-0.001,
            scale in 0.5f32..3.0,
        ) {
            let tol = Tolerances { scale, ..Default::default() };
            let surfaces = [cloud_at(200.0, 500.0)];
            let mut body = body_with_bottom(x, bottom, vy);
            prop_assert!(resolve_landing(&mut body, HALF, bottom, &surfaces, &tol).is_none());
            prop_assert!(!body.grounded);
        }
    }
}
