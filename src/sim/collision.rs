//! Collision resolution against static level geometry
//!
//! Movement is resolved one axis at a time: horizontal displacement is
//! applied and clamped against every overlapped obstacle, then vertical.
//! Resolving the axes independently never lets a box slip diagonally through
//! the corner shared by two obstacles.
//!
//! Long moves are cut into substeps no longer than half the box's smaller
//! side, so a fast mover cannot jump over a thin wall within one tick.

use glam::Vec2;

use super::rect::Rect;

/// Maximum substeps for one sweep
const MAX_SWEEP_STEPS: u32 = 16;

/// Result of a swept move
#[derive(Debug, Clone, Copy)]
pub struct SweepResult {
    /// Collision box after resolution
    pub hitbox: Rect,
    /// A horizontal clamp happened
    pub blocked_x: bool,
    /// A vertical clamp happened
    pub blocked_y: bool,
}

/// Clamp `hitbox` out of every obstacle it overlaps along x, toward the
/// side implied by `vel_x`. Returns true if any clamp happened.
pub fn resolve_x(hitbox: &mut Rect, vel_x: f32, obstacles: &[Rect]) -> bool {
    let mut blocked = false;
    for o in obstacles {
        if hitbox.overlaps(o) {
            if vel_x > 0.0 {
                hitbox.set_right(o.min.x);
                blocked = true;
            } else if vel_x < 0.0 {
                hitbox.set_left(o.max.x);
                blocked = true;
            }
        }
    }
    blocked
}

/// Vertical counterpart of [`resolve_x`]
pub fn resolve_y(hitbox: &mut Rect, vel_y: f32, obstacles: &[Rect]) -> bool {
    let mut blocked = false;
    for o in obstacles {
        if hitbox.overlaps(o) {
            if vel_y > 0.0 {
                hitbox.set_bottom(o.min.y);
                blocked = true;
            } else if vel_y < 0.0 {
                hitbox.set_top(o.max.y);
                blocked = true;
            }
        }
    }
    blocked
}

/// Move `hitbox` by `vel * dt`, x first then y, clamping against `obstacles`
pub fn sweep(hitbox: Rect, vel: Vec2, dt: f32, obstacles: &[Rect]) -> SweepResult {
    let mut result = SweepResult {
        hitbox,
        blocked_x: false,
        blocked_y: false,
    };
    let displacement = vel * dt;
    if hitbox.is_empty() || displacement == Vec2::ZERO || !displacement.is_finite() {
        return result;
    }

    let max_step = (hitbox.width().min(hitbox.height()) * 0.5).max(f32::EPSILON);
    let longest = displacement.x.abs().max(displacement.y.abs());
    let steps = ((longest / max_step).ceil() as u32).clamp(1, MAX_SWEEP_STEPS);
    let step = displacement / steps as f32;

    for _ in 0..steps {
        if step.x != 0.0 {
            result.hitbox = result.hitbox.translated(Vec2::new(step.x, 0.0));
            result.blocked_x |= resolve_x(&mut result.hitbox, step.x, obstacles);
        }
        if step.y != 0.0 {
            result.hitbox = result.hitbox.translated(Vec2::new(0.0, step.y));
            result.blocked_y |= resolve_y(&mut result.hitbox, step.y, obstacles);
        }
    }
    result
}

/// True if `probe` overlaps any obstacle
pub fn overlaps_any(probe: &Rect, obstacles: &[Rect]) -> bool {
    obstacles.iter().any(|o| o.overlaps(probe))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clamps_to_wall_moving_right() {
        let wall = Rect::new(100.0, 0.0, 20.0, 200.0);
        let hb = Rect::new(80.0, 50.0, 10.0, 10.0);
        let r = sweep(hb, Vec2::new(300.0, 0.0), 0.1, &[wall]);
        assert!(r.blocked_x);
        assert_eq!(r.hitbox.max.x, 100.0);
        assert!(!r.hitbox.overlaps(&wall));
    }

    #[test]
    fn test_clamps_to_wall_moving_up() {
        let wall = Rect::new(0.0, 0.0, 200.0, 20.0);
        let hb = Rect::new(50.0, 30.0, 10.0, 10.0);
        let r = sweep(hb, Vec2::new(0.0, -200.0), 0.1, &[wall]);
        assert!(r.blocked_y);
        assert_eq!(r.hitbox.min.y, 20.0);
    }

    #[test]
    fn test_slides_along_wall() {
        // Diagonal into a vertical wall keeps the vertical component
        let wall = Rect::new(100.0, 0.0, 20.0, 200.0);
        let hb = Rect::new(85.0, 50.0, 10.0, 10.0);
        let r = sweep(hb, Vec2::new(100.0, 100.0), 0.1, &[wall]);
        assert!(r.blocked_x);
        assert!(!r.blocked_y);
        assert_eq!(r.hitbox.max.x, 100.0);
        assert!((r.hitbox.min.y - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_no_corner_tunneling() {
        // Two walls meeting at a corner; a diagonal move aimed at the seam
        let right = Rect::new(100.0, 0.0, 50.0, 100.0);
        let below = Rect::new(0.0, 100.0, 100.0, 50.0);
        let hb = Rect::new(88.0, 88.0, 10.0, 10.0);
        let r = sweep(hb, Vec2::new(500.0, 500.0), 0.1, &[right, below]);
        assert!(!r.hitbox.overlaps(&right));
        assert!(!r.hitbox.overlaps(&below));
        assert!(r.hitbox.max.x <= 100.0 && r.hitbox.max.y <= 100.0);
    }

    #[test]
    fn test_no_tunneling_through_thin_wall() {
        let thin = Rect::new(100.0, 0.0, 2.0, 200.0);
        let hb = Rect::new(80.0, 50.0, 10.0, 10.0);
        let r = sweep(hb, Vec2::new(450.0, 0.0), 0.1, &[thin]);
        assert_eq!(r.hitbox.max.x, 100.0);
    }

    #[test]
    fn test_empty_hitbox_does_not_move() {
        let hb = Rect::from_center(Vec2::new(10.0, 10.0), Vec2::ZERO);
        let r = sweep(hb, Vec2::new(100.0, 0.0), 1.0, &[]);
        assert_eq!(r.hitbox, hb);
    }

    fn obstacle() -> impl Strategy<Value = Rect> {
        (0.0f32..400.0, 0.0f32..400.0, 1.0f32..80.0, 1.0f32..80.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_sweep_never_ends_overlapping(
            obstacles in proptest::collection::vec(obstacle(), 0..12),
            x in 0.0f32..400.0,
            y in 0.0f32..400.0,
            w in 4.0f32..40.0,
            h in 4.0f32..40.0,
            vx in -500.0f32..500.0,
            vy in -500.0f32..500.0,
        ) {
            let start = Rect::new(x, y, w, h);
            prop_assume!(!overlaps_any(&start, &obstacles));
            let r = sweep(start, Vec2::new(vx, vy), 1.0 / 60.0, &obstacles);
            prop_assert!(!overlaps_any(&r.hitbox, &obstacles));
        }
    }
}
