//! Chase and obstacle-avoidance steering for roaming enemies
//!
//! Two tiers: head straight for the target when the line between the two
//! is clear, otherwise fall back to greedy single-axis movement along the
//! larger delta. This is wall-following, not pathfinding.

use glam::Vec2;

use super::rect::Rect;

/// Side of the probe square sampled along the sight line
const SIGHT_PROBE: f32 = 2.0;

/// True if any unit-spaced sample on the segment `start -> end` lands in
/// an obstacle.
pub fn line_blocked(start: Vec2, end: Vec2, obstacles: &[Rect]) -> bool {
    let delta = end - start;
    let steps = delta.x.abs().max(delta.y.abs()) as u32;
    if steps == 0 {
        return false;
    }
    let step = delta / steps as f32;
    (1..=steps).any(|i| {
        let p = start + step * i as f32;
        let probe = Rect::new(p.x, p.y, SIGHT_PROBE, SIGHT_PROBE);
        obstacles.iter().any(|o| o.overlaps(&probe))
    })
}

/// Straight pursuit velocity toward `to` at `speed`
pub fn direct_velocity(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    let delta = to - from;
    if delta.length_squared() <= f32::EPSILON {
        return Vec2::ZERO;
    }
    let angle = delta.y.atan2(delta.x);
    Vec2::new(angle.cos(), angle.sin()) * speed
}

/// Full-speed movement along whichever axis has the larger delta
pub fn axis_greedy_velocity(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    let delta = to - from;
    if delta.x.abs() > delta.y.abs() {
        Vec2::new(speed.copysign(delta.x), 0.0)
    } else if delta.y != 0.0 {
        Vec2::new(0.0, speed.copysign(delta.y))
    } else {
        Vec2::ZERO
    }
}

/// Pick a chase velocity: direct when the sight line is clear, axis-greedy
/// when it is blocked.
pub fn chase_velocity(from: Vec2, to: Vec2, speed: f32, obstacles: &[Rect]) -> Vec2 {
    if line_blocked(from, to, obstacles) {
        axis_greedy_velocity(from, to, speed)
    } else {
        direct_velocity(from, to, speed)
    }
}
