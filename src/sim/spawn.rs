//! Safe spawn positions
//!
//! Rejection sampling: pick a random probe square inside the world (inset
//! by a margin) until one overlaps no obstacle. Callers that know the real
//! hitbox pass it as a footprint, which must also land clear and in bounds.
//! Attempts are capped; past the cap the level's fallback position is used
//! instead.

use glam::Vec2;
use rand::Rng;

use super::rect::Rect;
use crate::level::Level;
use crate::tuning::SpawnTuning;

/// Sample up to `max_attempts` probes. Returns the center of the first clear
/// one, or `None` when all were blocked (or the world is too small).
pub fn try_safe_position(level: &Level, tuning: &SpawnTuning, rng: &mut impl Rng) -> Option<Vec2> {
    sample(level, tuning, None, rng)
}

/// Like [`try_safe_position`], but `footprint` (a hitbox placed relative to
/// the origin) must also be clear and inside the world once moved to the
/// sampled position.
pub fn try_clear_position(
    level: &Level,
    tuning: &SpawnTuning,
    footprint: &Rect,
    rng: &mut impl Rng,
) -> Option<Vec2> {
    sample(level, tuning, Some(footprint), rng)
}

fn sample(level: &Level, tuning: &SpawnTuning, footprint: Option<&Rect>, rng: &mut impl Rng) -> Option<Vec2> {
    let bounds = level.bounds();
    let probe = tuning.probe_size;
    let lo = Vec2::splat(tuning.margin);
    let hi = Vec2::new(level.width, level.height) - Vec2::splat(tuning.margin + probe);
    if hi.x < lo.x || hi.y < lo.y {
        return None;
    }

    for _ in 0..tuning.max_attempts {
        let x = rng.random_range(lo.x..=hi.x);
        let y = rng.random_range(lo.y..=hi.y);
        let candidate = Rect::new(x, y, probe, probe);
        if !level.is_clear(&candidate) {
            continue;
        }
        let center = candidate.center();
        let fits = footprint.is_none_or(|f| {
            let placed = f.translated(center);
            level.is_clear(&placed) && inside(&placed, &bounds)
        });
        if fits {
            return Some(center);
        }
    }
    None
}

fn inside(r: &Rect, bounds: &Rect) -> bool {
    r.min.x >= bounds.min.x && r.min.y >= bounds.min.y && r.max.x <= bounds.max.x && r.max.y <= bounds.max.y
}

/// Safe position, falling back to the level's designated spawn point
pub fn safe_position(level: &Level, tuning: &SpawnTuning, rng: &mut impl Rng) -> Vec2 {
    try_safe_position(level, tuning, rng).unwrap_or_else(|| fallback(level, tuning))
}

/// Footprint-aware [`safe_position`]
pub fn clear_position(level: &Level, tuning: &SpawnTuning, footprint: &Rect, rng: &mut impl Rng) -> Vec2 {
    try_clear_position(level, tuning, footprint, rng).unwrap_or_else(|| fallback(level, tuning))
}

fn fallback(level: &Level, tuning: &SpawnTuning) -> Vec2 {
    let fallback = level.fallback_spawn();
    log::warn!(
        "No safe spawn found in {} attempts, using fallback {}",
        tuning.max_attempts,
        fallback
    );
    fallback
}
