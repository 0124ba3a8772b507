//! Bomb lifecycle
//!
//! One entity walks a strictly forward state machine:
//! `OnGround -> Carried -> InFlight -> Exploding -> Removed`.
//! Every transition method is guarded by the current state and returns
//! `false` when it does not apply, so a repeated trigger never changes
//! anything. Area damage is reported through a single
//! [`HazardEvent::Detonated`], emitted only on the `InFlight -> Exploding`
//! edge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::anim::{Clip, Facing, FrameRef};
use super::enemy::Enemy;
use super::entity::EntityId;
use super::rect::Rect;
use crate::timer_elapsed;
use crate::tuning::HazardTuning;

/// Hazard state with per-state data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HazardState {
    /// Idle pickup bobbing around `base_y`
    OnGround { base_y: f32, float_time: f32 },
    /// Attached to the player
    Carried,
    /// Thrown, fuse running since the throw
    InFlight { vel: Vec2, fuse_elapsed: f32 },
    /// Explosion animation running
    Exploding { elapsed: f32 },
    /// Finished; the owning collection drops it
    Removed,
}

/// Data-free state tag, ordered along the lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HazardPhase {
    OnGround,
    Carried,
    InFlight,
    Exploding,
    Removed,
}

/// Something the orchestrator must react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HazardEvent {
    /// Fuse ran out at `center`; resolve area damage now
    Detonated { center: Vec2 },
    /// Explosion finished; the hazard is gone
    Expired,
}

/// A bomb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: EntityId,
    /// Center position
    pos: Vec2,
    size: Vec2,
    state: HazardState,
}

impl Hazard {
    /// New ground pickup centered at `center`. `float_phase` offsets the
    /// bobbing animation.
    pub fn new(id: EntityId, center: Vec2, float_phase: f32, tuning: &HazardTuning) -> Self {
        Self {
            id,
            pos: center,
            size: tuning.size,
            state: HazardState::OnGround {
                base_y: center.y,
                float_time: float_phase,
            },
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn state(&self) -> HazardState {
        self.state
    }

    pub fn phase(&self) -> HazardPhase {
        match self.state {
            HazardState::OnGround { .. } => HazardPhase::OnGround,
            HazardState::Carried => HazardPhase::Carried,
            HazardState::InFlight { .. } => HazardPhase::InFlight,
            HazardState::Exploding { .. } => HazardPhase::Exploding,
            HazardState::Removed => HazardPhase::Removed,
        }
    }

    pub fn is_on_ground(&self) -> bool {
        self.phase() == HazardPhase::OnGround
    }

    pub fn is_removed(&self) -> bool {
        self.phase() == HazardPhase::Removed
    }

    pub fn hitbox(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    /// `OnGround -> Carried`
    pub fn pick_up(&mut self) -> bool {
        if !self.is_on_ground() {
            return false;
        }
        self.state = HazardState::Carried;
        true
    }

    /// `Carried -> InFlight`, released at `origin` travelling horizontally
    /// toward `facing`
    pub fn throw(&mut self, origin: Vec2, facing: Facing, tuning: &HazardTuning) -> bool {
        if self.phase() != HazardPhase::Carried {
            return false;
        }
        self.pos = origin;
        self.state = HazardState::InFlight {
            vel: Vec2::new(tuning.throw_speed * facing.sign(), 0.0),
            fuse_elapsed: 0.0,
        };
        true
    }

    /// `InFlight -> Exploding`, ahead of the fuse
    pub fn detonate(&mut self) -> Option<HazardEvent> {
        if self.phase() != HazardPhase::InFlight {
            return None;
        }
        self.state = HazardState::Exploding { elapsed: 0.0 };
        log::debug!("Bomb {} exploded at {}", self.id.0, self.pos);
        Some(HazardEvent::Detonated { center: self.pos })
    }

    /// Advance one tick. `carrier` is where a carried bomb should sit.
    pub fn update(
        &mut self,
        dt: f32,
        carrier: Option<Vec2>,
        bounds: &Rect,
        tuning: &HazardTuning,
    ) -> Option<HazardEvent> {
        match &mut self.state {
            HazardState::OnGround { base_y, float_time } => {
                *float_time += dt;
                self.pos.y = *base_y + (*float_time * tuning.float_speed).sin() * tuning.float_range;
                None
            }
            HazardState::Carried => {
                if let Some(anchor) = carrier {
                    self.pos = anchor;
                }
                None
            }
            HazardState::InFlight { vel, fuse_elapsed } => {
                let half = self.size * 0.5;
                self.pos = (self.pos + *vel * dt).clamp(bounds.min + half, bounds.max - half);
                *fuse_elapsed += dt;
                if timer_elapsed(*fuse_elapsed, tuning.fuse) {
                    return self.detonate();
                }
                None
            }
            HazardState::Exploding { elapsed } => {
                *elapsed += dt;
                if timer_elapsed(*elapsed, tuning.explosion_duration) {
                    self.state = HazardState::Removed;
                    return Some(HazardEvent::Expired);
                }
                None
            }
            HazardState::Removed => None,
        }
    }

    /// Frame the renderer should draw
    pub fn frame(&self, tuning: &HazardTuning) -> FrameRef {
        match self.state {
            HazardState::Exploding { elapsed } => {
                let frames = tuning.explosion_frames.max(1);
                let progress = (elapsed / tuning.explosion_duration).clamp(0.0, 1.0);
                FrameRef {
                    clip: Clip::Explosion,
                    facing: Facing::Right,
                    index: ((progress * frames as f32) as usize).min(frames - 1),
                }
            }
            _ => FrameRef {
                clip: Clip::BombIdle,
                facing: Facing::Right,
                index: 0,
            },
        }
    }
}

/// Deal `damage` to every live enemy whose collision box center lies within
/// `radius` of `center`. Returns how many were hit.
pub fn apply_blast(center: Vec2, radius: f32, damage: u32, enemies: &mut [Enemy]) -> usize {
    let mut hit = 0;
    for enemy in enemies.iter_mut().filter(|e| e.is_alive()) {
        if enemy.hitbox().center().distance(center) <= radius {
            enemy.take_damage(damage);
            hit += 1;
        }
    }
    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn bounds() -> Rect {
        Rect::new(0.0, 0.0, 2000.0, 2000.0)
    }

    fn bomb(t: &HazardTuning) -> Hazard {
        Hazard::new(EntityId(1), Vec2::new(500.0, 500.0), 0.0, t)
    }

    #[test]
    fn test_floats_around_base() {
        let t = Tuning::default().hazard;
        let mut b = bomb(&t);
        for _ in 0..120 {
            b.update(DT, None, &bounds(), &t);
            assert!((b.pos().y - 500.0).abs() <= t.float_range + 1e-3);
            assert_eq!(b.pos().x, 500.0);
        }
    }

    #[test]
    fn test_full_lifecycle_timing() {
        let t = Tuning::default().hazard;
        let mut b = bomb(&t);
        assert!(b.pick_up());
        assert!(!b.pick_up());
        b.update(DT, Some(Vec2::new(300.0, 300.0)), &bounds(), &t);
        assert_eq!(b.pos(), Vec2::new(300.0, 300.0));

        assert!(b.throw(Vec2::new(300.0, 290.0), Facing::Left, &t));
        assert!(!b.throw(Vec2::ZERO, Facing::Right, &t));

        let mut detonated = 0;
        for i in 1..=60 {
            if let Some(HazardEvent::Detonated { center }) = b.update(DT, None, &bounds(), &t) {
                detonated += 1;
                assert_eq!(i, 60);
                assert!((center.x - 150.0).abs() < 0.1);
            }
        }
        assert_eq!(detonated, 1);
        assert_eq!(b.phase(), HazardPhase::Exploding);

        let mut expired_at = None;
        for i in 1..=30 {
            if b.update(DT, None, &bounds(), &t) == Some(HazardEvent::Expired) {
                expired_at = Some(i);
            }
        }
        assert_eq!(expired_at, Some(15));
        assert!(b.is_removed());
    }

    #[test]
    fn test_double_detonate_is_noop() {
        let t = Tuning::default().hazard;
        let mut b = bomb(&t);
        assert!(b.detonate().is_none());
        b.pick_up();
        b.throw(Vec2::new(500.0, 500.0), Facing::Right, &t);
        assert!(b.detonate().is_some());
        assert!(b.detonate().is_none());
        assert_eq!(b.phase(), HazardPhase::Exploding);
    }

    #[test]
    fn test_flight_stays_in_bounds() {
        let t = Tuning::default().hazard;
        let mut b = bomb(&t);
        b.pick_up();
        b.throw(Vec2::new(1990.0, 500.0), Facing::Right, &t);
        b.update(0.5, None, &bounds(), &t);
        assert_eq!(b.hitbox().max.x, 2000.0);
    }

    #[test]
    fn test_explosion_frames_cover_clip() {
        let t = Tuning::default().hazard;
        let mut b = bomb(&t);
        b.pick_up();
        b.throw(Vec2::new(500.0, 500.0), Facing::Right, &t);
        b.detonate();
        assert_eq!(b.frame(&t).index, 0);
        b.update(0.2, None, &bounds(), &t);
        let f = b.frame(&t);
        assert_eq!(f.clip, Clip::Explosion);
        assert_eq!(f.index, 4);
    }

    #[test]
    fn test_blast_hits_only_in_radius() {
        let tuning = Tuning::default();
        let mut enemies: Vec<Enemy> = [0.0, 50.0, 89.0, 91.0, 300.0]
            .iter()
            .enumerate()
            .map(|(i, dx)| Enemy::slime(EntityId(i as u32), Vec2::new(100.0 + dx, 100.0), &tuning.slime))
            .collect();
        let center = enemies[0].hitbox().center();
        let hit = apply_blast(center, 90.0, 1, &mut enemies);
        assert_eq!(hit, 3);
        let alive: Vec<bool> = enemies.iter().map(|e| e.is_alive()).collect();
        assert_eq!(alive, vec![false, false, false, true, true]);

        // Dead enemies are not hit again
        assert_eq!(apply_blast(center, 90.0, 1, &mut enemies), 0);
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        PickUp,
        Throw,
        Detonate,
        Tick(f32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::PickUp),
            Just(Op::Throw),
            Just(Op::Detonate),
            (0.0f32..0.5).prop_map(Op::Tick),
        ]
    }

    proptest! {
        #[test]
        fn prop_phases_never_go_backward(ops in proptest::collection::vec(op(), 0..64)) {
            let t = Tuning::default().hazard;
            let mut b = bomb(&t);
            let mut last = b.phase();
            let mut detonations = 0;
            for op in ops {
                let event = match op {
                    Op::PickUp => { b.pick_up(); None }
                    Op::Throw => { b.throw(b.pos(), Facing::Right, &t); None }
                    Op::Detonate => b.detonate(),
                    Op::Tick(dt) => b.update(dt, Some(Vec2::new(400.0, 400.0)), &bounds(), &t),
                };
                if matches!(event, Some(HazardEvent::Detonated { .. })) {
                    detonations += 1;
                }
                let now = b.phase();
                prop_assert!(now >= last);
                prop_assert!((now as u8) <= (last as u8) + 1);
                last = now;
            }
            prop_assert!(detonations <= 1);
        }

        #[test]
        fn prop_blast_hits_exactly_the_radius_subset(
            offsets in proptest::collection::vec((-200.0f32..200.0, -200.0f32..200.0), 0..16),
            radius in 10.0f32..150.0,
        ) {
            let tuning = Tuning::default();
            let center = Vec2::new(500.0, 500.0);
            let mut enemies: Vec<Enemy> = offsets
                .iter()
                .enumerate()
                .map(|(i, (dx, dy))| Enemy::slime(EntityId(i as u32), center + Vec2::new(*dx, *dy), &tuning.slime))
                .collect();
            let expected: Vec<bool> = enemies
                .iter()
                .map(|e| e.hitbox().center().distance(center) <= radius)
                .collect();
            let hit = apply_blast(center, radius, 1, &mut enemies);
            prop_assert_eq!(hit, expected.iter().filter(|x| **x).count());
            for (enemy, in_range) in enemies.iter().zip(expected) {
                prop_assert_eq!(enemy.is_alive(), !in_range);
            }
        }
    }
}
