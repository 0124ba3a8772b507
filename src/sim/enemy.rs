//! Enemy variants
//!
//! All enemies share one [`Enemy`] struct (body, hp, facing, velocity). The
//! variant-specific part lives in [`Behavior`], dispatched by `match`:
//! - Slime: chases continuously and deals contact damage on a cooldown.
//! - Skeleton: stops short of the target and strikes within attack range.
//!
//! Enemies never touch the player directly. [`Enemy::update`] reads the
//! target's collision box and returns the damage it wants to deal; the game
//! state applies it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ai::chase_velocity;
use super::anim::{Clip, Facing, FrameClock, FrameRef};
use super::entity::{Body, EntityId};
use super::rect::Rect;
use crate::level::Level;
use crate::tuning::{SkeletonTuning, SlimeTuning};

/// Enemy variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Slime,
    Skeleton,
}

/// Variant-specific state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Behavior {
    Slime {
        /// Seconds until contact damage may land again
        damage_cooldown: f32,
        /// Cooldown applied after each hit
        damage_delay: f32,
        /// Seconds per animation frame
        frame_interval: f32,
    },
    Skeleton {
        /// Seconds until the next strike may land
        attack_timer: f32,
        attack_cooldown: f32,
        stop_distance: f32,
        attack_distance: f32,
        walk_fps: f32,
    },
}

/// A roaming enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub body: Body,
    pub hp: u32,
    /// Velocity chosen this tick (zeroed while frozen)
    pub vel: Vec2,
    pub facing: Facing,
    pub behavior: Behavior,
    anim: FrameClock,
}

impl Enemy {
    /// Slime with its sprite centered at `center`
    pub fn slime(id: EntityId, center: Vec2, tuning: &SlimeTuning) -> Self {
        let hitbox = (tuning.sprite_size * tuning.hitbox_scale).floor();
        Self {
            id,
            body: Body::bottom_anchored(center, hitbox, tuning.sprite_size, tuning.speed),
            hp: tuning.hp,
            vel: Vec2::ZERO,
            facing: Facing::Right,
            behavior: Behavior::Slime {
                damage_cooldown: 0.0,
                damage_delay: tuning.damage_cooldown,
                frame_interval: tuning.frame_interval,
            },
            anim: FrameClock::default(),
        }
    }

    /// Skeleton with its sprite centered at `center`
    pub fn skeleton(id: EntityId, center: Vec2, tuning: &SkeletonTuning) -> Self {
        let hitbox = (tuning.sprite_size * tuning.hitbox_scale).floor();
        let offset = Vec2::new(0.0, tuning.hitbox_offset_y);
        Self {
            id,
            body: Body::new(center + offset, hitbox, tuning.sprite_size, -offset, tuning.speed),
            hp: tuning.hp,
            vel: Vec2::ZERO,
            facing: Facing::Right,
            behavior: Behavior::Skeleton {
                attack_timer: 0.0,
                attack_cooldown: tuning.attack_cooldown,
                stop_distance: tuning.stop_distance,
                attack_distance: tuning.attack_distance,
                walk_fps: tuning.walk_fps,
            },
            anim: FrameClock::default(),
        }
    }

    pub fn kind(&self) -> EnemyKind {
        match self.behavior {
            Behavior::Slime { .. } => EnemyKind::Slime,
            Behavior::Skeleton { .. } => EnemyKind::Skeleton,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.body.is_alive()
    }

    #[inline]
    pub fn hitbox(&self) -> &Rect {
        self.body.hitbox()
    }

    /// Apply damage, clamping hp at zero. Returns true if this hit killed.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.hp = self.hp.saturating_sub(amount);
        if self.hp == 0 {
            self.body.mark_dead();
            log::debug!("{:?} {} destroyed", self.kind(), self.id.0);
            return true;
        }
        false
    }

    /// Stop moving (game not running)
    pub fn freeze(&mut self) {
        self.vel = Vec2::ZERO;
    }

    /// Choose a velocity toward `target` and move, resolving collisions
    pub fn pursue(&mut self, target: Vec2, level: &Level, dt: f32) {
        let from = self.body.pos();
        let speed = self.body.speed;
        self.vel = match self.behavior {
            Behavior::Slime { .. } => chase_velocity(from, target, speed, &level.obstacles),
            Behavior::Skeleton { stop_distance, .. } => {
                if from.distance(target) > stop_distance {
                    chase_velocity(from, target, speed, &level.obstacles)
                } else {
                    Vec2::ZERO
                }
            }
        };
        self.facing = match self.behavior {
            Behavior::Slime { .. } => {
                if target.x > from.x {
                    Facing::Right
                } else {
                    Facing::Left
                }
            }
            Behavior::Skeleton { .. } => {
                if target.x - from.x >= 0.0 {
                    Facing::Right
                } else {
                    Facing::Left
                }
            }
        };

        self.body.move_and_collide(self.vel, dt, &level.obstacles);
        self.body.clamp_to(&level.bounds());
    }

    /// Tick attack cooldowns and strike if allowed. Returns damage dealt.
    pub fn attempt_attack(&mut self, target: &Rect, dt: f32) -> u32 {
        let pos = self.body.pos();
        let hitbox = *self.body.hitbox();
        match &mut self.behavior {
            Behavior::Slime {
                damage_cooldown,
                damage_delay,
                ..
            } => {
                if *damage_cooldown > 0.0 {
                    *damage_cooldown -= dt;
                }
                if hitbox.overlaps(target) && *damage_cooldown <= 0.0 {
                    *damage_cooldown = *damage_delay;
                    return 1;
                }
                0
            }
            Behavior::Skeleton {
                attack_timer,
                attack_cooldown,
                attack_distance,
                ..
            } => {
                if *attack_timer > 0.0 {
                    *attack_timer -= dt;
                }
                if pos.distance(target.center()) <= *attack_distance && *attack_timer <= 0.0 {
                    *attack_timer = *attack_cooldown;
                    return 1;
                }
                0
            }
        }
    }

    /// Full per-tick update against the target's collision box.
    /// Returns the damage to apply to the target.
    pub fn update(&mut self, target: &Rect, level: &Level, dt: f32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        self.pursue(target.center(), level, dt);
        let damage = self.attempt_attack(target, dt);
        self.animate(dt);
        damage
    }

    fn animate(&mut self, dt: f32) {
        match self.behavior {
            Behavior::Slime { frame_interval, .. } => {
                self.anim.advance(1.0 / frame_interval, dt, Clip::SlimeHop.frame_count());
            }
            Behavior::Skeleton { walk_fps, .. } => {
                if self.vel.x.abs() > 1.0 || self.vel.y.abs() > 1.0 {
                    self.anim.advance(walk_fps, dt, Clip::SkeletonWalk.frame_count());
                } else {
                    self.anim.reset();
                }
            }
        }
    }

    /// Frame the renderer should draw
    pub fn frame(&self) -> FrameRef {
        let clip = match self.kind() {
            EnemyKind::Slime => Clip::SlimeHop,
            EnemyKind::Skeleton => Clip::SkeletonWalk,
        };
        FrameRef {
            clip,
            facing: self.facing,
            index: self.anim.index(clip.frame_count()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn open_level() -> Level {
        Level::new(1000.0, 1000.0, Vec::new(), None).unwrap()
    }

    fn target_at(p: Vec2) -> Rect {
        Rect::from_center(p, Vec2::new(9.0, 16.0))
    }

    #[test]
    fn test_slime_chases_target() {
        let tuning = Tuning::default();
        let mut slime = Enemy::slime(EntityId(1), Vec2::new(100.0, 100.0), &tuning.slime);
        let target = target_at(Vec2::new(400.0, 100.0));
        let before = slime.body.pos().distance(target.center());
        slime.update(&target, &open_level(), DT);
        let after = slime.body.pos().distance(target.center());
        assert!(after < before);
        assert_eq!(slime.facing, Facing::Right);
        assert!((slime.vel.length() - tuning.slime.speed).abs() < 1e-3);
    }

    #[test]
    fn test_slime_contact_damage_respects_cooldown() {
        let tuning = Tuning::default();
        let mut slime = Enemy::slime(EntityId(1), Vec2::new(100.0, 100.0), &tuning.slime);
        let target = target_at(slime.body.pos());

        let mut hits = 0;
        // One second of continuous contact at 60 Hz
        for _ in 0..60 {
            hits += slime.attempt_attack(&target, DT);
        }
        // Hit at t=0 and once more after the 0.6s cooldown
        assert_eq!(hits, 2);
    }

    #[test]
    fn test_slime_no_damage_without_contact() {
        let tuning = Tuning::default();
        let mut slime = Enemy::slime(EntityId(1), Vec2::new(100.0, 100.0), &tuning.slime);
        let target = target_at(Vec2::new(300.0, 300.0));
        assert_eq!(slime.attempt_attack(&target, DT), 0);
    }

    #[test]
    fn test_skeleton_stops_inside_stop_distance() {
        let tuning = Tuning::default();
        let mut sk = Enemy::skeleton(EntityId(2), Vec2::new(100.0, 100.0), &tuning.skeleton);
        let start = sk.body.pos();
        let target = target_at(start + Vec2::new(20.0, 0.0));
        sk.pursue(target.center(), &open_level(), DT);
        assert_eq!(sk.vel, Vec2::ZERO);
        assert_eq!(sk.body.pos(), start);
    }

    #[test]
    fn test_skeleton_strikes_only_in_range() {
        let tuning = Tuning::default();
        let mut sk = Enemy::skeleton(EntityId(2), Vec2::new(100.0, 100.0), &tuning.skeleton);
        let pos = sk.body.pos();

        let far = target_at(pos + Vec2::new(36.0, 0.0));
        assert_eq!(sk.attempt_attack(&far, DT), 0);

        let near = target_at(pos + Vec2::new(30.0, 0.0));
        assert_eq!(sk.attempt_attack(&near, DT), 1);
        // Cooldown blocks the follow-up
        assert_eq!(sk.attempt_attack(&near, DT), 0);
    }

    #[test]
    fn test_skeleton_never_contact_damages_out_of_range() {
        let tuning = Tuning::default();
        let mut sk = Enemy::skeleton(EntityId(2), Vec2::new(100.0, 100.0), &tuning.skeleton);
        let level = open_level();
        let target = target_at(Vec2::new(600.0, 100.0));
        for _ in 0..60 {
            let dist_before = sk.body.pos().distance(target.center());
            let damage = sk.update(&target, &level, DT);
            if damage > 0 {
                assert!(sk.body.pos().distance(target.center()) <= tuning.skeleton.attack_distance);
            }
            assert!(dist_before > tuning.skeleton.attack_distance);
        }
    }

    #[test]
    fn test_damage_clamps_and_kills() {
        let tuning = Tuning::default();
        let mut slime = Enemy::slime(EntityId(1), Vec2::new(100.0, 100.0), &tuning.slime);
        assert!(slime.take_damage(5));
        assert_eq!(slime.hp, 0);
        assert!(!slime.is_alive());
        assert!(slime.hitbox().is_empty());
        assert!(!slime.take_damage(1));
    }

    proptest! {
        #[test]
        fn prop_enemy_hp_saturates_and_dies_once(
            hp in 1u32..20,
            hits in proptest::collection::vec(0u32..8, 0..16),
        ) {
            let tuning = Tuning::default();
            let mut e = Enemy::skeleton(EntityId(9), Vec2::new(100.0, 100.0), &tuning.skeleton);
            e.hp = hp;
            let mut expected = hp;
            let mut kills = 0;
            for amount in hits {
                if e.take_damage(amount) {
                    kills += 1;
                }
                expected = expected.saturating_sub(amount);
                prop_assert_eq!(e.hp, expected);
                prop_assert_eq!(e.is_alive(), expected > 0);
            }
            prop_assert_eq!(kills, u32::from(expected == 0));
        }
    }

    #[test]
    fn test_skeleton_hitbox_raised() {
        let tuning = Tuning::default();
        let sk = Enemy::skeleton(EntityId(3), Vec2::new(100.0, 100.0), &tuning.skeleton);
        assert_eq!(sk.body.visual_center(), Vec2::new(100.0, 100.0));
        assert_eq!(sk.body.pos(), Vec2::new(100.0, 80.0));
    }
}
