//! The player: movement, roll, melee attack, hit points and bomb slot

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::anim::{Clip, Facing, FrameClock, FrameRef};
use super::entity::{Body, EntityId};
use super::rect::Rect;
use crate::level::Level;
use crate::timer_elapsed;
use crate::tuning::PlayerTuning;

/// What the player is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Action {
    #[default]
    Idle,
    Run,
    Attack,
    Roll,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    hp: u32,
    max_hp: u32,
    pub action: Action,
    pub facing: Facing,
    /// Seconds left in the current roll
    roll_timer: f32,
    /// Seconds before another roll may start
    roll_cooldown: f32,
    roll_dir: Vec2,
    /// Seconds since the current attack was triggered
    attack_elapsed: f32,
    /// Enemies already struck by the current attack
    attack_hits: Vec<EntityId>,
    /// Bomb currently held (at most one)
    carried_bomb: Option<EntityId>,
    anim: FrameClock,
}

impl Player {
    /// Player with its sprite centered at `center`
    pub fn new(center: Vec2, tuning: &PlayerTuning) -> Self {
        let hitbox = (tuning.sprite_size * tuning.hitbox_scale).floor();
        Self {
            body: Body::new(center, hitbox, tuning.sprite_size, Vec2::ZERO, tuning.speed),
            hp: tuning.max_hp,
            max_hp: tuning.max_hp,
            action: Action::Idle,
            facing: Facing::Right,
            roll_timer: 0.0,
            roll_cooldown: 0.0,
            roll_dir: Vec2::X,
            attack_elapsed: 0.0,
            attack_hits: Vec::new(),
            carried_bomb: None,
            anim: FrameClock::default(),
        }
    }

    #[inline]
    pub fn hp(&self) -> u32 {
        self.hp
    }

    #[inline]
    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    #[inline]
    pub fn hitbox(&self) -> &Rect {
        self.body.hitbox()
    }

    #[inline]
    pub fn is_attacking(&self) -> bool {
        self.action == Action::Attack
    }

    #[inline]
    pub fn is_rolling(&self) -> bool {
        self.action == Action::Roll
    }

    /// Record a strike on `enemy` for the current attack. Returns false if
    /// it was already struck by this activation.
    pub fn register_hit(&mut self, enemy: EntityId) -> bool {
        if self.attack_hits.contains(&enemy) {
            return false;
        }
        self.attack_hits.push(enemy);
        true
    }

    /// Apply damage, clamped at zero. Returns the new hp.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.hp = self.hp.saturating_sub(amount);
        log::debug!("Player HP: {}", self.hp);
        self.hp
    }

    /// Restore hp up to the maximum. Returns the new hp.
    pub fn heal(&mut self, amount: u32) -> u32 {
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.hp
    }

    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }

    // --- Bomb slot ---

    pub fn carried_bomb(&self) -> Option<EntityId> {
        self.carried_bomb
    }

    pub fn has_bomb(&self) -> bool {
        self.carried_bomb.is_some()
    }

    pub fn can_pick_bomb(&self) -> bool {
        !self.has_bomb()
    }

    /// Take hold of a bomb. Refused (returns false) if one is already held.
    pub fn attach_bomb(&mut self, bomb: EntityId) -> bool {
        if self.has_bomb() {
            return false;
        }
        self.carried_bomb = Some(bomb);
        true
    }

    /// Let go of the held bomb, if any
    pub fn release_bomb(&mut self) -> Option<EntityId> {
        self.carried_bomb.take()
    }

    /// Where a held bomb is drawn
    pub fn carry_anchor(&self, tuning: &PlayerTuning) -> Vec2 {
        self.body.visual_center() + tuning.carry_offset
    }

    // --- Actions ---

    /// Start an attack. Ignored while attacking or rolling.
    pub fn attack(&mut self) -> bool {
        if self.is_attacking() || self.is_rolling() {
            return false;
        }
        self.action = Action::Attack;
        self.attack_elapsed = 0.0;
        self.attack_hits.clear();
        self.anim.reset();
        true
    }

    /// Start a roll along `intent` (or facing when idle). Ignored while
    /// attacking, rolling or cooling down.
    pub fn roll(&mut self, intent: Vec2, tuning: &PlayerTuning) -> bool {
        if self.is_attacking() || self.is_rolling() || self.roll_cooldown > 0.0 {
            return false;
        }
        self.roll_dir = if intent != Vec2::ZERO {
            intent.normalize()
        } else {
            Vec2::new(self.facing.sign(), 0.0)
        };
        self.action = Action::Roll;
        self.roll_timer = tuning.roll_duration;
        self.anim.reset();
        true
    }

    fn end_roll(&mut self, tuning: &PlayerTuning) {
        self.action = Action::Idle;
        self.roll_timer = 0.0;
        self.roll_cooldown = tuning.roll_cooldown;
        self.anim.reset();
    }

    /// Advance timers, move with collision and pick the animation frame.
    /// `intent` is the raw move axis pair, each component in [-1, 1].
    pub fn update(&mut self, intent: Vec2, dt: f32, level: &Level, tuning: &PlayerTuning) {
        if self.is_attacking() {
            self.attack_elapsed += dt;
        }
        if self.roll_cooldown > 0.0 {
            self.roll_cooldown = (self.roll_cooldown - dt).max(0.0);
        }
        if self.is_rolling() {
            self.roll_timer -= dt;
            if self.roll_timer <= 0.0 {
                self.end_roll(tuning);
            }
        }

        let intent = intent.clamp(Vec2::NEG_ONE, Vec2::ONE);
        let walk_dir = if intent.length_squared() > 1.0 {
            intent.normalize()
        } else {
            intent
        };
        let vel = match self.action {
            Action::Attack => Vec2::ZERO,
            Action::Roll => self.roll_dir * tuning.roll_speed,
            Action::Idle | Action::Run => walk_dir * tuning.speed,
        };

        self.body.move_and_collide(vel, dt, &level.obstacles);
        self.body.clamp_to(&level.bounds());

        if !self.is_attacking() {
            self.facing = self.facing.from_dx(intent.x);
        }
        if matches!(self.action, Action::Idle | Action::Run) {
            let next = if intent != Vec2::ZERO { Action::Run } else { Action::Idle };
            if next != self.action {
                self.action = next;
                self.anim.reset();
            }
        }

        let clip = self.clip();
        let wrapped = self.anim.advance(tuning.animation_fps, dt, clip.frame_count());
        if wrapped {
            match self.action {
                Action::Attack => {
                    self.action = Action::Idle;
                    self.attack_elapsed = 0.0;
                    self.anim.reset();
                }
                Action::Roll => self.end_roll(tuning),
                Action::Idle | Action::Run => {}
            }
        }
    }

    /// Live attack box, or `None` before the attack delay has passed
    pub fn attack_hitbox(&self, tuning: &PlayerTuning) -> Option<Rect> {
        if !self.is_attacking() || !timer_elapsed(self.attack_elapsed, tuning.attack_delay) {
            return None;
        }
        let center = self.body.visual_center();
        let size = tuning.attack_size;
        let off = tuning.attack_offset;
        let x = match self.facing {
            Facing::Right => center.x + off.x,
            Facing::Left => center.x - size.x - off.x,
        };
        Some(Rect::new(x, center.y + off.y, size.x, size.y))
    }

    fn clip(&self) -> Clip {
        match self.action {
            Action::Idle => Clip::PlayerIdle,
            Action::Run => Clip::PlayerRun,
            Action::Attack => Clip::PlayerAttack,
            Action::Roll => Clip::PlayerRoll,
        }
    }

    /// Frame the renderer should draw
    pub fn frame(&self) -> FrameRef {
        let clip = self.clip();
        FrameRef {
            clip,
            facing: self.facing,
            index: self.anim.index(clip.frame_count()),
        }
    }
}
