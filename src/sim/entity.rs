//! Shared entity body: position, sprite box, collision box and liveness
//!
//! The collision box is the authoritative physical state; the entity's
//! logical position is its center. The visual box is derived from it through
//! a fixed offset and only exists for rendering and world-bounds clamping.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{SweepResult, sweep};
use super::rect::Rect;

/// Stable entity identifier (allocated by the game state, never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Physical body shared by every entity kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Collision box (zero-sized once dead)
    hitbox: Rect,
    /// Sprite size
    visual_size: Vec2,
    /// Offset from the hitbox center to the sprite center
    visual_offset: Vec2,
    /// Movement speed (pixels/s)
    pub speed: f32,
    alive: bool,
}

impl Body {
    /// Body whose collision box is `hitbox_size`, centered at `pos`, with a
    /// sprite of `visual_size` whose center sits at `pos + visual_offset`.
    pub fn new(pos: Vec2, hitbox_size: Vec2, visual_size: Vec2, visual_offset: Vec2, speed: f32) -> Self {
        Self {
            hitbox: Rect::from_center(pos, hitbox_size),
            visual_size,
            visual_offset,
            speed,
            alive: true,
        }
    }

    /// Body with the collision box anchored to the sprite's bottom-center
    pub fn bottom_anchored(sprite_center: Vec2, hitbox_size: Vec2, visual_size: Vec2, speed: f32) -> Self {
        let rise = (visual_size.y - hitbox_size.y) * 0.5;
        Self::new(
            sprite_center + Vec2::new(0.0, rise),
            hitbox_size,
            visual_size,
            Vec2::new(0.0, -rise),
            speed,
        )
    }

    /// Logical position (collision box center)
    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.hitbox.center()
    }

    #[inline]
    pub fn hitbox(&self) -> &Rect {
        &self.hitbox
    }

    /// Unsnapped sprite rectangle
    pub fn visual(&self) -> Rect {
        Rect::from_center(self.pos() + self.visual_offset, self.visual_size)
    }

    /// Pixel-snapped sprite rectangle for rendering
    pub fn visual_box(&self) -> Rect {
        self.visual().snapped()
    }

    /// Center of the sprite
    pub fn visual_center(&self) -> Vec2 {
        self.pos() + self.visual_offset
    }

    /// Teleport so the collision box is centered on `pos`
    pub fn set_pos(&mut self, pos: Vec2) {
        if self.alive {
            self.hitbox = self.hitbox.recentered(pos);
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Mark dead and collapse the collision box so it stops colliding.
    /// The owning collection removes the entity on its next sweep.
    pub fn mark_dead(&mut self) {
        self.alive = false;
        self.hitbox = Rect::from_center(self.hitbox.center(), Vec2::ZERO);
    }

    /// Straight move by `direction * speed * dt` without obstacle tests,
    /// then keep the sprite inside `bounds` when given.
    pub fn move_by(&mut self, direction: Vec2, dt: f32, bounds: Option<&Rect>) {
        if !self.alive {
            return;
        }
        self.hitbox = self.hitbox.translated(direction * self.speed * dt);
        if let Some(bounds) = bounds {
            self.clamp_to(bounds);
        }
    }

    /// Move with velocity `vel` for `dt`, resolving against `obstacles` one
    /// axis at a time.
    pub fn move_and_collide(&mut self, vel: Vec2, dt: f32, obstacles: &[Rect]) -> SweepResult {
        if !self.alive {
            return SweepResult {
                hitbox: self.hitbox,
                blocked_x: false,
                blocked_y: false,
            };
        }
        let result = sweep(self.hitbox, vel, dt, obstacles);
        self.hitbox = result.hitbox;
        result
    }

    /// Shift the body so its sprite lies within `bounds`
    pub fn clamp_to(&mut self, bounds: &Rect) {
        let visual = self.visual();
        let mut shift = Vec2::ZERO;
        if visual.min.x < bounds.min.x {
            shift.x = bounds.min.x - visual.min.x;
        } else if visual.max.x > bounds.max.x {
            shift.x = bounds.max.x - visual.max.x;
        }
        if visual.min.y < bounds.min.y {
            shift.y = bounds.min.y - visual.min.y;
        } else if visual.max.y > bounds.max.y {
            shift.y = bounds.max.y - visual.max.y;
        }
        if shift != Vec2::ZERO {
            self.hitbox = self.hitbox.translated(shift);
        }
    }
}
