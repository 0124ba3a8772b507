//! Health pickups

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::anim::{Clip, Facing, FrameRef};
use super::entity::EntityId;
use super::rect::Rect;
use crate::tuning::HealthTuning;

/// Which food sprite a pickup shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Food {
    Watermelon,
    Apple,
    Chicken,
}

impl Food {
    pub const ALL: [Food; 3] = [Food::Watermelon, Food::Apple, Food::Chicken];

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Food lying in the world, restores hp on contact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthPickup {
    pub id: EntityId,
    pub hitbox: Rect,
    pub heal: u32,
    pub food: Food,
}

impl HealthPickup {
    pub fn new(id: EntityId, center: Vec2, food: Food, tuning: &HealthTuning) -> Self {
        Self {
            id,
            hitbox: Rect::from_center(center, tuning.size),
            heal: tuning.heal,
            food,
        }
    }

    pub fn frame(&self) -> FrameRef {
        FrameRef {
            clip: Clip::Food,
            facing: Facing::Right,
            index: self.food as usize,
        }
    }
}
