//! Animation frame selection
//!
//! The simulation never touches pixels. Each entity exposes a [`FrameRef`]
//! naming a clip, a facing and a frame index; the renderer looks the frame up
//! in its own immutable per-facing tables.

use serde::{Deserialize, Serialize};

/// Horizontal facing, selects the mirrored frame table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// +1 for right, -1 for left
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing implied by a horizontal delta, keeping `self` when it is zero
    pub fn from_dx(self, dx: f32) -> Self {
        if dx > 0.0 {
            Facing::Right
        } else if dx < 0.0 {
            Facing::Left
        } else {
            self
        }
    }
}

/// Animation clips known to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Clip {
    PlayerIdle,
    PlayerRun,
    PlayerAttack,
    PlayerRoll,
    SlimeHop,
    SkeletonWalk,
    BombIdle,
    Explosion,
    Food,
}

impl Clip {
    /// Number of frames in the clip
    pub fn frame_count(self) -> usize {
        match self {
            Clip::PlayerIdle => 9,
            Clip::PlayerRun => 8,
            Clip::PlayerAttack => 10,
            Clip::PlayerRoll => 10,
            Clip::SlimeHop => 6,
            Clip::SkeletonWalk => 8,
            Clip::BombIdle => 1,
            Clip::Explosion => 6,
            Clip::Food => 3,
        }
    }
}

/// What the renderer should draw for an entity this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRef {
    pub clip: Clip,
    pub facing: Facing,
    pub index: usize,
}

/// Continuous frame cursor advanced at a fixed rate
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FrameClock {
    /// Fractional frame position
    pub cursor: f32,
}

impl FrameClock {
    pub fn reset(&mut self) {
        self.cursor = 0.0;
    }

    /// Advance by `fps * dt` frames. Returns true when the clip ran past its
    /// last frame; looping clips wrap, one-shot callers reset on `true`.
    pub fn advance(&mut self, fps: f32, dt: f32, frames: usize) -> bool {
        self.cursor += fps * dt;
        let len = frames.max(1) as f32;
        if self.cursor >= len {
            self.cursor %= len;
            true
        } else {
            false
        }
    }

    /// Whole frame index, clamped into the clip
    pub fn index(&self, frames: usize) -> usize {
        (self.cursor as usize).min(frames.saturating_sub(1))
    }
}
