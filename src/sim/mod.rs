//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod ai;
pub mod anim;
pub mod autopilot;
pub mod collision;
pub mod enemy;
pub mod entity;
pub mod hazard;
pub mod pickup;
pub mod player;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use anim::{Clip, Facing, FrameRef};
pub use collision::{SweepResult, sweep};
pub use enemy::{Enemy, EnemyKind};
pub use entity::{Body, EntityId};
pub use hazard::{Hazard, HazardEvent, HazardPhase, HazardState, apply_blast};
pub use pickup::{Food, HealthPickup};
pub use player::{Action, Player};
pub use rect::Rect;
pub use state::{GameEvent, GamePhase, GameState, Snapshot};
pub use tick::{TickInput, tick};
