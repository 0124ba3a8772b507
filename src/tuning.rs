//! Data-driven game balance
//!
//! Every gameplay constant lives here. Sections deserialize with defaults so a
//! tuning file only needs to name the values it overrides.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed tuning data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Player movement, combat and sprite geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Walking speed (pixels/s)
    pub speed: f32,
    /// Speed while rolling (pixels/s)
    pub roll_speed: f32,
    /// Roll length (seconds)
    pub roll_duration: f32,
    /// Wait after a roll ends before another may start (seconds)
    pub roll_cooldown: f32,
    /// Time after the attack trigger before the attack hitbox is live
    pub attack_delay: f32,
    /// Animation rate for all player clips (frames/s)
    pub animation_fps: f32,
    pub max_hp: u32,
    /// Visual sprite size
    pub sprite_size: Vec2,
    /// Collision box size as a fraction of the sprite size
    pub hitbox_scale: Vec2,
    /// Attack box size
    pub attack_size: Vec2,
    /// Attack box offset from the sprite center (x mirrored by facing)
    pub attack_offset: Vec2,
    /// Where a carried bomb sits relative to the sprite center
    pub carry_offset: Vec2,
    /// Damage every tick the attack box overlaps instead of once per swing
    pub attack_multi_hit: bool,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 150.0,
            roll_speed: 450.0,
            roll_duration: 0.3,
            roll_cooldown: 0.0,
            attack_delay: 0.30,
            animation_fps: 10.0,
            max_hp: 3,
            sprite_size: Vec2::new(64.0, 64.0),
            hitbox_scale: Vec2::new(0.15, 0.25),
            attack_size: Vec2::new(40.0, 30.0),
            attack_offset: Vec2::new(10.0, -10.0),
            carry_offset: Vec2::new(15.0, -15.0),
            attack_multi_hit: false,
        }
    }
}

/// Roaming contact-damage enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlimeTuning {
    pub speed: f32,
    pub hp: u32,
    /// Minimum time between two contact hits (seconds)
    pub damage_cooldown: f32,
    pub sprite_size: Vec2,
    pub hitbox_scale: Vec2,
    /// Seconds per animation frame
    pub frame_interval: f32,
}

impl Default for SlimeTuning {
    fn default() -> Self {
        Self {
            speed: 80.0,
            hp: 1,
            damage_cooldown: 0.6,
            sprite_size: Vec2::new(64.0, 64.0),
            hitbox_scale: Vec2::new(0.55, 0.45),
            frame_interval: 0.12,
        }
    }
}

/// Stop-and-strike enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkeletonTuning {
    pub speed: f32,
    pub hp: u32,
    pub attack_cooldown: f32,
    /// Stops approaching inside this center distance
    pub stop_distance: f32,
    /// Strikes inside this center distance
    pub attack_distance: f32,
    pub sprite_size: Vec2,
    pub hitbox_scale: Vec2,
    /// Vertical offset of the hitbox center from the sprite center
    pub hitbox_offset_y: f32,
    /// Walk animation rate (frames/s)
    pub walk_fps: f32,
}

impl Default for SkeletonTuning {
    fn default() -> Self {
        Self {
            speed: 90.0,
            hp: 1,
            attack_cooldown: 1.0,
            stop_distance: 25.0,
            attack_distance: 35.0,
            sprite_size: Vec2::new(64.0, 64.0),
            hitbox_scale: Vec2::new(0.45, 0.55),
            hitbox_offset_y: -20.0,
            walk_fps: 9.0,
        }
    }
}

/// Bomb pickup, flight and explosion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    pub size: Vec2,
    /// Float animation phase speed (radians/s)
    pub float_speed: f32,
    /// Float animation amplitude (pixels)
    pub float_range: f32,
    /// Horizontal flight speed (pixels/s)
    pub throw_speed: f32,
    /// Flight time before detonation, counted from the throw (seconds)
    pub fuse: f32,
    /// Explosion animation length (seconds)
    pub explosion_duration: f32,
    pub explosion_frames: usize,
    pub blast_radius: f32,
    pub blast_damage: u32,
    /// Release point relative to the thrower's sprite center
    pub throw_offset: Vec2,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            size: Vec2::new(24.0, 24.0),
            float_speed: 2.0,
            float_range: 5.0,
            throw_speed: 150.0,
            fuse: 1.0,
            explosion_duration: 0.25,
            explosion_frames: 6,
            blast_radius: 90.0,
            blast_damage: 1,
            throw_offset: Vec2::new(0.0, -10.0),
        }
    }
}

/// Health (food) pickups
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthTuning {
    pub heal: u32,
    pub size: Vec2,
    /// Number of health pickups kept in the world
    pub target_count: usize,
}

impl Default for HealthTuning {
    fn default() -> Self {
        Self {
            heal: 1,
            size: Vec2::new(32.0, 32.0),
            target_count: 2,
        }
    }
}

/// Enemy population growth
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationTuning {
    pub initial_cap: usize,
    /// Seconds of play between cap increases
    pub increase_interval: f32,
    pub max_cap: usize,
}

impl Default for PopulationTuning {
    fn default() -> Self {
        Self {
            initial_cap: 2,
            increase_interval: 20.0,
            max_cap: 20,
        }
    }
}

/// Safe-position sampling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Side of the square probe that must be obstacle-free
    pub probe_size: f32,
    /// Inset from the world edges
    pub margin: f32,
    /// Samples tried before falling back to the level's default spawn
    pub max_attempts: u32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            probe_size: 32.0,
            margin: 32.0,
            max_attempts: 1000,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub slime: SlimeTuning,
    pub skeleton: SkeletonTuning,
    pub hazard: HazardTuning,
    pub health: HealthTuning,
    pub population: PopulationTuning,
    pub spawn: SpawnTuning,
}

impl Tuning {
    /// Parse (possibly partial) JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read and parse a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Check cross-field invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        let sk = &self.skeleton;
        if sk.stop_distance >= sk.attack_distance {
            return Err(TuningError::Invalid(format!(
                "skeleton stop_distance ({}) must be below attack_distance ({})",
                sk.stop_distance, sk.attack_distance
            )));
        }

        let durations = [
            ("player.roll_duration", self.player.roll_duration),
            ("player.animation_fps", self.player.animation_fps),
            ("slime.frame_interval", self.slime.frame_interval),
            ("skeleton.walk_fps", self.skeleton.walk_fps),
            ("hazard.fuse", self.hazard.fuse),
            ("hazard.explosion_duration", self.hazard.explosion_duration),
            ("population.increase_interval", self.population.increase_interval),
        ];
        for (name, value) in durations {
            if !(value > 0.0 && value.is_finite()) {
                return Err(TuningError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }

        if self.player.max_hp == 0 {
            return Err(TuningError::Invalid("player.max_hp must be at least 1".into()));
        }
        if self.hazard.explosion_frames == 0 {
            return Err(TuningError::Invalid("hazard.explosion_frames must be at least 1".into()));
        }
        if self.population.initial_cap > self.population.max_cap {
            return Err(TuningError::Invalid(format!(
                "population.initial_cap ({}) exceeds max_cap ({})",
                self.population.initial_cap, self.population.max_cap
            )));
        }
        if self.spawn.max_attempts == 0 {
            return Err(TuningError::Invalid("spawn.max_attempts must be at least 1".into()));
        }
        Ok(())
    }
}
