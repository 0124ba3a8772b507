//! Game state and session bookkeeping
//!
//! `GameState` owns every entity collection. Entities never reach back into
//! it; cross-entity rules live in [`super::tick`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyKind};
use super::entity::EntityId;
use super::hazard::Hazard;
use super::pickup::{Food, HealthPickup};
use super::player::Player;
use super::spawn::{clear_position, safe_position};
use crate::level::Level;
use crate::tuning::Tuning;

/// Top-level game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, world frozen
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Player died, waiting for restart
    GameOver,
}

/// Notable things that happened during a tick, for audio and HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    PlayerHurt { hp: u32 },
    PlayerHealed { hp: u32 },
    EnemyKilled { id: EntityId, kind: EnemyKind },
    EnemySpawned { id: EntityId, kind: EnemyKind },
    CapRaised { cap: usize },
    BombSpawned { id: EntityId },
    BombPickedUp { id: EntityId },
    BombThrown { id: EntityId },
    BombExploded { id: EntityId, center: Vec2, hits: usize },
    BombExpired { id: EntityId },
    GameOver { score: u64 },
}

/// Read-only view for scoring and UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub player_hp: u32,
    pub player_max_hp: u32,
    pub enemy_count: usize,
    pub max_enemies: usize,
    pub health_pickups: usize,
    pub bomb_available: bool,
    pub play_time: f32,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    pub level: Level,
    pub phase: GamePhase,
    pub score: u64,
    pub player: Player,
    /// Live enemies (sorted by id)
    pub enemies: Vec<Enemy>,
    pub health_pickups: Vec<HealthPickup>,
    /// Bomb instances, whatever their state
    pub hazards: Vec<Hazard>,
    /// Current population cap
    pub max_enemies: usize,
    /// Seconds toward the next cap increase
    pub enemy_increase_timer: f32,
    /// No bomb exists in the world; a new one may spawn
    pub bomb_available: bool,
    /// Seconds spent in `Playing` this session
    pub play_time: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Fresh session on the title screen
    pub fn new(level: Level, tuning: Tuning, seed: u64) -> Self {
        let player = Player::new(level.fallback_spawn(), &tuning.player);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            max_enemies: tuning.population.initial_cap,
            tuning,
            level,
            phase: GamePhase::Menu,
            score: 0,
            player,
            enemies: Vec::new(),
            health_pickups: Vec::new(),
            hazards: Vec::new(),
            enemy_increase_timer: 0.0,
            bomb_available: true,
            play_time: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        };
        state.populate();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        EntityId(id)
    }

    /// `Menu -> Playing`
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Menu {
            return false;
        }
        self.phase = GamePhase::Playing;
        self.push_event(GameEvent::Started);
        log::info!("Game started (seed {})", self.seed);
        true
    }

    /// Discard every collection and start a new session in `Playing`.
    /// The RNG stream carries on so restarts differ from the first run.
    pub fn restart(&mut self) {
        self.score = 0;
        self.max_enemies = self.tuning.population.initial_cap;
        self.enemy_increase_timer = 0.0;
        self.bomb_available = true;
        self.play_time = 0.0;
        self.enemies.clear();
        self.health_pickups.clear();
        self.hazards.clear();
        self.populate();
        self.phase = GamePhase::Playing;
        self.push_event(GameEvent::Started);
        log::info!("Game restarted");
    }

    /// `Playing -> GameOver`
    pub fn end(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.push_event(GameEvent::GameOver { score: self.score });
        log::info!("Game over, score {}", self.score);
    }

    /// Place the player and the opening wave
    fn populate(&mut self) {
        let start = safe_position(&self.level, &self.tuning.spawn, &mut self.rng);
        self.player = Player::new(start, &self.tuning.player);
        self.spawn_initial_enemies();
        self.top_up_health();
    }

    // --- Spawning ---

    pub fn spawn_enemy(&mut self, kind: EnemyKind) -> EntityId {
        let id = self.next_entity_id();
        let footprint = *build_enemy(kind, id, Vec2::ZERO, &self.tuning).hitbox();
        let pos = clear_position(&self.level, &self.tuning.spawn, &footprint, &mut self.rng);
        self.enemies.push(build_enemy(kind, id, pos, &self.tuning));
        self.push_event(GameEvent::EnemySpawned { id, kind });
        id
    }

    /// Opening wave: slimes only
    pub fn spawn_initial_enemies(&mut self) {
        while self.enemies.len() < self.max_enemies {
            self.spawn_enemy(EnemyKind::Slime);
        }
    }

    /// Fill the population up to the cap with random variants
    pub fn respawn_enemies(&mut self) {
        while self.enemies.len() < self.max_enemies {
            let kind = if self.rng.random_bool(0.5) {
                EnemyKind::Slime
            } else {
                EnemyKind::Skeleton
            };
            self.spawn_enemy(kind);
        }
    }

    pub fn spawn_health(&mut self) -> EntityId {
        let id = self.next_entity_id();
        let pos = safe_position(&self.level, &self.tuning.spawn, &mut self.rng);
        let food = Food::random(&mut self.rng);
        self.health_pickups
            .push(HealthPickup::new(id, pos, food, &self.tuning.health));
        id
    }

    /// Bring health pickups back to the target count
    pub fn top_up_health(&mut self) {
        while self.health_pickups.len() < self.tuning.health.target_count {
            self.spawn_health();
        }
    }

    /// A new bomb may spawn only when none exists and none is held
    pub fn can_spawn_bomb(&self) -> bool {
        self.bomb_available && self.hazards.is_empty() && !self.player.has_bomb()
    }

    /// Spawn a ground bomb if allowed
    pub fn spawn_bomb(&mut self) -> Option<EntityId> {
        if !self.can_spawn_bomb() {
            return None;
        }
        let id = self.next_entity_id();
        let pos = safe_position(&self.level, &self.tuning.spawn, &mut self.rng);
        let phase = self.rng.random_range(0.0..std::f32::consts::TAU);
        self.hazards.push(Hazard::new(id, pos, phase, &self.tuning.hazard));
        self.bomb_available = false;
        self.push_event(GameEvent::BombSpawned { id });
        log::debug!("Bomb {} spawned at {}", id.0, pos);
        Some(id)
    }

    // --- Events & views ---

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Hazards still lying in the world as pickups
    pub fn ground_bombs(&self) -> usize {
        self.hazards.iter().filter(|h| h.is_on_ground()).count()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            player_hp: self.player.hp(),
            player_max_hp: self.player.max_hp(),
            enemy_count: self.enemies.len(),
            max_enemies: self.max_enemies,
            health_pickups: self.health_pickups.len(),
            bomb_available: self.bomb_available,
            play_time: self.play_time,
        }
    }
}

fn build_enemy(kind: EnemyKind, id: EntityId, pos: Vec2, tuning: &Tuning) -> Enemy {
    match kind {
        EnemyKind::Slime => Enemy::slime(id, pos, &tuning.slime),
        EnemyKind::Skeleton => Enemy::skeleton(id, pos, &tuning.skeleton),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(seed: u64) -> GameState {
        GameState::new(Level::demo(), Tuning::default(), seed)
    }

    #[test]
    fn test_new_session_layout() {
        let s = state(1);
        assert_eq!(s.phase, GamePhase::Menu);
        assert_eq!(s.enemies.len(), 2);
        assert!(s.enemies.iter().all(|e| e.kind() == EnemyKind::Slime));
        assert_eq!(s.health_pickups.len(), 2);
        assert!(s.hazards.is_empty());
        assert!(s.can_spawn_bomb());
        assert_eq!(s.player.hp(), 3);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut s = state(2);
        let a = s.next_entity_id();
        let b = s.next_entity_id();
        assert_ne!(a, b);
        let mut ids: Vec<u32> = s.enemies.iter().map(|e| e.id.0).collect();
        ids.extend(s.health_pickups.iter().map(|p| p.id.0));
        let n = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), n);
    }

    #[test]
    fn test_single_bomb_in_world() {
        let mut s = state(3);
        assert!(s.spawn_bomb().is_some());
        assert!(s.spawn_bomb().is_none());
        assert_eq!(s.ground_bombs(), 1);
        assert!(!s.bomb_available);
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = state(77);
        let b = state(77);
        assert_eq!(a.player.body.pos(), b.player.body.pos());
        for (x, y) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(x.body.pos(), y.body.pos());
        }
    }

    #[test]
    fn test_spawned_enemies_start_clear_of_obstacles() {
        for seed in 0..200 {
            let mut s = state(seed);
            s.max_enemies = 8;
            s.respawn_enemies();
            for e in &s.enemies {
                assert!(s.level.is_clear(e.hitbox()), "seed {seed}: {:?} in a wall", e.kind());
            }
        }
    }

    #[test]
    fn test_restart_resets_session() {
        let mut s = state(4);
        s.start();
        s.score = 12;
        s.max_enemies = 7;
        s.enemy_increase_timer = 13.0;
        s.spawn_bomb();
        s.player.take_damage(3);
        s.end();
        assert_eq!(s.phase, GamePhase::GameOver);

        s.restart();
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.score, 0);
        assert_eq!(s.max_enemies, 2);
        assert_eq!(s.enemies.len(), 2);
        assert_eq!(s.enemy_increase_timer, 0.0);
        assert!(s.bomb_available);
        assert!(s.hazards.is_empty());
        assert_eq!(s.player.hp(), 3);
    }

    #[test]
    fn test_start_only_from_menu() {
        let mut s = state(5);
        assert!(s.start());
        assert!(!s.start());
        let events = s.drain_events();
        assert_eq!(events.iter().filter(|e| **e == GameEvent::Started).count(), 1);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_snapshot_serializes() {
        let s = state(6);
        let json = serde_json::to_string(&s.snapshot()).unwrap();
        assert!(json.contains("\"player_hp\":3"));
        assert!(json.contains("\"phase\":\"Menu\""));
    }
}
