//! Fixed timestep simulation tick
//!
//! Runs every rule in a fixed order: entity updates before interaction
//! resolution, interactions before the death sweep, the sweep before
//! respawns.

use glam::Vec2;

use super::autopilot;
use super::hazard::{HazardEvent, apply_blast};
use super::state::{GameEvent, GamePhase, GameState};
use crate::timer_elapsed;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal move axis in [-1, 1]
    pub move_x: f32,
    /// Vertical move axis in [-1, 1] (down is positive)
    pub move_y: f32,
    /// Attack trigger (edge)
    pub attack: bool,
    /// Roll trigger (edge)
    pub roll: bool,
    /// Throw the held bomb (edge)
    pub throw: bool,
    /// Leave the title screen
    pub start: bool,
    /// Restart after game over
    pub restart: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

impl TickInput {
    fn intent(&self) -> Vec2 {
        Vec2::new(self.move_x, self.move_y)
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    let mut input = input.clone();
    if input.idle_mode {
        autopilot::drive(state, &mut input);
    }

    match state.phase {
        GamePhase::Menu => {
            if input.start {
                state.start();
            }
            freeze_enemies(state);
            return;
        }
        GamePhase::GameOver => {
            if input.restart {
                state.restart();
            }
            freeze_enemies(state);
            return;
        }
        GamePhase::Playing => {}
    }

    state.play_time += dt;
    advance_difficulty(state, dt);

    // Player
    let intent = input.intent();
    if input.attack {
        state.player.attack();
    }
    if input.roll {
        state.player.roll(intent, &state.tuning.player);
    }
    if input.throw {
        throw_bomb(state);
    }
    state
        .player
        .update(intent, dt, &state.level, &state.tuning.player);

    update_enemies(state, dt);
    // Death ends the tick; nothing later may heal or score
    if state.phase != GamePhase::Playing {
        return;
    }
    update_hazards(state, dt);

    state.spawn_bomb();

    collect_health(state);
    collect_bomb(state);

    resolve_attack(state);

    sweep_dead(state);
    state.respawn_enemies();
}

/// Zero every enemy's velocity (world not running)
fn freeze_enemies(state: &mut GameState) {
    for enemy in &mut state.enemies {
        enemy.freeze();
    }
}

/// Grow the population cap once per interval of play, up to the ceiling
fn advance_difficulty(state: &mut GameState, dt: f32) {
    let interval = state.tuning.population.increase_interval;
    let ceiling = state.tuning.population.max_cap;
    state.enemy_increase_timer += dt;
    while timer_elapsed(state.enemy_increase_timer, interval) {
        state.enemy_increase_timer -= interval;
        if state.max_enemies < ceiling {
            state.max_enemies += 1;
            let cap = state.max_enemies;
            log::info!("Enemy cap raised to {cap}");
            state.push_event(GameEvent::CapRaised { cap });
        }
    }
}

/// Release the held bomb toward the player's facing
fn throw_bomb(state: &mut GameState) {
    let Some(id) = state.player.carried_bomb() else {
        return;
    };
    let origin = state.player.body.visual_center() + state.tuning.hazard.throw_offset;
    let facing = state.player.facing;
    let Some(hazard) = state.hazards.iter_mut().find(|h| h.id == id) else {
        state.player.release_bomb();
        return;
    };
    if hazard.throw(origin, facing, &state.tuning.hazard) {
        state.player.release_bomb();
        log::debug!("Bomb {} thrown, replacement spawns once it is gone", id.0);
        state.push_event(GameEvent::BombThrown { id });
    }
}

fn update_enemies(state: &mut GameState, dt: f32) {
    let target = *state.player.hitbox();
    let mut damage = 0;
    for enemy in &mut state.enemies {
        damage += enemy.update(&target, &state.level, dt);
    }
    if damage > 0 {
        let hp = state.player.take_damage(damage);
        state.push_event(GameEvent::PlayerHurt { hp });
        if hp == 0 {
            state.end();
        }
    }
}

fn update_hazards(state: &mut GameState, dt: f32) {
    let carrier = state.player.carry_anchor(&state.tuning.player);
    let bounds = state.level.bounds();
    let tuning = &state.tuning.hazard;
    let mut events = Vec::new();

    for hazard in &mut state.hazards {
        let anchor = (state.player.carried_bomb() == Some(hazard.id)).then_some(carrier);
        match hazard.update(dt, anchor, &bounds, tuning) {
            Some(HazardEvent::Detonated { center }) => {
                let hits = apply_blast(center, tuning.blast_radius, tuning.blast_damage, &mut state.enemies);
                events.push(GameEvent::BombExploded {
                    id: hazard.id,
                    center,
                    hits,
                });
            }
            Some(HazardEvent::Expired) => {
                state.bomb_available = true;
                events.push(GameEvent::BombExpired { id: hazard.id });
            }
            None => {}
        }
    }

    for event in events {
        state.push_event(event);
    }
}

/// Consume overlapped food, then restock to the target count
fn collect_health(state: &mut GameState) {
    let hitbox = *state.player.hitbox();
    let mut healed = false;
    let mut i = 0;
    while i < state.health_pickups.len() {
        if state.health_pickups[i].hitbox.overlaps(&hitbox) {
            let pickup = state.health_pickups.swap_remove(i);
            let hp = state.player.heal(pickup.heal);
            log::debug!("Ate {:?}, hp {hp}", pickup.food);
            state.push_event(GameEvent::PlayerHealed { hp });
            healed = true;
        } else {
            i += 1;
        }
    }
    if healed {
        state.top_up_health();
    }
}

/// Attach an overlapped ground bomb if the player's hands are free
fn collect_bomb(state: &mut GameState) {
    if !state.player.can_pick_bomb() {
        return;
    }
    let hitbox = *state.player.hitbox();
    let Some(hazard) = state
        .hazards
        .iter_mut()
        .find(|h| h.is_on_ground() && h.hitbox().overlaps(&hitbox))
    else {
        return;
    };
    if hazard.pick_up() {
        let id = hazard.id;
        state.player.attach_bomb(id);
        state.push_event(GameEvent::BombPickedUp { id });
    }
}

/// Apply the live attack box to overlapping enemies
fn resolve_attack(state: &mut GameState) {
    let Some(attack) = state.player.attack_hitbox(&state.tuning.player) else {
        return;
    };
    let multi_hit = state.tuning.player.attack_multi_hit;
    for enemy in state.enemies.iter_mut().filter(|e| e.is_alive()) {
        if !enemy.hitbox().overlaps(&attack) {
            continue;
        }
        if multi_hit || state.player.register_hit(enemy.id) {
            enemy.take_damage(1);
        }
    }
}

/// Drop dead enemies (scoring each) and finished bombs
fn sweep_dead(state: &mut GameState) {
    let mut killed = Vec::new();
    state.enemies.retain(|e| {
        if e.is_alive() {
            true
        } else {
            killed.push((e.id, e.kind()));
            false
        }
    });
    for (id, kind) in killed {
        state.score += 1;
        state.push_event(GameEvent::EnemyKilled { id, kind });
    }
    state.hazards.retain(|h| !h.is_removed());
}
