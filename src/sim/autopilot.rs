//! Idle/demo mode: synthesize player input from the current state
//!
//! Priorities, highest first: leave the title and game-over screens, throw a
//! held bomb at a lined-up enemy, fetch food when hurt, fetch the bomb when
//! nothing is close, then chase and swing at the nearest enemy.

use glam::Vec2;

use super::anim::Facing;
use super::state::{GamePhase, GameState};
use super::tick::TickInput;

/// Enemies closer than this are attacked instead of approached
const ATTACK_RANGE: f32 = 40.0;
/// Bomb throws only at enemies within this horizontal distance
const THROW_RANGE: f32 = 160.0;
/// ...and this vertical misalignment
const THROW_LANE: f32 = 24.0;
/// Enemies closer than this make fetching the bomb too risky
const DANGER_RADIUS: f32 = 80.0;
/// Per-axis deadzone when steering toward a point
const STEER_DEADZONE: f32 = 3.0;

/// Fill `input` with autopilot decisions
pub fn drive(state: &GameState, input: &mut TickInput) {
    match state.phase {
        GamePhase::Menu => {
            input.start = true;
            return;
        }
        GamePhase::GameOver => {
            input.restart = true;
            return;
        }
        GamePhase::Playing => {}
    }

    let player = &state.player;
    let me = player.body.pos();
    let nearest_enemy = state
        .enemies
        .iter()
        .filter(|e| e.is_alive())
        .map(|e| e.hitbox().center())
        .min_by(|a, b| a.distance(me).total_cmp(&b.distance(me)));

    if player.has_bomb() {
        let lined_up = state
            .enemies
            .iter()
            .map(|e| e.hitbox().center() - me)
            .find(|d| d.x.abs() <= THROW_RANGE && d.y.abs() <= THROW_LANE);
        if let Some(delta) = lined_up {
            if player.facing == Facing::Right.from_dx(delta.x) || delta.x == 0.0 {
                input.throw = true;
            } else {
                input.move_x = delta.x.signum();
            }
            return;
        }
    }

    if player.hp() < player.max_hp() {
        let food = state
            .health_pickups
            .iter()
            .map(|p| p.hitbox.center())
            .min_by(|a, b| a.distance(me).total_cmp(&b.distance(me)));
        if let Some(target) = food {
            steer(input, me, target);
            return;
        }
    }

    let safe = nearest_enemy.is_none_or(|e| e.distance(me) > DANGER_RADIUS);
    if !player.has_bomb() && safe {
        if let Some(bomb) = state.hazards.iter().find(|h| h.is_on_ground()) {
            steer(input, me, bomb.pos());
            return;
        }
    }

    if let Some(target) = nearest_enemy {
        if target.distance(me) <= ATTACK_RANGE {
            let delta = target - me;
            if player.facing == Facing::Right.from_dx(delta.x) || delta.x == 0.0 {
                input.attack = !player.is_attacking();
            } else {
                input.move_x = delta.x.signum();
            }
        } else {
            steer(input, me, target);
        }
    }
}

/// Per-axis steering toward `target`
fn steer(input: &mut TickInput, from: Vec2, target: Vec2) {
    let delta = target - from;
    input.move_x = if delta.x.abs() > STEER_DEADZONE { delta.x.signum() } else { 0.0 };
    input.move_y = if delta.y.abs() > STEER_DEADZONE { delta.y.signum() } else { 0.0 };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use crate::tuning::Tuning;

    #[test]
    fn test_leaves_menu_and_game_over() {
        let mut state = GameState::new(Level::demo(), Tuning::default(), 1);
        let mut input = TickInput::default();
        drive(&state, &mut input);
        assert!(input.start);

        state.start();
        state.end();
        let mut input = TickInput::default();
        drive(&state, &mut input);
        assert!(input.restart);
    }

    #[test]
    fn test_heads_for_food_when_hurt() {
        let mut state = GameState::new(Level::demo(), Tuning::default(), 2);
        state.start();
        state.enemies.clear();
        state.player.take_damage(1);
        let me = state.player.body.pos();
        let food = state
            .health_pickups
            .iter()
            .map(|p| p.hitbox.center())
            .min_by(|a, b| a.distance(me).total_cmp(&b.distance(me)))
            .unwrap();

        let mut input = TickInput::default();
        drive(&state, &mut input);
        let dir = Vec2::new(input.move_x, input.move_y);
        assert!(dir != Vec2::ZERO);
        assert!(dir.dot(food - me) > 0.0);
    }
}
