//! Per-frame simulation tick
//!
//! Order within a tick: new-game request, due deferred tasks, player control
//! and weapon, kinematics for every live entity, contacts and reactions.

use glam::Vec2;

use super::autopilot;
use super::collision::detect_contacts;
use super::kinematics::{self, turn_toward};
use super::state::{Category, GamePhase, GameState};
use crate::consts::PLAYER_SPEED_MARGIN;
use crate::heading;
use crate::orientation_of;
use crate::ui::UiHost;

/// Input for a single tick, read once from the input host
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement axes, each in [-1, 1]
    pub movement: Vec2,
    /// World-space point the ship should face
    pub aim: Option<Vec2>,
    /// Fire button held
    pub fire: bool,
    /// New Game pressed on the menu
    pub new_game: bool,
    /// Demo mode - the autopilot plays the game
    pub autopilot: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, ui: &mut dyn UiHost) {
    let input = if input.autopilot {
        autopilot::drive(state, input)
    } else {
        input.clone()
    };

    if input.new_game && state.phase() == GamePhase::Menu {
        state.new_game(ui);
    }

    state.time_ticks += 1;
    state.clock += f64::from(dt);
    state.run_due_tasks(ui);

    control_player(state, &input, dt);
    integrate(state, &input, dt);

    let contacts = detect_contacts(state);
    if !contacts.is_empty() {
        state.apply_contacts(&contacts, ui);
    }
}

/// Aim the ship and fire the weapon
fn control_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let Some(id) = state.player else {
        return;
    };
    let turn = dt * state.settings.player_turn_rate;
    let Some(player) = state.pool.get_mut(id).filter(|e| e.active) else {
        return;
    };

    if let Some(aim) = input.aim {
        let to_aim = aim - player.pos;
        if to_aim.length_squared() > f32::EPSILON {
            player.orientation = turn_toward(player.orientation, orientation_of(to_aim), turn);
        }
    }
    let (pos, orientation) = (player.pos, player.orientation);

    if state.weapon.update(input.fire, dt) {
        state.spawn_bullet(pos, orientation);
    }
}

/// Kinematic step for every active entity
fn integrate(state: &mut GameState, input: &TickInput, dt: f32) {
    let half = state.settings.viewport_half_extent;
    let movement = input.movement.clamp(Vec2::NEG_ONE, Vec2::ONE);

    for entity in state.pool.iter_active_mut() {
        let profile = state.settings.motion.get(entity.category);
        let (intent, limit) = match entity.category {
            Category::Player => (movement, profile.max_speed + PLAYER_SPEED_MARGIN),
            Category::Bullet => (heading(entity.orientation), profile.max_speed),
            _ => (entity.drift, profile.max_speed),
        };
        kinematics::step(entity, intent, profile, limit, half, dt);
    }
}
