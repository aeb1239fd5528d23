//! Demo mode - the autopilot plays the game
//!
//! Reads only the game state, so a seeded run with the autopilot engaged is
//! fully reproducible.

use glam::Vec2;

use super::state::{GamePhase, GameState};
use super::tick::TickInput;

/// Seconds of asteroid motion to lead the aim by
const AIM_LEAD: f32 = 0.2;
/// Extra clearance (beyond both radii) that makes the ship back away
const DANGER_MARGIN: f32 = 4.0;

/// Build this tick's input from the current state
pub fn drive(state: &GameState, base: &TickInput) -> TickInput {
    let mut input = base.clone();

    // Start the next game straight from the menu
    if state.phase() == GamePhase::Menu {
        input.new_game = true;
        return input;
    }

    let Some(player) = state.player_entity().filter(|p| p.active) else {
        input.fire = false;
        return input;
    };

    let motion = &state.settings.motion;
    let threat = state
        .pool
        .iter_active()
        .filter(|e| e.category.is_asteroid())
        .min_by(|a, b| {
            a.pos
                .distance_squared(player.pos)
                .total_cmp(&b.pos.distance_squared(player.pos))
        });

    let Some(rock) = threat else {
        // Nothing to shoot; hold position
        input.fire = false;
        input.movement = brake(player.vel, motion.player.max_speed);
        return input;
    };

    input.aim = Some(rock.pos + rock.vel * AIM_LEAD);
    input.fire = true;

    let away = player.pos - rock.pos;
    let danger = motion.player.radius + motion.get(rock.category).radius + DANGER_MARGIN;
    input.movement = if away.length() < danger {
        away.normalize_or_zero()
    } else {
        brake(player.vel, motion.player.max_speed)
    };

    input
}

/// Movement that cancels the current velocity
fn brake(vel: Vec2, max_speed: f32) -> Vec2 {
    if max_speed <= 0.0 {
        return Vec2::ZERO;
    }
    (-vel / max_speed).clamp(Vec2::NEG_ONE, Vec2::ONE)
}
