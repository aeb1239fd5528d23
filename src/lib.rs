//! Solid Asteroids - A pooled-entity arcade shooter simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pool, kinematics, collisions, game phases)
//! - `ui`: UI host abstraction (HUD text, life icons, menu panels)
//! - `highscores`: In-memory leaderboard
//! - `settings`: Data-driven game tuning
//! - `error`: Error types

pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod ui;

pub use error::{Error, Result};
pub use highscores::HighScores;
pub use settings::{Difficulty, Settings};

use glam::Vec2;

/// Game rule constants
pub mod consts {
    /// Fixed simulation timestep used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Lives at the start of a run (one HUD icon each)
    pub const MAX_LIVES: u8 = 3;
    /// Points for every projectile hit that destroys an asteroid
    pub const SCORE_PER_KILL: u64 = 10;

    /// Play phase checks for a cleared field this often (10 Hz)
    pub const FIELD_POLL_INTERVAL: f64 = 0.1;

    /// Extra speed the player may carry above its max speed
    pub const PLAYER_SPEED_MARGIN: f32 = 5.0;

    /// Health of a freshly spawned large asteroid
    pub const LARGE_ASTEROID_HEALTH: i32 = 2;

    /// Drift intent magnitude of split fragments, relative to full thrust
    pub const SPLIT_INTENT_SCALE: f32 = 0.154_251_45;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit forward vector for an orientation (0 faces +Y, counter-clockwise positive)
#[inline]
pub fn heading(orientation: f32) -> Vec2 {
    Vec2::new(-orientation.sin(), orientation.cos())
}

/// Orientation whose `heading` points along `dir`
#[inline]
pub fn orientation_of(dir: Vec2) -> f32 {
    (-dir.x).atan2(dir.y)
}

/// Reflect a vector off a surface with the given unit normal
#[inline]
pub fn reflect(v: Vec2, normal: Vec2) -> Vec2 {
    v - 2.0 * v.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
        assert!((normalize_angle(-3.0 * FRAC_PI_2) - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_heading_round_trips_through_orientation() {
        for dir in [Vec2::Y, -Vec2::X, Vec2::new(0.6, -0.8)] {
            let back = heading(orientation_of(dir));
            assert!((back - dir).length() < 1e-5, "{dir:?} -> {back:?}");
        }
    }

    #[test]
    fn test_reflect() {
        // Moving right, hits a wall whose normal points left
        let r = reflect(Vec2::new(100.0, 0.0), Vec2::new(-1.0, 0.0));
        assert!((r.x + 100.0).abs() < 1e-4);
        assert!(r.y.abs() < 1e-4);
    }
}
