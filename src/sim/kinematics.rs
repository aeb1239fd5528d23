//! Kinematic actor step
//!
//! Every live entity runs the same four stages per tick: wrap, accumulate
//! intent, ease toward `pos + vel`, spin. Easing by `dt` is a stylistic
//! approach curve, not an exact integrator.
//!
//! The wrap test uses the position from the end of the previous tick, so an
//! entity can be drawn one frame past the edge before it reappears opposite.

use glam::Vec2;

use super::state::Entity;
use crate::normalize_angle;
use crate::settings::MotionProfile;

/// Toroidal correction: a coordinate past the half extent moves one full
/// extent the other way. Positions already in bounds are returned unchanged.
pub fn screen_wrap(pos: Vec2, half_extent: Vec2) -> Vec2 {
    let mut next = pos;

    if pos.x > half_extent.x {
        next.x -= 2.0 * half_extent.x;
    } else if pos.x < -half_extent.x {
        next.x += 2.0 * half_extent.x;
    }

    if pos.y > half_extent.y {
        next.y -= 2.0 * half_extent.y;
    } else if pos.y < -half_extent.y {
        next.y += 2.0 * half_extent.y;
    }

    next
}

/// Add `intent` scaled by `max_speed`, then cap the magnitude at `limit`
pub fn accumulate_intent(vel: Vec2, intent: Vec2, max_speed: f32, limit: f32) -> Vec2 {
    (vel + intent * max_speed).clamp_length_max(limit)
}

/// Move a fraction `dt` of the way toward `pos + vel`
pub fn approach(pos: Vec2, vel: Vec2, dt: f32) -> Vec2 {
    pos.lerp(pos + vel, dt.clamp(0.0, 1.0))
}

/// Ease an angle toward `target` along the shortest arc by fraction `t`
pub fn turn_toward(current: f32, target: f32, t: f32) -> f32 {
    let delta = normalize_angle(target - current);
    normalize_angle(current + delta * t.clamp(0.0, 1.0))
}

/// One tick of movement for `entity`
pub fn step(
    entity: &mut Entity,
    intent: Vec2,
    profile: &MotionProfile,
    speed_limit: f32,
    half_extent: Vec2,
    dt: f32,
) {
    entity.pos = screen_wrap(entity.pos, half_extent);
    entity.vel = accumulate_intent(entity.vel, intent, profile.max_speed, speed_limit);
    entity.pos = approach(entity.pos, entity.vel, dt);
    if entity.spin != 0.0 {
        entity.orientation = normalize_angle(entity.orientation + entity.spin * profile.spin_rate * dt);
    }
}
