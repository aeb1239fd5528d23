//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies; hosts are reached through `UiHost`

pub mod autopilot;
pub mod collision;
pub mod kinematics;
pub mod pool;
pub mod progression;
pub mod schedule;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod weapon;

pub use collision::{Contact, Reaction, collides, detect_contacts, react};
pub use kinematics::screen_wrap;
pub use pool::EntityPool;
pub use progression::Task;
pub use schedule::{Scheduler, Token};
pub use spawn::{spawn, split_directions};
pub use state::{Category, Entity, EntityId, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use weapon::Weapon;
