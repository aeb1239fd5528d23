//! Player weapon cooldown

use serde::{Deserialize, Serialize};

/// Fire-button cooldown. The timer only advances while the trigger is held;
/// a shot is released each time it passes the cooldown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub cooldown: f32,
    timer: f32,
}

impl Weapon {
    /// Starts primed so the first press fires on its first tick
    pub fn new(cooldown: f32) -> Self {
        Self {
            cooldown,
            timer: cooldown,
        }
    }

    /// Advance the cooldown; returns true when a shot should be fired
    pub fn update(&mut self, trigger_held: bool, dt: f32) -> bool {
        let mut fire = false;
        if trigger_held {
            self.timer += dt;
            if self.timer > self.cooldown {
                fire = true;
                self.timer = 0.0;
            }
        }
        if self.timer > self.cooldown {
            self.timer = 0.0;
        }
        fire
    }

    /// Prime for a new run
    pub fn reset(&mut self) {
        self.timer = self.cooldown;
    }
}
