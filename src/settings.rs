//! Game settings and tuning
//!
//! Persisted as JSON next to the binary; every field has a default so partial
//! files load cleanly.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sim::Category;

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    /// Large asteroids spawned per level step
    pub fn starting_asteroids(&self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Normal => 2,
            Difficulty::Hard => 3,
        }
    }

    /// Seconds the player waits before respawning
    pub fn respawn_delay(&self) -> f64 {
        match self {
            Difficulty::Easy => 1.5,
            Difficulty::Normal => 2.0,
            Difficulty::Hard => 3.0,
        }
    }
}

/// Movement limits and contact size for one category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionProfile {
    /// Velocity magnitude cap (units/sec)
    pub max_speed: f32,
    /// Multiplier applied to an entity's spin angle each second
    pub spin_rate: f32,
    /// Contact circle radius
    pub radius: f32,
}

impl MotionProfile {
    pub const fn new(max_speed: f32, spin_rate: f32, radius: f32) -> Self {
        Self {
            max_speed,
            spin_rate,
            radius,
        }
    }
}

/// Motion profiles for every category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionTable {
    pub player: MotionProfile,
    pub bullet: MotionProfile,
    pub asteroid_large: MotionProfile,
    pub asteroid_medium: MotionProfile,
    pub asteroid_small: MotionProfile,
}

impl Default for MotionTable {
    fn default() -> Self {
        Self {
            player: MotionProfile::new(15.0, 0.0, 1.0),
            bullet: MotionProfile::new(30.0, 0.0, 0.25),
            asteroid_large: MotionProfile::new(4.0, 1.0, 3.0),
            asteroid_medium: MotionProfile::new(6.0, 1.0, 2.0),
            asteroid_small: MotionProfile::new(8.0, 1.0, 1.0),
        }
    }
}

impl MotionTable {
    pub fn get(&self, category: Category) -> &MotionProfile {
        match category {
            Category::Player => &self.player,
            Category::Bullet => &self.bullet,
            Category::AsteroidLarge => &self.asteroid_large,
            Category::AsteroidMedium => &self.asteroid_medium,
            Category::AsteroidSmall => &self.asteroid_small,
        }
    }
}

/// Fixed pool sizes, allocated once at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolCapacities {
    pub player: usize,
    pub bullet: usize,
    pub asteroid_large: usize,
    pub asteroid_medium: usize,
    pub asteroid_small: usize,
}

impl Default for PoolCapacities {
    fn default() -> Self {
        Self {
            player: 1,
            bullet: 16,
            asteroid_large: 16,
            asteroid_medium: 32,
            asteroid_small: 64,
        }
    }
}

impl PoolCapacities {
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Player => self.player,
            Category::Bullet => self.bullet,
            Category::AsteroidLarge => self.asteroid_large,
            Category::AsteroidMedium => self.asteroid_medium,
            Category::AsteroidSmall => self.asteroid_small,
        }
    }
}

/// Game settings/tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Difficulty preset
    pub difficulty: Difficulty,

    // === Field ===
    /// Half width/height of the visible play field
    pub viewport_half_extent: Vec2,
    /// Large asteroids per level step (level N spawns this × (N + 1))
    pub starting_asteroids: u32,
    /// Highest level index the game advances to
    pub max_level: u32,
    /// Asteroids never spawn closer than this to the player spawn point
    pub spawn_clearance: f32,

    // === Entities ===
    pub motion: MotionTable,
    pub pools: PoolCapacities,
    /// Player orientation easing rate toward the aim point
    pub player_turn_rate: f32,
    pub player_spawn_position: Vec2,
    pub player_spawn_orientation: f32,

    // === Timers (seconds) ===
    /// Delay before a prepared scene is populated
    pub scene_setup_delay: f64,
    /// Delay between losing a life and reappearing
    pub respawn_delay: f64,
    /// Bullets deactivate this long after being fired
    pub bullet_lifetime: f64,
    /// Minimum time between shots while the fire button is held
    pub weapon_cooldown: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED_A57E,
            difficulty: Difficulty::Normal,

            viewport_half_extent: Vec2::new(40.0, 22.5),
            starting_asteroids: Difficulty::Normal.starting_asteroids(),
            max_level: 4,
            spawn_clearance: 8.0,

            motion: MotionTable::default(),
            pools: PoolCapacities::default(),
            player_turn_rate: 10.0,
            player_spawn_position: Vec2::ZERO,
            player_spawn_orientation: 0.0,

            scene_setup_delay: 0.5,
            respawn_delay: Difficulty::Normal.respawn_delay(),
            bullet_lifetime: 3.0,
            weapon_cooldown: 0.5,
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset (applies preset defaults)
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        let mut settings = Self::default();
        settings.apply_difficulty(difficulty);
        settings
    }

    /// Apply a difficulty preset (updates difficulty-dependent values)
    pub fn apply_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.starting_asteroids = difficulty.starting_asteroids();
        self.respawn_delay = difficulty.respawn_delay();
    }

    /// Most large asteroids any level can ask for
    pub fn peak_large_asteroids(&self) -> usize {
        (self.starting_asteroids as usize) * (self.max_level as usize + 1)
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.viewport_half_extent.x <= 0.0 || self.viewport_half_extent.y <= 0.0 {
            return Err(format!(
                "viewport half extent must be positive, got {:?}",
                self.viewport_half_extent
            )
            .into());
        }
        for category in Category::ALL {
            if self.pools.get(category) == 0 {
                return Err(format!("pool for {} has zero capacity", category.as_str()).into());
            }
            if self.motion.get(category).max_speed < 0.0 {
                return Err(format!("{} max speed is negative", category.as_str()).into());
            }
        }
        if self.pools.asteroid_large < self.peak_large_asteroids() {
            log::warn!(
                "large asteroid pool ({}) is smaller than the peak level needs ({}); spawns will be skipped",
                self.pools.asteroid_large,
                self.peak_large_asteroids()
            );
        }
        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is absent or bad
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::info!("Using default settings ({e})");
                Self::default()
            }
        }
    }

    /// Save settings as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_defaults_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_apply_difficulty() {
        let settings = Settings::from_difficulty(Difficulty::Hard);
        assert_eq!(settings.starting_asteroids, 3);
        assert_eq!(settings.respawn_delay, 3.0);
        assert_eq!(settings.difficulty.as_str(), "Hard");
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut settings = Settings::default();
        settings.pools.bullet = 0;
        assert!(matches!(settings.validate(), Err(Error::InvalidSettings(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "max_level": 7 }"#).unwrap();
        assert_eq!(settings.max_level, 7);
        assert_eq!(settings.pools, PoolCapacities::default());
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("solid_asteroids_settings_{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.seed = 42;
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, settings);
    }
}
