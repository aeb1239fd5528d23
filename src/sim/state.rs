//! Game state and core simulation types
//!
//! `GameState` is the session context every subsystem receives explicitly;
//! nothing in the simulation reaches for a global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pool::EntityPool;
use super::progression::Task;
use super::schedule::{Scheduler, Token};
use super::weapon::Weapon;
use crate::consts::MAX_LIVES;
use crate::error::{Error, Result};
use crate::highscores::HighScores;
use crate::settings::Settings;
use crate::ui::{self, Panel, UiHost};

/// Logical entity type; selects the pool and the behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Player,
    Bullet,
    AsteroidLarge,
    AsteroidMedium,
    AsteroidSmall,
}

impl Category {
    pub const COUNT: usize = 5;

    pub const ALL: [Category; Category::COUNT] = [
        Category::Player,
        Category::Bullet,
        Category::AsteroidLarge,
        Category::AsteroidMedium,
        Category::AsteroidSmall,
    ];

    pub const ASTEROIDS: [Category; 3] = [
        Category::AsteroidLarge,
        Category::AsteroidMedium,
        Category::AsteroidSmall,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Category for a raw index (e.g. from a host-side prefab table)
    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(Error::InvalidCategory(index))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Player => "player",
            Category::Bullet => "bullet",
            Category::AsteroidLarge => "asteroid-large",
            Category::AsteroidMedium => "asteroid-medium",
            Category::AsteroidSmall => "asteroid-small",
        }
    }

    pub fn is_asteroid(self) -> bool {
        matches!(
            self,
            Category::AsteroidLarge | Category::AsteroidMedium | Category::AsteroidSmall
        )
    }

    /// The smaller asteroid a destroyed one splits into
    pub fn fragment(self) -> Option<Category> {
        match self {
            Category::AsteroidLarge => Some(Category::AsteroidMedium),
            Category::AsteroidMedium => Some(Category::AsteroidSmall),
            _ => None,
        }
    }
}

impl TryFrom<usize> for Category {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self> {
        Self::from_index(index)
    }
}

/// Stable handle to a pooled entity (index into the pool arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A pre-allocated entity; toggled active/inactive, never freed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub category: Category,
    pub active: bool,
    /// Bumped on every acquire; scopes deferred work to one activation
    pub generation: u32,
    pub pos: Vec2,
    /// Radians, 0 faces +Y
    pub orientation: f32,
    pub vel: Vec2,
    /// Constant intent fed to the kinematic step (asteroids)
    pub drift: Vec2,
    /// Spin angle, scaled by the category spin rate each second
    pub spin: f32,
    /// Hits left before destruction; may go negative under simultaneous hits
    pub health: i32,
}

impl Entity {
    pub fn new(id: EntityId, category: Category) -> Self {
        Self {
            id,
            category,
            active: false,
            generation: 0,
            pos: Vec2::ZERO,
            orientation: 0.0,
            vel: Vec2::ZERO,
            drift: Vec2::ZERO,
            spin: 0.0,
            health: 1,
        }
    }

    /// Clear per-activation motion state
    pub fn reset_motion(&mut self) {
        self.vel = Vec2::ZERO;
        self.drift = Vec2::ZERO;
        self.spin = 0.0;
        self.health = 1;
    }

    /// Token that stays live only for this activation
    pub fn token(&self) -> Token {
        Token::Entity {
            id: self.id,
            generation: self.generation,
        }
    }
}

/// Current phase of the game progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before boot
    #[default]
    None,
    /// Reset level, lives and score
    Initialize,
    /// Main menu shown, waiting for New Game
    Menu,
    /// First level of a run being set up
    PrepareScene,
    /// Active gameplay
    Play,
    /// Next level being set up
    NextLevel,
}

/// Notifications for the host (audio, effects, logging)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    ShotFired { id: EntityId },
    SpawnSkipped { category: Category },
    AsteroidDamaged { id: EntityId, health: i32 },
    AsteroidDestroyed { category: Category, pos: Vec2 },
    PlayerHit { lives: u8 },
    PlayerRespawned,
    LevelAdvanced { level: u32 },
    GameOver { score: u64, level: u32, new_high_score: bool },
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Tuning the session was built with
    pub settings: Settings,
    /// Seeded RNG (asteroid placement, drift, spin)
    pub rng: Pcg32,
    /// Current level index (0-based)
    pub level: u32,
    /// Lives remaining
    pub lives: u8,
    /// Score (only ever increases within a run)
    pub score: u64,
    /// Simulated seconds since boot
    pub clock: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Every category's entities
    pub pool: EntityPool,
    /// Player handle once it has been spawned
    pub player: Option<EntityId>,
    pub weapon: Weapon,
    pub scheduler: Scheduler<Task>,
    pub high_scores: HighScores,
    /// Events since the last `drain_events`
    pub events: Vec<GameEvent>,
    pub(super) phase: GamePhase,
    /// Bumped on every phase change
    pub(super) epoch: u64,
    /// Bumped on every new run
    pub(super) session: u64,
}

impl GameState {
    /// Build a session in `GamePhase::None`; entities are allocated here
    pub fn new(settings: Settings) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            level: 0,
            lives: MAX_LIVES,
            score: 0,
            clock: 0.0,
            time_ticks: 0,
            pool: EntityPool::new(&settings.pools),
            player: None,
            weapon: Weapon::new(settings.weapon_cooldown),
            scheduler: Scheduler::new(),
            high_scores: HighScores::new(),
            events: Vec::new(),
            phase: GamePhase::None,
            epoch: 0,
            session: 0,
            settings,
        }
    }

    /// Validate settings and UI bindings, hide the HUD and open the menu
    pub fn boot(settings: Settings, ui: &mut dyn UiHost) -> Result<Self> {
        settings.validate()?;
        if let Err(e) = ui::check_bindings(ui, MAX_LIVES as usize) {
            log::error!("UI binding check failed: {e}");
            return Err(e);
        }

        let mut state = Self::new(settings);
        ui.set_panel_visible(Panel::Hud, false);
        state.set_phase(GamePhase::Menu, ui);
        Ok(state)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Whether deferred work carrying `token` may still run
    pub fn token_live(&self, token: &Token) -> bool {
        match *token {
            Token::Phase(epoch) => epoch == self.epoch,
            Token::Session(session) => session == self.session,
            Token::Entity { id, generation } => self
                .pool
                .get(id)
                .is_some_and(|e| e.active && e.generation == generation),
        }
    }

    /// Award points; the score never decreases
    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Active asteroids of every size
    pub fn asteroid_count(&self) -> usize {
        Category::ASTEROIDS
            .iter()
            .map(|&c| self.pool.active_count(c))
            .sum()
    }

    pub fn player_entity(&self) -> Option<&Entity> {
        self.player.and_then(|id| self.pool.get(id))
    }

    pub fn player_active(&self) -> bool {
        self.player_entity().is_some_and(|e| e.active)
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Resize the play field (render host viewport change). Degenerate
    /// extents, such as a minimized window reporting zero, keep the current
    /// field. Returns whether the new extents were applied.
    pub fn set_viewport(&mut self, half_extent: Vec2) -> bool {
        if !half_extent.is_finite() || half_extent.x <= 0.0 || half_extent.y <= 0.0 {
            log::warn!(
                "Ignoring viewport half extent {:?}, keeping {:?}",
                half_extent,
                self.settings.viewport_half_extent
            );
            return false;
        }
        self.settings.viewport_half_extent = half_extent;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::HeadlessUi;

    #[test]
    fn test_category_from_index() {
        assert_eq!(Category::from_index(2).unwrap(), Category::AsteroidLarge);
        assert!(matches!(
            Category::try_from(9),
            Err(Error::InvalidCategory(9))
        ));
    }

    #[test]
    fn test_category_fragments() {
        assert_eq!(Category::AsteroidLarge.fragment(), Some(Category::AsteroidMedium));
        assert_eq!(Category::AsteroidMedium.fragment(), Some(Category::AsteroidSmall));
        assert_eq!(Category::AsteroidSmall.fragment(), None);
        assert_eq!(Category::Bullet.fragment(), None);
    }

    #[test]
    fn test_boot_opens_menu() {
        let mut ui = HeadlessUi::new(3);
        let state = GameState::boot(Settings::default(), &mut ui).unwrap();
        assert_eq!(state.phase(), GamePhase::Menu);
        assert!(ui.menu_visible);
        assert!(!ui.hud_visible);
    }

    #[test]
    fn test_boot_rejects_missing_icons() {
        let mut ui = HeadlessUi::new(2);
        let err = GameState::boot(Settings::default(), &mut ui).unwrap_err();
        assert!(matches!(err, Error::MissingLifeIcons { found: 2, needed: 3 }));
    }

    #[test]
    fn test_set_viewport_rejects_degenerate_extents() {
        let mut state = GameState::new(Settings::default());
        let before = state.settings.viewport_half_extent;
        assert!(!state.set_viewport(Vec2::ZERO));
        assert!(!state.set_viewport(Vec2::new(30.0, -1.0)));
        assert!(!state.set_viewport(Vec2::new(f32::NAN, 10.0)));
        assert!(!state.set_viewport(Vec2::new(f32::INFINITY, 10.0)));
        assert_eq!(state.settings.viewport_half_extent, before);

        assert!(state.set_viewport(Vec2::new(32.0, 18.0)));
        assert_eq!(state.settings.viewport_half_extent, Vec2::new(32.0, 18.0));
    }

    #[test]
    fn test_add_score_is_monotonic() {
        let mut state = GameState::new(Settings::default());
        state.add_score(10);
        state.add_score(u64::MAX);
        assert_eq!(state.score, u64::MAX);
    }
}
