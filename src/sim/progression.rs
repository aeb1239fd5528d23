//! Game progression controller
//!
//! Phases change only through `set_phase`, which ignores requests for the
//! phase already current. Entering a phase runs its action once. Delays are
//! scheduled tasks tagged with the phase epoch, so leaving the phase cancels
//! them.

use serde::{Deserialize, Serialize};

use super::schedule::Token;
use super::state::{Category, EntityId, GameEvent, GamePhase, GameState};
use crate::consts::{FIELD_POLL_INTERVAL, MAX_LIVES};
use crate::highscores::format_high_score;
use crate::ui::{Panel, TextField, UiHost};

/// Deferred work owned by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    /// Spawn the level's asteroids (and the player on level 0), then Play
    PopulateScene,
    /// 10 Hz check for a cleared field
    PollField,
    /// Bring the player back after losing a life
    RespawnPlayer,
    /// Bullet lifetime ran out
    ExpireBullet(EntityId),
}

impl GameState {
    /// Switch phase and run its entry action. Returns false if already there.
    pub fn set_phase(&mut self, next: GamePhase, ui: &mut dyn UiHost) -> bool {
        if self.phase == next {
            return false;
        }

        let from = self.phase;
        self.phase = next;
        self.epoch += 1;
        let epoch = self.epoch;
        let cancelled = self
            .scheduler
            .cancel_where(|t| matches!(t, Token::Phase(e) if *e != epoch));
        if cancelled > 0 {
            log::trace!("Cancelled {cancelled} task(s) from {from:?}");
        }

        log::info!("Phase {:?} -> {:?} (level {})", from, next, self.level);
        self.events.push(GameEvent::PhaseChanged { from, to: next });
        self.enter_phase(ui);
        true
    }

    fn enter_phase(&mut self, ui: &mut dyn UiHost) {
        match self.phase {
            GamePhase::None => {}
            GamePhase::Menu => {
                ui.set_panel_visible(Panel::MainMenu, true);
                ui.set_panel_visible(Panel::Hud, false);
            }
            GamePhase::Initialize => {
                self.reset_run();
                self.set_phase(GamePhase::PrepareScene, ui);
            }
            GamePhase::PrepareScene | GamePhase::NextLevel => {
                let delay = self.settings.scene_setup_delay;
                self.schedule_in_phase(delay, Task::PopulateScene);
            }
            GamePhase::Play => {
                self.schedule_in_phase(0.0, Task::PollField);
            }
        }
    }

    /// New Game button: only honoured from the menu
    pub fn new_game(&mut self, ui: &mut dyn UiHost) -> bool {
        if self.phase != GamePhase::Menu {
            log::warn!("New game requested during {:?}, ignored", self.phase);
            return false;
        }
        ui.set_panel_visible(Panel::MainMenu, false);
        ui.set_panel_visible(Panel::Hud, true);
        self.set_phase(GamePhase::Initialize, ui)
    }

    fn reset_run(&mut self) {
        self.level = 0;
        self.lives = MAX_LIVES;
        self.score = 0;
        self.session += 1;
        let session = self.session;
        self.scheduler
            .cancel_where(|t| matches!(t, Token::Session(s) if *s != session));
        self.weapon.reset();
    }

    fn schedule_in_phase(&mut self, delay: f64, task: Task) {
        let wake = self.clock + delay;
        self.scheduler.schedule(wake, Token::Phase(self.epoch), task);
    }

    fn schedule_in_session(&mut self, delay: f64, task: Task) {
        let wake = self.clock + delay;
        self.scheduler.schedule(wake, Token::Session(self.session), task);
    }

    /// Run every task due by the current clock, in wake order
    pub fn run_due_tasks(&mut self, ui: &mut dyn UiHost) {
        while let Some(deferred) = self.scheduler.pop_due(self.clock) {
            if !self.token_live(&deferred.token) {
                log::trace!("Dropped stale {:?} ({:?})", deferred.task, deferred.token);
                continue;
            }
            log::debug!("Running {:?} at t={:.2}", deferred.task, self.clock);
            self.run_task(deferred.task, ui);
        }
    }

    fn run_task(&mut self, task: Task, ui: &mut dyn UiHost) {
        match task {
            Task::PopulateScene => self.populate_scene(ui),
            Task::PollField => self.poll_field(ui),
            Task::RespawnPlayer => self.respawn_player(),
            Task::ExpireBullet(id) => {
                self.pool.release(id);
            }
        }
    }

    fn populate_scene(&mut self, ui: &mut dyn UiHost) {
        if self.phase == GamePhase::PrepareScene {
            ui.restore_life_icons();
        }

        if self.level == 0 {
            self.lives = MAX_LIVES;
            match self.player {
                None => {
                    self.spawn_player();
                }
                Some(_) if !self.player_active() => {
                    let delay = self.settings.respawn_delay;
                    self.schedule_in_session(delay, Task::RespawnPlayer);
                }
                Some(_) => {}
            }
        }

        let count = self.settings.starting_asteroids * (self.level + 1);
        for _ in 0..count {
            let pos = self.random_field_position();
            self.spawn_large_asteroid(pos);
        }
        log::info!("Level {} populated with {} large asteroids", self.level, count);

        self.set_phase(GamePhase::Play, ui);
    }

    fn poll_field(&mut self, ui: &mut dyn UiHost) {
        ui.set_text(TextField::Score, &self.score.to_string());
        ui.set_text(TextField::Level, &self.level.to_string());

        if self.asteroid_count() == 0 && self.level < self.settings.max_level {
            self.level += 1;
            self.events.push(GameEvent::LevelAdvanced { level: self.level });
            self.set_phase(GamePhase::NextLevel, ui);
            return;
        }

        self.schedule_in_phase(FIELD_POLL_INTERVAL, Task::PollField);
    }

    /// Player destroyed: take a life, hide its icon, respawn or end the run
    pub fn lose_life(&mut self, ui: &mut dyn UiHost) {
        if self.lives == 0 {
            return;
        }
        self.lives -= 1;
        if let Some(id) = self.player {
            self.pool.release(id);
        }
        self.events.push(GameEvent::PlayerHit { lives: self.lives });
        log::info!("Player hit, {} lives left", self.lives);

        if self.lives != 0 {
            let delay = self.settings.respawn_delay;
            self.schedule_in_session(delay, Task::RespawnPlayer);
        }

        let icon = (MAX_LIVES - 1 - self.lives) as usize;
        ui.set_life_icon_visible(icon, false);

        if self.lives == 0 {
            self.game_over(ui);
        }
    }

    fn game_over(&mut self, ui: &mut dyn UiHost) {
        let new_high_score = self.high_scores.is_new_best(self.score);
        self.high_scores.add_score(self.score, self.level);
        if new_high_score {
            ui.set_text(TextField::HighScore, &format_high_score(self.score));
        }
        log::info!(
            "Game over: score {} at level {}{}",
            self.score,
            self.level,
            if new_high_score { " (new high score)" } else { "" }
        );
        self.events.push(GameEvent::GameOver {
            score: self.score,
            level: self.level,
            new_high_score,
        });

        let cleared = self.pool.release_all();
        log::debug!("Cleared {cleared} entities");
        self.set_phase(GamePhase::Menu, ui);
    }

    fn respawn_player(&mut self) {
        if self.player_active() {
            return;
        }
        if self.spawn_player().is_some() {
            self.events.push(GameEvent::PlayerRespawned);
        }
    }

    /// Active asteroids of `category`
    pub fn asteroids_of(&self, category: Category) -> usize {
        self.pool.active_count(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::ui::HeadlessUi;

    fn booted() -> (GameState, HeadlessUi) {
        let mut ui = HeadlessUi::new(3);
        let state = GameState::boot(Settings::default(), &mut ui).unwrap();
        (state, ui)
    }

    fn advance(state: &mut GameState, ui: &mut HeadlessUi, seconds: f64) {
        state.clock += seconds;
        state.run_due_tasks(ui);
    }

    #[test]
    fn test_set_phase_is_idempotent() {
        let (mut state, mut ui) = booted();
        let epoch = state.epoch;
        assert!(!state.set_phase(GamePhase::Menu, &mut ui));
        assert_eq!(state.epoch, epoch);
    }

    #[test]
    fn test_new_game_initializes_and_prepares() {
        let (mut state, mut ui) = booted();
        state.score = 99;
        assert!(state.new_game(&mut ui));
        assert_eq!(state.phase(), GamePhase::PrepareScene);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 0);
        assert_eq!(state.lives, MAX_LIVES);
        assert!(ui.hud_visible);
        assert!(!ui.menu_visible);
        // Nothing spawned until the setup delay passes
        assert_eq!(state.asteroid_count(), 0);
    }

    #[test]
    fn test_new_game_only_from_menu() {
        let (mut state, mut ui) = booted();
        state.new_game(&mut ui);
        assert!(!state.new_game(&mut ui));
    }

    #[test]
    fn test_scene_populated_after_delay() {
        let (mut state, mut ui) = booted();
        state.new_game(&mut ui);
        advance(&mut state, &mut ui, 0.4);
        assert_eq!(state.phase(), GamePhase::PrepareScene);
        advance(&mut state, &mut ui, 0.1);
        assert_eq!(state.phase(), GamePhase::Play);
        assert!(state.player_active());
        assert_eq!(
            state.asteroids_of(Category::AsteroidLarge),
            state.settings.starting_asteroids as usize
        );
    }

    #[test]
    fn test_leaving_phase_cancels_its_tasks() {
        let (mut state, mut ui) = booted();
        state.new_game(&mut ui);
        assert_eq!(state.scheduler.len(), 1);
        // Abort setup by forcing the menu
        state.set_phase(GamePhase::Menu, &mut ui);
        assert!(state.scheduler.is_empty());
        advance(&mut state, &mut ui, 1.0);
        assert_eq!(state.asteroid_count(), 0);
    }

    #[test]
    fn test_play_updates_hud_text() {
        let (mut state, mut ui) = booted();
        state.new_game(&mut ui);
        advance(&mut state, &mut ui, 0.5);
        state.score = 30;
        advance(&mut state, &mut ui, FIELD_POLL_INTERVAL);
        assert_eq!(ui.score_text, "30");
        assert_eq!(ui.level_text, "0");
    }

    #[test]
    fn test_lose_life_hides_icons_in_order() {
        let (mut state, mut ui) = booted();
        state.new_game(&mut ui);
        advance(&mut state, &mut ui, 0.5);

        state.lose_life(&mut ui);
        assert_eq!(state.lives, 2);
        assert_eq!(ui.life_icons, vec![false, true, true]);
        assert!(!state.player_active());

        let respawn_delay = state.settings.respawn_delay;
        advance(&mut state, &mut ui, respawn_delay);
        assert!(state.player_active());

        state.lose_life(&mut ui);
        assert_eq!(ui.life_icons, vec![false, false, true]);
    }
}
