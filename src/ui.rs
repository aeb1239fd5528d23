//! UI host abstraction
//!
//! The simulation writes HUD text, toggles life icons and swaps the menu and
//! HUD panels; layout and rendering belong to the host.

use crate::error::{Error, Result};

/// Text widgets the game writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Score,
    Level,
    HighScore,
}

impl TextField {
    pub const ALL: [TextField; 3] = [TextField::Score, TextField::Level, TextField::HighScore];

    pub fn as_str(&self) -> &'static str {
        match self {
            TextField::Score => "Score",
            TextField::Level => "Level",
            TextField::HighScore => "HighScore",
        }
    }
}

/// Top-level panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Hud,
    MainMenu,
}

impl Panel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Panel::Hud => "HUD",
            Panel::MainMenu => "MainMenu",
        }
    }
}

/// What the game needs from the UI layer
pub trait UiHost {
    /// Whether the host has a widget bound for `field`
    fn has_text(&self, field: TextField) -> bool;
    /// Whether the host has a panel bound for `panel`
    fn has_panel(&self, panel: Panel) -> bool;
    /// Number of life icons on the HUD
    fn life_icon_count(&self) -> usize;

    fn set_text(&mut self, field: TextField, text: &str);
    fn set_life_icon_visible(&mut self, index: usize, visible: bool);
    fn set_panel_visible(&mut self, panel: Panel, visible: bool);

    /// Show every life icon
    fn restore_life_icons(&mut self) {
        for i in 0..self.life_icon_count() {
            self.set_life_icon_visible(i, true);
        }
    }
}

/// Fail unless every widget the game writes to is bound
pub fn check_bindings(ui: &dyn UiHost, lives: usize) -> Result<()> {
    for panel in [Panel::Hud, Panel::MainMenu] {
        if !ui.has_panel(panel) {
            return Err(Error::MissingUiBinding(panel.as_str()));
        }
    }
    for field in TextField::ALL {
        if !ui.has_text(field) {
            return Err(Error::MissingUiBinding(field.as_str()));
        }
    }
    let found = ui.life_icon_count();
    if found < lives {
        return Err(Error::MissingLifeIcons {
            found,
            needed: lives,
        });
    }
    Ok(())
}

/// In-memory UI that records what the game shows (headless runs, tests)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessUi {
    pub score_text: String,
    pub level_text: String,
    pub high_score_text: String,
    pub life_icons: Vec<bool>,
    pub hud_visible: bool,
    pub menu_visible: bool,
    /// Fields reported as unbound (binding failure tests)
    pub unbound: Vec<TextField>,
}

impl HeadlessUi {
    pub fn new(life_icons: usize) -> Self {
        Self {
            life_icons: vec![true; life_icons],
            hud_visible: true,
            menu_visible: false,
            ..Default::default()
        }
    }

    pub fn visible_icons(&self) -> usize {
        self.life_icons.iter().filter(|&&v| v).count()
    }
}

impl UiHost for HeadlessUi {
    fn has_text(&self, field: TextField) -> bool {
        !self.unbound.contains(&field)
    }

    fn has_panel(&self, _panel: Panel) -> bool {
        true
    }

    fn life_icon_count(&self) -> usize {
        self.life_icons.len()
    }

    fn set_text(&mut self, field: TextField, text: &str) {
        let slot = match field {
            TextField::Score => &mut self.score_text,
            TextField::Level => &mut self.level_text,
            TextField::HighScore => &mut self.high_score_text,
        };
        if *slot != text {
            *slot = text.to_string();
        }
    }

    fn set_life_icon_visible(&mut self, index: usize, visible: bool) {
        match self.life_icons.get_mut(index) {
            Some(icon) => *icon = visible,
            None => log::warn!("Life icon {index} is not bound"),
        }
    }

    fn set_panel_visible(&mut self, panel: Panel, visible: bool) {
        match panel {
            Panel::Hud => self.hud_visible = visible,
            Panel::MainMenu => self.menu_visible = visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings_ok() {
        assert!(check_bindings(&HeadlessUi::new(3), 3).is_ok());
    }

    #[test]
    fn test_missing_text_binding() {
        let mut ui = HeadlessUi::new(3);
        ui.unbound.push(TextField::Level);
        assert!(matches!(
            check_bindings(&ui, 3),
            Err(Error::MissingUiBinding("Level"))
        ));
    }

    #[test]
    fn test_restore_life_icons() {
        let mut ui = HeadlessUi::new(3);
        ui.set_life_icon_visible(0, false);
        ui.set_life_icon_visible(2, false);
        assert_eq!(ui.visible_icons(), 1);
        ui.restore_life_icons();
        assert_eq!(ui.visible_icons(), 3);
    }
}
