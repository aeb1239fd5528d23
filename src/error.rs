//! Error handling for the simulation and its configuration.
//!
//! Pool exhaustion is not an error value; the pool logs it and returns `None`.

use thiserror::Error;

/// Convenient result alias for fallible setup and configuration calls.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while booting the game or loading its configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// The UI host does not expose a widget the game writes to.
    #[error("UI host has no binding for '{0}'")]
    MissingUiBinding(&'static str),
    /// The UI host exposes fewer life icons than the player has lives.
    #[error("UI host exposes {found} life icons, {needed} required")]
    MissingLifeIcons {
        /// Icons reported by the host.
        found: usize,
        /// Icons needed, one per life.
        needed: usize,
    },
    /// A raw category index outside the known categories.
    #[error("invalid entity category index {0}")]
    InvalidCategory(usize),
    /// Settings failed validation.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    /// Settings file could not be read or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Settings file is not valid JSON for `Settings`.
    #[error("settings parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::InvalidSettings(s)
    }
}
