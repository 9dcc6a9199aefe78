//! Crate error type

use std::path::PathBuf;

use thiserror::Error;

use crate::sim::SpriteState;

/// Convenient result alias for the game crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A sprite was asked to switch to a state its sheet does not define.
    #[error("sprite sheet has no `{state}` state")]
    NoSuchState { state: SpriteState },

    /// An entity refers to a passenger that is no longer active.
    #[error("passenger {id} is not in the active set")]
    UnknownPassenger { id: u32 },

    /// Host sent a key name the game does not bind.
    #[error("unknown key `{name}`")]
    UnknownKey { name: String },

    /// Settings file could not be read.
    #[error("failed to read settings from {path}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file was not valid JSON for [`crate::Settings`].
    #[error("failed to parse settings in {path}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
