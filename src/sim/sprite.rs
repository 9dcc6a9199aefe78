//! Sprite animation as (state, frame) over immutable frame tables
//!
//! The renderer owns the actual images. Entities only track which state they
//! show, which frame of it, and whether it is mirrored horizontally.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Named animation states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteState {
    Default,
    Thrust,
    Walk,
}

impl SpriteState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpriteState::Default => "default",
            SpriteState::Thrust => "thrust",
            SpriteState::Walk => "walk",
        }
    }
}

impl fmt::Display for SpriteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which frame table a sprite draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteSheet {
    Ship,
    Passenger,
    Platform,
}

impl SpriteSheet {
    /// Frame count for `state`, or `None` if the sheet lacks it
    pub fn frame_count(self, state: SpriteState) -> Option<usize> {
        match (self, state) {
            (SpriteSheet::Ship, SpriteState::Default | SpriteState::Thrust) => Some(1),
            (SpriteSheet::Passenger, SpriteState::Walk) => Some(6),
            (SpriteSheet::Platform, SpriteState::Default) => Some(1),
            _ => None,
        }
    }

    /// State a fresh sprite starts in
    pub fn initial_state(self) -> SpriteState {
        match self {
            SpriteSheet::Passenger => SpriteState::Walk,
            SpriteSheet::Ship | SpriteSheet::Platform => SpriteState::Default,
        }
    }
}

/// Current visual state of one sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animation {
    sheet: SpriteSheet,
    state: SpriteState,
    frame: usize,
    /// Mirror horizontally at render time
    flipped: bool,
}

impl Animation {
    pub fn new(sheet: SpriteSheet) -> Self {
        Self {
            sheet,
            state: sheet.initial_state(),
            frame: 0,
            flipped: false,
        }
    }

    pub fn sheet(&self) -> SpriteSheet {
        self.sheet
    }

    pub fn state(&self) -> SpriteState {
        self.state
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Switch state. Switching rewinds to frame 0 unless the state is
    /// already current. On error the previous state is kept.
    pub fn set_state(&mut self, state: SpriteState) -> Result<()> {
        if self.sheet.frame_count(state).is_none() {
            return Err(Error::NoSuchState { state });
        }
        if self.state != state {
            self.state = state;
            self.frame = 0;
        }
        Ok(())
    }

    /// Step to the next frame, wrapping at the end of the state's frames
    pub fn advance(&mut self) {
        let count = self.sheet.frame_count(self.state).unwrap_or(1);
        self.frame = (self.frame + 1) % count;
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }
}
