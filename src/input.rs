//! Keyboard input
//!
//! The host's event thread flips per-player direction flags; the simulation
//! thread reads all of them once at the start of every tick. Each flag has a
//! single writer and a single reader, so relaxed atomics are enough.

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::consts::PLAYER_COUNT;
use crate::error::{Error, Result};
use crate::sim::{PlayerId, Steering, TickInput};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    A,
    D,
    W,
    S,
    Escape,
}

impl FromStr for Key {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "left" => Ok(Key::Left),
            "right" => Ok(Key::Right),
            "up" => Ok(Key::Up),
            "down" => Ok(Key::Down),
            "a" => Ok(Key::A),
            "d" => Ok(Key::D),
            "w" => Ok(Key::W),
            "s" => Ok(Key::S),
            "escape" | "esc" => Ok(Key::Escape),
            _ => Err(Error::UnknownKey {
                name: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

/// What a key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Steer {
        player: PlayerId,
        direction: Direction,
    },
    /// Stop the engine
    Stop,
}

/// Player 1 flies with the arrow keys, player 2 with WASD
pub fn map_key(key: Key) -> KeyAction {
    let steer = |player, direction| KeyAction::Steer { player, direction };
    match key {
        Key::Left => steer(0, Direction::Left),
        Key::Right => steer(0, Direction::Right),
        Key::Up => steer(0, Direction::Up),
        Key::Down => steer(0, Direction::Down),
        Key::A => steer(1, Direction::Left),
        Key::D => steer(1, Direction::Right),
        Key::W => steer(1, Direction::Up),
        Key::S => steer(1, Direction::Down),
        Key::Escape => KeyAction::Stop,
    }
}

/// Held-direction flags for every player
#[derive(Debug, Default)]
pub struct SharedIntents {
    flags: [[AtomicBool; 4]; PLAYER_COUNT],
}

impl SharedIntents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press (`held = true`) or release. Unknown players are ignored.
    pub fn set(&self, player: PlayerId, direction: Direction, held: bool) {
        if let Some(row) = self.flags.get(player) {
            row[direction.slot()].store(held, Ordering::Relaxed);
        }
    }

    pub fn is_held(&self, player: PlayerId, direction: Direction) -> bool {
        self.flags
            .get(player)
            .is_some_and(|row| row[direction.slot()].load(Ordering::Relaxed))
    }

    /// Release everything
    pub fn clear(&self) {
        for player in 0..PLAYER_COUNT {
            for direction in Direction::ALL {
                self.set(player, direction, false);
            }
        }
    }

    /// Read all flags into the input for one tick
    pub fn snapshot(&self) -> TickInput {
        let steering = (0..PLAYER_COUNT)
            .map(|player| Steering {
                left: self.is_held(player, Direction::Left),
                right: self.is_held(player, Direction::Right),
                up: self.is_held(player, Direction::Up),
                down: self.is_held(player, Direction::Down),
            })
            .collect();
        TickInput { steering }
    }
}

/// Host-side entry point for key events
#[derive(Debug, Clone)]
pub struct InputController {
    intents: Arc<SharedIntents>,
    running: Arc<AtomicBool>,
}

impl InputController {
    pub fn new(intents: Arc<SharedIntents>, running: Arc<AtomicBool>) -> Self {
        Self { intents, running }
    }

    /// Apply a key press or release and report what it meant
    pub fn handle_key(&self, key: Key, pressed: bool) -> KeyAction {
        let action = map_key(key);
        match action {
            KeyAction::Steer { player, direction } => self.intents.set(player, direction, pressed),
            KeyAction::Stop if pressed => {
                log::info!("stop requested");
                self.running.store(false, Ordering::Relaxed);
            }
            KeyAction::Stop => {}
        }
        action
    }
}
