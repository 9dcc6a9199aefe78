//! Interstellar Taxi - a two-player arcade taxi game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, world rules)
//! - `engine`: Fixed-rate loop driving the simulation and its collaborators
//! - `input`: Key events to per-player steering intents
//! - `audio`: Sound effect / music collaborator contract
//! - `render`: Paint contract consumed by a renderer
//! - `hud`: Status bar and score board text
//! - `settings`: User preferences loaded from JSON

pub mod audio;
pub mod engine;
pub mod error;
pub mod hud;
pub mod input;
pub mod render;
pub mod settings;
pub mod sim;

pub use engine::{Engine, EngineHandle};
pub use error::{Error, Result};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Play area size in pixels
    pub const PLAY_AREA_WIDTH: i32 = 640;
    pub const PLAY_AREA_HEIGHT: i32 = 480;

    /// Tick budget of the simulation loop (~60 Hz)
    pub const TICK_MILLIS: u64 = 17;

    /// Magnitude of one directional impulse per tick
    pub const STEER_IMPULSE: f64 = 0.2;
    /// Downward pull added every tick
    pub const GRAVITY: f64 = 0.075;
    /// Motion vectors are capped to this length
    pub const MAX_SPEED: f64 = 10.0;
    /// Ships slower than this land instead of bouncing
    pub const LANDING_SPEED: f64 = 2.0;
    /// Vertical motion given to a ship lifting off a platform
    pub const LIFT_OFF_SPEED: f64 = 2.0;
    /// Pixels a lifting ship is moved up to clear the platform
    pub const LIFT_OFF_NUDGE: i32 = 3;
    /// Smallest impulse exchanged in a ship-ship collision
    pub const MIN_IMPULSE: f64 = 1.0;

    /// Ship sprite size (collision radius is half the longer side)
    pub const SHIP_WIDTH: i32 = 30;
    pub const SHIP_HEIGHT: i32 = 30;
    pub const MAX_ENERGY: i32 = 100;
    /// Ticks a shield stays up after a hit
    pub const SHIELD_TICKS: u32 = 50;

    /// Platform sprite size
    pub const PLATFORM_WIDTH: i32 = 80;
    pub const PLATFORM_HEIGHT: i32 = 12;

    /// Passenger sprite size
    pub const PASSENGER_WIDTH: i32 = 8;
    pub const PASSENGER_HEIGHT: i32 = 16;

    /// Energy bought per refuel step and its price per unit
    pub const FUEL_INCREMENT: i32 = 1;
    pub const FUEL_COST: i32 = 1;

    /// Reward for a delivered passenger
    pub const DELIVERY_SCORE: i32 = 1;
    pub const DELIVERY_CREDITS: i32 = 100;

    /// Simulated time between passenger spawns
    pub const SPAWN_INTERVAL_MS: u64 = 5_000;

    /// Arrow tip sits this far above its platform
    pub const ARROW_OFFSET: i32 = 5;

    /// Number of "taxi" voice cues to pick from on spawn
    pub const TAXI_CUES: u8 = 3;

    /// Seats at the table
    pub const PLAYER_COUNT: usize = 2;

    /// Ship start positions, one per player
    pub const SHIP_STARTS: [(i32, i32); PLAYER_COUNT] = [(200, 100), (100, 300)];

    /// Regular platform positions
    pub const PLATFORM_POSITIONS: [(i32, i32); 5] =
        [(100, 100), (500, 400), (300, 300), (100, 450), (50, 320)];

    /// The single refuel platform
    pub const REFUEL_POSITION: (i32, i32) = (200, 200);

    /// Seed used when settings do not provide one
    pub const DEFAULT_SEED: u64 = 0x7a71_2004;
}
