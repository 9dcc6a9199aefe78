//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by player and platform index)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod geometry;
pub mod sprite;
pub mod state;
pub mod tick;
pub mod vector;

pub use collision::CollisionResult;
pub use geometry::Rect;
pub use sprite::{Animation, SpriteSheet, SpriteState};
pub use state::{
    Arrow, GameEvent, GameState, Passenger, PassengerId, Platform, PlatformId, PlatformKind,
    Player, PlayerColor, PlayerId, Ship, WalkDirection, WorldSnapshot,
};
pub use tick::{LandingOutcome, Steering, TickInput, tick};
pub use vector::Vector2D;
