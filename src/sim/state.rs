//! Game state and core simulation types
//!
//! Entities refer to each other by index (players, platforms) or by id
//! (passengers), never by pointer, so the whole world is plain owned data.

use std::cmp::Ordering;

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::sprite::{Animation, SpriteSheet};
use super::vector::Vector2D;
use crate::consts::*;

/// Index into [`GameState::players`]
pub type PlayerId = usize;
/// Index into [`GameState::platforms`]
pub type PlatformId = usize;
/// Stable id of a spawned passenger
pub type PassengerId = u32;

/// Player identity color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerColor {
    Blue,
    Red,
}

impl PlayerColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerColor::Blue => "blue",
            PlayerColor::Red => "red",
        }
    }

    pub fn rgb(&self) -> [u8; 3] {
        match self {
            PlayerColor::Blue => [0, 0, 255],
            PlayerColor::Red => [255, 0, 0],
        }
    }
}

/// Marker drawn above the platform a player's passenger wants to go to.
/// `position` is where the tip points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub color: PlayerColor,
    pub position: IVec2,
    pub visible: bool,
}

impl Arrow {
    pub fn new(color: PlayerColor) -> Self {
        Self {
            color,
            position: IVec2::ZERO,
            visible: false,
        }
    }
}

/// A player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub owner: PlayerId,
    /// Owner color, for the shield outline
    pub color: PlayerColor,
    /// Top-left corner of the sprite
    pub position: IVec2,
    pub motion: Vector2D,
    energy: i32,
    pub shielded: bool,
    /// Ticks left before the shield drops
    pub shield_timer: u32,
    pub landed: bool,
    pub passenger: Option<PassengerId>,
    /// Collision radius around the sprite center
    pub radius: f64,
    /// Visual tilt in degrees
    pub rotation: f64,
    pub animation: Animation,
}

impl Ship {
    pub fn new(owner: PlayerId, color: PlayerColor, position: IVec2) -> Self {
        Self {
            owner,
            color,
            position,
            motion: Vector2D::ZERO,
            energy: MAX_ENERGY,
            shielded: false,
            shield_timer: 0,
            landed: false,
            passenger: None,
            radius: f64::from(SHIP_WIDTH.max(SHIP_HEIGHT)) / 2.0,
            rotation: 0.0,
            animation: Animation::new(SpriteSheet::Ship),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::at(self.position, IVec2::new(SHIP_WIDTH, SHIP_HEIGHT))
    }

    pub fn center(&self) -> IVec2 {
        self.bounds().center()
    }

    pub fn energy(&self) -> i32 {
        self.energy
    }

    /// Set energy, clamped to `[0, MAX_ENERGY]`
    pub fn set_energy(&mut self, energy: i32) {
        self.energy = energy.clamp(0, MAX_ENERGY);
    }

    /// Add (or with a negative amount, remove) energy, clamped
    pub fn add_energy(&mut self, amount: i32) {
        self.set_energy(self.energy.saturating_add(amount));
    }

    pub fn is_depleted(&self) -> bool {
        self.energy <= 0
    }

    /// Raise the shield and restart its countdown
    pub fn activate_shield(&mut self) {
        self.shielded = true;
        self.shield_timer = SHIELD_TICKS;
    }

    /// Count the shield down one tick, dropping it at zero
    pub fn decay_shield(&mut self) {
        if !self.shielded {
            return;
        }
        self.shield_timer = self.shield_timer.saturating_sub(1);
        if self.shield_timer == 0 {
            self.shielded = false;
        }
    }

    pub fn land(&mut self) {
        self.motion = Vector2D::ZERO;
        self.landed = true;
    }

    /// Kick the ship off its platform
    pub fn lift_off(&mut self) {
        self.motion = Vector2D::new(0.0, -LIFT_OFF_SPEED);
        self.position.y -= LIFT_OFF_NUDGE;
        self.landed = false;
    }

    pub fn has_passenger(&self) -> bool {
        self.passenger.is_some()
    }

    /// Destruction of an out-of-energy ship. Not modelled yet: depleted
    /// ships keep flying.
    // TODO: implode ships at zero energy once a game-over flow exists
    pub fn implode(&mut self) {}
}

/// Direction a waiting passenger is pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalkDirection {
    Left,
    Right,
}

/// Someone who wants a ride from `source` to `destination`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    pub id: PassengerId,
    pub source: PlatformId,
    pub destination: PlatformId,
    pub position: IVec2,
    /// Hidden while riding in a ship
    pub visible: bool,
    pub walk: WalkDirection,
    /// Walkable x range on the home platform (inclusive)
    left_x: i32,
    right_x: i32,
    pub animation: Animation,
}

impl Passenger {
    /// Place a new passenger on top of `home`, `offset` pixels from its
    /// left edge (clamped to the walkable range)
    pub fn new(
        id: PassengerId,
        source: PlatformId,
        destination: PlatformId,
        home: Rect,
        offset: i32,
    ) -> Self {
        let left_x = home.left();
        let right_x = (home.right() - PASSENGER_WIDTH).max(left_x);
        let x = (left_x + offset).clamp(left_x, right_x);
        Self {
            id,
            source,
            destination,
            position: IVec2::new(x, home.top() - PASSENGER_HEIGHT),
            visible: false,
            walk: WalkDirection::Right,
            left_x,
            right_x,
            animation: Animation::new(SpriteSheet::Passenger),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::at(self.position, IVec2::new(PASSENGER_WIDTH, PASSENGER_HEIGHT))
    }

    pub fn walk_range(&self) -> (i32, i32) {
        (self.left_x, self.right_x)
    }

    /// Pace one pixel, turning around (and mirroring) at either end
    pub fn walk(&mut self) {
        match self.walk {
            WalkDirection::Right if self.position.x >= self.right_x => {
                self.walk = WalkDirection::Left;
                self.animation.flip();
            }
            WalkDirection::Left if self.position.x <= self.left_x => {
                self.walk = WalkDirection::Right;
                self.animation.flip();
            }
            _ => {}
        }
        self.position.x += match self.walk {
            WalkDirection::Right => 1,
            WalkDirection::Left => -1,
        };
    }
}

/// Platform variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    /// Passengers wait here and get delivered here
    Regular,
    /// Sells energy; takes no part in passenger traffic
    Refuel,
}

/// A static landing pad
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub position: IVec2,
    pub kind: PlatformKind,
    /// Awaited dropoff point of some active passenger
    pub is_destination: bool,
    /// Passenger waiting here
    pub resident: Option<PassengerId>,
    /// Player whose arrow is shown above this platform
    pub arrow: Option<PlayerId>,
}

impl Platform {
    pub fn new(position: IVec2, kind: PlatformKind) -> Self {
        Self {
            position,
            kind,
            is_destination: false,
            resident: None,
            arrow: None,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::at(self.position, IVec2::new(PLATFORM_WIDTH, PLATFORM_HEIGHT))
    }

    pub fn is_refuel(&self) -> bool {
        self.kind == PlatformKind::Refuel
    }

    pub fn is_inhabited(&self) -> bool {
        self.resident.is_some()
    }

    /// Free to take part in a new passenger spawn
    pub fn is_available(&self) -> bool {
        !self.is_refuel() && !self.is_inhabited() && !self.is_destination
    }

    /// Where a shown arrow's tip goes
    pub fn arrow_anchor(&self) -> IVec2 {
        IVec2::new(
            self.position.x + PLATFORM_WIDTH / 2,
            self.position.y - ARROW_OFFSET,
        )
    }

    /// Show `player`'s arrow above this platform. Refuel platforms never
    /// show arrows.
    pub fn show_arrow(&mut self, player: &mut Player) {
        if self.is_refuel() {
            return;
        }
        self.arrow = Some(player.id);
        player.arrow.position = self.arrow_anchor();
        player.arrow.visible = true;
    }

    /// Hide the arrow shown here, if any
    pub fn hide_arrow(&mut self, players: &mut [Player]) {
        if self.is_refuel() {
            return;
        }
        if let Some(player) = self.arrow.take().and_then(|owner| players.get_mut(owner)) {
            player.arrow.visible = false;
        }
    }

    /// Sell energy to a landed ship: one increment per call while the
    /// player can pay for it. The last step only charges for what fits.
    ///
    /// Returns whether the ship is still below full energy afterwards.
    pub fn refuel(&self, player: &mut Player) -> bool {
        if !self.is_refuel() || !player.ship.landed {
            return false;
        }
        if player.credits < FUEL_COST * FUEL_INCREMENT {
            return false;
        }

        let energy = player.ship.energy();
        if energy < MAX_ENERGY - FUEL_INCREMENT {
            player.add_credits(-FUEL_COST * FUEL_INCREMENT);
            player.ship.add_energy(FUEL_INCREMENT);
        } else {
            player.add_credits(-FUEL_COST * (MAX_ENERGY - energy));
            player.ship.set_energy(MAX_ENERGY);
        }

        player.ship.energy() != MAX_ENERGY
    }
}

/// A human pilot: one ship, a score and a wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: PlayerColor,
    pub credits: i32,
    /// Completed deliveries
    pub score: i32,
    pub ship: Ship,
    pub arrow: Arrow,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, color: PlayerColor, start: IVec2) -> Self {
        Self {
            id,
            name: name.into(),
            color,
            credits: 0,
            score: 0,
            ship: Ship::new(id, color, start),
            arrow: Arrow::new(color),
        }
    }

    pub fn add_credits(&mut self, amount: i32) {
        self.credits += amount;
    }

    pub fn add_score(&mut self, amount: i32) {
        self.score += amount;
    }

    /// Leaderboard order: higher score first, then name
    pub fn standing(&self, other: &Player) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// Things that happened during a tick, for audio and logging
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShipsCollided {
        a: PlayerId,
        b: PlayerId,
        damage: i32,
    },
    PlatformBounce {
        ship: PlayerId,
        platform: PlatformId,
        damage: i32,
    },
    Landed {
        ship: PlayerId,
        platform: PlatformId,
    },
    LiftOff {
        ship: PlayerId,
    },
    PassengerSpawned {
        passenger: PassengerId,
        source: PlatformId,
        destination: PlatformId,
        /// Which "taxi" voice cue to play (1-based)
        cue: u8,
    },
    PassengerPickedUp {
        player: PlayerId,
        passenger: PassengerId,
    },
    PassengerDelivered {
        player: PlayerId,
        passenger: PassengerId,
    },
    Refueled {
        player: PlayerId,
        energy: i32,
    },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub play_area: IVec2,
    pub players: Vec<Player>,
    /// Spawned, undelivered passengers
    pub passengers: Vec<Passenger>,
    pub platforms: Vec<Platform>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated milliseconds since start
    pub time_ms: u64,
    /// Simulated time of the last spawn or delivery
    pub last_spawn_ms: u64,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
    next_id: PassengerId,
}

impl GameState {
    /// Create the standard two-player world with the given seed
    pub fn new(seed: u64) -> Self {
        let players = vec![
            Player::new(0, "Player1", PlayerColor::Blue, SHIP_STARTS[0].into()),
            Player::new(1, "Player2", PlayerColor::Red, SHIP_STARTS[1].into()),
        ];

        let mut platforms: Vec<Platform> = PLATFORM_POSITIONS
            .iter()
            .map(|&pos| Platform::new(pos.into(), PlatformKind::Regular))
            .collect();
        platforms.push(Platform::new(REFUEL_POSITION.into(), PlatformKind::Refuel));

        Self::with_world(seed, players, platforms)
    }

    /// Create a state from an explicit entity layout
    pub fn with_world(seed: u64, players: Vec<Player>, platforms: Vec<Platform>) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            play_area: IVec2::new(PLAY_AREA_WIDTH, PLAY_AREA_HEIGHT),
            players,
            passengers: Vec::new(),
            platforms,
            time_ticks: 0,
            time_ms: 0,
            last_spawn_ms: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new passenger id
    pub fn next_entity_id(&mut self) -> PassengerId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn passenger(&self, id: PassengerId) -> Option<&Passenger> {
        self.passengers.iter().find(|p| p.id == id)
    }

    pub fn passenger_mut(&mut self, id: PassengerId) -> Option<&mut Passenger> {
        self.passengers.iter_mut().find(|p| p.id == id)
    }

    /// Players sorted by standing
    pub fn rankings(&self) -> Vec<&Player> {
        let mut ranked: Vec<&Player> = self.players.iter().collect();
        ranked.sort_by(|a, b| a.standing(b));
        ranked
    }

    /// Read-only view for serialization
    pub fn snapshot(&self) -> WorldSnapshot<'_> {
        WorldSnapshot {
            time_ms: self.time_ms,
            players: &self.players,
            passengers: &self.passengers,
            platforms: &self.platforms,
        }
    }
}

/// Borrowed, serializable view of the world
#[derive(Debug, Serialize)]
pub struct WorldSnapshot<'a> {
    pub time_ms: u64,
    pub players: &'a [Player],
    pub passengers: &'a [Passenger],
    pub platforms: &'a [Platform],
}
