//! Fixed timestep simulation tick
//!
//! Core game loop step. The phases run in a fixed order and each one relies
//! on the previous being complete:
//! 1. steering + gravity + motion integration
//! 2. ship-ship collisions
//! 3. ship-platform collisions (landing or bouncing)
//! 4. shield countdown
//! 5. passenger spawning
//! 6. idle animation
//! 7. depleted ship check

use glam::IVec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::collision::{
    circles_touch, impact_damage, is_landing, reflect_velocity, ship_impulse,
    ship_platform_collision,
};
use super::sprite::SpriteState;
use super::state::{GameEvent, GameState, Passenger, PassengerId, PlatformId, PlayerId};
use super::vector::Vector2D;
use crate::consts::*;
use crate::error::{Error, Result};

pub const LEFT: Vector2D = Vector2D::new(-STEER_IMPULSE, 0.0);
pub const RIGHT: Vector2D = Vector2D::new(STEER_IMPULSE, 0.0);
pub const UP: Vector2D = Vector2D::new(0.0, -STEER_IMPULSE);
pub const DOWN: Vector2D = Vector2D::new(0.0, STEER_IMPULSE);
pub const GRAVITY_PULL: Vector2D = Vector2D::new(0.0, GRAVITY);

/// Directions one player is currently holding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Steering {
    pub left: bool,
    pub right: bool,
    /// Main thruster; also lifts a landed ship off
    pub up: bool,
    pub down: bool,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Indexed by player id
    pub steering: Vec<Steering>,
}

impl TickInput {
    pub fn for_player(&self, id: PlayerId) -> Steering {
        self.steering.get(id).copied().unwrap_or_default()
    }
}

/// What a landing did, at most one thing per call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingOutcome {
    Nothing,
    PickedUp(PassengerId),
    DroppedOff(PassengerId),
    Refueled,
}

/// Advance the game state by one fixed timestep
///
/// An error means the world hit an inconsistent reference mid-tick; the
/// caller may log it and keep ticking.
pub fn tick(state: &mut GameState, input: &TickInput) -> Result<()> {
    state.events.clear();
    state.time_ticks += 1;
    state.time_ms += TICK_MILLIS;

    update_ship_positions(state, input);
    resolve_ship_collisions(state);
    resolve_platform_collisions(state)?;
    decay_shields(state);
    spawn_passenger(state);
    animate(state);
    remove_dead_actors(state);

    Ok(())
}

/// Apply steering and gravity, cap speed, move and wrap each ship
fn update_ship_positions(state: &mut GameState, input: &TickInput) {
    let GameState {
        players,
        events,
        play_area,
        ..
    } = state;

    for player in players.iter_mut() {
        let steer = input.for_player(player.id);
        let ship = &mut player.ship;
        let mut motion = ship.motion;

        if !ship.landed {
            if steer.left {
                motion = motion + LEFT;
            }
            if steer.right {
                motion = motion + RIGHT;
            }
            if steer.down {
                motion = motion + DOWN;
            }
        }

        let look = if steer.up {
            motion = motion + UP;
            if ship.landed {
                ship.lift_off();
                motion = ship.motion;
                events.push(GameEvent::LiftOff { ship: player.id });
            }
            SpriteState::Thrust
        } else {
            SpriteState::Default
        };
        if let Err(err) = ship.animation.set_state(look) {
            log::warn!("{}: {err}", player.name);
        }

        motion = motion + GRAVITY_PULL;
        if motion.norm() > MAX_SPEED {
            motion = motion.to_length(MAX_SPEED);
        }

        ship.motion = motion;
        ship.rotation = motion.x() * 8.0;
        ship.position = wrap(ship.position + motion.round_to_pixels(), *play_area);
    }
}

/// Leaving the play area on one side re-enters on the other
fn wrap(mut pos: IVec2, area: IVec2) -> IVec2 {
    if pos.x > area.x {
        pos.x = 0;
    } else if pos.x < 0 {
        pos.x = area.x;
    }
    if pos.y > area.y {
        pos.y = 0;
    } else if pos.y < 0 {
        pos.y = area.y;
    }
    pos
}

/// Elastic bounces between every pair of flying ships
fn resolve_ship_collisions(state: &mut GameState) {
    let count = state.players.len();
    for i in 0..count {
        for j in (i + 1)..count {
            let (head, tail) = state.players.split_at_mut(j);
            let a = &mut head[i].ship;
            let b = &mut tail[0].ship;

            if a.landed || b.landed {
                continue;
            }
            if !circles_touch(a.center(), a.radius, b.center(), b.radius) {
                continue;
            }

            let force = ship_impulse(a.center(), a.motion, b.center(), b.motion);
            a.motion = a.motion - force;
            b.motion = b.motion + force;

            let damage = impact_damage(force);
            a.add_energy(-damage);
            b.add_energy(-damage);
            a.activate_shield();
            b.activate_shield();

            log::debug!("ships {i} and {j} collided, {damage} damage each");
            state
                .events
                .push(GameEvent::ShipsCollided { a: i, b: j, damage });
        }
    }
}

/// Land slow ships on platforms, bounce everything else off them
fn resolve_platform_collisions(state: &mut GameState) -> Result<()> {
    for pid in 0..state.players.len() {
        for plat in 0..state.platforms.len() {
            let rect = state.platforms[plat].bounds();
            let ship = &state.players[pid].ship;
            let center = ship.center();
            let result = ship_platform_collision(center, ship.radius, &ship.bounds(), &rect);
            if !result.hit {
                continue;
            }

            let motion = ship.motion;
            if is_landing(center, motion, &rect) {
                land(state, pid, plat)?;
            }

            let ship = &mut state.players[pid].ship;
            if !ship.landed {
                let damage = impact_damage(motion);
                ship.add_energy(-damage);
                ship.motion = reflect_velocity(motion, result.normal);
                ship.activate_shield();

                log::debug!("ship {pid} bounced off platform {plat}, {damage} damage");
                state.events.push(GameEvent::PlatformBounce {
                    ship: pid,
                    platform: plat,
                    damage,
                });
            }
        }
    }
    Ok(())
}

/// Set a ship down on a platform and apply the platform's rules: refuel on a
/// refuel pad, otherwise pick up a waiting passenger or deliver the carried
/// one.
///
/// Called every tick a ship rests on a platform, so every branch must be
/// safe to repeat.
pub fn land(state: &mut GameState, pid: PlayerId, plat: PlatformId) -> Result<LandingOutcome> {
    let ship = &mut state.players[pid].ship;
    if !ship.landed {
        state.events.push(GameEvent::Landed {
            ship: pid,
            platform: plat,
        });
    }
    ship.land();

    if state.platforms[plat].is_refuel() {
        let player = &mut state.players[pid];
        let before = player.ship.energy();
        state.platforms[plat].refuel(player);
        let energy = player.ship.energy();
        if energy == before {
            return Ok(LandingOutcome::Nothing);
        }
        state
            .events
            .push(GameEvent::Refueled { player: pid, energy });
        return Ok(LandingOutcome::Refueled);
    }

    let carried = state.players[pid].ship.passenger;

    if let (Some(id), None) = (state.platforms[plat].resident, carried) {
        let passenger = state
            .passenger_mut(id)
            .ok_or(Error::UnknownPassenger { id })?;
        passenger.visible = false;
        let destination = passenger.destination;

        state.players[pid].ship.passenger = Some(id);
        state.platforms[plat].resident = None;
        state.platforms[destination].show_arrow(&mut state.players[pid]);

        log::debug!("{} picked up passenger {id}", state.players[pid].name);
        state.events.push(GameEvent::PassengerPickedUp {
            player: pid,
            passenger: id,
        });
        return Ok(LandingOutcome::PickedUp(id));
    }

    if let Some(id) = carried {
        let destination = state
            .passenger(id)
            .ok_or(Error::UnknownPassenger { id })?
            .destination;
        if destination == plat {
            state.platforms[plat].is_destination = false;
            state.passengers.retain(|p| p.id != id);
            state.players[pid].ship.passenger = None;
            state.last_spawn_ms = state.time_ms;
            state.platforms[plat].hide_arrow(&mut state.players);

            let player = &mut state.players[pid];
            player.add_score(DELIVERY_SCORE);
            player.add_credits(DELIVERY_CREDITS);

            log::debug!("{} delivered passenger {id}", player.name);
            state.events.push(GameEvent::PassengerDelivered {
                player: pid,
                passenger: id,
            });
            return Ok(LandingOutcome::DroppedOff(id));
        }
    }

    Ok(LandingOutcome::Nothing)
}

fn decay_shields(state: &mut GameState) {
    for player in &mut state.players {
        player.ship.decay_shield();
    }
}

/// Put a new passenger on a free platform once the spawn interval has passed
/// and there are fewer passengers than players
fn spawn_passenger(state: &mut GameState) -> Option<PassengerId> {
    if state.time_ms.saturating_sub(state.last_spawn_ms) < SPAWN_INTERVAL_MS {
        return None;
    }
    if state.passengers.len() >= state.players.len() {
        return None;
    }

    let available: Vec<PlatformId> = state
        .platforms
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_available())
        .map(|(i, _)| i)
        .collect();
    if available.len() < 2 {
        log::debug!("no room for a new passenger");
        return None;
    }

    let source = *available.choose(&mut state.rng)?;
    let others: Vec<PlatformId> = available.into_iter().filter(|&p| p != source).collect();
    let destination = *others.choose(&mut state.rng)?;

    let home = state.platforms[source].bounds();
    let span = (home.width - PASSENGER_WIDTH).max(0);
    let offset = state.rng.random_range(0..=span);

    let id = state.next_entity_id();
    let mut passenger = Passenger::new(id, source, destination, home, offset);
    passenger.visible = true;

    state.platforms[destination].is_destination = true;
    state.platforms[source].resident = Some(id);
    state.passengers.push(passenger);
    state.last_spawn_ms = state.time_ms;

    let cue = state.rng.random_range(1..=TAXI_CUES);
    log::debug!("passenger {id} waiting at platform {source} for platform {destination}");
    state.events.push(GameEvent::PassengerSpawned {
        passenger: id,
        source,
        destination,
        cue,
    });
    Some(id)
}

/// Step sprite frames and pace waiting passengers
fn animate(state: &mut GameState) {
    for player in &mut state.players {
        player.ship.animation.advance();
    }
    for passenger in state.passengers.iter_mut().filter(|p| p.visible) {
        passenger.walk();
        passenger.animation.advance();
    }
}

fn remove_dead_actors(state: &mut GameState) {
    for player in &mut state.players {
        if player.ship.is_depleted() {
            player.ship.implode();
        }
    }
}
