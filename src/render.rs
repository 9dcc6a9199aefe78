//! Paint contract
//!
//! Entities describe themselves as draw commands on a `Canvas`; a concrete
//! renderer turns the commands into pixels. Painting only reads the world.

use glam::IVec2;

use crate::sim::{
    Arrow, GameState, Passenger, Platform, PlatformKind, PlayerColor, Rect, Ship, SpriteState,
};

/// One primitive for the renderer
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Image `image`, frame `frame`, drawn into `bounds`
    Sprite {
        image: String,
        frame: usize,
        bounds: Rect,
        /// Degrees, around the bounds center
        rotation: f64,
        /// Mirror horizontally
        flipped: bool,
    },
    /// Shield outline around a ship
    Shield {
        center: IVec2,
        radius: f64,
        color: PlayerColor,
    },
    /// Destination marker; `tip` is the point it points at
    Arrow { tip: IVec2, color: PlayerColor },
}

/// Drawing context handed to paintables
pub trait Canvas {
    /// Called once before a world is painted
    fn begin_frame(&mut self) {}

    fn draw(&mut self, command: DrawCommand);
}

/// Anything occupying a rectangle of the play area
pub trait HasBounds {
    fn bounds(&self) -> Rect;
}

/// Anything that can draw itself
pub trait Paintable {
    fn paint(&self, canvas: &mut dyn Canvas);
}

/// Canvas that records commands, for headless hosts and tests
#[derive(Debug, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl Canvas for DrawList {
    fn begin_frame(&mut self) {
        self.commands.clear();
    }

    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl HasBounds for Ship {
    fn bounds(&self) -> Rect {
        Ship::bounds(self)
    }
}

impl HasBounds for Passenger {
    fn bounds(&self) -> Rect {
        Passenger::bounds(self)
    }
}

impl HasBounds for Platform {
    fn bounds(&self) -> Rect {
        Platform::bounds(self)
    }
}

fn sprite(
    item: &impl HasBounds,
    image: String,
    frame: usize,
    rotation: f64,
    flipped: bool,
) -> DrawCommand {
    DrawCommand::Sprite {
        image,
        frame,
        bounds: item.bounds(),
        rotation,
        flipped,
    }
}

impl Paintable for Ship {
    fn paint(&self, canvas: &mut dyn Canvas) {
        let anim = &self.animation;
        let image = match anim.state() {
            SpriteState::Thrust => format!("ship_thrust_{}", self.color.as_str()),
            _ => format!("ship_{}", self.color.as_str()),
        };
        canvas.draw(sprite(self, image, anim.frame(), self.rotation, anim.is_flipped()));

        if self.shielded {
            canvas.draw(DrawCommand::Shield {
                center: self.center(),
                radius: self.radius,
                color: self.color,
            });
        }
    }
}

impl Paintable for Passenger {
    fn paint(&self, canvas: &mut dyn Canvas) {
        if !self.visible {
            return;
        }
        let anim = &self.animation;
        canvas.draw(sprite(
            self,
            "passenger_walk".to_string(),
            anim.frame(),
            0.0,
            anim.is_flipped(),
        ));
    }
}

impl Paintable for Platform {
    fn paint(&self, canvas: &mut dyn Canvas) {
        let image = match self.kind {
            PlatformKind::Regular => "platform",
            PlatformKind::Refuel => "refuel_platform",
        };
        canvas.draw(sprite(self, image.to_string(), 0, 0.0, false));
    }
}

impl Paintable for Arrow {
    fn paint(&self, canvas: &mut dyn Canvas) {
        if self.visible {
            canvas.draw(DrawCommand::Arrow {
                tip: self.position,
                color: self.color,
            });
        }
    }
}

/// Paint the whole world: platforms (with any arrow above them), then
/// passengers, then ships
pub fn paint_world(state: &GameState, canvas: &mut dyn Canvas) {
    canvas.begin_frame();

    for platform in &state.platforms {
        platform.paint(canvas);
        if let Some(player) = platform.arrow.and_then(|owner| state.players.get(owner)) {
            player.arrow.paint(canvas);
        }
    }
    for passenger in &state.passengers {
        passenger.paint(canvas);
    }
    for player in &state.players {
        player.ship.paint(canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(list: &DrawList) -> Vec<&str> {
        list.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Sprite { image, .. } => Some(image.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_paint_order() {
        let mut state = GameState::new(1);
        let id = state.next_entity_id();
        let mut passenger = Passenger::new(id, 0, 1, state.platforms[0].bounds(), 10);
        passenger.visible = true;
        state.passengers.push(passenger);

        let mut list = DrawList::default();
        paint_world(&state, &mut list);

        let drawn = images(&list);
        assert_eq!(drawn.len(), 6 + 1 + 2);
        assert!(drawn[..5].iter().all(|&i| i == "platform"));
        assert_eq!(drawn[5], "refuel_platform");
        assert_eq!(drawn[6], "passenger_walk");
        assert_eq!(&drawn[7..], ["ship_blue", "ship_red"]);
    }

    #[test]
    fn test_hidden_passenger_not_painted() {
        let mut state = GameState::new(1);
        let id = state.next_entity_id();
        state
            .passengers
            .push(Passenger::new(id, 0, 1, state.platforms[0].bounds(), 0));
        let mut list = DrawList::default();
        paint_world(&state, &mut list);
        assert!(!images(&list).contains(&"passenger_walk"));
    }

    #[test]
    fn test_arrow_follows_its_platform() {
        let mut state = GameState::new(1);
        state.platforms[2].show_arrow(&mut state.players[1]);
        let mut list = DrawList::default();
        paint_world(&state, &mut list);

        let arrow = list
            .commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Arrow { .. }))
            .unwrap();
        assert_eq!(
            list.commands[arrow],
            DrawCommand::Arrow {
                tip: state.platforms[2].arrow_anchor(),
                color: PlayerColor::Red,
            }
        );
        // Directly after the third platform
        assert!(matches!(
            &list.commands[arrow - 1],
            DrawCommand::Sprite { image, .. } if image == "platform"
        ));
        assert_eq!(arrow, 3);
    }

    #[test]
    fn test_shielded_ship_draws_shield() {
        let mut state = GameState::new(1);
        state.players[0].ship.activate_shield();
        state.players[0].ship.animation.set_state(SpriteState::Thrust).unwrap();
        let mut list = DrawList::default();
        state.players[0].ship.paint(&mut list);

        assert_eq!(list.commands.len(), 2);
        assert!(matches!(
            &list.commands[0],
            DrawCommand::Sprite { image, .. } if image == "ship_thrust_blue"
        ));
        assert_eq!(
            list.commands[1],
            DrawCommand::Shield {
                center: IVec2::new(215, 115),
                radius: 15.0,
                color: PlayerColor::Blue,
            }
        );
    }

    #[test]
    fn test_begin_frame_clears_list() {
        let state = GameState::new(1);
        let mut list = DrawList::default();
        paint_world(&state, &mut list);
        let first = list.commands.len();
        paint_world(&state, &mut list);
        assert_eq!(list.commands.len(), first);
    }
}
