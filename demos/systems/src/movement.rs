//! Movement along a heading.

use components::{Direction, Position, Velocity};
use engine_component::{Entity, GameObject, Requirement};
use engine_system::{System, SystemContext, SystemResult};
use glam::Vec2;
use tracing::trace;

/// Published after an object has moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moved {
    pub entity: Entity,
    /// Position after the move.
    pub position: Vec2,
    pub frame: u64,
}

/// Moves every object with a [`Position`], [`Velocity`] and [`Direction`]
/// along its direction at its velocity's speed.
#[derive(Debug, Default)]
pub struct MovementSystem {
    moves: u64,
}

impl MovementSystem {
    /// Total moves made by this instance.
    #[must_use]
    pub fn moves(&self) -> u64 {
        self.moves
    }
}

impl System for MovementSystem {
    fn name(&self) -> &'static str {
        "movement"
    }

    fn requirement(&self) -> Requirement {
        Requirement::of::<(Position, Velocity, Direction)>()
    }

    fn update(&mut self, object: &mut GameObject, ctx: &mut SystemContext<'_>) -> SystemResult {
        let step = object.component::<Direction>()?.unit()
            * object.component::<Velocity>()?.speed()
            * ctx.dt() as f32;
        let position = object.component_mut::<Position>()?;
        position.0 += step;
        let position = position.0;

        self.moves += 1;
        trace!(entity = %object.entity(), x = position.x, y = position.y, "moved");
        ctx.publish(Moved {
            entity: object.entity(),
            position,
            frame: ctx.frame(),
        });
        Ok(())
    }
}
