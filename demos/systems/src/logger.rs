//! Logging of [`Moved`] events.

use std::sync::{Arc, Mutex, PoisonError};

use components::Name;
use engine_component::{Entity, GameObject, Requirement};
use engine_event::{EventChannel, SubscriptionId};
use engine_system::{System, SystemContext, SystemResult};
use tracing::{debug, info};

use crate::movement::Moved;

#[derive(Debug, Default)]
struct Recorded {
    frame: u64,
    moves: Vec<Moved>,
    total: u64,
}

/// Shared record of the moves a [`MoveLogger`] has heard.
///
/// Only the most recent frame's moves are kept; older ones are dropped as
/// soon as a move from a later frame arrives. The running total covers every
/// move ever recorded.
#[derive(Debug, Clone, Default)]
pub struct MoveHistory(Arc<Mutex<Recorded>>);

impl MoveHistory {
    fn push(&self, moved: Moved) {
        let mut recorded = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if moved.frame != recorded.frame {
            recorded.moves.clear();
            recorded.frame = moved.frame;
        }
        recorded.moves.push(moved);
        recorded.total += 1;
    }

    /// Moves of the most recent frame that had any, oldest first.
    #[must_use]
    pub fn latest(&self) -> Vec<Moved> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .moves
            .clone()
    }

    /// Moves of `entity` during `frame`; empty once a later frame has moved.
    #[must_use]
    pub fn moves_of(&self, entity: Entity, frame: u64) -> Vec<Moved> {
        let recorded = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if recorded.frame != frame {
            return Vec::new();
        }
        recorded
            .moves
            .iter()
            .filter(|moved| moved.entity == entity)
            .copied()
            .collect()
    }

    /// Number of moves recorded since the history was created.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).total
    }

    /// Number of moves currently retained.
    #[must_use]
    pub fn retained(&self) -> usize {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .moves
            .len()
    }
}

/// Records every [`Moved`] event and reports named objects' moves.
///
/// Subscribes when registered and unsubscribes when unregistered. Its update
/// runs for objects with a [`Name`] and logs the moves they made in the
/// current frame.
#[derive(Debug, Default)]
pub struct MoveLogger {
    history: MoveHistory,
    subscription: Option<SubscriptionId>,
}

impl MoveLogger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle to the recorded moves, usable after the logger has been
    /// handed to a registry.
    #[must_use]
    pub fn history(&self) -> MoveHistory {
        self.history.clone()
    }
}

impl System for MoveLogger {
    fn name(&self) -> &'static str {
        "move_logger"
    }

    fn requirement(&self) -> Requirement {
        Requirement::of::<(Name,)>()
    }

    fn on_register(&mut self, events: &EventChannel) {
        let history = self.history.clone();
        self.subscription = Some(events.subscribe(move |moved: &Moved| {
            debug!(entity = %moved.entity, frame = moved.frame, "move recorded");
            history.push(*moved);
        }));
    }

    fn on_unregister(&mut self, events: &EventChannel) {
        if let Some(id) = self.subscription.take() {
            events.unsubscribe(id);
        }
    }

    fn update(&mut self, object: &mut GameObject, ctx: &mut SystemContext<'_>) -> SystemResult {
        let name = object.component::<Name>()?;
        for moved in self.history.moves_of(object.entity(), ctx.frame()) {
            info!(
                frame = moved.frame,
                name = %name,
                x = moved.position.x,
                y = moved.position.y,
                "moved"
            );
        }
        Ok(())
    }
}
