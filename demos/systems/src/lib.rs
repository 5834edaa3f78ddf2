//! Example systems for the demo scene.
//!
//! [`MovementSystem`] moves objects and announces each move as a [`Moved`]
//! event; [`MoveLogger`] listens for those events without ever touching the
//! movement system directly.

pub mod logger;
pub mod movement;

pub use logger::{MoveHistory, MoveLogger};
pub use movement::{Moved, MovementSystem};
