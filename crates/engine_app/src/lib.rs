//! # engine_app
//!
//! The runtime half of the engine: a [`Scene`] of game objects, the
//! [`Resources`] registry that dispatches systems over it, and a fixed-rate
//! [`TickLoop`] host.
//!
//! ```rust,ignore
//! let mut resources = Resources::new();
//! resources
//!     .scene_mut()
//!     .create_game_object()
//!     .add_component(Position::new(0.0, 0.0))
//!     .add_component(Velocity::new(5.0, 0.0));
//! resources.add(MovementSystem::default());
//!
//! resources.advance(1.0 / 60.0);
//! resources.update::<MovementSystem>();
//! resources.shutdown();
//! ```

pub mod config;
pub mod resources;
pub mod scene;
pub mod tick;

pub use config::{ConfigError, TickConfig};
pub use resources::{DispatchReport, Phase, Resources};
pub use scene::Scene;
pub use tick::TickLoop;
