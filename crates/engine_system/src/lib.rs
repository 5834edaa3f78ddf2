//! # engine_system
//!
//! The "S" in ECS: the contract between a unit of per-frame behaviour and
//! the registry that drives it.
//!
//! This crate provides:
//!
//! - [`System`]: `init` / `update` / `free` callbacks over single objects,
//!   gated by a [`Requirement`](engine_component::Requirement).
//! - [`SystemContext`]: frame timing, the shared event channel, and the
//!   command buffer lent to every callback.
//! - [`Commands`]: spawn/despawn requests applied after a pass.
//! - [`SystemError`]: failures a callback reports back to the registry.
//!
//! ## Usage
//!
//! ```rust
//! use engine_component::{Component, GameObject, Requirement};
//! use engine_system::{System, SystemContext, SystemResult};
//!
//! struct Position { x: f32 }
//! impl Component for Position { fn type_name() -> &'static str { "Position" } }
//!
//! struct Drift;
//!
//! impl System for Drift {
//!     fn requirement(&self) -> Requirement {
//!         Requirement::of::<(Position,)>()
//!     }
//!
//!     fn update(&mut self, object: &mut GameObject, ctx: &mut SystemContext<'_>) -> SystemResult {
//!         object.component_mut::<Position>()?.x += ctx.dt() as f32;
//!         Ok(())
//!     }
//! }
//! ```

pub mod commands;
pub mod context;
pub mod error;
pub mod system;

pub use commands::{Command, Commands, SpawnFn};
pub use context::{FrameTime, SystemContext};
pub use error::{SystemError, SystemResult};
pub use system::{FnSystem, System, SystemId};
