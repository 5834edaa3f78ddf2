//! The [`System`] trait and its registry key.

use std::any::TypeId;

use engine_component::{GameObject, Requirement};
use engine_event::EventChannel;

use crate::context::SystemContext;
use crate::error::SystemResult;

/// A unit of per-frame behaviour.
///
/// The registry calls a system only for objects that satisfy its
/// [`Requirement`], and drives each (system, object) pair through
/// `init → update* → free`:
///
/// - [`init`](System::init) runs once, before the first `update` that
///   includes the object.
/// - [`update`](System::update) runs once per pass while the object
///   qualifies.
/// - [`free`](System::free) runs once for every object that completed
///   `init`, whether or not it still qualifies.
///
/// Systems talk to each other only through the [`EventChannel`]; they
/// subscribe in [`on_register`](System::on_register).
///
/// # Example
///
/// ```rust,ignore
/// struct Gravity;
///
/// impl System for Gravity {
///     fn requirement(&self) -> Requirement {
///         Requirement::of::<(Velocity,)>()
///     }
///
///     fn update(&mut self, object: &mut GameObject, ctx: &mut SystemContext<'_>) -> SystemResult {
///         object.component_mut::<Velocity>()?.y -= 9.81 * ctx.dt() as f32;
///         Ok(())
///     }
/// }
/// ```
pub trait System: Send + 'static {
    /// Name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Component types an object must carry, enabled, to be dispatched.
    ///
    /// Read once when the system is registered.
    fn requirement(&self) -> Requirement;

    /// Called when the system is added to a registry.
    fn on_register(&mut self, _events: &EventChannel) {}

    /// Called when the system is replaced, removed, or the registry shuts
    /// down, after all owed `free` calls.
    fn on_unregister(&mut self, _events: &EventChannel) {}

    fn init(&mut self, _object: &mut GameObject, _ctx: &mut SystemContext<'_>) -> SystemResult {
        Ok(())
    }

    fn update(&mut self, object: &mut GameObject, ctx: &mut SystemContext<'_>) -> SystemResult;

    fn free(&mut self, _object: &mut GameObject, _ctx: &mut SystemContext<'_>) -> SystemResult {
        Ok(())
    }
}

/// Registry key of a system type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemId(TypeId);

impl SystemId {
    /// The id of system type `S`.
    #[must_use]
    pub fn of<S: System>() -> Self {
        Self(TypeId::of::<S>())
    }
}

/// A system built from a requirement and an `update` closure.
pub struct FnSystem<F>
where
    F: FnMut(&mut GameObject, &mut SystemContext<'_>) -> SystemResult + Send + 'static,
{
    name: &'static str,
    requirement: Requirement,
    update: F,
}

impl<F> FnSystem<F>
where
    F: FnMut(&mut GameObject, &mut SystemContext<'_>) -> SystemResult + Send + 'static,
{
    /// Wrap `update` as a system called `name`, dispatched to objects
    /// satisfying `requirement`.
    pub fn new(name: &'static str, requirement: Requirement, update: F) -> Self {
        Self {
            name,
            requirement,
            update,
        }
    }
}

impl<F> System for FnSystem<F>
where
    F: FnMut(&mut GameObject, &mut SystemContext<'_>) -> SystemResult + Send + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn requirement(&self) -> Requirement {
        self.requirement.clone()
    }

    fn update(&mut self, object: &mut GameObject, ctx: &mut SystemContext<'_>) -> SystemResult {
        (self.update)(object, ctx)
    }
}
