//! # engine_component
//!
//! The "C" in ECS: what a component is, how it is attached to an entity, and
//! how a system declares the components it needs.
//!
//! This crate provides:
//!
//! - [`Component`] trait and its stable [`ComponentTypeId`] tag.
//! - [`Entity`] identifiers and the [`EntityAllocator`] that hands them out.
//! - [`GameObject`]: an entity with its typed, individually enableable
//!   components.
//! - [`Requirement`]: the per-system dispatch predicate.

pub mod component;
pub mod entity;
pub mod error;
pub mod object;
pub mod requirement;

pub use component::{Component, ComponentTypeId};
pub use entity::{Entity, EntityAllocator};
pub use error::ComponentError;
pub use object::GameObject;
pub use requirement::{ComponentSet, Requirement};
