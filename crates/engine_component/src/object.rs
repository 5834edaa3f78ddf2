//! Per-entity component storage.
//!
//! A [`GameObject`] keeps at most one instance per component type in a sparse
//! map keyed by [`ComponentTypeId`]. Each instance sits in a slot together
//! with its enabled flag; a disabled component stays attached and readable
//! but no longer satisfies any [`Requirement`](crate::Requirement).

use std::any::{Any, TypeId};
use std::collections::HashMap;

use tracing::warn;

use crate::component::{Component, ComponentTypeId};
use crate::entity::Entity;
use crate::error::ComponentError;

struct ComponentSlot {
    name: &'static str,
    type_id: TypeId,
    enabled: bool,
    value: Box<dyn Any + Send + Sync>,
}

impl ComponentSlot {
    fn new<T: Component>(value: T) -> Self {
        Self {
            name: T::type_name(),
            type_id: TypeId::of::<T>(),
            enabled: true,
            value: Box::new(value),
        }
    }
}

/// An entity together with the components attached to it.
///
/// Game objects are created and owned by a scene; systems receive them by
/// mutable reference for the duration of a single callback.
pub struct GameObject {
    entity: Entity,
    components: HashMap<ComponentTypeId, ComponentSlot>,
}

impl GameObject {
    /// Create an object with no components.
    #[must_use]
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            components: HashMap::new(),
        }
    }

    /// The id this object was created with.
    #[must_use]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Attach `value`, replacing any existing component of the same type.
    ///
    /// The new instance starts enabled, even if the one it replaces was
    /// disabled. Returns `self` so attachments can be chained.
    pub fn add_component<T: Component>(&mut self, value: T) -> &mut Self {
        let slot = ComponentSlot::new(value);
        if let Some(old) = self.components.insert(T::component_type_id(), slot)
            && old.type_id != TypeId::of::<T>()
        {
            warn!(
                entity = %self.entity,
                component = T::type_name(),
                previous = old.name,
                "component type name collision, replaced a different type"
            );
        }
        self
    }

    /// Returns the attached `T`, enabled or not.
    #[must_use]
    pub fn get_component<T: Component>(&self) -> Option<&T> {
        self.components
            .get(&T::component_type_id())
            .and_then(|slot| slot.value.downcast_ref::<T>())
    }

    /// Returns a mutable reference to the attached `T`.
    #[must_use]
    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components
            .get_mut(&T::component_type_id())
            .and_then(|slot| slot.value.downcast_mut::<T>())
    }

    /// Like [`get_component`](Self::get_component), but reports absence as a
    /// [`ComponentError::NotFound`] so callers can propagate it with `?`.
    pub fn component<T: Component>(&self) -> Result<&T, ComponentError> {
        let entity = self.entity;
        self.get_component::<T>()
            .ok_or_else(|| not_found::<T>(entity))
    }

    /// Mutable form of [`component`](Self::component).
    pub fn component_mut<T: Component>(&mut self) -> Result<&mut T, ComponentError> {
        let entity = self.entity;
        self.get_component_mut::<T>()
            .ok_or_else(|| not_found::<T>(entity))
    }

    /// Detach and return the component of type `T`, if attached.
    pub fn remove_component<T: Component>(&mut self) -> Option<T> {
        let type_id = T::component_type_id();
        match self.components.get(&type_id) {
            Some(slot) if slot.value.is::<T>() => {}
            _ => return None,
        }
        self.components
            .remove(&type_id)
            .and_then(|slot| slot.value.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    /// Returns `true` if a `T` is attached, enabled or not.
    #[must_use]
    pub fn has_component<T: Component>(&self) -> bool {
        self.get_component::<T>().is_some()
    }

    /// Enable or disable the component of type `T`.
    pub fn set_component_enabled<T: Component>(
        &mut self,
        enabled: bool,
    ) -> Result<(), ComponentError> {
        match self.components.get_mut(&T::component_type_id()) {
            Some(slot) if slot.value.is::<T>() => {
                slot.enabled = enabled;
                Ok(())
            }
            _ => Err(not_found::<T>(self.entity)),
        }
    }

    /// Returns `false` when the component is disabled or not attached.
    #[must_use]
    pub fn is_component_enabled<T: Component>(&self) -> bool {
        self.has_enabled(T::component_type_id(), TypeId::of::<T>())
    }

    /// Returns `true` if the slot under `tag` holds an enabled value of
    /// exactly `type_id`. A different type sharing the tag does not count.
    #[must_use]
    pub fn has_enabled(&self, tag: ComponentTypeId, type_id: TypeId) -> bool {
        self.components
            .get(&tag)
            .is_some_and(|slot| slot.enabled && slot.type_id == type_id)
    }

    /// Number of attached components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

}

impl std::fmt::Debug for GameObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.components.values().map(|slot| slot.name).collect();
        names.sort_unstable();
        f.debug_struct("GameObject")
            .field("entity", &self.entity)
            .field("components", &names)
            .finish()
    }
}

fn not_found<T: Component>(entity: Entity) -> ComponentError {
    ComponentError::NotFound {
        entity,
        component: T::type_name(),
    }
}
