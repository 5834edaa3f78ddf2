//! Requirements: the component types a system needs on an entity.
//!
//! A [`Requirement`] is declared once per system and evaluated by the
//! registry against every entity on every pass. An entity satisfies it when
//! each listed component type is attached **and** enabled:
//!
//! ```text
//! satisfied(E) = ∀ T ∈ R : E.has(T) ∧ E.enabled(T)
//! ```
//!
//! The check is O(k) in the number of required types, one hash lookup each.
//! Lookups go by [`ComponentTypeId`] but also compare the stored Rust type,
//! so a different component that happens to share a type name never
//! satisfies the requirement.

use std::any::TypeId;

use crate::component::{Component, ComponentTypeId};
use crate::object::GameObject;

/// The set of component types a system depends on.
///
/// Build one from a tuple with [`Requirement::of`] or type by type with
/// [`Requirement::with`]. Listing a type twice has no effect.
///
/// ```rust
/// use engine_component::{Component, Requirement};
///
/// struct Position;
/// impl Component for Position { fn type_name() -> &'static str { "Position" } }
/// struct Velocity;
/// impl Component for Velocity { fn type_name() -> &'static str { "Velocity" } }
///
/// let a = Requirement::of::<(Position, Velocity)>();
/// let b = Requirement::new().with::<Position>().with::<Velocity>();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirement {
    types: Vec<ComponentTypeId>,
    rust_types: Vec<TypeId>,
    names: Vec<&'static str>,
}

impl Requirement {
    /// An empty requirement, satisfied by every entity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A requirement listing every component type in the tuple `S`.
    #[must_use]
    pub fn of<S: ComponentSet>() -> Self {
        S::extend(Self::new())
    }

    /// Add component type `T`.
    #[must_use]
    pub fn with<T: Component>(mut self) -> Self {
        let type_id = TypeId::of::<T>();
        if !self.rust_types.contains(&type_id) {
            self.types.push(T::component_type_id());
            self.rust_types.push(type_id);
            self.names.push(T::type_name());
        }
        self
    }

    /// Returns `true` if `object` carries every required type, enabled.
    #[must_use]
    pub fn is_satisfied_by(&self, object: &GameObject) -> bool {
        self.types
            .iter()
            .zip(&self.rust_types)
            .all(|(&tag, &ty)| object.has_enabled(tag, ty))
    }

    /// Names of the required types that are absent or disabled on `object`.
    pub fn unmet<'a>(&'a self, object: &'a GameObject) -> impl Iterator<Item = &'static str> + 'a {
        self.types
            .iter()
            .zip(&self.rust_types)
            .zip(&self.names)
            .filter(|&((&tag, &ty), _)| !object.has_enabled(tag, ty))
            .map(|(_, &name)| name)
    }

    /// Returns `true` if component type `T` is listed.
    #[must_use]
    pub fn contains<T: Component>(&self) -> bool {
        self.rust_types.contains(&TypeId::of::<T>())
    }

    /// Required tags in declaration order.
    #[must_use]
    pub fn types(&self) -> &[ComponentTypeId] {
        &self.types
    }

    /// Required component names in declaration order.
    #[must_use]
    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    /// Number of distinct required types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` for the requirement every object satisfies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.names.join(", "))
    }
}

/// A tuple of component types that can be turned into a [`Requirement`].
///
/// Implemented for tuples of one to eight [`Component`] types.
pub trait ComponentSet {
    fn extend(requirement: Requirement) -> Requirement;
}

macro_rules! impl_component_set {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentSet for ($($name,)+) {
            fn extend(requirement: Requirement) -> Requirement {
                requirement$(.with::<$name>())+
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
impl_component_set!(A, B, C, D, E, F, G);
impl_component_set!(A, B, C, D, E, F, G, H);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;

    struct Position;
    impl Component for Position {
        fn type_name() -> &'static str {
            "Position"
        }
    }

    struct Velocity;
    impl Component for Velocity {
        fn type_name() -> &'static str {
            "Velocity"
        }
    }

    struct Direction;
    impl Component for Direction {
        fn type_name() -> &'static str {
            "Direction"
        }
    }

    fn full_object() -> GameObject {
        let mut obj = GameObject::new(Entity(1));
        obj.add_component(Position)
            .add_component(Velocity)
            .add_component(Direction);
        obj
    }

    #[test]
    fn test_tuple_and_builder_agree() {
        let a = Requirement::of::<(Position, Velocity, Direction)>();
        let b = Requirement::new()
            .with::<Position>()
            .with::<Velocity>()
            .with::<Direction>();
        assert_eq!(a, b);
        assert_eq!(a.names(), &["Position", "Velocity", "Direction"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let req = Requirement::of::<(Position, Position, Velocity)>();
        assert_eq!(req.len(), 2);
        assert!(req.contains::<Position>());
        assert!(!req.contains::<Direction>());
    }

    #[test]
    fn test_satisfied_when_all_present_and_enabled() {
        let req = Requirement::of::<(Position, Velocity, Direction)>();
        assert!(req.is_satisfied_by(&full_object()));
    }

    #[test]
    fn test_missing_type_fails() {
        let req = Requirement::of::<(Position, Velocity, Direction)>();
        let mut obj = full_object();
        obj.remove_component::<Direction>();
        assert!(!req.is_satisfied_by(&obj));
        assert_eq!(req.unmet(&obj).collect::<Vec<_>>(), vec!["Direction"]);
    }

    #[test]
    fn test_any_single_disabled_type_fails() {
        let req = Requirement::of::<(Position, Velocity, Direction)>();
        for disable in 0..3 {
            let mut obj = full_object();
            match disable {
                0 => obj.set_component_enabled::<Position>(false).unwrap(),
                1 => obj.set_component_enabled::<Velocity>(false).unwrap(),
                _ => obj.set_component_enabled::<Direction>(false).unwrap(),
            }
            assert!(!req.is_satisfied_by(&obj), "case {disable}");
        }
    }

    #[test]
    fn test_disabled_unrelated_component_is_ignored() {
        let req = Requirement::of::<(Position, Velocity)>();
        let mut obj = full_object();
        obj.set_component_enabled::<Direction>(false).unwrap();
        assert!(req.is_satisfied_by(&obj));
    }

    #[test]
    fn test_empty_requirement_matches_everything() {
        let req = Requirement::new();
        assert!(req.is_empty());
        assert!(req.is_satisfied_by(&GameObject::new(Entity(9))));
    }

    /// Shares `Position`'s type name, and so its tag.
    struct Impostor;
    impl Component for Impostor {
        fn type_name() -> &'static str {
            "Position"
        }
    }

    #[test]
    fn test_same_named_type_does_not_satisfy() {
        let mut obj = GameObject::new(Entity(2));
        obj.add_component(Impostor)
            .add_component(Velocity)
            .add_component(Direction);

        let req = Requirement::of::<(Position, Velocity, Direction)>();
        assert!(!req.is_satisfied_by(&obj));
        assert_eq!(req.unmet(&obj).collect::<Vec<_>>(), vec!["Position"]);
        assert!(Requirement::of::<(Impostor,)>().is_satisfied_by(&obj));
    }

    #[test]
    fn test_display() {
        let req = Requirement::of::<(Position, Velocity)>();
        assert_eq!(req.to_string(), "{Position, Velocity}");
        assert_eq!(Requirement::new().to_string(), "{}");
    }
}
