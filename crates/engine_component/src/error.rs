//! Component access errors.

use crate::entity::Entity;

/// Errors returned by the checked component accessors on
/// [`GameObject`](crate::GameObject).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComponentError {
    /// The entity has no component of the requested type.
    #[error("component `{component}` not found on {entity}")]
    NotFound {
        entity: Entity,
        component: &'static str,
    },
}
