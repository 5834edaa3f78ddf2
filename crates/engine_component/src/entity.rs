//! Entity identifiers.
//!
//! An [`Entity`] names a [`GameObject`](crate::GameObject) inside one scene.
//! It carries no data and no borrow, so systems and events can hold on to it
//! freely; looking it up after the object is gone just yields nothing.

/// A scene-unique entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(pub u64);

impl Entity {
    /// Never handed out by an [`EntityAllocator`].
    pub const INVALID: Entity = Entity(0);

    /// Wrap a raw id.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// The raw id.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Returns `true` for any id other than [`Entity::INVALID`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Hands out monotonically increasing entity ids, starting at 1.
///
/// Ids are never recycled, so a stale [`Entity`] can not alias an object
/// created later in the same scene.
#[derive(Debug)]
pub struct EntityAllocator {
    next_id: u64,
}

impl EntityAllocator {
    /// An allocator whose first id is 1.
    #[must_use]
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Hand out the next unused id.
    pub fn allocate(&mut self) -> Entity {
        let id = self.next_id;
        self.next_id += 1;
        Entity(id)
    }

    /// Number of ids handed out so far.
    #[must_use]
    pub fn allocated(&self) -> u64 {
        self.next_id - 1
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_sentinel() {
        assert!(!Entity::INVALID.is_valid());
        assert!(Entity::from_raw(7).is_valid());
    }

    #[test]
    fn test_allocator_is_monotonic() {
        let mut alloc = EntityAllocator::new();
        let ids: Vec<u64> = (0..3).map(|_| alloc.allocate().id()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(alloc.allocated(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(Entity(12).to_string(), "Entity(12)");
    }
}
