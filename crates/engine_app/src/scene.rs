//! Scene: the owner of all live game objects.
//!
//! Objects are kept in creation order, which is also the order systems see
//! them in. Entity ids grow monotonically and removal preserves order, so
//! the object list is always sorted by id and lookups are a binary search.

use engine_component::{Entity, EntityAllocator, GameObject};
use tracing::trace;

/// The live entity set of one level or application.
#[derive(Debug, Default)]
pub struct Scene {
    allocator: EntityAllocator,
    objects: Vec<GameObject>,
}

impl Scene {
    /// An empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new, empty object at the end of the iteration order.
    pub fn create_game_object(&mut self) -> &mut GameObject {
        let entity = self.allocator.allocate();
        let index = self.objects.len();
        self.objects.push(GameObject::new(entity));
        trace!(%entity, "game object created");
        &mut self.objects[index]
    }

    /// Remove an object and drop its components.
    ///
    /// Returns `false` if no live object has this id. Any [`Entity`] still
    /// held elsewhere simply stops resolving.
    pub fn destroy_game_object(&mut self, entity: Entity) -> bool {
        match self.position(entity) {
            Some(index) => {
                self.objects.remove(index);
                trace!(%entity, "game object destroyed");
                true
            }
            None => false,
        }
    }

    /// Live objects in creation order.
    pub fn game_objects(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.iter()
    }

    /// Live objects in creation order, mutably.
    pub fn game_objects_mut(&mut self) -> impl Iterator<Item = &mut GameObject> {
        self.objects.iter_mut()
    }

    /// Returns the object with this id, if it is still alive.
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&GameObject> {
        self.position(entity).map(|index| &self.objects[index])
    }

    /// Returns a mutable reference to the object with this id.
    #[must_use]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut GameObject> {
        self.position(entity).map(|index| &mut self.objects[index])
    }

    /// Returns `true` if the object is alive.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.position(entity).is_some()
    }

    /// Ids of all live objects, in creation order.
    #[must_use]
    pub fn entities(&self) -> Vec<Entity> {
        self.objects.iter().map(GameObject::entity).collect()
    }

    /// Number of live objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the scene holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Destroy every object. Ids are not reused afterwards.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    fn position(&self, entity: Entity) -> Option<usize> {
        self.objects
            .binary_search_by_key(&entity, GameObject::entity)
            .ok()
    }
}
