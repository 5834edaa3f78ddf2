//! Deferred structural changes.
//!
//! While the registry walks the scene, a system only holds the one object it
//! was handed. Creating or destroying entities from inside a callback is
//! therefore recorded as a [`Command`] and applied by the registry once the
//! pass is over, in the order the commands were issued.

use engine_component::{Entity, GameObject};

/// Builds the components of an entity spawned through [`Commands::spawn`].
pub type SpawnFn = Box<dyn FnOnce(&mut GameObject) + Send>;

/// A recorded structural change.
pub enum Command {
    /// Create a new entity and let the closure attach its components.
    Spawn(SpawnFn),
    /// Destroy an entity, running any owed `free` callbacks first.
    Despawn(Entity),
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spawn(_) => f.write_str("Spawn(..)"),
            Self::Despawn(entity) => f.debug_tuple("Despawn").field(entity).finish(),
        }
    }
}

/// Ordered buffer of [`Command`]s issued during one dispatch pass.
#[derive(Debug, Default)]
pub struct Commands {
    queue: Vec<Command>,
}

impl Commands {
    /// An empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the creation of an entity, built by `build` once applied.
    pub fn spawn<F>(&mut self, build: F)
    where
        F: FnOnce(&mut GameObject) + Send + 'static,
    {
        self.queue.push(Command::Spawn(Box::new(build)));
    }

    /// Queue the destruction of `entity`.
    pub fn despawn(&mut self, entity: Entity) {
        self.queue.push(Command::Despawn(entity));
    }

    /// Number of queued commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nothing has been queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Take every queued command, oldest first.
    pub fn drain(&mut self) -> std::vec::Drain<'_, Command> {
        self.queue.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_keep_issue_order() {
        let mut commands = Commands::new();
        commands.despawn(Entity(3));
        commands.spawn(|_| {});
        commands.despawn(Entity(1));
        assert_eq!(commands.len(), 3);

        let drained: Vec<String> = commands.drain().map(|c| format!("{c:?}")).collect();
        assert_eq!(
            drained,
            vec!["Despawn(Entity(3))", "Spawn(..)", "Despawn(Entity(1))"]
        );
        assert!(commands.is_empty());
    }
}
