//! Resources: the system registry and requirement-filtered dispatcher.
//!
//! [`Resources`] owns the [`Scene`], the shared [`EventChannel`], and one
//! instance of every registered system. The host drives it per frame:
//!
//! ```text
//! resources.advance(dt);
//! resources.update::<Movement>();
//! resources.update::<Render>();
//! ```
//!
//! Each pass walks the scene in creation order and calls the system only for
//! objects satisfying its requirement. The registry remembers which objects
//! every system has initialized, which gives these guarantees:
//!
//! - `init` runs once per (system, object), at the latest right before the
//!   object's first `update`.
//! - `free` runs once for every object that completed `init`, whether it is
//!   freed by `free::<S>()`, destroyed through
//!   [`Resources::destroy_game_object`], or its system is replaced, removed,
//!   or shut down. Current eligibility does not matter.
//! - A callback returning an error is logged and counted; the pass carries
//!   on with the next object.

use std::collections::HashSet;

use engine_component::{Entity, GameObject, Requirement};
use engine_event::EventChannel;
use engine_system::{Command, Commands, FrameTime, System, SystemContext, SystemId, SystemResult};
use tracing::{debug, error, info, trace, warn};

use crate::scene::Scene;

/// The lifecycle callback a pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Update,
    Free,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Init => "init",
            Self::Update => "update",
            Self::Free => "free",
        })
    }
}

/// What a single dispatch pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub system: &'static str,
    pub phase: Phase,
    /// Objects in the scene when the pass started.
    pub visited: usize,
    /// Callbacks of `phase` that returned `Ok`.
    pub dispatched: usize,
    /// `init` calls that completed during this pass, including lazy ones
    /// made by an update pass.
    pub initialized: usize,
    /// Objects the pass did not call back for.
    pub skipped: usize,
    /// Callbacks that returned an error.
    pub failed: usize,
    /// Commands queued by the callbacks and applied after the pass.
    pub commands: usize,
}

impl DispatchReport {
    fn new(system: &'static str, phase: Phase) -> Self {
        Self {
            system,
            phase,
            visited: 0,
            dispatched: 0,
            initialized: 0,
            skipped: 0,
            failed: 0,
            commands: 0,
        }
    }
}

struct SystemEntry {
    id: SystemId,
    name: &'static str,
    requirement: Requirement,
    system: Box<dyn System>,
    initialized: HashSet<Entity>,
}

impl SystemEntry {
    fn run(
        &mut self,
        phase: Phase,
        object: &mut GameObject,
        ctx: &mut SystemContext<'_>,
    ) -> bool {
        let result: SystemResult = match phase {
            Phase::Init => self.system.init(object, ctx),
            Phase::Update => self.system.update(object, ctx),
            Phase::Free => self.system.free(object, ctx),
        };
        match result {
            Ok(()) => true,
            Err(err) => {
                error!(
                    system = self.name,
                    entity = %object.entity(),
                    %phase,
                    error = %err,
                    "system callback failed"
                );
                false
            }
        }
    }

    /// Dispatch `phase` for one object and record the outcome.
    fn visit(
        &mut self,
        phase: Phase,
        object: &mut GameObject,
        ctx: &mut SystemContext<'_>,
        report: &mut DispatchReport,
    ) {
        let entity = object.entity();
        match phase {
            Phase::Init | Phase::Update => {
                if !self.requirement.is_satisfied_by(object) {
                    trace!(
                        system = self.name,
                        %entity,
                        unmet = ?self.requirement.unmet(object).collect::<Vec<_>>(),
                        "requirement not met"
                    );
                    report.skipped += 1;
                    return;
                }
                let fresh = !self.initialized.contains(&entity);
                if fresh {
                    if !self.run(Phase::Init, object, ctx) {
                        report.failed += 1;
                        return;
                    }
                    self.initialized.insert(entity);
                    report.initialized += 1;
                }
                match phase {
                    Phase::Init if fresh => report.dispatched += 1,
                    Phase::Init => report.skipped += 1,
                    _ => {
                        if self.run(Phase::Update, object, ctx) {
                            report.dispatched += 1;
                        } else {
                            report.failed += 1;
                        }
                    }
                }
            }
            Phase::Free => {
                if !self.initialized.remove(&entity) {
                    report.skipped += 1;
                } else if self.run(Phase::Free, object, ctx) {
                    report.dispatched += 1;
                } else {
                    report.failed += 1;
                }
            }
        }
    }

    /// Forget objects that left the scene without going through the
    /// registry. They get no `free` call.
    fn prune(&mut self, scene: &Scene) {
        let before = self.initialized.len();
        self.initialized.retain(|entity| scene.contains(*entity));
        let dropped = before - self.initialized.len();
        if dropped > 0 {
            debug!(
                system = self.name,
                dropped, "forgot objects destroyed outside the registry"
            );
        }
    }
}

/// Registry of systems over one scene and one event channel.
pub struct Resources {
    scene: Scene,
    events: EventChannel,
    systems: Vec<SystemEntry>,
    time: FrameTime,
}

impl Resources {
    /// A registry over an empty scene with a fresh event channel.
    #[must_use]
    pub fn new() -> Self {
        Self::with_scene(Scene::new())
    }

    /// A registry over an existing scene.
    #[must_use]
    pub fn with_scene(scene: Scene) -> Self {
        Self {
            scene,
            events: EventChannel::new(),
            systems: Vec::new(),
            time: FrameTime::default(),
        }
    }

    /// Returns a reference to the scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene access for setup code.
    ///
    /// Objects destroyed here bypass `free`; prefer
    /// [`destroy_game_object`](Self::destroy_game_object) once systems have
    /// initialized them.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The channel shared by every registered system.
    #[must_use]
    pub fn events(&self) -> &EventChannel {
        &self.events
    }

    /// Frames started so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.time.frame
    }

    /// Start the next frame.
    pub fn advance(&mut self, dt: f64) {
        self.time.advance(dt);
    }

    /// Register `system`, replacing any instance of the same type.
    ///
    /// A replaced instance first gets `free` for every object it initialized,
    /// then `on_unregister`. The new instance keeps the old one's position in
    /// the registration order. Returns `true` if an instance was replaced.
    pub fn add<S: System>(&mut self, mut system: S) -> bool {
        let id = SystemId::of::<S>();
        let existing = self.index_of(id);
        if let Some(index) = existing {
            warn!(
                system = self.systems[index].name,
                "system registered twice, replacing the previous instance"
            );
            self.retire(index);
        }

        let requirement = system.requirement();
        system.on_register(&self.events);
        let entry = SystemEntry {
            id,
            name: system.name(),
            requirement,
            system: Box::new(system),
            initialized: HashSet::new(),
        };
        info!(
            system = entry.name,
            requirement = %entry.requirement,
            "system registered"
        );

        match existing {
            Some(index) => {
                self.systems[index] = entry;
                true
            }
            None => {
                self.systems.push(entry);
                false
            }
        }
    }

    /// Unregister system `S`, freeing every object it initialized.
    ///
    /// Returns `false` if `S` was not registered.
    pub fn remove<S: System>(&mut self) -> bool {
        match self.index_of(SystemId::of::<S>()) {
            Some(index) => {
                self.retire(index);
                let entry = self.systems.remove(index);
                info!(system = entry.name, "system removed");
                true
            }
            None => false,
        }
    }

    /// Returns `true` if system `S` is registered.
    #[must_use]
    pub fn contains<S: System>(&self) -> bool {
        self.index_of(SystemId::of::<S>()).is_some()
    }

    /// Number of registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Returns `true` if no system is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Registered systems in registration order.
    #[must_use]
    pub fn system_ids(&self) -> Vec<SystemId> {
        self.systems.iter().map(|entry| entry.id).collect()
    }

    /// Names of the registered systems in registration order.
    #[must_use]
    pub fn system_names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|entry| entry.name).collect()
    }

    /// Look a system up by its [`System::name`].
    #[must_use]
    pub fn id_by_name(&self, name: &str) -> Option<SystemId> {
        self.systems
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.id)
    }

    /// Initialize `S` for every qualifying object it has not initialized.
    pub fn init<S: System>(&mut self) -> Option<DispatchReport> {
        self.init_by_id(SystemId::of::<S>())
    }

    /// Update `S` for every qualifying object, initializing new ones first.
    pub fn update<S: System>(&mut self) -> Option<DispatchReport> {
        self.update_by_id(SystemId::of::<S>())
    }

    /// Free `S` for every object it initialized.
    pub fn free<S: System>(&mut self) -> Option<DispatchReport> {
        self.free_by_id(SystemId::of::<S>())
    }

    /// [`init`](Self::init) by registry key.
    pub fn init_by_id(&mut self, id: SystemId) -> Option<DispatchReport> {
        self.dispatch_by_id(id, Phase::Init)
    }

    /// [`update`](Self::update) by registry key.
    pub fn update_by_id(&mut self, id: SystemId) -> Option<DispatchReport> {
        self.dispatch_by_id(id, Phase::Update)
    }

    /// [`free`](Self::free) by registry key.
    pub fn free_by_id(&mut self, id: SystemId) -> Option<DispatchReport> {
        self.dispatch_by_id(id, Phase::Free)
    }

    /// [`init`](Self::init) every system, in registration order.
    pub fn init_all(&mut self) -> Vec<DispatchReport> {
        self.dispatch_all(Phase::Init)
    }

    /// [`update`](Self::update) every system, in registration order.
    pub fn update_all(&mut self) -> Vec<DispatchReport> {
        self.dispatch_all(Phase::Update)
    }

    /// [`free`](Self::free) every system, in registration order.
    pub fn free_all(&mut self) -> Vec<DispatchReport> {
        self.dispatch_all(Phase::Free)
    }

    /// Destroy an object, running `free` for every system that initialized
    /// it first. Returns `false` if the object does not exist.
    pub fn destroy_game_object(&mut self, entity: Entity) -> bool {
        let mut commands = Commands::new();
        {
            let Self {
                scene,
                events,
                systems,
                time,
            } = self;
            let Some(object) = scene.get_mut(entity) else {
                return false;
            };
            let mut ctx = SystemContext::new(*time, events, &mut commands);
            for entry in systems.iter_mut() {
                if entry.initialized.remove(&entity) {
                    entry.run(Phase::Free, object, &mut ctx);
                }
            }
        }
        let removed = self.scene.destroy_game_object(entity);
        self.apply(commands);
        removed
    }

    /// Free every system, call `on_unregister` on each, and drop them.
    ///
    /// Also runs on drop if it was not called, unless the drop happens while
    /// a panic unwinds.
    pub fn shutdown(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.systems.is_empty() {
            return;
        }
        self.free_all();
        for entry in &mut self.systems {
            entry.system.on_unregister(&self.events);
        }
        info!(systems = self.systems.len(), "registry shut down");
        self.systems.clear();
    }

    fn index_of(&self, id: SystemId) -> Option<usize> {
        self.systems.iter().position(|entry| entry.id == id)
    }

    fn dispatch_by_id(&mut self, id: SystemId, phase: Phase) -> Option<DispatchReport> {
        match self.index_of(id) {
            Some(index) => Some(self.dispatch(index, phase)),
            None => {
                debug!(?id, %phase, "system not registered, nothing to dispatch");
                None
            }
        }
    }

    fn dispatch_all(&mut self, phase: Phase) -> Vec<DispatchReport> {
        // Commands may not add or remove systems, so indices stay valid.
        (0..self.systems.len())
            .map(|index| self.dispatch(index, phase))
            .collect()
    }

    fn dispatch(&mut self, index: usize, phase: Phase) -> DispatchReport {
        let mut commands = Commands::new();
        let mut report = {
            let Self {
                scene,
                events,
                systems,
                time,
            } = self;
            let entry = &mut systems[index];
            entry.prune(scene);

            let mut report = DispatchReport::new(entry.name, phase);
            let mut ctx = SystemContext::new(*time, events, &mut commands);
            for object in scene.game_objects_mut() {
                report.visited += 1;
                entry.visit(phase, object, &mut ctx, &mut report);
            }
            report
        };

        report.commands = commands.len();
        self.apply(commands);

        debug!(
            system = report.system,
            %phase,
            frame = self.time.frame,
            visited = report.visited,
            dispatched = report.dispatched,
            initialized = report.initialized,
            skipped = report.skipped,
            failed = report.failed,
            commands = report.commands,
            "dispatch pass complete"
        );
        report
    }

    /// Free every object system `index` initialized and unregister it.
    fn retire(&mut self, index: usize) {
        self.dispatch(index, Phase::Free);
        let Self {
            events, systems, ..
        } = self;
        systems[index].system.on_unregister(events);
    }

    fn apply(&mut self, mut commands: Commands) {
        for command in commands.drain() {
            match command {
                Command::Spawn(build) => {
                    let object = self.scene.create_game_object();
                    let entity = object.entity();
                    build(object);
                    trace!(%entity, "spawned by command");
                }
                Command::Despawn(entity) => {
                    if !self.destroy_game_object(entity) {
                        warn!(%entity, "despawn command for unknown entity");
                    }
                }
            }
        }
    }
}

impl Default for Resources {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Resources {
    fn drop(&mut self) {
        // Unwinding from a panicking callback.
        if std::thread::panicking() {
            warn!(
                systems = self.systems.len(),
                "dropped during a panic, skipping free callbacks"
            );
            return;
        }
        self.teardown();
    }
}

impl std::fmt::Debug for Resources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resources")
            .field("scene", &self.scene)
            .field("events", &self.events)
            .field("systems", &self.system_names())
            .field("time", &self.time)
            .finish()
    }
}
