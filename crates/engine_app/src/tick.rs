//! Host tick loop.
//!
//! Each tick:
//!
//! 1. Advance the frame counter and `dt`.
//! 2. Update every scheduled system, in schedule order.
//!
//! Initialization is lazy (the first update of a new object runs `init`),
//! and everything still initialized is freed when the loop is shut down.

use std::time::{Duration, Instant};

use engine_system::SystemId;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, TickConfig};
use crate::resources::{DispatchReport, Resources};

/// Drives a [`Resources`] registry at a fixed rate.
#[derive(Debug)]
pub struct TickLoop {
    config: TickConfig,
    resources: Resources,
}

impl TickLoop {
    /// A loop over an empty registry.
    #[must_use]
    pub fn new(config: TickConfig) -> Self {
        Self::with_resources(config, Resources::new())
    }

    /// A loop over an already populated registry.
    #[must_use]
    pub fn with_resources(config: TickConfig, resources: Resources) -> Self {
        Self { config, resources }
    }

    /// The configuration the loop was built with.
    #[must_use]
    pub fn config(&self) -> &TickConfig {
        &self.config
    }

    /// Number of ticks run so far.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.resources.frame()
    }

    /// The registry being driven.
    #[must_use]
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Mutable registry access, for registering systems and populating the
    /// scene before [`run`](Self::run).
    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    /// Check that every scheduled name refers to a registered system.
    pub fn validate_schedule(&self) -> Result<(), ConfigError> {
        let unknown: Vec<&str> = self
            .config
            .schedule
            .iter()
            .map(String::as_str)
            .filter(|name| self.resources.id_by_name(name).is_none())
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(format!(
                "schedule names unregistered systems: {}",
                unknown.join(", ")
            )))
        }
    }

    fn resolve_schedule(&self) -> Vec<SystemId> {
        if self.config.schedule.is_empty() {
            return self.resources.system_ids();
        }
        self.config
            .schedule
            .iter()
            .filter_map(|name| {
                let id = self.resources.id_by_name(name);
                if id.is_none() {
                    warn!(system = %name, "scheduled system is not registered, skipping");
                }
                id
            })
            .collect()
    }

    /// Run one tick of `dt` seconds.
    pub fn tick(&mut self, dt: f64) -> Vec<DispatchReport> {
        self.resources.advance(dt);
        let schedule = self.resolve_schedule();

        debug!(
            tick_id = self.tick_id(),
            dt,
            systems = schedule.len(),
            "tick start"
        );

        schedule
            .into_iter()
            .filter_map(|id| self.resources.update_by_id(id))
            .collect()
    }

    /// Run `max_ticks` more ticks, or indefinitely when it is 0.
    ///
    /// Blocking. Ticks are scheduled against fixed deadlines; when a tick
    /// overruns, the schedule restarts from now instead of bursting to catch
    /// up. Fails before the first tick if the config is invalid.
    pub fn run(&mut self) -> Result<(), ConfigError> {
        self.config.validate()?;
        let budget = Duration::from_secs_f64(self.config.tick_interval());
        let stop_at = (self.config.max_ticks > 0).then(|| self.tick_id() + self.config.max_ticks);

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            systems = self.resources.len(),
            "starting tick loop"
        );

        let mut deadline = Instant::now();
        loop {
            self.tick(budget.as_secs_f64());
            if stop_at.is_some_and(|stop| self.tick_id() >= stop) {
                break;
            }

            deadline += budget;
            let now = Instant::now();
            match deadline.checked_duration_since(now) {
                Some(wait) => std::thread::sleep(wait),
                None => {
                    warn!(
                        tick_id = self.tick_id(),
                        behind_ms = now.duration_since(deadline).as_millis() as u64,
                        budget_ms = budget.as_millis() as u64,
                        "tick loop fell behind schedule"
                    );
                    deadline = now;
                }
            }
        }

        info!(tick_id = self.tick_id(), "tick loop complete");
        Ok(())
    }

    /// Free every system and drop the registry.
    pub fn shutdown(self) {
        self.resources.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use engine_component::{Component, GameObject, Requirement};
    use engine_system::{FnSystem, System, SystemContext, SystemResult};

    use super::*;

    struct Ticks(u32);

    impl Component for Ticks {
        fn type_name() -> &'static str {
            "Ticks"
        }
    }

    /// Appends its name to a shared log on every update.
    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl System for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn requirement(&self) -> Requirement {
            Requirement::new()
        }

        fn update(&mut self, _: &mut GameObject, _: &mut SystemContext<'_>) -> SystemResult {
            self.log.lock().unwrap().push(self.name);
            Ok(())
        }
    }

    struct Other(Recorder);

    impl System for Other {
        fn name(&self) -> &'static str {
            self.0.name
        }

        fn requirement(&self) -> Requirement {
            Requirement::new()
        }

        fn update(&mut self, object: &mut GameObject, ctx: &mut SystemContext<'_>) -> SystemResult {
            self.0.update(object, ctx)
        }
    }

    fn config(schedule: &[&str]) -> TickConfig {
        TickConfig {
            tick_rate: 1000.0,
            max_ticks: 0,
            schedule: schedule.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn recorders(tick_loop: &mut TickLoop) -> Arc<Mutex<Vec<&'static str>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let resources = tick_loop.resources_mut();
        resources.scene_mut().create_game_object();
        resources.add(Recorder {
            name: "first",
            log: Arc::clone(&log),
        });
        resources.add(Other(Recorder {
            name: "second",
            log: Arc::clone(&log),
        }));
        log
    }

    #[test]
    fn test_tick_advances_counter() {
        let mut tick_loop = TickLoop::new(TickConfig::default());
        assert_eq!(tick_loop.tick_id(), 0);
        tick_loop.tick(1.0 / 60.0);
        assert_eq!(tick_loop.tick_id(), 1);
        tick_loop.tick(1.0 / 60.0);
        assert_eq!(tick_loop.tick_id(), 2);
    }

    #[test]
    fn test_empty_schedule_uses_registration_order() {
        let mut tick_loop = TickLoop::new(config(&[]));
        let log = recorders(&mut tick_loop);
        let reports = tick_loop.tick(0.1);
        assert_eq!(reports.len(), 2);
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_schedule_order_wins() {
        let mut tick_loop = TickLoop::new(config(&["second", "first"]));
        let log = recorders(&mut tick_loop);
        assert!(tick_loop.validate_schedule().is_ok());
        tick_loop.tick(0.1);
        assert_eq!(*log.lock().unwrap(), vec!["second", "first"]);
    }

    #[test]
    fn test_unknown_scheduled_system_is_skipped() {
        let mut tick_loop = TickLoop::new(config(&["missing", "first"]));
        let log = recorders(&mut tick_loop);
        assert!(matches!(
            tick_loop.validate_schedule(),
            Err(ConfigError::Invalid(_))
        ));
        let reports = tick_loop.tick(0.1);
        assert_eq!(reports.len(), 1);
        assert_eq!(*log.lock().unwrap(), vec!["first"]);
    }

    #[test]
    fn test_run_limited_ticks() {
        let mut tick_loop = TickLoop::new(TickConfig {
            max_ticks: 5,
            ..config(&[])
        });
        let scene = tick_loop.resources_mut().scene_mut();
        let entity = scene.create_game_object().add_component(Ticks(0)).entity();
        tick_loop.resources_mut().add(FnSystem::new(
            "count",
            Requirement::of::<(Ticks,)>(),
            |object: &mut GameObject, _: &mut SystemContext<'_>| {
                object.component_mut::<Ticks>()?.0 += 1;
                Ok(())
            },
        ));

        tick_loop.run().unwrap();
        assert_eq!(tick_loop.tick_id(), 5);
        let ticks = tick_loop
            .resources()
            .scene()
            .get(entity)
            .and_then(|o| o.get_component::<Ticks>())
            .map(|t| t.0);
        assert_eq!(ticks, Some(5));
        tick_loop.shutdown();
    }

    #[test]
    fn test_run_rejects_invalid_tick_rate() {
        let mut tick_loop = TickLoop::new(TickConfig {
            tick_rate: 0.0,
            max_ticks: 1,
            schedule: Vec::new(),
        });
        assert!(matches!(tick_loop.run(), Err(ConfigError::Invalid(_))));
        assert_eq!(tick_loop.tick_id(), 0);
    }

    #[test]
    fn test_run_counts_from_current_tick() {
        let mut tick_loop = TickLoop::new(TickConfig {
            max_ticks: 2,
            ..config(&[])
        });
        tick_loop.tick(0.1);
        tick_loop.run().unwrap();
        assert_eq!(tick_loop.tick_id(), 3);
    }
}
