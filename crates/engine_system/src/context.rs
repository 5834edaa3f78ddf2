//! Per-callback execution context handed to systems.

use engine_event::{Event, EventChannel};

use crate::commands::Commands;

/// Frame counter and timing, advanced by the host loop.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    /// Number of frames started so far; 0 before the first one.
    pub frame: u64,
    /// Seconds elapsed since the previous frame.
    pub dt: f64,
}

impl FrameTime {
    /// Start the next frame, `dt` seconds after the previous one.
    pub fn advance(&mut self, dt: f64) {
        self.frame += 1;
        self.dt = dt;
    }
}

/// Everything a system may touch besides the object it is working on.
///
/// The context is rebuilt by the registry for every dispatch pass and lends
/// the shared event channel and the pass's command buffer. Systems receive
/// no other handle to the scene or to each other.
#[derive(Debug)]
pub struct SystemContext<'a> {
    /// The current frame.
    pub time: FrameTime,
    /// The channel shared by all systems of the registry.
    pub events: &'a EventChannel,
    /// Structural changes to apply after the pass.
    pub commands: &'a mut Commands,
}

impl<'a> SystemContext<'a> {
    /// Lend `events` and `commands` to the callbacks of one pass.
    #[must_use]
    pub fn new(time: FrameTime, events: &'a EventChannel, commands: &'a mut Commands) -> Self {
        Self {
            time,
            events,
            commands,
        }
    }

    /// The current frame number.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.time.frame
    }

    /// Seconds since the previous frame.
    #[must_use]
    pub fn dt(&self) -> f64 {
        self.time.dt
    }

    /// Shorthand for `self.events.publish(event)`.
    pub fn publish<E: Event>(&self, event: E) -> usize {
        self.events.publish(event)
    }
}
