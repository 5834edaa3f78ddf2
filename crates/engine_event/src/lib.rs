//! # engine_event
//!
//! Cross-system notification for the ECS runtime.
//!
//! Systems never call each other. When one of them changes state another
//! system cares about, it publishes an event on the shared
//! [`EventChannel`]; interested systems subscribe to that event type.
//! Delivery is synchronous, so a subscriber's side effects are visible as
//! soon as `publish` returns.
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use engine_event::EventChannel;
//!
//! struct Moved { x: f32 }
//!
//! let channel = EventChannel::new();
//! let last = Arc::new(Mutex::new(None));
//! let sink = Arc::clone(&last);
//! channel.subscribe(move |e: &Moved| *sink.lock().unwrap() = Some(e.x));
//!
//! channel.publish(Moved { x: 5.0 });
//! assert_eq!(*last.lock().unwrap(), Some(5.0));
//! ```

pub mod channel;
pub mod event;

pub use channel::{EventChannel, SubscriptionId};
pub use event::Event;
