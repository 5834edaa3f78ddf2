//! The [`Event`] marker trait.

use std::any::Any;

/// A message that can travel over an [`EventChannel`](crate::EventChannel).
///
/// Every `Send + Sync + 'static` type is an event; its Rust type is its
/// routing key. Events are moved into the channel on publish and handlers
/// only ever see them by reference, so nothing a handler does can keep an
/// event alive past the publish call.
pub trait Event: Any + Send + Sync {}

impl<T: Any + Send + Sync> Event for T {}
