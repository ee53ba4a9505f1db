//! # Event Registry
//!
//! A synchronous, type-keyed listener registry.
//!
//! ## Overview
//!
//! Callers register [`Listener`]s for an event type; [`EventRegistry::broadcast`] hands an
//! event to every listener registered for its type, in registration order, on the calling
//! thread.
//!
//! ## Features
//!
//! * **Type-Keyed**: Events are routed by their Rust type ([`EventCategory`]).
//! * **Identity-Based Removal**: Listeners are matched by identity, never by content.
//!   Registering the same listener twice is a no-op.
//! * **Re-entrant**: Broadcast dispatches a snapshot without holding the lock, so listeners
//!   may register, remove or broadcast from inside a callback.
//! * **Thread-Safe**: `FxHashMap` tables behind a single `parking_lot::RwLock`.
//! * **Scoped Registrations**: [`Subscription`] guards unregister on drop.
//!
//! # Example
//!
//! ```rust
//! use herald_registry::{EventRegistry, Listener, RegistryError};
//!
//! struct Tick(u64);
//!
//! fn main() -> Result<(), RegistryError> {
//!     let registry = EventRegistry::new();
//!
//!     let on_tick = Listener::new(|tick: &Tick| assert_eq!(tick.0, 1));
//!     registry.add_listener(&on_tick);
//!     registry.add_listener(&on_tick);
//!
//!     assert_eq!(registry.broadcast(&Tick(1))?, 1);
//!
//!     registry.clear();
//!     assert_eq!(registry.broadcast(&Tick(2))?, 0);
//!     Ok(())
//! }
//! ```

mod category;
mod error;
mod listener;
mod registry;
mod subscription;

pub use category::{Event, EventCategory};
pub use error::{RegistryError, RegistryErrorExt};
pub use listener::{Listener, ListenerFault, ListenerId};
pub use registry::{EventRegistry, RegistryConfig};
pub use subscription::Subscription;
