//! Facade crate for Herald.
//! Re-exports the registry and wires configuration at the application's composition boundary.
//! Keep this crate thin: libraries should depend on `herald-registry` and take an
//! `&EventRegistry`; only binaries reach for [`global`].
//!
//! ## Usage
//! - Load a [`config::HeraldConfig`] with [`config::load_config`].
//! - Build the application's registry with [`init`], or [`install_global`] it when a process
//!   default is genuinely needed.

pub mod config;
mod error;

pub use error::{HeraldError, HeraldErrorExt};
pub use herald_logger as logger;
pub use herald_registry as registry;
pub use herald_registry::{
    Event, EventCategory, EventRegistry, Listener, ListenerFault, ListenerId, RegistryError,
    Subscription,
};

use crate::config::HeraldConfig;
use std::sync::OnceLock;
use tracing::debug;

static GLOBAL: OnceLock<EventRegistry> = OnceLock::new();

/// Builds an empty registry sized from `config`.
#[must_use]
pub fn init(config: &HeraldConfig) -> EventRegistry {
    debug!(
        category_capacity = config.registry.category_capacity,
        listener_capacity = config.registry.listener_capacity,
        "Creating event registry"
    );
    EventRegistry::with_config(&config.registry)
}

/// The process default registry, created empty on first use.
///
/// Handles returned here share tables with the one passed to [`install_global`], if any.
pub fn global() -> &'static EventRegistry {
    GLOBAL.get_or_init(EventRegistry::new)
}

/// Makes `registry` the process default.
///
/// # Errors
/// Returns [`HeraldError::GlobalAlreadySet`] if [`global`] or [`install_global`] ran before.
pub fn install_global(registry: EventRegistry) -> Result<&'static EventRegistry, HeraldError> {
    GLOBAL.set(registry).map_err(|_| HeraldError::GlobalAlreadySet {
        message: "the default registry is already initialized".into(),
        context: None,
    })?;
    Ok(global())
}
