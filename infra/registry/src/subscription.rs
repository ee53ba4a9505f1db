use crate::category::EventCategory;
use crate::listener::ListenerId;
use crate::registry::RegistryState;
use parking_lot::RwLock;
use std::sync::Weak;
use tracing::trace;

/// Guard that unregisters a listener when dropped.
///
/// Holds only a weak reference: it does not keep the registry alive, and becomes inert
/// once every [`EventRegistry`](crate::EventRegistry) handle is gone.
#[must_use = "Dropping a Subscription immediately unregisters its listener."]
#[derive(Debug)]
pub struct Subscription {
    state: Weak<RwLock<RegistryState>>,
    id: ListenerId,
    category: EventCategory,
    registration: u64,
    armed: bool,
}

impl Subscription {
    pub(crate) fn new(
        state: Weak<RwLock<RegistryState>>,
        id: ListenerId,
        category: EventCategory,
        registration: u64,
    ) -> Self {
        Self { state, id, category, registration, armed: true }
    }

    #[must_use]
    pub const fn id(&self) -> ListenerId {
        self.id
    }

    #[must_use]
    pub const fn category(&self) -> EventCategory {
        self.category
    }

    /// Returns `true` while the registry is alive and still holds the registration this
    /// guard was created for.
    ///
    /// A listener removed by other means (including [`EventRegistry::clear`](crate::EventRegistry::clear))
    /// reports `false`, and keeps doing so if it is registered again later.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state
            .upgrade()
            .is_some_and(|state| state.read().registration(self.id) == Some(self.registration))
    }

    /// Unregisters the listener now.
    ///
    /// Returns `true` if a registration was removed.
    pub fn unsubscribe(mut self) -> bool {
        self.release()
    }

    /// Disarms the guard, leaving the listener registered.
    pub fn detach(mut self) -> ListenerId {
        self.armed = false;
        self.id
    }

    fn release(&mut self) -> bool {
        if !std::mem::replace(&mut self.armed, false) {
            return false;
        }
        let Some(state) = self.state.upgrade() else {
            return false;
        };
        let removed = state.write().detach_registration(self.id, self.registration);
        drop(state);
        if removed.is_some() {
            trace!(event = self.category.name(), listener = %self.id, "Subscription released");
        }
        removed.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
