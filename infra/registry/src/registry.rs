use crate::category::{Event, EventCategory};
use crate::error::RegistryError;
use crate::listener::{DispatchEntry, Listener, ListenerId};
use crate::subscription::Subscription;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use serde::Deserialize;
use std::any::{Any, TypeId};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Initial table sizes. Enough for the handful of event shapes a typical host defines.
const DEFAULT_CATEGORY_CAPACITY: usize = 16;
const DEFAULT_LISTENER_CAPACITY: usize = 64;

/// Pre-sizing for the registry tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Expected number of distinct event categories.
    pub category_capacity: usize,
    /// Expected number of registered listeners across all categories.
    pub listener_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            category_capacity: DEFAULT_CATEGORY_CAPACITY,
            listener_capacity: DEFAULT_LISTENER_CAPACITY,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct RegistryState {
    categories: FxHashMap<EventCategory, Vec<DispatchEntry>>,
    listeners: FxHashMap<ListenerId, DispatchEntry>,
    /// Last registration stamp handed out. Survives `clear`.
    registrations: u64,
}

/// Outcome of [`RegistryState::attach`].
#[derive(Debug)]
pub(crate) enum Attached {
    New(u64),
    /// The listener was already registered; the unused entry is handed back so it is
    /// dropped outside the lock.
    Existing { registration: u64, _rejected: DispatchEntry },
}

impl Attached {
    pub(crate) const fn registration(&self) -> u64 {
        match self {
            Self::New(registration) | Self::Existing { registration, .. } => *registration,
        }
    }

    pub(crate) const fn is_new(&self) -> bool {
        matches!(self, Self::New(_))
    }
}

impl RegistryState {
    fn with_config(config: &RegistryConfig) -> Self {
        Self {
            categories: FxHashMap::with_capacity_and_hasher(
                config.category_capacity,
                Default::default(),
            ),
            listeners: FxHashMap::with_capacity_and_hasher(
                config.listener_capacity,
                Default::default(),
            ),
            registrations: 0,
        }
    }

    fn attach(&mut self, entry: DispatchEntry) -> Attached {
        if let Some(existing) = self.listeners.get(&entry.id()) {
            return Attached::Existing { registration: existing.registration(), _rejected: entry };
        }
        self.registrations += 1;
        let entry = entry.stamped(self.registrations);
        self.categories.entry(entry.category()).or_default().push(entry.clone());
        self.listeners.insert(entry.id(), entry);
        Attached::New(self.registrations)
    }

    /// Removes `id` from the category recorded in its own entry.
    pub(crate) fn detach(&mut self, id: ListenerId) -> Option<DispatchEntry> {
        let entry = self.listeners.remove(&id)?;
        let category = entry.category();
        if let Some(entries) = self.categories.get_mut(&category) {
            if let Some(position) = entries.iter().position(|e| e.id() == id) {
                entries.remove(position);
            }
            if entries.is_empty() {
                self.categories.remove(&category);
            }
        }
        Some(entry)
    }

    /// Like [`RegistryState::detach`], but only while `id` is still registered under
    /// `registration`. A later registration of the same listener is left alone.
    pub(crate) fn detach_registration(
        &mut self,
        id: ListenerId,
        registration: u64,
    ) -> Option<DispatchEntry> {
        if self.registration(id) != Some(registration) {
            return None;
        }
        self.detach(id)
    }

    pub(crate) fn registration(&self, id: ListenerId) -> Option<u64> {
        self.listeners.get(&id).map(DispatchEntry::registration)
    }

    pub(crate) fn contains(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(&id)
    }
}

pub(crate) type SharedState = Arc<RwLock<RegistryState>>;

/// A thread-safe registry of listeners keyed by event type.
///
/// Cloning is cheap and yields a handle to the same tables. Prefer constructing one
/// registry per application (or per session) and passing it by reference.
///
/// # Examples
/// ```rust
/// use herald_registry::{EventRegistry, Listener};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// struct PlayerDied {
///     player_id: u32,
/// }
///
/// # fn main() -> Result<(), herald_registry::RegistryError> {
/// let registry = EventRegistry::new();
/// let last = Arc::new(AtomicU32::new(0));
///
/// let seen = Arc::clone(&last);
/// let on_died = Listener::new(move |e: &PlayerDied| seen.store(e.player_id, Ordering::SeqCst));
/// registry.add_listener(&on_died);
///
/// assert_eq!(registry.broadcast(&PlayerDied { player_id: 42 })?, 1);
/// assert_eq!(last.load(Ordering::SeqCst), 42);
///
/// registry.remove_listener(&on_died);
/// assert_eq!(registry.broadcast(&PlayerDied { player_id: 7 })?, 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventRegistry {
    state: SharedState,
}

impl EventRegistry {
    /// Creates a new, empty `EventRegistry`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with tables sized from `config`.
    #[must_use]
    pub fn with_config(config: &RegistryConfig) -> Self {
        Self { state: Arc::new(RwLock::new(RegistryState::with_config(config))) }
    }

    /// Registers `listener` for events of type `E`.
    ///
    /// Returns `false` without side effects if this listener (or a clone of it) is
    /// already registered.
    pub fn add_listener<E: Event>(&self, listener: &Listener<E>) -> bool {
        self.attach(listener).is_new()
    }

    /// Wraps `callback` in a [`Listener`], registers it and returns the handle needed
    /// to remove it later.
    pub fn on<E, F>(&self, callback: F) -> Listener<E>
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let listener = Listener::new(callback);
        self.add_listener(&listener);
        listener
    }

    /// Registers `listener` and ties the registration to the returned guard.
    ///
    /// Dropping the [`Subscription`] removes the listener, including when it had been
    /// registered before this call. The guard only covers the registration it was created
    /// for: once the listener is removed and added again, the old guard no longer touches it.
    pub fn subscribe<E: Event>(&self, listener: &Listener<E>) -> Subscription {
        let attached = self.attach(listener);
        Subscription::new(
            Arc::downgrade(&self.state),
            listener.id(),
            listener.category(),
            attached.registration(),
        )
    }

    /// Unregisters `listener`. Unknown or already removed listeners are ignored.
    ///
    /// Returns `true` if a registration was removed.
    pub fn remove_listener<E: Event>(&self, listener: &Listener<E>) -> bool {
        self.remove_by_id(listener.id())
    }

    /// Unregisters the listener with the given identity from whichever category it was
    /// registered under.
    pub fn remove_by_id(&self, id: ListenerId) -> bool {
        let removed = self.state.write().detach(id);
        // Dropped after the lock is released so listener captures may re-enter on drop.
        match removed {
            Some(entry) => {
                trace!(event = entry.category().name(), listener = %id, "Listener removed");
                true
            },
            None => {
                trace!(listener = %id, "Listener not registered; nothing to remove");
                false
            },
        }
    }

    /// Delivers `event` to every listener registered for `E`, in registration order.
    ///
    /// Listeners see the registrations in place when dispatch begins; changes made by
    /// listeners during the call apply to later broadcasts.
    ///
    /// Returns the number of listeners invoked.
    ///
    /// # Errors
    /// Returns [`RegistryError::Listener`] from the first fallible listener that reports a
    /// fault. Listeners after it are not invoked.
    pub fn broadcast<E: Event>(&self, event: &E) -> Result<usize, RegistryError> {
        self.dispatch(TypeId::of::<E>(), event)
    }

    /// Same as [`EventRegistry::broadcast`] for an event whose concrete type is only known
    /// at runtime.
    ///
    /// # Errors
    /// See [`EventRegistry::broadcast`].
    pub fn broadcast_erased(&self, event: &dyn Event) -> Result<usize, RegistryError> {
        let event: &dyn Any = event;
        self.dispatch(Any::type_id(event), event)
    }

    /// Removes every listener from every category.
    ///
    /// Returns the number of listeners removed.
    pub fn clear(&self) -> usize {
        let (categories, listeners) = {
            let mut state = self.state.write();
            (std::mem::take(&mut state.categories), std::mem::take(&mut state.listeners))
        };
        let removed = listeners.len();
        debug!(categories = categories.len(), listeners = removed, "Registry cleared");
        removed
    }

    /// Returns `true` if a listener with this identity is registered.
    #[must_use]
    pub fn contains(&self, id: ListenerId) -> bool {
        self.state.read().contains(id)
    }

    /// Number of listeners registered for `E`.
    #[must_use]
    pub fn listener_count<E: Event>(&self) -> usize {
        self.state.read().categories.get(&TypeId::of::<E>()).map_or(0, Vec::len)
    }

    /// Number of categories with at least one listener.
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.state.read().categories.len()
    }

    /// Categories with at least one listener, in no particular order.
    #[must_use]
    pub fn categories(&self) -> Vec<EventCategory> {
        self.state.read().categories.keys().copied().collect()
    }

    /// Total number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().listeners.is_empty()
    }

    fn attach<E: Event>(&self, listener: &Listener<E>) -> Attached {
        let entry = DispatchEntry::new(listener);
        let attached = self.state.write().attach(entry);
        if attached.is_new() {
            trace!(event = std::any::type_name::<E>(), listener = %listener.id(), "Listener registered");
        } else {
            trace!(
                event = std::any::type_name::<E>(),
                listener = %listener.id(),
                "Listener already registered; ignoring"
            );
        }
        attached
    }

    fn dispatch(&self, id: TypeId, event: &dyn Any) -> Result<usize, RegistryError> {
        let Some((category, entries)) = self.snapshot(id) else {
            trace!(?id, "Event dropped: no registered listeners");
            return Ok(0);
        };

        for (delivered, entry) in entries.iter().enumerate() {
            if let Err(err) = entry.dispatch(event) {
                warn!(
                    event = category.name(),
                    listener = %entry.id(),
                    delivered,
                    skipped = entries.len() - delivered - 1,
                    kind = err.kind(),
                    error = %err,
                    "Listener failed; aborting dispatch"
                );
                return Err(err);
            }
        }

        trace!(event = category.name(), count = entries.len(), "Event dispatched");
        Ok(entries.len())
    }

    fn snapshot(&self, id: TypeId) -> Option<(EventCategory, Vec<DispatchEntry>)> {
        let state = self.state.read();
        state.categories.get_key_value(&id).map(|(category, entries)| (*category, entries.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Alpha;
    struct Beta;

    fn assert_consistent(registry: &EventRegistry) {
        let state = registry.state.read();
        let filed: usize = state.categories.values().map(Vec::len).sum();
        assert_eq!(filed, state.listeners.len(), "tables disagree on listener count");
        for (category, entries) in &state.categories {
            assert!(!entries.is_empty(), "empty collection left for {category}");
            for entry in entries {
                assert_eq!(entry.category(), *category);
                assert!(state.listeners.contains_key(&entry.id()));
            }
        }
    }

    #[test]
    fn test_tables_stay_consistent_through_churn() {
        let registry = EventRegistry::new();
        let a1 = Listener::new(|_: &Alpha| {});
        let a2 = Listener::new(|_: &Alpha| {});
        let b1 = Listener::new(|_: &Beta| {});

        registry.add_listener(&a1);
        registry.add_listener(&a2);
        registry.add_listener(&a1);
        registry.add_listener(&b1);
        assert_consistent(&registry);

        registry.remove_listener(&a1);
        registry.remove_listener(&b1);
        registry.remove_listener(&b1);
        assert_consistent(&registry);
        assert_eq!(registry.category_count(), 1);

        registry.clear();
        assert_consistent(&registry);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_removal_uses_recorded_category() {
        let registry = EventRegistry::new();
        let beta = Listener::new(|_: &Beta| {});
        registry.add_listener(&beta);

        let detached = registry.state.write().detach(beta.id());
        assert_eq!(detached.map(|e| e.category()), Some(EventCategory::of::<Beta>()));
        assert_consistent(&registry);
        assert_eq!(registry.category_count(), 0);
    }

    #[test]
    fn test_stale_registration_is_not_detached() {
        let registry = EventRegistry::new();
        let alpha = Listener::new(|_: &Alpha| {});

        let first = registry.attach(&alpha).registration();
        assert!(registry.remove_listener(&alpha));
        let second = registry.attach(&alpha).registration();
        assert!(second > first);

        assert!(registry.state.write().detach_registration(alpha.id(), first).is_none());
        assert!(registry.contains(alpha.id()));
        assert!(registry.state.write().detach_registration(alpha.id(), second).is_some());
        assert_consistent(&registry);
    }

    #[test]
    fn test_duplicate_attach_keeps_original_registration() {
        let registry = EventRegistry::new();
        let alpha = Listener::new(|_: &Alpha| {});

        let first = registry.attach(&alpha);
        let again = registry.attach(&alpha);
        assert!(first.is_new());
        assert!(!again.is_new());
        assert_eq!(first.registration(), again.registration());
    }

    #[test]
    fn test_registrations_survive_clear() {
        let registry = EventRegistry::new();
        let alpha = Listener::new(|_: &Alpha| {});

        let before = registry.attach(&alpha).registration();
        registry.clear();
        assert!(registry.attach(&alpha).registration() > before);
    }

    #[test]
    fn test_with_config_starts_empty() {
        let registry = EventRegistry::with_config(&RegistryConfig {
            category_capacity: 2,
            listener_capacity: 4,
        });
        assert!(registry.is_empty());
        assert_eq!(registry.category_count(), 0);
    }
}
