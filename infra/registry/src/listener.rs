use crate::category::{Event, EventCategory};
use crate::error::{RegistryError, RegistryErrorExt};
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Fault reported by a fallible listener.
pub type ListenerFault = Box<dyn std::error::Error + Send + Sync + 'static>;

type Callback<E> = dyn Fn(&E) -> Result<(), ListenerFault> + Send + Sync;
type ErasedCallback = dyn Fn(&dyn Any) -> Result<(), RegistryError> + Send + Sync;

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Listener`].
///
/// Minted once per [`Listener::new`] / [`Listener::fallible`] call and shared by every clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// A callback for events of type `E`.
///
/// Two listeners are the same only if one is a clone of the other; wrapping the same
/// function twice yields two distinct listeners.
///
/// # Examples
/// ```rust
/// use herald_registry::Listener;
///
/// struct Tick(u64);
///
/// let a = Listener::new(|tick: &Tick| assert!(tick.0 > 0));
/// let b = a.clone();
/// let c = Listener::new(|tick: &Tick| assert!(tick.0 > 0));
///
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// ```
pub struct Listener<E: Event> {
    id: ListenerId,
    callback: Arc<Callback<E>>,
}

impl<E: Event> Listener<E> {
    /// Wraps an infallible callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        Self::fallible(move |event: &E| {
            callback(event);
            Ok(())
        })
    }

    /// Wraps a callback that may report a fault.
    ///
    /// A fault aborts the broadcast that triggered it and is returned to the broadcaster.
    pub fn fallible<F>(callback: F) -> Self
    where
        F: Fn(&E) -> Result<(), ListenerFault> + Send + Sync + 'static,
    {
        Self { id: ListenerId::next(), callback: Arc::new(callback) }
    }

    #[must_use]
    pub const fn id(&self) -> ListenerId {
        self.id
    }

    #[must_use]
    pub fn category(&self) -> EventCategory {
        EventCategory::of::<E>()
    }

    /// Invokes the callback directly, bypassing any registry.
    ///
    /// # Errors
    /// Returns the fault reported by a fallible callback.
    pub fn invoke(&self, event: &E) -> Result<(), ListenerFault> {
        (self.callback)(event)
    }
}

impl<E: Event> Clone for Listener<E> {
    fn clone(&self) -> Self {
        Self { id: self.id, callback: Arc::clone(&self.callback) }
    }
}

impl<E: Event> PartialEq for Listener<E> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<E: Event> Eq for Listener<E> {}

impl<E: Event> Hash for Listener<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<E: Event> fmt::Debug for Listener<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("event", &std::any::type_name::<E>())
            .finish_non_exhaustive()
    }
}

/// Type-erased binding of a listener to uniform invocation.
#[derive(Clone)]
pub(crate) struct DispatchEntry {
    id: ListenerId,
    category: EventCategory,
    /// Stamp assigned when the entry is attached to a registry; zero until then.
    registration: u64,
    invoke: Arc<ErasedCallback>,
}

impl DispatchEntry {
    pub(crate) fn new<E: Event>(listener: &Listener<E>) -> Self {
        let callback = Arc::clone(&listener.callback);
        let category = EventCategory::of::<E>();
        let invoke = move |event: &dyn Any| -> Result<(), RegistryError> {
            let event = event.downcast_ref::<E>().ok_or_else(|| RegistryError::TypeMismatch {
                message: category.name().into(),
                context: Some("Unexpected event type".into()),
            })?;
            callback(event).context(category.name())
        };
        Self { id: listener.id, category, registration: 0, invoke: Arc::new(invoke) }
    }

    pub(crate) fn stamped(mut self, registration: u64) -> Self {
        self.registration = registration;
        self
    }

    pub(crate) const fn id(&self) -> ListenerId {
        self.id
    }

    pub(crate) const fn category(&self) -> EventCategory {
        self.category
    }

    pub(crate) const fn registration(&self) -> u64 {
        self.registration
    }

    pub(crate) fn dispatch(&self, event: &dyn Any) -> Result<(), RegistryError> {
        (self.invoke)(event)
    }
}

impl fmt::Debug for DispatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchEntry")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("registration", &self.registration)
            .finish_non_exhaustive()
    }
}
