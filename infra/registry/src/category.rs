use std::any::{Any, TypeId};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Marker trait for types that can be broadcast through an [`EventRegistry`](crate::EventRegistry).
///
/// Any type that is `Send + Sync + 'static` automatically implements this trait.
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

/// Routing key for an event shape.
///
/// Identity is the event type's [`TypeId`]; the type name is carried for diagnostics only
/// and does not take part in equality or hashing.
#[derive(Clone, Copy)]
pub struct EventCategory {
    id: TypeId,
    name: &'static str,
}

impl EventCategory {
    /// The category of events of type `E`.
    #[must_use]
    pub fn of<E: Event>() -> Self {
        Self { id: TypeId::of::<E>(), name: std::any::type_name::<E>() }
    }

    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name of the event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if this is the category of `E`.
    #[must_use]
    pub fn is<E: Event>(&self) -> bool {
        self.id == TypeId::of::<E>()
    }
}

impl PartialEq for EventCategory {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventCategory {}

// Must agree with `Borrow<TypeId>`: hash the id alone.
impl Hash for EventCategory {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Borrow<TypeId> for EventCategory {
    fn borrow(&self) -> &TypeId {
        &self.id
    }
}

impl fmt::Debug for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventCategory").field(&self.name).finish()
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
