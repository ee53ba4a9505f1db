use crate::listener::ListenerFault;
use std::borrow::Cow;

/// Errors surfaced by [`EventRegistry::broadcast`](crate::EventRegistry::broadcast).
///
/// Registration, removal and clearing never fail.
#[herald_derive::herald_error]
pub enum RegistryError {
    /// A listener reported a fault. Dispatch for that broadcast stopped at this listener.
    #[error("Listener failed{}: {source}", format_context(.context))]
    Listener { source: ListenerFault, context: Option<Cow<'static, str>> },

    /// A dispatch entry could not narrow the event to its listener's type.
    /// This indicates an entry filed under the wrong category.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
