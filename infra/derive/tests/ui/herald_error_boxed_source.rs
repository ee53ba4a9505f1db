use herald_derive::herald_error;
use std::borrow::Cow;

type Fault = Box<dyn std::error::Error + Send + Sync + 'static>;

#[herald_error]
pub enum DispatchError {
    #[error("Listener failed{}: {source}", format_context(.context))]
    Listener { source: Fault, context: Option<Cow<'static, str>> },
}

fn fail() -> Result<(), Fault> {
    Err("listener exploded".into())
}

fn main() {
    let err = fail().context("PlayerDied").unwrap_err();
    assert_eq!(err.kind(), "Listener");
    assert_eq!(err.to_string(), "Listener failed (PlayerDied): listener exploded");
    assert!(std::error::Error::source(&err).is_some());
}
