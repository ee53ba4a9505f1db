#![allow(dead_code, unreachable_pub)]

use herald_registry::Listener;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerDied {
    pub player_id: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tick(pub u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreChanged {
    pub player_id: u64,
    pub score: i64,
}

/// Shared log of listener invocations, in call order.
#[derive(Clone, Debug, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.lock().iter().filter(|e| e.as_str() == entry).count()
    }

    /// A listener that records `label` every time it is invoked.
    pub fn listener<E: Send + Sync + 'static>(&self, label: &'static str) -> Listener<E> {
        let journal = self.clone();
        Listener::new(move |_: &E| journal.record(label))
    }
}
