//! Scripted match driven entirely through an [`EventRegistry`].
//!
//! The arena is the host: it owns the registry for one match, wires listeners when the
//! match starts, and clears the registry when the match ends.

use clap::Parser;
use herald::{EventRegistry, Listener, ListenerFault, RegistryError};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Deaths are scripted every this many ticks.
const KILL_INTERVAL: u64 = 3;

#[derive(Debug, Parser)]
#[command(name = "herald-playground")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Runs a scripted match against an event registry")]
pub struct Args {
    /// Config file; defaults to `herald.*` in the working directory when present.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Overrides `log.level` from the config.
    #[arg(short, long)]
    pub level: Option<String>,
    /// Players joining the match.
    #[arg(short, long, default_value_t = 4)]
    pub players: u64,
    /// Ticks to simulate.
    #[arg(short, long, default_value_t = 12)]
    pub ticks: u64,
    /// Ticks observed by the warmup listener before it unsubscribes.
    #[arg(long, default_value_t = 3)]
    pub warmup: u64,
}

impl Args {
    #[must_use]
    pub const fn match_plan(&self) -> MatchPlan {
        MatchPlan { players: self.players, ticks: self.ticks, warmup: self.warmup }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPlan {
    pub players: u64,
    pub ticks: u64,
    pub warmup: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerJoined {
    pub player_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerDied {
    pub player_id: u64,
    pub killer: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchEnded {
    pub winner: Option<u64>,
}

#[derive(Debug, Default)]
struct Scoreboard {
    alive: BTreeSet<u64>,
    kills: BTreeMap<u64, u32>,
    deaths: u64,
    ticks: u64,
    warmup_ticks: u64,
    winner: Option<u64>,
}

impl Scoreboard {
    fn join(&mut self, player_id: u64) {
        self.alive.insert(player_id);
    }

    fn record_death(&mut self, event: &PlayerDied) -> Result<(), ListenerFault> {
        if !self.alive.remove(&event.player_id) {
            return Err(format!("player {} is not alive", event.player_id).into());
        }
        self.deaths += 1;
        if let Some(killer) = event.killer {
            *self.kills.entry(killer).or_default() += 1;
        }
        Ok(())
    }

    /// Lowest living id dies to the highest living id.
    fn next_kill(&self) -> Option<PlayerDied> {
        if self.alive.len() < 2 {
            return None;
        }
        let victim = *self.alive.first()?;
        let killer = self.alive.last().copied();
        Some(PlayerDied { player_id: victim, killer })
    }

    fn survivor(&self) -> Option<u64> {
        if self.alive.len() == 1 { self.alive.first().copied() } else { None }
    }
}

/// Outcome of one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub ticks: u64,
    pub warmup_ticks: u64,
    pub deaths: u64,
    pub survivors: Vec<u64>,
    pub winner: Option<u64>,
    pub kills: Vec<(u64, u32)>,
    /// Listeners still registered when the match was torn down.
    pub listeners_cleared: usize,
}

/// Host for a single match.
#[derive(Debug)]
pub struct Arena {
    registry: EventRegistry,
    board: Arc<Mutex<Scoreboard>>,
}

impl Arena {
    #[must_use]
    pub fn new(registry: EventRegistry) -> Self {
        Self { registry, board: Arc::default() }
    }

    #[must_use]
    pub const fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    /// Plays `plan` to completion and clears the registry.
    ///
    /// # Errors
    /// Returns the first listener fault raised during the match. The registry is left as is
    /// so the caller can inspect it.
    pub fn play(&self, plan: &MatchPlan) -> Result<Summary, RegistryError> {
        let on_joined = self.wire();

        let board = Arc::clone(&self.board);
        let mut warmup = Some(self.registry.subscribe(&Listener::new(move |_: &Tick| {
            board.lock().warmup_ticks += 1;
        })));

        for player_id in 1..=plan.players {
            self.registry.broadcast(&PlayerJoined { player_id })?;
        }
        self.registry.remove_listener(&on_joined);
        info!(players = plan.players, "Match started; joining closed");

        for tick in 1..=plan.ticks {
            if tick > plan.warmup
                && let Some(subscription) = warmup.take()
            {
                subscription.unsubscribe();
                debug!(tick, "Warmup over");
            }

            self.registry.broadcast(&Tick(tick))?;

            if tick % KILL_INTERVAL == 0 {
                let kill = self.board.lock().next_kill();
                if let Some(event) = kill {
                    self.registry.broadcast(&event)?;
                }
            }
        }
        drop(warmup);

        let winner = self.board.lock().survivor();
        self.registry.broadcast(&MatchEnded { winner })?;

        let listeners_cleared = self.registry.clear();
        info!(listeners_cleared, "Match torn down");

        let board = self.board.lock();
        Ok(Summary {
            ticks: board.ticks,
            warmup_ticks: board.warmup_ticks,
            deaths: board.deaths,
            survivors: board.alive.iter().copied().collect(),
            winner: board.winner,
            kills: board.kills.iter().map(|(k, v)| (*k, *v)).collect(),
            listeners_cleared,
        })
    }

    /// Registers the match listeners; returns the join listener so joining can be closed.
    fn wire(&self) -> Listener<PlayerJoined> {
        let board = Arc::clone(&self.board);
        let on_joined = self.registry.on(move |e: &PlayerJoined| board.lock().join(e.player_id));

        let board = Arc::clone(&self.board);
        self.registry.add_listener(&Listener::fallible(move |e: &PlayerDied| {
            board.lock().record_death(e)
        }));
        self.registry.on(|e: &PlayerDied| {
            info!(player = e.player_id, killer = ?e.killer, "Player died");
        });

        let board = Arc::clone(&self.board);
        self.registry.on(move |_: &Tick| board.lock().ticks += 1);

        let board = Arc::clone(&self.board);
        self.registry.on(move |e: &MatchEnded| board.lock().winner = e.winner);

        on_joined
    }
}
