use clap::Parser;
use herald::{EventRegistry, Listener, RegistryError};
use herald_playground::{Arena, Args, MatchPlan, PlayerDied, Tick};

#[test]
fn default_match_runs_to_a_single_winner() {
    let arena = Arena::new(EventRegistry::new());
    let summary = arena.play(&MatchPlan { players: 4, ticks: 12, warmup: 3 }).unwrap();

    assert_eq!(summary.ticks, 12);
    assert_eq!(summary.warmup_ticks, 3);
    assert_eq!(summary.deaths, 3);
    assert_eq!(summary.survivors, vec![4]);
    assert_eq!(summary.winner, Some(4));
    assert_eq!(summary.kills, vec![(4, 3)]);
    assert_eq!(summary.listeners_cleared, 4);
    assert!(arena.registry().is_empty(), "match teardown clears the registry");
}

#[test]
fn warmup_longer_than_match_is_released_before_teardown() {
    let arena = Arena::new(EventRegistry::new());
    let summary = arena.play(&MatchPlan { players: 2, ticks: 2, warmup: 10 }).unwrap();

    assert_eq!(summary.warmup_ticks, 2);
    assert_eq!(summary.deaths, 0);
    assert_eq!(summary.winner, None);
    assert_eq!(summary.listeners_cleared, 4);
}

#[test]
fn listener_fault_aborts_the_match() {
    let registry = EventRegistry::new();
    registry.add_listener(&Listener::fallible(|tick: &Tick| {
        if tick.0 == 2 { Err("server lost".into()) } else { Ok(()) }
    }));

    let arena = Arena::new(registry.clone());
    let err = arena.play(&MatchPlan { players: 2, ticks: 5, warmup: 0 }).unwrap_err();

    assert!(matches!(err, RegistryError::Listener { .. }));
    assert!(err.to_string().contains("server lost"));
    assert!(!registry.is_empty(), "an aborted match is not torn down");
}

#[test]
fn death_of_unknown_player_is_a_listener_fault() {
    let registry = EventRegistry::new();
    let nested = registry.clone();
    registry.add_listener(&Listener::fallible(move |_: &Tick| {
        nested.broadcast(&PlayerDied { player_id: 99, killer: None })?;
        Ok(())
    }));

    let arena = Arena::new(registry);
    let err = arena.play(&MatchPlan { players: 2, ticks: 1, warmup: 0 }).unwrap_err();
    assert!(err.to_string().contains("player 99 is not alive"));
}

#[test]
fn cli_defaults_produce_the_default_plan() {
    let args = Args::parse_from(["herald-playground"]);
    assert_eq!(args.match_plan(), MatchPlan { players: 4, ticks: 12, warmup: 3 });
    assert!(args.config.is_none());

    let args = Args::parse_from(["herald-playground", "-p", "2", "--warmup", "0", "-l", "trace"]);
    assert_eq!(args.match_plan().players, 2);
    assert_eq!(args.level.as_deref(), Some("trace"));
}
