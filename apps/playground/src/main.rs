use anyhow::Context;
use clap::Parser;
use herald::config::{HeraldConfig, load_config};
use herald::logger::Logger;
use herald_playground::{Args, Arena};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut cfg: HeraldConfig =
        load_config(args.config.as_deref()).context("Critical: Configuration is malformed")?;
    if let Some(level) = &args.level {
        cfg.log.level.clone_from(level);
    }

    let _logger = Logger::from_config(&cfg.log)?;

    let arena = Arena::new(herald::install_global(herald::init(&cfg))?.clone());
    let summary = arena.play(&args.match_plan())?;
    tracing::info!(?summary, "Match finished");

    Ok(())
}
