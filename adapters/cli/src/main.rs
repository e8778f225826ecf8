#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Path Defence game.

mod autoplay;
mod placement;

use std::{fs, path::PathBuf, thread};

use anyhow::{Context, Result};
use clap::Parser;
use path_defence_core::GameStatus;
use path_defence_simulation::{Simulation, SimulationConfig};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::{autoplay::Autoplay, placement::TowerPlacement};

/// Command-line arguments accepted by the Path Defence binary.
#[derive(Debug, Parser)]
#[command(name = "path-defence")]
#[command(about = "Runs a headless Path Defence game with an autoplaying player")]
struct Args {
    /// TOML file holding the simulation configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the random seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Overrides the starting score.
    #[arg(long)]
    score: Option<u32>,

    /// Overrides the starting money.
    #[arg(long)]
    money: Option<u32>,

    /// Starts in fast-forward mode.
    #[arg(long)]
    fast_forward: bool,

    /// Sleeps for each tick's interval instead of running flat out.
    #[arg(long)]
    realtime: bool,

    /// Stops after this many ticks even if the game is still running.
    #[arg(long, default_value_t = 200_000)]
    max_ticks: u64,

    /// Places a tower before the first tick, as `kind@x,y`. Repeatable.
    #[arg(long = "tower", value_name = "KIND@X,Y")]
    towers: Vec<TowerPlacement>,

    /// Disables the autoplayer's build order.
    #[arg(long)]
    no_autobuild: bool,

    /// Prints the summary as JSON.
    #[arg(long)]
    json: bool,

    /// Log filter directive, overriding `RUST_LOG`.
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,
}

/// Outcome of a run.
#[derive(Debug, Serialize)]
struct Summary {
    status: GameStatus,
    wave: u32,
    score: u32,
    money: u32,
    ticks: u64,
    towers: usize,
}

/// Entry point for the Path Defence command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log.as_deref())?;

    let config = load_config(&args)?;
    tracing::info!(seed = config.seed, "starting game");
    let mut simulation = Simulation::new(&config).context("failed to start the simulation")?;
    simulation.set_fast_forward(args.fast_forward);

    for placement in &args.towers {
        let tower = simulation
            .place_tower(placement.position, placement.kind)
            .with_context(|| format!("failed to place tower `{placement}`"))?;
        tracing::info!(tower = tower.get(), %placement, "placed tower");
    }

    let mut autoplay = Autoplay::new(!args.no_autobuild);
    let mut ticks = 0;
    while ticks < args.max_ticks && !simulation.status().is_over() {
        autoplay.act(&mut simulation);
        let report = simulation.tick();
        ticks = report.tick;
        if args.realtime {
            thread::sleep(simulation.tick_interval());
        }
    }

    let summary = Summary {
        status: simulation.status(),
        wave: simulation.wave(),
        score: simulation.score(),
        money: simulation.money(),
        ticks,
        towers: simulation.towers().into_vec().len(),
    };
    print_summary(&summary, args.json)
}

fn init_tracing(directive: Option<&str>) -> Result<()> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter `{directive}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config at {}", path.display()))?;
            SimulationConfig::from_toml_str(&contents)
                .with_context(|| format!("invalid config at {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(score) = args.score {
        config.starting_score = score;
    }
    if let Some(money) = args.money {
        config.starting_money = money;
    }
    config.validate().context("invalid simulation config")?;
    Ok(config)
}

fn print_summary(summary: &Summary, json: bool) -> Result<()> {
    if json {
        let rendered =
            serde_json::to_string_pretty(summary).context("failed to serialize summary")?;
        println!("{rendered}");
        return Ok(());
    }

    println!("status: {:?}", summary.status);
    println!("wave:   {}", summary.wave);
    println!("score:  {}", summary.score);
    println!("money:  {}", summary.money);
    println!("ticks:  {}", summary.ticks);
    println!("towers: {}", summary.towers);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_defence_core::{Point, TowerKind};

    #[test]
    fn parses_repeated_towers_and_overrides() {
        let args = Args::try_parse_from([
            "path-defence",
            "--seed",
            "7",
            "--money",
            "400",
            "--tower",
            "basic@450,560",
            "--tower",
            "advanced@640,585",
            "--no-autobuild",
            "--json",
        ])
        .expect("arguments parse");

        assert!(args.no_autobuild && args.json && !args.fast_forward);
        assert_eq!(args.max_ticks, 200_000);
        assert_eq!(
            args.towers.iter().map(|tower| (tower.kind, tower.position)).collect::<Vec<_>>(),
            vec![
                (TowerKind::Basic, Point::new(450, 560)),
                (TowerKind::Advanced, Point::new(640, 585)),
            ]
        );

        let config = load_config(&args).expect("config resolves");
        assert_eq!(config.seed, 7);
        assert_eq!(config.starting_money, 400);
        assert_eq!(config.starting_score, 250);
    }

    #[test]
    fn rejects_config_files_with_a_zero_interval() {
        let path = std::env::temp_dir().join(format!(
            "path-defence-zero-interval-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "release_interval_ms = 0\n").expect("write config");
        let config_arg = path.display().to_string();
        let args = Args::try_parse_from(["path-defence", "--config", &config_arg])
            .expect("arguments parse");

        let error = load_config(&args).expect_err("zero interval is rejected");
        let _ = fs::remove_file(&path);
        assert!(format!("{error:#}").contains("release_interval_ms"));
    }

    #[test]
    fn rejects_malformed_towers() {
        assert!(Args::try_parse_from(["path-defence", "--tower", "basic@x,y"]).is_err());
    }
}
