#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick controller that drives the Path Defence world and its systems.

mod config;
mod random;

use std::time::Duration;

use path_defence_core::{
    Command, Event, GameStatus, MonsterSnapshot, MonsterView, PlacementError, Point,
    RandomSource, SpeedMode, TowerId, TowerKind, TowerSnapshot, TowerTarget, TowerView,
    WaveRequestError,
};
use path_defence_system_movement::Movement;
use path_defence_system_spawning::Spawning;
use path_defence_system_tower_combat::TowerCombat;
use path_defence_system_tower_targeting::TowerTargeting;
use path_defence_world::{self as world, query, Path, World};
use serde::{Deserialize, Serialize};

pub use config::{ConfigError, SimulationConfig};
pub use random::SeededRandom;

/// State captured at the end of a single [`Simulation::tick`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickReport {
    /// Number of ticks processed so far.
    pub tick: u64,
    /// Latest wave processed.
    pub wave: u32,
    /// Active monsters after the casualty sweep, highest priority first.
    pub monsters: Vec<MonsterSnapshot>,
    /// Towers on the field in placement order.
    pub towers: Vec<TowerSnapshot>,
    /// Score after the tick.
    pub score: u32,
    /// Money after the tick.
    pub money: u32,
    /// Change in score applied by this tick.
    pub score_delta: i64,
    /// Change in money applied by this tick.
    pub money_delta: i64,
    /// Game status after the tick.
    pub status: GameStatus,
}

/// A running game: the world plus every system that acts on it.
#[derive(Debug)]
pub struct Simulation<R: RandomSource = SeededRandom> {
    world: World,
    spawning: Spawning,
    movement: Movement,
    targeting: TowerTargeting,
    combat: TowerCombat,
    rng: R,
    events: Vec<Event>,
    commands: Vec<Command>,
    targets: Vec<TowerTarget>,
}

impl Simulation<SeededRandom> {
    /// Creates a simulation seeded from the configuration.
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        Self::with_random(config, SeededRandom::new(config.seed))
    }
}

impl<R: RandomSource> Simulation<R> {
    /// Creates a simulation drawing every random decision from `rng`.
    ///
    /// Fails when the configuration holds a zero interval, since neither the
    /// clock nor the release timer could ever advance.
    pub fn with_random(config: &SimulationConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            world: World::with_config(config.world_config()),
            spawning: Spawning::new(config.spawning_config()),
            movement: Movement::default(),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            rng,
            events: Vec::new(),
            commands: Vec::new(),
            targets: Vec::new(),
        })
    }

    /// Places a tower centered on `position`, spending its cost.
    pub fn place_tower(
        &mut self,
        position: Point,
        kind: TowerKind,
    ) -> Result<TowerId, PlacementError> {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::PlaceTower { kind, position },
            &mut events,
        );
        events
            .into_iter()
            .find_map(|event| match event {
                Event::TowerPlaced { tower, .. } => Some(Ok(tower)),
                Event::TowerPlacementRejected { reason, .. } => Some(Err(reason)),
                _ => None,
            })
            .unwrap_or(Err(PlacementError::GameOver))
    }

    /// Requests the next wave, returning the wave number that will be
    /// released on the next tick.
    pub fn request_wave(&mut self) -> Result<u32, WaveRequestError> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::RequestWave, &mut events);
        events
            .into_iter()
            .find_map(|event| match event {
                Event::WaveRequested { wave } => Some(Ok(wave)),
                Event::WaveRequestRejected { reason } => Some(Err(reason)),
                _ => None,
            })
            .unwrap_or(Err(WaveRequestError::GameOver))
    }

    /// Switches between normal and fast-forward speed from the next tick on.
    pub fn set_fast_forward(&mut self, enabled: bool) {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::SetFastForward { enabled }, &mut events);
    }

    /// Runs one full simulation step.
    ///
    /// Order: clock and wave bookkeeping, releases, movement, reprioritising,
    /// targeting and combat, then the casualty sweep. Once the game is over
    /// the world is left untouched.
    pub fn tick(&mut self) -> TickReport {
        self.events.clear();
        if query::status(&self.world).is_over() {
            return self.report(0, 0);
        }

        self.apply(Command::Tick);
        let tick_events = self.events.clone();

        self.commands.clear();
        self.spawning.handle(&tick_events, &mut self.rng, &mut self.commands);
        self.flush_commands();

        let monsters = query::monster_view(&self.world);
        self.movement
            .handle(&tick_events, &monsters, &mut self.rng, &mut self.commands);
        self.flush_commands();

        self.apply(Command::PrioritizeMonsters);

        let monsters = query::monster_view(&self.world);
        self.targeting.handle(
            &query::tower_view(&self.world),
            &monsters,
            &mut self.targets,
        );
        self.combat.handle(&self.targets, &monsters, &mut self.commands);
        self.flush_commands();

        let sweep_start = self.events.len();
        self.apply(Command::ResolveCasualties);

        let mut score_delta = 0;
        let mut money_delta = 0;
        for event in &self.events[sweep_start..] {
            match event {
                Event::LedgerSettled {
                    score_delta: score,
                    money_delta: money,
                    ..
                } => {
                    score_delta = *score;
                    money_delta = *money;
                }
                Event::GameStatusChanged { status } => {
                    tracing::info!(?status, "game finished");
                }
                _ => {}
            }
        }

        for event in &tick_events {
            if let Event::SpeedModeChanged { mode } = event {
                tracing::info!(
                    ?mode,
                    interval = ?query::tick_interval(&self.world),
                    "speed mode changed"
                );
            }
        }

        self.report(score_delta, money_delta)
    }

    /// Events emitted by the most recent [`Simulation::tick`].
    #[must_use]
    pub fn last_events(&self) -> &[Event] {
        &self.events
    }

    /// Current score.
    #[must_use]
    pub fn score(&self) -> u32 {
        query::score(&self.world)
    }

    /// Current money.
    #[must_use]
    pub fn money(&self) -> u32 {
        query::money(&self.world)
    }

    /// Latest wave processed.
    #[must_use]
    pub fn wave(&self) -> u32 {
        query::wave(&self.world)
    }

    /// Current game status.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        query::status(&self.world)
    }

    /// Simulated time covered by a tick in the active speed mode.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        query::tick_interval(&self.world)
    }

    /// Whether the active speed mode is fast-forward.
    #[must_use]
    pub fn is_fast_forward(&self) -> bool {
        query::speed_mode(&self.world) == SpeedMode::FastForward
    }

    /// Active monsters in priority order.
    #[must_use]
    pub fn monsters(&self) -> MonsterView {
        query::monster_view(&self.world)
    }

    /// Placed towers in placement order.
    #[must_use]
    pub fn towers(&self) -> TowerView {
        query::tower_view(&self.world)
    }

    /// Route monsters follow.
    #[must_use]
    pub fn path(&self) -> &Path {
        query::path(&self.world)
    }

    /// Read-only access to the underlying world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    fn apply(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }

    fn flush_commands(&mut self) {
        let commands = std::mem::take(&mut self.commands);
        for command in &commands {
            self.apply(*command);
        }
        self.commands = commands;
        self.commands.clear();
    }

    fn report(&self, score_delta: i64, money_delta: i64) -> TickReport {
        TickReport {
            tick: query::tick_index(&self.world),
            wave: query::wave(&self.world),
            monsters: query::monster_view(&self.world).into_vec(),
            towers: query::tower_view(&self.world).into_vec(),
            score: query::score(&self.world),
            money: query::money(&self.world),
            score_delta,
            money_delta,
            status: query::status(&self.world),
        }
    }
}
