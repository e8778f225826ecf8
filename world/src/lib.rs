#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Path Defence.

mod ledger;
mod monsters;
mod path;
mod towers;

use std::time::Duration;

use path_defence_core::{
    Command, Event, GameStatus, MonsterId, MonsterKind, PlacementError, Point, SpeedMode, TowerId,
    TowerKind, WaveRequestError, MAX_WAVES, STARTING_MONEY, STARTING_SCORE,
};

pub use ledger::{Ledger, Settlement};
pub use monsters::{Advance, Monster};
pub use path::{Path, PathError};
pub use towers::Tower;

use towers::TowerRegistry;

/// Interval between simulation ticks at normal speed.
pub const NORMAL_TICK_INTERVAL: Duration = Duration::from_millis(30);

/// Interval between simulation ticks while fast-forwarding.
pub const FAST_FORWARD_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Opening balances and clock intervals for a new world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Score the player starts with.
    pub starting_score: u32,
    /// Money the player starts with.
    pub starting_money: u32,
    /// Simulated time covered by a tick at normal speed.
    pub normal_interval: Duration,
    /// Simulated time covered by a tick while fast-forwarding.
    pub fast_forward_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            starting_score: STARTING_SCORE,
            starting_money: STARTING_MONEY,
            normal_interval: NORMAL_TICK_INTERVAL,
            fast_forward_interval: FAST_FORWARD_TICK_INTERVAL,
        }
    }
}

/// Represents the authoritative Path Defence world state.
#[derive(Debug)]
pub struct World {
    path: Path,
    monsters: Vec<Monster>,
    towers: TowerRegistry,
    ledger: Ledger,
    next_monster_id: u32,
    wave: u32,
    requested_wave: u32,
    releasing: bool,
    speed: SpeedMode,
    requested_speed: SpeedMode,
    normal_interval: Duration,
    fast_forward_interval: Duration,
    status: GameStatus,
    tick_index: u64,
}

impl World {
    /// Creates a new world with the default opening balances and intervals.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a new world from the provided configuration.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            path: Path::zigzag(),
            monsters: Vec::new(),
            towers: TowerRegistry::new(),
            ledger: Ledger::new(config.starting_score, config.starting_money),
            next_monster_id: 0,
            wave: 0,
            requested_wave: 0,
            releasing: false,
            speed: SpeedMode::Normal,
            requested_speed: SpeedMode::Normal,
            normal_interval: config.normal_interval,
            fast_forward_interval: config.fast_forward_interval,
            status: GameStatus::Playing,
            tick_index: 0,
        }
    }

    fn interval(&self) -> Duration {
        match self.speed {
            SpeedMode::Normal => self.normal_interval,
            SpeedMode::FastForward => self.fast_forward_interval,
        }
    }

    fn place_tower(&mut self, kind: TowerKind, position: Point, out_events: &mut Vec<Event>) {
        let tower = self.towers.prepare(kind, position);
        let placement = if self.status.is_over() {
            Err(PlacementError::GameOver)
        } else {
            tower
                .can_place_on_map(self.towers.iter())
                .and_then(|()| self.ledger.spend(tower.stats().cost))
        };

        match placement {
            Ok(()) => {
                let footprint = tower.footprint();
                let id = self.towers.commit(tower);
                tracing::debug!(tower = id.get(), ?kind, ?position, "tower placed");
                out_events.push(Event::TowerPlaced {
                    tower: id,
                    kind,
                    footprint,
                });
            }
            Err(reason) => {
                tracing::debug!(?kind, ?position, %reason, "tower placement rejected");
                out_events.push(Event::TowerPlacementRejected {
                    kind,
                    position,
                    reason,
                });
            }
        }
    }

    fn request_wave(&mut self, out_events: &mut Vec<Event>) {
        let outcome = if self.status.is_over() || self.ledger.score() == 0 {
            Err(WaveRequestError::GameOver)
        } else if self.requested_wave > MAX_WAVES {
            Err(WaveRequestError::MaxWavesReached)
        } else if self.releasing || self.requested_wave > self.wave {
            Err(WaveRequestError::AlreadyReleasing)
        } else {
            self.requested_wave += 1;
            Ok(self.requested_wave)
        };

        match outcome {
            Ok(wave) => out_events.push(Event::WaveRequested { wave }),
            Err(reason) => {
                tracing::debug!(%reason, "wave request rejected");
                out_events.push(Event::WaveRequestRejected { reason });
            }
        }
    }

    fn open_tick(&mut self, out_events: &mut Vec<Event>) {
        if self.status.is_over() {
            return;
        }

        self.tick_index = self.tick_index.saturating_add(1);

        if self.requested_speed != self.speed {
            self.speed = self.requested_speed;
            out_events.push(Event::SpeedModeChanged { mode: self.speed });
        }

        if self.requested_wave > self.wave {
            self.wave += 1;
            if self.wave <= MAX_WAVES {
                self.releasing = true;
                tracing::info!(wave = self.wave, "wave started");
                out_events.push(Event::WaveStarted { wave: self.wave });
            } else {
                tracing::info!(wave = self.wave, "final wave requested");
                out_events.push(Event::FinalWaveRequested { wave: self.wave });
            }
        }

        for monster in &mut self.monsters {
            monster.clear_attack_flag();
        }

        out_events.push(Event::TimeAdvanced {
            dt: self.interval(),
        });
    }

    fn spawn_monster(&mut self, kind: MonsterKind, out_events: &mut Vec<Event>) {
        if self.status.is_over() {
            return;
        }

        let id = MonsterId::new(self.next_monster_id);
        self.next_monster_id = self.next_monster_id.saturating_add(1);
        let monster = Monster::new(id, kind, &self.path);
        out_events.push(Event::MonsterSpawned {
            monster: id,
            kind,
            position: monster.position(),
        });
        self.monsters.push(monster);
    }

    fn advance_monster(&mut self, monster_id: MonsterId, out_events: &mut Vec<Event>) {
        let Some(monster) = self
            .monsters
            .iter_mut()
            .find(|monster| monster.id() == monster_id)
        else {
            return;
        };

        let from = monster.position();
        match monster.advance(&self.path) {
            Advance::Stationary => {}
            Advance::Moved | Advance::EnteredSegment(_) => {
                out_events.push(Event::MonsterAdvanced {
                    monster: monster_id,
                    from,
                    to: monster.position(),
                });
            }
            Advance::ReachedEnd => {
                out_events.push(Event::MonsterAdvanced {
                    monster: monster_id,
                    from,
                    to: monster.position(),
                });
                out_events.push(Event::MonsterReachedEnd {
                    monster: monster_id,
                });
            }
        }
    }

    fn fire_tower(
        &mut self,
        tower_id: TowerId,
        monster_id: MonsterId,
        out_events: &mut Vec<Event>,
    ) {
        let Some(tower) = self.towers.get(tower_id) else {
            return;
        };
        let Some(monster) = self
            .monsters
            .iter_mut()
            .find(|monster| monster.id() == monster_id)
        else {
            return;
        };

        let damage = tower.fire(monster);
        out_events.push(Event::MonsterHit {
            tower: tower_id,
            monster: monster_id,
            damage,
        });
    }

    fn resolve_casualties(&mut self, out_events: &mut Vec<Event>) {
        if self.status.is_over() {
            return;
        }

        let mut score_loss: u32 = 0;
        let mut money_earned: u32 = 0;
        self.monsters.retain(|monster| {
            let stats = monster.kind().stats();
            if monster.reached_end() {
                score_loss = score_loss.saturating_add(stats.score_loss);
                tracing::debug!(monster = monster.id().get(), "monster escaped");
                out_events.push(Event::MonsterEscaped {
                    monster: monster.id(),
                    score_loss: stats.score_loss,
                });
                false
            } else if monster.is_dead() {
                money_earned = money_earned.saturating_add(stats.money_value);
                out_events.push(Event::MonsterKilled {
                    monster: monster.id(),
                    bounty: stats.money_value,
                });
                false
            } else {
                true
            }
        });

        let settlement = self.ledger.settle(score_loss, money_earned);
        out_events.push(Event::LedgerSettled {
            score: self.ledger.score(),
            money: self.ledger.money(),
            score_delta: settlement.score_delta,
            money_delta: settlement.money_delta,
        });

        let status = self.evaluate_status();
        if status != self.status {
            self.status = status;
            tracing::info!(
                ?status,
                wave = self.wave,
                score = self.ledger.score(),
                "game status changed"
            );
            out_events.push(Event::GameStatusChanged { status });
        }
    }

    fn evaluate_status(&self) -> GameStatus {
        if !self.monsters.is_empty() || self.releasing || self.requested_wave > self.wave {
            return GameStatus::Playing;
        }

        if self.ledger.score() == 0 {
            GameStatus::Lost
        } else if self.wave > MAX_WAVES {
            GameStatus::Won
        } else {
            GameStatus::Playing
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceTower { kind, position } => world.place_tower(kind, position, out_events),
        Command::RequestWave => world.request_wave(out_events),
        Command::SetFastForward { enabled } => {
            world.requested_speed = if enabled {
                SpeedMode::FastForward
            } else {
                SpeedMode::Normal
            };
        }
        Command::Tick => world.open_tick(out_events),
        Command::SpawnMonster { kind } => world.spawn_monster(kind, out_events),
        Command::CompleteWaveRelease => {
            if world.releasing {
                world.releasing = false;
                out_events.push(Event::WaveReleaseCompleted { wave: world.wave });
            }
        }
        Command::AdvanceMonster { monster } => world.advance_monster(monster, out_events),
        Command::PrioritizeMonsters => world.monsters.sort_by(Monster::cmp_priority),
        Command::FireTower { tower, monster } => world.fire_tower(tower, monster, out_events),
        Command::ResolveCasualties => world.resolve_casualties(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{Ledger, Monster, Path, Tower, World};
    use path_defence_core::{GameStatus, MonsterView, SpeedMode, TowerView};

    /// Provides read-only access to the path monsters follow.
    #[must_use]
    pub fn path(world: &World) -> &Path {
        &world.path
    }

    /// Active monsters in their current stored order.
    #[must_use]
    pub fn monsters(world: &World) -> &[Monster] {
        &world.monsters
    }

    /// Captures a read-only view of the active monsters in priority order.
    #[must_use]
    pub fn monster_view(world: &World) -> MonsterView {
        MonsterView::from_snapshots(world.monsters.iter().map(Monster::snapshot).collect())
    }

    /// Placed towers in placement order.
    pub fn towers(world: &World) -> impl Iterator<Item = &Tower> {
        world.towers.iter()
    }

    /// Number of placed towers.
    #[must_use]
    pub fn tower_count(world: &World) -> usize {
        world.towers.len()
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(Tower::snapshot).collect())
    }

    /// Score and money balances.
    #[must_use]
    pub fn ledger(world: &World) -> &Ledger {
        &world.ledger
    }

    /// Current score.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.ledger.score()
    }

    /// Current money.
    #[must_use]
    pub fn money(world: &World) -> u32 {
        world.ledger.money()
    }

    /// Latest wave processed by a tick.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.wave
    }

    /// Latest wave accepted from the player, possibly not yet processed.
    #[must_use]
    pub fn requested_wave(world: &World) -> u32 {
        world.requested_wave
    }

    /// Whether a wave is still releasing monsters.
    #[must_use]
    pub fn is_releasing(world: &World) -> bool {
        world.releasing
    }

    /// Current game status.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Speed mode applied by the latest tick.
    #[must_use]
    pub fn speed_mode(world: &World) -> SpeedMode {
        world.speed
    }

    /// Simulated time covered by a tick in the active speed mode.
    #[must_use]
    pub fn tick_interval(world: &World) -> Duration {
        world.interval()
    }

    /// Number of ticks opened so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(world: &mut World, kind: MonsterKind) -> MonsterId {
        let mut events = Vec::new();
        apply(world, Command::SpawnMonster { kind }, &mut events);
        match events.as_slice() {
            [Event::MonsterSpawned { monster, .. }] => *monster,
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[test]
    fn tick_swaps_speed_mode_only_when_requested() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::SetFastForward { enabled: true }, &mut events);
        assert!(events.is_empty());
        assert_eq!(query::tick_interval(&world), NORMAL_TICK_INTERVAL);

        apply(&mut world, Command::Tick, &mut events);
        assert_eq!(
            events,
            vec![
                Event::SpeedModeChanged {
                    mode: SpeedMode::FastForward
                },
                Event::TimeAdvanced {
                    dt: FAST_FORWARD_TICK_INTERVAL
                },
            ]
        );

        events.clear();
        apply(&mut world, Command::Tick, &mut events);
        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                dt: FAST_FORWARD_TICK_INTERVAL
            }]
        );
    }

    #[test]
    fn tick_clears_attack_flags() {
        let mut world = World::new();
        let monster = spawn(&mut world, MonsterKind::Regular);
        world.monsters[0].take_hit(1);
        assert!(world.monsters[0].is_being_attacked());

        let mut events = Vec::new();
        apply(&mut world, Command::Tick, &mut events);
        assert_eq!(world.monsters[0].id(), monster);
        assert!(!world.monsters[0].is_being_attacked());
    }

    #[test]
    fn prioritize_sorts_stably_by_distance() {
        let mut world = World::new();
        let first = spawn(&mut world, MonsterKind::Regular);
        let second = spawn(&mut world, MonsterKind::Regular);
        let third = spawn(&mut world, MonsterKind::Regular);
        let mut events = Vec::new();
        apply(&mut world, Command::AdvanceMonster { monster: third }, &mut events);
        apply(&mut world, Command::PrioritizeMonsters, &mut events);

        let order: Vec<_> = query::monsters(&world).iter().map(Monster::id).collect();
        assert_eq!(order, vec![third, first, second]);
    }

    #[test]
    fn escape_is_checked_before_death() {
        let mut world = World::with_config(Config {
            starting_score: 100,
            ..Config::default()
        });
        let runner = spawn(&mut world, MonsterKind::Intense);
        let victim = spawn(&mut world, MonsterKind::Regular);
        world.monsters[1].take_hit(150);

        let mut events = Vec::new();
        while !world.monsters[0].reached_end() {
            apply(&mut world, Command::AdvanceMonster { monster: runner }, &mut events);
        }
        assert!(world.monsters[0].is_dead());

        events.clear();
        apply(&mut world, Command::ResolveCasualties, &mut events);
        assert_eq!(
            events[..3],
            [
                Event::MonsterEscaped {
                    monster: runner,
                    score_loss: 20,
                },
                Event::MonsterKilled {
                    monster: victim,
                    bounty: 5,
                },
                Event::LedgerSettled {
                    score: 80,
                    money: 155,
                    score_delta: -20,
                    money_delta: 5,
                },
            ]
        );
        assert!(query::monsters(&world).is_empty());
    }
}
