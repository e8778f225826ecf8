#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave scheduler that releases monsters on a fixed cadence while a wave is
//! active.

use std::time::Duration;

use path_defence_core::{Command, Event, MonsterKind, RandomSource};

/// Default time between two release ticks.
pub const DEFAULT_RELEASE_INTERVAL: Duration = Duration::from_millis(150);

/// A wave finishes releasing once its counter passes this value.
const RELEASE_COUNTER_LIMIT: u32 = 10;

/// Comparators below this value always release a regular monster.
const EARLY_WAVE_COMPARATOR: u32 = 6;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    release_interval: Duration,
}

impl Config {
    /// Creates a new configuration using the provided release cadence.
    #[must_use]
    pub const fn new(release_interval: Duration) -> Self {
        Self { release_interval }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_RELEASE_INTERVAL)
    }
}

/// A monster picked for release and the counter bonus it costs the wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Release {
    /// Kind of the released monster.
    pub kind: MonsterKind,
    /// Amount added to the release counter on top of the per-tick step.
    pub counter_bonus: u32,
}

/// Picks the monster released for `wave`, drawing from `rng` once waves grow
/// past the opening regular-only phase.
pub fn select_release<R>(wave: u32, rng: &mut R) -> Release
where
    R: RandomSource + ?Sized,
{
    let comparator = wave.saturating_mul(2);
    if comparator < EARLY_WAVE_COMPARATOR {
        return Release {
            kind: MonsterKind::Regular,
            counter_bonus: RELEASE_COUNTER_LIMIT - 2 * comparator,
        };
    }

    let value = rng.roll(comparator);
    let (kind, counter_bonus) = if value < 10 && wave < 15 {
        (MonsterKind::Regular, 0)
    } else if value < 20 && wave < 20 {
        (MonsterKind::Fast, 0)
    } else if value < 30 && wave < 35 {
        (MonsterKind::Faster, 0)
    } else if value < 50 && wave < 30 {
        (MonsterKind::Hard, 0)
    } else if value < 80 && wave < 40 {
        (MonsterKind::Intense, 1)
    } else if wave < 45 {
        (MonsterKind::Ultimate, 5)
    } else if wave < 48 {
        (MonsterKind::Ultimate, 3)
    } else {
        (MonsterKind::Ultimate, 1)
    };

    Release {
        kind,
        counter_bonus,
    }
}

/// Pure system that releases the monsters of the active wave.
#[derive(Debug)]
pub struct Spawning {
    release_interval: Duration,
    accumulator: Duration,
    active_wave: Option<u32>,
    counter: u32,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            release_interval: config.release_interval,
            accumulator: Duration::ZERO,
            active_wave: None,
            counter: 0,
        }
    }

    /// Wave currently being released, if any.
    #[must_use]
    pub fn active_wave(&self) -> Option<u32> {
        self.active_wave
    }

    /// Consumes world events and emits spawn commands for every release tick
    /// that elapsed.
    pub fn handle<R>(&mut self, events: &[Event], rng: &mut R, out: &mut Vec<Command>)
    where
        R: RandomSource + ?Sized,
    {
        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::WaveStarted { wave } if self.active_wave.is_none() => {
                    self.active_wave = Some(*wave);
                    self.counter = 0;
                    self.accumulator = Duration::ZERO;
                }
                Event::TimeAdvanced { dt } => {
                    accumulated = accumulated.saturating_add(*dt);
                }
                _ => {}
            }
        }

        let Some(wave) = self.active_wave else {
            return;
        };

        if self.release_interval.is_zero() || accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        while self.accumulator >= self.release_interval {
            self.accumulator -= self.release_interval;
            self.counter += 1;
            if self.counter > RELEASE_COUNTER_LIMIT {
                self.active_wave = None;
                self.counter = 0;
                self.accumulator = Duration::ZERO;
                out.push(Command::CompleteWaveRelease);
                return;
            }

            let release = select_release(wave, rng);
            self.counter = self.counter.saturating_add(release.counter_bonus);
            out.push(Command::SpawnMonster { kind: release.kind });
        }
    }
}
