use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use path_defence_core::{
    Event, GameStatus, MonsterKind, PlacementError, Point, RandomSource, TowerKind,
    WaveRequestError,
};
use path_defence_simulation::{Simulation, SimulationConfig, TickReport};

/// Always rolls the top face, so stuttering monsters never stall.
struct HighRoller;

impl RandomSource for HighRoller {
    fn roll(&mut self, sides: u32) -> u32 {
        sides.max(1)
    }
}

fn run_until_over<R: RandomSource>(simulation: &mut Simulation<R>, limit: usize) -> TickReport {
    for _ in 0..limit {
        let _ = simulation.request_wave();
        let report = simulation.tick();
        if report.status.is_over() {
            return report;
        }
    }
    panic!("game did not finish within {limit} ticks");
}

#[test]
fn placement_spends_once_and_rejects_overlap() {
    let mut simulation = Simulation::new(&SimulationConfig::default()).expect("valid config");
    let first = simulation.place_tower(Point::new(300, 550), TowerKind::Basic);
    assert!(first.is_ok());
    assert_eq!(simulation.money(), 75);

    assert_eq!(
        simulation.place_tower(Point::new(310, 560), TowerKind::Basic),
        Err(PlacementError::Overlap)
    );
    assert_eq!(simulation.money(), 75);

    assert_eq!(
        simulation.place_tower(Point::new(100, 300), TowerKind::Advanced),
        Err(PlacementError::InsufficientFunds)
    );
    assert_eq!(
        simulation.place_tower(Point::new(5, 300), TowerKind::Basic),
        Err(PlacementError::OutOfBounds)
    );
    assert_eq!(simulation.towers().into_vec().len(), 1);
}

#[test]
fn wave_requests_wait_for_the_current_release() {
    let mut simulation = Simulation::with_random(&SimulationConfig::default(), HighRoller)
        .expect("valid config");
    assert_eq!(simulation.request_wave(), Ok(1));
    assert_eq!(
        simulation.request_wave(),
        Err(WaveRequestError::AlreadyReleasing)
    );

    let _ = simulation.tick();
    assert_eq!(simulation.wave(), 1);
    assert_eq!(
        simulation.request_wave(),
        Err(WaveRequestError::AlreadyReleasing)
    );

    let mut released = 0;
    while simulation.request_wave().is_err() {
        let _ = simulation.tick();
        released += simulation
            .last_events()
            .iter()
            .filter(|event| matches!(event, Event::MonsterSpawned { .. }))
            .count();
    }
    assert_eq!(released, 2);
    assert!(simulation
        .monsters()
        .iter()
        .all(|monster| monster.kind == MonsterKind::Regular));
}

#[test]
fn fast_forward_takes_effect_on_the_next_tick() {
    let mut simulation = Simulation::new(&SimulationConfig::default()).expect("valid config");
    simulation.set_fast_forward(true);
    assert!(!simulation.is_fast_forward());
    assert_eq!(simulation.tick_interval(), Duration::from_millis(30));

    let _ = simulation.tick();
    assert!(simulation.is_fast_forward());
    assert_eq!(simulation.tick_interval(), Duration::from_millis(1));
    assert!(simulation
        .last_events()
        .contains(&Event::TimeAdvanced {
            dt: Duration::from_millis(1)
        }));

    simulation.set_fast_forward(false);
    let _ = simulation.tick();
    assert_eq!(simulation.tick_interval(), Duration::from_millis(30));
}

#[test]
fn release_cadence_follows_simulated_time_in_fast_forward() {
    let mut simulation = Simulation::with_random(&SimulationConfig::default(), HighRoller)
        .expect("valid config");
    simulation.set_fast_forward(true);
    assert_eq!(simulation.request_wave(), Ok(1));

    let mut spawn_ticks = Vec::new();
    for tick in 1..=400 {
        let _ = simulation.tick();
        if simulation
            .last_events()
            .iter()
            .any(|event| matches!(event, Event::MonsterSpawned { .. }))
        {
            spawn_ticks.push(tick);
        }
    }
    assert_eq!(spawn_ticks, vec![150, 300]);
}

#[test]
fn guarded_path_kills_a_regular_and_pays_once() {
    let mut simulation = Simulation::with_random(&SimulationConfig::default(), HighRoller)
        .expect("valid config");
    assert!(simulation
        .place_tower(Point::new(650, 560), TowerKind::Basic)
        .is_ok());
    assert_eq!(simulation.request_wave(), Ok(1));

    let mut kills = 0;
    let mut hits = 0;
    let mut money_earned = 0;
    for _ in 0..200 {
        let report = simulation.tick();
        money_earned += report.money_delta;
        for event in simulation.last_events() {
            match event {
                Event::MonsterKilled { bounty, .. } => {
                    assert_eq!(*bounty, 5);
                    kills += 1;
                }
                Event::MonsterHit { damage, .. } => {
                    assert_eq!(*damage, 5);
                    hits += 1;
                }
                Event::MonsterEscaped { .. } => panic!("monster slipped past the tower"),
                _ => {}
            }
        }
    }

    assert_eq!(kills, 2);
    assert_eq!(hits, 60);
    assert_eq!(money_earned, 10);
    assert_eq!(simulation.money(), 85);
    assert_eq!(simulation.score(), 250);
}

#[test]
fn escaped_monsters_cost_score_not_money() {
    let mut simulation = Simulation::with_random(&SimulationConfig::default(), HighRoller)
        .expect("valid config");
    assert_eq!(simulation.request_wave(), Ok(1));

    let mut escapes = 0;
    for _ in 0..2_000 {
        let report = simulation.tick();
        assert!(report.money_delta >= 0);
        escapes += simulation
            .last_events()
            .iter()
            .filter(|event| matches!(event, Event::MonsterEscaped { score_loss: 10, .. }))
            .count();
    }

    assert_eq!(escapes, 2);
    assert_eq!(simulation.score(), 230);
    assert_eq!(simulation.money(), 150);
    assert!(simulation.monsters().is_empty());
    assert_eq!(simulation.status(), GameStatus::Playing);
}

#[test]
fn draining_the_score_loses_the_game() {
    let config = SimulationConfig {
        starting_score: 15,
        ..SimulationConfig::default()
    };
    let mut simulation = Simulation::with_random(&config, HighRoller).expect("valid config");

    let report = run_until_over(&mut simulation, 10_000);
    assert_eq!(report.status, GameStatus::Lost);
    assert_eq!(report.score, 0);
    assert_eq!(
        simulation.request_wave(),
        Err(WaveRequestError::GameOver)
    );
    assert_eq!(
        simulation.place_tower(Point::new(300, 300), TowerKind::Basic),
        Err(PlacementError::GameOver)
    );
}

#[test]
fn surviving_every_wave_wins_the_game() {
    let config = SimulationConfig {
        seed: 0x5eed,
        starting_score: 1_000_000,
        ..SimulationConfig::default()
    };
    let mut simulation = Simulation::new(&config).expect("valid config");

    let report = run_until_over(&mut simulation, 100_000);
    assert_eq!(report.status, GameStatus::Won);
    assert_eq!(report.wave, 51);
    assert!(report.monsters.is_empty());
    assert!(report.score < 1_000_000);
    assert_eq!(
        simulation.request_wave(),
        Err(WaveRequestError::GameOver)
    );
}

#[test]
fn deterministic_replay_produces_identical_reports() {
    let first = replay(0xdead_beef);
    let second = replay(0xdead_beef);

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(fingerprint(&first.0), fingerprint(&second.0));
}

#[test]
fn tick_report_round_trips_through_bincode() {
    let mut simulation = Simulation::new(&SimulationConfig::default()).expect("valid config");
    let _ = simulation.place_tower(Point::new(450, 560), TowerKind::Basic);
    assert_eq!(simulation.request_wave(), Ok(1));
    let mut report = simulation.tick();
    while report.monsters.is_empty() {
        report = simulation.tick();
    }
    assert_eq!(report.towers.len(), 1);
    let bytes = bincode::serialize(&report).expect("serialize");
    let restored: TickReport = bincode::deserialize(&bytes).expect("deserialize");
    assert_eq!(restored, report);
}

fn replay(seed: u64) -> (Vec<TickReport>, Vec<Event>) {
    let config = SimulationConfig {
        seed,
        ..SimulationConfig::default()
    };
    let mut simulation = Simulation::new(&config).expect("valid config");
    let _ = simulation.place_tower(Point::new(450, 560), TowerKind::Basic);
    let _ = simulation.place_tower(Point::new(240, 400), TowerKind::Basic);

    let mut reports = Vec::new();
    let mut events = Vec::new();
    for tick in 0..3_000 {
        let _ = simulation.request_wave();
        simulation.set_fast_forward(tick % 700 > 350);
        reports.push(simulation.tick());
        events.extend_from_slice(simulation.last_events());
    }
    (reports, events)
}

fn fingerprint(reports: &[TickReport]) -> u64 {
    let mut hasher = DefaultHasher::new();
    reports.hash(&mut hasher);
    hasher.finish()
}
