//! Scripted player that keeps waves coming and follows a fixed build order.

use path_defence_core::{PlacementError, Point, RandomSource, TowerKind};
use path_defence_simulation::Simulation;

/// Tower sites hugging the zigzag route, in build order.
const BUILD_PLAN: [(TowerKind, Point); 12] = [
    (TowerKind::Basic, Point::new(450, 560)),
    (TowerKind::Basic, Point::new(240, 400)),
    (TowerKind::Basic, Point::new(400, 140)),
    (TowerKind::Basic, Point::new(560, 250)),
    (TowerKind::Advanced, Point::new(640, 585)),
    (TowerKind::Basic, Point::new(300, 440)),
    (TowerKind::Basic, Point::new(160, 300)),
    (TowerKind::Advanced, Point::new(400, 585)),
    (TowerKind::Basic, Point::new(450, 360)),
    (TowerKind::Basic, Point::new(100, 440)),
    (TowerKind::Advanced, Point::new(215, 300)),
    (TowerKind::Basic, Point::new(640, 140)),
];

/// Drives wave requests and, optionally, tower purchases between ticks.
#[derive(Debug)]
pub(crate) struct Autoplay {
    build: bool,
    next_site: usize,
}

impl Autoplay {
    /// Creates an autoplayer; `build` enables the fixed build order.
    pub(crate) fn new(build: bool) -> Self {
        Self { build, next_site: 0 }
    }

    /// Issues the player's actions for the upcoming tick.
    pub(crate) fn act<R: RandomSource>(&mut self, simulation: &mut Simulation<R>) {
        if let Ok(wave) = simulation.request_wave() {
            tracing::debug!(wave, "requested wave");
        }

        if self.build {
            self.build_next(simulation);
        }
    }

    fn build_next<R: RandomSource>(&mut self, simulation: &mut Simulation<R>) {
        while let Some(&(kind, position)) = BUILD_PLAN.get(self.next_site) {
            match simulation.place_tower(position, kind) {
                Ok(tower) => {
                    tracing::info!(tower = tower.get(), ?kind, ?position, "autoplay built tower");
                    self.next_site += 1;
                }
                Err(PlacementError::InsufficientFunds | PlacementError::GameOver) => return,
                Err(reason) => {
                    tracing::warn!(?kind, ?position, %reason, "skipping blocked build site");
                    self.next_site += 1;
                }
            }
        }
    }
}
