#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves tower pairings into firing commands.

use path_defence_core::{Command, MonsterId, MonsterView, TowerTarget};

/// Tower combat system that queues firing commands for live targets.
#[derive(Debug, Default)]
pub struct TowerCombat {
    remaining: Vec<RemainingHealth>,
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireTower` for every pairing whose monster is still
    /// alive once the preceding shots of this tick land.
    ///
    /// Targets must be grouped by tower in placement order with monsters in
    /// priority order, as produced by the targeting system.
    ///
    /// Each tower fires once per tick at every live monster within reach;
    /// that volley is the intended balance, not a single-target shot.
    pub fn handle(
        &mut self,
        targets: &[TowerTarget],
        monsters: &MonsterView,
        out: &mut Vec<Command>,
    ) {
        if targets.is_empty() || monsters.is_empty() {
            return;
        }

        self.prepare_remaining(monsters);
        self.scratch.clear();

        for target in targets {
            let Some(health) = find_remaining(&mut self.remaining, target.monster) else {
                continue;
            };
            if *health <= 0 {
                continue;
            }

            let damage = i32::try_from(target.kind.stats().damage).unwrap_or(i32::MAX);
            *health = health.saturating_sub(damage);
            self.scratch.push(Command::FireTower {
                tower: target.tower,
                monster: target.monster,
            });
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }

    fn prepare_remaining(&mut self, monsters: &MonsterView) {
        self.remaining.clear();
        self.remaining.reserve(monsters.len());
        for snapshot in monsters.iter() {
            self.remaining.push(RemainingHealth {
                monster: snapshot.id,
                health: snapshot.health,
            });
        }
        self.remaining.sort_by_key(|entry| entry.monster);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RemainingHealth {
    monster: MonsterId,
    health: i32,
}

fn find_remaining(remaining: &mut [RemainingHealth], monster: MonsterId) -> Option<&mut i32> {
    remaining
        .binary_search_by_key(&monster, |entry| entry.monster)
        .ok()
        .map(|index| &mut remaining[index].health)
}
