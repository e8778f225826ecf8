#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that pairs towers with the monsters inside their reach.

use path_defence_core::{MonsterId, MonsterView, Point, TowerId, TowerKind, TowerTarget, TowerView};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    tower_workspace: Vec<TowerWorkspace>,
    monster_workspace: Vec<MonsterCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes every tower and monster pairing for the provided snapshot.
    ///
    /// Pairings are grouped by tower in placement order, and within a tower
    /// follow monster priority order. The output buffer is cleared before
    /// populating it.
    pub fn handle(
        &mut self,
        towers: &TowerView,
        monsters: &MonsterView,
        out: &mut Vec<TowerTarget>,
    ) {
        out.clear();

        if towers.iter().next().is_none() || monsters.is_empty() {
            return;
        }

        self.prepare_tower_workspace(towers);
        self.prepare_monster_workspace(monsters);

        for tower in &self.tower_workspace {
            for candidate in &self.monster_workspace {
                if tower.position.distance_squared(candidate.position) > tower.reach_squared {
                    continue;
                }

                out.push(TowerTarget {
                    tower: tower.id,
                    kind: tower.kind,
                    monster: candidate.id,
                });
            }
        }
    }

    fn prepare_tower_workspace(&mut self, towers: &TowerView) {
        self.tower_workspace.clear();
        let (lower, _) = towers.iter().size_hint();
        self.tower_workspace.reserve(lower);

        for snapshot in towers.iter() {
            let radius = i64::from(snapshot.kind.stats().radius);
            self.tower_workspace.push(TowerWorkspace {
                id: snapshot.id,
                kind: snapshot.kind,
                position: snapshot.position,
                reach_squared: radius * radius,
            });
        }
    }

    fn prepare_monster_workspace(&mut self, monsters: &MonsterView) {
        self.monster_workspace.clear();
        self.monster_workspace.reserve(monsters.len());

        for snapshot in monsters.iter() {
            self.monster_workspace.push(MonsterCandidate {
                id: snapshot.id,
                position: snapshot.position,
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TowerWorkspace {
    id: TowerId,
    kind: TowerKind,
    position: Point,
    reach_squared: i64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct MonsterCandidate {
    id: MonsterId,
    position: Point,
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_defence_core::{Footprint, MonsterKind, MonsterSnapshot, TowerSnapshot};

    fn tower_snapshot(id: u32, kind: TowerKind, position: (i32, i32)) -> TowerSnapshot {
        let position = Point::new(position.0, position.1);
        TowerSnapshot {
            id: TowerId::new(id),
            kind,
            position,
            footprint: Footprint::centered_on(position, kind.stats().footprint),
        }
    }

    fn monster_snapshot(id: u32, position: (i32, i32), distance_traveled: u32) -> MonsterSnapshot {
        MonsterSnapshot {
            id: MonsterId::new(id),
            kind: MonsterKind::Regular,
            position: Point::new(position.0, position.1),
            segment: 0,
            distance_traveled,
            health: 150,
            being_attacked: false,
            reached_end: false,
        }
    }

    #[test]
    fn pairs_follow_tower_then_priority_order() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![
            tower_snapshot(1, TowerKind::Advanced, (500, 610)),
            tower_snapshot(0, TowerKind::Basic, (500, 500)),
        ]);
        let monsters = MonsterView::from_snapshots(vec![
            monster_snapshot(0, (530, 590), 150),
            monster_snapshot(1, (500, 600), 200),
        ]);

        let mut out = Vec::new();
        system.handle(&towers, &monsters, &mut out);

        let pairs: Vec<_> = out
            .iter()
            .map(|target| (target.tower.get(), target.monster.get()))
            .collect();
        assert_eq!(pairs, vec![(0, 1), (0, 0), (1, 1)]);
        assert_eq!(out[2].kind, TowerKind::Advanced);
    }

    #[test]
    fn reach_boundary_is_inclusive() {
        let mut system = TowerTargeting::new();
        let towers =
            TowerView::from_snapshots(vec![tower_snapshot(0, TowerKind::Basic, (100, 100))]);
        let monsters = MonsterView::from_snapshots(vec![
            monster_snapshot(0, (160, 180), 10),
            monster_snapshot(1, (161, 180), 5),
        ]);

        let mut out = vec![TowerTarget {
            tower: TowerId::new(9),
            kind: TowerKind::Basic,
            monster: MonsterId::new(9),
        }];
        system.handle(&towers, &monsters, &mut out);

        assert_eq!(
            out,
            vec![TowerTarget {
                tower: TowerId::new(0),
                kind: TowerKind::Basic,
                monster: MonsterId::new(0),
            }]
        );
    }

    #[test]
    fn empty_views_produce_no_targets() {
        let mut system = TowerTargeting::new();
        let mut out = Vec::new();
        system.handle(&TowerView::default(), &MonsterView::default(), &mut out);
        assert!(out.is_empty());
    }
}
