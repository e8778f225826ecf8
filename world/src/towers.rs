//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use path_defence_core::{
    Footprint, PlacementError, Point, TowerId, TowerKind, TowerSnapshot, TowerStats,
    PLAY_FIELD_HEIGHT, PLAY_FIELD_WIDTH,
};

use crate::monsters::Monster;

/// A placed tower. Towers never move, upgrade, or leave the field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tower {
    id: TowerId,
    kind: TowerKind,
    position: Point,
    footprint: Footprint,
}

impl Tower {
    /// Creates a tower centered on `position`.
    #[must_use]
    pub fn new(id: TowerId, kind: TowerKind, position: Point) -> Self {
        Self {
            id,
            kind,
            position,
            footprint: Footprint::centered_on(position, kind.stats().footprint),
        }
    }

    /// Identifier allocated by the world.
    #[must_use]
    pub const fn id(&self) -> TowerId {
        self.id
    }

    /// Kind of the tower.
    #[must_use]
    pub const fn kind(&self) -> TowerKind {
        self.kind
    }

    /// Center of the tower.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Rectangle occupied by the tower.
    #[must_use]
    pub const fn footprint(&self) -> Footprint {
        self.footprint
    }

    /// Constants of the tower's kind.
    #[must_use]
    pub const fn stats(&self) -> TowerStats {
        self.kind.stats()
    }

    /// Reports whether the monster lies within the tower's reach.
    #[must_use]
    pub fn can_reach(&self, monster: &Monster) -> bool {
        let radius = i64::from(self.stats().radius);
        self.position.distance_squared(monster.position()) <= radius * radius
    }

    /// Deals one shot of damage to the monster, returning the damage dealt.
    pub fn fire(&self, monster: &mut Monster) -> u32 {
        let damage = self.stats().damage;
        monster.take_hit(damage);
        damage
    }

    /// Checks that the tower fits on the play field without intersecting any
    /// of the existing towers.
    pub fn can_place_on_map<'a, I>(&self, existing: I) -> Result<(), PlacementError>
    where
        I: IntoIterator<Item = &'a Tower>,
    {
        if !self
            .footprint
            .lies_within(PLAY_FIELD_WIDTH, PLAY_FIELD_HEIGHT)
        {
            return Err(PlacementError::OutOfBounds);
        }

        if existing
            .into_iter()
            .any(|tower| tower.footprint.intersects(&self.footprint))
        {
            return Err(PlacementError::Overlap);
        }

        Ok(())
    }

    /// Captures an immutable snapshot of the tower.
    #[must_use]
    pub fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            footprint: self.footprint,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
///
/// Identifiers grow monotonically, so iteration order is placement order.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, Tower>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Builds an unregistered tower carrying the next identifier.
    pub(crate) fn prepare(&self, kind: TowerKind, position: Point) -> Tower {
        Tower::new(self.next_tower_id, kind, position)
    }

    /// Stores a tower produced by [`TowerRegistry::prepare`].
    pub(crate) fn commit(&mut self, tower: Tower) -> TowerId {
        let id = tower.id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(id, tower);
        id
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&Tower> {
        self.entries.get(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
