//! Monsters travelling along the path.

use std::cmp::Ordering;

use path_defence_core::{MonsterId, MonsterKind, MonsterSnapshot, Point, Vector};

use crate::path::Path;

/// Outcome of a single [`Monster::advance`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// The monster moved within its current segment.
    Moved,
    /// The monster left its segment and snapped to the start of the next one.
    EnteredSegment(usize),
    /// The monster ran past the final segment.
    ReachedEnd,
    /// The monster had already escaped and did not move.
    Stationary,
}

/// A single monster with its mutable travel and combat state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Monster {
    id: MonsterId,
    kind: MonsterKind,
    position: Point,
    vector: Vector,
    segment: usize,
    distance_traveled: u32,
    health: i32,
    being_attacked: bool,
    reached_end: bool,
}

impl Monster {
    /// Creates a monster at the start of the path, heading along the first
    /// segment.
    #[must_use]
    pub fn new(id: MonsterId, kind: MonsterKind, path: &Path) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            position: path.start(),
            vector: path.movement_vector(0, stats.speed).unwrap_or_default(),
            segment: 0,
            distance_traveled: 0,
            health: stats.health,
            being_attacked: false,
            reached_end: false,
        }
    }

    /// Identifier of the monster.
    #[must_use]
    pub const fn id(&self) -> MonsterId {
        self.id
    }

    /// Kind of the monster.
    #[must_use]
    pub const fn kind(&self) -> MonsterKind {
        self.kind
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Displacement applied on the next advance.
    #[must_use]
    pub const fn vector(&self) -> Vector {
        self.vector
    }

    /// Index of the segment being followed; equals the segment count once
    /// the monster escaped.
    #[must_use]
    pub const fn segment(&self) -> usize {
        self.segment
    }

    /// Cumulative distance covered since release.
    #[must_use]
    pub const fn distance_traveled(&self) -> u32 {
        self.distance_traveled
    }

    /// Remaining health; may be negative after an overkill.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Whether a tower hit the monster during the current tick.
    #[must_use]
    pub const fn is_being_attacked(&self) -> bool {
        self.being_attacked
    }

    /// Whether the monster ran past the final segment.
    #[must_use]
    pub const fn reached_end(&self) -> bool {
        self.reached_end
    }

    /// Whether the monster has no health left.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Moves the monster one step along the path.
    ///
    /// A monster that leaves its segment loses any overshoot and snaps to the
    /// start of the next segment. Leaving the final segment drains its health
    /// so the casualty sweep sees it as escaped rather than killed.
    pub fn advance(&mut self, path: &Path) -> Advance {
        if self.reached_end {
            return Advance::Stationary;
        }

        self.distance_traveled = self
            .distance_traveled
            .saturating_add(self.vector.magnitude());
        self.position = self.position.offset(self.vector);
        if path.contains(self.segment, self.position) {
            return Advance::Moved;
        }

        self.segment += 1;
        match path.segment(self.segment) {
            Some(next) => {
                self.position = next.start();
                self.vector = next.movement_vector(self.kind.stats().speed);
                Advance::EnteredSegment(self.segment)
            }
            None => {
                self.reached_end = true;
                self.health = 0;
                Advance::ReachedEnd
            }
        }
    }

    /// Applies damage and marks the monster as attacked for this tick.
    pub fn take_hit(&mut self, damage: u32) {
        let damage = i32::try_from(damage).unwrap_or(i32::MAX);
        self.health = self.health.saturating_sub(damage);
        self.being_attacked = true;
    }

    pub(crate) fn clear_attack_flag(&mut self) {
        self.being_attacked = false;
    }

    /// Orders monsters by targeting priority: farther along sorts first and
    /// equal distances compare equal.
    #[must_use]
    pub fn cmp_priority(&self, other: &Self) -> Ordering {
        other.distance_traveled.cmp(&self.distance_traveled)
    }

    /// Captures an immutable snapshot of the monster.
    #[must_use]
    pub fn snapshot(&self) -> MonsterSnapshot {
        MonsterSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            segment: self.segment,
            distance_traveled: self.distance_traveled,
            health: self.health,
            being_attacked: self.being_attacked,
            reached_end: self.reached_end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regular(id: u32) -> Monster {
        Monster::new(MonsterId::new(id), MonsterKind::Regular, &Path::zigzag())
    }

    #[test]
    fn spawns_at_path_start_heading_west() {
        let monster = Monster::new(MonsterId::new(0), MonsterKind::Faster, &Path::zigzag());
        assert_eq!(monster.position(), Point::new(700, 600));
        assert_eq!(monster.vector(), Vector::new(-15, 0));
        assert_eq!(monster.health(), 500);
        assert!(!monster.reached_end());
    }

    #[test]
    fn distance_traveled_never_decreases() {
        let path = Path::zigzag();
        for kind in MonsterKind::ALL {
            let mut monster = Monster::new(MonsterId::new(1), kind, &path);
            let mut previous = monster.distance_traveled();
            while !monster.reached_end() {
                let _ = monster.advance(&path);
                assert!(monster.distance_traveled() >= previous);
                assert!(monster.segment() <= path.segment_count());
                previous = monster.distance_traveled();
            }
            assert_eq!(monster.advance(&path), Advance::Stationary);
            assert_eq!(monster.distance_traveled(), previous);
        }
    }

    #[test]
    fn snaps_to_next_segment_start_when_leaving_segment() {
        let path = Path::zigzag();
        let mut monster = regular(0);
        let mut steps = 0;
        let outcome = loop {
            steps += 1;
            match monster.advance(&path) {
                Advance::Moved => continue,
                other => break other,
            }
        };

        assert_eq!(outcome, Advance::EnteredSegment(1));
        assert_eq!(steps, 167);
        assert_eq!(monster.position(), Point::new(200, 600));
        assert_eq!(monster.vector(), Vector::new(0, -3));
        assert_eq!(monster.distance_traveled(), 501);
    }

    #[test]
    fn escaping_drains_health() {
        let path = Path::zigzag();
        let mut monster = regular(0);
        let mut last = Advance::Moved;
        while !monster.reached_end() {
            last = monster.advance(&path);
        }
        assert_eq!(last, Advance::ReachedEnd);
        assert_eq!(monster.health(), 0);
        assert!(monster.is_dead());
        assert_eq!(monster.segment(), path.segment_count());
    }

    #[test]
    fn thirty_basic_hits_kill_a_regular_monster() {
        let mut monster = regular(0);
        for _ in 0..29 {
            monster.take_hit(5);
            assert!(!monster.is_dead());
        }
        monster.take_hit(5);
        assert!(monster.is_dead());
        assert!(monster.is_being_attacked());
        monster.take_hit(5);
        assert_eq!(monster.health(), -5);
    }

    #[test]
    fn priority_prefers_farther_monsters() {
        let path = Path::zigzag();
        let mut ahead = regular(0);
        let behind = regular(1);
        let _ = ahead.advance(&path);
        assert_eq!(ahead.cmp_priority(&behind), Ordering::Less);
        assert_eq!(behind.cmp_priority(&ahead), Ordering::Greater);
        assert_eq!(behind.cmp_priority(&regular(2)), Ordering::Equal);
    }
}
