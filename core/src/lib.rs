#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Path Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! views, and respond exclusively with new command batches.

use std::{cmp::Ordering, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of the play field measured in logical units.
pub const PLAY_FIELD_WIDTH: i32 = 700;

/// Height of the play field measured in logical units.
pub const PLAY_FIELD_HEIGHT: i32 = 700;

/// Distance covered per tick by a monster with a speed multiplier of one.
///
/// Every balance constant assumes this value; it is not configurable.
pub const MOVEMENT_SCALE: i32 = 3;

/// Highest wave number that releases monsters. Requesting a wave beyond it
/// puts the game into its end-pending state.
pub const MAX_WAVES: u32 = 50;

/// Score the player starts the game with.
pub const STARTING_SCORE: u32 = 250;

/// Money the player starts the game with.
pub const STARTING_MONEY: u32 = 150;

/// Edge length of the square footprint every tower occupies.
pub const TOWER_FOOTPRINT_EDGE: u32 = 24;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests placement of a tower centered on the provided position.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Center of the tower's footprint.
        position: Point,
    },
    /// Requests that the next wave be sent.
    RequestWave,
    /// Requests a change of the simulation speed, applied on the next tick.
    SetFastForward {
        /// Whether the fast-forward interval should be used.
        enabled: bool,
    },
    /// Opens a new simulation tick.
    Tick,
    /// Requests that a monster be released at the start of the path.
    SpawnMonster {
        /// Kind of monster to release.
        kind: MonsterKind,
    },
    /// Reports that the active wave finished releasing monsters.
    CompleteWaveRelease,
    /// Requests that a monster advance one step along the path.
    AdvanceMonster {
        /// Identifier of the monster to move.
        monster: MonsterId,
    },
    /// Re-sorts the active monsters into targeting priority order.
    PrioritizeMonsters,
    /// Requests that a tower fire a single shot at a monster.
    FireTower {
        /// Tower taking the shot.
        tower: TowerId,
        /// Monster receiving the damage.
        monster: MonsterId,
    },
    /// Removes escaped and dead monsters and settles the ledger.
    ResolveCasualties,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time covered by the tick.
        dt: Duration,
    },
    /// Announces that the simulation switched between speed modes.
    SpeedModeChanged {
        /// Mode that became active.
        mode: SpeedMode,
    },
    /// Confirms that a wave request was accepted.
    WaveRequested {
        /// Wave number that will be processed on the next tick.
        wave: u32,
    },
    /// Reports that a wave request was rejected.
    WaveRequestRejected {
        /// Specific reason the request failed.
        reason: WaveRequestError,
    },
    /// Announces that a wave began releasing monsters.
    WaveStarted {
        /// Wave number that started.
        wave: u32,
    },
    /// Announces that the active wave finished releasing monsters.
    WaveReleaseCompleted {
        /// Wave number whose release finished.
        wave: u32,
    },
    /// Announces that the request past the final wave was processed.
    FinalWaveRequested {
        /// Wave number recorded for the request.
        wave: u32,
    },
    /// Confirms that a tower was placed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Rectangle occupied by the tower.
        footprint: Footprint,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested.
        kind: TowerKind,
        /// Center position provided in the request.
        position: Point,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a monster entered the path.
    MonsterSpawned {
        /// Identifier assigned to the monster.
        monster: MonsterId,
        /// Kind of monster released.
        kind: MonsterKind,
        /// Position the monster occupies after spawning.
        position: Point,
    },
    /// Confirms that a monster moved.
    MonsterAdvanced {
        /// Identifier of the monster.
        monster: MonsterId,
        /// Position before the move.
        from: Point,
        /// Position after the move.
        to: Point,
    },
    /// Announces that a monster ran past the final segment.
    MonsterReachedEnd {
        /// Identifier of the monster.
        monster: MonsterId,
    },
    /// Confirms that a tower shot hit a monster.
    MonsterHit {
        /// Tower that fired.
        tower: TowerId,
        /// Monster that was hit.
        monster: MonsterId,
        /// Damage dealt by the shot.
        damage: u32,
    },
    /// Reports that an escaped monster was removed.
    MonsterEscaped {
        /// Identifier of the monster.
        monster: MonsterId,
        /// Score deducted for the escape.
        score_loss: u32,
    },
    /// Reports that a dead monster was removed.
    MonsterKilled {
        /// Identifier of the monster.
        monster: MonsterId,
        /// Money earned for the kill.
        bounty: u32,
    },
    /// Reports the ledger after casualties were settled.
    LedgerSettled {
        /// Score after settlement.
        score: u32,
        /// Money after settlement.
        money: u32,
        /// Applied change in score, zero or negative.
        score_delta: i64,
        /// Applied change in money, zero or positive.
        money_delta: i64,
    },
    /// Announces that the game reached a new status.
    GameStatusChanged {
        /// Status that became active.
        status: GameStatus,
    },
}

/// Speed modes available to the simulation clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeedMode {
    /// Regular tick interval.
    #[default]
    Normal,
    /// Much shorter tick interval running the identical per-tick logic.
    FastForward,
}

/// Overall state of a game session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// The game is still in progress.
    #[default]
    Playing,
    /// Every wave was survived.
    Won,
    /// The score ran out.
    Lost,
}

impl GameStatus {
    /// Reports whether the status ends the session.
    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// Unique identifier assigned to a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(u32);

impl MonsterId {
    /// Creates a new monster identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
///
/// Identifiers are allocated in placement order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Integer position on the play field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate, growing downward.
    pub y: i32,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the point displaced by the provided vector.
    #[must_use]
    pub const fn offset(self, vector: Vector) -> Self {
        Self::new(self.x + vector.dx, self.y + vector.dy)
    }

    /// Squared Euclidean distance between two points.
    #[must_use]
    pub fn distance_squared(self, other: Point) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }
}

/// Per-tick displacement of a monster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector {
    /// Horizontal component.
    pub dx: i32,
    /// Vertical component.
    pub dy: i32,
}

impl Vector {
    /// Creates a new vector.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Euclidean length rounded toward zero.
    #[must_use]
    pub fn magnitude(self) -> u32 {
        let dx = i64::from(self.dx);
        let dy = i64::from(self.dy);
        ((dx * dx + dy * dy) as f64).sqrt() as u32
    }
}

/// Straight, axis-aligned leg of the monster path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    start: Point,
    end: Point,
}

impl Segment {
    /// Creates a segment running from `start` to `end`.
    #[must_use]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Point where the segment begins.
    #[must_use]
    pub const fn start(&self) -> Point {
        self.start
    }

    /// Point where the segment ends.
    #[must_use]
    pub const fn end(&self) -> Point {
        self.end
    }

    /// Reports whether the segment runs along the x axis.
    #[must_use]
    pub const fn is_horizontal(&self) -> bool {
        self.start.x != self.end.x
    }

    /// Reports whether the point lies within the segment's span along its
    /// long axis, endpoints included. The cross axis is not inspected.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        if self.is_horizontal() {
            let (low, high) = ordered(self.start.x, self.end.x);
            (low..=high).contains(&point.x)
        } else {
            let (low, high) = ordered(self.start.y, self.end.y);
            (low..=high).contains(&point.y)
        }
    }

    /// Per-tick displacement of a monster with the given speed multiplier
    /// travelling along this segment.
    #[must_use]
    pub const fn movement_vector(&self, speed: u32) -> Vector {
        let step = MOVEMENT_SCALE * speed as i32;
        if self.end.x > self.start.x {
            Vector::new(step, 0)
        } else if self.end.x < self.start.x {
            Vector::new(-step, 0)
        } else if self.end.y > self.start.y {
            Vector::new(0, step)
        } else {
            Vector::new(0, -step)
        }
    }
}

fn ordered(a: i32, b: i32) -> (i32, i32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Axis-aligned rectangle occupied by a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    origin: Point,
    size: FootprintSize,
}

impl Footprint {
    /// Constructs a rectangle from its upper-left corner and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: Point, size: FootprintSize) -> Self {
        Self { origin, size }
    }

    /// Constructs a rectangle of the given size centered on `center`.
    #[must_use]
    pub const fn centered_on(center: Point, size: FootprintSize) -> Self {
        let origin = Point::new(
            center.x - (size.width / 2) as i32,
            center.y - (size.height / 2) as i32,
        );
        Self { origin, size }
    }

    /// Upper-left corner of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Dimensions of the rectangle.
    #[must_use]
    pub const fn size(&self) -> FootprintSize {
        self.size
    }

    /// Reports whether the interiors of two rectangles overlap.
    ///
    /// Rectangles that merely share an edge do not intersect, and empty
    /// rectangles never intersect anything.
    #[must_use]
    pub fn intersects(&self, other: &Footprint) -> bool {
        if self.size.is_empty() || other.size.is_empty() {
            return false;
        }

        let (left, top, right, bottom) = self.edges();
        let (other_left, other_top, other_right, other_bottom) = other.edges();
        left < other_right && other_left < right && top < other_bottom && other_top < bottom
    }

    /// Reports whether the rectangle lies entirely inside `[0, width] × [0, height]`.
    #[must_use]
    pub fn lies_within(&self, width: i32, height: i32) -> bool {
        let (left, top, right, bottom) = self.edges();
        left >= 0 && top >= 0 && right <= i64::from(width) && bottom <= i64::from(height)
    }

    fn edges(&self) -> (i64, i64, i64, i64) {
        let left = i64::from(self.origin.x);
        let top = i64::from(self.origin.y);
        (
            left,
            top,
            left + i64::from(self.size.width),
            top + i64::from(self.size.height),
        )
    }
}

/// Size of a [`Footprint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FootprintSize {
    width: u32,
    height: u32,
}

impl FootprintSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the rectangle.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Kinds of monsters released by waves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterKind {
    /// Baseline monster.
    Regular,
    /// Three times faster than a regular monster.
    Fast,
    /// Five times faster than a regular monster.
    Faster,
    /// Slow with a large health pool.
    Hard,
    /// Slow, very durable, and costly when it escapes.
    Intense,
    /// Stuttering giant worth a large bounty.
    Ultimate,
}

impl MonsterKind {
    /// Every monster kind, weakest first.
    pub const ALL: [MonsterKind; 6] = [
        Self::Regular,
        Self::Fast,
        Self::Faster,
        Self::Hard,
        Self::Intense,
        Self::Ultimate,
    ];

    /// Fixed parameterization of the kind.
    #[must_use]
    pub const fn stats(self) -> MonsterStats {
        match self {
            Self::Regular => MonsterStats::new(1, 150, 5, 10, 10, 0),
            Self::Fast => MonsterStats::new(3, 300, 5, 10, 10, 0),
            Self::Faster => MonsterStats::new(5, 500, 5, 10, 10, 0),
            Self::Hard => MonsterStats::new(1, 2_000, 5, 10, 15, 0),
            Self::Intense => MonsterStats::new(1, 4_000, 10, 20, 20, 0),
            Self::Ultimate => MonsterStats::new(1, 10_000, 75, 30, 25, 50),
        }
    }
}

/// Constants describing a monster kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MonsterStats {
    /// Multiplier applied to [`MOVEMENT_SCALE`].
    pub speed: u32,
    /// Health on release.
    pub health: i32,
    /// Money earned when the monster dies.
    pub money_value: u32,
    /// Score lost when the monster escapes.
    pub score_loss: u32,
    /// Radius used by renderers; has no effect on the simulation.
    pub display_radius: u32,
    /// Percent chance per tick that the monster skips its move.
    pub stutter_percent: u32,
}

impl MonsterStats {
    const fn new(
        speed: u32,
        health: i32,
        money_value: u32,
        score_loss: u32,
        display_radius: u32,
        stutter_percent: u32,
    ) -> Self {
        Self {
            speed,
            health,
            money_value,
            score_loss,
            display_radius,
            stutter_percent,
        }
    }
}

/// Types of towers that can be placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Cheap tower with a wide reach and light damage.
    Basic,
    /// Expensive tower with a short reach and heavy damage.
    Advanced,
}

impl TowerKind {
    /// Fixed parameterization of the kind.
    #[must_use]
    pub const fn stats(self) -> TowerStats {
        match self {
            Self::Basic => TowerStats {
                damage: 5,
                radius: 100,
                cost: 75,
                footprint: FootprintSize::new(TOWER_FOOTPRINT_EDGE, TOWER_FOOTPRINT_EDGE),
            },
            Self::Advanced => TowerStats {
                damage: 60,
                radius: 15,
                cost: 150,
                footprint: FootprintSize::new(TOWER_FOOTPRINT_EDGE, TOWER_FOOTPRINT_EDGE),
            },
        }
    }
}

/// Constants describing a tower kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TowerStats {
    /// Damage dealt by a single shot.
    pub damage: u32,
    /// Attack reach measured from the tower's center.
    pub radius: u32,
    /// Money spent when the tower is placed.
    pub cost: u32,
    /// Size of the rectangle the tower occupies.
    pub footprint: FootprintSize,
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The game already ended.
    #[error("the game is over")]
    GameOver,
    /// The footprint extends beyond the play field.
    #[error("tower footprint leaves the play field")]
    OutOfBounds,
    /// The footprint intersects an existing tower.
    #[error("tower footprint overlaps an existing tower")]
    Overlap,
    /// The player cannot afford the tower.
    #[error("not enough money to build the tower")]
    InsufficientFunds,
}

/// Reasons a wave request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum WaveRequestError {
    /// The game already ended.
    #[error("the game is over")]
    GameOver,
    /// The previous wave is still pending or releasing monsters.
    #[error("the previous wave is still being released")]
    AlreadyReleasing,
    /// The final wave was already requested.
    #[error("no waves remain")]
    MaxWavesReached,
}

/// Immutable representation of a single monster's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonsterSnapshot {
    /// Unique identifier assigned to the monster.
    pub id: MonsterId,
    /// Kind of the monster.
    pub kind: MonsterKind,
    /// Current position.
    pub position: Point,
    /// Index of the path segment being followed.
    pub segment: usize,
    /// Cumulative distance covered since release.
    pub distance_traveled: u32,
    /// Remaining health, possibly negative.
    pub health: i32,
    /// Whether a tower hit the monster during the current tick.
    pub being_attacked: bool,
    /// Whether the monster ran past the final segment.
    pub reached_end: bool,
}

impl MonsterSnapshot {
    /// Orders monsters by targeting priority: farther along sorts first and
    /// equal distances compare equal.
    #[must_use]
    pub fn cmp_priority(&self, other: &Self) -> Ordering {
        other.distance_traveled.cmp(&self.distance_traveled)
    }
}

/// Read-only snapshot describing every active monster in priority order.
#[derive(Clone, Debug, Default)]
pub struct MonsterView {
    snapshots: Vec<MonsterSnapshot>,
}

impl MonsterView {
    /// Creates a new monster view, stable-sorting the snapshots by priority.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<MonsterSnapshot>) -> Self {
        snapshots.sort_by(MonsterSnapshot::cmp_priority);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots, highest priority first.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &MonsterSnapshot> {
        self.snapshots.iter()
    }

    /// Number of monsters captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no monsters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<MonsterSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Center of the tower, the origin of its reach.
    pub position: Point,
    /// Rectangle occupied by the tower.
    pub footprint: Footprint,
}

/// Read-only snapshot describing all towers in placement order.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in placement order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Pairing of a tower with a monster inside its reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerTarget {
    /// Tower able to fire.
    pub tower: TowerId,
    /// Kind of the tower, which determines its damage.
    pub kind: TowerKind,
    /// Monster within reach.
    pub monster: MonsterId,
}

/// Source of uniformly distributed integers consumed by the simulation.
///
/// Every random decision in the engine flows through this trait so that tests
/// can substitute scripted or seeded sources.
pub trait RandomSource {
    /// Rolls a fair die with `sides` faces, returning a value in `1..=sides`.
    ///
    /// Implementations return `1` when `sides` is zero or one.
    fn roll(&mut self, sides: u32) -> u32;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn roll(&mut self, sides: u32) -> u32 {
        (**self).roll(sides)
    }
}
