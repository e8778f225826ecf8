//! Fixed route that monsters follow across the play field.

use path_defence_core::{Point, Segment, Vector};
use thiserror::Error;

/// Waypoints of the zigzag route used by every game.
const ZIGZAG_WAYPOINTS: [Point; 6] = [
    Point::new(700, 600),
    Point::new(200, 600),
    Point::new(200, 100),
    Point::new(600, 100),
    Point::new(600, 400),
    Point::new(0, 400),
];

/// Reasons a sequence of segments cannot form a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// No segments were supplied.
    #[error("a path needs at least one segment")]
    Empty,
    /// A segment moves along both axes.
    #[error("segment {index} is not axis-aligned")]
    Diagonal {
        /// Position of the offending segment.
        index: usize,
    },
    /// A segment starts and ends at the same point.
    #[error("segment {index} has zero length")]
    Degenerate {
        /// Position of the offending segment.
        index: usize,
    },
    /// A segment does not begin where its predecessor ends.
    #[error("segment {index} does not start where the previous segment ends")]
    Disconnected {
        /// Position of the offending segment.
        index: usize,
    },
}

/// Ordered chain of axis-aligned segments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Validates and wraps the provided segments.
    pub fn new(segments: Vec<Segment>) -> Result<Self, PathError> {
        if segments.is_empty() {
            return Err(PathError::Empty);
        }

        for (index, segment) in segments.iter().enumerate() {
            let (start, end) = (segment.start(), segment.end());
            if start == end {
                return Err(PathError::Degenerate { index });
            }
            if start.x != end.x && start.y != end.y {
                return Err(PathError::Diagonal { index });
            }
        }

        for (index, pair) in segments.windows(2).enumerate() {
            if pair[0].end() != pair[1].start() {
                return Err(PathError::Disconnected { index: index + 1 });
            }
        }

        Ok(Self { segments })
    }

    /// Builds a path visiting the waypoints in order.
    pub fn from_waypoints(waypoints: &[Point]) -> Result<Self, PathError> {
        Self::new(chain(waypoints))
    }

    /// The five-segment zigzag route monsters follow.
    #[must_use]
    pub fn zigzag() -> Self {
        Self {
            segments: chain(&ZIGZAG_WAYPOINTS),
        }
    }

    /// Number of segments in the path.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Segment at the provided index, if any.
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<Segment> {
        self.segments.get(index).copied()
    }

    /// All segments in travel order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Point where monsters enter the path.
    #[must_use]
    pub fn start(&self) -> Point {
        self.segments
            .first()
            .map_or_else(Point::default, Segment::start)
    }

    /// Reports whether the point lies along the long axis of the indexed
    /// segment. Indices past the end never contain anything.
    #[must_use]
    pub fn contains(&self, index: usize, point: Point) -> bool {
        self.segments
            .get(index)
            .is_some_and(|segment| segment.contains(point))
    }

    /// Per-tick displacement along the indexed segment for a monster with the
    /// given speed multiplier.
    #[must_use]
    pub fn movement_vector(&self, index: usize, speed: u32) -> Option<Vector> {
        self.segments
            .get(index)
            .map(|segment| segment.movement_vector(speed))
    }
}

fn chain(waypoints: &[Point]) -> Vec<Segment> {
    waypoints
        .windows(2)
        .map(|pair| Segment::new(pair[0], pair[1]))
        .collect()
}
