//! Parsing of `kind@x,y` tower placements supplied on the command line.

use std::{fmt, str::FromStr};

use path_defence_core::{Point, TowerKind};
use thiserror::Error;

/// Separates the tower kind from its coordinates.
const KIND_DELIMITER: char = '@';
/// Separates the two coordinates.
const COORDINATE_DELIMITER: char = ',';

/// Tower requested by the player before the first tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TowerPlacement {
    /// Kind of tower to build.
    pub(crate) kind: TowerKind,
    /// Center of the tower.
    pub(crate) position: Point,
}

/// Errors raised while parsing a [`TowerPlacement`].
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum PlacementParseError {
    /// The value did not contain the `@` delimiter.
    #[error("expected `kind@x,y`, got `{0}`")]
    MissingDelimiter(String),
    /// The kind was neither `basic` nor `advanced`.
    #[error("unknown tower kind `{0}`; expected `basic` or `advanced`")]
    UnknownKind(String),
    /// The coordinates were not two comma separated integers.
    #[error("invalid coordinates `{0}`; expected `x,y`")]
    InvalidCoordinates(String),
}

impl FromStr for TowerPlacement {
    type Err = PlacementParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (kind, coordinates) = trimmed
            .split_once(KIND_DELIMITER)
            .ok_or_else(|| PlacementParseError::MissingDelimiter(trimmed.to_owned()))?;

        let kind = match kind.trim().to_ascii_lowercase().as_str() {
            "basic" => TowerKind::Basic,
            "advanced" => TowerKind::Advanced,
            other => return Err(PlacementParseError::UnknownKind(other.to_owned())),
        };

        let invalid = || PlacementParseError::InvalidCoordinates(coordinates.to_owned());
        let (x, y) = coordinates
            .split_once(COORDINATE_DELIMITER)
            .ok_or_else(invalid)?;
        let x: i32 = x.trim().parse().map_err(|_| invalid())?;
        let y: i32 = y.trim().parse().map_err(|_| invalid())?;

        Ok(Self {
            kind,
            position: Point::new(x, y),
        })
    }
}

impl fmt::Display for TowerPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            TowerKind::Basic => "basic",
            TowerKind::Advanced => "advanced",
        };
        write!(f, "{kind}@{},{}", self.position.x, self.position.y)
    }
}
