//! Eight-way direction classification for a normalized stick position

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stick direction derived from one tick's normalized reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    Center,
}

impl Direction {
    /// All eight non-center directions, clockwise from north
    pub const COMPASS: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Lowercase name used in config keys and log output
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::NorthEast => "northeast",
            Direction::East => "east",
            Direction::SouthEast => "southeast",
            Direction::South => "south",
            Direction::SouthWest => "southwest",
            Direction::West => "west",
            Direction::NorthWest => "northwest",
            Direction::Center => "center",
        }
    }

    /// True for the two directions the waggle gesture is built from
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::West | Direction::East)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a normalized stick position into one of nine directions
///
/// Diagonals are tested first and need both axes past the threshold.
/// Comparisons are strict, so a value sitting exactly on `threshold`
/// does not count as deflected.
///
/// # Arguments
/// * `x`, `y` - Normalized axis values in [-1.0, 1.0] (positive = east / north)
/// * `threshold` - Deflection threshold in (0.0, 1.0)
///
/// # Example
/// ```
/// use joystick_sounds::input::direction::{classify, Direction};
///
/// assert_eq!(classify(0.0, 0.0, 0.3), Direction::Center);
/// assert_eq!(classify(1.0, 0.0, 0.3), Direction::East);
/// assert_eq!(classify(-0.8, 0.9, 0.3), Direction::NorthWest);
/// ```
pub fn classify(x: f32, y: f32, threshold: f32) -> Direction {
    let right = x > threshold;
    let left = x < -threshold;
    let up = y > threshold;
    let down = y < -threshold;

    if right && up {
        Direction::NorthEast
    } else if right && down {
        Direction::SouthEast
    } else if left && up {
        Direction::NorthWest
    } else if left && down {
        Direction::SouthWest
    } else if right {
        Direction::East
    } else if left {
        Direction::West
    } else if up {
        Direction::North
    } else if down {
        Direction::South
    } else {
        Direction::Center
    }
}
