//! Board coordinates and orthogonal directions.
//!
//! Tiles are addressed by `(row, col)`. The text form is the column letter
//! followed by the 1-based row number, so `a1` is row 0, column 0.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Largest board edge the notation can address (`a`..`z`).
pub const MAX_BOARD_SIZE: u8 = 26;

/// Errors that can occur while parsing tile notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordError {
    #[error("empty tile notation")]
    Empty,

    #[error("invalid column letter: '{0}'")]
    InvalidColumn(char),

    #[error("invalid row number: '{0}'")]
    InvalidRow(String),
}

/// A tile coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    pub const fn new(row: u8, col: u8) -> Self {
        Coord { row, col }
    }

    /// Returns the coordinate one step in `dir`, or None if that would leave
    /// the non-negative quadrant. Upper bounds are the board's concern.
    pub fn step(self, dir: Direction) -> Option<Coord> {
        let (dr, dc) = dir.delta();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Some(Coord { row, col })
    }

    /// Returns the direction and distance from `self` to `other` if the two
    /// lie on the same row or column and differ.
    pub fn line_to(self, other: Coord) -> Option<(Direction, u8)> {
        let dr = other.row as i16 - self.row as i16;
        let dc = other.col as i16 - self.col as i16;
        match (dr, dc) {
            (0, 0) => None,
            (0, c) if c > 0 => Some((Direction::Right, c as u8)),
            (0, c) => Some((Direction::Left, (-c) as u8)),
            (r, 0) if r > 0 => Some((Direction::Down, r as u8)),
            (r, 0) => Some((Direction::Up, (-r) as u8)),
            _ => None,
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, self.row as u16 + 1)
    }
}

impl FromStr for Coord {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let letter = chars.next().ok_or(CoordError::Empty)?;
        let lower = letter.to_ascii_lowercase();
        if !lower.is_ascii_lowercase() {
            return Err(CoordError::InvalidColumn(letter));
        }
        let col = lower as u8 - b'a';

        let digits = chars.as_str();
        let row: u8 = digits
            .parse()
            .map_err(|_| CoordError::InvalidRow(digits.to_string()))?;
        if row == 0 || row > MAX_BOARD_SIZE {
            return Err(CoordError::InvalidRow(digits.to_string()));
        }
        Ok(Coord { row: row - 1, col })
    }
}

impl TryFrom<String> for Coord {
    type Error = CoordError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Coord> for String {
    fn from(c: Coord) -> String {
        c.to_string()
    }
}

/// One of the four orthogonal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Neighbor scan order used by capture resolution and king checks.
pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Left,
    Direction::Right,
    Direction::Up,
    Direction::Down,
];

impl Direction {
    /// Row and column offsets for one step.
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}
