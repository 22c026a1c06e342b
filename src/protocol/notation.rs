//! Move notation.
//!
//! A move is written as origin and destination joined by a dash: `d1-d4`.

use crate::board::{Coord, CoordError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("expected '<from>-<to>', got '{0}'")]
    MissingSeparator(String),

    #[error(transparent)]
    Coord(#[from] CoordError),
}

/// Parses `d1-d4` into its origin and destination.
pub fn parse_move(s: &str) -> Result<(Coord, Coord), NotationError> {
    let (from, to) = s
        .trim()
        .split_once('-')
        .ok_or_else(|| NotationError::MissingSeparator(s.to_string()))?;
    Ok((from.parse()?, to.parse()?))
}

pub fn format_move(from: Coord, to: Coord) -> String {
    format!("{from}-{to}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_format() {
        let (from, to) = parse_move("d1-d4").unwrap();
        assert_eq!(from, Coord::new(0, 3));
        assert_eq!(to, Coord::new(3, 3));
        assert_eq!(format_move(from, to), "d1-d4");
        assert_eq!(parse_move(" K11-a11 ").unwrap().0, Coord::new(10, 10));
    }

    #[test]
    fn errors() {
        assert_eq!(
            parse_move("d1d4"),
            Err(NotationError::MissingSeparator("d1d4".to_string()))
        );
        assert_eq!(
            parse_move("d1-"),
            Err(NotationError::Coord(CoordError::Empty))
        );
        assert!(matches!(
            parse_move("d1-?4"),
            Err(NotationError::Coord(CoordError::InvalidColumn('?')))
        ));
    }
}
