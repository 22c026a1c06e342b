//! TFEN (Tafl FEN) encoding and decoding.
//!
//! TFEN is a single-token position notation in the spirit of chess FEN.
//!
//! Format: `<row>,<row>,...,<row>/<side>`
//!
//! Rows run from the first board row (`a1`'s row) onward. Within a row, `a`
//! is an attacker, `d` a defender, `k` the king, and a decimal number is a
//! run of empty tiles. The side to move is `a` or `d`. The board is square
//! with as many columns as there are rows; the throne sits in the centre and
//! the corners are the four board corners, so the row count must be odd.

use crate::board::{ConfigError, Coord, MatchConfig, PieceKind, Position, Side};

/// Errors that can occur during TFEN parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TfenError {
    #[error("expected 2 sections separated by '/', got {0}")]
    WrongSectionCount(usize),

    #[error("invalid side to move: '{0}'")]
    InvalidSide(String),

    #[error("row {0} is empty")]
    EmptyRow(usize),

    #[error("invalid piece character: '{0}'")]
    InvalidPiece(char),

    #[error("invalid empty run: '{0}'")]
    InvalidRun(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Expands one TFEN row into a diagram row of `.`, `a`, `d`, `k`.
fn expand_row(index: usize, row: &str) -> Result<String, TfenError> {
    if row.is_empty() {
        return Err(TfenError::EmptyRow(index));
    }
    let mut out = String::new();
    let mut digits = String::new();
    for ch in row.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        flush_run(&mut digits, &mut out)?;
        if PieceKind::from_tfen_char(ch).is_none() {
            return Err(TfenError::InvalidPiece(ch));
        }
        out.push(ch);
    }
    flush_run(&mut digits, &mut out)?;
    Ok(out)
}

fn flush_run(digits: &mut String, out: &mut String) -> Result<(), TfenError> {
    if digits.is_empty() {
        return Ok(());
    }
    let n: usize = digits
        .parse()
        .ok()
        .filter(|n| (1..=26).contains(n))
        .ok_or_else(|| TfenError::InvalidRun(digits.clone()))?;
    out.extend(std::iter::repeat('.').take(n));
    digits.clear();
    Ok(())
}

/// Parses a TFEN string into a validated match configuration.
///
/// Rule flags and timing take their defaults; the caller may override them.
pub fn parse_tfen(s: &str) -> Result<MatchConfig, TfenError> {
    let sections: Vec<&str> = s.trim().split('/').collect();
    if sections.len() != 2 {
        return Err(TfenError::WrongSectionCount(sections.len()));
    }

    let side = match sections[1] {
        "a" => Side::Attacker,
        "d" => Side::Defender,
        other => return Err(TfenError::InvalidSide(other.to_string())),
    };

    let rows = sections[0]
        .split(',')
        .enumerate()
        .map(|(i, row)| expand_row(i, row))
        .collect::<Result<Vec<_>, _>>()?;

    let config = MatchConfig::from_rows(&rows, side)?;
    config.validate()?;
    Ok(config)
}

/// Encodes the current occupancy of `position` with `side` to move.
pub fn encode_tfen(position: &Position, side: Side) -> String {
    let board = position.board();
    let size = board.size();
    let mut rows = Vec::with_capacity(size as usize);

    for row in 0..size {
        let mut encoded = String::new();
        let mut empty = 0u32;
        for col in 0..size {
            match position.occupant(Coord::new(row, col)) {
                Some(piece) => {
                    if empty > 0 {
                        encoded.push_str(&empty.to_string());
                        empty = 0;
                    }
                    encoded.push(piece.kind.tfen_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            encoded.push_str(&empty.to_string());
        }
        rows.push(encoded);
    }

    let side_char = match side {
        Side::Attacker => 'a',
        Side::Defender => 'd',
    };
    format!("{}/{}", rows.join(","), side_char)
}
