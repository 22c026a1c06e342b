//! Sides, piece kinds, and the piece registry.
//!
//! Pieces live in an arena indexed by `PieceId`. A captured piece keeps its
//! slot (with `alive = false` and no tile) so the match can be reset.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::coord::Coord;

/// The two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Attacker,
    Defender,
}

pub const ALL_SIDES: [Side; 2] = [Side::Attacker, Side::Defender];

impl Side {
    pub const fn opponent(self) -> Side {
        match self {
            Side::Attacker => Side::Defender,
            Side::Defender => Side::Attacker,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Side::Attacker => "attacker",
            Side::Defender => "defender",
        }
    }

    /// Parses a side from its full name or its first letter.
    pub fn from_name(s: &str) -> Option<Side> {
        match s.to_ascii_lowercase().as_str() {
            "attacker" | "attackers" | "a" => Some(Side::Attacker),
            "defender" | "defenders" | "d" => Some(Side::Defender),
            _ => None,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Side::Attacker => 0,
            Side::Defender => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The kind of a piece. The king plays for the defenders but follows its own
/// movement and capture rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceKind {
    Attacker,
    Defender,
    King,
}

impl PieceKind {
    pub const fn side(self) -> Side {
        match self {
            PieceKind::Attacker => Side::Attacker,
            PieceKind::Defender | PieceKind::King => Side::Defender,
        }
    }

    pub const fn is_king(self) -> bool {
        matches!(self, PieceKind::King)
    }

    /// Single-character TFEN abbreviation.
    pub const fn tfen_char(self) -> char {
        match self {
            PieceKind::Attacker => 'a',
            PieceKind::Defender => 'd',
            PieceKind::King => 'k',
        }
    }

    pub fn from_tfen_char(c: char) -> Option<PieceKind> {
        match c {
            'a' => Some(PieceKind::Attacker),
            'd' => Some(PieceKind::Defender),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// Stable identifier of a piece for the whole match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(pub u16);

impl PieceId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A piece and its current placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    /// Starting tile, restored on reset.
    pub home: Coord,
    /// Current tile; None once captured.
    pub tile: Option<Coord>,
    pub alive: bool,
}

impl Piece {
    pub const fn side(&self) -> Side {
        self.kind.side()
    }
}

/// All pieces of a match plus a cached handle to the king.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceRegistry {
    pieces: Vec<Piece>,
    king: PieceId,
}

impl PieceRegistry {
    /// Builds a registry from `(kind, home)` pairs, assigning ids in order.
    ///
    /// Returns None unless exactly one king is present; configuration
    /// validation reports the detailed error before this is reached.
    pub fn new(placements: impl IntoIterator<Item = (PieceKind, Coord)>) -> Option<Self> {
        let pieces: Vec<Piece> = placements
            .into_iter()
            .enumerate()
            .map(|(i, (kind, home))| Piece {
                id: PieceId(i as u16),
                kind,
                home,
                tile: Some(home),
                alive: true,
            })
            .collect();

        let mut kings = pieces.iter().filter(|p| p.kind.is_king());
        let king = kings.next()?.id;
        if kings.next().is_some() {
            return None;
        }
        Some(PieceRegistry { pieces, king })
    }

    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(id.index())
    }

    pub fn king(&self) -> &Piece {
        &self.pieces[self.king.index()]
    }

    pub fn king_id(&self) -> PieceId {
        self.king
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }

    /// Living pieces that move for `side` (the king counts as a defender).
    pub fn alive_of(&self, side: Side) -> impl Iterator<Item = &Piece> {
        self.pieces
            .iter()
            .filter(move |p| p.alive && p.side() == side)
    }

    /// Ownership check used when a player selects a piece.
    pub fn belongs_to(&self, id: PieceId, side: Side) -> bool {
        self.get(id).is_some_and(|p| p.side() == side)
    }

    /// Restores every piece to its home tile and revives it.
    pub fn reset(&mut self) {
        for piece in &mut self.pieces {
            piece.tile = Some(piece.home);
            piece.alive = true;
        }
    }
}
