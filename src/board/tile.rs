//! Tile kinds and the read-only tile view.

use serde::{Deserialize, Serialize};

use super::coord::Coord;
use super::piece::PieceId;

/// The rules-relevant kind of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Normal,
    Throne,
    Corner,
}

impl TileKind {
    /// Throne and corner tiles are off-limits to everything but the king.
    pub const fn is_restricted(self) -> bool {
        matches!(self, TileKind::Throne | TileKind::Corner)
    }
}

/// A snapshot of one tile: where it is, what it is, and who stands on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub coord: Coord,
    pub kind: TileKind,
    pub occupant: Option<PieceId>,
}

impl Tile {
    pub const fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }
}
