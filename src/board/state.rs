//! Board topology and occupancy.
//!
//! Tile kinds and occupants are stored in flat vectors indexed by
//! `row * size + col`, so lookups and neighbor queries are O(1). Topology is
//! fixed at construction; only the occupant index changes during play.

use super::coord::{Coord, Direction};
use super::piece::PieceId;
use super::tile::{Tile, TileKind};

/// A square grid of tiles with one throne and four corners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: u8,
    throne: Coord,
    corners: [Coord; 4],
    kinds: Vec<TileKind>,
    occupants: Vec<Option<PieceId>>,
}

impl Board {
    /// Creates an empty board. Callers validate the coordinates beforehand.
    pub fn new(size: u8, throne: Coord, corners: [Coord; 4]) -> Self {
        let n = size as usize * size as usize;
        let mut board = Board {
            size,
            throne,
            corners,
            kinds: vec![TileKind::Normal; n],
            occupants: vec![None; n],
        };
        let throne_idx = board.index(throne);
        board.kinds[throne_idx] = TileKind::Throne;
        for corner in corners {
            let idx = board.index(corner);
            board.kinds[idx] = TileKind::Corner;
        }
        board
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn throne(&self) -> Coord {
        self.throne
    }

    pub fn corners(&self) -> [Coord; 4] {
        self.corners
    }

    pub fn contains(&self, c: Coord) -> bool {
        c.row < self.size && c.col < self.size
    }

    fn index(&self, c: Coord) -> usize {
        debug_assert!(self.contains(c), "{} outside {}x{} board", c, self.size, self.size);
        c.row as usize * self.size as usize + c.col as usize
    }

    /// Looks up a tile by row and column.
    pub fn tile_at(&self, row: u8, col: u8) -> Option<Tile> {
        self.tile(Coord::new(row, col))
    }

    pub fn tile(&self, c: Coord) -> Option<Tile> {
        if !self.contains(c) {
            return None;
        }
        let idx = self.index(c);
        Some(Tile {
            coord: c,
            kind: self.kinds[idx],
            occupant: self.occupants[idx],
        })
    }

    /// Kind of the tile at `c`; off-board coordinates read as None.
    pub fn kind(&self, c: Coord) -> Option<TileKind> {
        self.contains(c).then(|| self.kinds[self.index(c)])
    }

    pub fn occupant(&self, c: Coord) -> Option<PieceId> {
        if !self.contains(c) {
            return None;
        }
        self.occupants[self.index(c)]
    }

    pub fn is_empty_at(&self, c: Coord) -> bool {
        self.contains(c) && self.occupant(c).is_none()
    }

    /// The adjacent coordinate in `dir`, or None at the board edge.
    pub fn neighbor(&self, c: Coord, dir: Direction) -> Option<Coord> {
        c.step(dir).filter(|n| self.contains(*n))
    }

    pub fn neighbor_up(&self, c: Coord) -> Option<Tile> {
        self.neighbor(c, Direction::Up).and_then(|n| self.tile(n))
    }

    pub fn neighbor_down(&self, c: Coord) -> Option<Tile> {
        self.neighbor(c, Direction::Down).and_then(|n| self.tile(n))
    }

    pub fn neighbor_left(&self, c: Coord) -> Option<Tile> {
        self.neighbor(c, Direction::Left).and_then(|n| self.tile(n))
    }

    pub fn neighbor_right(&self, c: Coord) -> Option<Tile> {
        self.neighbor(c, Direction::Right).and_then(|n| self.tile(n))
    }

    /// Iterates over every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Coord::new(row, col)))
    }

    pub(crate) fn set_occupant(&mut self, c: Coord, occupant: Option<PieceId>) {
        let idx = self.index(c);
        self.occupants[idx] = occupant;
    }

    pub(crate) fn clear_occupants(&mut self) {
        self.occupants.iter_mut().for_each(|o| *o = None);
    }
}
