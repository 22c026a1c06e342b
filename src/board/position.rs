//! A board together with its pieces.
//!
//! `Position` is the only place where occupancy changes. Every mutation
//! updates both the tile occupant index and the piece's tile, so the two
//! never drift apart. A mismatch is a broken invariant and panics.

use super::config::{ConfigError, MatchConfig};
use super::coord::Coord;
use super::piece::{Piece, PieceId, PieceRegistry, Side};
use super::state::Board;
use super::tile::TileKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: Board,
    pieces: PieceRegistry,
}

impl Position {
    /// Validates the configuration and places every piece on its home tile.
    pub fn from_config(config: &MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new(config.size, config.throne, config.corners);
        let pieces = PieceRegistry::new(config.placements.iter().map(|p| (p.kind, p.at)))
            .ok_or(ConfigError::KingCount(0))?;
        let mut position = Position { board, pieces };
        position.place_all();
        Ok(position)
    }

    fn place_all(&mut self) {
        self.board.clear_occupants();
        for piece in self.pieces.iter() {
            if let Some(tile) = piece.tile {
                self.board.set_occupant(tile, Some(piece.id));
            }
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn pieces(&self) -> &PieceRegistry {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id)
    }

    pub fn king(&self) -> &Piece {
        self.pieces.king()
    }

    /// The piece standing on `c`, if any.
    pub fn occupant(&self, c: Coord) -> Option<&Piece> {
        self.board.occupant(c).and_then(|id| self.pieces.get(id))
    }

    pub fn side_at(&self, c: Coord) -> Option<Side> {
        self.occupant(c).map(Piece::side)
    }

    pub fn kind_at(&self, c: Coord) -> Option<TileKind> {
        self.board.kind(c)
    }

    /// Moves a living piece to an empty tile and returns its origin.
    ///
    /// Legality is the caller's business; this only maintains the links.
    pub fn move_piece(&mut self, id: PieceId, to: Coord) -> Coord {
        assert!(self.board.contains(to), "move target {to} is off the board");
        assert!(
            self.board.occupant(to).is_none(),
            "move target {to} is already occupied"
        );
        let piece = self
            .pieces
            .get_mut(id)
            .unwrap_or_else(|| panic!("unknown piece {id}"));
        let from = piece
            .tile
            .filter(|_| piece.alive)
            .unwrap_or_else(|| panic!("piece {id} is not on the board"));
        piece.tile = Some(to);

        assert_eq!(
            self.board.occupant(from),
            Some(id),
            "tile {from} does not hold piece {id}"
        );
        self.board.set_occupant(from, None);
        self.board.set_occupant(to, Some(id));
        from
    }

    /// Takes a piece off the board and returns the tile it stood on.
    pub fn capture(&mut self, id: PieceId) -> Coord {
        let piece = self
            .pieces
            .get_mut(id)
            .unwrap_or_else(|| panic!("unknown piece {id}"));
        let at = piece
            .tile
            .take()
            .unwrap_or_else(|| panic!("piece {id} captured twice"));
        piece.alive = false;

        assert_eq!(
            self.board.occupant(at),
            Some(id),
            "tile {at} does not hold piece {id}"
        );
        self.board.set_occupant(at, None);
        at
    }

    /// Returns every piece to its home tile.
    pub fn reset(&mut self) {
        self.pieces.reset();
        self.place_all();
    }

    /// Checks that tile occupants and piece tiles agree in both directions.
    pub fn assert_consistent(&self) {
        for piece in self.pieces.iter() {
            match (piece.alive, piece.tile) {
                (true, Some(t)) => assert_eq!(
                    self.board.occupant(t),
                    Some(piece.id),
                    "piece {} thinks it is on {t}",
                    piece.id
                ),
                (false, None) => {}
                (alive, tile) => panic!("piece {} has alive={alive} tile={tile:?}", piece.id),
            }
        }
        for c in self.board.coords() {
            if let Some(id) = self.board.occupant(c) {
                let tile = self.pieces.get(id).and_then(|p| p.tile);
                assert_eq!(tile, Some(c), "tile {c} holds piece {id} which is elsewhere");
            }
        }
    }
}
