//! Board representation and match setup.
//!
//! Contains coordinates, tiles, pieces and their registry, the board grid,
//! the synchronized position, and match configuration.

pub mod config;
pub mod coord;
pub mod piece;
pub mod position;
pub mod state;
pub mod tile;

pub use config::{
    ConfigError, HostileThrone, MatchConfig, Placement, Rules, DEFAULT_GAME_OVER_DISPLAY_MS,
    PRESET_NAMES,
};
pub use coord::{Coord, CoordError, Direction, ALL_DIRECTIONS, MAX_BOARD_SIZE};
pub use piece::{Piece, PieceId, PieceKind, PieceRegistry, Side, ALL_SIDES};
pub use position::Position;
pub use state::Board;
pub use tile::{Tile, TileKind};
