//! Text protocol handling.
//!
//! This module implements parsing and serialization for the line-oriented
//! engine protocol: TFEN position encoding, move notation, and the command
//! parser for the main loop.

pub mod notation;
pub mod parser;
pub mod tfen;

pub use notation::{format_move, parse_move, NotationError};
pub use parser::{parse_command, Command};
pub use tfen::{encode_tfen, parse_tfen, TfenError};
