//! Tafl rules engine library.
//!
//! Exposes the board representation, move validation, capture and win
//! resolution, the match session, and the text protocol for use by
//! integration tests and the binary entry points.

pub mod board;
pub mod engine;
pub mod movegen;
pub mod protocol;
pub mod resolve;
pub mod selfplay;
pub mod session;
