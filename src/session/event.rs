//! Notifications emitted for the presentation layer.
//!
//! `Display` renders each event as one protocol line.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::phase::Phase;
use crate::board::{Coord, PieceId, Side};
use crate::resolve::WinReason;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    PieceMoved { piece: PieceId, from: Coord, to: Coord },
    PieceCaptured { piece: PieceId, at: Coord },
    TurnChanged { side: Side },
    PhaseChanged { phase: Phase },
    MatchEnded { winner: Side, reason: WinReason },
    ReturnToMenu,
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::PieceMoved { piece, from, to } => write!(f, "moved {piece} {from} {to}"),
            GameEvent::PieceCaptured { piece, at } => write!(f, "captured {piece} {at}"),
            GameEvent::TurnChanged { side } => write!(f, "turn {side}"),
            GameEvent::PhaseChanged { phase } => write!(f, "phase {phase}"),
            GameEvent::MatchEnded { winner, reason } => write!(f, "winner {winner} {reason}"),
            GameEvent::ReturnToMenu => f.write_str("menu"),
        }
    }
}
