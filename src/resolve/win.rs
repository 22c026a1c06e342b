//! Win detection.
//!
//! The defenders win when the king stands on a corner. The attackers win
//! when the king is boxed in: attackers on all four sides, or on three
//! sides with the board edge as the fourth.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Position, Side, TileKind, ALL_DIRECTIONS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    KingEscaped,
    KingSurrounded,
    KingPinnedToEdge,
}

impl WinReason {
    pub fn name(self) -> &'static str {
        match self {
            WinReason::KingEscaped => "king_escaped",
            WinReason::KingSurrounded => "king_surrounded",
            WinReason::KingPinnedToEdge => "king_pinned_to_edge",
        }
    }
}

impl fmt::Display for WinReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The outcome of a finished match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Victory {
    pub winner: Side,
    pub reason: WinReason,
}

/// Decides whether the king's situation ends the match. Pure.
pub fn king_verdict(position: &Position) -> Option<Victory> {
    let king = position.king();
    let at = king.tile?;
    let board = position.board();

    if board.kind(at) == Some(TileKind::Corner) {
        return Some(Victory {
            winner: Side::Defender,
            reason: WinReason::KingEscaped,
        });
    }

    let mut attackers = 0;
    let mut on_edge = false;
    for dir in ALL_DIRECTIONS {
        match board.neighbor(at, dir) {
            None => on_edge = true,
            Some(n) => {
                if position.side_at(n) == Some(Side::Attacker) {
                    attackers += 1;
                }
            }
        }
    }

    let reason = match (attackers, on_edge) {
        (4, _) => WinReason::KingSurrounded,
        (3, true) => WinReason::KingPinnedToEdge,
        _ => return None,
    };
    Some(Victory {
        winner: Side::Attacker,
        reason,
    })
}

/// Checks for a winner and, on an attacker victory, takes the king.
pub fn evaluate_win(position: &mut Position) -> Option<Victory> {
    let victory = king_verdict(position)?;
    if victory.winner == Side::Attacker {
        let king = position.pieces().king_id();
        position.capture(king);
    }
    Some(victory)
}
