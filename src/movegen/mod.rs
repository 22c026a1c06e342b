//! Legal move generation.
//!
//! Validates single moves and enumerates every legal move for a side.

pub mod movement;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Coord, PieceId, Position, Rules, Side};

pub use movement::{can_move, check_move, legal_destinations, IllegalMove};

/// A piece and the tile it moves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub piece: PieceId,
    pub from: Coord,
    pub to: Coord,
}

/// Lists every legal move for `side`, ordered by piece id then destination.
pub fn legal_moves(position: &Position, side: Side, rules: &Rules) -> Vec<Move> {
    let mut moves = Vec::new();
    for piece in position.pieces().alive_of(side) {
        let Some(from) = piece.tile else { continue };
        for to in legal_destinations(position, piece.id, rules) {
            moves.push(Move {
                piece: piece.id,
                from,
                to,
            });
        }
    }
    moves
}

/// Picks a uniformly random legal move for `side`, or None if it has none.
pub fn random_move(position: &Position, side: Side, rules: &Rules, rng: &mut impl Rng) -> Option<Move> {
    let moves = legal_moves(position, side, rules);
    if moves.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..moves.len());
    Some(moves[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::MatchConfig;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn brandubh() -> Position {
        Position::from_config(&MatchConfig::preset("brandubh").unwrap()).unwrap()
    }

    #[test]
    fn opening_moves_are_legal() {
        let pos = brandubh();
        let rules = Rules::default();
        for side in [Side::Attacker, Side::Defender] {
            let moves = legal_moves(&pos, side, &rules);
            assert!(!moves.is_empty());
            for m in &moves {
                assert_eq!(pos.piece(m.piece).unwrap().side(), side);
                assert_eq!(check_move(&pos, m.piece, m.to, &rules), Ok(()));
            }
        }
    }

    #[test]
    fn king_boxed_in_at_start() {
        let pos = brandubh();
        let rules = Rules::default();
        let king = pos.king().id;
        // Only the shortcut to the corners is open to the surrounded king.
        let dests = legal_destinations(&pos, king, &rules);
        let mut corners = pos.board().corners().to_vec();
        corners.sort();
        assert_eq!(dests, corners);
    }

    #[test]
    fn random_move_is_deterministic_per_seed() {
        let pos = brandubh();
        let rules = Rules::default();
        let a = random_move(&pos, Side::Attacker, &rules, &mut SmallRng::seed_from_u64(7));
        let b = random_move(&pos, Side::Attacker, &rules, &mut SmallRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(a.is_some());
    }
}
