//! Move legality.
//!
//! Pieces move like rooks: any distance along a row or column, never
//! diagonally, never through another piece. Thrones and corners are
//! reserved for the king.

use crate::board::{Coord, PieceId, Position, Rules, Side};

/// Why a proposed move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMove {
    #[error("unknown piece {0}")]
    UnknownPiece(PieceId),

    #[error("piece {0} has been captured")]
    PieceCaptured(PieceId),

    #[error("no piece on {0}")]
    NoPieceAt(Coord),

    #[error("piece {piece} does not belong to the {side} side")]
    NotYourPiece { piece: PieceId, side: Side },

    #[error("{0} is off the board")]
    OffBoard(Coord),

    #[error("piece must move to a different tile")]
    NoMovement,

    #[error("destination {0} is occupied")]
    DestinationOccupied(Coord),

    #[error("only the king may enter {0}")]
    RestrictedTile(Coord),

    #[error("pieces move along a single row or column")]
    NotStraight,

    #[error("path blocked at {0}")]
    PathBlocked(Coord),
}

/// Checks whether `id` may move to `dest`. No state is touched.
pub fn check_move(position: &Position, id: PieceId, dest: Coord, rules: &Rules) -> Result<(), IllegalMove> {
    let piece = position.piece(id).ok_or(IllegalMove::UnknownPiece(id))?;
    let origin = match piece.tile {
        Some(t) if piece.alive => t,
        _ => return Err(IllegalMove::PieceCaptured(id)),
    };

    let board = position.board();
    let dest_kind = board.kind(dest).ok_or(IllegalMove::OffBoard(dest))?;
    if dest == origin {
        return Err(IllegalMove::NoMovement);
    }
    if board.occupant(dest).is_some() {
        return Err(IllegalMove::DestinationOccupied(dest));
    }

    if dest_kind.is_restricted() {
        if !piece.kind.is_king() {
            return Err(IllegalMove::RestrictedTile(dest));
        }
        if rules.king_special_shortcut {
            return Ok(());
        }
    }

    let (dir, distance) = origin.line_to(dest).ok_or(IllegalMove::NotStraight)?;

    // Walk the intervening tiles; the destination itself was checked above.
    let mut cursor = origin;
    for _ in 1..distance {
        cursor = board
            .neighbor(cursor, dir)
            .expect("path between two on-board tiles stays on the board");
        if board.occupant(cursor).is_some() {
            return Err(IllegalMove::PathBlocked(cursor));
        }
    }
    Ok(())
}

/// Boolean form of `check_move`.
pub fn can_move(position: &Position, id: PieceId, dest: Coord, rules: &Rules) -> bool {
    check_move(position, id, dest, rules).is_ok()
}

/// Every tile the piece may legally move to, in row-major order.
///
/// Returns an empty vec for unknown or captured pieces.
pub fn legal_destinations(position: &Position, id: PieceId, rules: &Rules) -> Vec<Coord> {
    let Some(origin) = position.piece(id).and_then(|p| p.tile) else {
        return Vec::new();
    };
    let board = position.board();
    let is_king = position.piece(id).is_some_and(|p| p.kind.is_king());

    board
        .coords()
        .filter(|c| {
            let on_line = c.row == origin.row || c.col == origin.col;
            let special = is_king && board.kind(*c).is_some_and(|k| k.is_restricted());
            on_line || special
        })
        .filter(|c| can_move(position, id, *c, rules))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{MatchConfig, Side};

    fn position(rows: &[&str]) -> Position {
        Position::from_config(&MatchConfig::from_rows(rows, Side::Attacker).unwrap()).unwrap()
    }

    fn id_at(pos: &Position, s: &str) -> PieceId {
        pos.board().occupant(s.parse().unwrap()).unwrap()
    }

    fn c(s: &str) -> Coord {
        s.parse().unwrap()
    }

    const OPEN: [&str; 7] = [
        ".......",
        "...a...",
        ".......",
        "...k...",
        ".......",
        ".d.....",
        ".......",
    ];

    #[test]
    fn rook_moves_allowed() {
        let pos = position(&OPEN);
        let rules = Rules::default();
        let a = id_at(&pos, "d2");
        assert_eq!(check_move(&pos, a, c("g2"), &rules), Ok(()));
        assert_eq!(check_move(&pos, a, c("d3"), &rules), Ok(()));
        assert_eq!(check_move(&pos, a, c("d1"), &rules), Ok(()));
    }

    #[test]
    fn diagonal_rejected() {
        let pos = position(&OPEN);
        let a = id_at(&pos, "d2");
        assert_eq!(
            check_move(&pos, a, c("e3"), &Rules::default()),
            Err(IllegalMove::NotStraight)
        );
    }

    #[test]
    fn blocked_path_rejected() {
        let pos = position(&OPEN);
        let a = id_at(&pos, "d2");
        assert_eq!(
            check_move(&pos, a, c("d6"), &Rules::default()),
            Err(IllegalMove::PathBlocked(c("d4")))
        );
    }

    #[test]
    fn occupied_destination_rejected() {
        let pos = position(&OPEN);
        let a = id_at(&pos, "d2");
        assert_eq!(
            check_move(&pos, a, c("d4"), &Rules::default()),
            Err(IllegalMove::DestinationOccupied(c("d4")))
        );
        assert_eq!(check_move(&pos, a, c("d2"), &Rules::default()), Err(IllegalMove::NoMovement));
        assert_eq!(
            check_move(&pos, a, c("d9"), &Rules::default()),
            Err(IllegalMove::OffBoard(c("d9")))
        );
    }

    #[test]
    fn non_king_cannot_enter_special_tiles() {
        let pos = position(&OPEN);
        let d = id_at(&pos, "b6");
        assert_eq!(
            check_move(&pos, d, c("a7"), &Rules::default()),
            Err(IllegalMove::RestrictedTile(c("a7")))
        );
    }

    #[test]
    fn king_shortcut_to_corner() {
        let pos = position(&OPEN);
        let k = id_at(&pos, "d4");
        // Not on a line with the corner, but the shortcut allows it.
        assert_eq!(check_move(&pos, k, c("a1"), &Rules::default()), Ok(()));

        let strict = Rules {
            king_special_shortcut: false,
            ..Rules::default()
        };
        assert_eq!(check_move(&pos, k, c("a1"), &strict), Err(IllegalMove::NotStraight));
    }

    #[test]
    fn king_may_return_to_throne() {
        let rows = [
            ".......",
            ".......",
            ".......",
            ".......",
            "...k...",
            "...a...",
            ".......",
        ];
        let pos = position(&rows);
        let k = id_at(&pos, "d5");
        assert_eq!(check_move(&pos, k, c("d4"), &Rules::default()), Ok(()));
    }

    #[test]
    fn pieces_pass_over_empty_throne() {
        let rows = [
            ".......",
            ".......",
            ".......",
            "a......",
            ".......",
            ".......",
            "...k...",
        ];
        let pos = position(&rows);
        let a = id_at(&pos, "a4");
        assert_eq!(check_move(&pos, a, c("g4"), &Rules::default()), Ok(()));
    }

    #[test]
    fn captured_and_unknown_pieces() {
        let mut pos = position(&OPEN);
        let a = id_at(&pos, "d2");
        pos.capture(a);
        assert_eq!(
            check_move(&pos, a, c("e2"), &Rules::default()),
            Err(IllegalMove::PieceCaptured(a))
        );
        assert_eq!(
            check_move(&pos, PieceId(99), c("e2"), &Rules::default()),
            Err(IllegalMove::UnknownPiece(PieceId(99)))
        );
        assert!(legal_destinations(&pos, a, &Rules::default()).is_empty());
    }

    #[test]
    fn destinations_match_validator() {
        let pos = position(&OPEN);
        let rules = Rules::default();
        let a = id_at(&pos, "d2");
        let dests = legal_destinations(&pos, a, &rules);
        // Row 2 minus its own tile (6), plus d1 and d3 on the column.
        assert_eq!(dests.len(), 8);
        assert!(dests.contains(&c("d1")));
        assert!(!dests.contains(&c("d5")));

        let k = id_at(&pos, "d4");
        let king_dests = legal_destinations(&pos, k, &rules);
        for corner in pos.board().corners() {
            assert!(king_dests.contains(&corner));
        }
    }
}
