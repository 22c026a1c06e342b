//! Custodian capture.
//!
//! After a move, each enemy piece orthogonally adjacent to the mover is
//! checked for a partner on its far side: a friendly piece, or an empty
//! hostile tile. The rule is side-asymmetric. An attacking mover only ever
//! captures defenders; a defending mover (king included) only ever captures
//! attackers. The king is never taken here, see `win`.

use serde::{Deserialize, Serialize};

use crate::board::{Coord, HostileThrone, PieceId, PieceKind, Position, Rules, TileKind, ALL_DIRECTIONS};

/// A piece removed by custodian capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    pub piece: PieceId,
    pub at: Coord,
}

/// Whether the tile at `c` acts as a capturing partner.
fn is_hostile_tile(position: &Position, c: Coord, rules: &Rules) -> bool {
    let empty = position.board().occupant(c).is_none();
    match position.kind_at(c) {
        Some(TileKind::Corner) => empty,
        Some(TileKind::Throne) => match rules.hostile_throne {
            HostileThrone::Never => false,
            HostileThrone::WhenEmpty => empty,
            HostileThrone::Always => true,
        },
        _ => false,
    }
}

/// Which neighbor kind a mover may capture, and which far-side kinds count
/// as its allies.
fn capture_roles(mover: PieceKind) -> (PieceKind, &'static [PieceKind]) {
    match mover {
        PieceKind::Attacker => (PieceKind::Defender, &[PieceKind::Attacker]),
        PieceKind::Defender | PieceKind::King => {
            (PieceKind::Attacker, &[PieceKind::Defender, PieceKind::King])
        }
    }
}

/// Lists the pieces the piece `mover` captures from where it stands, in
/// Left, Right, Up, Down order. Does not modify the position.
pub fn find_captures(position: &Position, mover: PieceId, rules: &Rules) -> Vec<Capture> {
    let Some(piece) = position.piece(mover).filter(|p| p.alive) else {
        return Vec::new();
    };
    let Some(origin) = piece.tile else {
        return Vec::new();
    };
    let (target, allies) = capture_roles(piece.kind);
    let board = position.board();

    let mut captures = Vec::new();
    for dir in ALL_DIRECTIONS {
        let Some(near) = board.neighbor(origin, dir) else { continue };
        let Some(victim) = position.occupant(near) else { continue };
        if victim.kind != target {
            continue;
        }
        let Some(far) = board.neighbor(near, dir) else { continue };

        let ally_beyond = position.occupant(far).is_some_and(|p| allies.contains(&p.kind));
        if ally_beyond || is_hostile_tile(position, far, rules) {
            captures.push(Capture {
                piece: victim.id,
                at: near,
            });
        }
    }
    captures
}

/// Finds and removes every piece captured by `mover`.
pub fn resolve_captures(position: &mut Position, mover: PieceId, rules: &Rules) -> Vec<Capture> {
    let captures = find_captures(position, mover, rules);
    for capture in &captures {
        let at = position.capture(capture.piece);
        debug_assert_eq!(at, capture.at);
        tracing::debug!(piece = %capture.piece, tile = %at, "captured");
    }
    captures
}
