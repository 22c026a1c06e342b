//! Match sequencing.
//!
//! `GameSession` owns the position and drives a match through its phases:
//! setup, play (with pauses), and game over. Moves are validated, committed,
//! and followed by capture resolution and the win check. Every observable
//! change is queued as a `GameEvent` for the caller to drain.

pub mod event;
pub mod phase;
pub mod turn;

use std::time::Duration;

use tracing::{debug, info};

use crate::board::{ConfigError, Coord, MatchConfig, PieceId, Position, Rules, Side};
use crate::movegen::{check_move, IllegalMove};
use crate::resolve::{evaluate_win, resolve_captures, Capture, Victory};

pub use event::GameEvent;
pub use phase::{transition, Phase, PhaseEvent, PhaseViolation};
pub use turn::TurnController;

/// Why `submit_move` refused a move. Nothing changes on either variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error(transparent)]
    Illegal(#[from] IllegalMove),

    #[error(transparent)]
    Phase(#[from] PhaseViolation),
}

/// What an accepted move did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    pub piece: PieceId,
    pub from: Coord,
    pub to: Coord,
    pub captures: Vec<Capture>,
    pub victory: Option<Victory>,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    config: MatchConfig,
    position: Position,
    phase: Phase,
    phase_elapsed: Duration,
    turn: TurnController,
    winner: Option<Victory>,
    last_moved: Option<PieceId>,
    menu_signalled: bool,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Validates `config` and sets up the board. The session starts in
    /// `Phase::Setup` with input disabled.
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        let position = Position::from_config(&config)?;
        Ok(GameSession {
            turn: TurnController::new(config.first_side),
            config,
            position,
            phase: Phase::Setup,
            phase_elapsed: Duration::ZERO,
            winner: None,
            last_moved: None,
            menu_signalled: false,
            events: Vec::new(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Time spent in the current phase, as fed through `advance_clock`.
    pub fn phase_elapsed(&self) -> Duration {
        self.phase_elapsed
    }

    pub fn active_side(&self) -> Side {
        self.turn.active()
    }

    pub fn winner(&self) -> Option<Victory> {
        self.winner
    }

    pub fn last_moved(&self) -> Option<PieceId> {
        self.last_moved
    }

    pub fn input_enabled(&self, side: Side) -> bool {
        self.turn.input_enabled(side)
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn rules(&self) -> &Rules {
        &self.config.rules
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Takes all queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn apply(&mut self, event: PhaseEvent) -> Result<(), PhaseViolation> {
        let next = transition(self.phase, event)?;
        self.change_phase(next, event);
        Ok(())
    }

    fn change_phase(&mut self, next: Phase, event: PhaseEvent) {
        self.exit_phase();
        info!(from = %self.phase, to = %next, %event, "phase change");
        self.phase = next;
        self.enter_phase();
    }

    fn exit_phase(&mut self) {
        if self.phase == Phase::GameOver {
            self.menu_signalled = false;
        }
    }

    fn enter_phase(&mut self) {
        self.phase_elapsed = Duration::ZERO;
        match self.phase {
            Phase::InProgress => self.turn.enable_active(),
            Phase::Setup | Phase::Paused | Phase::GameOver => self.turn.disable_all(),
        }
        self.events.push(GameEvent::PhaseChanged { phase: self.phase });
    }

    /// Begins play with the configured side to move.
    pub fn start(&mut self) -> Result<(), PhaseViolation> {
        self.apply(PhaseEvent::Start)?;
        self.events.push(GameEvent::TurnChanged {
            side: self.turn.active(),
        });
        Ok(())
    }

    pub fn request_pause(&mut self) -> Result<(), PhaseViolation> {
        self.apply(PhaseEvent::Pause)
    }

    pub fn request_resume(&mut self) -> Result<(), PhaseViolation> {
        self.apply(PhaseEvent::Resume)
    }

    /// Moves the piece standing on `from`.
    pub fn submit_move_from(&mut self, from: Coord, to: Coord) -> Result<MoveReport, MoveError> {
        self.ensure_playing()?;
        let piece = self
            .position
            .board()
            .occupant(from)
            .ok_or(IllegalMove::NoPieceAt(from))?;
        self.submit_move(piece, to)
    }

    fn ensure_playing(&self) -> Result<(), PhaseViolation> {
        if self.phase == Phase::InProgress {
            Ok(())
        } else {
            Err(PhaseViolation::MoveOutsidePlay(self.phase))
        }
    }

    /// Validates and commits a move by the side to move, then resolves
    /// captures and checks for a winner. The turn passes to the other side
    /// unless the move ended the match.
    pub fn submit_move(&mut self, piece: PieceId, to: Coord) -> Result<MoveReport, MoveError> {
        self.ensure_playing()?;
        let side = self.turn.active();
        if !self.turn.input_enabled(side) {
            return Err(PhaseViolation::MoveOutsidePlay(self.phase).into());
        }
        let owner = self
            .position
            .piece(piece)
            .ok_or(IllegalMove::UnknownPiece(piece))?
            .side();
        if owner != side {
            return Err(IllegalMove::NotYourPiece { piece, side }.into());
        }
        check_move(&self.position, piece, to, &self.config.rules)?;

        let from = self.position.move_piece(piece, to);
        self.last_moved = Some(piece);
        debug!(%side, %piece, %from, %to, "move");
        self.events.push(GameEvent::PieceMoved { piece, from, to });

        let captures = resolve_captures(&mut self.position, piece, &self.config.rules);
        self.events.extend(captures.iter().map(|c| GameEvent::PieceCaptured {
            piece: c.piece,
            at: c.at,
        }));

        let king = self.position.king();
        let (king_id, king_tile) = (king.id, king.tile);
        let victory = evaluate_win(&mut self.position);
        match victory {
            Some(v) => self.finish(v, king_id, king_tile),
            None => {
                let next = self.turn.flip();
                self.events.push(GameEvent::TurnChanged { side: next });
            }
        }

        Ok(MoveReport {
            piece,
            from,
            to,
            captures,
            victory,
        })
    }

    fn finish(&mut self, victory: Victory, king: PieceId, king_tile: Option<Coord>) {
        if victory.winner == Side::Attacker {
            if let Some(at) = king_tile {
                self.events.push(GameEvent::PieceCaptured { piece: king, at });
            }
        }
        info!(winner = %victory.winner, reason = %victory.reason, "match ended");
        self.winner = Some(victory);
        self.events.push(GameEvent::MatchEnded {
            winner: victory.winner,
            reason: victory.reason,
        });
        let next = transition(self.phase, PhaseEvent::Win).unwrap_or(Phase::GameOver);
        self.change_phase(next, PhaseEvent::Win);
    }

    /// Feeds elapsed time into the phase timer. Returns true on the tick
    /// where the game-over display period runs out and `ReturnToMenu` is
    /// queued; this happens once per game over.
    pub fn advance_clock(&mut self, dt: Duration) -> bool {
        self.phase_elapsed = self.phase_elapsed.saturating_add(dt);
        let display = Duration::from_millis(self.config.game_over_display_ms);
        if self.phase == Phase::GameOver && !self.menu_signalled && self.phase_elapsed >= display {
            self.menu_signalled = true;
            info!("returning to menu");
            self.events.push(GameEvent::ReturnToMenu);
            return true;
        }
        false
    }

    /// Puts every piece back on its starting tile and returns to setup.
    pub fn reset_match(&mut self) {
        self.position.reset();
        self.winner = None;
        self.last_moved = None;
        self.turn = TurnController::new(self.config.first_side);
        let next = transition(self.phase, PhaseEvent::Reset).unwrap_or(Phase::Setup);
        self.change_phase(next, PhaseEvent::Reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(s: &str) -> Coord {
        s.parse().unwrap()
    }

    fn session(rows: &[&str], first: Side) -> GameSession {
        GameSession::new(MatchConfig::from_rows(rows, first).unwrap()).unwrap()
    }

    fn brandubh() -> GameSession {
        GameSession::new(MatchConfig::preset("brandubh").unwrap()).unwrap()
    }

    #[test]
    fn new_session_waits_in_setup() {
        let mut s = brandubh();
        assert_eq!(s.phase(), Phase::Setup);
        assert!(!s.input_enabled(Side::Attacker));
        assert_eq!(
            s.submit_move_from(c("d1"), c("b1")),
            Err(MoveError::Phase(PhaseViolation::MoveOutsidePlay(Phase::Setup)))
        );
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn start_enables_first_side() {
        let mut s = brandubh();
        s.start().unwrap();
        assert_eq!(s.phase(), Phase::InProgress);
        assert!(s.input_enabled(Side::Attacker));
        assert!(!s.input_enabled(Side::Defender));
        assert_eq!(
            s.drain_events(),
            vec![
                GameEvent::PhaseChanged {
                    phase: Phase::InProgress
                },
                GameEvent::TurnChanged {
                    side: Side::Attacker
                },
            ]
        );
        assert!(s.start().is_err());
    }

    #[test]
    fn accepted_move_flips_turn() {
        let mut s = brandubh();
        s.start().unwrap();
        s.drain_events();
        let report = s.submit_move_from(c("d1"), c("b1")).unwrap();
        assert_eq!(report.from, c("d1"));
        assert!(report.captures.is_empty());
        assert_eq!(report.victory, None);
        assert_eq!(s.active_side(), Side::Defender);
        assert_eq!(s.last_moved(), Some(report.piece));
        assert_eq!(
            s.drain_events(),
            vec![
                GameEvent::PieceMoved {
                    piece: report.piece,
                    from: c("d1"),
                    to: c("b1")
                },
                GameEvent::TurnChanged {
                    side: Side::Defender
                },
            ]
        );
    }

    #[test]
    fn rejected_move_changes_nothing() {
        let mut s = brandubh();
        s.start().unwrap();
        s.drain_events();
        let before = s.position().clone();

        // Defender piece on the attacker's turn.
        let err = s.submit_move_from(c("d3"), c("b3")).unwrap_err();
        assert!(matches!(err, MoveError::Illegal(IllegalMove::NotYourPiece { .. })));
        // Diagonal.
        let err = s.submit_move_from(c("d1"), c("c2")).unwrap_err();
        assert_eq!(err, MoveError::Illegal(IllegalMove::NotStraight));
        // Empty origin.
        let err = s.submit_move_from(c("b2"), c("b3")).unwrap_err();
        assert_eq!(err, MoveError::Illegal(IllegalMove::NoPieceAt(c("b2"))));

        assert_eq!(s.position(), &before);
        assert_eq!(s.active_side(), Side::Attacker);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn pause_blocks_moves() {
        let mut s = brandubh();
        s.start().unwrap();
        s.request_pause().unwrap();
        assert!(!s.input_enabled(Side::Attacker));
        assert_eq!(
            s.submit_move_from(c("d1"), c("b1")),
            Err(MoveError::Phase(PhaseViolation::MoveOutsidePlay(Phase::Paused)))
        );
        assert!(s.request_pause().is_err());
        s.request_resume().unwrap();
        assert!(s.input_enabled(Side::Attacker));
        assert!(s.submit_move_from(c("d1"), c("b1")).is_ok());
    }

    #[test]
    fn capture_then_turn() {
        let mut s = session(
            &[
                ".......",
                ".......",
                "..a.da.",
                "...k...",
                ".......",
                ".......",
                ".......",
            ],
            Side::Attacker,
        );
        s.start().unwrap();
        s.drain_events();
        let report = s.submit_move_from(c("c3"), c("d3")).unwrap();
        assert_eq!(report.captures.len(), 1);
        let events = s.drain_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[1], GameEvent::PieceCaptured { at, .. } if at == c("e3")));
        assert_eq!(events[2], GameEvent::TurnChanged { side: Side::Defender });
    }

    #[test]
    fn king_escape_ends_match() {
        let mut s = session(
            &[
                ".......",
                ".......",
                ".......",
                "...k...",
                ".......",
                ".......",
                "...a...",
            ],
            Side::Defender,
        );
        s.start().unwrap();
        s.drain_events();
        let report = s.submit_move_from(c("d4"), c("a1")).unwrap();
        let victory = report.victory.unwrap();
        assert_eq!(victory.winner, Side::Defender);
        assert_eq!(s.phase(), Phase::GameOver);
        assert_eq!(s.winner(), Some(victory));
        // No turn flip after a win.
        assert_eq!(s.active_side(), Side::Defender);
        assert!(!s.input_enabled(Side::Defender));

        let events = s.drain_events();
        assert_eq!(
            events.last(),
            Some(&GameEvent::PhaseChanged {
                phase: Phase::GameOver
            })
        );
        assert!(!events.iter().any(|e| matches!(e, GameEvent::TurnChanged { .. })));
        assert_eq!(
            s.submit_move_from(c("d7"), c("e7")),
            Err(MoveError::Phase(PhaseViolation::MoveOutsidePlay(Phase::GameOver)))
        );
    }

    #[test]
    fn surround_captures_king() {
        let mut s = session(
            &[
                ".......",
                ".......",
                "...a...",
                "..ak..a",
                "...a...",
                ".......",
                ".......",
            ],
            Side::Attacker,
        );
        s.start().unwrap();
        s.drain_events();
        let king = s.position().king().id;
        let report = s.submit_move_from(c("g4"), c("e4")).unwrap();
        assert_eq!(report.victory.map(|v| v.winner), Some(Side::Attacker));
        assert!(!s.position().king().alive);
        assert_eq!(s.active_side(), Side::Attacker);

        let events = s.drain_events();
        assert_eq!(events.len(), 4);
        assert_eq!(events[1], GameEvent::PieceCaptured { piece: king, at: c("d4") });
        assert!(matches!(events[2], GameEvent::MatchEnded { winner: Side::Attacker, .. }));
        s.position().assert_consistent();
    }

    #[test]
    fn game_over_timer_fires_once() {
        let mut s = session(
            &[
                ".......",
                ".......",
                ".......",
                "...k...",
                ".......",
                ".......",
                "...a...",
            ],
            Side::Defender,
        );
        s.start().unwrap();
        s.submit_move_from(c("d4"), c("g1")).unwrap();
        s.drain_events();

        assert!(!s.advance_clock(Duration::from_millis(4000)));
        assert_eq!(s.phase_elapsed(), Duration::from_millis(4000));
        assert!(s.advance_clock(Duration::from_millis(1000)));
        assert!(!s.advance_clock(Duration::from_millis(1000)));
        assert_eq!(s.drain_events(), vec![GameEvent::ReturnToMenu]);
    }

    #[test]
    fn clock_does_nothing_outside_game_over() {
        let mut s = brandubh();
        s.start().unwrap();
        s.drain_events();
        assert!(!s.advance_clock(Duration::from_secs(60)));
        assert!(s.drain_events().is_empty());
        s.request_pause().unwrap();
        assert_eq!(s.phase_elapsed(), Duration::ZERO);
    }

    #[test]
    fn reset_restores_start() {
        let mut s = session(
            &[
                ".......",
                ".......",
                "..a.da.",
                "...k...",
                ".......",
                ".......",
                ".......",
            ],
            Side::Attacker,
        );
        let initial = s.position().clone();
        s.start().unwrap();
        s.submit_move_from(c("c3"), c("d3")).unwrap();
        s.reset_match();
        assert_eq!(s.phase(), Phase::Setup);
        assert_eq!(s.position(), &initial);
        assert_eq!(s.active_side(), Side::Attacker);
        assert_eq!(s.winner(), None);
        assert_eq!(s.last_moved(), None);
        assert!(s.position().pieces().iter().all(|p| p.alive));
        s.start().unwrap();
        assert!(s.submit_move_from(c("c3"), c("c1")).is_ok());
    }
}
