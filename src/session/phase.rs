//! Match phases and the transitions between them.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    InProgress,
    Paused,
    GameOver,
}

impl Phase {
    pub const fn name(self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::InProgress => "in_progress",
            Phase::Paused => "paused",
            Phase::GameOver => "game_over",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A trigger that may move the match to another phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseEvent {
    Start,
    Pause,
    Resume,
    Win,
    Reset,
}

impl fmt::Display for PhaseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PhaseEvent::Start => "start",
            PhaseEvent::Pause => "pause",
            PhaseEvent::Resume => "resume",
            PhaseEvent::Win => "win",
            PhaseEvent::Reset => "reset",
        };
        f.write_str(s)
    }
}

/// An operation requested in a phase that forbids it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PhaseViolation {
    #[error("cannot {event} during {phase}")]
    Transition { phase: Phase, event: PhaseEvent },

    #[error("moves are not accepted during {0}")]
    MoveOutsidePlay(Phase),
}

/// Computes the phase that follows `event`.
///
/// ```text
/// Setup      --Start-->  InProgress
/// InProgress --Pause-->  Paused
/// Paused     --Resume--> InProgress
/// InProgress --Win-->    GameOver
/// any        --Reset-->  Setup
/// ```
pub fn transition(phase: Phase, event: PhaseEvent) -> Result<Phase, PhaseViolation> {
    match (phase, event) {
        (Phase::Setup, PhaseEvent::Start) => Ok(Phase::InProgress),
        (Phase::InProgress, PhaseEvent::Pause) => Ok(Phase::Paused),
        (Phase::Paused, PhaseEvent::Resume) => Ok(Phase::InProgress),
        (Phase::InProgress, PhaseEvent::Win) => Ok(Phase::GameOver),
        (_, PhaseEvent::Reset) => Ok(Phase::Setup),
        (phase, event) => Err(PhaseViolation::Transition { phase, event }),
    }
}
