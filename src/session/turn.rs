//! Turn order and input gating.

use crate::board::{Side, ALL_SIDES};

/// Tracks whose turn it is and which side may currently submit moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnController {
    active: Side,
    input: [bool; 2],
}

impl TurnController {
    /// A controller with `first` to move and all input disabled.
    pub fn new(first: Side) -> Self {
        TurnController {
            active: first,
            input: [false; 2],
        }
    }

    pub fn active(&self) -> Side {
        self.active
    }

    pub fn input_enabled(&self, side: Side) -> bool {
        self.input[side.index()]
    }

    /// Enables input for the side to move only.
    pub fn enable_active(&mut self) {
        for side in ALL_SIDES {
            self.input[side.index()] = side == self.active;
        }
    }

    pub fn disable_all(&mut self) {
        self.input = [false; 2];
    }

    /// Hands the turn to the other side and returns it. Input follows the
    /// turn if it was enabled.
    pub fn flip(&mut self) -> Side {
        let was_enabled = self.input_enabled(self.active);
        self.active = self.active.opponent();
        if was_enabled {
            self.enable_active();
        }
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disabled() {
        let turn = TurnController::new(Side::Defender);
        assert_eq!(turn.active(), Side::Defender);
        assert!(!turn.input_enabled(Side::Attacker));
        assert!(!turn.input_enabled(Side::Defender));
    }

    #[test]
    fn input_follows_turn() {
        let mut turn = TurnController::new(Side::Attacker);
        turn.enable_active();
        assert!(turn.input_enabled(Side::Attacker));
        assert!(!turn.input_enabled(Side::Defender));

        assert_eq!(turn.flip(), Side::Defender);
        assert!(!turn.input_enabled(Side::Attacker));
        assert!(turn.input_enabled(Side::Defender));

        turn.disable_all();
        assert_eq!(turn.flip(), Side::Attacker);
        assert!(!turn.input_enabled(Side::Attacker));
    }
}
