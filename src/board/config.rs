//! Match configuration.
//!
//! Board size, special tiles, starting layout, first side, rule flags, and
//! presentation timing are static data supplied before a match starts. A
//! configuration can be built from a preset, from a row diagram, or loaded
//! from JSON.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::coord::{Coord, MAX_BOARD_SIZE};
use super::piece::{PieceKind, Side};

/// Smallest board that still has room for a throne and four distinct corners.
pub const MIN_BOARD_SIZE: u8 = 3;

/// Default time spent in the game-over phase before returning to the menu.
pub const DEFAULT_GAME_OVER_DISPLAY_MS: u64 = 5000;

/// Errors that make a configuration unusable for starting a match.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("board size {0} outside 3..=26")]
    InvalidSize(u8),

    #[error("{0} is outside the board")]
    OutOfBounds(Coord),

    #[error("special tile {0} is listed more than once")]
    DuplicateSpecialTile(Coord),

    #[error("more than one piece placed on {0}")]
    DuplicatePlacement(Coord),

    #[error("piece placed on corner {0}")]
    PieceOnCorner(Coord),

    #[error("only the king may start on the throne {0}")]
    NonKingOnThrone(Coord),

    #[error("expected exactly one king, found {0}")]
    KingCount(usize),

    #[error("no attacking pieces")]
    NoAttackers,

    #[error("centered layouts need an odd board size, got {0}")]
    EvenCenteredBoard(u8),

    #[error("layout row {row} has {len} tiles, expected {size}")]
    RaggedRow { row: usize, len: usize, size: usize },

    #[error("invalid layout character: '{0}'")]
    InvalidLayoutChar(char),

    #[error("unknown preset: '{0}'")]
    UnknownPreset(String),

    #[error("malformed configuration: {0}")]
    Malformed(String),
}

/// When an empty or occupied throne counts as a capturing partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostileThrone {
    /// Only corners are hostile.
    Never,
    /// The throne is hostile while nobody stands on it.
    #[default]
    WhenEmpty,
    /// The throne is hostile even while the king sits on it.
    Always,
}

impl HostileThrone {
    pub fn from_name(s: &str) -> Option<HostileThrone> {
        match s.to_ascii_lowercase().as_str() {
            "never" => Some(HostileThrone::Never),
            "empty" | "when_empty" | "whenempty" => Some(HostileThrone::WhenEmpty),
            "always" => Some(HostileThrone::Always),
            _ => None,
        }
    }
}

/// Rule variations between Tafl rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub hostile_throne: HostileThrone,
    /// The king may move onto an empty throne or corner without a clear
    /// straight path.
    pub king_special_shortcut: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            hostile_throne: HostileThrone::WhenEmpty,
            king_special_shortcut: true,
        }
    }
}

/// One piece in the starting layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub kind: PieceKind,
    pub at: Coord,
}

fn default_first_side() -> Side {
    Side::Attacker
}

fn default_game_over_display_ms() -> u64 {
    DEFAULT_GAME_OVER_DISPLAY_MS
}

/// Everything needed to set up a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub size: u8,
    pub throne: Coord,
    pub corners: [Coord; 4],
    pub placements: Vec<Placement>,
    #[serde(default = "default_first_side")]
    pub first_side: Side,
    #[serde(default)]
    pub rules: Rules,
    #[serde(default = "default_game_over_display_ms")]
    pub game_over_display_ms: u64,
}

const BRANDUBH: [&str; 7] = [
    "...a...",
    "...a...",
    "...d...",
    "aadkdaa",
    "...d...",
    "...a...",
    "...a...",
];

const TABLUT: [&str; 9] = [
    "...aaa...",
    "....a....",
    "....d....",
    "a...d...a",
    "aaddkddaa",
    "a...d...a",
    "....d....",
    "....a....",
    "...aaa...",
];

const HNEFATAFL: [&str; 11] = [
    "...aaaaa...",
    ".....a.....",
    "...........",
    "a....d....a",
    "a...ddd...a",
    "aa.ddkdd.aa",
    "a...ddd...a",
    "a....d....a",
    "...........",
    ".....a.....",
    "...aaaaa...",
];

/// Names accepted by `MatchConfig::preset`.
pub const PRESET_NAMES: [&str; 3] = ["brandubh", "tablut", "hnefatafl"];

impl MatchConfig {
    /// Builds a configuration with the throne in the center and corners at
    /// the four board corners.
    pub fn centered(size: u8, placements: Vec<Placement>, first_side: Side) -> Result<Self, ConfigError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(ConfigError::InvalidSize(size));
        }
        if size % 2 == 0 {
            return Err(ConfigError::EvenCenteredBoard(size));
        }
        let mid = size / 2;
        let last = size - 1;
        Ok(MatchConfig {
            size,
            throne: Coord::new(mid, mid),
            corners: [
                Coord::new(0, 0),
                Coord::new(0, last),
                Coord::new(last, 0),
                Coord::new(last, last),
            ],
            placements,
            first_side,
            rules: Rules::default(),
            game_over_display_ms: DEFAULT_GAME_OVER_DISPLAY_MS,
        })
    }

    /// Builds a centered configuration from a row diagram: `.` empty,
    /// `a` attacker, `d` defender, `k` king.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], first_side: Side) -> Result<Self, ConfigError> {
        let size = rows.len();
        if size > MAX_BOARD_SIZE as usize {
            return Err(ConfigError::InvalidSize(size.min(u8::MAX as usize) as u8));
        }
        let mut placements = Vec::new();
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let len = row.chars().count();
            if len != size {
                return Err(ConfigError::RaggedRow { row: r, len, size });
            }
            for (c, ch) in row.chars().enumerate() {
                if ch == '.' {
                    continue;
                }
                let kind = PieceKind::from_tfen_char(ch).ok_or(ConfigError::InvalidLayoutChar(ch))?;
                placements.push(Placement {
                    kind,
                    at: Coord::new(r as u8, c as u8),
                });
            }
        }
        Self::centered(size as u8, placements, first_side)
    }

    /// Looks up a standard layout by name.
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        let rows: &[&str] = match name.to_ascii_lowercase().as_str() {
            "brandubh" => &BRANDUBH,
            "tablut" => &TABLUT,
            "hnefatafl" => &HNEFATAFL,
            _ => return Err(ConfigError::UnknownPreset(name.to_string())),
        };
        Self::from_rows(rows, Side::Attacker)
    }

    /// Parses a configuration from JSON and validates it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn in_bounds(&self, c: Coord) -> Result<(), ConfigError> {
        if c.row < self.size && c.col < self.size {
            Ok(())
        } else {
            Err(ConfigError::OutOfBounds(c))
        }
    }

    /// Checks every structural requirement of a playable match.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.size) {
            return Err(ConfigError::InvalidSize(self.size));
        }

        let mut specials = HashSet::new();
        for c in std::iter::once(self.throne).chain(self.corners) {
            self.in_bounds(c)?;
            if !specials.insert(c) {
                return Err(ConfigError::DuplicateSpecialTile(c));
            }
        }

        let mut occupied = HashSet::new();
        let mut kings = 0usize;
        let mut attackers = 0usize;
        for p in &self.placements {
            self.in_bounds(p.at)?;
            if !occupied.insert(p.at) {
                return Err(ConfigError::DuplicatePlacement(p.at));
            }
            if self.corners.contains(&p.at) {
                return Err(ConfigError::PieceOnCorner(p.at));
            }
            if p.at == self.throne && !p.kind.is_king() {
                return Err(ConfigError::NonKingOnThrone(p.at));
            }
            match p.kind {
                PieceKind::King => kings += 1,
                PieceKind::Attacker => attackers += 1,
                PieceKind::Defender => {}
            }
        }

        if kings != 1 {
            return Err(ConfigError::KingCount(kings));
        }
        if attackers == 0 {
            return Err(ConfigError::NoAttackers);
        }
        Ok(())
    }
}
