//! Engine state management.
//!
//! Holds the current match session and the option overrides applied to
//! every new match, and turns protocol commands into session calls. All
//! output goes to the writer passed in, one line per reply or event.

use std::io::{self, Write};
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::board::{
    ConfigError, Coord, HostileThrone, MatchConfig, Side, TileKind, PRESET_NAMES,
};
use crate::movegen::{legal_destinations, random_move};
use crate::protocol::notation::format_move;
use crate::protocol::tfen::{encode_tfen, parse_tfen, TfenError};
use crate::session::{GameSession, MoveError, Phase, PhaseViolation};

/// Layout used by `newgame` without an argument.
pub const DEFAULT_PRESET: &str = "hnefatafl";

/// Errors reported to the front end as `error <reason>` lines.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no match set up")]
    NoMatch,

    #[error("unknown option: '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for option {name}")]
    InvalidOption { name: String, value: String },

    #[error("no legal move for {0}")]
    NoLegalMove(Side),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tfen(#[from] TfenError),

    #[error(transparent)]
    Phase(#[from] PhaseViolation),
}

/// Option values that override a configuration when a match is set up.
///
/// `first_side` only applies to presets and config files; a TFEN position
/// names its own side to move.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub hostile_throne: Option<HostileThrone>,
    pub king_shortcut: Option<bool>,
    pub game_over_ms: Option<u64>,
    pub first_side: Option<Side>,
}

impl Overrides {
    /// Applies the rule and timing overrides.
    pub fn apply(&self, config: &mut MatchConfig) {
        if let Some(h) = self.hostile_throne {
            config.rules.hostile_throne = h;
        }
        if let Some(k) = self.king_shortcut {
            config.rules.king_special_shortcut = k;
        }
        if let Some(ms) = self.game_over_ms {
            config.game_over_display_ms = ms;
        }
    }

    pub fn apply_first_side(&self, config: &mut MatchConfig) {
        if let Some(side) = self.first_side {
            config.first_side = side;
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Some(true),
        "false" | "off" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    pub session: Option<GameSession>,
    pub overrides: Overrides,
    rng: SmallRng,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates an engine with no match set up.
    pub fn new() -> Self {
        Engine {
            session: None,
            overrides: Overrides::default(),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Creates an engine whose `go` choices are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Engine {
            rng: SmallRng::seed_from_u64(seed),
            ..Self::new()
        }
    }

    fn session_mut(&mut self) -> Result<&mut GameSession, EngineError> {
        self.session.as_mut().ok_or(EngineError::NoMatch)
    }

    /// Applies the rule overrides and installs a fresh session in setup.
    pub fn install(&mut self, mut config: MatchConfig) -> Result<(), EngineError> {
        self.overrides.apply(&mut config);
        let session = GameSession::new(config)?;
        debug!(size = session.config().size, pieces = session.position().pieces().len(), "match set up");
        self.session = Some(session);
        Ok(())
    }

    /// Sets up a new match from a preset.
    pub fn new_game(&mut self, preset: Option<&str>) -> Result<(), EngineError> {
        let mut config = MatchConfig::preset(preset.unwrap_or(DEFAULT_PRESET))?;
        self.overrides.apply_first_side(&mut config);
        self.install(config)
    }

    /// Sets up a new match from a TFEN string. The side to move comes from
    /// the string, not from the `FirstSide` option.
    pub fn set_position(&mut self, tfen: &str) -> Result<(), EngineError> {
        let config = parse_tfen(tfen)?;
        self.install(config)
    }

    /// Sets up a new match from a JSON configuration file.
    pub fn load_config(&mut self, path: &str) -> Result<(), EngineError> {
        let json = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_string(),
            source,
        })?;
        let mut config = MatchConfig::from_json(&json)?;
        self.overrides.apply_first_side(&mut config);
        self.install(config)
    }

    /// Sets an engine option. A match still in setup is rebuilt so the
    /// option takes effect immediately; otherwise it applies from the next
    /// match.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), EngineError> {
        let value = value.unwrap_or("");
        let invalid = || EngineError::InvalidOption {
            name: name.to_string(),
            value: value.to_string(),
        };
        match name.to_ascii_lowercase().as_str() {
            "hostilethrone" => {
                self.overrides.hostile_throne = Some(HostileThrone::from_name(value).ok_or_else(invalid)?);
            }
            "kingshortcut" => {
                self.overrides.king_shortcut = Some(parse_bool(value).ok_or_else(invalid)?);
            }
            "gameoverms" => {
                self.overrides.game_over_ms = Some(value.parse().map_err(|_| invalid())?);
            }
            "firstside" => {
                self.overrides.first_side = Some(Side::from_name(value).ok_or_else(invalid)?);
            }
            _ => return Err(EngineError::UnknownOption(name.to_string())),
        }

        if let Some(session) = &self.session {
            if session.phase() == Phase::Setup {
                let mut config = session.config().clone();
                if name.eq_ignore_ascii_case("firstside") {
                    self.overrides.apply_first_side(&mut config);
                }
                self.install(config)?;
            }
        }
        Ok(())
    }

    /// Handles the handshake: writes id, options, and taflok.
    pub fn handle_tafl<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "id name tafl {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "option name HostileThrone type combo default when_empty var never var when_empty var always")?;
        writeln!(out, "option name KingShortcut type check default true")?;
        writeln!(out, "option name GameOverMs type spin default 5000 min 0 max 600000")?;
        writeln!(out, "option name FirstSide type combo default attacker var attacker var defender")?;
        writeln!(out, "presets {}", PRESET_NAMES.join(" "))?;
        writeln!(out, "taflok")?;
        out.flush()
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Writes a command failure as an `error` line.
    pub fn report<W: Write>(&self, result: Result<(), EngineError>, out: &mut W) -> io::Result<()> {
        if let Err(e) = result {
            warn!("{}", e);
            writeln!(out, "error {}", e)?;
            out.flush()?;
        }
        Ok(())
    }

    /// Writes every queued session event, one line each.
    fn flush_events<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if let Some(session) = &mut self.session {
            for event in session.drain_events() {
                writeln!(out, "{}", event)?;
            }
        }
        out.flush()
    }

    /// Writes a rejected move as an `illegal` or `error` line.
    fn write_move_error<W: Write>(&self, err: MoveError, out: &mut W) -> io::Result<()> {
        debug!(%err, "move rejected");
        match err {
            MoveError::Illegal(e) => writeln!(out, "illegal {}", e)?,
            MoveError::Phase(e) => writeln!(out, "error {}", e)?,
        }
        out.flush()
    }

    pub fn handle_start<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let result = self
            .session_mut()
            .and_then(|s| s.start().map_err(EngineError::from));
        self.report(result, out)?;
        self.flush_events(out)
    }

    pub fn handle_pause<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let result = self
            .session_mut()
            .and_then(|s| s.request_pause().map_err(EngineError::from));
        self.report(result, out)?;
        self.flush_events(out)
    }

    pub fn handle_resume<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let result = self
            .session_mut()
            .and_then(|s| s.request_resume().map_err(EngineError::from));
        self.report(result, out)?;
        self.flush_events(out)
    }

    pub fn handle_reset<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let result = self.session_mut().map(|s| s.reset_match());
        self.report(result, out)?;
        self.flush_events(out)
    }

    pub fn handle_tick<W: Write>(&mut self, ms: u64, out: &mut W) -> io::Result<()> {
        let result = self
            .session_mut()
            .map(|s| {
                s.advance_clock(Duration::from_millis(ms));
            });
        self.report(result, out)?;
        self.flush_events(out)
    }

    /// Handles `move <from> <to>`.
    pub fn handle_move<W: Write>(&mut self, from: Coord, to: Coord, out: &mut W) -> io::Result<()> {
        let Some(session) = self.session.as_mut() else {
            return self.report(Err(EngineError::NoMatch), out);
        };
        match session.submit_move_from(from, to) {
            Ok(_) => self.flush_events(out),
            Err(e) => self.write_move_error(e, out),
        }
    }

    /// Handles `go`: plays a uniformly random legal move for the side to
    /// move and reports it as `bestmove <from>-<to>`.
    pub fn handle_go<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let Some(session) = self.session.as_mut() else {
            return self.report(Err(EngineError::NoMatch), out);
        };
        if session.phase() != Phase::InProgress {
            let err = PhaseViolation::MoveOutsidePlay(session.phase());
            return self.report(Err(err.into()), out);
        }
        let side = session.active_side();
        let Some(mv) = random_move(session.position(), side, session.rules(), &mut self.rng) else {
            return self.report(Err(EngineError::NoLegalMove(side)), out);
        };
        match session.submit_move(mv.piece, mv.to) {
            Ok(_) => {
                writeln!(out, "bestmove {}", format_move(mv.from, mv.to))?;
                self.flush_events(out)
            }
            Err(e) => self.write_move_error(e, out),
        }
    }

    /// Handles `legal <tile>`: lists the destinations of the piece there.
    pub fn handle_legal<W: Write>(&mut self, tile: Coord, out: &mut W) -> io::Result<()> {
        let Some(session) = &self.session else {
            return self.report(Err(EngineError::NoMatch), out);
        };
        let position = session.position();
        let dests = match position.board().occupant(tile) {
            Some(id) => legal_destinations(position, id, session.rules()),
            None => Vec::new(),
        };
        write!(out, "legal {}", tile)?;
        for dest in dests {
            write!(out, " {}", dest)?;
        }
        writeln!(out)?;
        out.flush()
    }

    /// Handles `show`: prints the board diagram and match state.
    ///
    /// Diagram characters: `a`/`d`/`k` pieces, `+` empty throne, `*` empty
    /// corner, `.` empty tile.
    pub fn handle_show<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let Some(session) = &self.session else {
            return self.report(Err(EngineError::NoMatch), out);
        };
        let position = session.position();
        let board = position.board();
        for row in 0..board.size() {
            let line: String = (0..board.size())
                .map(|col| {
                    let c = Coord::new(row, col);
                    match (position.occupant(c), board.kind(c)) {
                        (Some(p), _) => p.kind.tfen_char(),
                        (None, Some(TileKind::Throne)) => '+',
                        (None, Some(TileKind::Corner)) => '*',
                        _ => '.',
                    }
                })
                .collect();
            writeln!(out, "board {}", line)?;
        }
        writeln!(out, "tfen {}", encode_tfen(position, session.active_side()))?;
        writeln!(out, "phase {}", session.phase())?;
        writeln!(out, "turn {}", session.active_side())?;
        if let Some(v) = session.winner() {
            writeln!(out, "winner {} {}", v.winner, v.reason)?;
        }
        out.flush()
    }
}
