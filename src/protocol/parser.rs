//! Text protocol command parser.
//!
//! Parses incoming protocol lines into structured `Command` variants that
//! the main loop dispatches on.

use tracing::warn;

use crate::board::Coord;
use crate::protocol::notation::parse_move;

/// A parsed front-end-to-engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Protocol handshake; engine replies with `id` lines and `taflok`.
    Tafl,

    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Set an engine option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Set up a new match from a preset (default layout when omitted).
    NewGame { preset: Option<String> },

    /// Set up a new match from a TFEN string.
    Position { tfen: String },

    /// Set up a new match from a JSON configuration file.
    LoadConfig { path: String },

    /// Begin play.
    Start,

    /// Submit a move for the side to move.
    Move { from: Coord, to: Coord },

    /// Let the engine play a move for the side to move.
    Go,

    /// List the legal destinations of the piece on a tile.
    Legal { tile: Coord },

    Pause,
    Resume,

    /// Advance the phase clock by the given number of milliseconds.
    Tick { ms: u64 },

    /// Return every piece to its start and go back to setup.
    Reset,

    /// Print the board and match state.
    Show,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let first = *tokens.first()?;

    match first {
        "tafl" => Some(Command::Tafl),
        "isready" => Some(Command::IsReady),
        "start" => Some(Command::Start),
        "go" => Some(Command::Go),
        "pause" => Some(Command::Pause),
        "resume" => Some(Command::Resume),
        "reset" => Some(Command::Reset),
        "show" => Some(Command::Show),
        "quit" => Some(Command::Quit),

        "newgame" => Some(Command::NewGame {
            preset: tokens.get(1).map(|s| s.to_string()),
        }),
        "setoption" => parse_setoption(&tokens),
        "position" => single_arg(&tokens, "position <tfen>").map(|tfen| Command::Position { tfen }),
        "loadconfig" => single_arg(&tokens, "loadconfig <path>").map(|path| Command::LoadConfig { path }),
        "move" => parse_move_command(&tokens),
        "legal" => parse_legal(&tokens),
        "tick" => parse_tick(&tokens),

        other => {
            warn!("unknown command: {}", other);
            None
        }
    }
}

fn single_arg(tokens: &[&str], usage: &str) -> Option<String> {
    match tokens.get(1) {
        Some(arg) => Some(arg.to_string()),
        None => {
            warn!("malformed command: expected '{}'", usage);
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let value_idx = tokens.iter().position(|&t| t == "value");
    let (name_parts, value_parts) = match value_idx {
        Some(vi) => (&tokens[2..vi], &tokens[vi + 1..]),
        None => (&tokens[2..], &tokens[tokens.len()..]),
    };
    if name_parts.is_empty() {
        warn!("malformed setoption: empty name");
        return None;
    }

    let value = (!value_parts.is_empty()).then(|| value_parts.join(" "));
    Some(Command::SetOption {
        name: name_parts.join(" "),
        value,
    })
}

/// Parses `move <from> <to>` or `move <from>-<to>`.
fn parse_move_command(tokens: &[&str]) -> Option<Command> {
    let parsed = match tokens.len() {
        2 => parse_move(tokens[1]).map_err(|e| e.to_string()),
        3 => tokens[1]
            .parse::<Coord>()
            .and_then(|from| Ok((from, tokens[2].parse::<Coord>()?)))
            .map_err(|e| e.to_string()),
        _ => Err("expected 'move <from> <to>'".to_string()),
    };
    match parsed {
        Ok((from, to)) => Some(Command::Move { from, to }),
        Err(e) => {
            warn!("malformed move: {}", e);
            None
        }
    }
}

/// Parses `legal <tile>`.
fn parse_legal(tokens: &[&str]) -> Option<Command> {
    let arg = single_arg(tokens, "legal <tile>")?;
    match arg.parse::<Coord>() {
        Ok(tile) => Some(Command::Legal { tile }),
        Err(e) => {
            warn!("malformed legal: {}", e);
            None
        }
    }
}

/// Parses `tick <ms>`.
fn parse_tick(tokens: &[&str]) -> Option<Command> {
    let arg = single_arg(tokens, "tick <ms>")?;
    match arg.parse::<u64>() {
        Ok(ms) => Some(Command::Tick { ms }),
        Err(_) => {
            warn!("invalid tick value: '{}'", arg);
            None
        }
    }
}
