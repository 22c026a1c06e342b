//! tafl -- a Tafl rules engine speaking a line-oriented text protocol.
//!
//! This binary reads commands from stdin and writes responses and match
//! events to stdout. Logs go to stderr and are filtered with `RUST_LOG`.

use std::io::{self, BufRead, Write};

use tracing::error;
use tracing_subscriber::EnvFilter;

use tafl::engine::Engine;
use tafl::protocol::parser::{parse_command, Command};

/// Dispatches one command. Returns false when the loop should stop.
fn dispatch<W: Write>(engine: &mut Engine, cmd: Command, out: &mut W) -> io::Result<bool> {
    match cmd {
        Command::Tafl => engine.handle_tafl(out)?,
        Command::IsReady => engine.handle_isready(out)?,
        Command::SetOption { name, value } => {
            let result = engine.set_option(&name, value.as_deref());
            engine.report(result, out)?;
        }
        Command::NewGame { preset } => {
            let result = engine.new_game(preset.as_deref());
            engine.report(result, out)?;
        }
        Command::Position { tfen } => {
            let result = engine.set_position(&tfen);
            engine.report(result, out)?;
        }
        Command::LoadConfig { path } => {
            let result = engine.load_config(&path);
            engine.report(result, out)?;
        }
        Command::Start => engine.handle_start(out)?,
        Command::Move { from, to } => engine.handle_move(from, to, out)?,
        Command::Go => engine.handle_go(out)?,
        Command::Legal { tile } => engine.handle_legal(tile, out)?,
        Command::Pause => engine.handle_pause(out)?,
        Command::Resume => engine.handle_resume(out)?,
        Command::Tick { ms } => engine.handle_tick(ms, out)?,
        Command::Reset => engine.handle_reset(out)?,
        Command::Show => engine.handle_show(out)?,
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

/// Runs the main protocol loop, reading commands from stdin and writing
/// responses to stdout.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match dispatch(&mut engine, cmd, &mut out) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                error!("failed to write output: {}", e);
                break;
            }
        }
    }
}
