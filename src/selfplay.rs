//! Self-play match generation.
//!
//! Plays complete matches with both sides choosing uniformly among their
//! legal moves. Every match runs through a real `GameSession`, so this
//! doubles as an end-to-end workout of validation, capture, and win
//! detection. Records are written as JSONL.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::board::{ConfigError, MatchConfig, Side};
use crate::movegen::random_move;
use crate::protocol::notation::format_move;
use crate::protocol::tfen::encode_tfen;
use crate::resolve::WinReason;
use crate::session::GameSession;

/// Configuration for self-play generation.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Starting layout.
    pub preset: String,
    /// Plies after which an undecided game is abandoned.
    pub max_plies: usize,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Suppress per-game progress output.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            preset: "brandubh".to_string(),
            max_plies: 500,
            threads: 4,
            seed: 0,
            quiet: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SelfPlayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// How a self-play game stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEnd {
    /// One side met a win condition.
    Win,
    /// The side to move had no legal move.
    NoMoves,
    /// The ply limit was reached.
    PlyLimit,
}

/// A complete self-play game record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: usize,
    pub end: GameEnd,
    pub winner: Option<Side>,
    pub reason: Option<WinReason>,
    pub plies: usize,
    /// Moves in `d1-d4` notation, attacker and defender interleaved.
    pub moves: Vec<String>,
    pub final_tfen: String,
}

/// Plays a single game from the setup of `template`.
pub fn play_game(template: &GameSession, max_plies: usize, game_id: usize, rng: &mut SmallRng) -> GameRecord {
    let mut session = template.clone();
    session.reset_match();
    let mut moves = Vec::new();
    let mut end = GameEnd::PlyLimit;

    if let Err(e) = session.start() {
        warn!(game_id, "could not start: {}", e);
    }

    while moves.len() < max_plies {
        let side = session.active_side();
        let Some(mv) = random_move(session.position(), side, session.rules(), rng) else {
            end = GameEnd::NoMoves;
            break;
        };
        match session.submit_move(mv.piece, mv.to) {
            Ok(report) => {
                moves.push(format_move(mv.from, mv.to));
                if report.victory.is_some() {
                    end = GameEnd::Win;
                    break;
                }
            }
            Err(e) => {
                warn!(game_id, "generated move {} rejected: {}", format_move(mv.from, mv.to), e);
                break;
            }
        }
    }
    session.drain_events();

    let victory = session.winner();
    GameRecord {
        game_id,
        end,
        winner: victory.map(|v| v.winner),
        reason: victory.map(|v| v.reason),
        plies: moves.len(),
        moves,
        final_tfen: encode_tfen(session.position(), session.active_side()),
    }
}

fn rng_for(seed: u64, game_id: usize) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed.wrapping_add(game_id as u64))
    } else {
        SmallRng::from_entropy()
    }
}

fn log_game(config: &SelfPlayConfig, n: usize, game: &GameRecord, started: Instant) {
    if config.quiet {
        return;
    }
    let outcome = match (game.winner, game.reason) {
        (Some(w), Some(r)) => format!("{w} wins ({r})"),
        _ => match game.end {
            GameEnd::NoMoves => "no legal moves".to_string(),
            _ => "ply limit".to_string(),
        },
    };
    info!(
        "Game {}/{}: {} after {} plies ({:.2}s)",
        n,
        config.num_games,
        outcome,
        game.plies,
        started.elapsed().as_secs_f64()
    );
}

/// Runs self-play generation, producing all game records.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
pub fn run_self_play(config: &SelfPlayConfig) -> Result<Vec<GameRecord>, SelfPlayError> {
    let mut games = Vec::with_capacity(config.num_games);
    run_self_play_with_callback(config, |game| games.push(game))?;
    games.sort_by_key(|g| g.game_id);
    Ok(games)
}

/// Runs self-play generation, calling `on_game` with each completed game
/// as soon as it finishes.
pub fn run_self_play_with_callback<F>(config: &SelfPlayConfig, on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord) + Send,
{
    let template = GameSession::new(MatchConfig::preset(&config.preset)?)?;
    if config.threads > 1 {
        run_self_play_parallel(config, &template, on_game)
    } else {
        run_self_play_sequential(config, &template, on_game);
        Ok(())
    }
}

fn run_self_play_sequential<F>(config: &SelfPlayConfig, template: &GameSession, mut on_game: F)
where
    F: FnMut(GameRecord),
{
    for i in 0..config.num_games {
        let mut rng = rng_for(config.seed, i);
        let started = Instant::now();
        let game = play_game(template, config.max_plies, i, &mut rng);
        log_game(config, i + 1, &game, started);
        on_game(game);
    }
}

/// Plays games on a rayon pool and hands them to `on_game` on the calling
/// thread through a channel.
fn run_self_play_parallel<F>(config: &SelfPlayConfig, template: &GameSession, mut on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord) + Send,
{
    use rayon::prelude::*;
    use std::sync::mpsc;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;
    let completed = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<GameRecord>();

    std::thread::scope(|scope| {
        scope.spawn(|| {
            pool.install(|| {
                (0..config.num_games)
                    .into_par_iter()
                    .for_each_with(tx, |tx, i| {
                        let mut rng = rng_for(config.seed, i);
                        let started = Instant::now();
                        let game = play_game(template, config.max_plies, i, &mut rng);
                        let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                        log_game(config, n, &game, started);
                        let _ = tx.send(game);
                    });
            });
        });

        for game in rx {
            on_game(game);
        }
    });
    Ok(())
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Aggregate statistics over a batch of games.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub games: usize,
    pub attacker_wins: usize,
    pub defender_wins: usize,
    pub no_moves: usize,
    pub ply_limit: usize,
    pub avg_plies: f64,
}

pub fn summarize(games: &[GameRecord]) -> Summary {
    let mut s = Summary {
        games: games.len(),
        ..Summary::default()
    };
    for g in games {
        match (g.end, g.winner) {
            (GameEnd::Win, Some(Side::Attacker)) => s.attacker_wins += 1,
            (GameEnd::Win, Some(Side::Defender)) => s.defender_wins += 1,
            (GameEnd::NoMoves, _) => s.no_moves += 1,
            _ => s.ply_limit += 1,
        }
    }
    if !games.is_empty() {
        s.avg_plies = games.iter().map(|g| g.plies).sum::<usize>() as f64 / games.len() as f64;
    }
    s
}

/// Prints a summary of game outcomes to stderr.
pub fn print_summary(games: &[GameRecord]) {
    let s = summarize(games);
    if s.games == 0 {
        return;
    }
    let pct = |n: usize| n as f64 / s.games as f64 * 100.0;
    eprintln!("--- Summary ({} games) ---", s.games);
    eprintln!("  attacker wins: {:>5} ({:.1}%)", s.attacker_wins, pct(s.attacker_wins));
    eprintln!("  defender wins: {:>5} ({:.1}%)", s.defender_wins, pct(s.defender_wins));
    eprintln!("  no moves:      {:>5} ({:.1}%)", s.no_moves, pct(s.no_moves));
    eprintln!("  ply limit:     {:>5} ({:.1}%)", s.ply_limit, pct(s.ply_limit));
    eprintln!("  avg plies:     {:.1}", s.avg_plies);
}
