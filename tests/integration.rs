//! Integration tests for the tafl engine binary.
//!
//! Drives full protocol sessions by spawning the engine process, sending
//! commands via stdin, and checking the lines written to stdout.

use std::io::{BufRead, Write};
use std::process::{Command, Stdio};

/// Sends a sequence of commands to the engine and collects stdout lines.
fn run_engine(commands: &[&str]) -> Vec<String> {
    let exe = env!("CARGO_BIN_EXE_tafl");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start tafl");

    let mut stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();
    let reader = std::io::BufReader::new(stdout);

    for cmd in commands {
        writeln!(stdin, "{}", cmd).unwrap();
    }
    stdin.flush().unwrap();
    drop(stdin);

    let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
    let status = child.wait().expect("failed to wait on child");
    assert!(status.success());
    lines
}

/// Brandubh starting layout, attackers to move.
const BRANDUBH_TFEN: &str = "3a3,3a3,3d3,aadkdaa,3d3,3a3,3a3/a";

/// King one step from the a1 corner, defenders to move.
const ESCAPE_TFEN: &str = "5,5,2k2,5,1a3/d";

#[test]
fn handshake_lists_options_and_presets() {
    let lines = run_engine(&["tafl", "quit"]);

    assert!(lines[0].starts_with("id name tafl"));
    assert!(lines.iter().any(|l| l == "presets brandubh tablut hnefatafl"));
    let option_lines: Vec<&String> = lines.iter().filter(|l| l.starts_with("option ")).collect();
    assert_eq!(option_lines.len(), 4);
    for opt in &option_lines {
        assert!(opt.contains(" type "), "option line missing type: {}", opt);
    }
    assert_eq!(lines.last().map(String::as_str), Some("taflok"));
}

#[test]
fn isready_response() {
    let lines = run_engine(&["isready", "quit"]);
    assert_eq!(lines, vec!["readyok"]);
}

#[test]
fn unknown_and_empty_lines_are_ignored() {
    let lines = run_engine(&["foobar", "", "   ", "isready", "quit"]);
    assert_eq!(lines, vec!["readyok"]);
}

#[test]
fn commands_before_a_match_report_errors() {
    let lines = run_engine(&["start", "move d1 b1", "show", "isready", "quit"]);
    assert_eq!(
        lines,
        vec![
            "error no match set up",
            "error no match set up",
            "error no match set up",
            "readyok",
        ]
    );
}

#[test]
fn opening_move_is_announced() {
    let lines = run_engine(&[
        &format!("position {}", BRANDUBH_TFEN),
        "start",
        "move d1-b1",
        "quit",
    ]);

    assert_eq!(lines[0], "phase in_progress");
    assert_eq!(lines[1], "turn attacker");
    assert!(lines[2].starts_with("moved "), "unexpected line: {}", lines[2]);
    assert!(lines[2].ends_with(" d1 b1"));
    assert_eq!(lines[3], "turn defender");
    assert_eq!(lines.len(), 4);
}

#[test]
fn illegal_move_keeps_the_turn() {
    let lines = run_engine(&[
        &format!("position {}", BRANDUBH_TFEN),
        "start",
        "move d1 c2",
        "move d3 b3",
        "move d1 d4",
        "show",
        "quit",
    ]);

    assert_eq!(lines[2], "illegal pieces move along a single row or column");
    assert!(lines[3].starts_with("illegal piece "));
    assert!(lines[3].ends_with("does not belong to the attacker side"));
    assert_eq!(lines[4], "illegal destination d4 is occupied");
    assert!(lines.iter().any(|l| l == &format!("tfen {}", BRANDUBH_TFEN)));
    assert!(lines.iter().any(|l| l == "turn attacker"));
}

#[test]
fn king_escape_ends_the_match() {
    let lines = run_engine(&[&format!("position {}", ESCAPE_TFEN), "start", "move c3 a1", "quit"]);

    assert_eq!(lines[0], "phase in_progress");
    assert_eq!(lines[1], "turn defender");
    assert!(lines[2].ends_with(" c3 a1"), "unexpected line: {}", lines[2]);
    assert_eq!(lines[3], "winner defender king_escaped");
    assert_eq!(lines[4], "phase game_over");
    assert_eq!(lines.len(), 5);
}

#[test]
fn game_over_returns_to_menu_once() {
    let lines = run_engine(&[
        &format!("position {}", ESCAPE_TFEN),
        "setoption name GameOverMs value 100",
        "start",
        "move c3 a1",
        "move b5 b4",
        "tick 50",
        "tick 50",
        "tick 50",
        "show",
        "reset",
        "quit",
    ]);

    assert!(lines.iter().any(|l| l == "error moves are not accepted during game_over"));
    assert_eq!(lines.iter().filter(|l| *l == "menu").count(), 1);
    let show = lines.iter().position(|l| l == "phase game_over").unwrap();
    assert!(lines[show..].iter().any(|l| l == "winner defender king_escaped"));
    assert_eq!(lines.last().map(String::as_str), Some("phase setup"));
}

#[test]
fn pause_and_resume() {
    let lines = run_engine(&[
        &format!("position {}", BRANDUBH_TFEN),
        "start",
        "pause",
        "move d1 b1",
        "pause",
        "resume",
        "move d1 b1",
        "quit",
    ]);

    assert_eq!(lines[2], "phase paused");
    assert_eq!(lines[3], "error moves are not accepted during paused");
    assert_eq!(lines[4], "error cannot pause during paused");
    assert_eq!(lines[5], "phase in_progress");
    assert!(lines[6].starts_with("moved "));
}

#[test]
fn go_plays_a_legal_move() {
    let lines = run_engine(&["newgame brandubh", "start", "go", "show", "quit"]);

    let best = lines.iter().find(|l| l.starts_with("bestmove ")).unwrap();
    let mv = best.strip_prefix("bestmove ").unwrap();
    let (from, to) = mv.split_once('-').unwrap();
    let moved = lines.iter().find(|l| l.starts_with("moved ")).unwrap();
    assert!(moved.ends_with(&format!(" {} {}", from, to)));
    assert!(lines.iter().any(|l| l == "turn defender"));
}

#[test]
fn legal_lists_destinations() {
    let lines = run_engine(&[&format!("position {}", BRANDUBH_TFEN), "legal d1", "legal b2", "quit"]);
    assert_eq!(lines, vec!["legal d1 b1 c1 e1 f1", "legal b2"]);
}

#[test]
fn malformed_position_does_not_crash() {
    let lines = run_engine(&["position garbage", "isready", "quit"]);
    assert!(lines[0].starts_with("error "));
    assert_eq!(lines[1], "readyok");
}

#[test]
fn bad_option_is_reported() {
    let lines = run_engine(&[
        "setoption name HostileThrone value sometimes",
        "setoption name Threads value 4",
        "isready",
        "quit",
    ]);
    assert_eq!(lines[0], "error invalid value 'sometimes' for option HostileThrone");
    assert_eq!(lines[1], "error unknown option: 'Threads'");
    assert_eq!(lines[2], "readyok");
}

#[test]
fn eof_exits_cleanly() {
    let lines = run_engine(&["tafl", "isready"]);
    assert!(lines.iter().any(|l| l == "taflok"));
    assert!(lines.iter().any(|l| l == "readyok"));
}
