//! Move consequences.
//!
//! After a move is committed, captures are resolved first and the win check
//! runs second, since a capture can change what stands next to the king.

pub mod capture;
pub mod win;

pub use capture::{find_captures, resolve_captures, Capture};
pub use win::{evaluate_win, king_verdict, Victory, WinReason};
