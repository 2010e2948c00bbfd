//! Core game logic - pure, deterministic, and testable
//!
//! Everything here is free of terminal, file, and clock dependencies: time enters
//! only as elapsed milliseconds handed to [`Session::update`].
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid with collision, merge, and line clearing
//! - [`pieces`]: the seven shapes, clockwise rotation, spawn placement
//! - [`session`]: the game state machine (Idle, Active, Paused, Over)
//! - [`scoring`]: line points, levels, and gravity speed
//! - [`timer`]: the session's single cancellable gravity tick source
//! - [`rng`]: seeded uniform piece generation
//! - [`high_scores`]: the top-five list
//! - [`snapshot`]: plain-data view of a session for renderers
//!
//! # Rules
//!
//! - Pieces are drawn uniformly at random; the next one is always visible
//! - Rotation is clockwise only, with horizontal kicks of 0, -1, +1, -2, +2
//! - A piece locks as soon as a downward move is blocked (no lock delay)
//! - Line clears score 40/100/300/1200 times the current level
//! - Every 10 lines raise the level; gravity speeds up by 100ms per level, down to 100ms
//! - Manual moves are debounced to one per 50ms; gravity and rotation are not
//!
//! # Example
//!
//! ```
//! use blockfall_core::Session;
//! use blockfall_core::types::{Command, SessionStatus};
//!
//! let mut session = Session::new(12345);
//! session.apply_command(Command::Start);
//! assert_eq!(session.status(), SessionStatus::Active);
//!
//! session.apply_command(Command::HardDrop);
//! assert_eq!(session.board().occupied_count(), 4);
//!
//! // One second of gravity at level 1
//! assert_eq!(session.update(1000), 1);
//! ```

pub mod board;
pub mod high_scores;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod timer;

pub use blockfall_types as types;

pub use board::Board;
pub use high_scores::HighScoreList;
pub use pieces::{Mask, Piece};
pub use rng::{PieceGenerator, SimpleRng};
pub use scoring::{level_for_lines, line_clear_points, tick_interval_ms, ScoreResult, ScoreState};
pub use session::{LastEvent, Session};
pub use snapshot::{piece_from_cell, ActiveSnapshot, GameSnapshot, NextSnapshot};
pub use timer::{GravityTimer, TickRequest};
