//! Renderer-facing copy of a session's observable state.
//!
//! Plain `Copy` data: a renderer reads it and never reaches back into the session.

use crate::pieces::{Mask, Piece};
use crate::types::{PieceKind, SessionStatus, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub mask: Mask,
    pub x: i8,
    pub y: i8,
}

impl From<Piece> for ActiveSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind(),
            mask: *value.mask(),
            x: value.x(),
            y: value.y(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NextSnapshot {
    pub kind: PieceKind,
    pub mask: Mask,
}

impl From<Piece> for NextSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind(),
            mask: *value.mask(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    /// `0` = empty, `1..=7` = `PieceKind::index() + 1`
    pub board: [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub next: Option<NextSnapshot>,
    pub status: SessionStatus,
    pub seed: u32,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub tick_interval_ms: u32,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost_y: None,
            next: None,
            status: SessionStatus::Idle,
            seed: 0,
            score: 0,
            level: 0,
            lines: 0,
            tick_interval_ms: 0,
        }
    }
}

/// Map a snapshot board value back to its kind
pub fn piece_from_cell(v: u8) -> Option<PieceKind> {
    v.checked_sub(1)
        .and_then(|idx| PieceKind::from_index(idx as usize))
}
