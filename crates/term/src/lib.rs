//! Terminal renderer for the game.
//!
//! A small, game-oriented rendering layer: no widget toolkit, just a framebuffer
//! of styled cells that a [`GameView`] fills from a snapshot and a
//! [`TerminalRenderer`] flushes to the terminal.
//!
//! - Keeps `core` free of I/O
//! - Cells are drawn 2 columns wide to offset the terminal glyph aspect ratio

pub mod backdrop;
pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use backdrop::{Backdrop, BackdropConfig, FallingShape};
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{kind_rgb, GameView, ViewExtras, Viewport};
pub use renderer::{collect_spans, FrameEncoder, FrameStats, Span, TerminalRenderer, MERGE_GAP};
