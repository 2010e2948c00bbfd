//! Terminal input mapping.
//!
//! Turns `crossterm` key events into [`crate::types::Command`]s. Raw key codes stop
//! here; the game core only ever sees commands.

pub mod map;

pub use blockfall_types as types;

pub use map::{handle_key_event, should_quit};
