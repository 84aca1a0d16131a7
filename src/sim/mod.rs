//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One cell per tick, no partial updates
//! - Seeded RNG only
//! - No timing, rendering or platform dependencies

pub mod board;
pub mod input;
pub mod state;
pub mod tick;

pub use board::{Board, Cell, Direction, Snake};
pub use input::{InputBuffer, RawInput, key_direction, swipe_direction};
pub use state::{GamePhase, GameState};
pub use tick::{Collision, TickOutcome, check_collision, place_food, tick};
