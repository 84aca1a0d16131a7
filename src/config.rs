//! Game configuration and board sizing policy

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, Result};
use crate::sim::{Board, Cell, Direction, Snake};

/// Configuration for one game session
///
/// Every field can be overridden at `start()`/`reset()` through
/// [`crate::Game::reconfigure`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square board
    pub board_size: usize,
    /// Target time between ticks (ms)
    pub tick_interval_ms: f64,
    /// Segments in a fresh snake
    pub initial_length: usize,
    /// Head of a fresh snake; `None` centres it
    pub initial_head: Option<Cell>,
    /// Heading of a fresh snake
    pub initial_direction: Direction,
    /// Food cell of a fresh board; falls back to random placement when
    /// off the board or under the snake
    pub initial_food: Option<Cell>,
    /// RNG seed; `None` draws a new seed per game
    pub seed: Option<u64>,
    /// Pending turns kept ahead of the simulation
    pub input_queue_cap: usize,
    /// Random food placement attempts before enumerating free cells
    pub food_retry_limit: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: WIDE_BOARD_SIZE,
            tick_interval_ms: TICK_INTERVAL_MS,
            initial_length: 1,
            initial_head: None,
            initial_direction: Direction::Right,
            initial_food: Some(Cell::from(DEFAULT_FOOD)),
            seed: None,
            input_queue_cap: INPUT_QUEUE_CAP,
            food_retry_limit: FOOD_RETRY_LIMIT,
        }
    }
}

impl GameConfig {
    /// Default configuration with a custom board size
    pub fn with_board_size(board_size: usize) -> Self {
        Self {
            board_size,
            ..Default::default()
        }
    }

    /// Wide-viewport board
    pub fn desktop() -> Self {
        Self::with_board_size(WIDE_BOARD_SIZE)
    }

    /// Narrow-viewport board
    pub fn mobile() -> Self {
        Self::with_board_size(NARROW_BOARD_SIZE)
    }

    pub fn board(&self) -> Board {
        Board::new(self.board_size)
    }

    /// Snake a fresh game starts with
    pub fn initial_snake(&self) -> Snake {
        let head = self.initial_head.unwrap_or_else(|| self.board().center());
        Snake::straight(head, self.initial_direction, self.initial_length)
    }

    pub fn validate(&self) -> Result<()> {
        if self.board_size < MIN_BOARD_SIZE {
            return Err(ConfigError::BoardTooSmall(self.board_size));
        }
        if self.board_size > MAX_BOARD_SIZE {
            return Err(ConfigError::BoardTooLarge(self.board_size));
        }
        if !(self.tick_interval_ms.is_finite() && self.tick_interval_ms > 0.0) {
            return Err(ConfigError::InvalidTickInterval);
        }
        if self.initial_length == 0 {
            return Err(ConfigError::EmptySnake);
        }
        if self.input_queue_cap == 0 {
            return Err(ConfigError::ZeroQueueCap);
        }
        let board = self.board();
        // Bound the snake before building it
        if self.initial_length > self.board_size
            || self.initial_head.is_some_and(|head| !board.contains(head))
        {
            return Err(ConfigError::SnakeOutOfBounds(self.board_size));
        }
        if !self.initial_snake().cells().all(|cell| board.contains(cell)) {
            return Err(ConfigError::SnakeOutOfBounds(self.board_size));
        }
        Ok(())
    }
}

/// Picks the board size from the viewport width
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardSizePolicy {
    pub breakpoint: f64,
    pub narrow: usize,
    pub wide: usize,
}

impl Default for BoardSizePolicy {
    fn default() -> Self {
        Self {
            breakpoint: VIEWPORT_BREAKPOINT,
            narrow: NARROW_BOARD_SIZE,
            wide: WIDE_BOARD_SIZE,
        }
    }
}

impl BoardSizePolicy {
    pub fn size_for_viewport(&self, width: f64) -> usize {
        if width < self.breakpoint {
            self.narrow
        } else {
            self.wide
        }
    }
}
