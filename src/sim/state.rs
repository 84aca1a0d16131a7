//! Simulation state
//!
//! Everything a tick reads or writes lives in [`GameState`]. Renderers never
//! see it directly; they get a [`crate::Snapshot`] after each frame.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::{Board, Cell, Direction, Snake};
use super::input::InputBuffer;
use super::tick::place_food;
use crate::config::GameConfig;

/// Lifecycle phase of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Fresh board, waiting for start
    #[default]
    Idle,
    /// Ticks are being applied
    Running,
    /// Frozen mid-game
    Paused,
    /// Run ended by a collision; score is final
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Idle => "idle",
            GamePhase::Running => "running",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "game_over",
        }
    }
}

/// Complete simulation state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed this run's RNG was created from
    pub seed: u64,
    pub board: Board,
    pub snake: Snake,
    /// `None` only once the snake covers every cell
    pub food: Option<Cell>,
    /// Direction applied on the last tick
    pub direction: Direction,
    /// Turns waiting to be committed
    pub input: InputBuffer,
    pub score: u32,
    pub phase: GamePhase,
    /// Ticks applied since the last (re)initialisation
    pub time_ticks: u64,
    /// Random food placement attempts before enumerating free cells
    pub food_retry_limit: u32,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Fresh board for `config`, in [`GamePhase::Idle`]
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let board = config.board();
        let snake = config.initial_snake();
        let mut rng = Pcg32::seed_from_u64(seed);

        let food = match config.initial_food {
            Some(cell) if board.contains(cell) && !snake.occupies(cell) => Some(cell),
            _ => place_food(&board, &snake, &mut rng, config.food_retry_limit),
        };

        Self {
            seed,
            board,
            snake,
            food,
            direction: config.initial_direction,
            input: InputBuffer::with_cap(config.input_queue_cap),
            score: 0,
            phase: GamePhase::Idle,
            time_ticks: 0,
            food_retry_limit: config.food_retry_limit,
            rng,
        }
    }

    /// Queue a turn against the current heading
    pub fn queue_turn(&mut self, direction: Direction) -> bool {
        self.input.push(direction, self.direction)
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }
}
