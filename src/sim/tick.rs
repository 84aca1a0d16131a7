//! Fixed-step simulation tick
//!
//! Advances the snake exactly one cell. A tick either moves, grows, or ends
//! the run; no partial update is ever left behind.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::board::{Board, Cell, Snake};
use super::state::{GamePhase, GameState};

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    /// Head left the board
    Wall,
    /// Head ran into the body
    Body,
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing changed
    Skipped,
    /// Snake moved one cell
    Moved,
    /// Snake ate; `food` is the respawned food cell
    Grew { food: Option<Cell> },
    /// Fatal collision; phase is now [`GamePhase::GameOver`]
    Collided(Collision),
}

impl TickOutcome {
    pub fn is_fatal(&self) -> bool {
        matches!(self, TickOutcome::Collided(_))
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState) -> TickOutcome {
    if state.phase != GamePhase::Running {
        return TickOutcome::Skipped;
    }

    // Re-check reversal: the queue was filtered against the heading at submit time,
    // which may have changed since
    if let Some(next) = state.input.pop() {
        if !next.is_opposite(state.direction) {
            state.direction = next;
        }
    }

    state.time_ticks += 1;
    let new_head = state.snake.head().step(state.direction);

    if let Some(collision) = check_collision(&state.board, &state.snake, new_head) {
        state.phase = GamePhase::GameOver;
        state.input.clear();
        return TickOutcome::Collided(collision);
    }

    if state.food == Some(new_head) {
        state.snake.advance(new_head, true);
        state.score += 1;
        state.food = place_food(
            &state.board,
            &state.snake,
            &mut state.rng,
            state.food_retry_limit,
        );
        log::debug!(
            "Ate at {:?}: score {}, length {}, food -> {:?}",
            new_head,
            state.score,
            state.snake.len(),
            state.food
        );
        return TickOutcome::Grew { food: state.food };
    }

    state.snake.advance(new_head, false);
    TickOutcome::Moved
}

/// Wall or body hit for a prospective head cell
///
/// Every current segment counts, including the tail that would move away
/// this tick.
pub fn check_collision(board: &Board, snake: &Snake, new_head: Cell) -> Option<Collision> {
    if !board.contains(new_head) {
        Some(Collision::Wall)
    } else if snake.occupies(new_head) {
        Some(Collision::Body)
    } else {
        None
    }
}

/// Pick a food cell uniformly among the cells the snake does not cover
///
/// Tries `retry_limit` random cells first, then enumerates the free cells so
/// a nearly full board cannot livelock. `None` when the board is full.
pub fn place_food<R: Rng + ?Sized>(
    board: &Board,
    snake: &Snake,
    rng: &mut R,
    retry_limit: u32,
) -> Option<Cell> {
    let n = board.side();
    if n == 0 {
        return None;
    }

    for _ in 0..retry_limit {
        let cell = Cell::new(rng.random_range(0..n), rng.random_range(0..n));
        if !snake.occupies(cell) {
            return Some(cell);
        }
    }

    let free: Vec<Cell> = board.free_cells(snake).collect();
    if free.is_empty() {
        log::warn!("No free cell left for food ({} segments)", snake.len());
        return None;
    }
    log::debug!(
        "Food sampling fell back to enumeration ({} free cells)",
        free.len()
    );
    free.choose(rng).copied()
}
