//! Immutable per-frame view of the board
//!
//! A renderer needs nothing but a [`Snapshot`] to draw a frame.

use serde::{Deserialize, Serialize};

use crate::sim::{Cell, GamePhase, GameState};

/// Render flags of one cell. The head cell is also flagged as body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub is_snake_body: bool,
    pub is_snake_head: bool,
    pub is_food: bool,
}

impl CellView {
    pub fn is_empty(&self) -> bool {
        !(self.is_snake_body || self.is_food)
    }
}

/// Full grid plus HUD values, row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub size: usize,
    pub cells: Vec<CellView>,
    pub score: u32,
    pub phase: GamePhase,
    pub sound_on: bool,
}

impl Snapshot {
    pub fn capture(state: &GameState, sound_on: bool) -> Self {
        let size = state.board.size();
        let mut cells = vec![CellView::default(); state.board.area()];

        for cell in state.snake.cells() {
            if let Some(index) = index_of(size, cell) {
                cells[index].is_snake_body = true;
            }
        }
        if let Some(index) = index_of(size, state.snake.head()) {
            cells[index].is_snake_head = true;
        }
        if let Some(index) = state.food.and_then(|food| index_of(size, food)) {
            cells[index].is_food = true;
        }

        Self {
            size,
            cells,
            score: state.score,
            phase: state.phase,
            sound_on,
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<CellView> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.cells.get(row * self.size + col).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellView]> {
        self.cells.chunks(self.size.max(1))
    }

    /// Plain-text board: `@` head, `o` body, `*` food, `.` empty
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.size * (self.size + 1));
        for row in self.rows() {
            for view in row {
                out.push(if view.is_snake_head {
                    '@'
                } else if view.is_snake_body {
                    'o'
                } else if view.is_food {
                    '*'
                } else {
                    '.'
                });
            }
            out.push('\n');
        }
        out
    }
}

fn index_of(size: usize, cell: Cell) -> Option<usize> {
    let (row, col) = (usize::try_from(cell.row).ok()?, usize::try_from(cell.col).ok()?);
    (row < size && col < size).then_some(row * size + col)
}
