//! Grid geometry: cells, directions, the snake body and the board bounds

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// A grid cell, 0-indexed. Rows grow downward, columns grow rightward.
///
/// Coordinates are signed so a head that has just left the board can still
/// be represented and rejected by [`Board::contains`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Neighbouring cell one step in `direction`, saturating at the `i32` range
    pub fn step(self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        Self {
            row: self.row.saturating_add(d_row),
            col: self.col.saturating_add(d_col),
        }
    }
}

impl From<(i32, i32)> for Cell {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

/// Heading of the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// True if turning from `self` to `other` would reverse onto the neck
    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Unit step as (row delta, column delta)
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Square playing field of side `size`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells
    pub fn area(&self) -> usize {
        self.size * self.size
    }

    /// Side length as a signed coordinate bound, clamped to `i32::MAX`
    pub fn side(&self) -> i32 {
        i32::try_from(self.size).unwrap_or(i32::MAX)
    }

    /// Whether `cell` lies within `[0, size)` on both axes
    pub fn contains(&self, cell: Cell) -> bool {
        let n = self.side();
        (0..n).contains(&cell.row) && (0..n).contains(&cell.col)
    }

    /// Centre cell (rounded down), where a fresh snake spawns
    pub fn center(&self) -> Cell {
        let c = self.side() / 2;
        Cell::new(c, c)
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let n = self.side();
        (0..n).flat_map(move |row| (0..n).map(move |col| Cell::new(row, col)))
    }

    /// Cells not covered by the snake, in row-major order
    pub fn free_cells<'a>(&'a self, snake: &'a Snake) -> impl Iterator<Item = Cell> + 'a {
        self.cells().filter(move |cell| !snake.occupies(*cell))
    }
}

/// The snake body, head first. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    /// Single-segment snake
    pub fn new(head: Cell) -> Self {
        Self {
            body: VecDeque::from([head]),
        }
    }

    /// Straight snake of `length` segments trailing behind `head`, opposite to `heading`
    pub fn straight(head: Cell, heading: Direction, length: usize) -> Self {
        let back = heading.opposite();
        let mut body = VecDeque::new();
        let mut cell = head;
        body.push_back(cell);
        for _ in 1..length {
            cell = cell.step(back);
            body.push_back(cell);
        }
        Self { body }
    }

    /// Build from explicit cells, head first. `None` if empty or self-overlapping.
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Option<Self> {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        if body.is_empty() {
            return None;
        }
        let has_duplicate = body
            .iter()
            .enumerate()
            .any(|(i, cell)| body.iter().skip(i + 1).any(|other| other == cell));
        if has_duplicate {
            return None;
        }
        Some(Self { body })
    }

    pub fn head(&self) -> Cell {
        // Length >= 1 is maintained by every constructor and by `advance`
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn cells(&self) -> impl ExactSizeIterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    /// Move onto `new_head`; the tail is kept when `grow` is set
    pub fn advance(&mut self, new_head: Cell, grow: bool) {
        self.body.push_front(new_head);
        if !grow {
            self.body.pop_back();
        }
    }
}
