//! Directional input capture and debouncing
//!
//! Input events arrive asynchronously relative to ticks. They only ever touch
//! the pending-turn queue, never the board, so the queue is the single hand-off
//! point between the event source and the simulation step.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::board::Direction;
use crate::consts::{INPUT_QUEUE_CAP, SWIPE_THRESHOLD};

/// Raw directional intent as delivered by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput<'a> {
    /// DOM-style key name (`"ArrowUp"`, `"w"`, ...)
    Key(&'a str),
    /// Touch travel from touchstart to touchend, screen coordinates (y down)
    Swipe(Vec2),
}

impl RawInput<'_> {
    /// Map to a direction; `None` for unmapped keys and short swipes
    pub fn direction(&self) -> Option<Direction> {
        match *self {
            RawInput::Key(key) => key_direction(key),
            RawInput::Swipe(delta) => swipe_direction(delta),
        }
    }
}

/// Arrow keys and their WASD equivalents
pub fn key_direction(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" | "w" | "W" => Some(Direction::Up),
        "ArrowDown" | "s" | "S" => Some(Direction::Down),
        "ArrowLeft" | "a" | "A" => Some(Direction::Left),
        "ArrowRight" | "d" | "D" => Some(Direction::Right),
        _ => None,
    }
}

/// Dominant-axis mapping of a swipe; ties go to the vertical axis
pub fn swipe_direction(delta: Vec2) -> Option<Direction> {
    let abs = delta.abs();
    if abs.x <= SWIPE_THRESHOLD && abs.y <= SWIPE_THRESHOLD {
        return None;
    }
    let direction = if abs.x > abs.y {
        if delta.x > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if delta.y > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };
    Some(direction)
}

/// Pending turns, consumed one per tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputBuffer {
    queue: VecDeque<Direction>,
    cap: usize,
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::with_cap(INPUT_QUEUE_CAP)
    }
}

impl InputBuffer {
    pub fn with_cap(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            queue: VecDeque::with_capacity(cap + 1),
            cap,
        }
    }

    /// Map and enqueue a raw input. Returns whether a turn was queued.
    pub fn submit(&mut self, raw: RawInput<'_>, committed: Direction) -> bool {
        match raw.direction() {
            Some(direction) => self.push(direction, committed),
            None => false,
        }
    }

    /// Enqueue `direction` unless it repeats or reverses the latest intent.
    ///
    /// The latest intent is the queue tail, or `committed` if nothing is pending.
    /// Past the cap the oldest pending turn is dropped.
    pub fn push(&mut self, direction: Direction, committed: Direction) -> bool {
        let last = self.queue.back().copied().unwrap_or(committed);
        if direction == last || direction.is_opposite(last) {
            return false;
        }
        self.queue.push_back(direction);
        while self.queue.len() > self.cap {
            self.queue.pop_front();
        }
        true
    }

    pub fn pop(&mut self) -> Option<Direction> {
        self.queue.pop_front()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn pending(&self) -> impl Iterator<Item = Direction> + '_ {
        self.queue.iter().copied()
    }
}
