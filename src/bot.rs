//! Autopilot that sweeps the board row by row.
//!
//! After dropping from the centre to the bottom row the head settles on a
//! closed tour: along the bottom row to the left edge, then up the board in a
//! zigzag over columns `0..N-1`, along the top row to the last column and back
//! down it. On an even board that tour passes through every cell exactly once,
//! so a snake following it can only ever run into the cell its own tail is
//! about to leave, which happens when the board is full.

use crate::direction::Direction;
use crate::grid::Pos;

/// Sweep decision for a head at `head` that last moved `current` on an
/// `size` x `size` board. `size` should be even.
///
/// The very first move of a game goes down. A head that spawns on the bottom
/// row (only possible when `size == 2`) turns left straight away instead of
/// stepping off the board.
pub fn next_direction(size: usize, head: Pos, current: Option<Direction>) -> Direction {
    let current = current.unwrap_or(Direction::Down);
    let (y, x) = (head.row, head.col);
    let last = size - 1;

    match current {
        Direction::Down if y == last => Direction::Left,
        Direction::Left if x == 0 => Direction::Up,
        Direction::Right if x == last => Direction::Down,
        Direction::Right if x + 2 == size && y > 0 => Direction::Up,
        Direction::Up if x == 0 => Direction::Right,
        Direction::Up => Direction::Left,
        _ => current,
    }
}

/// Tracks where the head is so the sweep can be evaluated each tick.
#[derive(Debug)]
pub struct Bot {
    size: usize,
    head: Pos,
    direction: Option<Direction>,
}

impl Bot {
    pub fn new(size: usize, head: Pos) -> Self {
        Bot {
            size,
            head,
            direction: None,
        }
    }

    pub fn next_direction(&self) -> Direction {
        next_direction(self.size, self.head, self.direction)
    }

    /// Called after every successful move with the new head and the direction
    /// it was entered from.
    pub fn update_position(&mut self, head: Pos, facing: Option<Direction>) {
        self.head = head;
        self.direction = facing;
    }
}
