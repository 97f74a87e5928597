use log::debug;
use rand::Rng;

use crate::direction::{Direction, PosDelta};
use crate::error::GameError;

/// Marks a cell that is not in the empty set. Indices fit in `u32` because
/// the largest board has 10^8 cells.
const NOT_EMPTY: u32 = u32::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(row: usize, col: usize) -> Self {
        Pos { row, col }
    }

    /// Signed neighbour coordinates, which may lie outside the grid.
    pub fn offset(&self, delta: PosDelta) -> (i64, i64) {
        (self.row as i64 + delta.y, self.col as i64 + delta.x)
    }

    pub fn is_adjacent(&self, other: Pos) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Occupancy {
    #[default]
    Empty,
    Food,
    SnakeHead,
    SnakeBody,
    SnakeTail,
}

impl Occupancy {
    pub fn is_snake(&self) -> bool {
        matches!(
            self,
            Occupancy::SnakeHead | Occupancy::SnakeBody | Occupancy::SnakeTail
        )
    }
}

/// A cell's position is its index in the grid, so it is not stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    occupancy: Occupancy,
    facing: Option<Direction>,
}

impl Cell {
    pub fn occupancy(&self) -> Occupancy {
        self.occupancy
    }

    /// Direction the snake was moving when it entered this cell.
    pub fn facing(&self) -> Option<Direction> {
        self.facing
    }
}

/// N x N board. Keeps a swap-remove vector of empty cell indices next to the
/// cells so food can be dropped on a uniformly chosen empty cell in O(1).
#[derive(Debug)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
    empty: Vec<u32>,
    empty_slot: Vec<u32>,
    food: Option<usize>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        assert!(
            size * size < NOT_EMPTY as usize,
            "{}x{} grid overflows u32 cell indices",
            size,
            size
        );
        let count = (size * size) as u32;

        Grid {
            size,
            cells: vec![Cell::default(); count as usize],
            empty: (0..count).collect(),
            empty_slot: (0..count).collect(),
            food: None,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn in_bounds(&self, row: i64, col: i64) -> bool {
        let n = self.size as i64;
        (0..n).contains(&row) && (0..n).contains(&col)
    }

    fn index(&self, pos: Pos) -> usize {
        assert!(
            pos.row < self.size && pos.col < self.size,
            "cell {:?} outside {}x{} grid",
            pos,
            self.size,
            self.size
        );
        pos.row * self.size + pos.col
    }

    fn pos_of(&self, idx: usize) -> Pos {
        Pos::new(idx / self.size, idx % self.size)
    }

    /// Position for signed coordinates, or `None` past the edge.
    pub fn checked_pos(&self, row: i64, col: i64) -> Option<Pos> {
        self.in_bounds(row, col)
            .then(|| Pos::new(row as usize, col as usize))
    }

    pub fn cell_at(&self, row: i64, col: i64) -> Result<&Cell, GameError> {
        match self.checked_pos(row, col) {
            Some(pos) => Ok(self.cell(pos)),
            None => Err(GameError::OutOfBounds {
                row,
                col,
                size: self.size,
            }),
        }
    }

    /// Panics on out-of-range positions; callers hold positions the grid handed out.
    pub fn cell(&self, pos: Pos) -> &Cell {
        &self.cells[self.index(pos)]
    }

    /// Collision test for signed coordinates: walls and any part of the snake.
    pub fn is_blocked(&self, row: i64, col: i64) -> bool {
        match self.checked_pos(row, col) {
            Some(pos) => self.cell(pos).occupancy.is_snake(),
            None => true,
        }
    }

    pub fn food(&self) -> Option<Pos> {
        self.food.map(|idx| self.pos_of(idx))
    }

    pub fn empty_count(&self) -> usize {
        self.empty.len()
    }

    /// Number of cells held by the snake.
    pub fn occupied_count(&self) -> usize {
        self.cells.len() - self.empty.len() - usize::from(self.food.is_some())
    }

    fn take_from_empty(&mut self, idx: usize) {
        let slot = self.empty_slot[idx];
        if slot == NOT_EMPTY {
            return;
        }
        self.empty.swap_remove(slot as usize);
        if let Some(&moved) = self.empty.get(slot as usize) {
            self.empty_slot[moved as usize] = slot;
        }
        self.empty_slot[idx] = NOT_EMPTY;
    }

    fn set_occupancy(&mut self, idx: usize, occupancy: Occupancy) {
        if self.cells[idx].occupancy == Occupancy::Food && occupancy != Occupancy::Food {
            self.food = None;
        }
        self.cells[idx].occupancy = occupancy;
    }

    pub fn mark_empty(&mut self, pos: Pos) {
        let idx = self.index(pos);
        if self.cells[idx].occupancy == Occupancy::Empty {
            return;
        }
        self.set_occupancy(idx, Occupancy::Empty);
        self.cells[idx].facing = None;
        self.empty_slot[idx] = self.empty.len() as u32;
        self.empty.push(idx as u32);
    }

    pub fn mark_food(&mut self, pos: Pos) {
        let idx = self.index(pos);
        assert!(
            !self.cells[idx].occupancy.is_snake(),
            "cannot place food on the snake at {:?}",
            pos
        );
        assert!(
            self.food.map_or(true, |current| current == idx),
            "food already on the board"
        );
        self.take_from_empty(idx);
        self.set_occupancy(idx, Occupancy::Food);
        self.food = Some(idx);
    }

    /// Tags a cell as part of the snake. Facing is left as is.
    pub fn mark_snake(&mut self, pos: Pos, tag: Occupancy) {
        assert!(tag.is_snake(), "{:?} is not a snake tag", tag);
        let idx = self.index(pos);
        self.take_from_empty(idx);
        self.set_occupancy(idx, tag);
    }

    pub fn set_facing(&mut self, pos: Pos, facing: Direction) {
        let idx = self.index(pos);
        self.cells[idx].facing = Some(facing);
    }

    /// Drops food on an empty cell chosen uniformly at random. `None` when the
    /// board has no empty cell left.
    pub fn spawn_food(&mut self, rng: &mut impl Rng) -> Option<Pos> {
        if self.empty.is_empty() {
            return None;
        }
        let idx = self.empty[rng.gen_range(0..self.empty.len())] as usize;
        let pos = self.pos_of(idx);
        self.mark_food(pos);
        debug!("Food spawned at {:?}", pos);
        Some(pos)
    }
}
