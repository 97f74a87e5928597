use std::collections::VecDeque;

use crate::direction::Direction;
use crate::grid::{Grid, Occupancy, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveResult {
    /// The head moved; `grew` when it landed on food and the tail stayed put.
    Advanced { grew: bool },
    /// The target was a wall or part of the snake. Nothing changed.
    Blocked,
}

/// The snake's body as grid positions, head at the front.
#[derive(Debug)]
pub struct Snake {
    body: VecDeque<Pos>,
}

impl Snake {
    /// One-cell snake on `start`.
    pub fn new(grid: &mut Grid, start: Pos) -> Self {
        grid.mark_snake(start, Occupancy::SnakeHead);
        Snake {
            body: VecDeque::from([start]),
        }
    }

    pub fn head(&self) -> Pos {
        self.body[0]
    }

    pub fn tail(&self) -> Pos {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Never true in practice; the head is always there.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Points the head at the direction it is about to take.
    pub fn turn_head(&self, grid: &mut Grid, direction: Direction) {
        grid.set_facing(self.head(), direction);
    }

    pub fn slither(&mut self, grid: &mut Grid, direction: Direction) -> MoveResult {
        let old_head = self.head();
        let (row, col) = old_head.offset(direction.delta());
        // Past the edge counts as a wall.
        let Some(target) = grid.checked_pos(row, col) else {
            return MoveResult::Blocked;
        };
        let occupancy = grid.cell(target).occupancy();
        if occupancy.is_snake() {
            return MoveResult::Blocked;
        }
        let ate_food = occupancy == Occupancy::Food;

        self.body.push_front(target);
        grid.mark_snake(target, Occupancy::SnakeHead);
        grid.set_facing(target, direction);

        if !ate_food {
            if let Some(old_tail) = self.body.pop_back() {
                grid.mark_empty(old_tail);
            }
        }

        // A one-cell snake has no separate tail.
        if self.body.len() > 1 {
            grid.mark_snake(self.tail(), Occupancy::SnakeTail);
        }
        if self.body.len() > 2 {
            grid.mark_snake(old_head, Occupancy::SnakeBody);
        }

        MoveResult::Advanced { grew: ate_food }
    }
}

#[cfg(test)]
impl Snake {
    /// Lays out a snake over `cells` (head first), every cell facing `facing`.
    pub fn with_body(grid: &mut Grid, cells: &[Pos], facing: Direction) -> Self {
        assert!(!cells.is_empty());
        let last = cells.len() - 1;
        for (i, &pos) in cells.iter().enumerate() {
            let tag = match i {
                0 => Occupancy::SnakeHead,
                i if i == last => Occupancy::SnakeTail,
                _ => Occupancy::SnakeBody,
            };
            grid.mark_snake(pos, tag);
            grid.set_facing(pos, facing);
        }
        Snake {
            body: cells.iter().copied().collect(),
        }
    }

    pub fn cells(&self) -> Vec<Pos> {
        self.body.iter().copied().collect()
    }

    /// Checks every body invariant against the grid.
    pub fn assert_invariants(&self, grid: &Grid) {
        let cells = self.cells();
        let unique: std::collections::HashSet<_> = cells.iter().collect();
        assert_eq!(unique.len(), cells.len(), "duplicate cells in {:?}", cells);

        for pair in cells.windows(2) {
            assert!(pair[0].is_adjacent(pair[1]), "gap in body {:?}", cells);
        }

        let last = cells.len() - 1;
        for (i, &pos) in cells.iter().enumerate() {
            let expected = match i {
                0 => Occupancy::SnakeHead,
                i if i == last => Occupancy::SnakeTail,
                _ => Occupancy::SnakeBody,
            };
            assert_eq!(grid.cell(pos).occupancy(), expected, "segment {} at {:?}", i, pos);
        }

        let n = grid.size() as i64;
        for row in -1..=n {
            for col in -1..=n {
                let on_snake = grid
                    .checked_pos(row, col)
                    .is_some_and(|pos| unique.contains(&pos));
                let off_grid = grid.checked_pos(row, col).is_none();
                assert_eq!(grid.is_blocked(row, col), on_snake || off_grid);
            }
        }
        assert_eq!(grid.occupied_count(), cells.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_snake() {
        let mut grid = Grid::new(4);
        let snake = Snake::new(&mut grid, Pos::new(2, 2));

        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Pos::new(2, 2));
        assert_eq!(snake.tail(), snake.head());
        assert_eq!(grid.empty_count(), 15);
        snake.assert_invariants(&grid);
    }

    #[test]
    fn test_single_cell_move_leaves_start_empty() {
        let mut grid = Grid::new(4);
        let mut snake = Snake::new(&mut grid, Pos::new(2, 2));

        let result = snake.slither(&mut grid, Direction::Down);

        assert_eq!(result, MoveResult::Advanced { grew: false });
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Pos::new(3, 2));
        assert_eq!(grid.cell(Pos::new(2, 2)).occupancy(), Occupancy::Empty);
        assert_eq!(grid.cell(Pos::new(3, 2)).occupancy(), Occupancy::SnakeHead);
        assert_eq!(grid.cell(Pos::new(3, 2)).facing(), Some(Direction::Down));
        snake.assert_invariants(&grid);
    }

    #[test]
    fn test_eating_grows_by_one() {
        let mut grid = Grid::new(4);
        let mut snake = Snake::new(&mut grid, Pos::new(2, 2));
        grid.mark_food(Pos::new(3, 2));
        let empty_before = grid.empty_count();

        let result = snake.slither(&mut grid, Direction::Down);

        assert_eq!(result, MoveResult::Advanced { grew: true });
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.head(), Pos::new(3, 2));
        assert_eq!(snake.tail(), Pos::new(2, 2));
        assert_eq!(grid.cell(Pos::new(2, 2)).occupancy(), Occupancy::SnakeTail);
        assert_eq!(grid.food(), None);
        assert_eq!(grid.empty_count(), empty_before);
        snake.assert_invariants(&grid);
    }

    #[test]
    fn test_move_on_smallest_grid() {
        let mut grid = Grid::new(2);
        let mut snake = Snake::new(&mut grid, Pos::new(0, 0));
        snake.turn_head(&mut grid, Direction::Right);

        assert_eq!(
            snake.slither(&mut grid, Direction::Right),
            MoveResult::Advanced { grew: false }
        );
        assert_eq!(snake.head(), Pos::new(0, 1));
    }

    #[test]
    fn test_wall_is_blocked_without_mutation() {
        let mut grid = Grid::new(3);
        let mut snake = Snake::with_body(
            &mut grid,
            &[Pos::new(0, 1), Pos::new(1, 1)],
            Direction::Up,
        );

        assert_eq!(snake.slither(&mut grid, Direction::Up), MoveResult::Blocked);
        assert_eq!(snake.cells(), vec![Pos::new(0, 1), Pos::new(1, 1)]);
        assert_eq!(grid.empty_count(), 7);
        snake.assert_invariants(&grid);
    }

    #[test]
    fn test_every_edge_is_blocked() {
        let mut grid = Grid::new(2);
        let corners = [
            (Pos::new(0, 0), [Direction::Up, Direction::Left]),
            (Pos::new(0, 1), [Direction::Up, Direction::Right]),
            (Pos::new(1, 0), [Direction::Down, Direction::Left]),
            (Pos::new(1, 1), [Direction::Down, Direction::Right]),
        ];
        for (start, walls) in corners {
            let mut snake = Snake::new(&mut grid, start);
            for dir in walls {
                assert_eq!(snake.slither(&mut grid, dir), MoveResult::Blocked);
                assert_eq!(snake.head(), start);
            }
            snake.assert_invariants(&grid);
            grid.mark_empty(start);
        }
        assert_eq!(grid.empty_count(), 4);
    }

    #[test]
    fn test_self_collision_is_blocked() {
        let mut grid = Grid::new(5);
        // Head at (1,1), body curls around so (2,1) below the head is taken.
        let mut snake = Snake::with_body(
            &mut grid,
            &[
                Pos::new(1, 1),
                Pos::new(1, 2),
                Pos::new(2, 2),
                Pos::new(2, 1),
                Pos::new(3, 1),
            ],
            Direction::Left,
        );

        assert_eq!(snake.slither(&mut grid, Direction::Down), MoveResult::Blocked);
        assert_eq!(snake.len(), 5);
        snake.assert_invariants(&grid);
    }

    #[test]
    fn test_moving_into_own_tail_is_blocked() {
        let mut grid = Grid::new(3);
        let mut snake = Snake::with_body(
            &mut grid,
            &[Pos::new(0, 0), Pos::new(0, 1), Pos::new(1, 1), Pos::new(1, 0)],
            Direction::Left,
        );

        assert_eq!(snake.slither(&mut grid, Direction::Down), MoveResult::Blocked);
    }

    #[test]
    fn test_retagging_on_move() {
        let mut grid = Grid::new(5);
        let mut snake = Snake::with_body(
            &mut grid,
            &[Pos::new(2, 2), Pos::new(2, 3), Pos::new(2, 4)],
            Direction::Left,
        );

        snake.slither(&mut grid, Direction::Up);

        assert_eq!(snake.cells(), vec![Pos::new(1, 2), Pos::new(2, 2), Pos::new(2, 3)]);
        assert_eq!(grid.cell(Pos::new(1, 2)).occupancy(), Occupancy::SnakeHead);
        assert_eq!(grid.cell(Pos::new(2, 2)).occupancy(), Occupancy::SnakeBody);
        assert_eq!(grid.cell(Pos::new(2, 3)).occupancy(), Occupancy::SnakeTail);
        assert_eq!(grid.cell(Pos::new(2, 4)).occupancy(), Occupancy::Empty);
        // The old head keeps the facing it was entered with.
        assert_eq!(grid.cell(Pos::new(2, 2)).facing(), Some(Direction::Left));
        snake.assert_invariants(&grid);
    }

    #[test]
    fn test_two_cell_snake_former_head_becomes_tail() {
        let mut grid = Grid::new(4);
        let mut snake = Snake::with_body(
            &mut grid,
            &[Pos::new(1, 1), Pos::new(1, 2)],
            Direction::Left,
        );

        snake.slither(&mut grid, Direction::Left);

        assert_eq!(grid.cell(Pos::new(1, 1)).occupancy(), Occupancy::SnakeTail);
        snake.assert_invariants(&grid);
    }

    #[test]
    fn test_occupied_count_round_trip() {
        let mut grid = Grid::new(6);
        let mut snake = Snake::new(&mut grid, Pos::new(3, 3));
        let path = [
            Direction::Up,
            Direction::Up,
            Direction::Left,
            Direction::Down,
            Direction::Down,
            Direction::Down,
            Direction::Right,
            Direction::Right,
        ];

        for (i, dir) in path.into_iter().enumerate() {
            // Feed food on every other step.
            if i % 2 == 0 {
                let (row, col) = snake.head().offset(dir.delta());
                if let Some(pos) = grid.checked_pos(row, col) {
                    grid.mark_food(pos);
                }
            }
            let occupied = grid.occupied_count();
            let empty = grid.empty_count();

            match snake.slither(&mut grid, dir) {
                MoveResult::Advanced { grew: false } => {
                    assert_eq!(grid.occupied_count(), occupied);
                }
                MoveResult::Advanced { grew: true } => {
                    assert_eq!(grid.occupied_count(), occupied + 1);
                    assert!(empty - grid.empty_count() <= 1);
                }
                MoveResult::Blocked => panic!("unexpected collision at step {}", i),
            }
            snake.assert_invariants(&grid);
        }
        assert_eq!(snake.len(), 5);
    }
}
