use ratatui::prelude::*;

use crate::direction::Direction;
use crate::game::Game;
use crate::grid::{Cell, Occupancy, Pos};

/// Terminal columns per board cell, so cells look roughly square.
const CELL_WIDTH: u16 = 2;
const FOOD_SYMBOL: &str = "♥";

fn head_symbol(facing: Option<Direction>) -> &'static str {
    match facing {
        Some(Direction::Up) => "▲",
        Some(Direction::Right) => "▶",
        Some(Direction::Down) => "▼",
        Some(Direction::Left) => "◀",
        None => "●",
    }
}

fn tail_symbol(facing: Option<Direction>) -> &'static str {
    match facing {
        Some(Direction::Up) => "▴",
        Some(Direction::Right) => "▸",
        Some(Direction::Down) => "▾",
        Some(Direction::Left) => "◂",
        None => "•",
    }
}

/// First board index to draw along one axis so that `head` stays in view when
/// only `visible` of `size` cells fit.
fn viewport_start(head: usize, visible: usize, size: usize) -> usize {
    if visible >= size {
        return 0;
    }
    head.saturating_sub(visible / 2).min(size - visible)
}

fn paint(cell: &Cell) -> (&'static str, Style) {
    let snake = Style::default().bg(Color::Green);
    match cell.occupancy() {
        Occupancy::Empty => ("·", Style::default().fg(Color::DarkGray)),
        Occupancy::Food => (FOOD_SYMBOL, Style::default().fg(Color::LightRed)),
        Occupancy::SnakeHead => (head_symbol(cell.facing()), snake.fg(Color::Yellow)),
        Occupancy::SnakeBody => (" ", snake),
        Occupancy::SnakeTail => (tail_symbol(cell.facing()), snake.fg(Color::Black)),
    }
}

impl Widget for &Game {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let grid = self.grid();
        let size = grid.size();
        let visible_cols = usize::from(area.width / CELL_WIDTH);
        let visible_rows = usize::from(area.height);
        let head = self.head();
        let row0 = viewport_start(head.row, visible_rows, size);
        let col0 = viewport_start(head.col, visible_cols, size);

        for r in 0..visible_rows.min(size) {
            for c in 0..visible_cols.min(size) {
                let cell = grid.cell(Pos::new(row0 + r, col0 + c));
                let (symbol, style) = paint(cell);
                // Both indices are bounded by the area dimensions.
                let x = area.x + c as u16 * CELL_WIDTH;
                let y = area.y + r as u16;

                buf[(x, y)].set_symbol(symbol).set_style(style);
                buf[(x + 1, y)].set_symbol(" ").set_style(style);
            }
        }
    }
}
