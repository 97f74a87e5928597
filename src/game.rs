use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::bot::Bot;
use crate::config::{BoardSize, GameConfig, PilotKind};
use crate::controller::{ChangeOutcome, DirectionController};
use crate::direction::Direction;
use crate::grid::{Grid, Pos};
use crate::snake::{MoveResult, Snake};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Lost,
    Won,
}

impl Outcome {
    pub fn banner(&self) -> &'static str {
        match self {
            Outcome::Lost => "Game Over!",
            Outcome::Won => "You Win!",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// No direction yet, the snake waits for its first input.
    Idle,
    Advanced { grew: bool },
    Finished(Outcome),
}

#[derive(Debug)]
enum Pilot {
    Human,
    Bot(Bot),
}

/// One round of snake: board, snake and whoever steers it. Rebuilt from
/// scratch on every restart.
#[derive(Debug)]
pub struct Game {
    grid: Grid,
    snake: Snake,
    controller: DirectionController,
    pilot: Pilot,
    outcome: Option<Outcome>,
    rng: StdRng,
}

impl Game {
    pub fn new(config: &GameConfig) -> Self {
        let game = Game::build(config);
        info!(
            "New {}x{} game, {:?} at the wheel",
            game.grid.size(),
            game.grid.size(),
            config.pilot
        );
        game
    }

    /// Smallest possible game, used to release a large board before its
    /// replacement is allocated.
    pub(crate) fn placeholder() -> Self {
        Game::build(&GameConfig::new(BoardSize::SMALLEST, PilotKind::Human).with_seed(Some(0)))
    }

    fn build(config: &GameConfig) -> Self {
        let size = config.board_size.get();
        let mut grid = Grid::new(size);
        let start = Pos::new(size / 2, size / 2);
        let snake = Snake::new(&mut grid, start);

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        grid.spawn_food(&mut rng);

        let pilot = match config.pilot {
            PilotKind::Human => Pilot::Human,
            PilotKind::Bot => Pilot::Bot(Bot::new(size, start)),
        };

        Game {
            grid,
            snake,
            controller: DirectionController::new(),
            pilot,
            outcome: None,
            rng,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn head(&self) -> Pos {
        self.snake.head()
    }

    /// Score is the length of the snake.
    pub fn score(&self) -> usize {
        self.snake.len()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn direction(&self) -> Option<Direction> {
        self.controller.current()
    }

    pub fn pilot(&self) -> PilotKind {
        match self.pilot {
            Pilot::Human => PilotKind::Human,
            Pilot::Bot(_) => PilotKind::Bot,
        }
    }

    /// Human steering input. The bot does its own steering, so input while it
    /// plays is dropped.
    pub fn request_direction(&mut self, direction: Direction) -> ChangeOutcome {
        if self.outcome.is_some() {
            return ChangeOutcome::Ignored;
        }
        if let Pilot::Bot(_) = self.pilot {
            warn!("Can't change direction while bot is playing");
            return ChangeOutcome::Ignored;
        }

        let change = self.controller.request_change(direction);
        if change != ChangeOutcome::Ignored {
            self.snake.turn_head(&mut self.grid, direction);
        }
        change
    }

    pub fn tick(&mut self) -> TickOutcome {
        if let Some(outcome) = self.outcome {
            return TickOutcome::Finished(outcome);
        }

        let direction = match &self.pilot {
            Pilot::Human => self.controller.current(),
            Pilot::Bot(bot) => {
                let direction = bot.next_direction();
                self.controller.force(direction);
                Some(direction)
            }
        };
        let Some(direction) = direction else {
            return TickOutcome::Idle;
        };

        let cells = self.grid.size() * self.grid.size();
        if self.snake.len() == cells {
            return self.finish(Outcome::Won);
        }

        let result = self.snake.slither(&mut self.grid, direction);
        self.controller.reset_for_tick();

        let grew = match result {
            MoveResult::Blocked => return self.finish(Outcome::Lost),
            MoveResult::Advanced { grew } => grew,
        };

        if let Pilot::Bot(bot) = &mut self.pilot {
            let head = self.snake.head();
            bot.update_position(head, self.grid.cell(head).facing());
            self.snake.turn_head(&mut self.grid, bot.next_direction());
        }

        if grew && self.grid.spawn_food(&mut self.rng).is_none() {
            return self.finish(Outcome::Won);
        }

        TickOutcome::Advanced { grew }
    }

    fn finish(&mut self, outcome: Outcome) -> TickOutcome {
        info!("{} Final score: {}", outcome.banner(), self.score());
        self.outcome = Some(outcome);
        TickOutcome::Finished(outcome)
    }
}

#[cfg(test)]
impl Game {
    /// Human game with a hand-placed snake and no food.
    fn with_snake(size: usize, cells: &[Pos], facing: Direction) -> Self {
        let mut grid = Grid::new(size);
        let snake = Snake::with_body(&mut grid, cells, facing);
        let mut controller = DirectionController::new();
        controller.force(facing);
        Game {
            grid,
            snake,
            controller,
            pilot: Pilot::Human,
            outcome: None,
            rng: StdRng::seed_from_u64(0),
        }
    }
}
