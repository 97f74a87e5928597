use std::time::Duration;

use log::{info, warn};

use crate::config::{BoardSize, GameConfig};
use crate::controller::ChangeOutcome;
use crate::direction::Direction;
use crate::error::GameError;
use crate::game::{Game, TickOutcome};

/// Handle for a scheduled tick. Only tokens from the current game are honoured,
/// so a timer armed before a restart cannot move the new snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickToken {
    generation: u64,
}

/// Owns the running game and rebuilds it on restart or resize.
#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    game: Game,
    generation: u64,
}

impl Session {
    pub fn new(config: GameConfig) -> Self {
        let game = Game::new(&config);
        Session {
            config,
            game,
            generation: 0,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn token(&self) -> TickToken {
        TickToken {
            generation: self.generation,
        }
    }

    /// Throws the current game away and starts a fresh one with the same settings.
    pub fn restart(&mut self) {
        self.generation += 1;
        // Free the old board first; two 10000x10000 boards do not fit together.
        drop(std::mem::replace(&mut self.game, Game::placeholder()));
        self.game = Game::new(&self.config);
    }

    /// Starts over on an `size` x `size` board. Out-of-range sizes leave the
    /// current game running.
    pub fn resize(&mut self, size: usize) -> Result<(), GameError> {
        let board_size = BoardSize::new(size).inspect_err(|e| warn!("Resize rejected: {}", e))?;
        info!("Board resized to {}x{}", size, size);
        self.config.board_size = board_size;
        self.restart();
        Ok(())
    }

    pub fn toggle_pilot(&mut self) {
        self.config.pilot = self.config.pilot.toggled();
        self.restart();
    }

    /// Forwards a human turn. Returns a token when this was the first
    /// direction of the game and a tick should run immediately.
    pub fn request_direction(&mut self, direction: Direction) -> Option<TickToken> {
        match self.game.request_direction(direction) {
            ChangeOutcome::Started => Some(self.token()),
            ChangeOutcome::Accepted | ChangeOutcome::Ignored => None,
        }
    }

    /// Runs one tick for `token`; `None` if the token belongs to a discarded game.
    pub fn tick(&mut self, token: TickToken) -> Option<TickOutcome> {
        if token != self.token() {
            return None;
        }
        Some(self.game.tick())
    }

    /// Delay before the tick after `outcome`, or `None` when ticking should stop.
    pub fn next_delay(&self, outcome: TickOutcome) -> Option<Duration> {
        match outcome {
            TickOutcome::Advanced { .. } => Some(self.config.move_interval()),
            TickOutcome::Idle | TickOutcome::Finished(_) => None,
        }
    }

    /// Delay before the first tick of the current game, if it starts by itself.
    pub fn start_delay(&self) -> Option<Duration> {
        self.config.start_delay()
    }
}
