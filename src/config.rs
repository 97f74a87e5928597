use std::time::Duration;

use crate::error::GameError;

/// Milliseconds divided by the board size to get the human move interval, so
/// bigger boards play faster.
const INVERSE_PROP_MS: u64 = 2000;
const BOT_MOVE_INTERVAL: Duration = Duration::from_millis(1);
const BOT_START_DELAY: Duration = Duration::from_millis(1000);

/// Side length N of the square board, validated to [`BoardSize::MIN`, `BoardSize::MAX`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardSize(usize);

impl BoardSize {
    pub const MIN: usize = 2;
    pub const MAX: usize = 10_000;
    pub const SMALLEST: BoardSize = BoardSize(Self::MIN);

    pub fn new(size: usize) -> Result<Self, GameError> {
        if !(Self::MIN..=Self::MAX).contains(&size) {
            return Err(GameError::InvalidBoardSize(size));
        }
        Ok(BoardSize(size))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        BoardSize(20)
    }
}

/// Who steers the snake.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PilotKind {
    #[default]
    Human,
    Bot,
}

impl PilotKind {
    pub fn toggled(&self) -> PilotKind {
        match self {
            PilotKind::Human => PilotKind::Bot,
            PilotKind::Bot => PilotKind::Human,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameConfig {
    pub board_size: BoardSize,
    pub pilot: PilotKind,
    /// Fixed seed for food placement; entropy when unset.
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn new(board_size: BoardSize, pilot: PilotKind) -> Self {
        Self {
            board_size,
            pilot,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Time between two moves once the snake is under way.
    pub fn move_interval(&self) -> Duration {
        match self.pilot {
            PilotKind::Human => {
                let ms = INVERSE_PROP_MS / self.board_size.get() as u64;
                Duration::from_millis(ms.max(1))
            }
            PilotKind::Bot => BOT_MOVE_INTERVAL,
        }
    }

    /// Delay before the first tick of a fresh game, if it starts on its own.
    /// Human games wait for the first key press instead.
    pub fn start_delay(&self) -> Option<Duration> {
        match self.pilot {
            PilotKind::Human => None,
            PilotKind::Bot => Some(BOT_START_DELAY),
        }
    }
}
