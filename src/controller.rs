use crate::direction::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The very first direction of the game; the caller runs a tick right away.
    Started,
    Accepted,
    /// Reversal, repeat of the current direction, or a second change this tick.
    Ignored,
}

/// Buffers at most one human turn per tick so two quick key presses cannot
/// fold the snake back onto itself within a single step.
#[derive(Debug, Default)]
pub struct DirectionController {
    current: Option<Direction>,
    changed_this_tick: bool,
}

impl DirectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Direction> {
        self.current
    }

    pub fn request_change(&mut self, requested: Direction) -> ChangeOutcome {
        if self.changed_this_tick || self.current == Some(requested) {
            return ChangeOutcome::Ignored;
        }

        match self.current {
            Some(current) if current.is_opposite(requested) => ChangeOutcome::Ignored,
            Some(_) => {
                self.current = Some(requested);
                self.changed_this_tick = true;
                ChangeOutcome::Accepted
            }
            None => {
                self.current = Some(requested);
                self.changed_this_tick = true;
                ChangeOutcome::Started
            }
        }
    }

    /// Installs a direction without the human rules; used when the bot steers.
    pub fn force(&mut self, direction: Direction) {
        self.current = Some(direction);
    }

    pub fn reset_for_tick(&mut self) {
        self.changed_this_tick = false;
    }
}
