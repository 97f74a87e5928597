//! Snake on an N x N board with a sweeping autopilot.
//!
//! - Rules engine: grid, snake, direction buffering, game loop (`grid`, `snake`,
//!   `controller`, `game`, `session`)
//! - Autopilot that fills every even-sized board (`bot`)
//! - Terminal front end (`app`, `render`)

pub mod app;
pub mod bot;
pub mod config;
pub mod controller;
pub mod direction;
pub mod error;
pub mod game;
pub mod grid;
pub mod render;
pub mod session;
pub mod snake;

pub use config::{BoardSize, GameConfig, PilotKind};
pub use direction::Direction;
pub use error::GameError;
pub use game::{Game, Outcome, TickOutcome};
pub use session::{Session, TickToken};
