use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{prelude::*, widgets::*};

use crate::config::{BoardSize, GameConfig, PilotKind};
use crate::direction::Direction;
use crate::session::{Session, TickToken};

/// Longest wait for input while nothing is due.
const IDLE_POLL: Duration = Duration::from_millis(100);
/// Ticks the bot may catch up on per frame when the loop falls behind.
const MAX_TICKS_PER_UPDATE: usize = 64;
const MAX_SIZE_DIGITS: usize = 6;
const HELP_TEXT: &str =
    "Arrows/WASD steer  SPACE pause  R play again  N board size  P switch pilot  Q quit";

#[derive(Debug, PartialEq, Eq)]
enum Mode {
    Running,
    /// Paused since the given instant.
    Paused(Instant),
    EnteringSize(String),
    Exit,
}

#[derive(Clone, Copy, Debug)]
struct Scheduled {
    token: TickToken,
    due: Instant,
}

/// Terminal front end: maps keys onto the session, owns the tick timer and
/// draws the frame.
pub struct App {
    session: Session,
    mode: Mode,
    scheduled: Option<Scheduled>,
    status: Option<String>,
}

impl App {
    pub fn new(config: GameConfig, now: Instant) -> Self {
        let mut app = App {
            session: Session::new(config),
            mode: Mode::Running,
            scheduled: None,
            status: None,
        };
        app.arm_start(now);
        app
    }

    pub fn should_exit(&self) -> bool {
        self.mode == Mode::Exit
    }

    /// How long the event poll may block before the next tick is due.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        match (&self.mode, self.scheduled) {
            (Mode::Running, Some(scheduled)) => {
                scheduled.due.saturating_duration_since(now).min(IDLE_POLL)
            }
            _ => IDLE_POLL,
        }
    }

    fn arm_start(&mut self, now: Instant) {
        self.scheduled = self.session.start_delay().map(|delay| Scheduled {
            token: self.session.token(),
            due: now + delay,
        });
    }

    fn restart(&mut self, now: Instant) {
        self.session.restart();
        self.status = None;
        self.arm_start(now);
    }

    /// Runs ticks that have come due.
    pub fn update(&mut self, now: Instant) {
        if self.mode != Mode::Running {
            return;
        }
        for _ in 0..MAX_TICKS_PER_UPDATE {
            match self.scheduled {
                Some(scheduled) if scheduled.due <= now => self.fire(scheduled.token, scheduled.due),
                _ => break,
            }
        }
    }

    fn fire(&mut self, token: TickToken, at: Instant) {
        self.scheduled = None;
        let Some(outcome) = self.session.tick(token) else {
            return;
        };
        self.scheduled = self.session.next_delay(outcome).map(|delay| Scheduled {
            token,
            due: at + delay,
        });
    }

    pub fn handle_input(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.mode = Mode::Exit;
            return;
        }

        if let Mode::EnteringSize(input) = &mut self.mode {
            match key.code {
                KeyCode::Char(c) if c.is_ascii_digit() && input.len() < MAX_SIZE_DIGITS => {
                    input.push(c);
                }
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Enter => {
                    let input = std::mem::take(input);
                    self.mode = Mode::Running;
                    self.apply_size(&input, now);
                }
                KeyCode::Esc => self.mode = Mode::Running,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.mode = Mode::Exit,
            KeyCode::Char(' ') => self.toggle_pause(now),
            KeyCode::Char('r') => self.restart(now),
            KeyCode::Char('n') => self.mode = Mode::EnteringSize(String::new()),
            KeyCode::Char('p') => {
                self.session.toggle_pilot();
                self.status = None;
                self.arm_start(now);
            }
            _ => {
                if let Some(direction) = key_direction(key.code) {
                    self.steer(direction, now);
                }
            }
        }
    }

    fn steer(&mut self, direction: Direction, now: Instant) {
        if self.mode != Mode::Running {
            return;
        }
        if let Some(token) = self.session.request_direction(direction) {
            self.fire(token, now);
        }
    }

    fn toggle_pause(&mut self, now: Instant) {
        match self.mode {
            Mode::Running => self.mode = Mode::Paused(now),
            Mode::Paused(since) => {
                self.mode = Mode::Running;
                // The pending tick keeps whatever wait it had left, including
                // the rest of a bot's start delay.
                if let Some(scheduled) = &mut self.scheduled {
                    scheduled.due += now.saturating_duration_since(since);
                }
            }
            _ => {}
        }
    }

    fn apply_size(&mut self, input: &str, now: Instant) {
        let result = match input.parse::<usize>() {
            Ok(size) => self.session.resize(size),
            Err(_) => {
                self.status = Some(format!(
                    "Board size must be a number between {} and {}",
                    BoardSize::MIN,
                    BoardSize::MAX
                ));
                return;
            }
        };
        match result {
            Ok(()) => {
                self.status = None;
                self.arm_start(now);
            }
            Err(e) => self.status = Some(format!("Could not restart: {}", e)),
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let game = self.session.game();
        let size = game.grid().size();

        let layout = Layout::default()
            .direction(layout::Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Score line
                Constraint::Min(0),    // Board
                Constraint::Length(3), // Status and help
            ])
            .split(frame.area());

        frame.render_widget(
            Paragraph::new(format!(
                "SNEKBOT    Score: {}    Board: {}x{}    Pilot: {:?}",
                game.score(),
                size,
                size,
                game.pilot()
            ))
            .alignment(Alignment::Left)
            .block(Block::default().borders(Borders::ALL)),
            layout[0],
        );

        let title = match &self.mode {
            Mode::Running if game.direction().is_none() && game.pilot() == PilotKind::Human => {
                "Press an arrow key to start".to_string()
            }
            Mode::Running | Mode::Exit => "Playing".to_string(),
            Mode::Paused(_) => "Paused. Press SPACE to continue".to_string(),
            Mode::EnteringSize(input) => format!("N = {}_  (Enter to apply, Esc to cancel)", input),
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner_area = block.inner(layout[1]);
        frame.render_widget(block, layout[1]);
        frame.render_widget(game, inner_area);

        if let Some(outcome) = game.outcome() {
            frame.render_widget(
                Paragraph::new(format!(
                    "{}\nScore: {}\nPress R to play again",
                    outcome.banner(),
                    game.score()
                ))
                .alignment(Alignment::Center)
                .bold(),
                inner_area,
            );
        }

        let footer = self.status.as_deref().unwrap_or(HELP_TEXT);
        frame.render_widget(
            Paragraph::new(footer).block(Block::default().borders(Borders::ALL)),
            layout[2],
        );
    }
}

fn key_direction(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') => Some(Direction::Up),
        KeyCode::Right | KeyCode::Char('d') => Some(Direction::Right),
        KeyCode::Down | KeyCode::Char('s') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') => Some(Direction::Left),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Pos;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn new_app(size: usize, pilot: PilotKind, now: Instant) -> App {
        let config = GameConfig::new(BoardSize::new(size).unwrap(), pilot).with_seed(Some(2));
        App::new(config, now)
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_direction(KeyCode::Up), Some(Direction::Up));
        assert_eq!(key_direction(KeyCode::Char('a')), Some(Direction::Left));
        assert_eq!(key_direction(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_first_arrow_moves_immediately() {
        let now = Instant::now();
        let mut app = new_app(6, PilotKind::Human, now);
        assert!(app.scheduled.is_none());

        app.handle_input(key(KeyCode::Down), now);

        assert_eq!(app.session.game().head(), Pos::new(4, 3));
        let scheduled = app.scheduled.expect("next tick armed");
        assert_eq!(scheduled.due, now + app.session.config().move_interval());
    }

    #[test]
    fn test_update_runs_due_ticks() {
        let now = Instant::now();
        let mut app = new_app(20, PilotKind::Human, now);
        app.handle_input(key(KeyCode::Left), now);
        assert_eq!(app.session.game().head(), Pos::new(10, 9));

        app.update(now + Duration::from_millis(50));
        assert_eq!(app.session.game().head(), Pos::new(10, 9));

        app.update(now + Duration::from_millis(100));
        assert_eq!(app.session.game().head(), Pos::new(10, 8));
    }

    #[test]
    fn test_pause_holds_ticks() {
        let now = Instant::now();
        let mut app = new_app(20, PilotKind::Human, now);
        app.handle_input(key(KeyCode::Left), now);
        app.handle_input(key(KeyCode::Char(' ')), now);

        app.update(now + Duration::from_secs(1));
        assert_eq!(app.session.game().head(), Pos::new(10, 9));

        // Steering is ignored while paused.
        app.handle_input(key(KeyCode::Up), now);
        assert_eq!(app.session.game().direction(), Some(Direction::Left));

        let later = now + Duration::from_secs(2);
        app.handle_input(key(KeyCode::Char(' ')), later);
        app.update(later + Duration::from_millis(100));
        assert_eq!(app.session.game().head(), Pos::new(10, 8));
    }

    #[test]
    fn test_pause_keeps_rest_of_start_delay() {
        let now = Instant::now();
        let mut app = new_app(4, PilotKind::Bot, now);

        app.handle_input(key(KeyCode::Char(' ')), now + Duration::from_millis(500));
        app.update(now + Duration::from_millis(1500));
        assert_eq!(app.session.game().head(), Pos::new(2, 2));

        // 500 ms of the delay were left when the game was paused.
        let resumed = now + Duration::from_secs(2);
        app.handle_input(key(KeyCode::Char(' ')), resumed);
        app.update(resumed + Duration::from_millis(100));
        assert_eq!(app.session.game().head(), Pos::new(2, 2));
        assert_eq!(app.session.game().direction(), None);

        app.update(resumed + Duration::from_millis(500));
        assert_eq!(app.session.game().head(), Pos::new(3, 2));
    }

    #[test]
    fn test_restart_drops_pending_tick() {
        let now = Instant::now();
        let mut app = new_app(20, PilotKind::Human, now);
        app.handle_input(key(KeyCode::Left), now);

        app.handle_input(key(KeyCode::Char('r')), now);
        app.update(now + Duration::from_secs(1));

        assert_eq!(app.session.game().head(), Pos::new(10, 10));
        assert_eq!(app.session.game().direction(), None);
    }

    #[test]
    fn test_bot_starts_after_delay() {
        let now = Instant::now();
        let mut app = new_app(4, PilotKind::Bot, now);

        app.update(now + Duration::from_millis(500));
        assert_eq!(app.session.game().head(), Pos::new(2, 2));

        app.update(now + Duration::from_millis(1000));
        assert_eq!(app.session.game().head(), Pos::new(3, 2));
    }

    #[test]
    fn test_size_entry() {
        let now = Instant::now();
        let mut app = new_app(20, PilotKind::Human, now);

        for code in [KeyCode::Char('n'), KeyCode::Char('1'), KeyCode::Char('2'), KeyCode::Enter] {
            app.handle_input(key(code), now);
        }

        assert_eq!(app.mode, Mode::Running);
        assert_eq!(app.session.game().grid().size(), 12);
        assert_eq!(app.status, None);
    }

    #[test]
    fn test_invalid_size_keeps_game() {
        let now = Instant::now();
        let mut app = new_app(20, PilotKind::Human, now);
        app.handle_input(key(KeyCode::Left), now);

        for code in [KeyCode::Char('n'), KeyCode::Char('1'), KeyCode::Enter] {
            app.handle_input(key(code), now);
        }

        assert_eq!(app.session.game().grid().size(), 20);
        assert_eq!(app.session.game().head(), Pos::new(10, 9));
        assert!(app.status.as_deref().is_some_and(|s| s.starts_with("Could not restart")));

        app.handle_input(key(KeyCode::Char('n')), now);
        app.handle_input(key(KeyCode::Enter), now);
        assert!(app.status.as_deref().is_some_and(|s| s.contains("must be a number")));
    }

    #[test]
    fn test_quit_keys() {
        let now = Instant::now();
        let mut app = new_app(4, PilotKind::Human, now);
        app.handle_input(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), now);
        assert!(app.should_exit());

        let mut app = new_app(4, PilotKind::Human, now);
        app.handle_input(key(KeyCode::Char('q')), now);
        assert!(app.should_exit());
    }
}
