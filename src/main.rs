use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::prelude::*;
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Instant;

use snekbot::app::App;
use snekbot::config::{BoardSize, GameConfig, PilotKind};

#[derive(Parser)]
#[command(name = "snekbot")]
#[command(version, about = "Snake on an N x N board, with an autopilot that always wins on even N")]
struct Cli {
    /// Board side length N
    #[arg(long, default_value_t = 20)]
    size: usize,

    /// Let the sweeping bot play instead of the keyboard
    #[arg(long)]
    bot: bool,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the log (the terminal belongs to the game)
    #[arg(long, default_value = "snekbot.log")]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging before anything else
    WriteLogger::init(
        LevelFilter::Info,
        Config::default(),
        File::create(&cli.log_file)
            .with_context(|| format!("Failed to create {}", cli.log_file.display()))?,
    )
    .context("Failed to initialize logger")?;

    let pilot = if cli.bot {
        PilotKind::Bot
    } else {
        PilotKind::Human
    };
    let config = GameConfig::new(BoardSize::new(cli.size)?, pilot).with_seed(cli.seed);

    info!("Starting snekbot");

    let mut terminal = setup_terminal()?;

    let mut app = App::new(config, Instant::now());
    let result = run(&mut terminal, &mut app);

    // Cleanup terminal even when the loop failed
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    info!("Exiting snekbot");
    result
}

/// Raw mode plus alternate screen. A failure part way through undoes the
/// steps already taken so the shell is left usable.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let terminal = or_restore(
        execute!(io::stdout(), EnterAlternateScreen).context("Failed to enter alternate screen"),
        || {
            let _ = disable_raw_mode();
        },
    )
    .and_then(|()| {
        or_restore(
            Terminal::new(CrosstermBackend::new(io::stdout())).context("Failed to create terminal"),
            || {
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                let _ = disable_raw_mode();
            },
        )
    })?;
    Ok(terminal)
}

/// Runs `restore` when `result` is an error, then passes the result on.
fn or_restore<T>(result: Result<T>, restore: impl FnOnce()) -> Result<T> {
    if result.is_err() {
        restore();
    }
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal
            .draw(|f| app.render(f))
            .context("Failed to draw frame")?;

        if event::poll(app.poll_timeout(Instant::now()))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_input(key, Instant::now());
                }
            }
        }

        app.update(Instant::now());

        if app.should_exit() {
            return Ok(());
        }
    }
}
