mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

use typero::{
    clock::SystemClock,
    config::{ConfigStore, DurationMode, FileConfigStore},
    controller::{Command, Controller},
    runtime::{AppEvent, CrosstermEventSource, Runner},
    words::CachedWordSupplier,
    TICK_RATE_MS,
};

/// timed typing-speed test for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type a stream of words against a countdown: per-character feedback, live wpm and accuracy, and a final score when the clock runs out."
)]
pub struct Cli {
    /// countdown length in seconds
    #[clap(short = 'd', long, value_enum)]
    duration: Option<DurationMode>,

    /// number of words fetched per batch
    #[clap(short = 'w', long)]
    number_of_words: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Typing,
    Results,
}

pub struct App {
    pub controller: Controller<SystemClock>,
    pub state: AppState,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut cfg = store.load();
    if let Some(duration) = cli.duration {
        cfg.duration_mode = duration;
    }
    if let Some(n) = cli.number_of_words {
        cfg.number_of_words = n.max(1);
    }

    let controller = Controller::new(
        SystemClock,
        Box::new(CachedWordSupplier::new()),
        cfg.duration_mode,
        cfg.number_of_words,
    )?;
    let mut app = App {
        controller,
        state: AppState::Typing,
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Remember the mode picked during the run
    cfg.duration_mode = app.controller.mode();
    let _ = store.save(&cfg);

    res
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            AppEvent::Tick => {
                app.controller.apply(Command::Tick);
                if app.controller.is_finished() {
                    app.state = AppState::Results;
                }
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if !handle_key(app, key)? {
                    return Ok(());
                }
            }
        }
    }
}

/// Translate a key event into controller commands. Returns false when the
/// app should exit.
fn handle_key(app: &mut App, key: KeyEvent) -> Result<bool, Box<dyn Error>> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(false);
    }

    match app.state {
        AppState::Typing => match key.code {
            KeyCode::Esc => return Ok(false),
            KeyCode::Left => {
                app.controller.reset()?;
                app.state = AppState::Typing;
            }
            KeyCode::Backspace => {
                let buffer = &app.controller.session().input;
                if buffer.is_empty() {
                    app.controller.apply(Command::NavigateBack);
                } else {
                    let mut chars: Vec<char> = buffer.chars().collect();
                    chars.pop();
                    app.controller
                        .apply(Command::Input(chars.into_iter().collect()));
                }
            }
            KeyCode::Char(' ') => app.controller.apply(Command::Commit),
            KeyCode::Char(c) => {
                let mut buffer = app.controller.session().input.clone();
                buffer.push(c);
                app.controller.apply(Command::Input(buffer));
            }
            _ => {}
        },
        AppState::Results => match key.code {
            KeyCode::Esc => return Ok(false),
            KeyCode::Char('r') => {
                app.controller.reset()?;
                app.state = AppState::Typing;
            }
            KeyCode::Char('1') => switch_mode(app, DurationMode::Secs15)?,
            KeyCode::Char('2') => switch_mode(app, DurationMode::Secs30)?,
            KeyCode::Char('3') => switch_mode(app, DurationMode::Secs60)?,
            _ => {}
        },
    }

    Ok(true)
}

fn switch_mode(app: &mut App, mode: DurationMode) -> Result<(), Box<dyn Error>> {
    app.controller.start(mode)?;
    app.state = AppState::Typing;
    Ok(())
}
