use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
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
    fs::{self, OpenOptions},
    io::{self, stdin, Write},
    path::PathBuf,
    sync::Mutex,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use typing_master::{
    app::{App, Cue, MAX_NAME_LEN},
    app_dirs::AppDirs,
    config::FileConfigStore,
    controller::{Clock, SessionController},
    highscores::{FileHighScoreStore, HighScoreEntry, HighScoreStore, InMemoryHighScoreStore},
    levels::Difficulty,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    ui::leaderboard::EMPTY_MESSAGE,
};

/// Environment variable holding the tracing filter, e.g. `debug`
const LOG_ENV: &str = "TYPING_MASTER_LOG";

/// ten levels of typing practice with a local leaderboard
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A ten-level typing game. Each level asks for a sentence to be typed within a time limit and above an accuracy goal; difficulty scales both and the points earned. Finished runs land on a local top-10 leaderboard."
)]
pub struct Cli {
    /// difficulty to preselect in the menu
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// player name; with --difficulty the menu is skipped
    #[clap(short = 'n', long)]
    name: Option<String>,

    /// high score file to use instead of the default location
    #[clap(long, value_name = "PATH")]
    scores_file: Option<PathBuf>,

    /// print the leaderboard and exit
    #[clap(long)]
    print_scores: bool,

    /// play without writing to the leaderboard
    #[clap(long)]
    no_save: bool,

    /// never ring the terminal bell
    #[clap(long)]
    mute: bool,
}

impl Cli {
    fn file_store(&self) -> FileHighScoreStore {
        self.scores_file
            .as_ref()
            .map(FileHighScoreStore::with_path)
            .unwrap_or_default()
    }

    fn store(&self) -> Box<dyn HighScoreStore> {
        if self.no_save {
            Box::new(InMemoryHighScoreStore::new())
        } else {
            Box::new(self.file_store())
        }
    }

    /// Seed the menu from the command line, jumping straight into play when
    /// both a difficulty and a usable name were given
    fn apply<S: HighScoreStore, C: Clock>(&self, app: &mut App<S, C>) {
        if let Some(difficulty) = self.difficulty {
            app.difficulty = difficulty;
            app.menu_selection = difficulty.index();
        }
        if let Some(name) = &self.name {
            app.player_name = name.trim().chars().take(MAX_NAME_LEN).collect();
        }
        if self.difficulty.is_some() && self.name.is_some() && !app.player_name.is_empty() {
            app.begin_session();
        }
    }
}

fn format_leaderboard(entries: &[HighScoreEntry]) -> String {
    if entries.is_empty() {
        return format!("{EMPTY_MESSAGE}\n");
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            format!(
                "{:>2}. {} - {}pts ({}) ★{}  {}\n",
                i + 1,
                e.name,
                e.score,
                e.difficulty,
                e.stars,
                e.date
            )
        })
        .collect()
}

/// Route tracing output to the log file; the terminal belongs to the TUI
fn init_logging() -> io::Result<()> {
    let path = AppDirs::log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn bell_count(cue: Cue) -> usize {
    match cue {
        Cue::LevelPassed => 1,
        Cue::GameWon => 3,
    }
}

fn ring(cue: Cue) -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all("\x07".repeat(bell_count(cue)).as_bytes())?;
    stdout.flush()
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.print_scores {
        print!("{}", format_leaderboard(&cli.file_store().load_top_scores()));
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    // without a log file the game still runs, it just stays quiet
    let _ = init_logging();
    info!(version = env!("CARGO_PKG_VERSION"), "typing-master starting");

    let controller = SessionController::with_system_clock(cli.store());
    let mut app = App::new(controller, Box::new(FileConfigStore::new()));
    cli.apply(&mut app);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, cli.mute);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("typing-master exiting");
    result
}

fn start_tui<B: Backend, S: HighScoreStore, C: Clock>(
    terminal: &mut Terminal<B>,
    app: &mut App<S, C>,
    mute: bool,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    while !app.should_quit {
        let size = terminal.size()?;
        app.set_viewport(size.width, size.height);
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        app.handle_event(runner.step());

        if let Some(cue) = app.take_cue().filter(|_| !mute) {
            if let Err(e) = ring(cue) {
                warn!(error = %e, "could not ring the bell");
            }
        }
    }

    Ok(())
}
