mod app;
mod domain;
mod error;
mod input;
mod logging;
mod machine;
mod notifications;
mod persistence;
mod rollover;
mod ticker;
mod ui;

use anyhow::{Context, Result};
use app::AppState;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::format_seconds;
use machine::SessionMachine;
use persistence::{
    ensure_data_dir, init_local_data_dir, log_file, FileStore, KeyValueStore, MemoryStore,
    SessionRepository,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

#[derive(Parser)]
#[command(name = "tomate")]
#[command(about = "A terminal pomodoro timer with task tracking", long_about = None)]
struct Cli {
    /// Data directory to use instead of ./.tomate or ~/.tomate
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Keep sessions in memory only; nothing survives exit
    #[arg(long)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .tomate directory in the current directory
    Init,
    /// Show the active session
    Status,
    /// List completed sessions
    History,
    /// Remove a task from every completed session
    Forget {
        /// Task name, matched exactly
        name: String,
    },
    /// Discard the active session
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => run_tui(cli.dir, cli.ephemeral),
        Some(command) => {
            logging::init_stderr();
            run_command(command, cli.dir)
        }
    }
}

fn open_repository(dir: Option<PathBuf>) -> Result<SessionRepository<FileStore>> {
    let data_dir = ensure_data_dir(dir.as_deref())?;
    Ok(SessionRepository::new(FileStore::new(data_dir)))
}

fn run_command(command: Commands, dir: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Init => {
            let data_dir = init_local_data_dir()?;
            println!("Initialized tomate directory: {}", data_dir.display());
            println!();
            println!("Tomate will now keep sessions in this directory.");
            println!("Run 'tomate' to start a pomodoro.");
        }
        Commands::Status => {
            let repo = open_repository(dir)?;
            match repo.peek_active_session().context("Failed to read active session")? {
                Some(session) => {
                    let name = if session.name.is_empty() { "untitled" } else { session.name.as_str() };
                    println!(
                        "{} session \"{}\": {} [{}]",
                        session.mode.name(),
                        name,
                        format_seconds(session.seconds_remaining),
                        session.run_state.label()
                    );
                    for task in session.tasks.list() {
                        let mark = if task.validated { "x" } else { " " };
                        println!("  [{}] {}", mark, task.name);
                    }
                }
                None => println!("No active session."),
            }
            let carryover = repo.get_incomplete_tasks()?;
            if !carryover.is_empty() {
                println!("Carried over: {}", carryover.join(", "));
            }
        }
        Commands::History => {
            let repo = open_repository(dir)?;
            let records = repo.load_completed_sessions()?;
            if records.is_empty() {
                println!("No completed sessions yet.");
            }
            for record in records {
                let name = if record.name.is_empty() { "untitled" } else { record.name.as_str() };
                println!("{}  {}", record.completed_at.format("%Y-%m-%d %H:%M"), name);
                for task in record.tasks {
                    println!("    ✓ {}", task.name);
                }
            }
        }
        Commands::Forget { name } => {
            let mut repo = open_repository(dir)?;
            let removed = repo.delete_completed_task_by_name(&name)?;
            println!("Removed {} entries named \"{}\"", removed, name);
        }
        Commands::Reset => {
            let mut repo = open_repository(dir)?;
            repo.clear_active_session()?;
            println!("Active session cleared.");
        }
    }
    Ok(())
}

/// Pick the backing store; ephemeral runs leave the filesystem alone
///
/// Returns the data directory when one is in use.
fn open_store(
    dir: Option<PathBuf>,
    ephemeral: bool,
) -> Result<(Box<dyn KeyValueStore>, Option<PathBuf>)> {
    if ephemeral {
        return Ok((Box::new(MemoryStore::new()), None));
    }
    let data_dir = ensure_data_dir(dir.as_deref())?;
    Ok((Box::new(FileStore::new(&data_dir)), Some(data_dir)))
}

fn run_tui(dir: Option<PathBuf>, ephemeral: bool) -> Result<()> {
    let (store, data_dir) = open_store(dir, ephemeral)?;
    let _log_guard = match &data_dir {
        Some(data_dir) => Some(logging::init_file(&log_file(data_dir))?),
        None => {
            logging::init_discard();
            None
        }
    };
    info!(dir = ?data_dir, ephemeral, "starting tomate");

    let machine = SessionMachine::load(SessionRepository::new(store));
    let mut app = AppState::new(machine);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(warning) = app.machine.storage_warning() {
        eprintln!("Warning: {}", warning);
    }
    info!("exiting tomate");

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let poll_rate = ticker::poll_duration();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(poll_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handler::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }

        app.tick(Instant::now());
    }
}
