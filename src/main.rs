mod app;
mod catalog;
mod domain;
mod input;
mod notifications;
mod persistence;
mod ticker;
mod ui;
mod window;

use anyhow::{Context, Result};
use app::{AppState, Services};
use catalog::Removed;
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{format_time, Task, TodoFlow};
use notifications::DesktopNotifier;
use persistence::{
    ensure_data_dir, get_data_dir, init_local_data_dir, load_settings, log_file, save_settings,
    settings_file, task_store_file, todo_store_file, JsonStore, Repository,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::sync::mpsc::Receiver;
use ticker::{ThreadScheduler, TickEvent};
use uuid::Uuid;
use window::TerminalWindow;

#[derive(Parser)]
#[command(name = "todoflow")]
#[command(about = "A terminal todo flow with per-task timers and breaks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resume a saved flow
    Open {
        /// Flow id, as printed by `todoflow list`
        id: String,
    },
    /// List saved flows with their progress
    List {
        /// Only flows whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List saved tasks
    Tasks {
        /// Only tasks whose title contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Delete one saved flow or task
    Remove {
        /// Flow or task id
        id: String,
    },
    /// Initialize a local .todoflow directory in the current directory
    Init,
    /// Show or update settings
    Config {
        /// Break length in seconds
        #[arg(long)]
        break_time: Option<u64>,
        /// Desktop notifications
        #[arg(long, value_enum)]
        notifications: Option<Toggle>,
    },
    /// Delete every saved flow and task
    Clear,
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Init) = cli.command {
        let data_dir = init_local_data_dir()?;
        println!("Initialized todoflow directory: {}", data_dir.display());
        println!();
        println!("todoflow will now keep flows in this local directory.");
        println!("Run 'todoflow' to start a flow.");
        return Ok(());
    }

    ensure_data_dir()?;
    init_logging()?;

    match cli.command {
        Some(Commands::Open { id }) => {
            let flows = JsonStore::<TodoFlow>::new(todo_store_file()?);
            let flow = flows
                .get_by_id(&id)?
                .with_context(|| format!("No saved flow with id {}", id))?;
            run_tui(flow)
        }
        Some(Commands::List { search }) => list_flows(search.as_deref()),
        Some(Commands::Tasks { search }) => list_tasks(search.as_deref()),
        Some(Commands::Remove { id }) => {
            let flows = JsonStore::<TodoFlow>::new(todo_store_file()?);
            let tasks = JsonStore::<Task>::new(task_store_file()?);
            match catalog::remove_record(&flows, &tasks, &id)? {
                Removed::Flow => println!("Removed flow {}", id),
                Removed::Task => println!("Removed task {}", id),
                Removed::Nothing => println!("Nothing saved with id {}", id),
            }
            Ok(())
        }
        Some(Commands::Config {
            break_time,
            notifications,
        }) => configure(break_time, notifications),
        Some(Commands::Clear) => {
            JsonStore::<TodoFlow>::new(todo_store_file()?).clear()?;
            JsonStore::<Task>::new(task_store_file()?).clear()?;
            println!("Cleared all saved flows and tasks.");
            Ok(())
        }
        Some(Commands::Init) => Ok(()),
        None => run_tui(TodoFlow::new(Uuid::new_v4().to_string())),
    }
}

/// Send log records to a file in the data directory so they do not tear the TUI
fn init_logging() -> Result<()> {
    let path = log_file()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::new().filter_or("TODOFLOW_LOG", "warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn list_flows(search: Option<&str>) -> Result<()> {
    let flows = JsonStore::<TodoFlow>::new(todo_store_file()?);
    let found = catalog::search_flows(&flows, search)?;
    if found.is_empty() {
        println!("No saved flows.");
    }
    for flow in &found {
        println!("{}", catalog::flow_line(flow));
    }
    Ok(())
}

fn list_tasks(search: Option<&str>) -> Result<()> {
    let tasks = JsonStore::<Task>::new(task_store_file()?);
    let found = catalog::search_tasks(&tasks, search)?;
    if found.is_empty() {
        println!("No saved tasks.");
    }
    for task in &found {
        println!("{}", catalog::task_line(task));
    }
    Ok(())
}

fn configure(break_time: Option<u64>, notifications: Option<Toggle>) -> Result<()> {
    let path = settings_file()?;
    let mut settings = load_settings(&path)?;

    if break_time.is_some() || notifications.is_some() {
        if let Some(seconds) = break_time {
            settings.break_time = seconds.max(1);
        }
        if let Some(toggle) = notifications {
            settings.notifications_enabled = matches!(toggle, Toggle::On);
        }
        save_settings(&path, &settings)?;
        log::info!("settings updated: {:?}", settings);
    }

    println!("Settings ({})", path.display());
    println!("  break time:    {}", format_time(settings.break_time));
    println!(
        "  notifications: {}",
        if settings.notifications_enabled { "on" } else { "off" }
    );
    Ok(())
}

fn run_tui(flow: TodoFlow) -> Result<()> {
    let data_dir = get_data_dir()?;
    eprintln!("Using todoflow directory: {}", data_dir.display());

    let settings = load_settings(settings_file()?)?;
    let (scheduler, ticks) = ThreadScheduler::new();
    let services = Services {
        flows: Box::new(JsonStore::<TodoFlow>::new(todo_store_file()?)),
        tasks: Box::new(JsonStore::<Task>::new(task_store_file()?)),
        notifier: Box::new(DesktopNotifier::new(settings.notifications_enabled)),
        window: Box::new(TerminalWindow::new("todoflow")),
        scheduler: Box::new(scheduler),
    };

    let mut app = AppState::new(flow, settings, services);
    app.list_window = crossterm::terminal::size().ok();
    log::info!("opened flow {}", app.flow.id);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app, &ticks);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Pause and save on exit
    app.flow.stop_timer();
    app.needs_save = true;
    app.save();

    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    ticks: &Receiver<TickEvent>,
) -> Result<()> {
    let poll = ticker::poll_duration();

    loop {
        // Render
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout so ticks are picked up
        if event::poll(poll)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }

        // Deliver ticks; stale ids are dropped by the flow
        while let Ok(tick) = ticks.try_recv() {
            app.on_tick(tick.timer_id);
        }

        // Autosave if needed
        app.save();
    }
}
