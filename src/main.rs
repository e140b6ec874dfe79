use std::{
    io::{self, Write},
    panic,
    path::PathBuf,
    str::FromStr,
    sync::atomic::{AtomicBool, Ordering},
};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use crossterm::{
    cursor::Show,
    event::DisableMouseCapture,
    execute,
    style::ResetColor,
    terminal::{LeaveAlternateScreen, disable_raw_mode},
};
use tracing::{info, warn};
use tuirealm::{
    PollStrategy,
    terminal::{CrosstermTerminalAdapter, TerminalBridge},
};

use taskdeck::{
    fixtures::Fixtures,
    logging::{init_logging, print_log_location},
    settings::Settings,
    ui_realm::{application::TuiApplication, messages::View, model::Model},
};

#[derive(Parser, Debug)]
#[command(
    name = "taskdeck",
    about = "Terminal comments, account and task tracking demo",
    long_about = "A tui-realm host for comment, account and task components backed by in-memory services.",
    version = env!("TASKDECK_BUILD_VERSION"),
    author
)]
struct Cli {
    /// View shown on start: comments, account, tracker or manager.
    #[arg(long, value_name = "VIEW")]
    view: Option<String>,

    /// JSON file seeding comments, tasks and users.
    #[arg(long, value_name = "PATH")]
    fixtures: Option<PathBuf>,

    /// Simulated comment loading latency in milliseconds.
    #[arg(long = "load-delay-ms", value_name = "MS")]
    load_delay_ms: Option<u64>,
}

static TERMINAL_RESTORED: AtomicBool = AtomicBool::new(false);

#[tokio::main]
async fn main() -> Result<()> {
    let log_path = match init_logging() {
        Ok(path) => Some(path),
        Err(err) => {
            eprintln!("warning: failed to initialize logging: {err}");
            None
        }
    };
    if let Some(path) = log_path.as_ref() {
        install_panic_hook_with_log(path.clone());
    }

    let result = run_app(Cli::parse());
    if let Some(path) = log_path.as_ref() {
        print_log_location(path);
    }
    result
}

fn build_model(cli: &Cli, settings: &Settings) -> Result<Model> {
    let view = match cli.view.as_deref() {
        Some(raw) => View::from_str(raw).map_err(|()| {
            anyhow!("unknown view '{raw}', expected comments, account, tracker or manager")
        })?,
        None => settings.view(),
    };

    let fixtures = match cli.fixtures.as_ref().or(settings.fixtures.as_ref()) {
        Some(path) => Fixtures::load(path)?,
        None => Fixtures::demo(),
    };

    let delay = cli
        .load_delay_ms
        .map(Settings::clamp_load_delay)
        .unwrap_or_else(|| settings.comment_load_delay());

    info!(
        view = %view,
        comments = fixtures.comments.len(),
        tasks = fixtures.tasks.len(),
        users = fixtures.users.len(),
        "starting taskdeck"
    );
    Ok(Model::from_fixtures(fixtures, delay).with_view(view))
}

fn run_app(cli: Cli) -> Result<()> {
    let mut settings = Settings::load();
    let mut model = build_model(&cli, &settings)?;

    let _guard = TerminalGuard;
    let mut terminal = setup_terminal()?;

    let mut ui = TuiApplication::with_listener(TuiApplication::listener_cfg(
        settings.tick_interval(),
    ));
    ui.mount_all_components(&mut model)
        .context("failed to mount components")?;

    while !model.quit {
        // Text edits change component state without emitting a message, so
        // every pass redraws.
        terminal
            .draw(|frame| ui.view(frame, &model))
            .context("failed to render frame")?;

        ui.tick_and_update(&mut model, PollStrategy::UpTo(8))
            .context("failed to process tui-realm tick")?;
    }

    let _ = terminal.disable_mouse_capture();
    let _ = terminal.disable_raw_mode();
    let _ = terminal.leave_alternate_screen();
    let _ = terminal.clear_screen();
    TERMINAL_RESTORED.store(true, Ordering::SeqCst);

    if settings.remember_view(model.view) {
        if let Err(error) = settings.save() {
            warn!("failed to save settings: {error:#}");
        }
    }

    Ok(())
}

fn setup_terminal() -> Result<TerminalBridge<CrosstermTerminalAdapter>> {
    TERMINAL_RESTORED.store(false, Ordering::SeqCst);

    let mut terminal =
        TerminalBridge::new_crossterm().context("failed to initialize terminal bridge")?;

    terminal
        .enable_raw_mode()
        .context("failed to enable raw mode")?;
    terminal
        .enter_alternate_screen()
        .context("failed to enter alternate screen")?;
    terminal
        .enable_mouse_capture()
        .context("failed to enable mouse capture")?;

    Ok(terminal)
}

fn install_panic_hook_with_log(log_path: PathBuf) {
    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        eprintln!();
        eprintln!("  Log file: {}", log_path.display());
        eprintln!();
        previous_hook(panic_info);
    }));
}

fn restore_terminal() -> Result<()> {
    if TERMINAL_RESTORED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let _ = disable_raw_mode();

    let mut stderr = io::stderr();
    let _ = execute!(
        stderr,
        LeaveAlternateScreen,
        DisableMouseCapture,
        Show,
        ResetColor
    );
    let _ = stderr.flush();

    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}
