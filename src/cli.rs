//! Command-line interface for coco-desk.
//!
//! Without a native shell the binary runs a headless session: window
//! operations are logged, update checks hit the real release feed, and the
//! native event stream is replaced by line commands read from stdin.

use crate::VERSION;
use crate::app::DeskApp;
use crate::coordinator::UpdateTrigger;
use crate::events::NativeEvent;
use crate::platform::{HeadlessAdapter, HeadlessView, PlatformAdapter, ViewMarker};
use crate::state::{SessionState, ShortcutState, UpdateState};
use anyhow::Context;
use clap::{Parser, Subcommand};
use coco_desk_config::StateFile;
use coco_desk_keybindings::{KeyEvent, NamedKey};
use coco_desk_update::{UpdateChannel, UpdateCheckResult};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// coco-desk - window session coordinator for the Coco launcher
#[derive(Parser)]
#[command(name = "coco-desk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Set log level (overrides RUST_LOG)
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Directory holding the state files
    #[arg(long, value_name = "DIR", global = true)]
    pub config_dir: Option<PathBuf>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a headless session driven by commands on stdin (the default)
    Run,

    /// Check the release feed once and print the result
    CheckUpdate {
        /// Use the snapshot (pre-release) channel
        #[arg(long)]
        snapshot: bool,
    },

    /// Inspect the state files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the state directory
    Path,
    /// Print the persisted settings
    Show,
}

/// One line of input to a headless session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Blur,
    Focus,
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
    Escape,
    Pin(bool),
    ContextMenu(bool),
    Popover(bool),
    History(bool),
    FocusInput(bool),
    Check,
    Skip,
    Notifications,
    State,
    Quit,
}

fn parse_switch(arg: Option<&str>) -> Result<bool, String> {
    match arg {
        Some("on") => Ok(true),
        Some("off") => Ok(false),
        other => Err(format!("expected on|off, got '{}'", other.unwrap_or(""))),
    }
}

impl FromStr for SessionCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else {
            return Err("empty command".to_string());
        };
        let arg = parts.next();

        let key = |arg: Option<&str>| -> Result<KeyEvent, String> {
            let token = arg.ok_or_else(|| format!("'{}' needs a key", word))?;
            KeyEvent::parse(token).map_err(|e| e.to_string())
        };

        let command = match word {
            "blur" => Self::Blur,
            "focus" => Self::Focus,
            "keydown" => Self::KeyDown(key(arg)?),
            "keyup" => Self::KeyUp(key(arg)?.released()),
            "escape" | "esc" => Self::Escape,
            "pin" => Self::Pin(parse_switch(arg)?),
            "menu" => Self::ContextMenu(parse_switch(arg)?),
            "popover" => Self::Popover(parse_switch(arg)?),
            "history" => Self::History(parse_switch(arg)?),
            "input" => Self::FocusInput(parse_switch(arg)?),
            "check" => Self::Check,
            "skip" => Self::Skip,
            "notifications" => Self::Notifications,
            "state" => Self::State,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command '{}'", other)),
        };
        Ok(command)
    }
}

/// Run the parsed command line. Returns the process exit code.
pub async fn execute(cli: Cli) -> anyhow::Result<i32> {
    let config_dir = cli.config_dir.unwrap_or_else(coco_desk_config::config_dir);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_session(config_dir).await,
        Commands::CheckUpdate { snapshot } => check_update(snapshot).await,
        Commands::Config { action } => show_config(action, config_dir),
    }
}

async fn check_update(snapshot: bool) -> anyhow::Result<i32> {
    let adapter = HeadlessAdapter::new(VERSION);
    let channel = UpdateChannel::from_snapshot_flag(snapshot);
    println!("coco-desk {} ({} channel)", VERSION, channel);

    match adapter.check_update(channel).await {
        Ok(Some(info)) => {
            println!("Update available: {}", info.version);
            if let Some(notes) = info.notes {
                println!("\n{}", notes);
            }
            Ok(0)
        }
        Ok(None) => {
            println!("Already up to date");
            Ok(0)
        }
        Err(e) => {
            eprintln!("Update failed: {}", e);
            Ok(1)
        }
    }
}

fn show_config(action: ConfigAction, config_dir: PathBuf) -> anyhow::Result<i32> {
    match action {
        ConfigAction::Path => println!("{}", config_dir.display()),
        ConfigAction::Show => {
            let files = [
                (
                    SessionState::path_in(&config_dir),
                    SessionState::load_or_default(&config_dir).to_yaml()?,
                ),
                (
                    ShortcutState::path_in(&config_dir),
                    ShortcutState::load_or_default(&config_dir).to_yaml()?,
                ),
                (
                    UpdateState::path_in(&config_dir),
                    UpdateState::load_or_default(&config_dir).to_yaml()?,
                ),
            ];
            for (path, yaml) in files {
                println!("# {}\n{}", path.display(), yaml);
            }
        }
    }
    Ok(0)
}

async fn run_session(config_dir: PathBuf) -> anyhow::Result<i32> {
    let adapter = Arc::new(HeadlessAdapter::new(VERSION));
    let view = Arc::new(HeadlessView::new());
    let app = DeskApp::new(adapter.clone(), view.clone(), adapter, config_dir);

    let mut actions = app.shortcuts().actions();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("coco-desk {} headless session; 'quit' to exit", VERSION);

    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("error: {}", e);
                continue;
            }
        };
        if command == SessionCommand::Quit {
            break;
        }
        apply(&app, &view, command).await;

        while let Ok(action) = actions.try_recv() {
            println!("action: {}", action);
        }
        // Let spawned adapter calls run before the next line
        tokio::task::yield_now().await;
    }

    app.persist()?;
    Ok(0)
}

async fn apply(app: &DeskApp, view: &HeadlessView, command: SessionCommand) {
    match command {
        SessionCommand::Blur => {
            app.dispatch(NativeEvent::Blur);
        }
        SessionCommand::Focus => {
            app.dispatch(NativeEvent::Focus);
        }
        SessionCommand::KeyDown(key) => {
            app.dispatch(NativeEvent::KeyDown(key));
        }
        SessionCommand::KeyUp(key) => {
            app.dispatch(NativeEvent::KeyUp(key));
        }
        SessionCommand::Escape => {
            app.dispatch(NativeEvent::KeyDown(KeyEvent::named(NamedKey::Escape)));
        }
        SessionCommand::Pin(on) => {
            app.session().set_pinned(on);
        }
        SessionCommand::ContextMenu(on) => {
            app.session().set_context_menu_visible(on);
        }
        SessionCommand::Popover(on) => view.set_present(ViewMarker::PopoverPanel, on),
        SessionCommand::History(on) => view.set_present(ViewMarker::HistoryPanel, on),
        SessionCommand::FocusInput(on) => view.set_focused_input(on),
        SessionCommand::Check => match app.updates().check(UpdateTrigger::Manual).await {
            UpdateCheckResult::UpdateAvailable(info) => println!("update: {}", info.version),
            UpdateCheckResult::SkippedVersion(info) => println!("skipped: {}", info.version),
            UpdateCheckResult::UpToDate => println!("up to date"),
            UpdateCheckResult::InProgress => println!("check already running"),
            UpdateCheckResult::Error(e) => println!("failed: {}", e),
        },
        SessionCommand::Skip => {
            app.updates().skip_version();
        }
        SessionCommand::Notifications => {
            for n in app.notifications().list() {
                println!("{} [{:?}] {}", n.timestamp.format("%H:%M:%S"), n.level, n.message);
            }
        }
        SessionCommand::State => print_state(app),
        SessionCommand::Quit => {}
    }
}

fn print_state(app: &DeskApp) {
    let session = app.session().state();
    let shortcuts = app.shortcuts().state();
    let updates = app.updates().state();
    println!(
        "pinned={} visible={} blurred={} menu={} | modifier={} pressed={} popover={} | update_visible={} update={}",
        session.is_pinned,
        session.visible,
        session.blurred,
        session.context_menu_visible,
        shortcuts.modifier_key(),
        shortcuts.modifier_key_pressed,
        shortcuts.open_popover,
        updates.visible,
        updates
            .update_info
            .as_ref()
            .map(|i| i.version.as_str())
            .unwrap_or("-"),
    );
}
