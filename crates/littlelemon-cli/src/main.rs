//! Little Lemon - browse the restaurant menu from the terminal.
//!
//! The menu is downloaded once, on the first run after onboarding, and
//! served from the local cache from then on.

mod app;
mod render;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use littlelemon_core::{Config, Profile};

/// Log file written inside the cache directory
const LOG_FILE: &str = "littlelemon.log";

const USAGE: &str = "\
Usage: littlelemon [COMMAND]

Commands:
  menu                              Show the full menu (default)
  search <phrase> <category>        Show items in <category> whose title contains <phrase>
  register <first> <last> <email>   Complete onboarding
  profile                           Show the registered profile
  logout                            Forget the profile
  help                              Show this message";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Menu,
    Search { phrase: String, category: String },
    Register { first_name: String, last_name: String, email: String },
    Profile,
    Logout,
}

impl Command {
    /// Parse the command line. `None` means help was asked for.
    fn parse(args: &[String]) -> Result<Option<Self>> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        match args.as_slice() {
            [] | ["menu"] => Ok(Some(Command::Menu)),
            ["search", phrase, category] => Ok(Some(Command::Search {
                phrase: phrase.to_string(),
                category: category.to_string(),
            })),
            ["register", first, last, email] => Ok(Some(Command::Register {
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: email.to_string(),
            })),
            ["profile"] => Ok(Some(Command::Profile)),
            ["logout"] => Ok(Some(Command::Logout)),
            ["help"] | ["--help"] | ["-h"] => Ok(None),
            _ => Err(anyhow::anyhow!("Unrecognized arguments: {}\n\n{}", args.join(" "), USAGE)),
        }
    }
}

/// Initialize the tracing subscriber for logging.
///
/// Logs go to a file in `log_dir` so they don't mix with menu output;
/// stderr is used when no directory is available.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_dir.filter(|dir| std::fs::create_dir_all(dir).is_ok()) {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = Command::parse(&args)? else {
        println!("{}", USAGE);
        return Ok(());
    };

    let loaded = Config::load();
    let log_dir: Option<PathBuf> = loaded
        .as_ref()
        .ok()
        .and_then(|c| c.cache_dir().ok())
        .or_else(|| Config::default().cache_dir().ok());
    let _guard = init_tracing(log_dir.as_deref());
    info!(?command, "Little Lemon starting");

    let config = match loaded {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };

    let mut app = App::new(config)?;
    let result = run(&mut app, command).await;
    app.shutdown().await;

    info!("Little Lemon shutting down");
    result
}

async fn run(app: &mut App, command: Command) -> Result<()> {
    match command {
        Command::Menu => {
            app.require_registered()?;
            app.start_population();
            let mut query = app.menu.get_all();
            let rows = app.wait_for_menu(&mut query).await?;
            println!("{}", render::render_menu(&rows, &app.menu.store().age_display()));
        }
        Command::Search { phrase, category } => {
            app.require_registered()?;
            app.start_population();
            let mut query = app.menu.filter(&phrase, &category);
            let rows = app.wait_for_menu(&mut query).await?;
            println!("{}", render::render_menu(&rows, &app.menu.store().age_display()));
        }
        Command::Register { first_name, last_name, email } => {
            let profile = Profile::new(&first_name, &last_name, &email)?;
            app.prefs.register(profile).context("Failed to save registration")?;
            println!("Welcome to Little Lemon, {}!", app.prefs.profile().full_name());
            info!(menu_url = %app.config.menu_url(), "Menu will sync on next menu command");
        }
        Command::Profile => {
            app.require_registered()?;
            println!("{}", render::render_profile(app.prefs.profile()));
        }
        Command::Logout => {
            app.prefs.clear()?;
            println!("Logged out.");
        }
    }
    Ok(())
}
