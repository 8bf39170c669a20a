//! Command line front end: inspect, toggle or watch a file-persisted theme
//! preference.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;
use nightshift::{
    ColorMode, ControlPresentation, FixedClock, FileStore, MemoryDocument, OsSignal, SystemClock,
    ThemeConfig, ThemeManager,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "nightshift",
    version,
    about = "Inspect and toggle the stored light/dark theme preference"
)]
struct Cli {
    /// YAML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// JSON file holding the preference
    #[arg(long, value_name = "FILE", default_value = "nightshift.json")]
    store: PathBuf,

    /// Pretend the local time is this hour (0-23)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
    hour: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the stored mode and what it resolves to
    Status,
    /// Flip the resolved appearance and store it
    Toggle,
    /// Follow OS color scheme changes until interrupted
    Watch {
        /// Seconds between OS checks
        #[arg(long, default_value_t = 5)]
        interval: u64,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("NIGHTSHIFT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ThemeConfig::from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ThemeConfig::default(),
    };

    let os = OsSignal::new();
    let document = MemoryDocument::from_config(&config);
    let builder = ThemeManager::builder()
        .store(FileStore::new(&cli.store))
        .signal(os.clone())
        .document(document)
        .config(config);
    let builder = match cli.hour {
        Some(hour) => builder.clock(FixedClock(hour)),
        None => builder.clock(SystemClock),
    };
    let manager = builder.build().context("building theme manager")?;
    manager.initialize();

    match cli.command {
        Command::Status => print_status(&manager),
        Command::Toggle => {
            manager.toggle_theme();
            print_status(&manager);
        }
        Command::Watch { interval } => {
            print_status(&manager);
            let interval = Duration::from_secs(interval.max(1));
            let mut shown = manager.resolved();
            loop {
                thread::sleep(interval);
                if os.poll() && take_change(&mut shown, manager.resolved()) {
                    print_status(&manager);
                }
            }
        }
    }
    Ok(())
}

/// Records `now` as shown, returning true if it differs from before.
///
/// Literal modes ignore the OS, so a detected change may show nothing new.
fn take_change(shown: &mut ColorMode, now: ColorMode) -> bool {
    std::mem::replace(shown, now) != now
}

fn print_status(manager: &ThemeManager) {
    let resolved = manager.resolved();
    let presentation = ControlPresentation::for_applied(resolved);
    let shown = match resolved {
        ColorMode::Dark => style(resolved).magenta().bold(),
        ColorMode::Light => style(resolved).yellow().bold(),
    };
    println!("{} {}", label("mode"), style(manager.mode()).cyan());
    println!("{} {}", label("showing"), shown);
    println!(
        "{} {} {}",
        label("control"),
        presentation.icon,
        presentation.label
    );
}

fn label(name: &str) -> console::StyledObject<String> {
    style(format!("{name:<9}")).dim()
}
