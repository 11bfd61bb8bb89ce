mod demo;
mod paths;
mod render;

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use log::info;
use pagekit::clipboard::{ClipboardProvider, MemoryClipboard, SystemClipboard};
use pagekit::{KitConfig, KitError, Page};
use simplelog::{Config, LevelFilter, WriteLogger};
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Replay a scripted session against the demo student list page
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level for the log file
    #[arg(long = "log-level", value_enum, default_value_t = LogLevel::Debug)]
    log_level: LogLevel,
    /// Log file path (defaults to the platform cache directory)
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// JSON config file (defaults to the platform config directory)
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,
    /// Type this term into the student search box
    #[arg(long = "search", value_name = "TERM")]
    search: Option<String>,
    /// Click this sortable column header. Repeat to click again.
    #[arg(long = "sort", value_name = "COLUMN")]
    sort: Vec<usize>,
    /// Click the copy button of this student id
    #[arg(long = "copy", value_name = "STUDENT")]
    copy: Option<String>,
    /// Copy to the system clipboard instead of an in-memory one
    #[arg(long = "system-clipboard")]
    system_clipboard: bool,
    /// Wait for every notification to expire before exiting
    #[arg(long = "wait")]
    wait: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let log_path = match &args.log_file {
        Some(path) => path.clone(),
        None => {
            paths::rotate_logs();
            paths::log_file().unwrap_or_else(|| PathBuf::from("pagekit.log"))
        }
    };
    if let Some(parent) = log_path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let log_file = File::create(&log_path).expect("Failed to create log file");
    WriteLogger::init(args.log_level.into(), Config::default(), log_file)
        .expect("Failed to initialize logger");

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), KitError> {
    let config = match args.config.clone().or_else(paths::config_file) {
        Some(path) if path.exists() => {
            info!("Loading config from {}", path.display());
            KitConfig::load(path)?
        }
        _ => KitConfig::default(),
    };
    let clipboard: Arc<dyn ClipboardProvider> = if args.system_clipboard {
        Arc::new(SystemClipboard::new())
    } else {
        Arc::new(MemoryClipboard::new())
    };

    let mut page = Page::builder(demo::students_page())
        .config(config)
        .clipboard(clipboard)
        .build()?;
    page.init(Instant::now());

    let events = demo::script(
        page.document(),
        args.search.as_deref(),
        &args.sort,
        args.copy.as_deref(),
    );
    info!("Replaying {} events", events.len());

    let (tx, rx) = mpsc::channel(16);
    let feeder = tokio::spawn(async move {
        for event in events {
            if tx.send(event).await.is_err() {
                break;
            }
        }
    });
    page.run(rx).await;
    let _ = feeder.await;

    render::print_table(&page);
    println!();
    render::print_notifications(&page);

    if args.wait {
        page.settle().await;
        println!();
        render::print_notifications(&page);
    }
    Ok(())
}
