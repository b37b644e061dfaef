mod config;
mod script;
mod storage;


use std::fs;
use std::path::{Path, PathBuf};

use canvas::consts::STORAGE_KEY;
use canvas::engine::Engine;
use canvas::persist::{self, EXPORT_PROJECT_NAME, PersistError, RepairReport};
use clap::{Parser, Subcommand};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::info;

use crate::config::Config;
use crate::script::ScriptError;
use crate::storage::FileStorage;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("refusing to clear the stored session without --yes")]
    ConfirmationRequired,
    #[error("persistence failed: {0}")]
    Persist(#[from] PersistError),
    #[error("invalid replay script: {0}")]
    Script(#[from] ScriptError),
    #[error("file access failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("output encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "floorplan", about = "Headless 2D floor-plan editor")]
struct Cli {
    /// Session file; defaults to the storage key in the working directory.
    #[arg(long, env = "FLOORPLAN_STORAGE")]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count walls, windows, and doors.
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// One line per entity.
    List,
    /// Write an export document.
    Export {
        /// Output file or directory; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value = EXPORT_PROJECT_NAME)]
        name: String,
    },
    /// Replace the stored session with an exported document.
    Import { path: PathBuf },
    /// Run a script of input events against the stored session.
    Replay { path: PathBuf },
    /// Delete the stored session.
    Clear {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Serialize)]
struct Stats {
    walls: usize,
    windows: usize,
    doors: usize,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let path = cli.storage.unwrap_or_else(|| PathBuf::from(format!("{STORAGE_KEY}.json")));

    match cli.command {
        Command::Stats { json } => run_stats(&path, config, json),
        Command::List => run_list(&path, config),
        Command::Export { out, name } => run_export(&path, config, out.as_deref(), &name),
        Command::Import { path: source } => run_import(&path, config, &source),
        Command::Replay { path: script } => run_replay(&path, config, &script),
        Command::Clear { yes } => run_clear(&path, yes),
    }
}

fn open_session(path: &Path, config: Config) -> Result<Engine<FileStorage>, CliError> {
    let mut engine = Engine::with_settings(FileStorage::new(path), config.settings());
    match engine.load()? {
        Some(report) => log_report(&report),
        None => info!(path = %engine.storage().path().display(), "no stored session; starting empty"),
    }
    Ok(engine)
}

fn log_report(report: &RepairReport) {
    if !report.is_clean() {
        info!(
            orphans = report.orphans_dropped,
            duplicates = report.duplicates_dropped,
            invalid = report.invalid_dropped,
            fields = report.fields_repaired,
            "session needed repairs"
        );
    }
}

fn run_stats(path: &Path, config: Config, json: bool) -> Result<(), CliError> {
    let engine = open_session(path, config)?;
    let doc = &engine.core.doc;
    let stats = Stats { walls: doc.walls().len(), windows: doc.windows().len(), doors: doc.doors().len() };
    if json {
        println!("{}", serde_json::to_string(&stats)?);
    } else {
        println!("walls: {}  windows: {}  doors: {}", stats.walls, stats.windows, stats.doors);
    }
    Ok(())
}

fn run_list(path: &Path, config: Config) -> Result<(), CliError> {
    let engine = open_session(path, config)?;
    let doc = &engine.core.doc;
    for wall in doc.walls() {
        println!(
            "wall    {}  ({:.1}, {:.1}) -> ({:.1}, {:.1})  length {:.1}  thickness {:.1}",
            wall.id,
            wall.start.x,
            wall.start.y,
            wall.end.x,
            wall.end.y,
            wall.length(),
            wall.thickness
        );
    }
    for window in doc.windows() {
        println!(
            "window  {}  on {}  at {:.3}  width {:.1}  {}",
            window.id, window.wall_id, window.position, window.width, window.color
        );
    }
    for door in doc.doors() {
        println!(
            "door    {}  on {}  at {:.3}  width {:.1}  opens {:?}  {}",
            door.id, door.wall_id, door.position, door.width, door.open_direction, door.color
        );
    }
    Ok(())
}

fn run_export(path: &Path, config: Config, out: Option<&Path>, name: &str) -> Result<(), CliError> {
    let engine = open_session(path, config)?;
    let text = engine.export(name)?;
    match out {
        None => println!("{text}"),
        Some(out) => {
            let target = if out.is_dir() {
                out.join(persist::export_file_name(OffsetDateTime::now_utc()))
            } else {
                out.to_path_buf()
            };
            fs::write(&target, text)?;
            eprintln!("exported to {}", target.display());
        }
    }
    Ok(())
}

/// Replace the stored session with `text`. The current session is never read,
/// so an unreadable session file can still be overwritten.
fn import_session(path: &Path, config: Config, text: &str) -> Result<Engine<FileStorage>, CliError> {
    let mut engine = Engine::with_settings(FileStorage::new(path), config.settings());
    let report = engine.import(text)?;
    log_report(&report);
    Ok(engine)
}

fn run_import(path: &Path, config: Config, source: &Path) -> Result<(), CliError> {
    let text = fs::read_to_string(source)?;
    let engine = import_session(path, config, &text)?;
    eprintln!(
        "imported {} entities from {}",
        engine.core.doc.len(),
        source.display()
    );
    Ok(())
}

fn run_replay(path: &Path, config: Config, script_path: &Path) -> Result<(), CliError> {
    let text = fs::read_to_string(script_path)?;
    let steps = script::parse(&text)?;
    let mut engine = open_session(path, config)?;
    let summary = script::run(&mut engine, &steps);
    info!(
        steps = summary.steps,
        created = summary.created,
        updated = summary.updated,
        deleted = summary.deleted,
        "replay finished"
    );
    eprintln!(
        "replayed {} steps: {} created, {} updated, {} deleted, {} history moves",
        summary.steps, summary.created, summary.updated, summary.deleted, summary.history_moves
    );
    Ok(())
}

fn run_clear(path: &Path, yes: bool) -> Result<(), CliError> {
    if !yes {
        return Err(CliError::ConfirmationRequired);
    }
    let mut engine = Engine::new(FileStorage::new(path));
    engine.clear_storage()?;
    eprintln!("cleared {}", path.display());
    Ok(())
}
