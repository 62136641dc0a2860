use std::fs;
use std::path::{Path, PathBuf};

use canvas::doc::DocStore;
use clap::{Parser, Subcommand};
use mapedit::export::{EmoTrackerExporter, ExportError, Exporter};
use mapedit::persistence::{PersistenceError, SaveData};
use serde_json::{Value, json};
use uuid::Uuid;


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid save data: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
    #[error("no location with id {0}")]
    UnknownLocation(Uuid),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "mapedit-cli", about = "Inspect and export map editor save snapshots")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print maps with their location counts.
    Inspect {
        /// Save snapshot to read.
        #[arg(env = "MAPEDIT_SAVE")]
        save: PathBuf,
    },
    /// Write locations as EmoTracker JSON.
    Export {
        #[arg(env = "MAPEDIT_SAVE")]
        save: PathBuf,
        /// Export only this location and its descendants.
        #[arg(long)]
        location: Option<Uuid>,
        /// Output file path, or - for stdout.
        #[arg(long, default_value = "-")]
        output: String,
    },
}

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "command failed");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Inspect { save } => print_json(&summarize(&read_save(&save)?)),
        Command::Export { save, location, output } => {
            let rendered = export(&read_save(&save)?, location)?;
            write_output(&output, &rendered)
        }
    }
}

fn read_save(path: &Path) -> Result<DocStore, CliError> {
    let raw = fs::read_to_string(path).map_err(|source| CliError::Io { path: path.to_owned(), source })?;
    let doc = parse_save(&raw)?;
    tracing::info!(path = %path.display(), maps = doc.maps().len(), locations = doc.len(), "loaded save");
    Ok(doc)
}

fn parse_save(raw: &str) -> Result<DocStore, CliError> {
    Ok(SaveData::from_json(raw)?.into_store())
}

fn summarize(doc: &DocStore) -> Value {
    let maps: Vec<Value> = doc
        .maps()
        .iter()
        .map(|map| {
            let count = doc.locations().iter().filter(|l| l.map == map.id).count();
            json!({
                "id": map.id,
                "name": map.name,
                "hasImage": map.has_image(),
                "locations": count,
            })
        })
        .collect();
    json!({ "maps": maps, "locations": doc.len() })
}

fn export(doc: &DocStore, location: Option<Uuid>) -> Result<String, CliError> {
    let exporter = EmoTrackerExporter;
    let rendered = match location {
        Some(id) => {
            let loc = doc.location(&id).ok_or(CliError::UnknownLocation(id))?;
            exporter.export_location(doc.maps(), loc, Some(doc.locations()))?
        }
        None => exporter.export_locations(doc.maps(), doc.locations())?,
    };
    tracing::info!(format = exporter.name(), bytes = rendered.len(), "exported");
    Ok(rendered)
}

fn write_output(output: &str, rendered: &str) -> Result<(), CliError> {
    if output == "-" {
        println!("{rendered}");
        return Ok(());
    }
    let path = PathBuf::from(output);
    fs::write(&path, rendered).map_err(|source| CliError::Io { path, source })
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
