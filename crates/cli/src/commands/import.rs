//! `docstash import` — Batch-import documents from a local file.
//!
//! Uses the same import adapter as the HTTP route: best-effort, one bad
//! item never aborts the batch.

use clap::ValueEnum;
use docstash_config::AppConfig;
use docstash_core::store::DocumentStore;
use docstash_store::SqliteStore;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Csv,
}

fn infer_format(path: &Path) -> Option<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Some(Format::Json),
        Some("csv") => Some(Format::Csv),
        _ => None,
    }
}

pub async fn run(
    config: AppConfig,
    file: PathBuf,
    format: Option<Format>,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = format
        .or_else(|| infer_format(&file))
        .ok_or("Cannot infer format — pass --format json or --format csv")?;

    let bytes = std::fs::read(&file)
        .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;

    let store = SqliteStore::new(&config.store.path).await?;

    let outcome = match format {
        Format::Json => {
            let value: serde_json::Value = serde_json::from_slice(&bytes)
                .map_err(|e| format!("Invalid JSON in {}: {e}", file.display()))?;
            let items = value
                .as_array()
                .ok_or("JSON import input must be an array of objects")?;
            docstash_import::import_json(&store, items).await
        }
        Format::Csv => docstash_import::import_csv(&store, &bytes).await?,
    };

    println!("Imported {}", file.display());
    println!("   success: {}", outcome.success);
    println!("   fail:    {}", outcome.fail);
    println!("   total stored: {}", store.count().await?);

    Ok(())
}
