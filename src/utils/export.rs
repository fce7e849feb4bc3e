//! Export of the latest-per-key view to JSON and CSV documents.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::ExportRow;
use crate::utils::{fmt_instant, utc_now_second};

/// Document shape consumed downstream.
#[derive(Debug, Serialize)]
pub struct ExportDocument {
    pub generated_at_utc: String,
    pub count: usize,
    pub items: Vec<ExportRow>,
}

impl ExportDocument {
    pub fn new(items: Vec<ExportRow>) -> Self {
        Self {
            generated_at_utc: fmt_instant(utc_now_second()),
            count: items.len(),
            items,
        }
    }
}

/// Write the export document as pretty JSON, creating parent directories.
/// Returns the number of exported rows.
pub fn write_json(document: &ExportDocument, out_path: &str) -> Result<usize> {
    let json =
        serde_json::to_string_pretty(document).context("Failed to serialize export document")?;
    ensure_parent_dir(out_path)?;
    fs::write(out_path, json).context("Failed to write export file")?;
    Ok(document.count)
}

/// Write the same rows as CSV, one record per snapshot.
pub fn write_csv(rows: &[ExportRow], out_path: &str) -> Result<usize> {
    ensure_parent_dir(out_path)?;
    let mut writer = csv::Writer::from_path(out_path).context("Failed to create CSV file")?;
    for row in rows {
        writer
            .serialize(row)
            .context("Failed to serialize CSV row")?;
    }
    writer.flush().context("Failed to flush CSV file")?;
    Ok(rows.len())
}

fn ensure_parent_dir(out_path: &str) -> Result<()> {
    if let Some(parent) = Path::new(out_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
        }
    }
    Ok(())
}
