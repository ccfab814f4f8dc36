//! Best-effort JSON persistence for the history list.
//!
//! The history file is the only durable state. Hosts treat both directions
//! as best-effort: a missing file loads as an empty history, and a failed
//! save is logged and forgotten, never fatal.

use std::path::Path;

use crate::error::Result;
use crate::types::HistoryEntry;

/// Load history entries from `path`.
///
/// A missing file is an empty history, not an error.
pub fn load_history(path: &Path) -> Result<Vec<HistoryEntry>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No history file, starting empty");
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)?;
    let entries: Vec<HistoryEntry> = serde_json::from_str(&content)?;

    tracing::info!(
        path = %path.display(),
        entries = entries.len(),
        "History loaded"
    );
    Ok(entries)
}

/// Save history entries to `path`, creating parent directories as needed.
pub fn save_history(path: &Path, entries: &[HistoryEntry]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(entries)?;
    std::fs::write(path, json)?;

    tracing::debug!(
        path = %path.display(),
        entries = entries.len(),
        "History saved"
    );
    Ok(())
}
