//! Plain-text export for overlay software.
//!
//! Layout of the remaining-ghosts grid: cells are filled row-major, each cell is
//! padded with spaces to the longest display name plus two, and removed entries
//! keep their cell as blank padding so every name stays in its column.
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ExportConfig;
use crate::error::StorageError;
use crate::records::RemainingEntry;
use crate::stats::GhostStats;
use crate::storage::write_replace;

const CELL_PADDING: usize = 2;

fn cell_text(entry: &RemainingEntry) -> &str {
    if entry.is_removed {
        ""
    } else {
        &entry.display_name
    }
}

fn pad_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let mut cell = String::with_capacity(text.len() + width.saturating_sub(len));
    cell.push_str(text);
    cell.extend(std::iter::repeat_n(' ', width.saturating_sub(len)));
    cell
}

/// Render the checklist as a fixed-column grid.
#[must_use]
pub fn format_grid(entries: &[RemainingEntry], columns: usize, separator: &str) -> String {
    let columns = columns.max(1);
    let cell_width = entries
        .iter()
        .map(|e| e.display_name.chars().count())
        .max()
        .unwrap_or(0)
        + CELL_PADDING;

    entries
        .chunks(columns)
        .map(|row| {
            row.iter()
                .map(|entry| pad_right(cell_text(entry), cell_width))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// Render each grid column as its own newline-joined document.
///
/// Positions past the end of the checklist render as empty lines so all column
/// documents have the same number of rows.
#[must_use]
pub fn format_columns(entries: &[RemainingEntry], columns: usize, separator: &str) -> Vec<String> {
    let columns = columns.max(1);
    let rows = entries.len().div_ceil(columns);
    (0..columns)
        .map(|column| {
            (0..rows)
                .map(|row| entries.get(row * columns + column).map_or("", cell_text))
                .collect::<Vec<_>>()
                .join(separator)
        })
        .collect()
}

/// Writes overlay files into a target directory. Failures are logged, never returned.
#[derive(Debug, Clone)]
pub struct ExportWriter {
    dir: PathBuf,
    cfg: ExportConfig,
}

impl ExportWriter {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, cfg: ExportConfig) -> Self {
        Self {
            dir: dir.into(),
            cfg,
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub const fn config(&self) -> &ExportConfig {
        &self.cfg
    }

    /// Write the raw identified/rejected counters and the leader label.
    pub fn write_stats(&self, stats: &GhostStats) {
        if !self.cfg.enabled {
            return;
        }
        self.write(&self.cfg.identified_file, &stats.identified_total.to_string());
        self.write(&self.cfg.rejected_file, &stats.rejected_total.to_string());
        self.write(&self.cfg.leader_file, &stats.leader_label());
    }

    /// Write the checklist grid and one file per column.
    pub fn write_remaining(&self, entries: &[RemainingEntry]) {
        if !self.cfg.enabled {
            return;
        }
        let separator = self.cfg.line_separator.as_str();
        self.write(
            &self.cfg.grid_file,
            &format_grid(entries, self.cfg.columns, separator),
        );
        for (idx, column) in format_columns(entries, self.cfg.columns, separator)
            .iter()
            .enumerate()
        {
            self.write(&self.cfg.column_file(idx + 1), column);
        }
    }

    fn write(&self, file_name: &str, content: &str) {
        if let Err(err) = self.try_write(file_name, content) {
            warn!("overlay export skipped: {err}");
        } else {
            debug!("exported {file_name}");
        }
    }

    fn try_write(&self, file_name: &str, content: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Write {
            path: self.dir.clone(),
            source,
        })?;
        write_replace(&self.dir.join(file_name), content)
    }
}
