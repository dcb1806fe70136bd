//! Session configuration: storage locations, file names and export layout.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::storage::DomainId;

const DEFAULT_COLUMNS: usize = 3;

/// File names used for each persisted domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageFiles {
    #[serde(default = "StorageFiles::default_ghosts")]
    pub ghosts: String,
    #[serde(default = "StorageFiles::default_extended")]
    pub extended: String,
    #[serde(default = "StorageFiles::default_remaining")]
    pub remaining: String,
    #[serde(default = "StorageFiles::default_party")]
    pub party: String,
}

impl StorageFiles {
    fn default_ghosts() -> String {
        "ghosts_data.json".to_string()
    }

    fn default_extended() -> String {
        "extended_ghosts_data.json".to_string()
    }

    fn default_remaining() -> String {
        "remaining_ghosts_state.json".to_string()
    }

    fn default_party() -> String {
        "party_entries.json".to_string()
    }

    /// File name backing the given domain.
    #[must_use]
    pub fn for_domain(&self, domain: DomainId) -> &str {
        match domain {
            DomainId::Ghosts => &self.ghosts,
            DomainId::Extended => &self.extended,
            DomainId::Remaining => &self.remaining,
            DomainId::Party => &self.party,
        }
    }
}

impl Default for StorageFiles {
    fn default() -> Self {
        Self {
            ghosts: Self::default_ghosts(),
            extended: Self::default_extended(),
            remaining: Self::default_remaining(),
            party: Self::default_party(),
        }
    }
}

/// Layout and file names for the plain-text overlay export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "ExportConfig::default_enabled")]
    pub enabled: bool,
    #[serde(default = "ExportConfig::default_columns")]
    pub columns: usize,
    /// Separator placed between grid rows and column cells.
    #[serde(default = "ExportConfig::default_line_separator")]
    pub line_separator: String,
    #[serde(default = "ExportConfig::default_identified_file")]
    pub identified_file: String,
    #[serde(default = "ExportConfig::default_rejected_file")]
    pub rejected_file: String,
    #[serde(default = "ExportConfig::default_leader_file")]
    pub leader_file: String,
    #[serde(default = "ExportConfig::default_grid_file")]
    pub grid_file: String,
    /// Column files are named `<prefix><n>.txt`, counting from 1.
    #[serde(default = "ExportConfig::default_column_prefix")]
    pub column_file_prefix: String,
}

impl ExportConfig {
    const fn default_enabled() -> bool {
        true
    }

    const fn default_columns() -> usize {
        DEFAULT_COLUMNS
    }

    fn default_line_separator() -> String {
        if cfg!(windows) { "\r\n" } else { "\n" }.to_string()
    }

    fn default_identified_file() -> String {
        "identified.txt".to_string()
    }

    fn default_rejected_file() -> String {
        "rejected.txt".to_string()
    }

    fn default_leader_file() -> String {
        "top_ghost.txt".to_string()
    }

    fn default_grid_file() -> String {
        "remaining_ghosts.txt".to_string()
    }

    fn default_column_prefix() -> String {
        "remaining_ghosts_".to_string()
    }

    /// File name for the 1-based column `number`.
    #[must_use]
    pub fn column_file(&self, number: usize) -> String {
        format!("{}{number}.txt", self.column_file_prefix)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            columns: Self::default_columns(),
            line_separator: Self::default_line_separator(),
            identified_file: Self::default_identified_file(),
            rejected_file: Self::default_rejected_file(),
            leader_file: Self::default_leader_file(),
            grid_file: Self::default_grid_file(),
            column_file_prefix: Self::default_column_prefix(),
        }
    }
}

/// Top-level configuration for a tracking session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "SessionConfig::default_data_dir")]
    pub data_dir: PathBuf,
    /// Directory for overlay text files; falls back to `data_dir`.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
    #[serde(default)]
    pub files: StorageFiles,
    #[serde(default)]
    pub export: ExportConfig,
}

impl SessionConfig {
    fn default_data_dir() -> PathBuf {
        PathBuf::from(".")
    }

    /// Configuration rooted at `data_dir` with every other field defaulted.
    #[must_use]
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Parse configuration from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the JSON is malformed or any field violates its bounds.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Directory the export writer targets.
    #[must_use]
    pub fn export_dir(&self) -> &Path {
        self.export_dir.as_deref().unwrap_or(&self.data_dir)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the column count is zero or a file name is empty or nested.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.export.columns == 0 {
            return Err(ConfigError::Columns(self.export.columns));
        }
        let names = [
            ("files.ghosts", &self.files.ghosts),
            ("files.extended", &self.files.extended),
            ("files.remaining", &self.files.remaining),
            ("files.party", &self.files.party),
            ("export.identified_file", &self.export.identified_file),
            ("export.rejected_file", &self.export.rejected_file),
            ("export.leader_file", &self.export.leader_file),
            ("export.grid_file", &self.export.grid_file),
        ];
        for (field, value) in names {
            validate_file_name(field, value)?;
        }
        if self.export.column_file_prefix.contains(['/', '\\']) {
            return Err(ConfigError::NestedFileName {
                field: "export.column_file_prefix",
                value: self.export.column_file_prefix.clone(),
            });
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            export_dir: None,
            files: StorageFiles::default(),
            export: ExportConfig::default(),
        }
    }
}

fn validate_file_name(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::EmptyFileName { field });
    }
    if value.contains(['/', '\\']) {
        return Err(ConfigError::NestedFileName {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
