//! Ghost Tracker Core
//!
//! Platform-agnostic session tracking for ghost identification rounds.
//! This crate owns the undoable domains, statistics, persistence and overlay
//! export without any UI dependencies.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod numbers;
pub mod records;
pub mod session;
pub mod stats;
pub mod storage;

// Re-export commonly used types
pub use catalog::{Catalog, GHOST_NAMES, names_match, to_display_name};
pub use config::{ExportConfig, SessionConfig, StorageFiles};
pub use domain::{Domain, Inverse};
pub use error::{ConfigError, StorageError};
pub use export::{ExportWriter, format_columns, format_grid};
pub use records::{
    ExtendedGhostRecord, GhostRecord, GhostStatus, Outcome, PartyEntry, Record, RemainingEntry,
};
pub use session::{CommandOutcome, Session, SessionView};
pub use stats::{ChartEntry, GhostStats, Leader, LeaderTracker, Projector, Tally};
pub use storage::{DomainId, DomainStorage, FileStorage, MemoryStorage, load_or_empty};
