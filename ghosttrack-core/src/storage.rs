//! Persistence gateway: one JSON document per domain.
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::str::FromStr;

use crate::config::StorageFiles;
use crate::error::StorageError;

/// Identifies one independently persisted tracking domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainId {
    Ghosts,
    Extended,
    Remaining,
    Party,
}

impl DomainId {
    pub const ALL: [Self; 4] = [Self::Ghosts, Self::Extended, Self::Remaining, Self::Party];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ghosts => "ghosts",
            Self::Extended => "extended",
            Self::Remaining => "remaining",
            Self::Party => "party",
        }
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DomainId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ghosts" | "ghost" | "session" => Ok(Self::Ghosts),
            "extended" | "ext" | "cumulative" => Ok(Self::Extended),
            "remaining" | "checklist" => Ok(Self::Remaining),
            "party" => Ok(Self::Party),
            _ => Err(()),
        }
    }
}

/// Trait for abstracting per-domain save/load operations.
pub trait DomainStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Replace the stored records of `domain`.
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be encoded or written.
    fn save<T: Serialize>(&self, domain: DomainId, records: &[T]) -> Result<(), Self::Error>;

    /// Load the stored records of `domain`; `Ok(None)` when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if stored data exists but cannot be read or parsed.
    fn load<T: DeserializeOwned>(&self, domain: DomainId) -> Result<Option<Vec<T>>, Self::Error>;
}

/// Load `domain`, degrading every failure to an empty collection.
pub fn load_or_empty<S, T>(storage: &S, domain: DomainId) -> Vec<T>
where
    S: DomainStorage,
    T: DeserializeOwned,
{
    match storage.load(domain) {
        Ok(Some(records)) => records,
        Ok(None) => Vec::new(),
        Err(err) => {
            warn!("starting {domain} fresh: {err}");
            Vec::new()
        }
    }
}

/// Pretty-printed JSON files under a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    files: StorageFiles,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, files: StorageFiles) -> Self {
        Self {
            dir: dir.into(),
            files,
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `domain`.
    #[must_use]
    pub fn path_for(&self, domain: DomainId) -> PathBuf {
        self.dir.join(self.files.for_domain(domain))
    }
}

impl DomainStorage for FileStorage {
    type Error = StorageError;

    fn save<T: Serialize>(&self, domain: DomainId, records: &[T]) -> Result<(), Self::Error> {
        let json = serde_json::to_string_pretty(records).map_err(|source| StorageError::Encode {
            domain: domain.as_str(),
            source,
        })?;
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Write {
            path: self.dir.clone(),
            source,
        })?;
        write_replace(&self.path_for(domain), &json)
    }

    fn load<T: DeserializeOwned>(&self, domain: DomainId) -> Result<Option<Vec<T>>, Self::Error> {
        let path = self.path_for(domain);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StorageError::Read { path, source }),
        };
        serde_json::from_str::<Option<Vec<T>>>(&text)
            .map_err(|source| StorageError::Parse { path, source })
    }
}

/// Write `content` to a sibling temp file, then rename it over `path`.
pub(crate) fn write_replace(path: &Path, content: &str) -> Result<(), StorageError> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|source| StorageError::Write {
        path: temp_path.clone(),
        source,
    })?;
    fs::rename(&temp_path, path).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// In-process storage keeping the serialized JSON of each domain.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    documents: Rc<RefCell<HashMap<DomainId, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON currently stored for `domain`.
    #[must_use]
    pub fn raw(&self, domain: DomainId) -> Option<String> {
        self.documents.borrow().get(&domain).cloned()
    }

    /// Store arbitrary text for `domain`, e.g. to simulate a damaged file.
    pub fn put_raw(&self, domain: DomainId, text: impl Into<String>) {
        self.documents.borrow_mut().insert(domain, text.into());
    }
}

impl DomainStorage for MemoryStorage {
    type Error = StorageError;

    fn save<T: Serialize>(&self, domain: DomainId, records: &[T]) -> Result<(), Self::Error> {
        let json = serde_json::to_string_pretty(records).map_err(|source| StorageError::Encode {
            domain: domain.as_str(),
            source,
        })?;
        self.documents.borrow_mut().insert(domain, json);
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, domain: DomainId) -> Result<Option<Vec<T>>, Self::Error> {
        let Some(text) = self.raw(domain) else {
            return Ok(None);
        };
        serde_json::from_str::<Option<Vec<T>>>(&text).map_err(|source| StorageError::Parse {
            path: PathBuf::from(format!("memory:{domain}")),
            source,
        })
    }
}
