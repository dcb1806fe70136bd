//! Undoable record stores.
//!
//! A [`Domain`] owns one collection of records plus an unbounded LIFO list of
//! [`Inverse`] operations. Recording mutations push exactly one inverse each;
//! [`Domain::undo`] pops one and replays it through [`Domain::restore`], which
//! never records.
use log::{debug, warn};

use crate::catalog::{Catalog, names_match};
use crate::records::{
    ExtendedGhostRecord, GhostRecord, Outcome, PartyEntry, Record, RemainingEntry,
};

/// Captured inverse of a single mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inverse<R> {
    /// Put back the prior value of one record.
    RestoreRecord { index: usize, prior: R },
    /// Replace the whole collection with a snapshot.
    RestoreSnapshot(Vec<R>),
    /// Drop the record inserted at `index`.
    RemoveAt(usize),
    /// Reinsert a removed record at its original position.
    InsertAt { index: usize, record: R },
}

/// One independently tracked collection with its own undo history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain<R> {
    records: Vec<R>,
    undo: Vec<Inverse<R>>,
}

impl<R> Default for Domain<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            undo: Vec::new(),
        }
    }
}

impl<R: Record + PartialEq> Domain<R> {
    /// Domain seeded with `records` and an empty undo history.
    #[must_use]
    pub const fn new(records: Vec<R>) -> Self {
        Self {
            records,
            undo: Vec::new(),
        }
    }

    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&R> {
        self.records.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of the first record whose name matches case-insensitively.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.records
            .iter()
            .position(|record| names_match(record.name(), name))
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Mutate the record at `index`, recording its prior value when it changed.
    ///
    /// Returns `None` for an out-of-range index, otherwise whether the record changed.
    pub fn update(&mut self, index: usize, mutate: impl FnOnce(&mut R)) -> Option<bool> {
        let record = self.records.get_mut(index)?;
        let prior = record.clone();
        mutate(record);
        if *record == prior {
            return Some(false);
        }
        self.undo.push(Inverse::RestoreRecord { index, prior });
        Some(true)
    }

    /// Reset every record, recording one snapshot of the whole collection.
    pub fn reset_all(&mut self) {
        let snapshot = self.records.clone();
        for record in &mut self.records {
            record.reset();
        }
        self.undo.push(Inverse::RestoreSnapshot(snapshot));
    }

    /// Append a record, returning its index.
    pub fn insert(&mut self, record: R) -> usize {
        self.records.push(record);
        let index = self.records.len() - 1;
        self.undo.push(Inverse::RemoveAt(index));
        index
    }

    /// Remove the record at `index`; `None` when out of range.
    pub fn remove(&mut self, index: usize) -> Option<R> {
        if index >= self.records.len() {
            return None;
        }
        let record = self.records.remove(index);
        self.undo.push(Inverse::InsertAt {
            index,
            record: record.clone(),
        });
        Some(record)
    }

    /// Pop and apply the most recent inverse. Returns `false` when the history is empty.
    pub fn undo(&mut self) -> bool {
        let Some(inverse) = self.undo.pop() else {
            return false;
        };
        self.restore(inverse);
        true
    }

    /// Apply an inverse without recording anything.
    fn restore(&mut self, inverse: Inverse<R>) {
        match inverse {
            Inverse::RestoreRecord { index, prior } => match self.records.get_mut(index) {
                Some(record) => *record = prior,
                None => warn!("undo target {index} is out of range; skipping restore"),
            },
            Inverse::RestoreSnapshot(snapshot) => self.records = snapshot,
            Inverse::RemoveAt(index) => {
                if index < self.records.len() {
                    self.records.remove(index);
                } else {
                    warn!("undo removal index {index} is out of range; skipping");
                }
            }
            Inverse::InsertAt { index, record } => {
                let index = index.min(self.records.len());
                self.records.insert(index, record);
            }
        }
    }
}

impl Domain<GhostRecord> {
    /// Ghost domain covering every catalog name, merged with persisted counts by exact name.
    #[must_use]
    pub fn from_catalog(catalog: &Catalog, persisted: Vec<GhostRecord>) -> Self {
        let mut records: Vec<GhostRecord> =
            catalog.names().iter().map(GhostRecord::new).collect();
        for state in persisted {
            if let Some(record) = records.iter_mut().find(|r| r.name == state.name) {
                *record = state;
            } else {
                debug!("dropping persisted ghost {:?} not in catalog", state.name);
            }
        }
        Self::new(records)
    }

    /// Count a selection for `name`. Returns the record index, or `None` for unknown names.
    pub fn apply_selection(&mut self, name: &str, outcome: Outcome) -> Option<usize> {
        let Some(index) = self.find(name) else {
            debug!("ignoring {outcome} selection for unknown ghost {name:?}");
            return None;
        };
        self.update(index, |record| record.register(outcome))?;
        Some(index)
    }
}

impl Domain<ExtendedGhostRecord> {
    /// Cumulative domain covering every catalog name, merged by exact name.
    #[must_use]
    pub fn from_catalog(catalog: &Catalog, persisted: Vec<ExtendedGhostRecord>) -> Self {
        let mut records: Vec<ExtendedGhostRecord> = catalog
            .names()
            .iter()
            .map(ExtendedGhostRecord::new)
            .collect();
        for state in persisted {
            if let Some(record) = records.iter_mut().find(|r| r.name == state.name) {
                *record = state;
            } else {
                debug!("dropping persisted cumulative ghost {:?}", state.name);
            }
        }
        Self::new(records)
    }

    pub fn apply_selection(&mut self, name: &str, outcome: Outcome) -> Option<usize> {
        let Some(index) = self.find(name) else {
            debug!("ignoring cumulative {outcome} selection for unknown ghost {name:?}");
            return None;
        };
        self.update(index, |record| record.register(outcome))?;
        Some(index)
    }
}

impl Domain<RemainingEntry> {
    /// Checklist of catalog display names, merged case-insensitively with persisted flags.
    #[must_use]
    pub fn from_catalog(catalog: &Catalog, persisted: &[RemainingEntry]) -> Self {
        let mut records: Vec<RemainingEntry> = catalog
            .display_names()
            .into_iter()
            .map(RemainingEntry::new)
            .collect();
        for state in persisted {
            if let Some(entry) = records
                .iter_mut()
                .find(|entry| names_match(&entry.display_name, &state.display_name))
            {
                entry.is_removed = state.is_removed;
            }
        }
        Self::new(records)
    }

    /// Flip the removed flag of `name`. Returns the new flag, or `None` for unknown names.
    pub fn toggle(&mut self, name: &str) -> Option<bool> {
        let Some(index) = self.find(name) else {
            debug!("ignoring toggle for unknown candidate {name:?}");
            return None;
        };
        self.update(index, |entry| entry.is_removed = !entry.is_removed)?;
        self.get(index).map(|entry| entry.is_removed)
    }

    /// Set the removed flag of `name`. Setting the current value records nothing.
    ///
    /// Returns whether the flag changed, or `None` for unknown names.
    pub fn set_removed(&mut self, name: &str, removed: bool) -> Option<bool> {
        let Some(index) = self.find(name) else {
            debug!("ignoring flag update for unknown candidate {name:?}");
            return None;
        };
        self.update(index, |entry| entry.is_removed = removed)
    }
}

impl Domain<PartyEntry> {
    /// Append a new party member. Returns its index.
    pub fn add(&mut self, entry: PartyEntry) -> usize {
        self.insert(entry)
    }

    /// Shift the live count at `index` by `delta`. Returns the new count.
    pub fn adjust(&mut self, index: usize, delta: i32) -> Option<i32> {
        let Some(changed) = self.update(index, |entry| {
            entry.count = entry.count.saturating_add(delta);
        }) else {
            debug!("ignoring adjustment for unknown party index {index}");
            return None;
        };
        if !changed {
            debug!("party adjustment at {index} left the count unchanged");
        }
        self.get(index).map(|entry| entry.count)
    }
}
