//! Command surface tying the domains, projector, storage and export together.
//!
//! Each command runs to completion before returning: mutate, recompute, persist
//! the touched domain, then refresh the overlay files. Commands that hit an
//! unknown ghost or index change nothing and write nothing.
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::config::SessionConfig;
use crate::domain::Domain;
use crate::export::ExportWriter;
use crate::records::{ExtendedGhostRecord, GhostRecord, Outcome, PartyEntry, RemainingEntry};
use crate::stats::{GhostStats, Projector};
use crate::storage::{DomainId, DomainStorage, FileStorage, load_or_empty};

/// Immutable snapshot handed back to callers after every command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub stats: GhostStats,
    pub extended: GhostStats,
    pub remaining: Vec<RemainingEntry>,
    pub party: Vec<PartyEntry>,
}

/// Result of a mutating command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOutcome {
    /// Whether any domain state changed.
    pub applied: bool,
    pub view: SessionView,
}

/// Live tracking session over four undoable domains.
#[derive(Debug)]
pub struct Session<S: DomainStorage> {
    catalog: Catalog,
    ghosts: Domain<GhostRecord>,
    extended: Domain<ExtendedGhostRecord>,
    remaining: Domain<RemainingEntry>,
    party: Domain<PartyEntry>,
    projector: Projector,
    stats: GhostStats,
    storage: S,
    export: ExportWriter,
}

impl Session<FileStorage> {
    /// Open a file-backed session described by `cfg`.
    #[must_use]
    pub fn open(cfg: &SessionConfig) -> Self {
        let storage = FileStorage::new(&cfg.data_dir, cfg.files.clone());
        let export = ExportWriter::new(cfg.export_dir(), cfg.export.clone());
        Self::with_storage(Catalog::ghosts(), storage, export)
    }
}

impl<S: DomainStorage> Session<S> {
    /// Load every domain from `storage`, merging persisted state into the catalog.
    ///
    /// Unreadable or corrupt documents start their domain empty. The overlay
    /// files are refreshed once so they match the loaded state.
    pub fn with_storage(catalog: Catalog, storage: S, export: ExportWriter) -> Self {
        let ghosts = Domain::<GhostRecord>::from_catalog(
            &catalog,
            load_or_empty(&storage, DomainId::Ghosts),
        );
        let extended = Domain::<ExtendedGhostRecord>::from_catalog(
            &catalog,
            load_or_empty(&storage, DomainId::Extended),
        );
        let remaining_state: Vec<RemainingEntry> = load_or_empty(&storage, DomainId::Remaining);
        let remaining = Domain::<RemainingEntry>::from_catalog(&catalog, &remaining_state);
        let party = Domain::<PartyEntry>::new(load_or_empty(&storage, DomainId::Party));

        let mut projector = Projector::new();
        let stats = projector.session(ghosts.records());
        info!(
            "session loaded: {} ghosts, {} selections, {} party members",
            ghosts.len(),
            stats.total_selections,
            party.len()
        );

        let session = Self {
            catalog,
            ghosts,
            extended,
            remaining,
            party,
            projector,
            stats,
            storage,
            export,
        };
        session.export.write_stats(&session.stats);
        session.export.write_remaining(session.remaining.records());
        session
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Latest projection of the primary ghost domain.
    #[must_use]
    pub const fn stats(&self) -> &GhostStats {
        &self.stats
    }

    /// Projection of the cumulative ghost domain.
    #[must_use]
    pub fn extended_stats(&self) -> GhostStats {
        self.projector.cumulative(self.extended.records())
    }

    #[must_use]
    pub fn ghosts(&self) -> &[GhostRecord] {
        self.ghosts.records()
    }

    #[must_use]
    pub fn extended(&self) -> &[ExtendedGhostRecord] {
        self.extended.records()
    }

    #[must_use]
    pub fn remaining(&self) -> &[RemainingEntry] {
        self.remaining.records()
    }

    #[must_use]
    pub fn party(&self) -> &[PartyEntry] {
        self.party.records()
    }

    #[must_use]
    pub fn can_undo(&self, domain: DomainId) -> bool {
        match domain {
            DomainId::Ghosts => self.ghosts.can_undo(),
            DomainId::Extended => self.extended.can_undo(),
            DomainId::Remaining => self.remaining.can_undo(),
            DomainId::Party => self.party.can_undo(),
        }
    }

    /// Catalog names containing `query`, case-insensitively.
    #[must_use]
    pub fn search_ghosts(&self, query: &str) -> Vec<&str> {
        self.catalog.search(query)
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            stats: self.stats.clone(),
            extended: self.extended_stats(),
            remaining: self.remaining.records().to_vec(),
            party: self.party.records().to_vec(),
        }
    }

    /// Record an outcome for `name`.
    ///
    /// A primary selection also counts toward the cumulative domain; each keeps
    /// its own undo entry. Checklist and party domains ignore selections.
    pub fn select_outcome(
        &mut self,
        domain: DomainId,
        name: &str,
        outcome: Outcome,
    ) -> CommandOutcome {
        let applied = match domain {
            DomainId::Ghosts => {
                let hit = self.ghosts.apply_selection(name, outcome).is_some();
                if hit {
                    self.extended.apply_selection(name, outcome);
                    self.refresh(DomainId::Ghosts);
                    self.refresh(DomainId::Extended);
                }
                hit
            }
            DomainId::Extended => {
                let hit = self.extended.apply_selection(name, outcome).is_some();
                if hit {
                    self.refresh(DomainId::Extended);
                }
                hit
            }
            DomainId::Remaining | DomainId::Party => {
                debug!("{domain} does not take ghost selections");
                false
            }
        };
        self.outcome(applied)
    }

    /// Reset every record of `domain` in one undoable step.
    pub fn reset_domain(&mut self, domain: DomainId) -> CommandOutcome {
        match domain {
            DomainId::Ghosts => self.ghosts.reset_all(),
            DomainId::Extended => self.extended.reset_all(),
            DomainId::Remaining => self.remaining.reset_all(),
            DomainId::Party => self.party.reset_all(),
        }
        self.refresh(domain);
        self.outcome(true)
    }

    /// Roll back the most recent mutation of `domain`.
    pub fn undo_domain(&mut self, domain: DomainId) -> CommandOutcome {
        let applied = match domain {
            DomainId::Ghosts => self.ghosts.undo(),
            DomainId::Extended => self.extended.undo(),
            DomainId::Remaining => self.remaining.undo(),
            DomainId::Party => self.party.undo(),
        };
        if applied {
            self.refresh(domain);
        } else {
            debug!("nothing to undo in {domain}");
        }
        self.outcome(applied)
    }

    /// Add a party member. A non-numeric count starts at 0; a blank nickname is ignored.
    pub fn add_party_entry(&mut self, nickname: &str, initial_count_text: &str) -> CommandOutcome {
        let nickname = nickname.trim();
        if nickname.is_empty() {
            debug!("ignoring party entry without a nickname");
            return self.outcome(false);
        }
        let initial = initial_count_text.trim().parse::<i32>().unwrap_or_else(|_| {
            if !initial_count_text.trim().is_empty() {
                debug!("party count {initial_count_text:?} is not a number; using 0");
            }
            0
        });
        self.party.add(PartyEntry::new(nickname, initial));
        self.refresh(DomainId::Party);
        self.outcome(true)
    }

    /// Shift the live count of the party member at `index`.
    pub fn adjust_party_entry(&mut self, index: usize, delta: i32) -> CommandOutcome {
        let applied = self.party.adjust(index, delta).is_some() && delta != 0;
        if applied {
            self.refresh(DomainId::Party);
        }
        self.outcome(applied)
    }

    pub fn remove_party_entry(&mut self, index: usize) -> CommandOutcome {
        let applied = match self.party.remove(index) {
            Some(entry) => {
                debug!("removed party member {:?}", entry.nickname);
                true
            }
            None => {
                debug!("ignoring removal of unknown party index {index}");
                false
            }
        };
        if applied {
            self.refresh(DomainId::Party);
        }
        self.outcome(applied)
    }

    /// Flip the removed flag of a checklist entry.
    pub fn toggle_remaining(&mut self, name: &str) -> CommandOutcome {
        let applied = self.remaining.toggle(name).is_some();
        if applied {
            self.refresh(DomainId::Remaining);
        }
        self.outcome(applied)
    }

    /// Set the removed flag explicitly; setting the current value records nothing.
    pub fn set_remaining(&mut self, name: &str, removed: bool) -> CommandOutcome {
        let applied = self.remaining.set_removed(name, removed) == Some(true);
        if applied {
            self.refresh(DomainId::Remaining);
        }
        self.outcome(applied)
    }

    fn outcome(&self, applied: bool) -> CommandOutcome {
        CommandOutcome {
            applied,
            view: self.view(),
        }
    }

    /// Recompute, persist and export after `domain` changed.
    fn refresh(&mut self, domain: DomainId) {
        if domain == DomainId::Ghosts {
            self.stats = self.projector.session(self.ghosts.records());
        }
        self.persist(domain);
        match domain {
            DomainId::Ghosts => self.export.write_stats(&self.stats),
            DomainId::Remaining => self.export.write_remaining(self.remaining.records()),
            DomainId::Extended | DomainId::Party => {}
        }
    }

    fn persist(&self, domain: DomainId) {
        let saved = match domain {
            DomainId::Ghosts => self.storage.save(domain, self.ghosts.records()),
            DomainId::Extended => self.storage.save(domain, self.extended.records()),
            DomainId::Remaining => self.storage.save(domain, self.remaining.records()),
            DomainId::Party => self.storage.save(domain, self.party.records()),
        };
        if let Err(err) = saved {
            warn!("could not save {domain}: {err}");
        }
    }
}
