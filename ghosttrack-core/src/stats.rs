//! Statistics projection over ghost counters.
//!
//! Projections are pure functions of a record slice, except for the
//! [`LeaderTracker`] which remembers the previously reported leader so that a
//! tie does not flip the displayed leader back and forth.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::numbers::percent_of;
use crate::records::{ExtendedGhostRecord, GhostRecord};

/// Read access to identified/rejected counters.
pub trait Tally {
    fn name(&self) -> &str;
    fn identified(&self) -> u32;
    fn rejected(&self) -> u32;

    fn total(&self) -> u32 {
        self.identified().saturating_add(self.rejected())
    }
}

impl Tally for GhostRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn identified(&self) -> u32 {
        self.identified_count
    }

    fn rejected(&self) -> u32 {
        self.rejected_count
    }
}

impl Tally for ExtendedGhostRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn identified(&self) -> u32 {
        self.identified_count
    }

    fn rejected(&self) -> u32 {
        self.rejected_count
    }
}

/// One bar of the per-ghost chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEntry {
    pub name: String,
    pub identified_count: u32,
    pub rejected_count: u32,
    pub total_count: u32,
    /// Share of this ghost in every selection of the domain.
    pub total_share_percent: f64,
    /// Identified share within this ghost's own total.
    pub identified_percent: f64,
    /// Rejected share within this ghost's own total.
    pub rejected_percent: f64,
}

impl ChartEntry {
    fn from_tally<T: Tally>(tally: &T, total_selections: u32) -> Self {
        let total = tally.total();
        Self {
            name: tally.name().to_string(),
            identified_count: tally.identified(),
            rejected_count: tally.rejected(),
            total_count: total,
            total_share_percent: percent_of(total, total_selections),
            identified_percent: percent_of(tally.identified(), total),
            rejected_percent: percent_of(tally.rejected(), total),
        }
    }
}

/// Reported leader of a domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leader {
    pub name: String,
    pub total_count: u32,
    /// Leader total as a share of all selections.
    pub share_percent: f64,
}

impl Leader {
    /// Overlay label, e.g. `ДЕМОН (5)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.total_count)
    }
}

/// Aggregate statistics of one ghost-keyed domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GhostStats {
    pub identified_total: u32,
    pub rejected_total: u32,
    pub total_selections: u32,
    pub identified_percent: f64,
    pub rejected_percent: f64,
    pub leader: Option<Leader>,
    /// Largest per-ghost total, at least 1, for chart scaling.
    pub max_total: u32,
    pub leaderboard: Vec<ChartEntry>,
}

impl GhostStats {
    /// Leader label for the overlay, empty when there is no leader.
    #[must_use]
    pub fn leader_label(&self) -> String {
        self.leader.as_ref().map(Leader::label).unwrap_or_default()
    }
}

/// Descending by total, ties ascending by name with Ё sorted as Е.
fn rank_order<T: Tally>(left: &T, right: &T) -> Ordering {
    right
        .total()
        .cmp(&left.total())
        .then_with(|| collated(left.name()).cmp(collated(right.name())))
        .then_with(|| left.name().cmp(right.name()))
}

fn collated(name: &str) -> impl Iterator<Item = char> + '_ {
    name.chars().map(|c| match c {
        'Ё' => 'Е',
        'ё' => 'е',
        other => other,
    })
}

/// Records with a non-zero total in leaderboard order.
#[must_use]
pub fn leaderboard<T: Tally>(records: &[T]) -> Vec<&T> {
    let mut ranked: Vec<&T> = records.iter().filter(|r| r.total() > 0).collect();
    ranked.sort_by(|a, b| rank_order(*a, *b));
    ranked
}

/// Top of the leaderboard with no hysteresis.
#[must_use]
pub fn ranked_leader<T: Tally>(records: &[T]) -> Option<&T> {
    records
        .iter()
        .filter(|r| r.total() > 0)
        .min_by(|a, b| rank_order(*a, *b))
}

/// Build the full projection for `records` given an already chosen leader.
#[must_use]
pub fn project<T: Tally>(records: &[T], leader: Option<&T>) -> GhostStats {
    let identified_total = records
        .iter()
        .fold(0u32, |acc, r| acc.saturating_add(r.identified()));
    let rejected_total = records
        .iter()
        .fold(0u32, |acc, r| acc.saturating_add(r.rejected()));
    let total_selections = identified_total.saturating_add(rejected_total);

    let leader = leader.filter(|l| l.total() > 0).map(|l| Leader {
        name: l.name().to_string(),
        total_count: l.total(),
        share_percent: percent_of(l.total(), total_selections),
    });

    let leaderboard = leaderboard(records)
        .into_iter()
        .map(|r| ChartEntry::from_tally(r, total_selections))
        .collect();

    GhostStats {
        identified_total,
        rejected_total,
        total_selections,
        identified_percent: percent_of(identified_total, total_selections),
        rejected_percent: percent_of(rejected_total, total_selections),
        leader,
        max_total: records.iter().map(Tally::total).max().unwrap_or(0).max(1),
        leaderboard,
    }
}

/// Leader selection with hysteresis.
///
/// The previous leader is kept while its total still equals the maximum. A new
/// leader is the first record in slice order holding the maximum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaderTracker {
    current: Option<String>,
}

impl LeaderTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Name of the leader reported by the last selection.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn select<'a, T: Tally>(&mut self, records: &'a [T]) -> Option<&'a T> {
        let max = records.iter().map(Tally::total).max().unwrap_or(0);
        if max == 0 {
            self.current = None;
            return None;
        }

        if let Some(name) = self.current.as_deref()
            && let Some(kept) = records.iter().find(|r| r.name() == name)
            && kept.total() == max
        {
            return Some(kept);
        }

        let leader = records.iter().find(|r| r.total() == max)?;
        self.current = Some(leader.name().to_string());
        Some(leader)
    }
}

/// Statistics projector for the two ghost-keyed domains.
#[derive(Debug, Clone, Default)]
pub struct Projector {
    leader: LeaderTracker,
}

impl Projector {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            leader: LeaderTracker::new(),
        }
    }

    /// Project the per-session domain using the stable leader.
    pub fn session(&mut self, ghosts: &[GhostRecord]) -> GhostStats {
        let leader = self.leader.select(ghosts);
        project(ghosts, leader)
    }

    /// Project the cumulative domain; its leader is simply the top ranked ghost.
    #[must_use]
    pub fn cumulative(&self, records: &[ExtendedGhostRecord]) -> GhostStats {
        project(records, ranked_leader(records))
    }

    #[must_use]
    pub const fn leader_tracker(&self) -> &LeaderTracker {
        &self.leader
    }
}
