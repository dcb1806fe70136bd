//! Record shapes owned by the tracking domains.
//!
//! Field names follow the persisted JSON layout (`PascalCase`) so files written
//! by earlier builds reload unchanged.
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::numbers::{clamp_i64_to_i32, clamp_i64_to_u32};

/// Shared behaviour every domain record provides to the undoable store.
pub trait Record: Clone + fmt::Debug {
    /// Identity used for name lookups.
    fn name(&self) -> &str;

    /// Return the record to its reset state.
    fn reset(&mut self);
}

/// Latest judgment recorded for a ghost. Persisted as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GhostStatus {
    #[default]
    Unknown,
    Identified,
    Rejected,
}

impl GhostStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Identified => "identified",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for GhostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<GhostStatus> for u8 {
    fn from(value: GhostStatus) -> Self {
        match value {
            GhostStatus::Unknown => 0,
            GhostStatus::Identified => 1,
            GhostStatus::Rejected => 2,
        }
    }
}

impl TryFrom<u8> for GhostStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Unknown),
            1 => Ok(Self::Identified),
            2 => Ok(Self::Rejected),
            other => Err(format!("unknown ghost status {other}")),
        }
    }
}

/// A user judgment about a ghost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Identified,
    Rejected,
}

impl Outcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identified => "identified",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identified" | "identify" | "id" => Ok(Self::Identified),
            "rejected" | "reject" | "rej" => Ok(Self::Rejected),
            _ => Err(()),
        }
    }
}

impl From<Outcome> for GhostStatus {
    fn from(value: Outcome) -> Self {
        match value {
            Outcome::Identified => Self::Identified,
            Outcome::Rejected => Self::Rejected,
        }
    }
}

fn count_from_i64<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    i64::deserialize(deserializer).map(clamp_i64_to_u32)
}

fn signed_from_i64<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    i64::deserialize(deserializer).map(clamp_i64_to_i32)
}

/// Per-session identification counters for one ghost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GhostRecord {
    pub name: String,
    #[serde(default, deserialize_with = "count_from_i64")]
    pub identified_count: u32,
    #[serde(default, deserialize_with = "count_from_i64")]
    pub rejected_count: u32,
    #[serde(default)]
    pub status: GhostStatus,
}

impl GhostRecord {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identified_count: 0,
            rejected_count: 0,
            status: GhostStatus::Unknown,
        }
    }

    #[must_use]
    pub const fn total_count(&self) -> u32 {
        self.identified_count.saturating_add(self.rejected_count)
    }

    /// Count the selection and remember it as the latest status.
    pub fn register(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Identified => {
                self.identified_count = self.identified_count.saturating_add(1);
            }
            Outcome::Rejected => self.rejected_count = self.rejected_count.saturating_add(1),
        }
        self.status = outcome.into();
    }
}

impl Record for GhostRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {
        self.identified_count = 0;
        self.rejected_count = 0;
        self.status = GhostStatus::Unknown;
    }
}

/// Cumulative counters kept across session resets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExtendedGhostRecord {
    pub name: String,
    #[serde(default, deserialize_with = "count_from_i64")]
    pub identified_count: u32,
    #[serde(default, deserialize_with = "count_from_i64")]
    pub rejected_count: u32,
}

impl ExtendedGhostRecord {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identified_count: 0,
            rejected_count: 0,
        }
    }

    #[must_use]
    pub const fn total_count(&self) -> u32 {
        self.identified_count.saturating_add(self.rejected_count)
    }

    pub fn register(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Identified => {
                self.identified_count = self.identified_count.saturating_add(1);
            }
            Outcome::Rejected => self.rejected_count = self.rejected_count.saturating_add(1),
        }
    }
}

impl Record for ExtendedGhostRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {
        self.identified_count = 0;
        self.rejected_count = 0;
    }
}

/// Checklist flag for a ghost that is still a candidate this round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingEntry {
    #[serde(rename = "Name")]
    pub display_name: String,
    #[serde(rename = "IsRemoved", default)]
    pub is_removed: bool,
}

impl RemainingEntry {
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            is_removed: false,
        }
    }
}

impl Record for RemainingEntry {
    fn name(&self) -> &str {
        &self.display_name
    }

    fn reset(&mut self) {
        self.is_removed = false;
    }
}

/// Live counter for one party member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartyEntry {
    pub nickname: String,
    #[serde(default, deserialize_with = "signed_from_i64")]
    pub count: i32,
    #[serde(default, deserialize_with = "signed_from_i64")]
    pub initial_count: i32,
}

impl PartyEntry {
    /// New entry whose live count starts at `initial_count`.
    #[must_use]
    pub fn new(nickname: impl Into<String>, initial_count: i32) -> Self {
        Self {
            nickname: nickname.into(),
            count: initial_count,
            initial_count,
        }
    }
}

impl Record for PartyEntry {
    fn name(&self) -> &str {
        &self.nickname
    }

    fn reset(&mut self) {
        self.count = self.initial_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ghost_register_updates_counts_and_status() {
        let mut ghost = GhostRecord::new("ОНИ");
        ghost.register(Outcome::Identified);
        ghost.register(Outcome::Rejected);
        ghost.register(Outcome::Identified);
        assert_eq!(ghost.identified_count, 2);
        assert_eq!(ghost.rejected_count, 1);
        assert_eq!(ghost.total_count(), 3);
        assert_eq!(ghost.status, GhostStatus::Identified);
        ghost.reset();
        assert_eq!(ghost, GhostRecord::new("ОНИ"));
    }

    #[test]
    fn ghost_json_uses_legacy_layout() {
        let mut ghost = GhostRecord::new("ТЕНЬ");
        ghost.register(Outcome::Rejected);
        let json = serde_json::to_string(&ghost).unwrap();
        assert_eq!(
            json,
            r#"{"Name":"ТЕНЬ","IdentifiedCount":0,"RejectedCount":1,"Status":2}"#
        );
    }

    #[test]
    fn negative_counts_clamp_on_load() {
        let ghost: GhostRecord = serde_json::from_str(
            r#"{"Name":"ДУХ","IdentifiedCount":-3,"RejectedCount":4,"Status":1}"#,
        )
        .unwrap();
        assert_eq!(ghost.identified_count, 0);
        assert_eq!(ghost.rejected_count, 4);
        assert_eq!(ghost.status, GhostStatus::Identified);

        let bad = serde_json::from_str::<GhostRecord>(r#"{"Name":"ДУХ","Status":9}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn party_entry_roundtrips_field_names() {
        let entry: PartyEntry =
            serde_json::from_str(r#"{"Nickname":"Bob","Count":-1,"InitialCount":2}"#).unwrap();
        assert_eq!(entry.count, -1);
        assert_eq!(entry.initial_count, 2);
        let mut reset = entry.clone();
        reset.reset();
        assert_eq!(reset.count, 2);

        let remaining: RemainingEntry =
            serde_json::from_str(r#"{"Name":"Мимик","IsRemoved":true}"#).unwrap();
        assert!(remaining.is_removed);
        assert_eq!(remaining.name(), "Мимик");
    }

    #[test]
    fn outcome_parses_aliases() {
        assert_eq!("identify".parse::<Outcome>(), Ok(Outcome::Identified));
        assert_eq!("rej".parse::<Outcome>(), Ok(Outcome::Rejected));
        assert!("maybe".parse::<Outcome>().is_err());
        assert_eq!(GhostStatus::from(Outcome::Rejected), GhostStatus::Rejected);
    }
}
