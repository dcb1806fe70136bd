use ghosttrack_core::{
    DomainId, FileStorage, GhostRecord, GhostStatus, Outcome, Session, SessionConfig,
};
use std::fs;
use std::path::{Path, PathBuf};

fn temp_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "ghosttrack-core-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn config(dir: &Path) -> SessionConfig {
    let mut cfg = SessionConfig::with_data_dir(dir);
    cfg.export.line_separator = "\n".to_string();
    cfg
}

fn open(dir: &Path) -> Session<FileStorage> {
    Session::open(&config(dir))
}

#[test]
fn restart_resumes_every_domain() {
    let dir = temp_dir("restart");
    {
        let mut session = open(&dir);
        session.select_outcome(DomainId::Ghosts, "ФАНТОМ", Outcome::Identified);
        session.select_outcome(DomainId::Ghosts, "ФАНТОМ", Outcome::Rejected);
        session.select_outcome(DomainId::Extended, "ОБАКЭ", Outcome::Identified);
        session.toggle_remaining("Обакэ");
        session.add_party_entry("Bob", "2");
        session.adjust_party_entry(0, -5);
    }

    let session = open(&dir);
    let phantom = session
        .ghosts()
        .iter()
        .find(|g| g.name == "ФАНТОМ")
        .expect("phantom");
    assert_eq!(phantom.identified_count, 1);
    assert_eq!(phantom.rejected_count, 1);
    assert_eq!(phantom.status, GhostStatus::Rejected);
    assert_eq!(session.extended_stats().identified_total, 2);
    assert!(
        session
            .remaining()
            .iter()
            .any(|e| e.display_name == "Обакэ" && e.is_removed)
    );
    assert_eq!(session.party()[0].count, -3);
    assert_eq!(session.stats().leader_label(), "ФАНТОМ (2)");
    for domain in DomainId::ALL {
        assert!(!session.can_undo(domain));
    }
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn legacy_ghost_file_loads_and_ignores_strangers() {
    let dir = temp_dir("legacy");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("ghosts_data.json"),
        r#"[
  { "Name": "МАРА", "IdentifiedCount": 3, "RejectedCount": 1, "Status": 1 },
  { "Name": "CASPER", "IdentifiedCount": 9, "RejectedCount": 0, "Status": 1 }
]"#,
    )
    .unwrap();

    let session = open(&dir);
    assert_eq!(session.ghosts().len(), 27);
    assert_eq!(session.stats().identified_total, 3);
    assert_eq!(session.stats().leader_label(), "МАРА (4)");
    assert_eq!(
        fs::read_to_string(dir.join("top_ghost.txt")).unwrap(),
        "МАРА (4)"
    );
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn corrupt_files_start_empty() {
    let dir = temp_dir("corrupt");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("ghosts_data.json"), "definitely not json").unwrap();
    fs::write(dir.join("party_entries.json"), "[{\"Nickname\": ").unwrap();

    let mut session = open(&dir);
    assert_eq!(session.stats().total_selections, 0);
    assert!(session.party().is_empty());

    let out = session.select_outcome(DomainId::Ghosts, "МОРОЙ", Outcome::Identified);
    assert!(out.applied);
    let saved: Vec<GhostRecord> =
        serde_json::from_str(&fs::read_to_string(dir.join("ghosts_data.json")).unwrap()).unwrap();
    assert_eq!(saved.len(), 27);
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn selection_sequence_undoes_to_the_start() {
    let dir = temp_dir("undo");
    let mut session = open(&dir);
    let before = session.ghosts().to_vec();
    let names = ["ДЖИНН", "ГОРЁ", "джинн", "ХАНТУ", "ГОРЁ"];
    for (idx, name) in names.iter().enumerate() {
        let outcome = if idx % 2 == 0 {
            Outcome::Identified
        } else {
            Outcome::Rejected
        };
        assert!(session.select_outcome(DomainId::Ghosts, name, outcome).applied);
    }
    for _ in names {
        assert!(session.undo_domain(DomainId::Ghosts).applied);
    }
    assert_eq!(session.ghosts(), before.as_slice());
    assert!(!session.undo_domain(DomainId::Ghosts).applied);
    // the cumulative domain keeps its own history
    assert_eq!(session.extended_stats().total_selections, 5);

    let saved: Vec<GhostRecord> =
        serde_json::from_str(&fs::read_to_string(dir.join("ghosts_data.json")).unwrap()).unwrap();
    assert!(saved.iter().all(|g| g.total_count() == 0));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn overlay_files_follow_checklist_changes() {
    let dir = temp_dir("overlay");
    let mut session = open(&dir);
    session.toggle_remaining("Банши");
    session.toggle_remaining("ЮРЭЙ");

    let grid = fs::read_to_string(dir.join("remaining_ghosts.txt")).unwrap();
    let rows: Vec<&str> = grid.split('\n').collect();
    assert_eq!(rows.len(), 9);
    // "Полтергейст" is the widest name: 11 chars plus two of padding
    assert!(rows.iter().all(|row| row.chars().count() == 3 * 13));
    assert!(rows[0].starts_with(&" ".repeat(13)));
    assert!(!grid.ends_with('\n'));

    let first_column = fs::read_to_string(dir.join("remaining_ghosts_1.txt")).unwrap();
    assert_eq!(first_column.split('\n').count(), 9);
    assert!(first_column.starts_with('\n'));
    let third_column = fs::read_to_string(dir.join("remaining_ghosts_3.txt")).unwrap();
    assert!(third_column.ends_with('\n'));

    let snapshot = fs::read(dir.join("remaining_ghosts.txt")).unwrap();
    session.undo_domain(DomainId::Remaining);
    session.toggle_remaining("ЮРЭЙ");
    assert_eq!(fs::read(dir.join("remaining_ghosts.txt")).unwrap(), snapshot);
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn leader_file_clears_after_reset() {
    let dir = temp_dir("leader");
    let mut session = open(&dir);
    session.select_outcome(DomainId::Ghosts, "РАЙДЗЮ", Outcome::Identified);
    assert_eq!(
        fs::read_to_string(dir.join("top_ghost.txt")).unwrap(),
        "РАЙДЗЮ (1)"
    );
    session.reset_domain(DomainId::Ghosts);
    assert_eq!(fs::read_to_string(dir.join("top_ghost.txt")).unwrap(), "");
    assert_eq!(fs::read_to_string(dir.join("identified.txt")).unwrap(), "0");
    assert_eq!(session.extended_stats().identified_total, 1);

    session.undo_domain(DomainId::Ghosts);
    assert_eq!(
        fs::read_to_string(dir.join("top_ghost.txt")).unwrap(),
        "РАЙДЗЮ (1)"
    );
    let _ = fs::remove_dir_all(dir);
}
