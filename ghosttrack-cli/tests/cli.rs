use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "ghosttrack-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn write_script(label: &str, body: &str) -> std::path::PathBuf {
    let path = temp_path(label).with_extension("txt");
    std::fs::write(&path, body).expect("write script");
    path
}

#[test]
fn cli_script_persists_and_exports() {
    let exe = env!("CARGO_BIN_EXE_ghosttrack");
    let data_dir = temp_path("data");
    let script = write_script(
        "session",
        "# opening round\nidentify ДЕМОН\nidentify демон\nreject ТЕНЬ\ntoggle Банши\nparty add Bob 2\nparty inc 1\n",
    );
    let output = Command::new(exe)
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--script")
        .arg(&script)
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let identified = std::fs::read_to_string(data_dir.join("identified.txt")).expect("identified");
    assert_eq!(identified, "2");
    let rejected = std::fs::read_to_string(data_dir.join("rejected.txt")).expect("rejected");
    assert_eq!(rejected, "1");
    let leader = std::fs::read_to_string(data_dir.join("top_ghost.txt")).expect("leader");
    assert_eq!(leader, "ДЕМОН (2)");

    let grid = std::fs::read_to_string(data_dir.join("remaining_ghosts.txt")).expect("grid");
    assert!(!grid.contains("Банши"));
    assert!(grid.contains("Дайан"));

    let party = std::fs::read_to_string(data_dir.join("party_entries.json")).expect("party");
    assert!(party.contains("\"Count\": 3"));
    assert!(data_dir.join("ghosts_data.json").exists());
    assert!(data_dir.join("extended_ghosts_data.json").exists());
}

#[test]
fn cli_resumes_state_across_runs() {
    let exe = env!("CARGO_BIN_EXE_ghosttrack");
    let data_dir = temp_path("resume");
    let first = write_script("resume-1", "reject ОНИ\nreject ОНИ\n");
    let status = Command::new(exe)
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--script")
        .arg(&first)
        .arg("--no-export")
        .status()
        .expect("run cli");
    assert!(status.success());
    assert!(!data_dir.join("rejected.txt").exists());

    let second = write_script("resume-2", "ext-stats\n");
    let output_path = temp_path("resume-report");
    let status = Command::new(exe)
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--script")
        .arg(&second)
        .args(["--no-export", "--report", "json", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let value: serde_json::Value = serde_json::from_str(content.trim()).expect("json line");
    assert_eq!(value["stats"]["rejected_total"], 2);
    assert_eq!(value["stats"]["leader"]["name"], "ОНИ");
}

#[test]
fn cli_warns_on_unknown_commands_and_continues() {
    let exe = env!("CARGO_BIN_EXE_ghosttrack");
    let data_dir = temp_path("unknown");
    let script = write_script(
        "unknown",
        "dance wildly\nidentify МИМИК\nquit\nidentify ДУХ\n",
    );
    let output = Command::new(exe)
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--script")
        .arg(&script)
        .args(["--no-export", "--report", "json"])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("unknown command"));
    assert!(lines[1].contains("\"applied\":true"));
}

#[test]
fn cli_rejects_missing_script() {
    let exe = env!("CARGO_BIN_EXE_ghosttrack");
    let output = Command::new(exe)
        .arg("--data-dir")
        .arg(temp_path("missing"))
        .args(["--script", "/definitely/not/a/script.txt"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to open script"));
}
