//! CLI integration tests: exit codes, stdout content, and round-trip
//! output of the `pcbdoc` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const BOARD: &str = r#"(kicad_pcb
  (version 20241229)
  (generator "pcbnew")
  (general
    (thickness 1.6)
  )
  (paper "A4")
  (layers
    (0 "F.Cu" signal)
    (31 "B.Cu" signal)
  )
  (net 0 "")
  (net 1 "GND")
  (segment
    (start 10 20)
    (end 30 40)
    (width 0.25)
    (layer "F.Cu")
    (net 1)
    (uuid "cafe0001-0000-4000-8000-000000000001")
  )
)
"#;

fn pcbdoc() -> Command {
    Command::cargo_bin("pcbdoc").expect("binary builds")
}

fn write_board(dir: &TempDir, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn check_reports_clean_board() {
    let dir = TempDir::new().unwrap();
    let path = write_board(&dir, "board.kicad_pcb", BOARD);
    pcbdoc()
        .args(["check"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("no diagnostics"));
}

#[test]
fn check_reports_dangling_net_as_warning() {
    let dir = TempDir::new().unwrap();
    let text = BOARD.replace("(net 1)", "(net 9)");
    let path = write_board(&dir, "board.kicad_pcb", &text);
    pcbdoc()
        .args(["check"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("undeclared net 9"));
}

#[test]
fn check_json_output_is_parseable() {
    let dir = TempDir::new().unwrap();
    let text = BOARD.replace("(net 1)", "(net 9)");
    let path = write_board(&dir, "board.kicad_pcb", &text);
    let output = pcbdoc()
        .args(["--output", "json", "check"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed[0]["kind"], "dangling_net");
}

#[test]
fn check_fails_on_malformed_input() {
    let dir = TempDir::new().unwrap();
    let path = write_board(&dir, "board.kicad_pcb", "(kicad_pcb (net 0 \"\")");
    pcbdoc()
        .args(["check"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("syntax error"));
}

#[test]
fn check_rejects_wrong_extension() {
    let dir = TempDir::new().unwrap();
    let path = write_board(&dir, "board.txt", BOARD);
    pcbdoc()
        .args(["check"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains(".kicad_pcb"));
}

#[test]
fn fmt_is_a_byte_exact_noop() {
    let dir = TempDir::new().unwrap();
    let path = write_board(&dir, "board.kicad_pcb", BOARD);
    pcbdoc()
        .args(["fmt"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::eq(BOARD));
}

#[test]
fn fmt_writes_to_output_path() {
    let dir = TempDir::new().unwrap();
    let path = write_board(&dir, "board.kicad_pcb", BOARD);
    let out = dir.path().join("out.kicad_pcb");
    pcbdoc()
        .args(["fmt"])
        .arg(&path)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&out).unwrap(), BOARD);
}

#[test]
fn stats_counts_entities() {
    let dir = TempDir::new().unwrap();
    let path = write_board(&dir, "board.kicad_pcb", BOARD);
    pcbdoc()
        .args(["stats"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("tracks:     1"))
        .stdout(predicate::str::contains("nets:       2"));
}

#[test]
fn stats_json_has_track_length() {
    let dir = TempDir::new().unwrap();
    let path = write_board(&dir, "board.kicad_pcb", BOARD);
    let output = pcbdoc()
        .args(["--output", "json", "stats"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["tracks"], 1);
    let length = parsed["total_track_length_mm"].as_f64().unwrap();
    assert!((length - 800f64.sqrt()).abs() < 1e-9);
}
