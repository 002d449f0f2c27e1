//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quizlevel() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizlevel").unwrap();
    cmd.env_remove("QUIZLEVEL_WINDOW_SIZE")
        .env_remove("QUIZLEVEL_PASS_THRESHOLD");
    cmd
}

const LEVELS_TOML: &str = r#"
[assessment]
window_size = 3
pass_threshold = 2

[[levels]]
level = 1
from = 1
to = 5

[[levels]]
level = 2
from = 6
to = 10

[[levels]]
level = 3
from = 11
to = 15
"#;

fn row(user: &str, question: u32, user_choice: &str, correct: &str, minute: u32) -> String {
    format!(
        r#"{{"username": "{user}", "question_number": {question}, "user_choice": "{user_choice}", "correct_choice": "{correct}", "attempted_at": "2023-01-01T10:{minute:02}:00"}}"#
    )
}

fn write_fixture(dir: &TempDir, rows: &[String]) {
    std::fs::write(dir.path().join("levels.toml"), LEVELS_TOML).unwrap();
    std::fs::write(
        dir.path().join("history.json"),
        format!("[{}]", rows.join(",\n")),
    )
    .unwrap();
}

fn assess(dir: &TempDir, user: &str) -> Command {
    let mut cmd = quizlevel();
    cmd.current_dir(dir.path())
        .arg("assess")
        .arg("--history")
        .arg("history.json")
        .arg("--config")
        .arg("levels.toml")
        .arg("--user")
        .arg(user);
    cmd
}

#[test]
fn assess_passes_first_level() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        &dir,
        &[
            row("ada", 6, "D", "D", 2),
            row("ada", 1, "C", "C", 3),
            row("ada", 2, "B", "B", 4),
            row("ada", 3, "A", "A", 5),
        ],
    );

    assess(&dir, "ada")
        .assert()
        .success()
        .stdout(predicate::str::contains("ada is at level 2 of 3"))
        .stdout(predicate::str::contains("passed"))
        .stdout(predicate::str::contains("not enough answers"));
}

#[test]
fn assess_threshold_is_strict() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        &dir,
        &[
            row("ada", 1, "C", "C", 0),
            row("ada", 2, "B", "B", 1),
            row("ada", 3, "A", "X", 2),
        ],
    );

    assess(&dir, "ada")
        .assert()
        .success()
        .stdout(predicate::str::contains("ada is at level 1 of 3"))
        .stdout(predicate::str::contains("failed"));
}

#[test]
fn assess_unknown_user_is_level_one() {
    let dir = TempDir::new().unwrap();
    write_fixture(&dir, &[row("ada", 1, "A", "A", 0)]);

    assess(&dir, "nobody")
        .assert()
        .success()
        .stdout(predicate::str::contains("nobody is at level 1 of 3"));
}

#[test]
fn assess_json_output() {
    let dir = TempDir::new().unwrap();
    let rows: Vec<String> = (1..=15u32)
        .map(|q| row("grace", q, "A", "A", q))
        .collect();
    write_fixture(&dir, &rows);

    let output = assess(&dir, "grace")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["level"], 3);
    assert_eq!(json["max_level"], 3);
    assert_eq!(json["outcomes"].as_array().unwrap().len(), 3);
}

#[test]
fn assess_env_override_changes_threshold() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        &dir,
        &[
            row("ada", 1, "A", "A", 0),
            row("ada", 2, "A", "A", 1),
            row("ada", 3, "A", "A", 2),
        ],
    );

    assess(&dir, "ada")
        .env("QUIZLEVEL_PASS_THRESHOLD", "3")
        .assert()
        .success()
        .stdout(predicate::str::contains("ada is at level 1 of 3"));
}

#[test]
fn assess_skips_unreadable_rows() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        &dir,
        &[
            row("ada", 1, "A", "A", 0),
            row("ada", 2, "A", "A", 1),
            row("ada", 3, "A", "A", 2),
            r#"{"username": "ada", "question_number": -4, "user_choice": "A", "correct_choice": "B", "attempted_at": "2023-01-01T10:03:00"}"#.to_string(),
            r#"{"username": "ada", "question_number": "1", "user_choice": "A", "correct_choice": "B", "attempted_at": "2023-01-01T10:04:00"}"#.to_string(),
            r#"{"username": "ada", "question_number": 1, "user_choice": "A", "correct_choice": "B", "attempted_at": "not a time"}"#.to_string(),
        ],
    );

    assess(&dir, "ada")
        .assert()
        .success()
        .stdout(predicate::str::contains("ada is at level 2 of 3"));
}

#[test]
fn assess_missing_history_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("levels.toml"), LEVELS_TOML).unwrap();

    assess(&dir, "ada")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("history.json"));
}

#[test]
fn assess_rejects_negative_window() {
    let dir = TempDir::new().unwrap();
    write_fixture(&dir, &[row("ada", 1, "A", "A", 0)]);
    std::fs::write(
        dir.path().join("levels.toml"),
        "[assessment]\nwindow_size = -3\n",
    )
    .unwrap();

    assess(&dir, "ada")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not be negative"));
}

#[test]
fn validate_reports_levels() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("levels.toml"), LEVELS_TOML).unwrap();

    quizlevel()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--config")
        .arg("levels.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("Levels: 3"))
        .stdout(predicate::str::contains("Level 2: 5 question(s)"))
        .stdout(predicate::str::contains("Level configuration valid"));
}

#[test]
fn validate_warns_on_unpassable_threshold() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("levels.toml"),
        "[assessment]\nwindow_size = 3\npass_threshold = 3\n",
    )
    .unwrap();

    quizlevel()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--config")
        .arg("levels.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING"))
        .stdout(predicate::str::contains("no level can ever be passed"));
}

#[test]
fn validate_rejects_overlapping_bands() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("levels.toml"),
        "[[levels]]\nlevel = 1\nfrom = 1\nto = 5\n\n[[levels]]\nlevel = 2\nfrom = 5\nto = 9\n",
    )
    .unwrap();

    quizlevel()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--config")
        .arg("levels.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("question 5 appears in both level 1 and level 2"));
}

#[test]
fn validate_nonexistent_config() {
    quizlevel()
        .arg("validate")
        .arg("--config")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizlevel()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizlevel.toml"))
        .stdout(predicate::str::contains("Created history.json"));

    assert!(dir.path().join("quizlevel.toml").exists());
    assert!(dir.path().join("history.json").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    quizlevel()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    quizlevel()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn init_then_assess_demo() {
    let dir = TempDir::new().unwrap();

    quizlevel()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    // quizlevel.toml in the working directory is picked up without --config.
    quizlevel()
        .current_dir(dir.path())
        .arg("assess")
        .arg("--history")
        .arg("history.json")
        .arg("--user")
        .arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("demo is at level 2 of 5"));
}
