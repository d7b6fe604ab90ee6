#![allow(deprecated)]
use assert_cmd::Command;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

fn astromech(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("astromech").unwrap();
    cmd.current_dir(dir.path())
        .env("ASTROMECH_ROOT", dir.path())
        .env_remove("ASTROMECH_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn init_project(dir: &TempDir) {
    astromech(dir).arg("init").assert().success();
}

fn store_contents(dir: &TempDir) -> String {
    std::fs::read_to_string(dir.path().join(".astromech/storage/r2d2-routines.json")).unwrap()
}

fn list_json(dir: &TempDir) -> Vec<Value> {
    let out = astromech(dir)
        .args(["routine", "list", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    serde_json::from_slice::<Vec<Value>>(&out.stdout).unwrap()
}

const SERVOS: &str = r#"{
    "Periscope": {
        "name": "Periscope", "controller_id": "pca1", "channel": 3,
        "min_angle": 0, "max_angle": 90, "min_pulse": 150, "max_pulse": 600,
        "description": "Periscope lift"
    }
}"#;

const CONTROLLERS: &str =
    r#"{ "pca1": { "id": "pca1", "i2c_address": "0x40", "frequency": 50 } }"#;

fn audio_json(n: usize) -> String {
    let files: Vec<Value> = (1..=n)
        .map(|i| json!({ "name": format!("Sound{i:03}.mp3"), "path": format!("/audio/Sound{i:03}.mp3") }))
        .collect();
    Value::Array(files).to_string()
}

// ---------------------------------------------------------------------------
// astromech init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_config_and_seeds_routine() {
    let dir = TempDir::new().unwrap();
    astromech(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("routines: 1"));

    assert!(dir.path().join(".astromech/config.yaml").exists());
    assert!(store_contents(&dir).contains("Dome Panel Wave"));
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    astromech(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:"));
    assert_eq!(list_json(&dir).len(), 1);
}

#[test]
fn routine_commands_require_init() {
    let dir = TempDir::new().unwrap();
    astromech(&dir)
        .args(["routine", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

// ---------------------------------------------------------------------------
// astromech routine
// ---------------------------------------------------------------------------

#[test]
fn list_shows_seeded_routine() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    astromech(&dir)
        .args(["routine", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dome Panel Wave"))
        .stdout(predicate::str::contains("5"));

    let routines = list_json(&dir);
    assert_eq!(routines[0]["id"], "1");
    assert!(routines[0]["createdAt"].is_string());
}

#[test]
fn save_with_empty_name_changes_nothing() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let before = store_contents(&dir);

    astromech(&dir)
        .args(["routine", "save", "--name", "  ", r#"{"commands":[]}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a routine name"));

    assert_eq!(store_contents(&dir), before);
}

#[test]
fn save_rejects_bad_shape() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let before = store_contents(&dir);

    astromech(&dir)
        .args([
            "routine",
            "save",
            "--name",
            "Broken",
            r#"{"commands":[{"delay":500},{"servo":"Periscope"}]}"#,
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Invalid servo action at position 1: must include angle",
        ));

    assert_eq!(store_contents(&dir), before);
}

#[test]
fn save_stores_formatted_script() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    astromech(&dir)
        .args([
            "routine",
            "save",
            "--name",
            "Happy Beeps",
            r#"{"commands":[{"audio":"Happy014.mp3"}]}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved routine 'Happy Beeps'"));

    let routines = list_json(&dir);
    assert_eq!(routines.len(), 2);
    assert_eq!(routines[1]["name"], "Happy Beeps");
    assert_eq!(
        routines[1]["script"],
        "{\n  \"commands\": [\n    {\n      \"audio\": \"Happy014.mp3\"\n    }\n  ]\n}"
    );
}

#[test]
fn save_reads_script_from_stdin() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    astromech(&dir)
        .args(["routine", "save", "--name", "Piped"])
        .write_stdin(r#"{"commands":[{"delay":250}]}"#)
        .assert()
        .success();

    assert_eq!(list_json(&dir)[1]["name"], "Piped");
}

#[test]
fn save_reads_script_from_file() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let path = dir.path().join("wave.json");
    std::fs::write(&path, r#"{"commands":[{"servo":"Periscope","angle":45}]}"#).unwrap();

    astromech(&dir)
        .args(["routine", "save", "--name", "From File", "--file"])
        .arg(&path)
        .assert()
        .success();

    assert_eq!(list_json(&dir)[1]["name"], "From File");
}

#[test]
fn delete_unknown_id_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let before = store_contents(&dir);

    astromech(&dir)
        .args(["routine", "delete", "nope"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing deleted"));

    assert_eq!(store_contents(&dir), before);
}

#[test]
fn delete_removes_routine() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    astromech(&dir)
        .args(["routine", "delete", "1"])
        .assert()
        .success();

    assert!(list_json(&dir).is_empty());
    astromech(&dir)
        .args(["routine", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved routines."));
}

#[test]
fn copy_saves_suffixed_duplicate() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    astromech(&dir)
        .args(["routine", "copy", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dome Panel Wave (Copy)"));

    let routines = list_json(&dir);
    assert_eq!(routines.len(), 2);
    assert_eq!(routines[1]["script"], routines[0]["script"]);
    assert_ne!(routines[1]["id"], routines[0]["id"]);
}

#[test]
fn show_unknown_routine_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    astromech(&dir)
        .args(["routine", "show", "404"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("routine not found: 404"));
}

#[test]
fn corrupt_store_is_reported_and_listed_empty() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    std::fs::write(
        dir.path().join(".astromech/storage/r2d2-routines.json"),
        "{ not json",
    )
    .unwrap();

    astromech(&dir)
        .args(["routine", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved routines."))
        .stderr(predicate::str::contains("Failed to load saved routines"));
}

#[test]
fn run_posts_seeded_routine_once() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/routine")
        .match_body(Matcher::Json(json!({
            "commands": [
                { "servo": "Pie Panel 1", "angle": 0 },
                { "delay": 500 },
                { "servo": "Pie Panel 1", "angle": 90 },
                { "delay": 500 },
                { "servo": "Pie Panel 1", "angle": 0 }
            ]
        })))
        .with_status(200)
        .expect(1)
        .create();

    astromech(&dir)
        .args(["--url", server.url().as_str(), "routine", "run", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sent routine 'Dome Panel Wave' (5 commands)"));

    mock.assert();
}

#[test]
fn run_reports_backend_failure() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let mut server = Server::new();
    let _mock = server.mock("POST", "/routine").with_status(500).create();

    let out = astromech(&dir)
        .args(["--url", server.url().as_str(), "routine", "run", "1"])
        .output()
        .unwrap();
    assert!(!out.status.success());

    let stderr = String::from_utf8(out.stderr).unwrap();
    let error_line = stderr
        .lines()
        .find(|l| l.starts_with("error: "))
        .expect("error line on stderr");
    assert!(error_line.starts_with("error: Failed to execute routine: "));
    assert_eq!(error_line.matches("500 Internal Server Error").count(), 1);
}

// ---------------------------------------------------------------------------
// astromech script
// ---------------------------------------------------------------------------

#[test]
fn script_format_uses_two_space_indent() {
    let dir = TempDir::new().unwrap();
    astromech(&dir)
        .args(["script", "format", r#"{"commands":[{"delay":500}]}"#])
        .assert()
        .success()
        .stdout("{\n  \"commands\": [\n    {\n      \"delay\": 500\n    }\n  ]\n}\n");
}

#[test]
fn script_format_rejects_invalid_json() {
    let dir = TempDir::new().unwrap();
    astromech(&dir)
        .args(["script", "format", "{ invalid json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: Invalid JSON format"));
}

#[test]
fn script_validate_lists_actions() {
    let dir = TempDir::new().unwrap();
    astromech(&dir)
        .args([
            "script",
            "validate",
            r#"{"commands":[{"servo":"Periscope","angle":45,"audio":"Beep.mp3"},{}]}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Script is valid: 2 commands"))
        .stdout(predicate::str::contains("servo 'Periscope'"))
        .stdout(predicate::str::contains("audio 'Beep.mp3'"))
        .stdout(predicate::str::contains("(no action)"));
}

#[test]
fn script_validate_reports_missing_commands() {
    let dir = TempDir::new().unwrap();
    astromech(&dir)
        .args(["script", "validate", r#"{"steps":[]}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Script must contain a commands array",
        ));
}

#[test]
fn script_run_with_invalid_json_sends_nothing() {
    let dir = TempDir::new().unwrap();
    let mut server = Server::new();
    let mock = server.mock("POST", "/routine").expect(0).create();

    astromech(&dir)
        .args(["--url", server.url().as_str(), "script", "run", "{ invalid json"])
        .assert()
        .failure();

    mock.assert();
}

#[test]
fn script_run_posts_document() {
    let dir = TempDir::new().unwrap();
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/routine")
        .match_body(Matcher::Json(json!({ "commands": [{ "audio": "Beep.mp3" }] })))
        .with_status(200)
        .expect(1)
        .create();

    astromech(&dir)
        .args(["--url", server.url().as_str(), "script", "run"])
        .write_stdin(r#"{"commands":[{"audio":"Beep.mp3"}]}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 commands"));

    mock.assert();
}

// ---------------------------------------------------------------------------
// astromech status / servo / audio
// ---------------------------------------------------------------------------

#[test]
fn status_survives_failed_servo_fetch() {
    let dir = TempDir::new().unwrap();
    let mut server = Server::new();
    let _servos = server.mock("GET", "/servos").with_status(500).create();
    let _controllers = server
        .mock("GET", "/controllers")
        .with_status(200)
        .with_body(CONTROLLERS)
        .create();
    let _audio = server
        .mock("GET", "/audio")
        .with_status(200)
        .with_body(audio_json(2))
        .create();

    astromech(&dir)
        .args(["--url", server.url().as_str(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OFFLINE"))
        .stdout(predicate::str::contains("0x40"))
        .stderr(predicate::str::contains(
            "Warning: Servo data incomplete - Check R2 unit connection",
        ));
}

#[test]
fn rust_log_level_enables_debug_output() {
    let dir = TempDir::new().unwrap();
    let mut server = Server::new();
    let _servos = server
        .mock("GET", "/servos")
        .with_status(200)
        .with_body(SERVOS)
        .create();

    astromech(&dir)
        .args(["--url", server.url().as_str(), "servo", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG").not());

    astromech(&dir)
        .env("RUST_LOG", "debug")
        .args(["--url", server.url().as_str(), "servo", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Periscope"))
        .stderr(predicate::str::contains("DEBUG"))
        .stderr(predicate::str::contains("GET"));
}

#[test]
fn servo_move_out_of_range_sends_nothing() {
    let dir = TempDir::new().unwrap();
    let mut server = Server::new();
    let _servos = server
        .mock("GET", "/servos")
        .with_status(200)
        .with_body(SERVOS)
        .create();
    let mv = server
        .mock("POST", "/servos/Periscope/move")
        .expect(0)
        .create();

    astromech(&dir)
        .args(["--url", server.url().as_str(), "servo", "move", "Periscope", "120"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside 0..90"));

    mv.assert();
}

#[test]
fn servo_move_posts_angle() {
    let dir = TempDir::new().unwrap();
    let mut server = Server::new();
    let _servos = server
        .mock("GET", "/servos")
        .with_status(200)
        .with_body(SERVOS)
        .create();
    let mv = server
        .mock("POST", "/servos/Periscope/move")
        .match_body(Matcher::Json(json!({ "angle": 45.0 })))
        .with_status(200)
        .expect(1)
        .create();

    astromech(&dir)
        .args(["--url", server.url().as_str(), "servo", "move", "Periscope", "45"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved Periscope to 45°"));

    mv.assert();
}

#[test]
fn audio_list_clamps_to_last_page() {
    let dir = TempDir::new().unwrap();
    let mut server = Server::new();
    let _audio = server
        .mock("GET", "/audio")
        .with_status(200)
        .with_body(audio_json(12))
        .create();

    astromech(&dir)
        .args(["--url", server.url().as_str(), "audio", "list", "--page", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sound012.mp3"))
        .stdout(predicate::str::contains("Showing 11 to 12 of 12 files"))
        .stdout(predicate::str::contains("Page 2 of 2"));
}

#[test]
fn audio_list_fails_when_library_unavailable() {
    let dir = TempDir::new().unwrap();
    let mut server = Server::new();
    let _audio = server.mock("GET", "/audio").with_status(503).create();

    astromech(&dir)
        .args(["--url", server.url().as_str(), "audio", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Audio data incomplete"));
}

#[test]
fn audio_play_posts_filename() {
    let dir = TempDir::new().unwrap();
    let mut server = Server::new();
    let play = server
        .mock("POST", "/audio/play")
        .match_body(Matcher::Json(json!({ "filename": "Happy014.mp3" })))
        .with_status(200)
        .expect(1)
        .create();

    astromech(&dir)
        .args(["--url", server.url().as_str(), "audio", "play", "Happy014.mp3"])
        .assert()
        .success();

    play.assert();
}

// ---------------------------------------------------------------------------
// astromech config
// ---------------------------------------------------------------------------

#[test]
fn config_validate_accepts_defaults() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    astromech(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}

#[test]
fn config_validate_rejects_non_http_url() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    astromech(&dir)
        .args(["--url", "ftp://droid.local", "config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("must start with http:// or https://"));
}

#[test]
fn config_show_reflects_url_override() {
    let dir = TempDir::new().unwrap();
    let out = astromech(&dir)
        .args(["--url", "http://droid.local:3030/api", "config", "show", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let cfg: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(cfg["backend"]["base_url"], "http://droid.local:3030/api");
    assert_eq!(cfg["dashboard"]["items_per_page"], 10);
}
