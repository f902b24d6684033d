//! Integration tests for the `dualled` binary.
//!
//! Hardware-facing commands run against a fake sysfs tree in a temp dir,
//! wired up through `--config`.

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn cli() -> assert_cmd::Command {
    cargo_bin_cmd!("dualled")
}

const CONTROL_FILES: [&str; 5] = ["backlight", "red", "green", "red_blink", "green_blink"];

/// Create empty control files plus a config pointing at them.
fn fake_sysfs(dir: &Path, max_brightness: Option<&str>) -> PathBuf {
    for name in CONTROL_FILES {
        std::fs::write(dir.join(name), "").unwrap();
    }
    if let Some(max) = max_brightness {
        std::fs::write(dir.join("max_brightness"), max).unwrap();
    }
    let p = |n: &str| dir.join(n).display().to_string();
    let config = format!(
        "backlight_path = {:?}\nbacklight_max_path = {:?}\nred_path = {:?}\ngreen_path = {:?}\nred_blink_path = {:?}\ngreen_blink_path = {:?}\n",
        p("backlight"),
        p("max_brightness"),
        p("red"),
        p("green"),
        p("red_blink"),
        p("green_blink"),
    );
    let config_path = dir.join("config.toml");
    std::fs::write(&config_path, config).unwrap();
    config_path
}

fn last_value(path: &Path) -> Option<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .last()
        .map(str::to_string)
}

fn stdout_json(cmd: &mut assert_cmd::Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("command should produce valid JSON")
}

// ── Basics ──

#[test]
fn cli_help_succeeds() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dualled"));
}

#[test]
fn cli_version_prints_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_verbose_flag_accepted() {
    cli().args(["-v", "lights"]).assert().success();
    cli().args(["--verbose", "lights"]).assert().success();
}

// ── lights ──

#[test]
fn cli_lights_lists_four() {
    cli()
        .arg("lights")
        .assert()
        .success()
        .stdout(predicate::str::contains("notifications"))
        .stdout(predicate::str::contains("backlight"));
}

#[test]
fn cli_lights_json() {
    let json = stdout_json(cli().args(["--json", "lights"]));
    assert_eq!(json["count"], 4);
    let lights = json["lights"].as_array().unwrap();
    assert!(lights.iter().any(|l| l["id"] == 4 && l["type"] == "notifications"));
    assert!(lights.iter().all(|l| l["ordinal"] == 0));
}

// ── encode ──

#[test]
fn cli_encode_blink_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = fake_sysfs(dir.path(), None);
    let json = stdout_json(cli().args([
        "--json",
        "--config",
        config.to_str().unwrap(),
        "encode",
        "#00FF00",
        "--on-ms",
        "500",
        "--off-ms",
        "500",
    ]));
    assert_eq!(json["lit"], true);
    assert_eq!(json["blink"]["duty"], 127);
    assert_eq!(json["blink"]["off"], 500_000);
}

#[test]
fn cli_encode_scaled_backlight() {
    let dir = tempfile::tempdir().unwrap();
    let config = fake_sysfs(dir.path(), None);
    let json = stdout_json(cli().args([
        "--json",
        "--config",
        config.to_str().unwrap(),
        "encode",
        "#808080",
        "--max-brightness",
        "128",
    ]));
    assert_eq!(json["brightness"], 128);
    assert_eq!(json["backlight_level"], 64);
}

#[test]
fn cli_encode_on_ms_requires_off_ms() {
    cli()
        .args(["encode", "red", "--on-ms", "500"])
        .assert()
        .failure();
}

#[test]
fn cli_encode_invalid_color_fails() {
    cli()
        .args(["encode", "chartreuse"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Color error"));
}

// ── set ──

#[test]
fn cli_set_solid_red_notification() {
    let dir = tempfile::tempdir().unwrap();
    let config = fake_sysfs(dir.path(), None);

    cli()
        .args(["--config", config.to_str().unwrap()])
        .args(["set", "notifications", "#FF0000"])
        .assert()
        .success();

    assert_eq!(last_value(&dir.path().join("red")).as_deref(), Some("255"));
    assert_eq!(last_value(&dir.path().join("green")).as_deref(), Some("0"));
    assert_eq!(last_value(&dir.path().join("red_blink")).as_deref(), Some("0"));
}

#[test]
fn cli_set_backlight_scaled() {
    let dir = tempfile::tempdir().unwrap();
    let config = fake_sysfs(dir.path(), Some("128\n"));

    cli()
        .args(["--config", config.to_str().unwrap()])
        .args(["set", "backlight", "#808080"])
        .assert()
        .success();

    assert_eq!(
        last_value(&dir.path().join("backlight")).as_deref(),
        Some("64")
    );
}

#[test]
fn cli_set_unknown_light_id_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = fake_sysfs(dir.path(), None);

    cli()
        .args(["--config", config.to_str().unwrap()])
        .args(["set", "99", "red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported light id: 99"));

    assert_eq!(last_value(&dir.path().join("red")), None);
}

#[test]
fn cli_set_missing_control_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = fake_sysfs(dir.path(), None);
    std::fs::remove_file(dir.path().join("green_blink")).unwrap();

    cli()
        .args(["--config", config.to_str().unwrap()])
        .args(["set", "battery", "green"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("green blink"));
}

// ── replay ──

#[test]
fn cli_replay_applies_priority() {
    let dir = tempfile::tempdir().unwrap();
    let config = fake_sysfs(dir.path(), None);
    let requests = dir.path().join("requests.txt");
    std::fs::write(
        &requests,
        "# battery charging, then a notification arrives and is dismissed\n\
         battery green 500 500\n\
         notifications red\n\
         notifications off\n",
    )
    .unwrap();

    let json = stdout_json(
        cli()
            .args(["--json", "--config", config.to_str().unwrap()])
            .args(["replay", requests.to_str().unwrap()]),
    );
    assert_eq!(json["applied"], 3);
    assert_eq!(json["state"]["active"], "battery");

    assert_eq!(last_value(&dir.path().join("green")).as_deref(), Some("127"));
    assert_eq!(
        last_value(&dir.path().join("green_blink")).as_deref(),
        Some("500000")
    );
}

#[test]
fn cli_replay_reads_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let config = fake_sysfs(dir.path(), None);

    cli()
        .args(["--config", config.to_str().unwrap(), "replay"])
        .write_stdin("attention yellow\nbacklight white\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("attention"));

    assert_eq!(
        last_value(&dir.path().join("backlight")).as_deref(),
        Some("255")
    );
}

#[test]
fn cli_replay_malformed_line_applies_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = fake_sysfs(dir.path(), None);

    cli()
        .args(["--config", config.to_str().unwrap(), "replay"])
        .write_stdin("battery green\nbattery green 500\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));

    assert_eq!(last_value(&dir.path().join("green")), None);
}

// ── config ──

#[test]
fn cli_config_json_produces_valid_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = fake_sysfs(dir.path(), None);
    let json = stdout_json(cli().args(["--json", "--config", config.to_str().unwrap(), "config"]));
    assert!(json["settings"].is_object());
    assert_eq!(json["config_file_exists"], true);
    assert!(json["problems"].as_array().unwrap().is_empty());
    assert!(
        json["settings"]["red_path"]
            .as_str()
            .unwrap()
            .ends_with("red")
    );
}

#[test]
fn cli_config_reports_problems() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "red_path = \"/tmp/same\"\ngreen_path = \"/tmp/same\"\n").unwrap();

    cli()
        .args(["--config", config.to_str().unwrap(), "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("red_path and green_path point at the same file"));
}

#[test]
fn cli_set_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "red_path = \"\"\n").unwrap();

    cli()
        .args(["--config", config.to_str().unwrap()])
        .args(["set", "battery", "green"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("red_path cannot be empty"));
}

#[test]
fn cli_config_init_writes_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("nested").join("config.toml");

    cli()
        .args(["--config", config.to_str().unwrap(), "config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));

    let contents = std::fs::read_to_string(&config).unwrap();
    assert!(contents.starts_with("# dualled configuration"));
    assert!(contents.contains("/sys/class/leds/red/brightness"));
    assert!(!config.with_extension("toml.tmp").exists());

    let json = stdout_json(cli().args(["--json", "--config", config.to_str().unwrap(), "config"]));
    assert_eq!(json["config_file_exists"], true);
    assert_eq!(json["settings"]["solid_blink_value"], 0);
}

#[test]
fn cli_config_init_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let config = fake_sysfs(dir.path(), None);
    let before = std::fs::read_to_string(&config).unwrap();

    cli()
        .args(["--config", config.to_str().unwrap(), "config", "--init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(std::fs::read_to_string(&config).unwrap(), before);

    cli()
        .args(["--config", config.to_str().unwrap(), "config", "--init", "--force"])
        .assert()
        .success();
    assert!(
        std::fs::read_to_string(&config)
            .unwrap()
            .contains("/sys/class/leds/green/blink")
    );
}

#[test]
fn cli_config_force_requires_init() {
    cli().args(["config", "--force"]).assert().failure();
}
