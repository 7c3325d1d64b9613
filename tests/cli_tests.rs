use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn clipflow() -> Command {
    let mut cmd = Command::cargo_bin("clipflow").unwrap();
    cmd.env_remove("CLIPFLOW_CONFIG")
        .env_remove("CLIPFLOW_SERVICE_URL")
        .env_remove("CLIPFLOW_LOG_LEVEL")
        .env_remove("CLIPFLOW_LOG_FORMAT")
        .env_remove("CLIPFLOW_METADATA_POLICY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_timecode_command() {
    clipflow()
        .args(["timecode", "65.7", "125.4", "0", "--", "-3"])
        .assert()
        .success()
        .stdout("1:05\n2:05\n0:00\n0:00\n");
}

#[test]
fn test_run_requires_a_source() {
    clipflow()
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--file"));
}

#[test]
fn test_run_rejects_both_sources() {
    clipflow()
        .args(["run", "--file", "a.mp4", "--url", "https://cdn.example/a.mp4"])
        .assert()
        .failure();
}

#[test]
fn test_run_missing_local_file() {
    clipflow()
        .args(["run", "--file", "/no/such/holiday.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file does not exist"));
}

#[test]
fn test_config_prints_effective_settings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("clipflow.toml");
    std::fs::write(&path, "[metadata]\npolicy = \"fallback\"\n").unwrap();

    clipflow()
        .arg("--config")
        .arg(&path)
        .args(["--service-url", "https://media.example", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[service]"))
        .stdout(predicate::str::contains("base_url = \"https://media.example\""))
        .stdout(predicate::str::contains("policy = \"fallback\""));
}

#[test]
fn test_invalid_log_level_is_rejected() {
    clipflow()
        .args(["--log-level", "loud", "config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid log level"));
}
