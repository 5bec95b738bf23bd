use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "montyhall-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_writes_json_report() {
    let exe = env!("CARGO_BIN_EXE_montyhall");
    let output_path = temp_path("json");
    let status = Command::new(exe)
        .args(["--trials", "5000", "--threads", "1", "--report", "json", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let value: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert_eq!(value["total_games_played"], 5000);
    assert_eq!(value["total_threads_used"], 1);
    let wins = value["total_wins_with_stay"].as_u64().unwrap()
        + value["total_wins_with_switch"].as_u64().unwrap();
    assert_eq!(wins, 5000);
}

#[test]
fn cli_console_report_with_progress() {
    let exe = env!("CARGO_BIN_EXE_montyhall");
    let config_path = temp_path("config");
    std::fs::write(&config_path, r#"{"max_trials_per_loop": 400}"#).expect("write config");
    let output = Command::new(exe)
        .args(["--trials", "1000", "--progress", "--config"])
        .arg(&config_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("Monty Hall Simulator"));
    assert!(stdout.contains("Simulation Results"));
    assert!(stdout.contains("1,000"));
    assert_eq!(stderr.matches("chunk complete:").count(), 3);
}

#[test]
fn cli_negative_counts_use_defaults() {
    let exe = env!("CARGO_BIN_EXE_montyhall");
    let config_path = temp_path("defaults");
    std::fs::write(&config_path, r#"{"default_trial_count": 321}"#).expect("write config");
    let output = Command::new(exe)
        .args(["--trials", "-4", "--threads", "-2", "--report", "json", "--config"])
        .arg(&config_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("json on stdout");
    assert_eq!(value["total_games_played"], 321);
    assert_eq!(value["total_threads_used"], 1);
}

#[test]
fn cli_rejects_invalid_config() {
    let exe = env!("CARGO_BIN_EXE_montyhall");
    let config_path = temp_path("invalid");
    std::fs::write(&config_path, r#"{"max_trials_per_loop": 0}"#).expect("write config");
    let output = Command::new(exe)
        .args(["--config"])
        .arg(&config_path)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid config"));
}
