use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tasklane-{nanos}-{file_name}"))
}

fn run_with_config(config: &str, args: &[&str], input: &str) -> std::process::Output {
    let exe = env!("CARGO_BIN_EXE_tasklane");
    let config_path = temp_path("config.json");
    std::fs::write(&config_path, config).unwrap();

    let mut child = Command::new(exe)
        .args(args)
        .env("TASKLANE_CONFIG_PATH", &config_path)
        .env("TASKLANE_DISABLE_NOTIFICATIONS", "1")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn session");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        stdin.write_all(input.as_bytes()).expect("failed to write to stdin");
    }

    let output = child.wait_with_output().expect("failed to read output");
    std::fs::remove_file(&config_path).ok();
    output
}

#[test]
fn progress_lists_caps_board_summary() {
    let output = run_with_config(
        r#"{ "progress_lists": 1 }"#,
        &[],
        "list Work --color \"#4db8ff\"\n",
    );
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("Default ["));
    assert!(!stdout.contains("Work ["));
}

#[test]
fn override_wins_over_file() {
    let output = run_with_config(
        r#"{ "progress_lists": 1 }"#,
        &["--config-override", "progress_lists=2"],
        "list Work --color \"#4db8ff\"\n",
    );
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("Work ["));
}

#[test]
fn broken_config_falls_back_to_defaults() {
    let output = run_with_config("{ not json", &[], "");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success());
    assert!(stdout.contains("Default [----------] 0% (0/0)"));
    assert!(stderr.contains("config could not be loaded"));
}
