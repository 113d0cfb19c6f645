use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "delta-fortune-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_operators_writes_output() {
    let exe = env!("CARGO_BIN_EXE_delta-fortune");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-operators", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available operators"));
    assert!(content.contains("蜂医"));
}

#[test]
fn cli_writes_json_report() {
    let exe = env!("CARGO_BIN_EXE_delta-fortune");
    let output_path = temp_path("json");
    let output = Command::new(exe)
        .args([
            "--operator",
            "威龙",
            "--category",
            "skin_fortune",
            "--date",
            "2024-01-01 12:00",
            "--report",
            "json",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let value: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert_eq!(value["category"], "skin_fortune");
    assert_eq!(value["operator"]["element"], "火");
    assert_eq!(
        value["analysis"]["skin_fortune"]["character"]["ladder"]
            .as_array()
            .map(Vec::len),
        Some(8)
    );
}

#[test]
fn cli_unknown_category_still_reports() {
    let exe = env!("CARGO_BIN_EXE_delta-fortune");
    let output = Command::new(exe)
        .args([
            "--operator",
            "露娜",
            "--category",
            "tarot",
            "--date",
            "2024-10-16",
            "--report",
            "markdown",
        ])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("`comprehensive`"));
    assert!(stdout.contains("## 推荐容器"));
}

#[test]
fn cli_fails_for_unknown_operator() {
    let exe = env!("CARGO_BIN_EXE_delta-fortune");
    let output = Command::new(exe)
        .args(["--operator", "幽灵", "--date", "2024-01-01"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("幽灵"));
}

#[test]
fn cli_fails_for_missing_data_dir() {
    let exe = env!("CARGO_BIN_EXE_delta-fortune");
    let output = Command::new(exe)
        .args(["--operator", "威龙", "--data-dir"])
        .arg(temp_path("nowhere"))
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("operators"));
}
