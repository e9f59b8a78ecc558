use std::process::Command;

#[test]
fn missing_input_prints_message_and_exits_normally() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_plot"))
        .current_dir(dir.path())
        .arg("--no-save")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("file 'time_sorts.txt' not found"), "{}", stdout);
    assert!(!dir.path().join("time_graphics.png").exists());
}

#[test]
fn malformed_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("time_sorts.txt"), "100 1 2\n").unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_plot"))
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("line 1"));
}
