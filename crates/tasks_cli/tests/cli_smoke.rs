use std::process::Command;

#[test]
fn cli_smoke_help() {
    let exe = env!("CARGO_BIN_EXE_tasks");
    let output = Command::new(exe)
        .arg("--help")
        .output()
        .expect("failed to run tasks --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("delete-completed"));
}

#[test]
fn unknown_command_is_invalid_input() {
    let exe = env!("CARGO_BIN_EXE_tasks");
    let output = Command::new(exe)
        .arg("frobnicate")
        .output()
        .expect("failed to run tasks");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}
