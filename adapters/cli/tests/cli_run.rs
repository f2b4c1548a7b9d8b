use std::{fs, process::Command};

fn shifting_maze(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_shifting-maze"))
        .args(args)
        .output()
        .expect("failed to invoke shifting-maze binary")
}

#[test]
fn demo_run_prints_an_ascii_frame() {
    let output = shifting_maze(&["--rows", "7", "--cols", "11", "--seed", "3"]);

    assert!(output.status.success(), "demo run should succeed");
    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 7, "one line per grid row");
    assert!(lines.iter().all(|line| line.len() == 11), "one glyph per column");
}

#[test]
fn scripted_clearing_opens_its_region() {
    let dir = std::env::temp_dir().join(format!("shifting-maze-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");
    let script = dir.join("clearing.toml");
    fs::write(
        &script,
        r#"
version = 1

[[actions]]
kind = "clearing"
rows = [0, 4]
cols = [0, 4]
at = 0.0
duration = 0.5
"#,
    )
    .expect("script written");

    let output = shifting_maze(&[
        "--rows",
        "5",
        "--cols",
        "5",
        "--seed",
        "1",
        "--script",
        script.to_str().expect("utf-8 path"),
        "--until",
        "1.0",
    ]);
    fs::remove_dir_all(&dir).expect("temp dir removed");

    assert!(output.status.success(), "scripted run should succeed");
    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    assert_eq!(stdout, ".....\n".repeat(5));
}

#[test]
fn unsupported_script_versions_fail() {
    let dir = std::env::temp_dir().join(format!("shifting-maze-v9-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");
    let script = dir.join("future.toml");
    fs::write(&script, "version = 9\n").expect("script written");

    let output = shifting_maze(&["--script", script.to_str().expect("utf-8 path")]);
    fs::remove_dir_all(&dir).expect("temp dir removed");

    assert!(!output.status.success(), "version 9 scripts must be rejected");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported level script version 9"), "stderr: {stderr}");
}

#[test]
fn invalid_layouts_fail() {
    let output = shifting_maze(&["--layout", "maze:v2:3x3:AA"]);
    assert!(!output.status.success(), "unknown layout versions must be rejected");
}
