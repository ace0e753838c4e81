//! Command-line behavior of the `plasma` binary.
//!
//! Only invalid or informational invocations are run here; they exit during
//! argument parsing, before any window is opened.

use std::process::{Command, Output};

fn plasma(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_plasma"))
        .args(args)
        .output()
        .expect("failed to run plasma binary")
}

#[test]
fn test_zero_width_is_rejected() {
    let output = plasma(&["-w", "0"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid value for width"), "stderr: {}", stderr);
}

#[test]
fn test_non_numeric_height_is_rejected() {
    let output = plasma(&["-h", "tall"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid value for height: tall"), "stderr: {}", stderr);
}

#[test]
fn test_overflowing_window_size_is_rejected() {
    let output = plasma(&["-w", "100000", "-s", "100000"]);
    assert_eq!(output.status.code(), Some(2));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid value for scale"), "stderr: {}", stderr);
}

#[test]
fn test_unknown_variant_is_rejected() {
    let output = plasma(&["--variant", "lava-lamp"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("lava-lamp"));
}

#[test]
fn test_long_help_lists_flags() {
    let output = plasma(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--width", "--height", "--scale", "--fullscreen", "--interactive", "--variant"] {
        assert!(stdout.contains(flag), "missing {} in help:\n{}", flag, stdout);
    }
}

#[test]
fn test_version() {
    let output = plasma(&["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}
