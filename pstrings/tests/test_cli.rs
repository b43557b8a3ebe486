use std::process::{Command, Output};

fn pstrings(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pstrings"))
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .expect("Failed to run pstrings")
}

#[test]
fn test_usage_errors_exit_2() {
    let cases: [&[&str]; 9] = [
        &[],
        &["-a", "-r", "1"],
        &["-a", "-x", "1"],
        &["-n", "0", "1"],
        &["-n", "many", "1"],
        &["-f", "101", "1"],
        &["12abc"],
        &["-1"],
        &["0"],
    ];
    for args in cases {
        let output = pstrings(args);
        assert_eq!(output.status.code(), Some(2), "args {args:?}");
        assert!(output.stdout.is_empty(), "args {args:?}");
    }
}

#[test]
fn test_unknown_locale_exits_2() {
    let output = pstrings(&["-l", "xx_NOWHERE.bogus-charset", "1"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("xx_NOWHERE"), "stderr: {stderr}");
}

#[test]
fn test_missing_process_exits_1() {
    // Above the kernel's pid_max, so never a live process
    let output = pstrings(&["2147483647"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_help_exits_0() {
    let output = pstrings(&["--help"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--min-length"));
    assert!(stdout.contains("PID"));
}
