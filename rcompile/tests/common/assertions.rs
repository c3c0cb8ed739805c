use std::process::Output;

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Assert the exit code, dumping both streams on mismatch.
pub fn assert_exit_code(output: &Output, expected: i32) {
    assert_eq!(
        output.status.code(),
        Some(expected),
        "unexpected exit status\nstdout:\n{}\nstderr:\n{}",
        stdout_of(output),
        stderr_of(output)
    );
}

/// Assert stderr mentions `needle`.
pub fn assert_stderr_mentions(output: &Output, needle: &str) {
    let stderr = stderr_of(output);
    assert!(stderr.contains(needle), "stderr lacks {needle:?}:\n{stderr}");
}
