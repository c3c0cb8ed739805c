use std::process::Command;

use crate::common::{assert_exit_code, init_test_logging, stderr_of, stdout_of};

fn rcompile(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_rcompile"))
        .args(args)
        .env_remove("RCOMPILE_REMOTE")
        .output()
        .expect("Failed to run rcompile")
}

#[test]
fn test_help_flags_exit_successfully() {
    init_test_logging();
    crate::test_log!("TEST START: test_help_flags_exit_successfully");

    for flag in ["-h", "-?", "--help"] {
        let output = rcompile(&[flag]);
        assert_exit_code(&output, 0);
        let usage = stdout_of(&output);
        assert!(usage.contains("--return-file"), "{flag}: {usage}");
        assert!(usage.contains("RCOMPILE_REMOTE"), "{flag}: {usage}");
    }

    crate::test_log!("TEST PASS: test_help_flags_exit_successfully");
}

#[test]
fn test_missing_option_value_fails() {
    init_test_logging();
    crate::test_log!("TEST START: test_missing_option_value_fails");

    for args in [&["--remote"][..], &["--return-file"][..]] {
        assert_exit_code(&rcompile(args), 2);
    }

    crate::test_log!("TEST PASS: test_missing_option_value_fails");
}

#[test]
fn test_missing_command_fails() {
    init_test_logging();
    crate::test_log!("TEST START: test_missing_command_fails");

    let output = rcompile(&["--remote", "compiler"]);
    assert_exit_code(&output, 2);
    assert!(stderr_of(&output).contains("COMMAND"));

    crate::test_log!("TEST PASS: test_missing_command_fails");
}
