use crate::common::{TestRepo, assert_exit_code, assert_stderr_mentions, init_test_logging, stderr_of};

#[test]
fn test_unknown_remote_fails_before_push() {
    init_test_logging();
    crate::test_log!("TEST START: test_unknown_remote_fails_before_push");

    let repo = TestRepo::new();
    repo.add_remote("compiler", "build@host.invalid:/srv/repo");

    let output = repo.rcompile(&["--remote", "nope", "echo", "hi"]);
    assert_exit_code(&output, 1);
    assert_stderr_mentions(&output, "remote 'nope' is not configured");
    let stderr = stderr_of(&output);
    assert!(!stderr.contains("Publishing"), "push attempted: {stderr}");

    crate::test_log!("TEST PASS: test_unknown_remote_fails_before_push");
}

#[test]
fn test_default_alias_is_compiler() {
    init_test_logging();
    crate::test_log!("TEST START: test_default_alias_is_compiler");

    let repo = TestRepo::new();
    let output = repo.rcompile(&["make"]);

    assert_exit_code(&output, 1);
    assert_stderr_mentions(&output, "remote 'compiler' is not configured");

    crate::test_log!("TEST PASS: test_default_alias_is_compiler");
}

#[test]
fn test_url_without_colon_is_rejected_before_push() {
    init_test_logging();
    crate::test_log!("TEST START: test_url_without_colon_is_rejected_before_push");

    let repo = TestRepo::new();
    let bare = tempfile::TempDir::new().expect("Failed to create temp dir");
    std::process::Command::new("git")
        .args(["init", "-q", "--bare"])
        .arg(bare.path())
        .status()
        .expect("Failed to init bare repo");
    let bare_path = bare.path().to_string_lossy().to_string();
    repo.add_remote("local", &bare_path);

    let output = repo.rcompile(&["--remote", "local", "true"]);
    assert_exit_code(&output, 1);
    assert_stderr_mentions(&output, "unusable url");

    // Nothing reached the would-be remote.
    let refs = std::process::Command::new("git")
        .arg("-C")
        .arg(bare.path())
        .args(["for-each-ref", "--format=%(refname)"])
        .output()
        .expect("Failed to list refs");
    assert!(String::from_utf8_lossy(&refs.stdout).trim().is_empty());

    crate::test_log!("TEST PASS: test_url_without_colon_is_rejected_before_push");
}

#[test]
fn test_config_file_supplies_default_alias() {
    init_test_logging();
    crate::test_log!("TEST START: test_config_file_supplies_default_alias");

    let repo = TestRepo::new();
    std::fs::write(&repo.config, "[remote]\ndefault = \"from-config\"\n")
        .expect("Failed to write config");

    let output = repo.rcompile(&["make"]);
    assert_exit_code(&output, 1);
    assert_stderr_mentions(&output, "remote 'from-config' is not configured");

    crate::test_log!("TEST PASS: test_config_file_supplies_default_alias");
}

#[test]
fn test_malformed_config_file_fails() {
    init_test_logging();
    crate::test_log!("TEST START: test_malformed_config_file_fails");

    let repo = TestRepo::new();
    std::fs::write(&repo.config, "[remote\n").expect("Failed to write config");

    let output = repo.rcompile(&["make"]);
    assert_exit_code(&output, 1);
    assert_stderr_mentions(&output, "invalid config file");

    crate::test_log!("TEST PASS: test_malformed_config_file_fails");
}
