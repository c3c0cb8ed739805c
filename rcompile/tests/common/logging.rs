use tracing_subscriber::EnvFilter;

/// Test-side log filter, separate from the binary's `RCOMPILE_LOG` so
/// turning on test chatter does not change what the binary prints.
const TEST_LOG_ENV: &str = "RCOMPILE_TEST_LOG";

pub fn init_test_logging() {
    let filter = EnvFilter::try_from_env(TEST_LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("rcompile_test=info"));
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_target(false)
        .without_time()
        .with_env_filter(filter)
        .try_init();
}

/// Progress line for a test, shown with `--nocapture`.
#[macro_export]
macro_rules! test_log {
    ($($arg:tt)*) => {
        tracing::info!(target: "rcompile_test", $($arg)*)
    };
}
