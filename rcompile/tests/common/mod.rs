pub mod assertions;
pub mod fixtures;
pub mod logging;

pub use assertions::{assert_exit_code, assert_stderr_mentions, stderr_of, stdout_of};
pub use fixtures::TestRepo;
pub use logging::init_test_logging;
