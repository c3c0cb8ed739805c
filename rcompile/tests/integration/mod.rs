mod argument_tests;
mod remote_tests;
