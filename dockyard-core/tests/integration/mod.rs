mod host_tests;
mod workflow_tests;
