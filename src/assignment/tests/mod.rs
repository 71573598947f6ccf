//! Test suites for follow-up balancing.

mod service_tests;
