//! Test suites for the lead context.

mod domain_tests;
mod service_tests;
