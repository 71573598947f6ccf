//! Test suites for the CRM context.

mod domain_tests;
mod memory_client_tests;
