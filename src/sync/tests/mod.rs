//! Test suites for the sync orchestrator.
