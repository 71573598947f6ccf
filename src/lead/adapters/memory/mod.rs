//! In-memory lead store used by tests and local development.

mod lead;

pub use lead::InMemoryLeadRepository;
