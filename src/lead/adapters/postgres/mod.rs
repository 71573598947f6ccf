//! `PostgreSQL` adapters for lead persistence.

mod models;
mod repository;
mod schema;

pub use repository::{LeadPgPool, PostgresLeadRepository};
