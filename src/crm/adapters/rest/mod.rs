//! REST binding of the CRM client port.
//!
//! The GraphQL surface of the same CRM is an alternate binding behind the
//! identical port; only the REST one is implemented here.

mod client;
mod wire;

pub use client::RestCrmClient;
