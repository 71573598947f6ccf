//! Application services for lead intake and lookup.

mod intake;

pub use intake::{IntakeLeadRequest, IntakeOutcome, LeadIntakeError, LeadIntakeService};
