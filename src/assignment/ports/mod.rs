//! Port contracts for follow-up assignment.

pub mod composer;
pub mod tie_break;

pub use composer::{ComposeError, FollowUpComposer};
pub use tie_break::TieBreak;
