//! Application services for follow-up balancing.

mod balancer;

pub use balancer::{
    AssignmentError, AssignmentFailure, AssignmentItemError, AssignmentRecord, AssignmentReport,
    AssignmentService,
};
