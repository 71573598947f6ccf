//! Adapter implementations of the assignment ports.

mod random;
mod template;

pub use random::UniformTieBreak;
pub use template::TemplateComposer;
