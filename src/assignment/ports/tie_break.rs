//! Tie-breaking port for least-loaded member selection.

/// Selects among members tied at the minimum open-task count.
///
/// The production implementation draws uniformly at random so repeated runs
/// do not systematically favour one member; tests inject a seeded source to
/// assert both determinism and distribution.
pub trait TieBreak: Send + Sync {
    /// Returns an index in `0..count`. Callers only pass `count >= 1`.
    fn pick(&self, count: usize) -> usize;
}
