//! Randomness port for reviewer selection.

use roster_types::user::User;

/// Source of randomness used to choose reviewers.
///
/// One picker is shared by the whole process. Implementations must be safe to
/// call concurrently; a seeded implementation makes selection reproducible.
pub trait ReviewerPicker: Send + Sync {
    /// Shuffle `candidates` uniformly in place.
    fn shuffle(&self, candidates: &mut [User]);

    /// Pick an index uniformly from `0..len`. `len` is never zero.
    fn pick(&self, len: usize) -> usize;
}

impl<P: ReviewerPicker + ?Sized> ReviewerPicker for std::sync::Arc<P> {
    fn shuffle(&self, candidates: &mut [User]) {
        (**self).shuffle(candidates)
    }

    fn pick(&self, len: usize) -> usize {
        (**self).pick(len)
    }
}
