//! Status returned by behavior nodes.

/// The result of evaluating a behavior node.
///
/// A round-based decision completes inside one tick, so there is no
/// `Running` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Condition held, or the action produced a decision.
    Success,

    /// Condition did not hold, or the action could not produce a decision.
    Failure,
}

impl Status {
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Maps a boolean predicate result onto a status.
    #[inline]
    pub fn from_bool(value: bool) -> Self {
        if value { Status::Success } else { Status::Failure }
    }
}
