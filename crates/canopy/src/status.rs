use serde::{Deserialize, Serialize};

/// Result of stepping a node for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The node needs another tick; step the same instance again to resume it.
    Running,
    Success,
    Failure,
}

impl Status {
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }

    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// `Success` and `Failure` end a run; the node must be re-initialized before its next step.
    #[inline]
    pub fn is_terminal(self) -> bool {
        !self.is_running()
    }

    /// Swap `Success` and `Failure`; `Running` is unchanged.
    #[inline]
    pub fn invert(self) -> Self {
        match self {
            Status::Running => Status::Running,
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
        }
    }

    /// Numeric code used in trace events.
    pub(crate) fn code(self) -> u64 {
        match self {
            Status::Running => 0,
            Status::Success => 1,
            Status::Failure => 2,
        }
    }
}
