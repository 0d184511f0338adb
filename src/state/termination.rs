//! Why pagination stopped for one (category, location) pair

use std::fmt;

/// How a pair's pagination loop ended
///
/// Rate limiting is not a variant: it aborts the whole run and is reported
/// as an error instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The API returned an empty page or no `businesses` key
    Exhausted,

    /// The next offset would exceed the API's scroll cap
    ScrollLimitReached,

    /// A request failed; records gathered before the failure are kept
    Failed(String),
}

impl Termination {
    /// Returns true if the pair ended without a failure
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exhausted => "exhausted",
            Self::ScrollLimitReached => "scroll_limit_reached",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(detail) => write!(f, "failed: {}", detail),
            other => write!(f, "{}", other.as_str()),
        }
    }
}
