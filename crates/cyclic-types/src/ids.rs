//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Runs are tagged with a UUID v7 (time-ordered) so exported result sets
//! and log lines from the same run can be correlated.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for RunId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
