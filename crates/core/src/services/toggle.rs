//! Outcome of toggle actions (likes, follows).

use serde::Serialize;
use snapfeed_common::{AppError, AppResult};

/// Whether the relation exists after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleResult {
    pub applied: bool,
}

impl ToggleResult {
    #[must_use]
    pub const fn applied() -> Self {
        Self { applied: true }
    }

    #[must_use]
    pub const fn removed() -> Self {
        Self { applied: false }
    }

    /// Interpret the insert half of a toggle.
    ///
    /// A unique violation means a concurrent request created the same pair,
    /// so the relation is in the requested state.
    pub fn from_insert<T>(result: AppResult<T>) -> AppResult<Self> {
        match result {
            Ok(_) => Ok(Self::applied()),
            Err(AppError::Conflict(detail)) => {
                tracing::debug!(detail = %detail, "Concurrent toggle already applied");
                Ok(Self::applied())
            }
            Err(e) => Err(e),
        }
    }
}
