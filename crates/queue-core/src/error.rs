//! Error taxonomy for queue operations.

use thiserror::Error;

use crate::window::ANNOUNCEMENT_MAX_LEN;

/// Errors that can occur while operating the ticket queue.
///
/// All variants are local, recoverable errors meant to be reported to the
/// caller of the command surface; none of them should crash the process.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueueError {
    /// Window lookup miss.
    #[error("window not found: {id}")]
    WindowNotFound { id: String },

    /// A window with this display number already exists.
    #[error("window number {number} already exists")]
    DuplicateNumber { number: u32 },

    /// The ticket pool has no numbers left.
    #[error("no tickets left in today's pool")]
    Exhausted,

    /// Window numbers must be positive.
    #[error("invalid window number: {number}")]
    InvalidNumber { number: i64 },

    /// Announcement text over the limit.
    #[error("announcement is too long ({len} chars, max {max})", max = ANNOUNCEMENT_MAX_LEN)]
    AnnouncementTooLong { len: usize },

    /// Color value outside the fixed palette.
    #[error("unknown window color: {value}")]
    UnknownColor { value: String },

    /// Persistence collaborator failure. The in-memory state has been rolled
    /// back to what it was before the operation.
    #[error("storage error: {0}")]
    Storage(String),
}

impl QueueError {
    /// Whether this error is a bad-input rejection rather than a state miss.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            QueueError::InvalidNumber { .. }
                | QueueError::AnnouncementTooLong { .. }
                | QueueError::UnknownColor { .. }
        )
    }
}

/// Result type for queue operations.
pub type Result<T> = std::result::Result<T, QueueError>;
