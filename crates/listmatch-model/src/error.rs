//! Error taxonomy for matching operations.

use thiserror::Error;

use crate::ListSide;

/// Broad category of a failure, used by callers to decide how to surface it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input from the caller (bad lock, empty list, bad index).
    Validation,
    /// The similarity provider or the assignment solver failed.
    Dependency,
    /// Tabular input or a configuration document could not be used.
    Ingestion,
}

/// Errors from lock editing and matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The exact pair is already locked.
    #[error("lock '{from}' = '{to}' already exists")]
    DuplicateLock { from: String, to: String },

    /// The list A item is already the source of another lock.
    #[error("'{item}' is already locked to '{partner}'")]
    SourceAlreadyLocked { item: String, partner: String },

    /// The list B item is already the target of another lock.
    #[error("'{item}' is already locked to '{partner}'")]
    TargetAlreadyLocked { item: String, partner: String },

    /// A lock position outside the lock set.
    #[error("lock index {index} out of range ({len} locks)")]
    LockIndex { index: usize, len: usize },

    /// A row position outside one of the lists.
    #[error("row {index} out of range for {side} ({len} rows)")]
    ItemIndex {
        side: ListSide,
        index: usize,
        len: usize,
    },

    /// One side of the lock selection is blank.
    #[error("choose an item from both lists to add a lock")]
    BlankLockSelection,

    /// A lock refers to a value that is not present in its list.
    #[error("'{item}' is not an item of {side}")]
    InvalidLockSelection { side: ListSide, item: String },

    /// The threshold is NaN or infinite, so no score could be compared with it.
    #[error("threshold {threshold} is not a finite number")]
    InvalidThreshold { threshold: String },

    /// A list has no usable items at match time.
    #[error("{side} has no items; add items to both lists before running")]
    EmptyList { side: ListSide },

    /// The similarity provider failed or returned an out-of-range score.
    #[error("similarity provider failed: {0}")]
    Similarity(String),

    /// The assignment solver failed.
    #[error("assignment solver failed: {0}")]
    Solver(String),
}

impl MatchError {
    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Similarity(_) | Self::Solver(_) => ErrorKind::Dependency,
            _ => ErrorKind::Validation,
        }
    }

    /// True for lock conflicts (duplicate pair, source or target reused).
    #[must_use]
    pub fn is_lock_conflict(&self) -> bool {
        matches!(
            self,
            Self::DuplicateLock { .. }
                | Self::SourceAlreadyLocked { .. }
                | Self::TargetAlreadyLocked { .. }
        )
    }
}

/// Result type for matching operations.
pub type Result<T> = std::result::Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MatchError::EmptyList {
            side: ListSide::Target,
        };
        assert_eq!(
            err.to_string(),
            "list B has no items; add items to both lists before running"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            MatchError::LockIndex { index: 3, len: 1 }.kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            MatchError::Solver("boom".to_string()).kind(),
            ErrorKind::Dependency
        );
        assert!(
            MatchError::DuplicateLock {
                from: "X".to_string(),
                to: "Z".to_string(),
            }
            .is_lock_conflict()
        );
        assert!(!MatchError::BlankLockSelection.is_lock_conflict());
        assert_eq!(
            MatchError::InvalidThreshold {
                threshold: "NaN".to_string(),
            }
            .kind(),
            ErrorKind::Validation
        );
    }
}
