//! User-declared fixed pairs.
//!
//! A [`LockSet`] is a bipartite partial matching: no list A item is the
//! source of more than one lock and no list B item is the target of more
//! than one lock. Every mutation that would break this is rejected.

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

/// A forced pairing of a list A item with a list B item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lock {
    /// Item from list A.
    pub source: String,
    /// Item from list B.
    pub target: String,
}

impl Lock {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Ordered collection of locks, validated on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSet {
    locks: Vec<Lock>,
}

impl LockSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a lock set from pairs in declaration order.
    ///
    /// Fails on the first pair that conflicts with an earlier one.
    pub fn try_from_pairs<I, A, B>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        let mut set = Self::new();
        for (source, target) in pairs {
            set.add_lock(source, target)?;
        }
        Ok(set)
    }

    /// Appends a lock.
    ///
    /// Rejects an exact duplicate pair, a source that is already locked and a
    /// target that is already locked. The set is unchanged on error.
    pub fn add_lock(&mut self, source: impl Into<String>, target: impl Into<String>) -> Result<()> {
        let lock = Lock::new(source, target);
        if self.locks.contains(&lock) {
            return Err(MatchError::DuplicateLock {
                from: lock.source,
                to: lock.target,
            });
        }
        if let Some(existing) = self.locks.iter().find(|l| l.source == lock.source) {
            return Err(MatchError::SourceAlreadyLocked {
                item: lock.source,
                partner: existing.target.clone(),
            });
        }
        if let Some(existing) = self.locks.iter().find(|l| l.target == lock.target) {
            return Err(MatchError::TargetAlreadyLocked {
                item: lock.target,
                partner: existing.source.clone(),
            });
        }
        self.locks.push(lock);
        Ok(())
    }

    /// Removes and returns the lock at `index`.
    pub fn remove_lock(&mut self, index: usize) -> Result<Lock> {
        if index >= self.locks.len() {
            return Err(MatchError::LockIndex {
                index,
                len: self.locks.len(),
            });
        }
        Ok(self.locks.remove(index))
    }

    pub fn contains_source(&self, item: &str) -> bool {
        self.locks.iter().any(|l| l.source == item)
    }

    pub fn contains_target(&self, item: &str) -> bool {
        self.locks.iter().any(|l| l.target == item)
    }

    /// Lock sources in declaration order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.locks.iter().map(|l| l.source.as_str())
    }

    /// Lock targets in declaration order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.locks.iter().map(|l| l.target.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Lock> {
        self.locks.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Lock> {
        self.locks.get(index)
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl<'a> IntoIterator for &'a LockSet {
    type Item = &'a Lock;
    type IntoIter = std::slice::Iter<'a, Lock>;

    fn into_iter(self) -> Self::IntoIter {
        self.locks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_lock_rejects_duplicate_pair() {
        let mut locks = LockSet::new();
        locks.add_lock("X", "Z").unwrap();
        let err = locks.add_lock("X", "Z").unwrap_err();
        assert!(matches!(err, MatchError::DuplicateLock { .. }));
        assert_eq!(locks.len(), 1);
    }

    #[test]
    fn add_lock_rejects_reused_source_and_target() {
        let mut locks = LockSet::new();
        locks.add_lock("X", "Z").unwrap();

        let err = locks.add_lock("X", "Y").unwrap_err();
        assert_eq!(
            err,
            MatchError::SourceAlreadyLocked {
                item: "X".to_string(),
                partner: "Z".to_string(),
            }
        );

        let err = locks.add_lock("W", "Z").unwrap_err();
        assert_eq!(
            err,
            MatchError::TargetAlreadyLocked {
                item: "Z".to_string(),
                partner: "X".to_string(),
            }
        );
        assert_eq!(locks.len(), 1);
    }

    #[test]
    fn remove_lock_by_position() {
        let mut locks = LockSet::try_from_pairs([("A", "1"), ("B", "2")]).unwrap();
        let removed = locks.remove_lock(0).unwrap();
        assert_eq!(removed, Lock::new("A", "1"));
        assert_eq!(locks.sources().collect::<Vec<_>>(), vec!["B"]);

        let err = locks.remove_lock(1).unwrap_err();
        assert_eq!(err, MatchError::LockIndex { index: 1, len: 1 });
    }

    #[test]
    fn removed_items_can_be_locked_again() {
        let mut locks = LockSet::try_from_pairs([("A", "1")]).unwrap();
        locks.remove_lock(0).unwrap();
        locks.add_lock("A", "2").unwrap();
        assert!(locks.contains_source("A"));
        assert!(locks.contains_target("2"));
        assert!(!locks.contains_target("1"));
    }

    #[test]
    fn try_from_pairs_reports_first_conflict() {
        let err = LockSet::try_from_pairs([("A", "1"), ("B", "2"), ("C", "1")]).unwrap_err();
        assert!(err.is_lock_conflict());
    }
}
