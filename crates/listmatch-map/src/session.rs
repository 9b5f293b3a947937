//! Editor state for interactive matching workflows.
//!
//! A [`MatchSession`] holds the two lists being edited and the locks the
//! user declared. It is a plain value owned by the caller; running a match
//! snapshots it and never changes it. [`ResultSlot`] keeps the result that
//! is currently displayed when runs can overlap.

use tracing::debug;

use listmatch_model::{
    DemoPreset, ListSide, Lock, LockSet, MatchError, MatchOptions, MatchResult, Result,
};

use crate::assignment::AssignmentSolver;
use crate::engine::MatchEngine;
use crate::similarity::SimilarityProvider;

/// State of the two-list editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSession {
    list_a: Vec<String>,
    list_b: Vec<String>,
    locks: LockSet,
}

impl MatchSession {
    /// Blank session with one empty row per list, ready for typing.
    pub fn fresh() -> Self {
        Self {
            list_a: vec![String::new()],
            list_b: vec![String::new()],
            locks: LockSet::new(),
        }
    }

    /// Session seeded from a demo preset, including its locks.
    pub fn from_demo(demo: &DemoPreset) -> Result<Self> {
        Ok(Self {
            list_a: demo.list_a.clone(),
            list_b: demo.list_b.clone(),
            locks: demo.lock_set()?,
        })
    }

    /// Session over existing lists with no locks.
    pub fn with_lists(list_a: Vec<String>, list_b: Vec<String>) -> Self {
        Self {
            list_a,
            list_b,
            locks: LockSet::new(),
        }
    }

    pub fn list(&self, side: ListSide) -> &[String] {
        match side {
            ListSide::Source => &self.list_a,
            ListSide::Target => &self.list_b,
        }
    }

    pub fn locks(&self) -> &LockSet {
        &self.locks
    }

    fn list_mut(&mut self, side: ListSide) -> &mut Vec<String> {
        match side {
            ListSide::Source => &mut self.list_a,
            ListSide::Target => &mut self.list_b,
        }
    }

    /// Appends a row to one list.
    pub fn push_item(&mut self, side: ListSide, value: impl Into<String>) {
        self.list_mut(side).push(value.into());
    }

    /// Replaces the value of a row.
    pub fn set_item(
        &mut self,
        side: ListSide,
        index: usize,
        value: impl Into<String>,
    ) -> Result<()> {
        let list = self.list_mut(side);
        let len = list.len();
        let slot = list
            .get_mut(index)
            .ok_or(MatchError::ItemIndex { side, index, len })?;
        *slot = value.into();
        Ok(())
    }

    /// Deletes a row and returns its value.
    ///
    /// Locks are left alone: a lock whose item disappeared still forces its
    /// pair, exactly as the user declared it, until the lock is removed.
    pub fn remove_item(&mut self, side: ListSide, index: usize) -> Result<String> {
        let list = self.list_mut(side);
        if index >= list.len() {
            return Err(MatchError::ItemIndex {
                side,
                index,
                len: list.len(),
            });
        }
        Ok(list.remove(index))
    }

    /// Locks `source` to `target`.
    ///
    /// Both values must be non-blank and present (after trimming) in their
    /// list; the lock set then enforces one lock per item.
    pub fn add_lock(&mut self, source: &str, target: &str) -> Result<()> {
        let source = source.trim();
        let target = target.trim();
        if source.is_empty() || target.is_empty() {
            return Err(MatchError::BlankLockSelection);
        }
        for (side, item) in [(ListSide::Source, source), (ListSide::Target, target)] {
            if !self.list(side).iter().any(|value| value.trim() == item) {
                return Err(MatchError::InvalidLockSelection {
                    side,
                    item: item.to_string(),
                });
            }
        }
        self.locks.add_lock(source, target)
    }

    pub fn remove_lock(&mut self, index: usize) -> Result<Lock> {
        self.locks.remove_lock(index)
    }

    /// Both lists trimmed with blank rows dropped.
    ///
    /// # Errors
    ///
    /// [`MatchError::EmptyList`] when a list has no non-blank row.
    pub fn prepared_lists(&self) -> Result<(Vec<String>, Vec<String>)> {
        let list_a = prepare(&self.list_a);
        if list_a.is_empty() {
            return Err(MatchError::EmptyList {
                side: ListSide::Source,
            });
        }
        let list_b = prepare(&self.list_b);
        if list_b.is_empty() {
            return Err(MatchError::EmptyList {
                side: ListSide::Target,
            });
        }
        Ok((list_a, list_b))
    }

    /// Runs the engine over the prepared lists and the current locks.
    pub fn run<S, A>(
        &self,
        engine: &MatchEngine<S, A>,
        options: &MatchOptions,
    ) -> Result<MatchResult>
    where
        S: SimilarityProvider,
        A: AssignmentSolver,
    {
        let (list_a, list_b) = self.prepared_lists()?;
        engine.match_lists(&list_a, &list_b, &self.locks, options)
    }
}

fn prepare(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Identifies one run handed out by a [`ResultSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunTicket(u64);

/// Holder for the displayed result when runs may finish out of order.
///
/// The latest completed run wins; a run that finishes after a newer one has
/// already been shown is discarded.
#[derive(Debug, Clone)]
pub struct ResultSlot<T = MatchResult> {
    issued: u64,
    shown: Option<(RunTicket, T)>,
}

impl<T> Default for ResultSlot<T> {
    fn default() -> Self {
        Self {
            issued: 0,
            shown: None,
        }
    }
}

impl<T> ResultSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a run and returns its ticket.
    pub fn begin(&mut self) -> RunTicket {
        self.issued += 1;
        RunTicket(self.issued)
    }

    /// Offers the value produced by the run `ticket`.
    ///
    /// Returns `false` and drops the value when a newer run already
    /// completed.
    pub fn complete(&mut self, ticket: RunTicket, value: T) -> bool {
        if let Some((shown, _)) = &self.shown
            && *shown > ticket
        {
            debug!(
                stale = ticket.0,
                shown = shown.0,
                "discarding result of superseded run"
            );
            return false;
        }
        self.shown = Some((ticket, value));
        true
    }

    pub fn current(&self) -> Option<&T> {
        self.shown.as_ref().map(|(_, value)| value)
    }

    /// Ticket of the run whose value is currently shown.
    pub fn current_ticket(&self) -> Option<RunTicket> {
        self.shown.as_ref().map(|(ticket, _)| *ticket)
    }
}
