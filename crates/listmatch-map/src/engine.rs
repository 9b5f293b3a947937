//! Match engine implementation.

use std::collections::BTreeSet;

use tracing::{debug, info_span};

use listmatch_model::{ListSide, LockSet, Match, MatchError, MatchOptions, MatchResult, Result};

use crate::assignment::{AssignmentSolver, HungarianSolver, RewardMatrix};
use crate::error::SimilarityError;
use crate::similarity::{RapidfuzzSimilarity, SimilarityProvider, Strategy};

/// Engine for aligning two lists into globally optimal pairs.
///
/// Locked pairs are taken as given. Every remaining ("open") item of list A
/// is scored against every open item of list B, and the assignment solver
/// picks the one-to-one pairing with the highest total score, so a single
/// strong match never starves later items of their only good partner.
///
/// The engine borrows its inputs immutably and keeps no state between
/// calls: the same inputs always give the same [`MatchResult`].
///
/// # Example
///
/// ```ignore
/// use listmatch_map::MatchEngine;
/// use listmatch_model::{LockSet, MatchOptions};
///
/// let engine = MatchEngine::with_defaults();
/// let result = engine.match_lists(&list_a, &list_b, &LockSet::new(), &MatchOptions::default())?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct MatchEngine<S = RapidfuzzSimilarity, A = HungarianSolver> {
    similarity: S,
    solver: A,
}

impl MatchEngine<RapidfuzzSimilarity, HungarianSolver> {
    /// Engine with the bundled `rapidfuzz` provider and Hungarian solver.
    pub fn with_defaults() -> Self {
        Self::new(RapidfuzzSimilarity, HungarianSolver)
    }
}

impl<S, A> MatchEngine<S, A>
where
    S: SimilarityProvider,
    A: AssignmentSolver,
{
    pub fn new(similarity: S, solver: A) -> Self {
        Self { similarity, solver }
    }

    /// Matches `list_a` against `list_b`.
    ///
    /// Returns a [`MatchResult`] containing:
    /// - one manual match (score 100) per lock, never filtered
    /// - the optimal automatic matches scoring at least the threshold
    /// - the items of each list whose value appears in no match
    ///
    /// Matches are ordered by score, highest first; equal scores keep
    /// manual matches (in lock order) ahead of automatic ones (in list A
    /// order).
    ///
    /// # Errors
    ///
    /// [`MatchError::InvalidThreshold`] for a NaN or infinite threshold,
    /// [`MatchError::EmptyList`] if either list is empty, or a dependency
    /// error if the similarity provider or the solver fails. Nothing partial
    /// is returned.
    pub fn match_lists(
        &self,
        list_a: &[String],
        list_b: &[String],
        locks: &LockSet,
        options: &MatchOptions,
    ) -> Result<MatchResult> {
        let span = info_span!(
            "match_lists",
            list_a = list_a.len(),
            list_b = list_b.len(),
            locks = locks.len(),
            ratio = %options.ratio,
            threshold = ?options.threshold,
        );
        let _guard = span.enter();

        options.validate()?;
        if list_a.is_empty() {
            return Err(MatchError::EmptyList {
                side: ListSide::Source,
            });
        }
        if list_b.is_empty() {
            return Err(MatchError::EmptyList {
                side: ListSide::Target,
            });
        }

        let fixed_a: BTreeSet<&str> = locks.sources().collect();
        let fixed_b: BTreeSet<&str> = locks.targets().collect();
        let open_a: Vec<&str> = open_items(list_a, &fixed_a);
        let open_b: Vec<&str> = open_items(list_b, &fixed_b);

        let automatic = if open_a.is_empty() || open_b.is_empty() {
            debug!(
                open_a = open_a.len(),
                open_b = open_b.len(),
                "nothing open on one side, skipping solver"
            );
            Vec::new()
        } else {
            let strategy = Strategy::resolve(&options.ratio);
            self.solve_open(&open_a, &open_b, strategy)?
        };
        let solved = automatic.len();

        let mut matches: Vec<Match> = locks.iter().map(Match::manual).collect();
        matches.extend(automatic);
        matches.retain(|m| options.keeps(m));
        // Stable: equal scores keep merge order.
        matches.sort_by(|a, b| b.score.cmp(&a.score));

        let matched_a: BTreeSet<&str> = matches.iter().map(|m| m.source.as_str()).collect();
        let matched_b: BTreeSet<&str> = matches.iter().map(|m| m.target.as_str()).collect();
        let unmatched_source = unmatched_items(list_a, &matched_a);
        let unmatched_target = unmatched_items(list_b, &matched_b);

        debug!(
            solved,
            kept = matches.len(),
            unmatched_source = unmatched_source.len(),
            unmatched_target = unmatched_target.len(),
            "match complete"
        );

        Ok(MatchResult {
            matches,
            unmatched_source,
            unmatched_target,
        })
    }

    /// Scores the open items and returns the solver's automatic matches in
    /// row order.
    fn solve_open(
        &self,
        open_a: &[&str],
        open_b: &[&str],
        strategy: Strategy,
    ) -> Result<Vec<Match>> {
        let scores = self.score_matrix(open_a, open_b, strategy)?;
        let rewards = RewardMatrix::from_rows(
            scores
                .iter()
                .map(|row| row.iter().map(|&score| f64::from(score)).collect())
                .collect(),
        )?;
        let assignment = self.solver.solve(&rewards)?;

        let mut matches = Vec::with_capacity(assignment.len());
        for (row, col) in assignment.iter() {
            let (Some(source), Some(target)) = (open_a.get(row), open_b.get(col)) else {
                return Err(MatchError::Solver(format!(
                    "assignment ({row}, {col}) is outside the {}x{} matrix",
                    open_a.len(),
                    open_b.len()
                )));
            };
            matches.push(Match::automatic(*source, *target, scores[row][col]));
        }
        Ok(matches)
    }

    fn score_matrix(
        &self,
        open_a: &[&str],
        open_b: &[&str],
        strategy: Strategy,
    ) -> Result<Vec<Vec<u8>>> {
        let mut matrix = Vec::with_capacity(open_a.len());
        for a in open_a {
            let mut row = Vec::with_capacity(open_b.len());
            for b in open_b {
                let score = self.similarity.score(a, b, strategy)?;
                if score > 100 {
                    return Err(SimilarityError::OutOfRange {
                        strategy: strategy.name(),
                        score,
                    }
                    .into());
                }
                row.push(score);
            }
            matrix.push(row);
        }
        Ok(matrix)
    }
}

fn open_items<'a>(items: &'a [String], fixed: &BTreeSet<&str>) -> Vec<&'a str> {
    items
        .iter()
        .map(String::as_str)
        .filter(|item| !fixed.contains(item))
        .collect()
}

fn unmatched_items(items: &[String], matched: &BTreeSet<&str>) -> Vec<String> {
    items
        .iter()
        .filter(|item| !matched.contains(item.as_str()))
        .cloned()
        .collect()
}
