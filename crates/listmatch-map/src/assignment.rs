//! Maximum-weight rectangular assignment.
//!
//! The bundled solver is the Kuhn-Munkres (Hungarian) method with row and
//! column potentials, O(n² m) for an n × m matrix with n ≤ m. Taller
//! matrices are solved transposed. Every row of the smaller dimension is
//! assigned; the surplus rows or columns of the larger one stay unassigned.

use std::collections::BTreeMap;

use crate::error::SolverError;

/// Dense row-major reward matrix with finite entries.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl RewardMatrix {
    /// Builds a matrix from rows, rejecting ragged rows and non-finite values.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, SolverError> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != cols {
                return Err(SolverError::RaggedRow {
                    row,
                    expected: cols,
                    found: values.len(),
                });
            }
            for (col, &value) in values.iter().enumerate() {
                if !value.is_finite() {
                    return Err(SolverError::NonFinite { row, col, value });
                }
                data.push(value);
            }
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    fn transposed(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for col in 0..self.cols {
            for row in 0..self.rows {
                data.push(self.get(row, col));
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }
}

/// Sparse row → column mapping returned by a solver.
///
/// Rows without an entry are unassigned. No column appears twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    pairs: BTreeMap<usize, usize>,
}

impl Assignment {
    pub fn column_for(&self, row: usize) -> Option<usize> {
        self.pairs.get(&row).copied()
    }

    /// Assigned `(row, column)` pairs in row order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs.iter().map(|(&row, &col)| (row, col))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Sum of the rewards of all assigned cells.
    pub fn total(&self, matrix: &RewardMatrix) -> f64 {
        self.iter().map(|(row, col)| matrix.get(row, col)).sum()
    }
}

impl FromIterator<(usize, usize)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

/// Capability: pick at most one column per row and one row per column,
/// maximising the summed reward.
///
/// Implementations must be deterministic for a given matrix.
pub trait AssignmentSolver {
    fn solve(&self, rewards: &RewardMatrix) -> Result<Assignment, SolverError>;
}

impl<T: AssignmentSolver + ?Sized> AssignmentSolver for &T {
    fn solve(&self, rewards: &RewardMatrix) -> Result<Assignment, SolverError> {
        (**self).solve(rewards)
    }
}

/// Kuhn-Munkres solver in maximisation mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct HungarianSolver;

impl AssignmentSolver for HungarianSolver {
    fn solve(&self, rewards: &RewardMatrix) -> Result<Assignment, SolverError> {
        if rewards.is_empty() {
            return Ok(Assignment::default());
        }
        if rewards.rows() <= rewards.cols() {
            Ok(maximize_wide(rewards).into_iter().collect())
        } else {
            let transposed = rewards.transposed();
            Ok(maximize_wide(&transposed)
                .into_iter()
                .map(|(row, col)| (col, row))
                .collect())
        }
    }
}

/// Solves a matrix with `rows <= cols`, returning `(row, col)` pairs.
///
/// Rewards are negated into costs. Ties go to the lowest column index
/// reached first in the scan, which keeps the output deterministic.
fn maximize_wide(rewards: &RewardMatrix) -> Vec<(usize, usize)> {
    let n = rewards.rows();
    let m = rewards.cols();
    debug_assert!(n <= m);

    let cost = |row: usize, col: usize| -rewards.get(row - 1, col - 1);

    // 1-based: index 0 is the virtual column used to grow the tree.
    let mut u = vec![0.0_f64; n + 1];
    let mut v = vec![0.0_f64; m + 1];
    let mut owner = vec![0_usize; m + 1];
    let mut way = vec![0_usize; m + 1];

    for row in 1..=n {
        owner[0] = row;
        let mut j0 = 0;
        let mut min_slack = vec![f64::INFINITY; m + 1];
        let mut used = vec![false; m + 1];
        loop {
            used[j0] = true;
            let i0 = owner[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0;
            for j in 1..=m {
                if used[j] {
                    continue;
                }
                let slack = cost(i0, j) - u[i0] - v[j];
                if slack < min_slack[j] {
                    min_slack[j] = slack;
                    way[j] = j0;
                }
                if min_slack[j] < delta {
                    delta = min_slack[j];
                    j1 = j;
                }
            }
            for j in 0..=m {
                if used[j] {
                    u[owner[j]] += delta;
                    v[j] -= delta;
                } else {
                    min_slack[j] -= delta;
                }
            }
            j0 = j1;
            if owner[j0] == 0 {
                break;
            }
        }
        loop {
            let j1 = way[j0];
            owner[j0] = owner[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut pairs: Vec<(usize, usize)> = (1..=m)
        .filter(|&j| owner[j] != 0)
        .map(|j| (owner[j] - 1, j - 1))
        .collect();
    pairs.sort_unstable();
    pairs
}
