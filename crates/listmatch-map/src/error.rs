//! Error types for the scoring and assignment capabilities.

use thiserror::Error;

use listmatch_model::MatchError;

/// Failure reported by a similarity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimilarityError {
    /// The provider cannot serve requests.
    #[error("similarity provider unavailable: {0}")]
    Unavailable(String),
    /// The provider produced a score outside `0..=100`.
    #[error("score {score} for strategy '{strategy}' is outside 0..=100")]
    OutOfRange { strategy: &'static str, score: u8 },
}

/// Failure reported by an assignment solver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// Rows of the reward matrix have different lengths.
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A reward is NaN or infinite.
    #[error("reward at ({row}, {col}) is not finite: {value}")]
    NonFinite { row: usize, col: usize, value: f64 },
    /// The solver cannot serve requests.
    #[error("assignment solver unavailable: {0}")]
    Unavailable(String),
}

impl From<SimilarityError> for MatchError {
    fn from(err: SimilarityError) -> Self {
        Self::Similarity(err.to_string())
    }
}

impl From<SolverError> for MatchError {
    fn from(err: SolverError) -> Self {
        Self::Solver(err.to_string())
    }
}
