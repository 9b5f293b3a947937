//! Match, options and result types.
//!
//! These are the values exchanged between the match engine and whatever
//! presents its output. They serialise with the field names the browser
//! tool used (`isManual`, `unmatchedSource`, ...).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};
use crate::lock::Lock;

/// Score carried by every lock-derived match.
pub const MANUAL_SCORE: u8 = 100;

/// Strategy used when no ratio is configured.
pub const DEFAULT_RATIO: &str = "token_sort_ratio";

/// Threshold used when no threshold is configured.
pub const DEFAULT_THRESHOLD: f64 = 60.0;

/// Which of the two input lists an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListSide {
    /// List A, the match sources.
    Source,
    /// List B, the match targets.
    Target,
}

impl fmt::Display for ListSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("list A"),
            Self::Target => f.write_str("list B"),
        }
    }
}

/// A resolved pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// Item from list A.
    pub source: String,
    /// Item from list B.
    pub target: String,
    /// Similarity score in `0..=100`.
    pub score: u8,
    /// True when the pair comes from a lock.
    pub is_manual: bool,
}

impl Match {
    /// Match derived from a lock, always scored [`MANUAL_SCORE`].
    pub fn manual(lock: &Lock) -> Self {
        Self {
            source: lock.source.clone(),
            target: lock.target.clone(),
            score: MANUAL_SCORE,
            is_manual: true,
        }
    }

    /// Match produced by the assignment solver.
    pub fn automatic(source: impl Into<String>, target: impl Into<String>, score: u8) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            score,
            is_manual: false,
        }
    }
}

/// Options for a single match run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Name of the similarity strategy. Unknown names fall back to
    /// [`DEFAULT_RATIO`].
    pub ratio: String,
    /// Inclusive minimum score for automatic matches. `None` keeps all.
    pub threshold: Option<f64>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            ratio: DEFAULT_RATIO.to_string(),
            threshold: Some(DEFAULT_THRESHOLD),
        }
    }
}

impl MatchOptions {
    /// Default strategy with threshold filtering disabled.
    #[must_use]
    pub fn unfiltered() -> Self {
        Self {
            threshold: None,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_ratio(mut self, ratio: impl Into<String>) -> Self {
        self.ratio = ratio.into();
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: Option<f64>) -> Self {
        self.threshold = threshold;
        self
    }

    /// Rejects a NaN or infinite threshold.
    ///
    /// # Errors
    ///
    /// [`MatchError::InvalidThreshold`] when the threshold is not finite.
    pub fn validate(&self) -> Result<()> {
        match self.threshold {
            Some(threshold) if !threshold.is_finite() => Err(MatchError::InvalidThreshold {
                threshold: threshold.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Whether a match survives threshold filtering. Manual matches always do.
    #[must_use]
    pub fn keeps(&self, candidate: &Match) -> bool {
        candidate.is_manual
            || self
                .threshold
                .is_none_or(|threshold| f64::from(candidate.score) >= threshold)
    }
}

/// Display classification of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Low,
    Medium,
    High,
}

impl ScoreBand {
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::High => "strong match",
            Self::Medium => "plausible match, review",
            Self::Low => "weak match, verify",
        }
    }
}

/// Boundaries between score bands.
///
/// - at or above `high`: [`ScoreBand::High`]
/// - at or above `medium`: [`ScoreBand::Medium`]
/// - anything else: [`ScoreBand::Low`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBands {
    pub high: u8,
    pub medium: u8,
}

impl Default for ScoreBands {
    fn default() -> Self {
        Self {
            high: 80,
            medium: 50,
        }
    }
}

impl ScoreBands {
    #[must_use]
    pub fn categorize(&self, score: u8) -> ScoreBand {
        if score >= self.high {
            ScoreBand::High
        } else if score >= self.medium {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }
}

/// Output of one match run.
///
/// Immutable snapshot: it owns copies of every label it mentions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// Surviving matches, highest score first.
    pub matches: Vec<Match>,
    /// List A items that are not the source of any match, in list order.
    pub unmatched_source: Vec<String>,
    /// List B items that are not the target of any match, in list order.
    pub unmatched_target: Vec<String>,
}

impl MatchResult {
    #[must_use]
    pub fn manual_count(&self) -> usize {
        self.matches.iter().filter(|m| m.is_manual).count()
    }

    #[must_use]
    pub fn automatic_count(&self) -> usize {
        self.matches.iter().filter(|m| !m.is_manual).count()
    }

    /// Sum of automatic match scores.
    #[must_use]
    pub fn automatic_total(&self) -> u32 {
        self.matches
            .iter()
            .filter(|m| !m.is_manual)
            .map(|m| u32::from(m.score))
            .sum()
    }

    /// Mean score over all matches, manual ones included.
    #[must_use]
    pub fn mean_score(&self) -> Option<f64> {
        if self.matches.is_empty() {
            return None;
        }
        let sum: u32 = self.matches.iter().map(|m| u32::from(m.score)).sum();
        Some(f64::from(sum) / self.matches.len() as f64)
    }

    /// Number of automatic matches in each band. Manual matches are not banded.
    #[must_use]
    pub fn count_by_band(&self, bands: &ScoreBands) -> BTreeMap<ScoreBand, usize> {
        let mut counts = BTreeMap::new();
        for m in self.matches.iter().filter(|m| !m.is_manual) {
            *counts.entry(bands.categorize(m.score)).or_insert(0) += 1;
        }
        counts
    }

    /// True when nothing is left unmatched on either side.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unmatched_source.is_empty() && self.unmatched_target.is_empty()
    }
}
