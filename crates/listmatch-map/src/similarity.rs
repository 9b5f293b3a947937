//! Fuzzy similarity strategies.
//!
//! Strategies follow the fuzzball/fuzzywuzzy family: both strings are
//! lowercased and stripped of punctuation, then compared with the Indel
//! normalized similarity (or Jaro-Winkler), and the result is rounded to an
//! integer percentage.

use std::collections::BTreeSet;
use std::fmt;

use rapidfuzz::distance::{indel, jaro_winkler};
use tracing::warn;

use crate::error::SimilarityError;

/// Named scoring strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Plain edit-based similarity, sensitive to word order.
    Ratio,
    /// Best [`Strategy::Ratio`] of the shorter string against any window of the longer.
    PartialRatio,
    /// Words are sorted before comparing, so word order is ignored.
    #[default]
    TokenSortRatio,
    /// Compares shared words against each side's leftovers.
    TokenSetRatio,
    /// [`Strategy::PartialRatio`] on word-sorted strings.
    PartialTokenSortRatio,
    /// [`Strategy::TokenSetRatio`] built on [`Strategy::PartialRatio`].
    PartialTokenSetRatio,
    /// Words of the longer label are reordered to line up with their most
    /// similar word in the shorter one.
    TokenSimilaritySortRatio,
    PartialTokenSimilaritySortRatio,
    /// Best of the other Indel scorers, weighted by the length ratio.
    WRatio,
    /// Jaro-Winkler similarity, favouring common prefixes.
    JaroWinkler,
}

impl Strategy {
    pub const ALL: [Strategy; 10] = [
        Strategy::Ratio,
        Strategy::PartialRatio,
        Strategy::TokenSortRatio,
        Strategy::TokenSetRatio,
        Strategy::PartialTokenSortRatio,
        Strategy::PartialTokenSetRatio,
        Strategy::TokenSimilaritySortRatio,
        Strategy::PartialTokenSimilaritySortRatio,
        Strategy::WRatio,
        Strategy::JaroWinkler,
    ];

    /// Registry name, as accepted in match options.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Ratio => "ratio",
            Self::PartialRatio => "partial_ratio",
            Self::TokenSortRatio => "token_sort_ratio",
            Self::TokenSetRatio => "token_set_ratio",
            Self::PartialTokenSortRatio => "partial_token_sort_ratio",
            Self::PartialTokenSetRatio => "partial_token_set_ratio",
            Self::TokenSimilaritySortRatio => "token_similarity_sort_ratio",
            Self::PartialTokenSimilaritySortRatio => "partial_token_similarity_sort_ratio",
            Self::WRatio => "WRatio",
            Self::JaroWinkler => "jaro_winkler",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Ratio => "character overlap, word order matters",
            Self::PartialRatio => "best matching substring of the longer label",
            Self::TokenSortRatio => "character overlap after sorting words",
            Self::TokenSetRatio => "shared words versus leftover words",
            Self::PartialTokenSortRatio => "substring match after sorting words",
            Self::PartialTokenSetRatio => "substring match of shared versus leftover words",
            Self::TokenSimilaritySortRatio => "character overlap after pairing similar words",
            Self::PartialTokenSimilaritySortRatio => {
                "substring match after pairing similar words"
            }
            Self::WRatio => "best of the above, weighted by label lengths",
            Self::JaroWinkler => "transposition tolerant, rewards common prefixes",
        }
    }

    /// Looks up a strategy by its exact registry name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|strategy| strategy.name() == name)
    }

    /// Like [`Strategy::from_name`] but falls back to the default strategy.
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            let fallback = Self::default();
            warn!(
                requested = %name,
                fallback = fallback.name(),
                "unknown similarity strategy, using default"
            );
            fallback
        })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capability: score two labels in `0..=100`.
///
/// Implementations must be pure: the same inputs always give the same score.
pub trait SimilarityProvider {
    fn score(&self, a: &str, b: &str, strategy: Strategy) -> Result<u8, SimilarityError>;
}

impl<T: SimilarityProvider + ?Sized> SimilarityProvider for &T {
    fn score(&self, a: &str, b: &str, strategy: Strategy) -> Result<u8, SimilarityError> {
        (**self).score(a, b, strategy)
    }
}

/// Default provider backed by `rapidfuzz`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RapidfuzzSimilarity;

impl SimilarityProvider for RapidfuzzSimilarity {
    fn score(&self, a: &str, b: &str, strategy: Strategy) -> Result<u8, SimilarityError> {
        Ok(score(a, b, strategy))
    }
}

/// Scores two labels with the given strategy.
///
/// Returns 0 when either label is empty after processing.
pub fn score(a: &str, b: &str, strategy: Strategy) -> u8 {
    let a = full_process(a);
    let b = full_process(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let similarity = match strategy {
        Strategy::Ratio => ratio(&a, &b),
        Strategy::PartialRatio => partial_ratio(&a, &b),
        Strategy::TokenSortRatio => ratio(&token_sort(&a), &token_sort(&b)),
        Strategy::TokenSetRatio => token_set_ratio(&a, &b),
        Strategy::PartialTokenSortRatio => partial_ratio(&token_sort(&a), &token_sort(&b)),
        Strategy::PartialTokenSetRatio => partial_token_set_ratio(&a, &b),
        Strategy::TokenSimilaritySortRatio => {
            let (a, b) = token_similarity_sort(&a, &b);
            ratio(&a, &b)
        }
        Strategy::PartialTokenSimilaritySortRatio => {
            let (a, b) = token_similarity_sort(&a, &b);
            partial_ratio(&a, &b)
        }
        Strategy::WRatio => weighted_ratio(&a, &b),
        Strategy::JaroWinkler => jaro_winkler::similarity(a.chars(), b.chars()),
    };
    to_percent(similarity)
}

/// Lowercases, replaces every non-alphanumeric character with a space and trims.
pub fn full_process(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|ch| if ch.is_alphanumeric() { ch } else { ' ' })
        .collect();
    replaced.to_lowercase().trim().to_string()
}

fn to_percent(similarity: f64) -> u8 {
    (similarity.clamp(0.0, 1.0) * 100.0).round() as u8
}

fn ratio(a: &str, b: &str) -> f64 {
    indel::normalized_similarity(a.chars(), b.chars())
}

fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if shorter.is_empty() {
        return 0.0;
    }
    let mut best = 0.0_f64;
    for window in longer.windows(shorter.len()) {
        let similarity =
            indel::normalized_similarity(shorter.iter().copied(), window.iter().copied());
        if similarity > best {
            best = similarity;
            if best >= 1.0 {
                break;
            }
        }
    }
    best
}

fn token_sort(processed: &str) -> String {
    let mut tokens: Vec<&str> = processed.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_set_ratio(a: &str, b: &str) -> f64 {
    token_set(a, b, ratio)
}

fn partial_token_set_ratio(a: &str, b: &str) -> f64 {
    token_set(a, b, partial_ratio)
}

fn token_set(a: &str, b: &str, scorer: fn(&str, &str) -> f64) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    let sect = join_tokens(tokens_a.intersection(&tokens_b));
    let only_a = join_tokens(tokens_a.difference(&tokens_b));
    let only_b = join_tokens(tokens_b.difference(&tokens_a));

    let combined_a = combine(&sect, &only_a);
    let combined_b = combine(&sect, &only_b);

    [
        scorer(&sect, &combined_a),
        scorer(&sect, &combined_b),
        scorer(&combined_a, &combined_b),
    ]
    .into_iter()
    .fold(0.0, f64::max)
}

/// Pairs each word of the label with fewer words, in sorted order, with the
/// most similar unused word of the other label. Returns both labels
/// re-joined, the second with its paired words first.
fn token_similarity_sort(a: &str, b: &str) -> (String, String) {
    let mut fewer: Vec<&str> = a.split_whitespace().collect();
    let mut more: Vec<&str> = b.split_whitespace().collect();
    if fewer.len() > more.len() {
        std::mem::swap(&mut fewer, &mut more);
    }
    fewer.sort_unstable();
    more.sort_unstable();

    let mut ordered = Vec::with_capacity(more.len());
    for token in &fewer {
        let mut best: Option<(usize, f64)> = None;
        for (index, candidate) in more.iter().enumerate() {
            let similarity = ratio(token, candidate);
            if best.is_none_or(|(_, top)| similarity > top) {
                best = Some((index, similarity));
            }
        }
        if let Some((index, _)) = best {
            ordered.push(more.remove(index));
        }
    }
    ordered.extend(more);
    (fewer.join(" "), ordered.join(" "))
}

/// fuzzball's `WRatio`: partial scorers only count when one label is at
/// least 1.5 times longer, and are scaled down further past 8 times.
fn weighted_ratio(a: &str, b: &str) -> f64 {
    const UNBASE_SCALE: f64 = 0.95;

    let len_a = a.chars().count() as f64;
    let len_b = b.chars().count() as f64;
    let len_ratio = len_a.max(len_b) / len_a.min(len_b);
    let base = ratio(a, b);

    if len_ratio < 1.5 {
        let token = token_set_ratio(a, b).max(ratio(&token_sort(a), &token_sort(b)));
        return base.max(token * UNBASE_SCALE);
    }

    let partial_scale = if len_ratio > 8.0 { 0.6 } else { 0.9 };
    let partial = partial_ratio(a, b) * partial_scale;
    let partial_token = partial_ratio(&token_sort(a), &token_sort(b))
        .max(partial_token_set_ratio(a, b))
        * UNBASE_SCALE
        * partial_scale;
    base.max(partial).max(partial_token)
}

fn join_tokens<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

fn combine(sect: &str, rest: &str) -> String {
    match (sect.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_string(),
        (false, true) => sect.to_string(),
        (false, false) => format!("{sect} {rest}"),
    }
}
