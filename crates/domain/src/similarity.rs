//! Shingle-based near-duplicate detection
//!
//! Candidates are fingerprinted as sets of contiguous character n-grams
//! ("shingles") after stripping all whitespace, and compared against recent
//! history with Jaccard similarity. Only the most recent `window` entries are
//! checked; older duplicates are never caught, which trades thoroughness for
//! speed.

use std::collections::HashSet;

/// Configuration for the similarity check
#[derive(Debug, Clone)]
pub struct SimilarityConfig {
    /// Jaccard score at or above which a candidate counts as a duplicate
    pub threshold: f64,
    /// How many of the most recent history entries to compare against
    pub window: usize,
    /// Shingle length in characters
    pub shingle_len: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            threshold: 0.9,
            window: 30,
            shingle_len: 4,
        }
    }
}

/// Build the shingle set of a text: all contiguous `shingle_len`-character
/// substrings after removing whitespace. A text shorter than `shingle_len`
/// (including the empty text) contributes itself as a single shingle.
pub fn shingle_set(text: &str, shingle_len: usize) -> HashSet<String> {
    let stripped: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();

    if stripped.len() < shingle_len.max(1) {
        let mut set = HashSet::with_capacity(1);
        set.insert(stripped.iter().collect());
        return set;
    }

    stripped
        .windows(shingle_len.max(1))
        .map(|w| w.iter().collect())
        .collect()
}

/// Jaccard similarity of two shingle sets. The union size is floored at 1 so
/// two empty sets never divide by zero.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.union(b).count().max(1);
    intersection as f64 / union as f64
}

/// True when the candidate scores at or above the threshold against any of
/// the last `window` history entries. Deterministic for fixed inputs.
pub fn is_near_duplicate(candidate: &str, history: &[String], config: &SimilarityConfig) -> bool {
    let candidate_shingles = shingle_set(candidate, config.shingle_len);

    history
        .iter()
        .rev()
        .take(config.window)
        .any(|previous| {
            let previous_shingles = shingle_set(previous, config.shingle_len);
            jaccard(&candidate_shingles, &previous_shingles) >= config.threshold
        })
}
