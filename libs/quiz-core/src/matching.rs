//! Free-text answer matching: normalization, then exact, then bounded
//! Levenshtein distance.

use serde::{Deserialize, Serialize};

/// Characters removed by [`Normalization::Punctuation`].
const PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '(', ')', '\'', '"', '-'];

/// How answers are cleaned up before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Strip the common punctuation set `.,;:!?()'"-`.
    Punctuation,
    /// Strip everything that is not alphanumeric, `_` or whitespace.
    NonWord,
}

impl Default for Normalization {
    fn default() -> Self {
        Self::Punctuation
    }
}

impl Normalization {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "punctuation" => Some(Self::Punctuation),
            "non_word" => Some(Self::NonWord),
            _ => None,
        }
    }

    /// Lowercase, strip, collapse whitespace runs and trim.
    pub fn apply(self, s: &str) -> String {
        let lowered = s.to_lowercase();
        let stripped: String = match self {
            Self::Punctuation => lowered.chars().filter(|c| !PUNCTUATION.contains(c)).collect(),
            Self::NonWord => lowered
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
                .collect(),
        };
        normalize_whitespace(&stripped)
    }
}

/// Maximum edit distance tolerated for a pair of strings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThresholdPolicy {
    /// `floor(len * (1 - min(0.8, 1 - 2/len)))`: two edits for short
    /// strings, growing to 20% of the length.
    Adaptive,
    /// `floor(len * ratio)`.
    Proportional { ratio: f64 },
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::Adaptive
    }
}

impl ThresholdPolicy {
    /// Flat 20% of the longer string.
    pub const fn proportional() -> Self {
        Self::Proportional { ratio: 0.2 }
    }

    /// Allowed distance when the longer of the two strings has `max_len` chars.
    pub fn allowed_distance(&self, max_len: usize) -> usize {
        if max_len == 0 {
            return 0;
        }
        let len = max_len as f64;
        let allowed = match self {
            Self::Adaptive => {
                let tolerance = (1.0 - 2.0 / len).min(0.8);
                len * (1.0 - tolerance)
            }
            Self::Proportional { ratio } => len * ratio,
        };
        // Absorb float error so 10 * (1 - 0.8) floors to 2, not 1.
        (allowed + 1e-9).floor().max(0.0) as usize
    }
}

/// Complete free-text matching policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchPolicy {
    pub threshold: ThresholdPolicy,
    pub normalization: Normalization,
    /// Strings this short (in chars) on either side must match exactly.
    pub short_exact_len: usize,
    /// Fuzzy matching is skipped for answers with more words than this.
    pub max_fuzzy_tokens: usize,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            threshold: ThresholdPolicy::default(),
            normalization: Normalization::default(),
            short_exact_len: 3,
            max_fuzzy_tokens: 3,
        }
    }
}

/// Which comparison accepted the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPass {
    Exact,
    Fuzzy,
    NoMatch,
}

/// Result of comparing a typed answer to the accepted answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// Whether the answer is considered correct.
    pub is_correct: bool,
    pub pass: MatchPass,
    /// Similarity to the closest accepted answer, 0.0 to 1.0.
    pub similarity: f64,
    /// Edit distance to the closest accepted answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_distance: Option<usize>,
    /// Index of the accepted answer that matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_index: Option<usize>,
    /// Normalized typed answer (for display).
    pub typed_normalized: String,
}

impl MatchResult {
    fn no_match(typed_normalized: String) -> Self {
        Self {
            is_correct: false,
            pass: MatchPass::NoMatch,
            similarity: 0.0,
            distance: None,
            allowed_distance: None,
            matched_index: None,
            typed_normalized,
        }
    }
}

/// Compare a typed answer against every accepted answer.
pub fn match_free_text<'a, I>(typed: &str, accepted: I, policy: &MatchPolicy) -> MatchResult
where
    I: IntoIterator<Item = &'a str>,
{
    let typed_normalized = policy.normalization.apply(typed);
    let candidates: Vec<String> = accepted
        .into_iter()
        .map(|answer| policy.normalization.apply(answer))
        .collect();

    if let Some(index) = candidates.iter().position(|c| *c == typed_normalized) {
        return MatchResult {
            is_correct: true,
            pass: MatchPass::Exact,
            similarity: 1.0,
            distance: Some(0),
            allowed_distance: None,
            matched_index: Some(index),
            typed_normalized,
        };
    }

    if typed_normalized.is_empty()
        || typed_normalized.split_whitespace().count() > policy.max_fuzzy_tokens
    {
        return MatchResult::no_match(typed_normalized);
    }

    let typed_len = typed_normalized.chars().count();
    let mut best = MatchResult::no_match(typed_normalized.clone());

    for (index, candidate) in candidates.iter().enumerate() {
        let candidate_len = candidate.chars().count();
        if candidate_len == 0 {
            continue;
        }

        let distance = levenshtein_distance(&typed_normalized, candidate);
        let max_len = typed_len.max(candidate_len);
        let similarity = 1.0 - (distance as f64 / max_len as f64);
        let allowed = if typed_len.min(candidate_len) <= policy.short_exact_len {
            0
        } else {
            policy.threshold.allowed_distance(max_len)
        };
        let accepted = distance > 0 && distance <= allowed;

        let better = match (accepted, best.is_correct) {
            (true, false) => true,
            (false, true) => false,
            _ => best.distance.map_or(true, |d| distance < d),
        };
        if better {
            best = MatchResult {
                is_correct: accepted,
                pass: if accepted { MatchPass::Fuzzy } else { MatchPass::NoMatch },
                similarity,
                distance: Some(distance),
                allowed_distance: Some(allowed),
                matched_index: accepted.then_some(index),
                typed_normalized: typed_normalized.clone(),
            };
        }
    }

    best
}

/// Normalize whitespace in a string (trim and collapse multiple spaces).
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Calculate Levenshtein distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rolling rows instead of the full matrix
    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;

        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);

            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Calculate normalized similarity (0.0 to 1.0) based on Levenshtein distance.
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein_distance(a, b);
    1.0 - (distance as f64 / max_len as f64)
}
