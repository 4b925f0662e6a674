//! ROUGE overlap scores between a summary and its reference.
//!
//! Tokens are lowercase alphanumeric runs; everything else separates them.
//!
//! | Metric      | Unit                                              |
//! |-------------|---------------------------------------------------|
//! | `rouge1`    | unigram overlap                                   |
//! | `rouge2`    | bigram overlap                                    |
//! | `rougeL`    | longest common subsequence over the whole text    |
//! | `rougeLsum` | union LCS, one sentence per line                  |
//!
//! Each metric is reported as precision, recall, and their harmonic mean.

use std::collections::{BTreeMap, HashMap, HashSet};

/// Metric keys in report order.
pub const ROUGE_METRICS: [&str; 4] = ["rouge1", "rouge2", "rougeL", "rougeLsum"];

/// Precision, recall, and F-measure for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Score {
    /// Matched units over candidate units.
    pub precision: f64,
    /// Matched units over reference units.
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub fmeasure: f64,
}

impl Score {
    fn from_counts(matched: usize, candidate: usize, reference: usize) -> Self {
        let precision = ratio(matched, candidate);
        let recall = ratio(matched, reference);
        let fmeasure = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            precision,
            recall,
            fmeasure,
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn ngrams(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    for gram in tokens.windows(n) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

fn ngram_score(candidate: &[String], reference: &[String], n: usize) -> Score {
    let cand = ngrams(candidate, n);
    let refs = ngrams(reference, n);
    let matched = cand
        .iter()
        .map(|(gram, &count)| count.min(refs.get(gram).copied().unwrap_or(0)))
        .sum();
    Score::from_counts(
        matched,
        cand.values().sum(),
        refs.values().sum(),
    )
}

fn lcs_len(a: &[String], b: &[String]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Positions in `a` that belong to one longest common subsequence with `b`.
fn lcs_positions(a: &[String], b: &[String]) -> Vec<usize> {
    let (n, m) = (a.len(), b.len());
    let mut table = vec![vec![0usize; m + 1]; n + 1];
    for i in 0..n {
        for j in 0..m {
            table[i + 1][j + 1] = if a[i] == b[j] {
                table[i][j] + 1
            } else {
                table[i][j + 1].max(table[i + 1][j])
            };
        }
    }

    let mut positions = Vec::new();
    let (mut i, mut j) = (n, m);
    while i > 0 && j > 0 {
        if a[i - 1] == b[j - 1] {
            positions.push(i - 1);
            i -= 1;
            j -= 1;
        } else if table[i - 1][j] >= table[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    positions.reverse();
    positions
}

fn lcs_score(candidate: &[String], reference: &[String]) -> Score {
    Score::from_counts(
        lcs_len(candidate, reference),
        candidate.len(),
        reference.len(),
    )
}

/// Summary-level LCS: for each reference sentence, the union of its LCS
/// hits over all candidate sentences, with token counts clipped.
fn lcs_sum_score(candidate: &str, reference: &str) -> Score {
    let split = |text: &str| -> Vec<Vec<String>> {
        text.lines()
            .map(tokenize)
            .filter(|sentence| !sentence.is_empty())
            .collect()
    };
    let cand = split(candidate);
    let refs = split(reference);

    let count = |sentences: &[Vec<String>]| {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for token in sentences.iter().flatten() {
            *counts.entry(token.clone()).or_insert(0) += 1;
        }
        counts
    };
    let mut cand_left = count(&cand);
    let mut ref_left = count(&refs);

    let mut hits = 0;
    for reference in &refs {
        let mut union: HashSet<usize> = HashSet::new();
        for sentence in &cand {
            union.extend(lcs_positions(reference, sentence));
        }
        let mut union: Vec<usize> = union.into_iter().collect();
        union.sort_unstable();
        for position in union {
            let token = &reference[position];
            match (cand_left.get_mut(token), ref_left.get_mut(token)) {
                (Some(c), Some(r)) if *c > 0 && *r > 0 => {
                    *c -= 1;
                    *r -= 1;
                    hits += 1;
                }
                _ => {}
            }
        }
    }

    Score::from_counts(
        hits,
        cand.iter().map(Vec::len).sum(),
        refs.iter().map(Vec::len).sum(),
    )
}

/// All four metrics with precision and recall.
#[must_use]
pub fn rouge_scores(candidate: &str, reference: &str) -> BTreeMap<String, Score> {
    let cand = tokenize(candidate);
    let refs = tokenize(reference);
    let mut scores = BTreeMap::new();
    scores.insert("rouge1".to_string(), ngram_score(&cand, &refs, 1));
    scores.insert("rouge2".to_string(), ngram_score(&cand, &refs, 2));
    scores.insert("rougeL".to_string(), lcs_score(&cand, &refs));
    scores.insert("rougeLsum".to_string(), lcs_sum_score(candidate, reference));
    scores
}

/// F-measure for each metric, each in `[0, 1]`.
///
/// ```rust
/// use condense::rouge;
///
/// let scores = rouge("the cat sat", "the cat sat on the mat");
/// assert_eq!(scores["rouge1"], 2.0 * 1.0 * 0.5 / 1.5);
/// assert_eq!(scores.len(), 4);
/// ```
#[must_use]
pub fn rouge(candidate: &str, reference: &str) -> BTreeMap<String, f64> {
    rouge_scores(candidate, reference)
        .into_iter()
        .map(|(metric, score)| (metric, score.fmeasure))
        .collect()
}
