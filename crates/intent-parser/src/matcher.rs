//! String similarity scoring on a 0-100 scale
//!
//! Scores are built from the indel similarity of two strings (twice the longest
//! common subsequence over the combined length) and two refinements for noisy
//! speech: a windowed partial match when one string is much longer than the other,
//! and a word-set match so that filler words around a command are ignored.

use regex::Regex;
use std::collections::BTreeSet;

/// Scale applied to windowed partial matches.
const PARTIAL_SCALE: f64 = 0.9;
/// Scale applied to word-set matches.
const TOKEN_SCALE: f64 = 0.95;
/// Length ratio from which partial matching is considered.
const PARTIAL_LEN_RATIO: f64 = 1.5;

/// Scores utterances against vocabulary words.
pub struct Scorer {
    separators: Regex,
}

impl Scorer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            separators: Regex::new(r"[^a-z0-9]+")?,
        })
    }

    /// Lowercase, collapse every non-alphanumeric run into one space, trim.
    pub fn normalize(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        self.separators.replace_all(&lower, " ").trim().to_string()
    }

    /// Weighted similarity of `text` and `candidate`, always within 0..=100.
    pub fn score(&self, text: &str, candidate: &str) -> u8 {
        let a = self.normalize(text);
        let b = self.normalize(candidate);
        if a.is_empty() || b.is_empty() {
            return 0;
        }

        let mut best = f64::from(ratio(&a, &b));
        best = best.max(f64::from(token_set_ratio(&a, &b)) * TOKEN_SCALE);

        let (short, long) = if a.chars().count() <= b.chars().count() {
            (&a, &b)
        } else {
            (&b, &a)
        };
        let len_ratio = long.chars().count() as f64 / short.chars().count() as f64;
        if len_ratio >= PARTIAL_LEN_RATIO {
            best = best.max(f64::from(partial_ratio(short, long)) * PARTIAL_SCALE);
        }

        best.round().clamp(0.0, 100.0) as u8
    }
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

fn ratio_chars(a: &[char], b: &[char]) -> u8 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0;
    }
    let matched = lcs_len(a, b);
    ((200 * matched) as f64 / total as f64).round() as u8
}

/// Indel similarity: 100 for identical strings, 0 when nothing is shared.
pub fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

/// Best [`ratio`] of the shorter string against every equally long window of the longer.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0;
    }
    long.windows(short.len())
        .map(|w| ratio_chars(&short, w))
        .max()
        .unwrap_or(0)
}

/// Compares the sorted shared words against each side's full sorted word set.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let ta: BTreeSet<&str> = a.split_whitespace().collect();
    let tb: BTreeSet<&str> = b.split_whitespace().collect();

    let sect = join(ta.intersection(&tb).copied());
    let only_a = join(ta.difference(&tb).copied());
    let only_b = join(tb.difference(&ta).copied());

    let combined_a = format!("{sect} {only_a}").trim().to_string();
    let combined_b = format!("{sect} {only_b}").trim().to_string();

    ratio(&sect, &combined_a)
        .max(ratio(&sect, &combined_b))
        .max(ratio(&combined_a, &combined_b))
}

fn join<'a>(words: impl Iterator<Item = &'a str>) -> String {
    words.collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_full_marks() {
        let scorer = Scorer::new().unwrap();
        assert_eq!(scorer.score("forward", "forward"), 100);
        assert_eq!(scorer.score("  Forward! ", "forward"), 100);
    }

    #[test]
    fn ratio_counts_common_subsequence() {
        // "forwad" shares six characters with "forward": 2*6/13
        assert_eq!(ratio("forwad", "forward"), 92);
        assert_eq!(ratio("abc", "xyz"), 0);
        assert_eq!(ratio("", ""), 0);
    }

    #[test]
    fn filler_words_do_not_hide_the_command() {
        assert_eq!(token_set_ratio("please move forward now", "forward"), 100);
        let scorer = Scorer::new().unwrap();
        assert_eq!(scorer.score("please move forward now", "forward"), 95);
    }

    #[test]
    fn partial_ratio_finds_embedded_word() {
        assert_eq!(partial_ratio("xxforwardxx", "forward"), 100);
        assert_eq!(partial_ratio("", "forward"), 0);
    }

    #[test]
    fn empty_or_punctuation_only_input_scores_zero() {
        let scorer = Scorer::new().unwrap();
        assert_eq!(scorer.score("", "stop"), 0);
        assert_eq!(scorer.score("?!...", "stop"), 0);
    }

    #[test]
    fn scores_stay_within_bounds() {
        let scorer = Scorer::new().unwrap();
        let inputs = vec![
            String::new(),
            "a".to_string(),
            "stop stop stop stop".to_string(),
            "the quick brown fox jumps over the lazy dog".to_string(),
            "🤖 robot, turn LEFT!!".to_string(),
            "x".repeat(300),
        ];
        for text in &inputs {
            for word in ["forward", "left", "history", "exit"] {
                let s = scorer.score(text, word);
                assert!(s <= 100, "{text:?} vs {word}: {s}");
            }
        }
    }
}
