#![allow(dead_code)]
//! Intent Parser for operator input
//!
//! This crate turns noisy natural-language input (speech transcripts, typed text)
//! into one of the robot's canonical commands, or decides that the input is a
//! question for the Q&A oracle instead.

mod matcher;
mod oracle;
mod parser;

#[cfg(feature = "gemini")]
mod gemini;

pub use matcher::{partial_ratio, ratio, token_set_ratio, Scorer};
#[cfg(feature = "mock")]
pub use oracle::MockOracle;
pub use oracle::{answer_or_apologize, OracleError, QaOracle, APOLOGY};
pub use parser::{MatchResult, Normalizer, Route};

#[cfg(feature = "gemini")]
pub use gemini::GeminiOracle;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for input normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentConfig {
    /// Minimum score (0-100) for accepting a command interpretation
    #[serde(default = "default_threshold")]
    pub confidence_threshold: u8,
    /// Number of runner-up interpretations to log alongside the best one
    #[serde(default = "default_alternatives")]
    pub max_alternatives: usize,
}

fn default_threshold() -> u8 {
    70
}

fn default_alternatives() -> usize {
    3
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_threshold(),
            max_alternatives: default_alternatives(),
        }
    }
}

#[derive(Debug, Error)]
pub enum IntentError {
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("confidence threshold {0} outside 0..=100")]
    Threshold(u8),
}

#[cfg(test)]
mod tests {
    use super::*;
    use robot_protocol::CanonicalCommand;

    #[test]
    fn test_basic_utterances() {
        let cases = [
            ("forward", Some(CanonicalCommand::Forward)),
            ("go backward", Some(CanonicalCommand::Backward)),
            ("please open the claw", Some(CanonicalCommand::Open)),
            ("who built you", None),
            ("tell me a joke", None),
        ];

        let normalizer = Normalizer::new(IntentConfig::default()).unwrap();
        for (text, expected) in cases {
            let route = normalizer.route(text);
            match (route, expected) {
                (Route::Command(cmd, score), Some(want)) => {
                    assert_eq!(cmd, want, "'{text}'");
                    assert!(score >= 70);
                }
                (Route::Oracle(raw), None) => assert_eq!(raw, text),
                (other, _) => panic!("'{text}' routed to {other:?}"),
            }
        }
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let cfg: IntentConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.confidence_threshold, 70);
        assert_eq!(cfg.max_alternatives, 3);
    }
}
