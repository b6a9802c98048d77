//! Normalizer for free-form operator input

use crate::{IntentConfig, IntentError, Scorer};
use robot_protocol::CanonicalCommand;
use tracing::debug;

/// Result of matching an utterance against the vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    /// Set only when `score` reaches the confidence threshold
    pub best_command: Option<CanonicalCommand>,
    /// Similarity of the closest command (0 to 100)
    pub score: u8,
}

/// Where an utterance should go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Confident match: send this command to the robot
    Command(CanonicalCommand, u8),
    /// Not a command: ask the oracle with the raw utterance
    Oracle(String),
}

/// Maps utterances onto the canonical command set
pub struct Normalizer {
    config: IntentConfig,
    scorer: Scorer,
}

impl Normalizer {
    /// Create a new normalizer
    pub fn new(config: IntentConfig) -> Result<Self, IntentError> {
        if config.confidence_threshold > 100 {
            return Err(IntentError::Threshold(config.confidence_threshold));
        }
        Ok(Self {
            config,
            scorer: Scorer::new()?,
        })
    }

    pub fn threshold(&self) -> u8 {
        self.config.confidence_threshold
    }

    /// Every command with its score, best first. Equal scores keep vocabulary order.
    pub fn rank(&self, utterance: &str) -> Vec<(CanonicalCommand, u8)> {
        let mut ranked: Vec<_> = CanonicalCommand::ALL
            .into_iter()
            .map(|cmd| (cmd, self.scorer.score(utterance, cmd.as_str())))
            .collect();
        // Stable sort keeps declaration order among ties
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// The single closest command and its score, regardless of threshold.
    pub fn closest(&self, utterance: &str) -> (CanonicalCommand, u8) {
        let mut best = (CanonicalCommand::ALL[0], 0u8);
        for cmd in CanonicalCommand::ALL {
            let score = self.scorer.score(utterance, cmd.as_str());
            if score > best.1 {
                best = (cmd, score);
            }
        }
        best
    }

    /// Apply the confidence threshold to the closest command.
    pub fn best_match(&self, utterance: &str) -> MatchResult {
        let (cmd, score) = self.closest(utterance);
        let best_command = (score > 0 && score >= self.config.confidence_threshold).then_some(cmd);
        MatchResult {
            best_command,
            score,
        }
    }

    /// Decide whether an utterance is a robot command or a question for the oracle.
    pub fn route(&self, utterance: &str) -> Route {
        let result = self.best_match(utterance);
        if tracing::enabled!(tracing::Level::DEBUG) {
            let alternatives: Vec<String> = self
                .rank(utterance)
                .into_iter()
                .take(self.config.max_alternatives)
                .map(|(c, s)| format!("{c}={s}"))
                .collect();
            debug!(utterance, score = result.score, ?alternatives, "scored utterance");
        }
        match result.best_command {
            Some(cmd) => Route::Command(cmd, result.score),
            None => Route::Oracle(utterance.to_string()),
        }
    }
}
