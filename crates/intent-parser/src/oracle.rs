//! Q&A oracle: an opaque text-to-text service answering non-command input

use thiserror::Error;
use tracing::warn;

/// Fixed reply used whenever the oracle cannot answer.
pub const APOLOGY: &str = "Sorry, I couldn't process your request.";

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle request failed: {0}")]
    Request(String),
    #[error("oracle timed out")]
    Timeout,
    #[error("oracle returned no usable text")]
    Empty,
    #[error("oracle not configured: {0}")]
    NotConfigured(String),
}

/// Blocking question-answering backend.
pub trait QaOracle: Send + Sync {
    fn name(&self) -> &str;

    /// Answer a prompt. Replies are returned trimmed.
    fn ask(&self, prompt: &str) -> Result<String, OracleError>;
}

/// Ask the oracle, falling back to [`APOLOGY`] on any failure.
pub fn answer_or_apologize(oracle: &dyn QaOracle, prompt: &str) -> String {
    match oracle.ask(prompt) {
        Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
        Ok(_) => {
            warn!(oracle = oracle.name(), "empty oracle reply");
            APOLOGY.to_string()
        }
        Err(e) => {
            warn!(oracle = oracle.name(), error = %e, "oracle failed");
            APOLOGY.to_string()
        }
    }
}

#[cfg(feature = "mock")]
mod mock {
    use super::{OracleError, QaOracle};
    use parking_lot::Mutex;

    enum Reply {
        Canned(String),
        Echo,
        Fail,
    }

    /// Oracle with a fixed behaviour that remembers every prompt it was given.
    pub struct MockOracle {
        reply: Reply,
        prompts: Mutex<Vec<String>>,
    }

    impl MockOracle {
        pub fn canned(reply: impl Into<String>) -> Self {
            Self::with(Reply::Canned(reply.into()))
        }

        pub fn echo() -> Self {
            Self::with(Reply::Echo)
        }

        pub fn failing() -> Self {
            Self::with(Reply::Fail)
        }

        fn with(reply: Reply) -> Self {
            Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().clone()
        }
    }

    impl QaOracle for MockOracle {
        fn name(&self) -> &str {
            "mock"
        }

        fn ask(&self, prompt: &str) -> Result<String, OracleError> {
            self.prompts.lock().push(prompt.to_string());
            match &self.reply {
                Reply::Canned(text) => Ok(text.trim().to_string()),
                Reply::Echo => Ok(format!("You asked: {}", prompt.trim())),
                Reply::Fail => Err(OracleError::Timeout),
            }
        }
    }
}

#[cfg(feature = "mock")]
pub use mock::MockOracle;
