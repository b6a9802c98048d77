use thiserror::Error;

/// Failure to turn captured speech into text. Never fatal to a session.
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("no speech captured")]
    NoSpeech,
    #[error("speech not understood")]
    Unintelligible,
    #[error("recognizer backend error: {0}")]
    Backend(String),
    #[error("I/O error: {0}")]
    Io(String),
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("synthesizer backend error: {0}")]
    Backend(String),
    #[error("I/O error: {0}")]
    Io(String),
}
