use crate::{RecognitionError, SpeechError, Transcript};

/// Captures and transcribes exactly one utterance per call.
pub trait Transcriber: Send {
    fn name(&self) -> &str;

    /// Blocks until one utterance has been captured and transcribed.
    fn listen(&mut self) -> Result<Transcript, RecognitionError>;
}

pub trait Speaker: Send {
    /// Speak `text`, blocking until playback finishes.
    fn speak(&mut self, text: &str) -> Result<(), SpeechError>;
}
