use crate::{RecognitionError, SpeechError, Speaker, Transcriber, Transcript};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Plays back a script of transcripts, one per `listen`. An empty entry is
/// reported as unintelligible; an exhausted script as no speech.
pub struct MockTranscriber {
    script: VecDeque<String>,
}

impl MockTranscriber {
    pub fn new<I, S>(script: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: script.into_iter().map(Into::into).collect(),
        }
    }
}

impl Transcriber for MockTranscriber {
    fn name(&self) -> &str {
        "mock"
    }

    fn listen(&mut self) -> Result<Transcript, RecognitionError> {
        match self.script.pop_front() {
            Some(text) if text.trim().is_empty() => Err(RecognitionError::Unintelligible),
            Some(text) => Ok(Transcript::now(text)),
            None => Err(RecognitionError::NoSpeech),
        }
    }
}

/// Records what would have been spoken.
#[derive(Clone, Default)]
pub struct MockSpeaker {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl MockSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything spoken so far; shared with clones of this speaker.
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().clone()
    }
}

impl Speaker for MockSpeaker {
    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        self.spoken.lock().push(text.to_string());
        Ok(())
    }
}
