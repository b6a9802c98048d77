use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriberConfig {
    pub language: Option<String>,
    /// External recognizer: program followed by its arguments. It must print the
    /// transcript of one utterance on stdout and exit.
    #[serde(default)]
    pub command: Vec<String>,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            language: Some("en".to_string()),
            command: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub ts: Option<OffsetDateTime>,
}

impl Transcript {
    pub fn now(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ts: Some(OffsetDateTime::now_utc()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerConfig {
    /// Speaking rate in words per minute
    #[serde(default = "default_rate")]
    pub rate_wpm: u32,
    pub voice: Option<String>,
    /// Synthesizer program and arguments. `{rate}` is replaced by `rate_wpm` and
    /// `{voice}` by the voice name; the text is appended as the last argument.
    #[serde(default = "default_speaker_command")]
    pub command: Vec<String>,
}

fn default_rate() -> u32 {
    150
}

fn default_speaker_command() -> Vec<String> {
    vec!["espeak".to_string(), "-s".to_string(), "{rate}".to_string()]
}

impl Default for SpeakerConfig {
    fn default() -> Self {
        Self {
            rate_wpm: default_rate(),
            voice: None,
            command: default_speaker_command(),
        }
    }
}
