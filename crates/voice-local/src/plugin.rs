#[cfg(feature = "mock")]
use crate::MockTranscriber;
use crate::{
    CommandSpeaker, CommandTranscriber, MuteSpeaker, Speaker, SpeakerConfig, Transcriber,
    TranscriberConfig,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TranscriberKind {
    Mock,
    Command,
}

pub fn new_transcriber(
    kind: TranscriberKind,
    cfg: &TranscriberConfig,
) -> Result<Box<dyn Transcriber>, String> {
    match kind {
        TranscriberKind::Mock => {
            #[cfg(feature = "mock")]
            {
                Ok(Box::new(MockTranscriber::new([
                    "move forward",
                    "what is the distance",
                    "tell me a joke",
                ])))
            }
            #[cfg(not(feature = "mock"))]
            {
                Err("mock feature not enabled".into())
            }
        }
        TranscriberKind::Command => CommandTranscriber::new(cfg)
            .map(|t| Box::new(t) as Box<dyn Transcriber>)
            .map_err(|e| e.to_string()),
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SpeakerKind {
    Mute,
    Command,
}

pub fn new_speaker(kind: SpeakerKind, cfg: &SpeakerConfig) -> Result<Box<dyn Speaker>, String> {
    match kind {
        SpeakerKind::Mute => Ok(Box::new(MuteSpeaker)),
        SpeakerKind::Command => CommandSpeaker::new(cfg)
            .map(|s| Box::new(s) as Box<dyn Speaker>)
            .map_err(|e| e.to_string()),
    }
}
