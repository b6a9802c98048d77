//! Backends that delegate to external programs.

use crate::{
    RecognitionError, SpeakerConfig, SpeechError, Speaker, Transcriber, TranscriberConfig,
    Transcript,
};
use std::process::Command;
use tracing::debug;

/// Runs an external recognizer once per utterance and reads the transcript from stdout.
pub struct CommandTranscriber {
    program: String,
    args: Vec<String>,
}

impl CommandTranscriber {
    pub fn new(cfg: &TranscriberConfig) -> Result<Self, RecognitionError> {
        let (program, args) = cfg
            .command
            .split_first()
            .ok_or_else(|| RecognitionError::Backend("no recognizer command configured".into()))?;
        let mut args = args.to_vec();
        if let Some(lang) = &cfg.language {
            for a in args.iter_mut() {
                *a = a.replace("{language}", lang);
            }
        }
        Ok(Self {
            program: program.clone(),
            args,
        })
    }
}

impl Transcriber for CommandTranscriber {
    fn name(&self) -> &str {
        &self.program
    }

    fn listen(&mut self) -> Result<Transcript, RecognitionError> {
        debug!(program = %self.program, "running recognizer");
        let out = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| RecognitionError::Io(e.to_string()))?;
        if !out.status.success() {
            return Err(RecognitionError::Backend(format!(
                "{} exited with status {:?}",
                self.program,
                out.status.code()
            )));
        }
        let text = String::from_utf8_lossy(&out.stdout).trim().to_string();
        if text.is_empty() {
            return Err(RecognitionError::NoSpeech);
        }
        Ok(Transcript::now(text))
    }
}

/// Speaks through an external synthesizer such as `espeak`.
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
}

impl CommandSpeaker {
    pub fn new(cfg: &SpeakerConfig) -> Result<Self, SpeechError> {
        let (program, args) = cfg
            .command
            .split_first()
            .ok_or_else(|| SpeechError::Backend("no synthesizer command configured".into()))?;
        let rate = cfg.rate_wpm.to_string();
        let voice = cfg.voice.clone().unwrap_or_default();
        let args = args
            .iter()
            .map(|a| a.replace("{rate}", &rate).replace("{voice}", &voice))
            .collect();
        Ok(Self {
            program: program.clone(),
            args,
        })
    }

    pub fn argv(&self, text: &str) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 2);
        argv.push(self.program.clone());
        argv.extend(self.args.iter().cloned());
        argv.push(text.to_string());
        argv
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .status()
            .map_err(|e| SpeechError::Io(e.to_string()))?;
        if !status.success() {
            return Err(SpeechError::Backend(format!(
                "{} exited with status {:?}",
                self.program,
                status.code()
            )));
        }
        Ok(())
    }
}

/// Speaks nothing.
#[derive(Default)]
pub struct MuteSpeaker;

impl Speaker for MuteSpeaker {
    fn speak(&mut self, _text: &str) -> Result<(), SpeechError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speaker_substitutes_rate_and_appends_text() {
        let speaker = CommandSpeaker::new(&SpeakerConfig::default()).unwrap();
        assert_eq!(
            speaker.argv("Moved forward"),
            vec!["espeak", "-s", "150", "Moved forward"]
        );
    }

    #[test]
    fn transcriber_requires_a_command() {
        let cfg = TranscriberConfig::default();
        assert!(matches!(
            CommandTranscriber::new(&cfg),
            Err(RecognitionError::Backend(_))
        ));
    }

    #[test]
    fn speaker_config_defaults_from_empty_json() {
        let cfg: SpeakerConfig = serde_json::from_str(r#"{"voice": null}"#).unwrap();
        assert_eq!(cfg.rate_wpm, 150);
        assert_eq!(cfg.command[0], "espeak");
    }
}
