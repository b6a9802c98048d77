use anyhow::Result;
use clap::ValueEnum;
use robot_protocol::DEFAULT_PORT;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleKind {
    /// Canned local answers
    Mock,
    /// Google Gemini over HTTP, needs GEMINI_API_KEY
    Gemini,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriberChoice {
    /// Scripted utterances
    Mock,
    /// External recognizer program
    Command,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub confidence_threshold: u8,
    pub oracle: OracleKind,
    pub gemini_model: String,
    pub oracle_timeout_secs: u64,
    pub transcriber: TranscriberChoice,
    /// Recognizer program and arguments for the `command` transcriber
    pub transcriber_command: Vec<String>,
    pub language: String,
    pub speech_rate: u32,
    pub pinch_threshold: f32,
    /// NDJSON landmark feed written by a hand tracker; scripted frames when unset
    pub gesture_feed: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "169.254.60.46".to_string(),
            port: DEFAULT_PORT,
            confidence_threshold: 70,
            oracle: OracleKind::Mock,
            gemini_model: "gemini-1.5-pro-latest".to_string(),
            oracle_timeout_secs: 20,
            transcriber: TranscriberChoice::Mock,
            transcriber_command: Vec::new(),
            language: "en".to_string(),
            speech_rate: 150,
            pinch_threshold: 0.15,
            gesture_feed: None,
        }
    }
}

impl Config {
    /// Reads `path`, or writes the defaults there when it does not exist yet.
    pub fn load(path: &str) -> Result<Self> {
        if std::path::Path::new(path).exists() {
            let contents = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            let config = Self::default();
            config.save(path)?;
            Ok(config)
        }
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn robot_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_brick() {
        let cfg = Config::default();
        assert_eq!(cfg.robot_addr(), "169.254.60.46:9999");
        assert_eq!(cfg.confidence_threshold, 70);
        assert_eq!(cfg.pinch_threshold, 0.15);
    }

    #[test]
    fn load_round_trips_saved_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("console.json");
        let path = path.to_str().unwrap();
        let mut cfg = Config::load(path).unwrap();
        cfg.host = "127.0.0.1".into();
        cfg.oracle = OracleKind::Gemini;
        cfg.save(path).unwrap();
        let back = Config::load(path).unwrap();
        assert_eq!(back.host, "127.0.0.1");
        assert_eq!(back.oracle, OracleKind::Gemini);
        assert_eq!(back.speech_rate, 150);
    }
}
