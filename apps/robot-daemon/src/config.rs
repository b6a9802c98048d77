use anyhow::Result;
use clap::ValueEnum;
use robot_control::Ev3devPorts;
use robot_protocol::DEFAULT_PORT;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// In-process robot with random sensor readings
    Mock,
    /// Motors and sensors through ev3dev sysfs
    Ev3dev,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub backend: Backend,
    /// Multiplier for every actuation window
    pub time_scale: f64,
    pub ev3dev: Ev3devPorts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            backend: Backend::Mock,
            time_scale: 1.0,
            ev3dev: Ev3devPorts::default(),
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

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gets_defaults_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.json");
        let path = path.to_str().unwrap();
        let cfg = Config::load(path).unwrap();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:9999");
        assert_eq!(cfg.backend, Backend::Mock);
        assert!(std::path::Path::new(path).exists());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.json");
        fs::write(&path, r#"{"backend":"ev3dev","ev3dev":{"left":"outD"}}"#).unwrap();
        let cfg = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.backend, Backend::Ev3dev);
        assert_eq!(cfg.ev3dev.left, "outD");
        assert_eq!(cfg.ev3dev.right, "outC");
        assert_eq!(cfg.port, 9999);
        assert_eq!(cfg.time_scale, 1.0);
    }
}
