//! Gemini `generateContent` client used as the Q&A oracle.

use crate::{OracleError, QaOracle};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiOracle {
    model: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl GeminiOracle {
    pub fn new(model: &str, api_key: String, timeout: Duration) -> Result<Self, OracleError> {
        if api_key.trim().is_empty() {
            return Err(OracleError::NotConfigured("empty API key".into()));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::Request(e.to_string()))?;
        Ok(Self {
            model: model.to_string(),
            api_key,
            client,
        })
    }

    /// Read the key from `GEMINI_API_KEY`.
    pub fn from_env(model: &str, timeout: Duration) -> Result<Self, OracleError> {
        let key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| OracleError::NotConfigured("GEMINI_API_KEY not set".into()))?;
        Self::new(model, key, timeout)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<PartReq<'a>>,
}

#[derive(Serialize)]
struct PartReq<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartResp>,
}

#[derive(Deserialize)]
struct PartResp {
    #[serde(default)]
    text: String,
}

impl QaOracle for GeminiOracle {
    fn name(&self) -> &str {
        "gemini"
    }

    fn ask(&self, prompt: &str) -> Result<String, OracleError> {
        let url = format!("{ENDPOINT}/{}:generateContent", self.model);
        let req = GenerateRequest {
            contents: vec![Content {
                parts: vec![PartReq { text: prompt }],
            }],
        };

        let start = std::time::Instant::now();
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&req)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout
                } else {
                    OracleError::Request(e.to_string())
                }
            })?;

        if !resp.status().is_success() {
            return Err(OracleError::Request(format!("HTTP {}", resp.status())));
        }

        let body: GenerateResponse = resp
            .json()
            .map_err(|e| OracleError::Request(e.to_string()))?;
        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        debug!(
            model = %self.model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "gemini replied"
        );
        let text = text.trim();
        if text.is_empty() {
            return Err(OracleError::Empty);
        }
        Ok(text.to_string())
    }
}
