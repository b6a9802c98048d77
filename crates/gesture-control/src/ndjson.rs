//! Landmark frames streamed as newline-delimited JSON by an external hand tracker.
//!
//! One frame per line: `{"hands":[{"points":[{"x":0.1,"y":0.2}, ...]}]}`.

use crate::{Error, GestureSource, HandFrame, Result};
use std::io::BufRead;
use time::OffsetDateTime;
use tracing::warn;

pub struct NdjsonSource<R> {
    reader: R,
    line: String,
}

impl<R: BufRead + Send> NdjsonSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
        }
    }
}

impl<R: BufRead + Send> GestureSource for NdjsonSource<R> {
    fn next_frame(&mut self) -> Result<Option<HandFrame>> {
        loop {
            self.line.clear();
            let n = self
                .reader
                .read_line(&mut self.line)
                .map_err(|e| Error::Io(e.to_string()))?;
            if n == 0 {
                return Ok(None);
            }
            // Skip empty lines
            if self.line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HandFrame>(&self.line) {
                Ok(mut frame) => {
                    frame.ts = Some(OffsetDateTime::now_utc());
                    return Ok(Some(frame));
                }
                Err(e) => {
                    warn!("bad landmark frame: {e}");
                    continue;
                }
            }
        }
    }
}
