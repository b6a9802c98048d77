use crate::{GestureSource, HandFrame, Result};
use std::collections::VecDeque;
use time::OffsetDateTime;

/// Replays a fixed list of frames, then reports the camera as closed.
pub struct MockGestureSource {
    frames: VecDeque<HandFrame>,
    delivered: usize,
}

impl MockGestureSource {
    pub fn new(frames: impl IntoIterator<Item = HandFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            delivered: 0,
        }
    }

    pub fn delivered(&self) -> usize {
        self.delivered
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl GestureSource for MockGestureSource {
    fn next_frame(&mut self) -> Result<Option<HandFrame>> {
        Ok(self.frames.pop_front().map(|mut f| {
            self.delivered += 1;
            f.ts = Some(OffsetDateTime::now_utc());
            f
        }))
    }
}
