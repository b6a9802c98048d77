use crate::{Error, GestureSignal, HandLandmarks, Result, INDEX_TIP, THUMB_TIP};

/// Classifies a hand as open when thumb and index tips are spread apart.
#[derive(Clone, Copy, Debug)]
pub struct PinchClassifier {
    /// Manhattan distance (normalized coordinates) above which the hand counts as open
    pub threshold: f32,
}

impl Default for PinchClassifier {
    fn default() -> Self {
        Self { threshold: 0.15 }
    }
}

impl PinchClassifier {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Thumb-to-index spread of one hand.
    pub fn spread(&self, hand: &HandLandmarks) -> Result<f32> {
        if hand.points.len() <= INDEX_TIP {
            return Err(Error::TooFewLandmarks(hand.points.len()));
        }
        let index = hand.points[INDEX_TIP];
        let thumb = hand.points[THUMB_TIP];
        Ok((index.x - thumb.x).abs() + (index.y - thumb.y).abs())
    }

    pub fn classify(&self, hand: &HandLandmarks) -> Result<GestureSignal> {
        let d = self.spread(hand)?;
        Ok(if d > self.threshold {
            GestureSignal::Open
        } else {
            GestureSignal::Close
        })
    }
}
