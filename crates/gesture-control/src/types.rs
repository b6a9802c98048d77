use robot_protocol::CanonicalCommand;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Landmark index of the thumb tip in the 21-point hand model.
pub const THUMB_TIP: usize = 4;
/// Landmark index of the index-finger tip.
pub const INDEX_TIP: usize = 8;

/// Normalized image coordinates (0..1) of one hand keypoint.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandLandmarks {
    pub points: Vec<Landmark>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HandFrame {
    #[serde(default)]
    pub hands: Vec<HandLandmarks>,
    #[serde(skip)]
    pub ts: Option<OffsetDateTime>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GestureSignal {
    Open,
    Close,
}

impl GestureSignal {
    pub fn command(self) -> CanonicalCommand {
        match self {
            GestureSignal::Open => CanonicalCommand::Open,
            GestureSignal::Close => CanonicalCommand::Close,
        }
    }
}
