use crate::UnknownCommand;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Default TCP port the robot listens on.
pub const DEFAULT_PORT: u16 = 9999;

/// Upper bound for a single request or response payload.
pub const MAX_MESSAGE_LEN: usize = 1024;

/// Response text that tells the operator the robot is tearing the session down.
pub const EXIT_SENTINEL: &str = "exit";

/// The fixed command vocabulary understood by the robot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalCommand {
    Forward,
    Backward,
    Left,
    Right,
    Open,
    Close,
    Distance,
    Color,
    Angle,
    Stop,
    History,
    Exit,
}

impl CanonicalCommand {
    /// Every command in declaration order. Fuzzy matching breaks ties by this order.
    pub const ALL: [CanonicalCommand; 12] = [
        CanonicalCommand::Forward,
        CanonicalCommand::Backward,
        CanonicalCommand::Left,
        CanonicalCommand::Right,
        CanonicalCommand::Open,
        CanonicalCommand::Close,
        CanonicalCommand::Distance,
        CanonicalCommand::Color,
        CanonicalCommand::Angle,
        CanonicalCommand::Stop,
        CanonicalCommand::History,
        CanonicalCommand::Exit,
    ];

    /// The lowercase wire token.
    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalCommand::Forward => "forward",
            CanonicalCommand::Backward => "backward",
            CanonicalCommand::Left => "left",
            CanonicalCommand::Right => "right",
            CanonicalCommand::Open => "open",
            CanonicalCommand::Close => "close",
            CanonicalCommand::Distance => "distance",
            CanonicalCommand::Color => "color",
            CanonicalCommand::Angle => "angle",
            CanonicalCommand::Stop => "stop",
            CanonicalCommand::History => "history",
            CanonicalCommand::Exit => "exit",
        }
    }
}

impl fmt::Display for CanonicalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        CanonicalCommand::ALL
            .into_iter()
            .find(|c| c.as_str() == token)
            .ok_or_else(|| UnknownCommand(token.to_string()))
    }
}
