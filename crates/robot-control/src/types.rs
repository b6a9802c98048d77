use core::fmt;
use robot_protocol::{CanonicalCommand, EXIT_SENTINEL};
use serde::{Deserialize, Serialize};

/// Logical actuators of the robot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotorPort {
    /// Left traction motor
    Left,
    /// Right traction motor
    Right,
    /// Claw motor
    Gripper,
}

impl MotorPort {
    pub const ALL: [MotorPort; 3] = [MotorPort::Left, MotorPort::Right, MotorPort::Gripper];
}

impl fmt::Display for MotorPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MotorPort::Left => "left",
            MotorPort::Right => "right",
            MotorPort::Gripper => "gripper",
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Ultrasonic,
    Color,
    Gyro,
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SensorKind::Ultrasonic => "ultrasonic",
            SensorKind::Color => "color",
            SensorKind::Gyro => "gyro",
        })
    }
}

/// Motor power as a percentage of maximum speed, negative for reverse.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SpeedPercent(i8);

impl SpeedPercent {
    /// Values outside -100..=100 are clamped.
    pub fn new(percent: i8) -> Self {
        Self(percent.clamp(-100, 100))
    }

    pub fn get(self) -> i8 {
        self.0
    }
}

const COLOR_NAMES: [&str; 8] = [
    "No color", "Black", "Blue", "Green", "Yellow", "Red", "White", "Brown",
];

/// Name for a color sensor code; anything outside the table is "Unknown".
pub fn color_name(code: i32) -> &'static str {
    usize::try_from(code)
        .ok()
        .and_then(|i| COLOR_NAMES.get(i).copied())
        .unwrap_or("Unknown")
}

/// Outcome of one dispatched command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActuationResult {
    /// The recognized command, `None` for a token outside the vocabulary
    pub command: Option<CanonicalCommand>,
    pub response_text: String,
    /// Set only for `exit`: the session ends after this response
    pub terminal: bool,
}

impl ActuationResult {
    pub fn reply(command: CanonicalCommand, text: impl Into<String>) -> Self {
        Self {
            command: Some(command),
            response_text: text.into(),
            terminal: false,
        }
    }

    pub fn exit() -> Self {
        Self {
            command: Some(CanonicalCommand::Exit),
            response_text: EXIT_SENTINEL.to_string(),
            terminal: true,
        }
    }

    /// Silent reply for unrecognized tokens, so nothing downstream gets spoken.
    pub fn unrecognized() -> Self {
        Self {
            command: None,
            response_text: String::new(),
            terminal: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DispatcherState {
    Idle,
    Executing(CanonicalCommand),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_table_matches_sensor_codes() {
        assert_eq!(color_name(0), "No color");
        assert_eq!(color_name(3), "Green");
        assert_eq!(color_name(7), "Brown");
        assert_eq!(color_name(8), "Unknown");
        assert_eq!(color_name(99), "Unknown");
        assert_eq!(color_name(-1), "Unknown");
    }

    #[test]
    fn speed_is_clamped() {
        assert_eq!(SpeedPercent::new(-128).get(), -100);
        assert_eq!(SpeedPercent::new(50).get(), 50);
    }
}
