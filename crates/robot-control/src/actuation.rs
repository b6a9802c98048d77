use robot_protocol::CanonicalCommand;
use std::time::Duration;

const DRIVE_POWER: i8 = 50;
const GRIPPER_POWER: i8 = 50;

/// What a command does to the hardware, and how long it holds the actuators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Actuation {
    /// Run both traction motors for `duration`, then brake
    Drive {
        left: i8,
        right: i8,
        duration: Duration,
        done: &'static str,
    },
    /// Run the claw motor for `duration`, then brake
    Gripper {
        speed: i8,
        duration: Duration,
        done: &'static str,
    },
    /// Coast every motor, never fails
    Halt,
    Distance,
    Color,
    Angle,
    History,
    Exit,
}

impl Actuation {
    /// Blocking window before the actuators are powered off.
    pub fn duration(&self) -> Duration {
        match self {
            Actuation::Drive { duration, .. } | Actuation::Gripper { duration, .. } => *duration,
            _ => Duration::ZERO,
        }
    }
}

/// Maps each canonical command onto its actuation.
pub trait ActuationTable {
    fn actuation(self) -> Actuation;
}

impl ActuationTable for CanonicalCommand {
    fn actuation(self) -> Actuation {
        use CanonicalCommand as C;
        let drive = |left, right, millis, done| Actuation::Drive {
            left,
            right,
            duration: Duration::from_millis(millis),
            done,
        };
        let gripper = |speed, done| Actuation::Gripper {
            speed,
            duration: Duration::from_millis(2500),
            done,
        };
        match self {
            C::Forward => drive(DRIVE_POWER, DRIVE_POWER, 2000, "Moved forward"),
            C::Backward => drive(-DRIVE_POWER, -DRIVE_POWER, 2000, "Moved backward"),
            C::Left => drive(-DRIVE_POWER, DRIVE_POWER, 1000, "Turned left"),
            C::Right => drive(DRIVE_POWER, -DRIVE_POWER, 1000, "Turned right"),
            C::Open => gripper(GRIPPER_POWER, "Claw opened"),
            C::Close => gripper(-GRIPPER_POWER, "Claw closed"),
            C::Stop => Actuation::Halt,
            C::Distance => Actuation::Distance,
            C::Color => Actuation::Color,
            C::Angle => Actuation::Angle,
            C::History => Actuation::History,
            C::Exit => Actuation::Exit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pivots_run_traction_motors_in_opposite_directions() {
        match CanonicalCommand::Left.actuation() {
            Actuation::Drive { left, right, duration, done } => {
                assert_eq!((left, right), (-50, 50));
                assert_eq!(duration, Duration::from_secs(1));
                assert_eq!(done, "Turned left");
            }
            other => panic!("unexpected {other:?}"),
        }
        match CanonicalCommand::Right.actuation() {
            Actuation::Drive { left, right, .. } => assert_eq!((left, right), (50, -50)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn blocking_windows() {
        let secs = |c: CanonicalCommand| c.actuation().duration().as_secs_f64();
        assert_eq!(secs(CanonicalCommand::Forward), 2.0);
        assert_eq!(secs(CanonicalCommand::Backward), 2.0);
        assert_eq!(secs(CanonicalCommand::Left), 1.0);
        assert_eq!(secs(CanonicalCommand::Open), 2.5);
        assert_eq!(secs(CanonicalCommand::Close), 2.5);
        for c in [
            CanonicalCommand::Stop,
            CanonicalCommand::Distance,
            CanonicalCommand::Color,
            CanonicalCommand::Angle,
            CanonicalCommand::History,
            CanonicalCommand::Exit,
        ] {
            assert_eq!(secs(c), 0.0, "{c}");
        }
    }

    #[test]
    fn claw_directions() {
        assert!(matches!(
            CanonicalCommand::Open.actuation(),
            Actuation::Gripper { speed: 50, done: "Claw opened", .. }
        ));
        assert!(matches!(
            CanonicalCommand::Close.actuation(),
            Actuation::Gripper { speed: -50, done: "Claw closed", .. }
        ));
    }
}
