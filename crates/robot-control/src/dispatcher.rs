use crate::{
    color_name, Actuation, ActuationResult, ActuationTable, CommandHistory,
    DispatcherState, Hardware, MotorPort, Result, SpeedPercent,
};
use robot_protocol::CanonicalCommand;
use std::time::Duration;
use tracing::{debug, warn};

/// Largest accepted window multiplier.
pub const MAX_TIME_SCALE: f64 = 1000.0;

/// Executes canonical commands against the hardware, one at a time.
///
/// Owns the hardware handle and the session's command history. Timed moves block
/// the caller for their full window, scaled by `time_scale`.
pub struct Dispatcher {
    hardware: Box<dyn Hardware>,
    history: CommandHistory,
    time_scale: f64,
    state: DispatcherState,
}

impl Dispatcher {
    pub fn new(hardware: Box<dyn Hardware>) -> Self {
        Self {
            hardware,
            history: CommandHistory::new(),
            time_scale: 1.0,
            state: DispatcherState::Idle,
        }
    }

    /// Multiplies every blocking window. 0.0 makes moves instantaneous; values
    /// outside `0.0..=MAX_TIME_SCALE` are ignored.
    pub fn with_time_scale(mut self, scale: f64) -> Self {
        if scale.is_finite() && (0.0..=MAX_TIME_SCALE).contains(&scale) {
            self.time_scale = scale;
        } else {
            warn!(scale, "ignoring invalid time scale");
        }
        self
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn state(&self) -> DispatcherState {
        self.state
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Records `raw` in the history, then executes it.
    ///
    /// The entry is kept even if execution faults. A `history` request lists only
    /// what was received before it.
    pub fn handle(&mut self, raw: &str) -> Result<ActuationResult> {
        let before = self.history.len();
        self.history.append(raw);
        self.run(raw, before)
    }

    fn run(&mut self, raw: &str, history_cutoff: usize) -> Result<ActuationResult> {
        let token = raw.trim().to_lowercase();
        let Ok(command) = token.parse::<CanonicalCommand>() else {
            debug!(token = %token, "unrecognized command");
            return Ok(ActuationResult::unrecognized());
        };
        debug!(command = %command, "executing");
        self.state = DispatcherState::Executing(command);
        let result = self.actuate(command, history_cutoff);
        self.state = DispatcherState::Idle;
        result
    }

    fn actuate(&mut self, command: CanonicalCommand, history_cutoff: usize) -> Result<ActuationResult> {
        let text = match command.actuation() {
            Actuation::Drive {
                left,
                right,
                duration,
                done,
            } => {
                self.timed(&[(MotorPort::Left, left), (MotorPort::Right, right)], duration)?;
                done.to_string()
            }
            Actuation::Gripper {
                speed,
                duration,
                done,
            } => {
                self.timed(&[(MotorPort::Gripper, speed)], duration)?;
                done.to_string()
            }
            Actuation::Halt => {
                self.halt();
                "All motors stopped".to_string()
            }
            Actuation::Distance => {
                let cm = self.hardware.distance_centimeters()?;
                format!("Distance is {} centimeters", cm.trunc() as i64)
            }
            Actuation::Color => {
                let code = self.hardware.color_code()?;
                format!("Color detected: {}", color_name(code))
            }
            Actuation::Angle => {
                let degrees = self.hardware.angle_degrees()?;
                format!("Angle is {degrees} degrees")
            }
            Actuation::History => self.history.render_first(history_cutoff),
            Actuation::Exit => return Ok(ActuationResult::exit()),
        };
        Ok(ActuationResult::reply(command, text))
    }

    /// Starts every motor, holds for `window`, then brakes them.
    fn timed(&mut self, motors: &[(MotorPort, i8)], window: Duration) -> Result<()> {
        for (started, (motor, speed)) in motors.iter().enumerate() {
            if let Err(fault) = self.hardware.run(*motor, SpeedPercent::new(*speed)) {
                for (running, _) in &motors[..started] {
                    if let Err(e) = self.hardware.off(*running, true) {
                        warn!(motor = %running, error = %e, "power-off after fault failed");
                    }
                }
                return Err(fault);
            }
        }
        self.pause(window);
        let mut first_fault = None;
        for (motor, _) in motors {
            if let Err(e) = self.hardware.off(*motor, true) {
                warn!(motor = %motor, error = %e, "power-off failed");
                if first_fault.is_none() {
                    first_fault = Some(e);
                }
            }
        }
        first_fault.map_or(Ok(()), Err)
    }

    fn halt(&mut self) {
        for motor in MotorPort::ALL {
            if let Err(e) = self.hardware.off(motor, false) {
                warn!(motor = %motor, error = %e, "stop fault ignored");
            }
        }
    }

    fn pause(&self, window: Duration) {
        match Duration::try_from_secs_f64(window.as_secs_f64() * self.time_scale) {
            Ok(scaled) if !scaled.is_zero() => std::thread::sleep(scaled),
            Ok(_) => {}
            Err(e) => warn!(scale = self.time_scale, error = %e, "scaled window out of range, not pausing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActuatorFault, MockHardware, MotorEvent, SensorKind, NO_HISTORY};
    use std::time::Instant;

    fn dispatcher() -> (Dispatcher, MockHardware) {
        let hw = MockHardware::new();
        let d = Dispatcher::new(Box::new(hw.clone())).with_time_scale(0.0);
        (d, hw)
    }

    fn reply(d: &mut Dispatcher, raw: &str) -> String {
        d.handle(raw).unwrap().response_text
    }

    #[test]
    fn motion_responses() {
        let (mut d, _) = dispatcher();
        assert_eq!(reply(&mut d, "forward"), "Moved forward");
        assert_eq!(reply(&mut d, "backward"), "Moved backward");
        assert_eq!(reply(&mut d, "left"), "Turned left");
        assert_eq!(reply(&mut d, "right"), "Turned right");
        assert_eq!(reply(&mut d, "open"), "Claw opened");
        assert_eq!(reply(&mut d, "close"), "Claw closed");
        assert_eq!(reply(&mut d, "stop"), "All motors stopped");
    }

    #[test]
    fn forward_brakes_both_motors_after_running() {
        let (mut d, hw) = dispatcher();
        reply(&mut d, "forward");
        assert_eq!(
            hw.events(),
            vec![
                MotorEvent::Run(MotorPort::Left, 50),
                MotorEvent::Run(MotorPort::Right, 50),
                MotorEvent::Off { motor: MotorPort::Left, brake: true },
                MotorEvent::Off { motor: MotorPort::Right, brake: true },
            ]
        );
        assert!(!hw.is_running(MotorPort::Left));
        assert_eq!(d.state(), DispatcherState::Idle);
    }

    #[test]
    fn close_reverses_gripper() {
        let (mut d, hw) = dispatcher();
        reply(&mut d, "close");
        assert_eq!(hw.events()[0], MotorEvent::Run(MotorPort::Gripper, -50));
    }

    #[test]
    fn stop_is_idempotent_and_swallows_faults() {
        let (mut d, hw) = dispatcher();
        assert_eq!(reply(&mut d, "stop"), "All motors stopped");
        assert_eq!(reply(&mut d, "stop"), "All motors stopped");
        hw.fail_motor(MotorPort::Left);
        assert_eq!(reply(&mut d, "stop"), "All motors stopped");
        let coasts = hw
            .events()
            .iter()
            .filter(|e| matches!(e, MotorEvent::Off { brake: false, .. }))
            .count();
        // third stop still reached right and gripper
        assert_eq!(coasts, 8);
    }

    #[test]
    fn power_on_fault_unwinds_started_motors() {
        let (mut d, hw) = dispatcher();
        hw.fail_motor(MotorPort::Right);
        let err = d.handle("forward").unwrap_err();
        assert!(matches!(err, ActuatorFault::Motor { port: MotorPort::Right, .. }));
        assert_eq!(
            hw.events(),
            vec![
                MotorEvent::Run(MotorPort::Left, 50),
                MotorEvent::Off { motor: MotorPort::Left, brake: true },
            ]
        );
        assert_eq!(d.state(), DispatcherState::Idle);
        // recorded despite the fault
        assert_eq!(d.history().len(), 1);
    }

    /// Motors whose power-off fails for the left traction motor only.
    struct LeftWontStop(MockHardware);

    impl Hardware for LeftWontStop {
        fn run(&mut self, motor: MotorPort, speed: SpeedPercent) -> Result<()> {
            self.0.run(motor, speed)
        }

        fn off(&mut self, motor: MotorPort, brake: bool) -> Result<()> {
            if motor == MotorPort::Left {
                return Err(ActuatorFault::Motor {
                    port: motor,
                    reason: "stop rejected".to_string(),
                });
            }
            self.0.off(motor, brake)
        }

        fn distance_centimeters(&mut self) -> Result<f32> {
            self.0.distance_centimeters()
        }

        fn color_code(&mut self) -> Result<i32> {
            self.0.color_code()
        }

        fn angle_degrees(&mut self) -> Result<i32> {
            self.0.angle_degrees()
        }
    }

    #[test]
    fn power_off_fault_still_stops_the_other_motor() {
        let hw = MockHardware::new();
        let mut d = Dispatcher::new(Box::new(LeftWontStop(hw.clone()))).with_time_scale(0.0);
        let err = d.handle("forward").unwrap_err();
        assert!(matches!(err, ActuatorFault::Motor { port: MotorPort::Left, .. }));
        assert!(!hw.is_running(MotorPort::Right));
        assert_eq!(
            hw.events().last(),
            Some(&MotorEvent::Off { motor: MotorPort::Right, brake: true })
        );
        assert_eq!(d.state(), DispatcherState::Idle);
    }

    #[test]
    fn sensor_queries() {
        let (mut d, hw) = dispatcher();
        hw.set_distance(42.9);
        hw.set_color(5);
        hw.set_angle(-15);
        assert_eq!(reply(&mut d, "distance"), "Distance is 42 centimeters");
        assert_eq!(reply(&mut d, "color"), "Color detected: Red");
        assert_eq!(reply(&mut d, "angle"), "Angle is -15 degrees");
        hw.set_color(12);
        assert_eq!(reply(&mut d, "color"), "Color detected: Unknown");
    }

    #[test]
    fn sensor_fault_propagates() {
        let (mut d, hw) = dispatcher();
        hw.fail_sensor(SensorKind::Ultrasonic);
        assert!(d.handle("distance").is_err());
    }

    #[test]
    fn unknown_tokens_answer_empty() {
        let (mut d, hw) = dispatcher();
        let result = d.handle("dance").unwrap();
        assert_eq!(result.response_text, "");
        assert_eq!(result.command, None);
        assert!(!result.terminal);
        assert!(hw.events().is_empty());
        assert_eq!(d.history().len(), 1);
    }

    #[test]
    fn tokens_are_case_folded() {
        let (mut d, _) = dispatcher();
        assert_eq!(reply(&mut d, "  FORWARD "), "Moved forward");
    }

    #[test]
    fn exit_is_terminal() {
        let (mut d, hw) = dispatcher();
        let result = d.handle("exit").unwrap();
        assert_eq!(result.response_text, "exit");
        assert!(result.terminal);
        assert!(hw.events().is_empty());
    }

    #[test]
    fn history_lists_earlier_commands() {
        let (mut d, _) = dispatcher();
        assert_eq!(reply(&mut d, "history"), NO_HISTORY);
        let (mut d, _) = dispatcher();
        for raw in ["forward", "left", "color"] {
            reply(&mut d, raw);
        }
        assert_eq!(reply(&mut d, "history"), "forward\nleft\ncolor");
        assert_eq!(reply(&mut d, "history"), "forward\nleft\ncolor\nhistory");
        assert_eq!(d.history().len(), 5);
    }

    #[test]
    fn moves_block_for_scaled_window() {
        let hw = MockHardware::new();
        let mut d = Dispatcher::new(Box::new(hw)).with_time_scale(0.01);
        let started = Instant::now();
        reply(&mut d, "forward");
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn invalid_time_scale_is_ignored() {
        let d = Dispatcher::new(Box::new(MockHardware::new())).with_time_scale(f64::NAN);
        assert_eq!(d.time_scale(), 1.0);
        let d = Dispatcher::new(Box::new(MockHardware::new())).with_time_scale(-2.0);
        assert_eq!(d.time_scale(), 1.0);
        let d = Dispatcher::new(Box::new(MockHardware::new())).with_time_scale(1e20);
        assert_eq!(d.time_scale(), 1.0);
    }

    #[test]
    fn huge_window_does_not_panic() {
        let d = Dispatcher::new(Box::new(MockHardware::new())).with_time_scale(MAX_TIME_SCALE);
        // overflows Duration once scaled
        d.pause(Duration::MAX);
    }
}
