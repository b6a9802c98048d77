use crate::{ActuatorFault, Hardware, MotorPort, Result, SensorKind, SpeedPercent};
use parking_lot::Mutex;
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;

/// A motor call observed by [`MockHardware`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotorEvent {
    Run(MotorPort, i8),
    Off { motor: MotorPort, brake: bool },
}

#[derive(Default)]
struct Bench {
    events: Vec<MotorEvent>,
    running: HashSet<MotorPort>,
    failing_motors: HashSet<MotorPort>,
    failing_sensors: HashSet<SensorKind>,
    distance_cm: f32,
    color: i32,
    angle: i32,
    randomize: bool,
}

/// In-process robot. Clones share one bench so tests can inspect what the dispatcher did.
#[derive(Clone, Default)]
pub struct MockHardware {
    bench: Arc<Mutex<Bench>>,
}

impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sensors return fresh random readings on every query.
    pub fn randomized() -> Self {
        let hw = Self::new();
        hw.bench.lock().randomize = true;
        hw
    }

    pub fn set_distance(&self, cm: f32) {
        self.bench.lock().distance_cm = cm;
    }

    pub fn set_color(&self, code: i32) {
        self.bench.lock().color = code;
    }

    pub fn set_angle(&self, degrees: i32) {
        self.bench.lock().angle = degrees;
    }

    /// Every later call on `motor` faults.
    pub fn fail_motor(&self, motor: MotorPort) {
        self.bench.lock().failing_motors.insert(motor);
    }

    pub fn fail_sensor(&self, sensor: SensorKind) {
        self.bench.lock().failing_sensors.insert(sensor);
    }

    pub fn events(&self) -> Vec<MotorEvent> {
        self.bench.lock().events.clone()
    }

    pub fn is_running(&self, motor: MotorPort) -> bool {
        self.bench.lock().running.contains(&motor)
    }

    fn read<T>(&self, sensor: SensorKind, value: impl FnOnce(&mut Bench) -> T) -> Result<T> {
        let mut bench = self.bench.lock();
        if bench.failing_sensors.contains(&sensor) {
            return Err(ActuatorFault::Sensor {
                sensor,
                reason: "injected fault".to_string(),
            });
        }
        Ok(value(&mut *bench))
    }
}

impl Hardware for MockHardware {
    fn run(&mut self, motor: MotorPort, speed: SpeedPercent) -> Result<()> {
        let mut bench = self.bench.lock();
        if bench.failing_motors.contains(&motor) {
            return Err(ActuatorFault::Motor {
                port: motor,
                reason: "injected fault".to_string(),
            });
        }
        bench.events.push(MotorEvent::Run(motor, speed.get()));
        bench.running.insert(motor);
        Ok(())
    }

    fn off(&mut self, motor: MotorPort, brake: bool) -> Result<()> {
        let mut bench = self.bench.lock();
        if bench.failing_motors.contains(&motor) {
            return Err(ActuatorFault::Motor {
                port: motor,
                reason: "injected fault".to_string(),
            });
        }
        bench.events.push(MotorEvent::Off { motor, brake });
        bench.running.remove(&motor);
        Ok(())
    }

    fn distance_centimeters(&mut self) -> Result<f32> {
        self.read(SensorKind::Ultrasonic, |b| {
            if b.randomize {
                b.distance_cm = rand::thread_rng().gen_range(3.0..255.0);
            }
            b.distance_cm
        })
    }

    fn color_code(&mut self) -> Result<i32> {
        self.read(SensorKind::Color, |b| {
            if b.randomize {
                b.color = rand::thread_rng().gen_range(0..=7);
            }
            b.color
        })
    }

    fn angle_degrees(&mut self) -> Result<i32> {
        self.read(SensorKind::Gyro, |b| {
            if b.randomize {
                b.angle = rand::thread_rng().gen_range(-180..=180);
            }
            b.angle
        })
    }
}
