use crate::{ActuatorFault, Hardware, MotorPort, Result, SensorKind, SpeedPercent};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const SYSFS_ROOT: &str = "/sys/class";

/// Which brick port each actuator and sensor is plugged into.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ev3devPorts {
    pub left: String,
    pub right: String,
    pub gripper: String,
    pub ultrasonic: String,
    pub color: String,
    pub gyro: String,
}

impl Default for Ev3devPorts {
    fn default() -> Self {
        Self {
            left: "outB".into(),
            right: "outC".into(),
            gripper: "outA".into(),
            ultrasonic: "in4".into(),
            color: "in3".into(),
            gyro: "in2".into(),
        }
    }
}

struct TachoMotor {
    port: MotorPort,
    dir: PathBuf,
    max_speed: i32,
}

impl TachoMotor {
    fn open(class_dir: &Path, port: MotorPort, address: &str) -> Result<Self> {
        let dir = find_device(class_dir, address).ok_or(ActuatorFault::MotorNotFound(port))?;
        let max_speed = read_attr(&dir, "max_speed")
            .and_then(|s| s.parse::<i32>().map_err(|e| e.to_string()))
            .map_err(|reason| ActuatorFault::Motor { port, reason })?;
        debug!(motor = %port, dir = %dir.display(), max_speed, "tacho motor found");
        Ok(Self {
            port,
            dir,
            max_speed,
        })
    }

    fn write(&self, attr: &str, value: &str) -> Result<()> {
        fs::write(self.dir.join(attr), value).map_err(|e| ActuatorFault::Motor {
            port: self.port,
            reason: format!("{attr}: {e}"),
        })
    }

    fn run_forever(&self, speed: SpeedPercent) -> Result<()> {
        let speed_sp = i32::from(speed.get()) * self.max_speed / 100;
        self.write("speed_sp", &speed_sp.to_string())?;
        self.write("command", "run-forever")
    }

    fn stop(&self, brake: bool) -> Result<()> {
        self.write("stop_action", if brake { "brake" } else { "coast" })?;
        self.write("command", "stop")
    }
}

struct LegoSensor {
    kind: SensorKind,
    dir: PathBuf,
    scale: f32,
}

impl LegoSensor {
    fn open(class_dir: &Path, kind: SensorKind, address: &str, mode: &str) -> Result<Self> {
        let fault = |reason: String| ActuatorFault::Sensor { sensor: kind, reason };
        let dir = find_device(class_dir, address).ok_or(ActuatorFault::SensorNotFound(kind))?;
        fs::write(dir.join("mode"), mode).map_err(|e| fault(format!("mode: {e}")))?;
        let decimals = read_attr(&dir, "decimals")
            .ok()
            .and_then(|s| s.parse::<i32>().ok())
            .unwrap_or(0);
        debug!(sensor = %kind, dir = %dir.display(), mode, decimals, "lego sensor found");
        Ok(Self {
            kind,
            dir,
            scale: 10f32.powi(-decimals),
        })
    }

    fn value(&self) -> Result<f32> {
        read_attr(&self.dir, "value0")
            .and_then(|s| s.parse::<i32>().map_err(|e| e.to_string()))
            .map(|raw| raw as f32 * self.scale)
            .map_err(|reason| ActuatorFault::Sensor {
                sensor: self.kind,
                reason,
            })
    }
}

/// Motors and sensors of an ev3dev brick, driven through sysfs.
pub struct Ev3devHardware {
    left: TachoMotor,
    right: TachoMotor,
    gripper: TachoMotor,
    ultrasonic: LegoSensor,
    color: LegoSensor,
    gyro: LegoSensor,
}

impl Ev3devHardware {
    pub fn open(ports: &Ev3devPorts) -> Result<Self> {
        Self::open_at(Path::new(SYSFS_ROOT), ports)
    }

    /// Like [`open`](Self::open) with `root` standing in for `/sys/class`.
    pub fn open_at(root: &Path, ports: &Ev3devPorts) -> Result<Self> {
        let motors = root.join("tacho-motor");
        let sensors = root.join("lego-sensor");
        let hw = Self {
            left: TachoMotor::open(&motors, MotorPort::Left, &ports.left)?,
            right: TachoMotor::open(&motors, MotorPort::Right, &ports.right)?,
            gripper: TachoMotor::open(&motors, MotorPort::Gripper, &ports.gripper)?,
            ultrasonic: LegoSensor::open(&sensors, SensorKind::Ultrasonic, &ports.ultrasonic, "US-DIST-CM")?,
            color: LegoSensor::open(&sensors, SensorKind::Color, &ports.color, "COL-COLOR")?,
            gyro: LegoSensor::open(&sensors, SensorKind::Gyro, &ports.gyro, "GYRO-ANG")?,
        };
        info!(root = %root.display(), "ev3dev hardware ready");
        Ok(hw)
    }

    fn motor(&self, port: MotorPort) -> &TachoMotor {
        match port {
            MotorPort::Left => &self.left,
            MotorPort::Right => &self.right,
            MotorPort::Gripper => &self.gripper,
        }
    }
}

impl Hardware for Ev3devHardware {
    fn run(&mut self, motor: MotorPort, speed: SpeedPercent) -> Result<()> {
        self.motor(motor).run_forever(speed)
    }

    fn off(&mut self, motor: MotorPort, brake: bool) -> Result<()> {
        self.motor(motor).stop(brake)
    }

    fn distance_centimeters(&mut self) -> Result<f32> {
        self.ultrasonic.value()
    }

    fn color_code(&mut self) -> Result<i32> {
        self.color.value().map(|v| v as i32)
    }

    fn angle_degrees(&mut self) -> Result<i32> {
        self.gyro.value().map(|v| v as i32)
    }
}

fn read_attr(dir: &Path, attr: &str) -> core::result::Result<String, String> {
    fs::read_to_string(dir.join(attr))
        .map(|s| s.trim().to_string())
        .map_err(|e| format!("{attr}: {e}"))
}

/// Device directory under `class_dir` whose `address` ends with `port`, e.g. `ev3-ports:outB`.
fn find_device(class_dir: &Path, port: &str) -> Option<PathBuf> {
    fs::read_dir(class_dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .find(|dir| read_attr(dir, "address").is_ok_and(|addr| addr.ends_with(port)))
}
