use crate::{MotorPort, Result, SpeedPercent};

/// The robot's actuators and sensors. All calls block until the device accepted them.
pub trait Hardware: Send {
    /// Start a motor at the given power and leave it running.
    fn run(&mut self, motor: MotorPort, speed: SpeedPercent) -> Result<()>;

    /// Power a motor off, holding position when `brake` is set, coasting otherwise.
    fn off(&mut self, motor: MotorPort, brake: bool) -> Result<()>;

    /// Ultrasonic range in centimeters.
    fn distance_centimeters(&mut self) -> Result<f32>;

    /// Raw color code as reported by the color sensor.
    fn color_code(&mut self) -> Result<i32>;

    /// Gyro heading in degrees since calibration.
    fn angle_degrees(&mut self) -> Result<i32>;
}

impl<H: Hardware + ?Sized> Hardware for Box<H> {
    fn run(&mut self, motor: MotorPort, speed: SpeedPercent) -> Result<()> {
        (**self).run(motor, speed)
    }

    fn off(&mut self, motor: MotorPort, brake: bool) -> Result<()> {
        (**self).off(motor, brake)
    }

    fn distance_centimeters(&mut self) -> Result<f32> {
        (**self).distance_centimeters()
    }

    fn color_code(&mut self) -> Result<i32> {
        (**self).color_code()
    }

    fn angle_degrees(&mut self) -> Result<i32> {
        (**self).angle_degrees()
    }
}
