use crate::{MotorPort, SensorKind};
use thiserror::Error;

pub type Result<T, E = ActuatorFault> = core::result::Result<T, E>;

/// A hardware-level failure while driving a motor or reading a sensor.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ActuatorFault {
    #[error("{0} motor not found")]
    MotorNotFound(MotorPort),
    #[error("{0} sensor not found")]
    SensorNotFound(SensorKind),
    #[error("{port} motor: {reason}")]
    Motor { port: MotorPort, reason: String },
    #[error("{sensor} sensor: {reason}")]
    Sensor { sensor: SensorKind, reason: String },
}
