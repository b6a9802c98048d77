//! robot-control: executes canonical commands on the robot
//!
//! The session controller accepts one operator connection and runs a strictly
//! sequential receive, record, dispatch, respond loop. The dispatcher owns the
//! hardware handle and the command history; nothing here is global. Hardware is
//! reached through the [`Hardware`] trait with a `mock` backend for hosts without
//! motors and an `ev3dev` backend for the brick itself.

mod types;
pub use types::{color_name, ActuationResult, DispatcherState, MotorPort, SensorKind, SpeedPercent};

mod error;
pub use error::{ActuatorFault, Result};

mod traits;
pub use traits::Hardware;

mod actuation;
pub use actuation::{Actuation, ActuationTable};

mod history;
pub use history::{CommandHistory, CommandRecord, NO_HISTORY};

mod dispatcher;
pub use dispatcher::{Dispatcher, MAX_TIME_SCALE};

mod metrics;
pub use metrics::{ControlMetrics, MetricsHub};

mod session;
pub use session::{SessionController, SessionEnd};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{MockHardware, MotorEvent};

#[cfg(feature = "ev3dev")]
mod ev3dev;
#[cfg(feature = "ev3dev")]
pub use ev3dev::{Ev3devHardware, Ev3devPorts};
