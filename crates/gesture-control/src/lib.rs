//! gesture-control: hand-landmark sources and the pinch classifier
//!
//! Hand tracking itself is external; a source only yields landmark frames. The
//! classifier turns the thumb/index spread of each tracked hand into a claw command.

mod types;
pub use types::{GestureSignal, HandFrame, HandLandmarks, Landmark, INDEX_TIP, THUMB_TIP};

mod error;
pub use error::{Error, Result};

mod traits;
pub use traits::GestureSource;

mod classify;
pub use classify::PinchClassifier;

mod ndjson;
pub use ndjson::NdjsonSource;

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::MockGestureSource;
