//! robot-protocol: the command vocabulary shared by the operator console and the robot
//!
//! Both ends of the link depend on this crate, so the canonical command set can never
//! drift between them. The wire protocol is strictly one request, one response over a
//! single stream connection.
//!
//! On the wire every request and response carries one trailing `\n`, stripped again
//! by [`read_message`]. A bare reply (for example the empty answer to an unknown
//! token) therefore arrives as `"\n"`, and a client that does not strip the
//! terminator sees it appended to every response. Requests without the terminator
//! are accepted as-is.
//!
//! The default build enables a `mock` link so operator-side
//! code can be exercised without a robot on the network.

mod types;
pub use types::{CanonicalCommand, DEFAULT_PORT, EXIT_SENTINEL, MAX_MESSAGE_LEN};

mod error;
pub use error::{Result, TransportError, UnknownCommand};

mod traits;
pub use traits::CommandLink;

mod framing;
pub use framing::{read_message, write_message};

mod tcp;
pub use tcp::TcpLink;

#[cfg(feature = "mock")]
mod mock;

#[cfg(feature = "mock")]
pub use mock::MockLink;
