use crate::Result;

/// A blocking request/response link to the robot.
///
/// Exactly one request may be outstanding; callers sharing a link must hold an
/// exclusive lock across the whole exchange since responses carry no request id.
pub trait CommandLink {
    /// Send one request and block until its single response arrives.
    fn exchange(&mut self, request: &str) -> Result<String>;

    /// Release the connection. Later exchanges fail with `TransportError::Closed`.
    fn close(&mut self);

    /// Whether the link can still carry an exchange.
    fn is_open(&self) -> bool;
}

impl<L: CommandLink + ?Sized> CommandLink for Box<L> {
    fn exchange(&mut self, request: &str) -> Result<String> {
        (**self).exchange(request)
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }
}
