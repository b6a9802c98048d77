use crate::{CommandLink, Result, TransportError, EXIT_SENTINEL};

type Responder = Box<dyn FnMut(&str) -> Result<String> + Send>;

/// An in-process link answered by a closure. Each link instance is independent.
///
/// Like the real robot, the link closes itself after answering with the exit sentinel.
pub struct MockLink {
    responder: Responder,
    requests: Vec<String>,
    open: bool,
}

impl MockLink {
    pub fn new(responder: impl FnMut(&str) -> Result<String> + Send + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            requests: Vec::new(),
            open: true,
        }
    }

    /// Answers every request with the request itself.
    pub fn echo() -> Self {
        Self::new(|req| Ok(req.to_string()))
    }

    /// Every request seen so far, in order, including ones that failed.
    pub fn requests(&self) -> &[String] {
        &self.requests
    }
}

impl CommandLink for MockLink {
    fn exchange(&mut self, request: &str) -> Result<String> {
        if !self.open {
            return Err(TransportError::Closed);
        }
        self.requests.push(request.to_string());
        match (self.responder)(request) {
            Ok(response) => {
                if response == EXIT_SENTINEL {
                    self.open = false;
                }
                Ok(response)
            }
            Err(e) => {
                if e.is_fatal() {
                    self.open = false;
                }
                Err(e)
            }
        }
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }
}
