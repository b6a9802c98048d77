use crate::{read_message, write_message, CommandLink, Result, TransportError};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Operator-side link over a plain TCP stream.
pub struct TcpLink {
    peer: String,
    stream: Option<TcpStream>,
}

impl TcpLink {
    /// Connect without a read timeout; exchanges block until the robot answers.
    pub fn connect(addr: &str) -> Result<Self> {
        Self::connect_with(addr, None)
    }

    pub fn connect_with(addr: &str, read_timeout: Option<Duration>) -> Result<Self> {
        let connect_err = |reason: String| TransportError::Connect {
            addr: addr.to_string(),
            reason,
        };
        let addrs = addr
            .to_socket_addrs()
            .map_err(|e| connect_err(e.to_string()))?;
        let mut last = String::from("no addresses resolved");
        for sa in addrs {
            match TcpStream::connect(sa) {
                Ok(stream) => {
                    stream.set_read_timeout(read_timeout)?;
                    stream.set_nodelay(true).ok();
                    info!(peer = %sa, "connected to robot");
                    return Ok(Self::from_stream(stream));
                }
                Err(e) => last = e.to_string(),
            }
        }
        Err(connect_err(last))
    }

    pub fn from_stream(stream: TcpStream) -> Self {
        let peer = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        Self {
            peer,
            stream: Some(stream),
        }
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }
}

impl CommandLink for TcpLink {
    fn exchange(&mut self, request: &str) -> Result<String> {
        let stream = self.stream.as_mut().ok_or(TransportError::Closed)?;
        let result = write_message(stream, request)
            .and_then(|()| read_message(stream)?.ok_or(TransportError::Closed));
        match &result {
            Ok(response) => debug!(request, response = %response, "exchange complete"),
            Err(e) if e.is_fatal() => {
                warn!(peer = %self.peer, error = %e, "link failed; closing");
                self.close();
            }
            Err(_) => {}
        }
        result
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            // Peer may already be gone
            let _ = stream.shutdown(Shutdown::Both);
            info!(peer = %self.peer, "link closed");
        }
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }
}

impl Drop for TcpLink {
    fn drop(&mut self) {
        self.close();
    }
}
