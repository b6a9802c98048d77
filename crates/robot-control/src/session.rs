use crate::{ActuatorFault, Dispatcher, MetricsHub};
use robot_protocol::{read_message, write_message, TransportError};
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener};
use tracing::{debug, error, info, info_span, warn};
use uuid::Uuid;

/// Why a session loop ended.
#[derive(Debug)]
pub enum SessionEnd {
    /// The operator sent `exit` and got the sentinel back
    Exit,
    /// Zero-length read, nothing was answered
    PeerClosed,
    Transport(TransportError),
    /// Unhandled hardware failure, the command got no response
    Fault(ActuatorFault),
}

impl SessionEnd {
    pub fn is_clean(&self) -> bool {
        matches!(self, SessionEnd::Exit | SessionEnd::PeerClosed)
    }
}

/// Runs one operator session at a time over a blocking stream.
pub struct SessionController {
    dispatcher: Dispatcher,
    metrics: MetricsHub,
}

impl SessionController {
    pub fn new(dispatcher: Dispatcher, metrics: MetricsHub) -> Self {
        Self {
            dispatcher,
            metrics,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn metrics(&self) -> &MetricsHub {
        &self.metrics
    }

    /// Accepts exactly one connection from `listener` and serves it to the end.
    pub fn accept_one(&mut self, listener: &TcpListener) -> std::io::Result<SessionEnd> {
        let (mut stream, peer) = listener.accept()?;
        info!(%peer, "operator connected");
        let end = self.serve(&mut stream);
        if let Err(e) = stream.shutdown(Shutdown::Both) {
            debug!(error = %e, "shutdown after session");
        }
        Ok(end)
    }

    /// Receive, record, dispatch and respond until exit, disconnect or fault.
    pub fn serve<S: Read + Write>(&mut self, stream: &mut S) -> SessionEnd {
        let id = Uuid::new_v4();
        let span = info_span!("session", %id);
        let _guard = span.enter();
        self.metrics.control.sessions_served.inc();
        info!("session started");

        loop {
            let raw = match read_message(stream) {
                Ok(Some(raw)) => raw,
                Ok(None) => {
                    info!("operator disconnected");
                    return SessionEnd::PeerClosed;
                }
                Err(e) => {
                    warn!(error = %e, "receive failed");
                    return SessionEnd::Transport(e);
                }
            };
            let raw = raw.trim();
            self.metrics.control.commands_received.inc();

            let result = match self.dispatcher.handle(raw) {
                Ok(result) => result,
                Err(fault) => {
                    error!(command = %raw, error = %fault, "actuator fault, ending session");
                    self.metrics.control.actuator_faults.inc();
                    return SessionEnd::Fault(fault);
                }
            };
            if result.command.is_none() {
                self.metrics.control.unknown_commands.inc();
            }
            debug!(command = %raw, response = %result.response_text, "responding");

            if let Err(e) = write_message(stream, &result.response_text) {
                warn!(error = %e, "send failed");
                return SessionEnd::Transport(e);
            }
            if result.terminal {
                info!("exit requested, session over");
                return SessionEnd::Exit;
            }
        }
    }
}
