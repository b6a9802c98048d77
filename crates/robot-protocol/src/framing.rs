//! Message framing for the robot link.
//!
//! A message is whatever a single read of at most [`MAX_MESSAGE_LEN`] bytes returns.
//! Every message goes out with a trailing newline so that an empty response still
//! reaches the peer as one (non-empty) write; readers strip it again.

use crate::{Result, TransportError, MAX_MESSAGE_LEN};
use std::io::{ErrorKind, Read, Write};

const TERMINATOR: u8 = b'\n';

/// Read one message. `Ok(None)` means the peer closed the connection.
pub fn read_message<R: Read + ?Sized>(reader: &mut R) -> Result<Option<String>> {
    let mut buf = [0u8; MAX_MESSAGE_LEN];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(n) => {
                let mut payload = &buf[..n];
                if let Some((&TERMINATOR, rest)) = payload.split_last() {
                    payload = rest;
                }
                return Ok(Some(String::from_utf8_lossy(payload).into_owned()));
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Write one message, terminator included, and flush it.
pub fn write_message<W: Write + ?Sized>(writer: &mut W, message: &str) -> Result<()> {
    let len = message.len() + 1;
    if len > MAX_MESSAGE_LEN {
        return Err(TransportError::MessageTooLarge(len));
    }
    let mut out = Vec::with_capacity(len);
    out.extend_from_slice(message.as_bytes());
    out.push(TERMINATOR);
    writer.write_all(&out)?;
    writer.flush()?;
    Ok(())
}
