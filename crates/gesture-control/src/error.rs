use thiserror::Error;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(String),
    #[error("malformed landmark frame: {0}")]
    Malformed(String),
    #[error("hand has {0} landmarks, expected at least 21")]
    TooFewLandmarks(usize),
}
