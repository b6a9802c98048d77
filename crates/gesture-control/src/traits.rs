use crate::{HandFrame, Result};

pub trait GestureSource: Send {
    /// Read the next frame. `Ok(None)` means the source is exhausted (camera closed).
    fn next_frame(&mut self) -> Result<Option<HandFrame>>;
}
