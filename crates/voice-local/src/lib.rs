//! voice-local: speech recognition and synthesis seams with mock and process backends

mod types;
pub use types::{SpeakerConfig, Transcript, TranscriberConfig};

mod error;
pub use error::{RecognitionError, SpeechError};

mod traits;
pub use traits::{Speaker, Transcriber};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{MockSpeaker, MockTranscriber};

mod process;
pub use process::{CommandSpeaker, CommandTranscriber, MuteSpeaker};

pub mod plugin;
