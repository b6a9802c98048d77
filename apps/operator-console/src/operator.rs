use intent_parser::{answer_or_apologize, Normalizer, QaOracle, Route};
use parking_lot::Mutex;
use robot_protocol::{CanonicalCommand, CommandLink, TransportError, EXIT_SENTINEL};
use std::sync::Arc;
use tracing::{debug, info, warn};
use voice_local::Speaker;

/// The one connection to the robot, shared by every command issuer.
pub type SharedLink = Arc<Mutex<Box<dyn CommandLink + Send>>>;

/// What became of one piece of operator input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Sent to the robot, with its response
    Command(CanonicalCommand, String),
    /// Answered by the oracle
    Answer(String),
}

/// Issues commands on the shared link and presents the results to the operator.
///
/// Cheap to clone; workers each take their own handle.
#[derive(Clone)]
pub struct Operator {
    link: SharedLink,
    normalizer: Arc<Normalizer>,
    oracle: Arc<dyn QaOracle>,
    speaker: Arc<Mutex<Box<dyn Speaker>>>,
}

impl Operator {
    pub fn new(
        link: Box<dyn CommandLink + Send>,
        normalizer: Normalizer,
        oracle: Arc<dyn QaOracle>,
        speaker: Box<dyn Speaker>,
    ) -> Self {
        Self {
            link: Arc::new(Mutex::new(link)),
            normalizer: Arc::new(normalizer),
            oracle,
            speaker: Arc::new(Mutex::new(speaker)),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.link.lock().is_open()
    }

    /// Sends one command and waits for its response.
    ///
    /// The link stays locked for the whole exchange so concurrent issuers never
    /// interleave. An `exit` response closes the link.
    pub fn send(&self, command: CanonicalCommand) -> Result<String, TransportError> {
        let response = {
            let mut link = self.link.lock();
            let response = link.exchange(command.as_str())?;
            if response == EXIT_SENTINEL {
                info!("robot acknowledged exit, closing link");
                link.close();
            }
            response
        };
        debug!(command = %command, response = %response, "command answered");
        self.present(&response);
        Ok(response)
    }

    /// Asks the oracle; failures turn into the apology.
    pub fn ask(&self, question: &str) -> String {
        let answer = answer_or_apologize(self.oracle.as_ref(), question);
        println!("Assistant: {answer}");
        self.say(&answer);
        answer
    }

    /// Routes free-form input to the robot or the oracle.
    pub fn handle_utterance(&self, utterance: &str) -> Result<Outcome, TransportError> {
        match self.normalizer.route(utterance) {
            Route::Command(command, score) => {
                info!(utterance, command = %command, score, "utterance is a command");
                let response = self.send(command)?;
                Ok(Outcome::Command(command, response))
            }
            Route::Oracle(question) => {
                info!(utterance, "utterance goes to the oracle");
                Ok(Outcome::Answer(self.ask(&question)))
            }
        }
    }

    pub fn close(&self) {
        self.link.lock().close();
    }

    fn present(&self, response: &str) {
        println!("EV3: {response}");
        if should_speak(response) {
            self.say(response);
        }
    }

    fn say(&self, text: &str) {
        if let Err(e) = self.speaker.lock().speak(text) {
            warn!(error = %e, "speech failed");
        }
    }
}

/// Empty responses and unknown-command notices are only shown, never spoken.
pub fn should_speak(response: &str) -> bool {
    !response.is_empty() && !response.contains("Unknown command")
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use intent_parser::{IntentConfig, MockOracle};
    use robot_protocol::MockLink;
    use voice_local::MockSpeaker;

    /// Robot stand-in answering like the real dispatcher for a few commands.
    pub fn robot(request: &str) -> robot_protocol::Result<String> {
        Ok(match request {
            "forward" => "Moved forward",
            "open" => "Claw opened",
            "close" => "Claw closed",
            "distance" => "Distance is 12 centimeters",
            "exit" => "exit",
            _ => "",
        }
        .to_string())
    }

    pub fn operator_with(link: MockLink, oracle: Arc<MockOracle>) -> (Operator, MockSpeaker) {
        let speaker = MockSpeaker::new();
        let normalizer = Normalizer::new(IntentConfig::default()).unwrap();
        let op = Operator::new(Box::new(link), normalizer, oracle, Box::new(speaker.clone()));
        (op, speaker)
    }

    pub fn operator() -> (Operator, MockSpeaker) {
        operator_with(MockLink::new(robot), Arc::new(MockOracle::canned("Forty-two.")))
    }
}
