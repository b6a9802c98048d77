use crate::commands::{parse_line, ConsoleAction, HELP};
use crate::operator::Operator;
use crate::workers::{spawn_voice, GestureWorker, SharedTranscriber, VoiceOutcome};
use anyhow::Result;
use gesture_control::{GestureSource, PinchClassifier};
use robot_protocol::CanonicalCommand;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub type SourceFactory = Box<dyn FnMut() -> Result<Box<dyn GestureSource>> + Send>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The interactive control surface. Owns the workers it starts.
pub struct Console {
    operator: Operator,
    transcriber: SharedTranscriber,
    classifier: PinchClassifier,
    gesture_source: SourceFactory,
    gesture: Option<GestureWorker>,
    voice: Vec<JoinHandle<VoiceOutcome>>,
}

impl Console {
    pub fn new(
        operator: Operator,
        transcriber: SharedTranscriber,
        classifier: PinchClassifier,
        gesture_source: SourceFactory,
    ) -> Self {
        Self {
            operator,
            transcriber,
            classifier,
            gesture_source,
            gesture: None,
            voice: Vec::new(),
        }
    }

    /// Reads console lines until quit, end of input, Ctrl-C or a closed link.
    pub async fn run(&mut self) -> Result<()> {
        println!("{HELP}");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if self.dispatch(parse_line(&line)).await == Flow::Quit {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupted");
                    break;
                }
            }
            if !self.operator.is_connected() {
                println!("Link to robot closed.");
                break;
            }
        }
        self.shutdown().await;
        Ok(())
    }

    pub async fn dispatch(&mut self, action: ConsoleAction) -> Flow {
        match action {
            ConsoleAction::Press(command) => self.press(command).await,
            ConsoleAction::Ask(question) => self.ask(question).await,
            ConsoleAction::Voice => self.listen(),
            ConsoleAction::GestureStart => {
                self.start_gesture();
            }
            ConsoleAction::GestureStop => self.stop_gesture().await,
            ConsoleAction::Help => println!("{HELP}"),
            ConsoleAction::Quit => return Flow::Quit,
            ConsoleAction::Nothing => {}
            ConsoleAction::Invalid(line) => println!("Unrecognized input: {line} (try `help`)"),
        }
        Flow::Continue
    }

    async fn press(&self, command: CanonicalCommand) {
        let operator = self.operator.clone();
        match tokio::task::spawn_blocking(move || operator.send(command)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => println!("Link error: {e}"),
            Err(e) => warn!(error = %e, "button task failed"),
        }
    }

    async fn ask(&self, question: String) {
        let operator = self.operator.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || operator.ask(&question)).await {
            warn!(error = %e, "question task failed");
        }
    }

    fn listen(&mut self) {
        self.voice.retain(|h| !h.is_finished());
        let handle = spawn_voice(self.operator.clone(), self.transcriber.clone());
        self.voice.push(handle);
    }

    /// Starts the gesture loop unless one is already running.
    pub fn start_gesture(&mut self) -> bool {
        if self.gesture.as_ref().is_some_and(|w| !w.is_finished()) {
            println!("Gesture control is already running.");
            return false;
        }
        let source = match (self.gesture_source)() {
            Ok(source) => source,
            Err(e) => {
                println!("Cannot start gesture control: {e}");
                return false;
            }
        };
        self.gesture = Some(GestureWorker::spawn(self.operator.clone(), source, self.classifier));
        println!("Gesture control started.");
        true
    }

    pub async fn stop_gesture(&mut self) {
        match self.gesture.take() {
            Some(worker) => {
                if let Some(report) = worker.stop().await {
                    println!(
                        "Gesture control stopped after {} frames, {} commands.",
                        report.frames, report.commands_sent
                    );
                }
            }
            None => println!("Gesture control is not running."),
        }
    }

    /// Cancels the gesture loop, waits for pending utterances and closes the link.
    pub async fn shutdown(&mut self) {
        if let Some(worker) = self.gesture.take() {
            worker.stop().await;
        }
        for handle in self.voice.drain(..) {
            if let Err(e) = handle.await {
                warn!(error = %e, "voice worker failed");
            }
        }
        self.operator.close();
        info!("console closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::testing::{operator_with, robot};
    use gesture_control::{HandFrame, MockGestureSource};
    use intent_parser::MockOracle;
    use parking_lot::Mutex;
    use robot_protocol::MockLink;
    use std::sync::Arc;
    use std::time::Duration;
    use voice_local::{MockTranscriber, Transcriber};

    struct Stalled;

    impl GestureSource for Stalled {
        fn next_frame(&mut self) -> gesture_control::Result<Option<HandFrame>> {
            std::thread::sleep(Duration::from_millis(2));
            Ok(Some(HandFrame::default()))
        }
    }

    fn console(script: &[&str], endless: bool) -> (Console, Operator) {
        let (op, _) = operator_with(MockLink::new(robot), Arc::new(MockOracle::canned("Sure.")));
        let t: Box<dyn Transcriber> = Box::new(MockTranscriber::new(script.to_vec()));
        let factory: SourceFactory = Box::new(move || {
            let source: Box<dyn GestureSource> = if endless {
                Box::new(Stalled)
            } else {
                Box::new(MockGestureSource::new(Vec::new()))
            };
            Ok(source)
        });
        let console = Console::new(op.clone(), Arc::new(Mutex::new(t)), PinchClassifier::default(), factory);
        (console, op)
    }

    #[tokio::test]
    async fn second_gesture_start_is_refused() {
        let (mut c, _) = console(&[], true);
        assert!(c.start_gesture());
        assert!(!c.start_gesture());
        c.stop_gesture().await;
        assert!(c.start_gesture());
        c.shutdown().await;
    }

    #[tokio::test]
    async fn finished_gesture_loop_can_restart() {
        let (mut c, _) = console(&[], false);
        assert!(c.start_gesture());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(c.start_gesture());
        c.shutdown().await;
    }

    #[tokio::test]
    async fn exit_button_closes_the_link() {
        let (mut c, op) = console(&[], false);
        assert_eq!(c.dispatch(ConsoleAction::Press(CanonicalCommand::Forward)).await, Flow::Continue);
        assert!(op.is_connected());
        c.dispatch(ConsoleAction::Press(CanonicalCommand::Exit)).await;
        assert!(!op.is_connected());
    }

    #[tokio::test]
    async fn quit_waits_for_voice_then_closes() {
        let (mut c, op) = console(&["open the claw"], false);
        c.dispatch(ConsoleAction::Voice).await;
        assert_eq!(c.dispatch(ConsoleAction::Quit).await, Flow::Quit);
        c.shutdown().await;
        assert!(c.voice.is_empty());
        assert!(!op.is_connected());
    }
}
