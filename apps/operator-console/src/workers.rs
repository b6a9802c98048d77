//! Input modalities with unbounded latency, run off the console loop.
//!
//! Both workers live on tokio's blocking pool. The voice worker handles exactly one
//! utterance per spawn. The gesture worker loops over captured frames until its
//! cancel flag is raised, the source runs dry or the link fails.

use crate::operator::{Operator, Outcome};
use gesture_control::{GestureSource, PinchClassifier};
use parking_lot::Mutex;
use robot_protocol::TransportError;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use voice_local::{RecognitionError, Transcriber};

pub type SharedTranscriber = Arc<Mutex<Box<dyn Transcriber>>>;

#[derive(Debug)]
pub enum VoiceOutcome {
    Handled(Outcome),
    NotRecognized(RecognitionError),
    LinkFailed(TransportError),
}

/// Listens for one utterance and routes it to the robot or the oracle.
pub fn spawn_voice(operator: Operator, transcriber: SharedTranscriber) -> JoinHandle<VoiceOutcome> {
    tokio::task::spawn_blocking(move || {
        println!("Listening...");
        let heard = transcriber.lock().listen();
        let transcript = match heard {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "speech not recognized");
                println!("Could not understand audio: {e}");
                return VoiceOutcome::NotRecognized(e);
            }
        };
        println!("You said: {}", transcript.text);
        match operator.handle_utterance(&transcript.text) {
            Ok(outcome) => VoiceOutcome::Handled(outcome),
            Err(e) => {
                warn!(error = %e, "voice command not delivered");
                VoiceOutcome::LinkFailed(e)
            }
        }
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureStop {
    Cancelled,
    SourceEnded,
    SourceFailed,
    LinkFailed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureReport {
    pub frames: usize,
    pub commands_sent: usize,
    pub stopped_by: GestureStop,
}

/// A running gesture loop and the flag that stops it.
pub struct GestureWorker {
    cancel: watch::Sender<bool>,
    handle: JoinHandle<GestureReport>,
}

impl GestureWorker {
    pub fn spawn(operator: Operator, source: Box<dyn GestureSource>, classifier: PinchClassifier) -> Self {
        let (cancel, cancelled) = watch::channel(false);
        let handle = tokio::task::spawn_blocking(move || run_gestures(operator, source, classifier, cancelled));
        Self { cancel, handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Raises the cancel flag and waits for the loop to notice it.
    pub async fn stop(self) -> Option<GestureReport> {
        // Loop may already be gone, the flag is then irrelevant
        let _ = self.cancel.send(true);
        match self.handle.await {
            Ok(report) => Some(report),
            Err(e) => {
                warn!(error = %e, "gesture worker did not finish cleanly");
                None
            }
        }
    }
}

fn run_gestures(
    operator: Operator,
    mut source: Box<dyn GestureSource>,
    classifier: PinchClassifier,
    cancelled: watch::Receiver<bool>,
) -> GestureReport {
    let mut report = GestureReport {
        frames: 0,
        commands_sent: 0,
        stopped_by: GestureStop::Cancelled,
    };
    info!("gesture control started");
    loop {
        if *cancelled.borrow() {
            break;
        }
        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                report.stopped_by = GestureStop::SourceEnded;
                break;
            }
            Err(e) => {
                warn!(error = %e, "gesture capture failed");
                report.stopped_by = GestureStop::SourceFailed;
                break;
            }
        };
        report.frames += 1;
        for hand in &frame.hands {
            let signal = match classifier.classify(hand) {
                Ok(signal) => signal,
                Err(e) => {
                    debug!(error = %e, "hand skipped");
                    continue;
                }
            };
            if let Err(e) = operator.send(signal.command()) {
                warn!(error = %e, "gesture command not delivered");
                report.stopped_by = GestureStop::LinkFailed;
                info!(?report, "gesture control stopped");
                return report;
            }
            report.commands_sent += 1;
        }
    }
    info!(?report, "gesture control stopped");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::testing::{operator, operator_with, robot};
    use gesture_control::{HandFrame, HandLandmarks, Landmark, MockGestureSource, INDEX_TIP, THUMB_TIP};
    use intent_parser::MockOracle;
    use robot_protocol::{CanonicalCommand, MockLink};
    use voice_local::MockTranscriber;

    fn hand(spread: f32) -> HandLandmarks {
        let mut points = vec![Landmark { x: 0.0, y: 0.0, z: 0.0 }; 21];
        points[THUMB_TIP] = Landmark { x: 0.5, y: 0.5, z: 0.0 };
        points[INDEX_TIP] = Landmark { x: 0.5 + spread, y: 0.5, z: 0.0 };
        HandLandmarks { points }
    }

    fn frame(hands: Vec<HandLandmarks>) -> HandFrame {
        HandFrame { hands, ts: None }
    }

    fn transcriber(script: &[&str]) -> SharedTranscriber {
        let t: Box<dyn Transcriber> = Box::new(MockTranscriber::new(script.to_vec()));
        Arc::new(Mutex::new(t))
    }

    /// Camera that always sees one open hand.
    struct OpenHandForever;

    impl GestureSource for OpenHandForever {
        fn next_frame(&mut self) -> gesture_control::Result<Option<HandFrame>> {
            std::thread::sleep(std::time::Duration::from_millis(1));
            Ok(Some(frame(vec![hand(0.3)])))
        }
    }

    #[tokio::test]
    async fn voice_command_reaches_robot() {
        let (op, speaker) = operator();
        let outcome = spawn_voice(op, transcriber(&["move forward"])).await.unwrap();
        assert!(matches!(
            outcome,
            VoiceOutcome::Handled(Outcome::Command(CanonicalCommand::Forward, _))
        ));
        assert_eq!(speaker.spoken(), vec!["Moved forward".to_string()]);
    }

    #[tokio::test]
    async fn voice_question_goes_to_oracle() {
        let (op, _) = operator();
        let outcome = spawn_voice(op, transcriber(&["tell me a joke"])).await.unwrap();
        assert!(matches!(outcome, VoiceOutcome::Handled(Outcome::Answer(_))));
    }

    #[tokio::test]
    async fn silence_is_not_recognized() {
        let (op, speaker) = operator();
        let outcome = spawn_voice(op, transcriber(&[""])).await.unwrap();
        assert!(matches!(
            outcome,
            VoiceOutcome::NotRecognized(RecognitionError::Unintelligible)
        ));
        assert!(speaker.spoken().is_empty());
    }

    #[tokio::test]
    async fn gestures_drive_the_claw_until_source_ends() {
        let link = MockLink::new(robot);
        let (op, speaker) = operator_with(link, Arc::new(MockOracle::echo()));
        let frames = vec![
            frame(vec![hand(0.3)]),
            frame(vec![]),
            frame(vec![hand(0.05), hand(0.4)]),
        ];
        let worker = GestureWorker::spawn(op, Box::new(MockGestureSource::new(frames)), PinchClassifier::default());
        let report = worker.handle.await.unwrap();
        assert_eq!(report.frames, 3);
        assert_eq!(report.commands_sent, 3);
        assert_eq!(report.stopped_by, GestureStop::SourceEnded);
        assert_eq!(
            speaker.spoken(),
            vec!["Claw opened", "Claw closed", "Claw opened"]
        );
    }

    #[tokio::test]
    async fn cancel_stops_an_endless_source() {
        let (op, _) = operator();
        let worker = GestureWorker::spawn(op, Box::new(OpenHandForever), PinchClassifier::default());
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!worker.is_finished());
        let report = worker.stop().await.unwrap();
        assert_eq!(report.stopped_by, GestureStop::Cancelled);
        assert_eq!(report.frames, report.commands_sent);
    }

    #[tokio::test]
    async fn link_failure_stops_gestures() {
        let link = MockLink::new(|_| Err(TransportError::Closed));
        let (op, _) = operator_with(link, Arc::new(MockOracle::echo()));
        let frames = vec![frame(vec![hand(0.3)]), frame(vec![hand(0.3)])];
        let worker = GestureWorker::spawn(op, Box::new(MockGestureSource::new(frames)), PinchClassifier::default());
        let report = worker.handle.await.unwrap();
        assert_eq!(report.stopped_by, GestureStop::LinkFailed);
        assert_eq!(report.frames, 1);
    }
}
