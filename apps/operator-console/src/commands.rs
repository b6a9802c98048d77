use robot_protocol::CanonicalCommand;

/// One line typed at the console.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsoleAction {
    /// A control-panel button
    Press(CanonicalCommand),
    Ask(String),
    Voice,
    GestureStart,
    GestureStop,
    Help,
    Quit,
    Nothing,
    Invalid(String),
}

pub const HELP: &str = "\
commands:
  press <command>    send a button command (forward backward left right open close
                     stop distance color angle history exit); the bare word works too
  ask <question>     ask the assistant
  voice              listen for one spoken command or question
  gesture start|stop control the claw with hand gestures
  help               this text
  quit               close the link and leave";

pub fn parse_line(line: &str) -> ConsoleAction {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    match (head.to_lowercase().as_str(), rest) {
        ("", _) => ConsoleAction::Nothing,
        ("press", token) => press(token),
        // Empty questions are ignored
        ("ask", "") => ConsoleAction::Nothing,
        ("ask", question) => ConsoleAction::Ask(question.to_string()),
        ("voice", "") => ConsoleAction::Voice,
        ("gesture", "start") => ConsoleAction::GestureStart,
        ("gesture", "stop") => ConsoleAction::GestureStop,
        ("help", _) | ("?", _) => ConsoleAction::Help,
        ("quit", "") => ConsoleAction::Quit,
        (word, "") => match word.parse::<CanonicalCommand>() {
            Ok(cmd) => ConsoleAction::Press(cmd),
            Err(_) => ConsoleAction::Invalid(line.to_string()),
        },
        _ => ConsoleAction::Invalid(line.to_string()),
    }
}

fn press(token: &str) -> ConsoleAction {
    match token.to_lowercase().parse::<CanonicalCommand>() {
        Ok(cmd) => ConsoleAction::Press(cmd),
        Err(_) => ConsoleAction::Invalid(format!("press {token}")),
    }
}
