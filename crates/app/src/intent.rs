use std::fmt;

use lesson_core::model::Topic;

/// One line of user input, mapped onto a session operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Topics,
    Select(Topic),
    Next,
    Previous,
    Reveal,
    Listen,
    Exit,
    Quit,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentError {
    Empty,
    MissingTopic,
    UnknownTopic(String),
    Unknown(String),
}

impl fmt::Display for IntentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntentError::Empty => write!(f, "type a command, or `help`"),
            IntentError::MissingTopic => write!(f, "select requires a topic number or name"),
            IntentError::UnknownTopic(raw) => write!(f, "unknown topic: {raw}"),
            IntentError::Unknown(raw) => write!(f, "unknown command: {raw}"),
        }
    }
}

impl std::error::Error for IntentError {}

impl Intent {
    /// Parse a command line such as `select 3`, `select colors` or `n`.
    pub fn parse(line: &str) -> Result<Self, IntentError> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Err(IntentError::Empty);
        };

        match command.to_ascii_lowercase().as_str() {
            "topics" | "t" => Ok(Self::Topics),
            "select" | "s" => {
                let rest: Vec<&str> = words.collect();
                if rest.is_empty() {
                    return Err(IntentError::MissingTopic);
                }
                parse_topic(&rest.join(" ")).map(Self::Select)
            }
            "next" | "n" => Ok(Self::Next),
            "previous" | "prev" | "p" => Ok(Self::Previous),
            "reveal" | "r" => Ok(Self::Reveal),
            "listen" | "l" => Ok(Self::Listen),
            "exit" | "home" => Ok(Self::Exit),
            "quit" | "q" => Ok(Self::Quit),
            "help" | "h" | "?" => Ok(Self::Help),
            other => Err(IntentError::Unknown(other.to_string())),
        }
    }
}

/// Topic by 1-based home-screen number, slug or label.
fn parse_topic(raw: &str) -> Result<Topic, IntentError> {
    if let Ok(number) = raw.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|index| Topic::ALL.get(index).copied())
            .ok_or_else(|| IntentError::UnknownTopic(raw.to_string()));
    }
    raw.parse().map_err(|_| IntentError::UnknownTopic(raw.to_string()))
}
