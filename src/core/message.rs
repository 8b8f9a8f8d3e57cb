use chrono::Local;

/// Format used for transcript and log timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Capitalized label used in the Markdown log.
    pub fn label(self) -> &'static str {
        match self {
            Role::System => "System",
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

impl AsRef<str> for Role {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for Role {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            _ => Err(format!("invalid message role: {value}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: String,
}

impl Message {
    /// Create a message stamped with the current local time.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self::with_timestamp(role, content, now_timestamp())
    }

    pub fn with_timestamp(
        role: Role,
        content: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Ordered, append-only conversation history.
///
/// A system message can only be supplied at construction, which keeps it
/// unique and first.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system(content: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::new(Role::System, content)],
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> &Message {
        self.push(Message::new(Role::User, content))
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) -> &Message {
        self.push(Message::new(Role::Assistant, content))
    }

    fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn system(&self) -> Option<&Message> {
        self.messages.first().filter(|m| m.role == Role::System)
    }

    pub fn count_role(&self, role: Role) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_message_is_first_and_unique() {
        let mut transcript = Transcript::with_system("be brief");
        transcript.push_user("hello");
        transcript.push_assistant("hi");

        assert_eq!(transcript.len(), 3);
        assert_eq!(
            transcript.system().map(|m| m.content.as_str()),
            Some("be brief")
        );
        assert_eq!(transcript.count_role(Role::System), 1);
        assert_eq!(transcript.messages()[1].role, Role::User);
        assert_eq!(transcript.messages()[2].role, Role::Assistant);
    }

    #[test]
    fn plain_transcript_has_no_system_entry() {
        let mut transcript = Transcript::new();
        assert!(transcript.is_empty());
        transcript.push_user("hello");
        assert!(transcript.system().is_none());
    }

    #[test]
    fn timestamps_use_log_format() {
        let message = Message::new(Role::User, "x");
        assert!(
            chrono::NaiveDateTime::parse_from_str(&message.timestamp, TIMESTAMP_FORMAT).is_ok(),
            "unexpected timestamp: {}",
            message.timestamp
        );
    }

    #[test]
    fn invalid_role_strings_are_rejected() {
        assert!(Role::try_from("tool").is_err());
        assert_eq!(Role::try_from("assistant"), Ok(Role::Assistant));
    }
}
