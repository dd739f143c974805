//! Message and Conversation domain types.
//!
//! These are the core value objects that flow through the system:
//! a user turn arrives, the orchestrator interprets it, tool results are
//! folded back in, and the provider generates the final reply.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a chat session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The assistant
    Assistant,
    /// System instructions (persona, rules)
    System,
    /// Tool execution result
    Tool,
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Tool calls requested by the assistant (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<MessageToolCall>,

    /// If this is a tool result, which tool call it responds to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    /// Create a tool result message.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        let mut msg = Self::with_role(Role::Tool, content);
        msg.tool_call_id = Some(tool_call_id.into());
        msg
    }

    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            timestamp: Utc::now(),
        }
    }
}

/// A tool call embedded in an assistant message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageToolCall {
    /// Unique ID for this tool call
    pub id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// Arguments as JSON string
    pub arguments: String,
}

/// A conversation is an ordered sequence of messages with shared context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Owning session
    pub session_id: SessionId,

    /// Ordered messages
    pub messages: Vec<Message>,

    /// When this conversation was created
    pub created_at: DateTime<Utc>,

    /// When the last message was added
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new empty conversation.
    pub fn new(session_id: SessionId) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a message to the conversation.
    pub fn push(&mut self, message: Message) {
        self.updated_at = Utc::now();
        self.messages.push(message);
    }

    /// The system message plus the most recent `window` messages.
    ///
    /// Keeps provider requests bounded on long sessions without losing
    /// the persona instructions at index 0.
    pub fn recent_window(&self, window: usize) -> Vec<Message> {
        let system: Vec<Message> = self
            .messages
            .first()
            .filter(|m| m.role == Role::System)
            .cloned()
            .into_iter()
            .collect();

        let rest: Vec<&Message> = self
            .messages
            .iter()
            .skip(system.len())
            .collect();

        let start = rest.len().saturating_sub(window);
        system
            .into_iter()
            .chain(rest[start..].iter().map(|m| (*m).clone()))
            .collect()
    }

    /// Drop everything except the leading system message.
    pub fn reset(&mut self) {
        self.messages.retain(|m| m.role == Role::System);
        self.messages.truncate(1);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("Recommend me a thriller");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Recommend me a thriller");
        assert!(msg.tool_calls.is_empty());
    }

    #[test]
    fn conversation_tracks_updates() {
        let mut conv = Conversation::new(SessionId::new());
        let created = conv.created_at;

        conv.push(Message::user("First message"));
        assert_eq!(conv.messages.len(), 1);
        assert!(conv.updated_at >= created);
    }

    #[test]
    fn message_serialization_roundtrip() {
        let msg = Message::tool_result("call_1", "{\"found\":true}");
        let json = serde_json::to_string(&msg).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.role, Role::Tool);
        assert_eq!(deserialized.tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn recent_window_keeps_system_message() {
        let mut conv = Conversation::new(SessionId::new());
        conv.push(Message::system("persona instructions"));
        for i in 0..20 {
            conv.push(Message::user(format!("turn {i}")));
        }

        let window = conv.recent_window(10);
        assert_eq!(window.len(), 11);
        assert_eq!(window[0].role, Role::System);
        assert_eq!(window[1].content, "turn 10");
        assert_eq!(window[10].content, "turn 19");
    }

    #[test]
    fn recent_window_short_conversation() {
        let mut conv = Conversation::new(SessionId::new());
        conv.push(Message::system("persona"));
        conv.push(Message::user("hello"));

        let window = conv.recent_window(10);
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn reset_keeps_only_system() {
        let mut conv = Conversation::new(SessionId::new());
        conv.push(Message::system("persona"));
        conv.push(Message::user("hello"));
        conv.push(Message::assistant("hi!"));

        conv.reset();
        assert_eq!(conv.messages.len(), 1);
        assert_eq!(conv.messages[0].role, Role::System);
    }
}
