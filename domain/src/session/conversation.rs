//! Conversation assembly.
//!
//! A [`Conversation`] is the ordered message list sent to the backend for a
//! single request. Order is semantic: the system instruction conditions
//! everything after it, prior turns come next, and the new user turn is last.
//! Once built, a conversation is not modified; retries resend the same one.
//!
//! # Examples
//!
//! ```
//! use structcall_domain::{Conversation, Message, Role};
//!
//! let conversation = Conversation::builder()
//!     .system("You answer with SQL.")
//!     .history(vec![Message::user("hi"), Message::assistant("hello")])
//!     .user("Top 5 customers?")
//!     .build();
//!
//! let roles: Vec<Role> = conversation.iter().map(|m| m.role).collect();
//! assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::User]);
//! assert_eq!(conversation.system_prompt(), Some("You answer with SQL."));
//! ```

use super::entities::{Message, Role};
use serde::{Deserialize, Serialize};

/// An ordered, immutable message sequence for one backend request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Wrap a caller-supplied history exactly as given.
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn builder() -> ConversationBuilder {
        ConversationBuilder::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The system instruction, if the conversation starts with one.
    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .first()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
    }

    /// The most recent user turn.
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self::new(messages)
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// Builder that always emits `system → history → user`.
///
/// Setter call order does not matter; [`build`](Self::build) fixes the order.
#[derive(Debug, Clone, Default)]
pub struct ConversationBuilder {
    system: Option<String>,
    history: Vec<Message>,
    user: Option<String>,
}

impl ConversationBuilder {
    pub fn system(mut self, content: impl Into<String>) -> Self {
        self.system = Some(content.into());
        self
    }

    /// Append prior turns. May be called more than once; turns keep their order.
    pub fn history(mut self, messages: impl IntoIterator<Item = Message>) -> Self {
        self.history.extend(messages);
        self
    }

    pub fn user(mut self, content: impl Into<String>) -> Self {
        self.user = Some(content.into());
        self
    }

    pub fn build(self) -> Conversation {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        if let Some(system) = self.system {
            messages.push(Message::system(system));
        }
        messages.extend(self.history);
        if let Some(user) = self.user {
            messages.push(Message::user(user));
        }
        Conversation { messages }
    }
}
