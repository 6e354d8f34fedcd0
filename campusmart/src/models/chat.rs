//! Conversation models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ChatId, MessageId, UserId};

/// A conversation between exactly two users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    /// Thread ID.
    pub id: ChatId,
    /// First participant.
    #[serde(alias = "user1Id")]
    pub participant_a: UserId,
    /// Second participant.
    #[serde(alias = "user2Id")]
    pub participant_b: UserId,
    /// Copy of the most recent message's content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    /// Time of the last message, or creation time for an empty thread.
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    /// Whether this thread is between `a` and `b`, in either order.
    pub fn is_between(&self, a: &UserId, b: &UserId) -> bool {
        (&self.participant_a == a && &self.participant_b == b)
            || (&self.participant_a == b && &self.participant_b == a)
    }

    /// Whether `user` takes part in this thread.
    pub fn has_participant(&self, user: &UserId) -> bool {
        &self.participant_a == user || &self.participant_b == user
    }

    /// The participant that is not `me`.
    pub fn other_participant(&self, me: &UserId) -> &UserId {
        if &self.participant_a == me {
            &self.participant_b
        } else {
            &self.participant_a
        }
    }
}

/// A single message in a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message ID.
    pub id: MessageId,
    /// Owning thread.
    #[serde(alias = "chatId")]
    pub thread_id: ChatId,
    /// Sender, one of the thread's participants.
    pub sender_id: UserId,
    /// Message text.
    pub content: String,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message stamped with the current time and a fresh id.
    pub fn new(
        thread_id: impl Into<ChatId>,
        sender_id: impl Into<UserId>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: MessageId::generate(),
            thread_id: thread_id.into(),
            sender_id: sender_id.into(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat() -> Chat {
        Chat {
            id: "chat1".into(),
            participant_a: "1".into(),
            participant_b: "2".into(),
            last_message: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_between_ignores_order() {
        let c = chat();
        assert!(c.is_between(&"1".into(), &"2".into()));
        assert!(c.is_between(&"2".into(), &"1".into()));
        assert!(!c.is_between(&"1".into(), &"3".into()));
    }

    #[test]
    fn test_other_participant() {
        let c = chat();
        assert_eq!(c.other_participant(&"1".into()).as_str(), "2");
        assert_eq!(c.other_participant(&"2".into()).as_str(), "1");
    }

    #[test]
    fn test_message_accepts_chat_id_alias() {
        let json = r#"{
            "id": "msg1",
            "chatId": "chat1",
            "senderId": "2",
            "content": "Hi, is the calculator still available?",
            "timestamp": "2024-01-01T10:00:00Z"
        }"#;
        let m: Message = serde_json::from_str(json).unwrap();
        assert_eq!(m.thread_id.as_str(), "chat1");
    }
}
