//! In-memory chat threads and messages.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use super::observer::{Observers, SubscriptionId};
use crate::error::{Error, Result};
use crate::models::{Chat, ChatId, Message, MessageId, UserId};

/// A change applied to the conversation store.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversationEvent {
    /// A new thread was created.
    ThreadStarted(ChatId),
    /// A message was appended to a thread.
    MessagePosted { chat_id: ChatId, message_id: MessageId },
}

/// Serialisable conversation state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationSnapshot {
    pub chats: Vec<Chat>,
    pub messages: Vec<Message>,
}

/// Threads, most recently active first, and the messages they own.
#[derive(Debug, Default)]
pub struct ConversationStore {
    chats: Vec<Chat>,
    messages: Vec<Message>,
    observers: Observers<ConversationEvent>,
}

impl ConversationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a change callback.
    pub fn subscribe(
        &mut self,
        callback: impl Fn(&ConversationEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    /// Remove a change callback.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Find the thread between two users, in either order.
    pub fn find_thread(&self, a: &UserId, b: &UserId) -> Option<&Chat> {
        self.chats.iter().find(|c| c.is_between(a, b))
    }

    /// Return the thread between `a` and `b`, creating it if needed.
    pub fn start_thread(&mut self, a: &UserId, b: &UserId) -> Result<ChatId> {
        self.start_thread_at(a, b, Utc::now())
    }

    /// [`start_thread`](Self::start_thread) with an explicit creation time.
    pub fn start_thread_at(
        &mut self,
        a: &UserId,
        b: &UserId,
        now: DateTime<Utc>,
    ) -> Result<ChatId> {
        if a.is_empty() || b.is_empty() {
            return Err(Error::invalid("both participants are required"));
        }
        if a == b {
            return Err(Error::invalid(format!("cannot start a thread with yourself ({})", a)));
        }
        if let Some(existing) = self.find_thread(a, b) {
            return Ok(existing.id.clone());
        }

        let id = ChatId::generate();
        self.chats.insert(
            0,
            Chat {
                id: id.clone(),
                participant_a: a.clone(),
                participant_b: b.clone(),
                last_message: None,
                updated_at: now,
            },
        );
        debug!("thread {} started between {} and {}", id, a, b);
        self.observers.notify(&ConversationEvent::ThreadStarted(id.clone()));
        Ok(id)
    }

    /// Append a message and bring its thread up to date.
    ///
    /// All checks run before anything is written, so a failed post leaves
    /// the store untouched.
    pub fn post_message(&mut self, message: Message) -> Result<()> {
        let chat_index = self
            .chats
            .iter()
            .position(|c| c.id == message.thread_id)
            .ok_or_else(|| Error::UnknownThread(message.thread_id.to_string()))?;

        if !self.chats[chat_index].has_participant(&message.sender_id) {
            return Err(Error::invalid(format!(
                "{} is not a participant of {}",
                message.sender_id, message.thread_id
            )));
        }
        if message.content.trim().is_empty() {
            return Err(Error::validation("message content is required"));
        }
        if self.messages.iter().any(|m| m.id == message.id) {
            return Err(Error::duplicate("message", message.id.as_str()));
        }

        let event = ConversationEvent::MessagePosted {
            chat_id: message.thread_id.clone(),
            message_id: message.id.clone(),
        };

        let chat = &mut self.chats[chat_index];
        chat.last_message = Some(message.content.clone());
        chat.updated_at = message.timestamp;
        self.messages.push(message);
        self.chats.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        debug!("message posted: {:?}", event);
        self.observers.notify(&event);
        Ok(())
    }

    /// Messages of a thread, oldest first. Unknown threads yield nothing.
    pub fn messages_for_thread(&self, thread_id: &ChatId) -> Vec<&Message> {
        let mut messages: Vec<&Message> = self
            .messages
            .iter()
            .filter(|m| &m.thread_id == thread_id)
            .collect();
        messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        messages
    }

    /// Look up a thread.
    pub fn thread(&self, id: &ChatId) -> Option<&Chat> {
        self.chats.iter().find(|c| &c.id == id)
    }

    /// All threads, most recently active first.
    pub fn threads(&self) -> &[Chat] {
        &self.chats
    }

    /// Threads `user` takes part in, most recently active first.
    pub fn threads_for_user<'a>(&'a self, user: &'a UserId) -> impl Iterator<Item = &'a Chat> + 'a {
        self.chats.iter().filter(move |c| c.has_participant(user))
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            chats: self.chats.clone(),
            messages: self.messages.clone(),
        }
    }

    /// Restore state without notifying subscribers.
    pub fn restore(&mut self, snapshot: ConversationSnapshot) {
        self.chats = snapshot.chats;
        self.messages = snapshot.messages;
    }
}
