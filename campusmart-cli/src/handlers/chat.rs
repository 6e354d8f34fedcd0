//! Chat handlers.

use anyhow::{bail, Context, Result};
use campusmart::{Chat, ChatId, Marketplace, Message, ProductId, UserId, UserSession};
use chrono::{DateTime, Utc};
use colored::Colorize;
use rust_i18n::t;
use serde::Serialize;

use crate::output::{format_relative_time, PlainPrint, TableRow};

/// Chat thread info.
#[derive(Debug, Clone, Serialize)]
pub struct ChatInfo {
    pub id: String,
    pub with: String,
    pub last_message: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ChatInfo {
    fn new(chat: &Chat, me: &UserId) -> Self {
        Self {
            id: chat.id.to_string(),
            with: chat.other_participant(me).to_string(),
            last_message: chat.last_message.clone(),
            updated_at: chat.updated_at,
        }
    }
}

impl TableRow for ChatInfo {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "With", "Last message", "Updated"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.with.clone(),
            self.last_message.clone().unwrap_or_default(),
            format_relative_time(self.updated_at),
        ]
    }
}

impl PlainPrint for ChatInfo {
    fn plain_print(&self) {
        println!(
            "[{}] {} {}",
            self.id.cyan(),
            self.with.green(),
            format_relative_time(self.updated_at).dimmed()
        );
        if let Some(last) = &self.last_message {
            println!("   {}", last);
        }
    }
}

/// Chat message info.
#[derive(Debug, Clone, Serialize)]
pub struct MessageInfo {
    pub id: String,
    pub from: String,
    pub is_mine: bool,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl MessageInfo {
    fn new(message: &Message, me: &UserId) -> Self {
        Self {
            id: message.id.to_string(),
            from: message.sender_id.to_string(),
            is_mine: &message.sender_id == me,
            content: message.content.clone(),
            timestamp: message.timestamp,
        }
    }
}

impl TableRow for MessageInfo {
    fn headers() -> Vec<&'static str> {
        vec!["From", "Content", "Time"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.from.clone(),
            self.content.clone(),
            format_relative_time(self.timestamp),
        ]
    }
}

impl PlainPrint for MessageInfo {
    fn plain_print(&self) {
        let from_display = if self.is_mine {
            t!("you_label").to_string().green().to_string()
        } else {
            self.from.clone()
        };
        println!(
            "{} {}",
            from_display,
            format_relative_time(self.timestamp).dimmed()
        );
        for line in self.content.lines() {
            if !line.trim().is_empty() {
                println!("   {}", line);
            }
        }
        println!();
    }
}

/// Threads of the signed-in user, most recent first.
pub fn list_chats(market: &Marketplace, user: &UserSession) -> Vec<ChatInfo> {
    market
        .conversations()
        .threads_for_user(&user.id)
        .map(|c| ChatInfo::new(c, &user.id))
        .collect()
}

/// Open (or reuse) a thread with another user.
pub fn start_chat(market: &mut Marketplace, user: &UserSession, other: &str) -> Result<ChatInfo> {
    let other = UserId::from(other);
    let id = market
        .conversations_mut()
        .start_thread(&user.id, &other)?;
    thread_info(market, user, &id)
}

/// Open (or reuse) a thread with the seller of a listing.
pub fn contact_seller(market: &mut Marketplace, user: &UserSession, product_id: &str) -> Result<ChatInfo> {
    let seller = market
        .catalog()
        .get_by_id(&ProductId::from(product_id))
        .with_context(|| format!("No product with id {}", product_id))?
        .owner_id
        .clone();
    start_chat(market, user, seller.as_str())
}

/// Post a message to one of the signed-in user's threads.
pub fn send_message(
    market: &mut Marketplace,
    user: &UserSession,
    chat_id: &str,
    content: &str,
) -> Result<MessageInfo> {
    let message = Message::new(chat_id, user.id.clone(), content);
    let info = MessageInfo::new(&message, &user.id);
    market.conversations_mut().post_message(message)?;
    Ok(info)
}

/// Messages of a thread, oldest first.
pub fn read_chat(market: &Marketplace, user: &UserSession, chat_id: &str) -> Result<Vec<MessageInfo>> {
    let chat_id = ChatId::from(chat_id);
    if let Some(chat) = market.conversations().thread(&chat_id) {
        if !chat.has_participant(&user.id) {
            bail!("You are not part of chat {}", chat_id);
        }
    }
    Ok(market
        .conversations()
        .messages_for_thread(&chat_id)
        .into_iter()
        .map(|m| MessageInfo::new(m, &user.id))
        .collect())
}

fn thread_info(market: &Marketplace, user: &UserSession, id: &ChatId) -> Result<ChatInfo> {
    let chat = market
        .conversations()
        .thread(id)
        .with_context(|| format!("No chat with id {}", id))?;
    Ok(ChatInfo::new(chat, &user.id))
}
