//! Chat commands.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use rust_i18n::t;
use std::path::Path;

use crate::config::{open_market, require_user};
use crate::handlers::chat as handlers;
use crate::output::{print_table, OutputFormat};

#[derive(Subcommand)]
pub enum ChatAction {
    /// List your chats
    #[command(alias = "ls")]
    List,

    /// Start (or reopen) a chat with a user
    Start {
        /// Other user's ID
        user: String,
    },

    /// Start (or reopen) a chat with a listing's seller
    Contact {
        /// Product ID
        product: String,
    },

    /// Send a message
    Send {
        /// Chat ID
        chat: String,
        /// Message content
        content: String,
    },

    /// Read a chat
    Read {
        /// Chat ID
        chat: String,
    },
}

pub async fn handle(action: ChatAction, format: OutputFormat, data_dir: Option<&Path>) -> Result<()> {
    let mut market = open_market(data_dir).await?;
    let user = require_user(&market).await?;

    match action {
        ChatAction::List => {
            print_table(handlers::list_chats(&market, &user), format);
        }
        ChatAction::Start { user: other } => {
            let chat = handlers::start_chat(&mut market, &user, &other)?;
            println!("{}", t!("chat_with", id = chat.id.cyan(), user = chat.with.green()));
        }
        ChatAction::Contact { product } => {
            let chat = handlers::contact_seller(&mut market, &user, &product)?;
            println!("{}", t!("chat_with", id = chat.id.cyan(), user = chat.with.green()));
        }
        ChatAction::Send { chat, content } => {
            handlers::send_message(&mut market, &user, &chat, &content)?;
            println!("{}", t!("message_sent", id = chat));
        }
        ChatAction::Read { chat } => {
            let messages = handlers::read_chat(&market, &user, &chat)?;
            if matches!(format, OutputFormat::Plain) {
                println!("{}\n", t!("conversation", id = chat.cyan()));
            }
            print_table(messages, format);
        }
    }

    market.persist_if_dirty().await?;
    Ok(())
}
