//! Mutable in-memory stores.

mod catalog;
mod conversation;
mod observer;

pub use catalog::{CatalogEvent, CatalogSnapshot, CatalogStore};
pub use conversation::{ConversationEvent, ConversationSnapshot, ConversationStore};
pub use observer::{Observers, SubscriptionId};
