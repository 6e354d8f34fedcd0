//! Data models for marketplace entities.

mod chat;
mod filter;
mod ids;
mod product;
mod user;

pub use chat::{Chat, Message};
pub use filter::{FilterSpec, PriceRange, SortBy};
pub use ids::{ChatId, MessageId, ProductId, UserId};
pub use product::{Category, Condition, Product, ProductBuilder, MAX_IMAGES};
pub use user::{college_name_from_email, is_college_email, UserSession};
