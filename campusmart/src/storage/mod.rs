//! Persistence backends.

mod file;
mod memory;
mod traits;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use traits::{Storage, StorageExt};

/// Key holding the catalog snapshot.
pub const CATALOG_KEY: &str = "product-storage";

/// Key holding the conversation snapshot.
pub const CONVERSATIONS_KEY: &str = "chat-storage";

/// Key holding the signed-in user.
pub const SESSION_KEY: &str = "user";
