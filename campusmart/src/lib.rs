//! Catalog, filtering and messaging core for a college marketplace.

pub mod error;
pub mod filter;
pub mod market;
pub mod models;
pub mod sample;
pub mod session;
pub mod source;
pub mod storage;
pub mod store;

// Re-export main types
pub use error::{Error, Result};
pub use market::{Marketplace, MarketplaceBuilder};
pub use session::{SessionStore, SESSION_TTL};
pub use source::{CatalogSource, JsonFileCatalog, SampleCatalog};

// Re-export commonly used models
pub use models::{
    Category, Chat, ChatId, Condition, FilterSpec, Message, MessageId, PriceRange, Product,
    ProductBuilder, ProductId, SortBy, UserId, UserSession, MAX_IMAGES,
};

// Re-export store and storage types
pub use storage::{FileStorage, MemoryStorage, Storage, StorageExt};
pub use store::{
    CatalogEvent, CatalogStore, ConversationEvent, ConversationStore, SubscriptionId,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let market = Marketplace::builder().build();
        assert!(market.catalog().is_empty());
        assert!(!market.is_dirty());
    }

    #[test]
    fn test_browse_price_low_scenario() {
        let mut market = Marketplace::builder().build();
        market.catalog_mut().replace_all(vec![
            Product::builder("1", "Notes", 25.0, "a")
                .category(Category::Books)
                .created_at("2024-01-01T00:00:00Z".parse().unwrap())
                .build(),
            Product::builder("2", "Stool", 15.0, "b")
                .category(Category::Furniture)
                .created_at("2024-01-05T00:00:00Z".parse().unwrap())
                .build(),
        ]);

        let spec = FilterSpec::new().sort_key("price-low").unwrap();
        let ids: Vec<_> = market.browse(&spec).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![ProductId::from("2"), ProductId::from("1")]);
    }
}
