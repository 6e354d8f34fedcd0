//! Marketplace handle wiring the stores to persistence.

use chrono::Utc;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::Result;
use crate::filter;
use crate::models::{FilterSpec, Product};
use crate::sample;
use crate::session::SessionStore;
use crate::source::CatalogSource;
use crate::storage::{
    MemoryStorage, Storage, StorageExt, CATALOG_KEY, CONVERSATIONS_KEY,
};
use crate::store::{CatalogSnapshot, CatalogStore, ConversationSnapshot, ConversationStore};

/// Builder for creating a [`Marketplace`].
pub struct MarketplaceBuilder {
    storage: Option<Arc<dyn Storage>>,
    seed_samples: bool,
}

impl std::fmt::Debug for MarketplaceBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketplaceBuilder")
            .field("storage", &self.storage)
            .field("seed_samples", &self.seed_samples)
            .finish()
    }
}

impl Default for MarketplaceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketplaceBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            storage: None,
            seed_samples: false,
        }
    }

    /// Set the persistence backend. Defaults to [`MemoryStorage`].
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Start from the demo data when nothing is stored yet.
    pub fn seed_samples(mut self, seed: bool) -> Self {
        self.seed_samples = seed;
        self
    }

    /// Build an empty marketplace without reading storage.
    pub fn build(self) -> Marketplace {
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStorage::new()));
        let dirty = Arc::new(AtomicBool::new(false));

        let mut catalog = CatalogStore::new();
        let flag = dirty.clone();
        catalog.subscribe(move |_| flag.store(true, Ordering::SeqCst));

        let mut conversations = ConversationStore::new();
        let flag = dirty.clone();
        conversations.subscribe(move |_| flag.store(true, Ordering::SeqCst));

        Marketplace {
            catalog,
            conversations,
            storage,
            dirty,
            seed_samples: self.seed_samples,
        }
    }

    /// Build and restore whatever state storage holds.
    pub async fn load(self) -> Result<Marketplace> {
        let mut market = self.build();
        market.reload().await?;
        Ok(market)
    }
}

/// One session's catalog and conversations, plus where they are persisted.
///
/// Store mutations are pure in-memory transitions. A subscriber registered by
/// the builder marks the handle dirty, and [`persist_if_dirty`] writes the
/// snapshots out afterwards.
///
/// [`persist_if_dirty`]: Marketplace::persist_if_dirty
#[derive(Debug)]
pub struct Marketplace {
    catalog: CatalogStore,
    conversations: ConversationStore,
    storage: Arc<dyn Storage>,
    dirty: Arc<AtomicBool>,
    seed_samples: bool,
}

impl Marketplace {
    /// Create a new marketplace builder.
    pub fn builder() -> MarketplaceBuilder {
        MarketplaceBuilder::new()
    }

    /// The product catalog.
    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// Mutable access to the product catalog.
    pub fn catalog_mut(&mut self) -> &mut CatalogStore {
        &mut self.catalog
    }

    /// The conversation store.
    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    /// Mutable access to the conversation store.
    pub fn conversations_mut(&mut self) -> &mut ConversationStore {
        &mut self.conversations
    }

    /// Session persistence over the same backend.
    pub fn session(&self) -> SessionStore {
        SessionStore::new(self.storage.clone())
    }

    /// Run the filter pipeline over the current catalog.
    pub fn browse(&self, spec: &FilterSpec) -> Vec<Product> {
        filter::apply(self.catalog.products(), spec)
    }

    /// Replace the catalog with everything `source` returns.
    pub async fn refresh(&mut self, source: &dyn CatalogSource) -> Result<usize> {
        let products = source.fetch().await?;
        let count = products.len();
        self.catalog.replace_all(products);
        info!("catalog refreshed from {:?}: {} products", source, count);
        Ok(count)
    }

    /// Re-read both snapshots from storage, discarding unsaved changes.
    pub async fn reload(&mut self) -> Result<()> {
        let catalog: Option<CatalogSnapshot> = self.storage.get_json(CATALOG_KEY).await?;
        let conversations: Option<ConversationSnapshot> =
            self.storage.get_json(CONVERSATIONS_KEY).await?;

        let now = Utc::now();
        match catalog {
            Some(snapshot) => self.catalog.restore(snapshot),
            None if self.seed_samples => self.catalog.restore(CatalogSnapshot {
                products: sample::products(now),
            }),
            None => self.catalog.restore(CatalogSnapshot::default()),
        }
        match conversations {
            Some(snapshot) => self.conversations.restore(snapshot),
            None if self.seed_samples => {
                let (chats, messages) = sample::conversation(now);
                self.conversations
                    .restore(ConversationSnapshot { chats, messages });
            }
            None => self.conversations.restore(ConversationSnapshot::default()),
        }

        self.dirty.store(false, Ordering::SeqCst);
        debug!(
            "loaded {} products and {} threads",
            self.catalog.len(),
            self.conversations.threads().len()
        );
        Ok(())
    }

    /// Wipe everything in storage, the session included, and reload. With
    /// sample seeding on, the handle starts over from the demo data.
    pub async fn reset(&mut self) -> Result<()> {
        self.storage.clear().await?;
        info!("storage cleared");
        self.reload().await
    }

    /// Whether a store changed since the last load or persist.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Write both snapshots to storage.
    pub async fn persist(&self) -> Result<()> {
        self.storage
            .set_json(CATALOG_KEY, &self.catalog.snapshot(), None)
            .await?;
        self.storage
            .set_json(CONVERSATIONS_KEY, &self.conversations.snapshot(), None)
            .await?;
        self.dirty.store(false, Ordering::SeqCst);
        debug!("marketplace state persisted");
        Ok(())
    }

    /// Write both snapshots only if something changed. Returns whether it wrote.
    pub async fn persist_if_dirty(&self) -> Result<bool> {
        if !self.is_dirty() {
            return Ok(false);
        }
        self.persist().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Message, SortBy};
    use crate::source::SampleCatalog;

    fn shared_storage() -> Arc<dyn Storage> {
        Arc::new(MemoryStorage::new())
    }

    #[tokio::test]
    async fn test_empty_without_seed() {
        let market = Marketplace::builder().load().await.unwrap();
        assert!(market.catalog().is_empty());
        assert!(market.conversations().threads().is_empty());
        assert!(!market.is_dirty());
    }

    #[tokio::test]
    async fn test_seeded_load() {
        let market = Marketplace::builder().seed_samples(true).load().await.unwrap();
        assert_eq!(market.catalog().len(), 6);
        assert_eq!(market.conversations().threads().len(), 1);
        assert_eq!(
            market.conversations().messages_for_thread(&"chat1".into()).len(),
            3
        );
    }

    #[tokio::test]
    async fn test_mutation_marks_dirty_and_persists() {
        let storage = shared_storage();
        let mut market = Marketplace::builder()
            .storage(storage.clone())
            .seed_samples(true)
            .load()
            .await
            .unwrap();

        assert!(!market.persist_if_dirty().await.unwrap());

        let product = crate::models::Product::builder("42", "Mini Fridge", 3000.0, "9")
            .category(Category::Appliances)
            .build();
        market.catalog_mut().add(product).unwrap();
        assert!(market.is_dirty());
        assert!(market.persist_if_dirty().await.unwrap());
        assert!(!market.is_dirty());

        let reopened = Marketplace::builder()
            .storage(storage)
            .seed_samples(true)
            .load()
            .await
            .unwrap();
        assert_eq!(reopened.catalog().len(), 7);
        assert_eq!(reopened.catalog().products()[0].id.as_str(), "42");
    }

    #[tokio::test]
    async fn test_failed_mutation_stays_clean() {
        let mut market = Marketplace::builder().seed_samples(true).load().await.unwrap();
        assert!(market.catalog_mut().remove_by_id(&"missing".into()).is_err());
        let err = market
            .conversations_mut()
            .post_message(Message::new("missing", "1", "hello"));
        assert!(err.is_err());
        assert!(!market.is_dirty());
    }

    #[tokio::test]
    async fn test_conversation_round_trip() {
        let storage = shared_storage();
        let mut market = Marketplace::builder()
            .storage(storage.clone())
            .load()
            .await
            .unwrap();

        let chat = market
            .conversations_mut()
            .start_thread(&"u1".into(), &"u2".into())
            .unwrap();
        market
            .conversations_mut()
            .post_message(Message::new(chat.clone(), "u2", "still available?"))
            .unwrap();
        market.persist().await.unwrap();

        let reopened = Marketplace::builder().storage(storage).load().await.unwrap();
        let thread = reopened.conversations().thread(&chat).unwrap();
        assert_eq!(thread.last_message.as_deref(), Some("still available?"));
        assert_eq!(reopened.conversations().messages_for_thread(&chat).len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_and_browse() {
        let mut market = Marketplace::builder().load().await.unwrap();
        let count = market.refresh(&SampleCatalog).await.unwrap();
        assert_eq!(count, 6);
        assert!(market.is_dirty());

        let spec = FilterSpec::new()
            .category(Category::Electronics)
            .sort_by(SortBy::PriceLow);
        let prices: Vec<f64> = market.browse(&spec).iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![600.0, 750.0, 800.0]);
    }

    #[tokio::test]
    async fn test_reset_clears_storage() {
        let storage = shared_storage();
        let mut market = Marketplace::builder()
            .storage(storage.clone())
            .seed_samples(true)
            .load()
            .await
            .unwrap();
        market.catalog_mut().remove_by_id(&"1".into()).unwrap();
        market.persist().await.unwrap();
        market
            .session()
            .login(crate::models::UserSession::new("1", "Asha", "asha@iitb.edu.in"))
            .await
            .unwrap();

        market.reset().await.unwrap();
        assert_eq!(market.catalog().len(), 6);
        assert!(!market.is_dirty());
        assert!(market.session().current().await.unwrap().is_none());
        assert!(storage.get(CATALOG_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_session_shares_storage() {
        let storage = shared_storage();
        let market = Marketplace::builder().storage(storage.clone()).build();
        market
            .session()
            .login(crate::models::UserSession::new("1", "Asha", "asha@iitb.edu.in"))
            .await
            .unwrap();

        let other = Marketplace::builder().storage(storage).build();
        assert!(other.session().current().await.unwrap().is_some());
    }
}
