//! In-memory product catalog.

use log::debug;
use serde::{Deserialize, Serialize};

use super::observer::{Observers, SubscriptionId};
use crate::error::{Error, Result};
use crate::models::{Product, ProductId, UserId};

/// A change applied to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    /// The whole collection was overwritten.
    Replaced { count: usize },
    /// A product was inserted at the head.
    Added(ProductId),
    /// A product was removed.
    Removed(ProductId),
}

/// Serialisable catalog state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
}

/// The authoritative list of products for the session, newest insert first.
#[derive(Debug, Default)]
pub struct CatalogStore {
    products: Vec<Product>,
    observers: Observers<CatalogEvent>,
}

impl CatalogStore {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding `products` in the given order.
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products,
            observers: Observers::default(),
        }
    }

    /// Register a change callback.
    pub fn subscribe(
        &mut self,
        callback: impl Fn(&CatalogEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    /// Remove a change callback.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Overwrite the whole collection, as after a full refetch.
    pub fn replace_all(&mut self, products: Vec<Product>) {
        let count = products.len();
        self.products = products;
        debug!("catalog replaced with {} products", count);
        self.observers.notify(&CatalogEvent::Replaced { count });
    }

    /// Insert a new listing at the front.
    ///
    /// Fails with `DuplicateId` if the id is taken and with `Validation` if
    /// the listing breaks a creation-time rule. Nothing changes on failure.
    pub fn add(&mut self, product: Product) -> Result<()> {
        if self.products.iter().any(|p| p.id == product.id) {
            return Err(Error::duplicate("product", product.id.as_str()));
        }
        product.validate()?;

        let id = product.id.clone();
        self.products.insert(0, product);
        debug!("product {} added", id);
        self.observers.notify(&CatalogEvent::Added(id));
        Ok(())
    }

    /// Remove a listing, returning it.
    pub fn remove_by_id(&mut self, id: &ProductId) -> Result<Product> {
        let index = self
            .products
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| Error::not_found("product", id.as_str()))?;

        let removed = self.products.remove(index);
        debug!("product {} removed", id);
        self.observers.notify(&CatalogEvent::Removed(id.clone()));
        Ok(removed)
    }

    /// Look up a listing. A miss is `None`, never an error.
    pub fn get_by_id(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// All listings in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Listings created by `owner`, in catalog order.
    pub fn by_owner<'a>(&'a self, owner: &'a UserId) -> impl Iterator<Item = &'a Product> + 'a {
        self.products.iter().filter(move |p| &p.owner_id == owner)
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            products: self.products.clone(),
        }
    }

    /// Restore state without notifying subscribers.
    pub fn restore(&mut self, snapshot: CatalogSnapshot) {
        self.products = snapshot.products;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    fn product(id: &str, price: f64) -> Product {
        Product::builder(id, format!("Item {}", id), price, "owner")
            .category(Category::Books)
            .build()
    }

    fn ids(store: &CatalogStore) -> Vec<&str> {
        store.products().iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_add_inserts_at_front() {
        let mut store = CatalogStore::new();
        store.add(product("1", 10.0)).unwrap();
        store.add(product("2", 20.0)).unwrap();
        assert_eq!(ids(&store), vec!["2", "1"]);
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let mut store = CatalogStore::with_products(vec![product("1", 10.0)]);
        let err = store.add(product("1", 99.0)).unwrap_err();
        assert!(matches!(err, Error::DuplicateId { .. }));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_by_id(&"1".into()).unwrap().price, 10.0);
    }

    #[test]
    fn test_add_rejects_invalid_listing() {
        let mut store = CatalogStore::new();
        let err = store.add(product("1", -5.0)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_missing_reports_not_found() {
        let mut store = CatalogStore::with_products(vec![product("1", 10.0), product("2", 5.0)]);
        let err = store.remove_by_id(&"42".into()).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(ids(&store), vec!["1", "2"]);
    }

    #[test]
    fn test_remove_returns_product() {
        let mut store = CatalogStore::with_products(vec![product("1", 10.0), product("2", 5.0)]);
        let removed = store.remove_by_id(&"1".into()).unwrap();
        assert_eq!(removed.id.as_str(), "1");
        assert_eq!(ids(&store), vec!["2"]);
        assert!(store.get_by_id(&"1".into()).is_none());
    }

    #[test]
    fn test_replace_all() {
        let mut store = CatalogStore::with_products(vec![product("1", 10.0)]);
        store.replace_all(vec![product("7", 1.0), product("8", 2.0)]);
        assert_eq!(ids(&store), vec!["7", "8"]);
    }

    #[test]
    fn test_replace_all_skips_validation() {
        let mut store = CatalogStore::new();
        let mut crowded = product("1", 1.0);
        crowded.images = vec!["a".into(); 8];
        store.replace_all(vec![crowded]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_observers_see_mutations_before_return() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut store = CatalogStore::new();
        let log = events.clone();
        store.subscribe(move |e| log.lock().unwrap().push(e.clone()));

        store.add(product("1", 10.0)).unwrap();
        assert_eq!(events.lock().unwrap().len(), 1);

        let _ = store.add(product("1", 10.0));
        let _ = store.remove_by_id(&"missing".into());
        store.remove_by_id(&"1".into()).unwrap();
        store.replace_all(Vec::new());

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                CatalogEvent::Added("1".into()),
                CatalogEvent::Removed("1".into()),
                CatalogEvent::Replaced { count: 0 },
            ]
        );
    }

    #[test]
    fn test_by_owner() {
        let mut mine = product("1", 10.0);
        mine.owner_id = "me".into();
        let store = CatalogStore::with_products(vec![mine, product("2", 5.0)]);
        let me = UserId::from("me");
        let owned: Vec<_> = store.by_owner(&me).map(|p| p.id.as_str()).collect();
        assert_eq!(owned, vec!["1"]);
    }

    #[test]
    fn test_snapshot_restore() {
        let store = CatalogStore::with_products(vec![product("1", 10.0)]);
        let mut other = CatalogStore::new();
        other.restore(store.snapshot());
        assert_eq!(other.products(), store.products());
    }
}
