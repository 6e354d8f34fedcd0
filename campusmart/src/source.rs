//! Catalog sources used to refresh the catalog wholesale.

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use std::path::PathBuf;

use crate::error::Result;
use crate::models::Product;
use crate::sample;

/// Supplies a complete product list. Each fetch replaces prior state.
#[async_trait]
pub trait CatalogSource: Send + Sync + std::fmt::Debug {
    /// Fetch every product.
    async fn fetch(&self) -> Result<Vec<Product>>;
}

/// The built-in demo catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleCatalog;

#[async_trait]
impl CatalogSource for SampleCatalog {
    async fn fetch(&self) -> Result<Vec<Product>> {
        Ok(sample::products(Utc::now()))
    }
}

/// A JSON array of products on disk.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    /// Read products from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for JsonFileCatalog {
    async fn fetch(&self) -> Result<Vec<Product>> {
        let data = tokio::fs::read(&self.path).await?;
        let products: Vec<Product> = serde_json::from_slice(&data)?;
        debug!("read {} products from {}", products.len(), self.path.display());
        Ok(products)
    }
}
