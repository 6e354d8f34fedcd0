//! Product handlers.

use anyhow::{bail, Context, Result};
use campusmart::{
    CatalogSource, Category, Condition, FilterSpec, Marketplace, PriceRange, Product, ProductId,
    UserSession,
};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::output::{format_price, format_relative_time, format_time, PlainPrint, TableRow};

/// Product listing info.
#[derive(Debug, Clone, Serialize)]
pub struct ProductInfo {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub category: String,
    pub condition: Option<String>,
    pub seller: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Product> for ProductInfo {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id.to_string(),
            title: p.title.clone(),
            price: p.price,
            category: p.category.to_string(),
            condition: p.condition.map(|c| c.to_string()),
            seller: p
                .seller_name
                .clone()
                .unwrap_or_else(|| p.owner_id.to_string()),
            created_at: p.created_at,
        }
    }
}

impl TableRow for ProductInfo {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Title", "Price", "Category", "Condition", "Seller", "Listed"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            format_price(self.price),
            self.category.clone(),
            self.condition.clone().unwrap_or_else(|| "-".into()),
            self.seller.clone(),
            format_relative_time(self.created_at),
        ]
    }
}

impl PlainPrint for ProductInfo {
    fn plain_print(&self) {
        println!(
            "[{}] {} {}",
            self.id.cyan(),
            self.title.bold(),
            format_price(self.price).green()
        );
        let condition = self
            .condition
            .as_deref()
            .map(|c| format!(" · {}", c))
            .unwrap_or_default();
        println!(
            "   {}{} · {} · {}",
            self.category,
            condition,
            self.seller,
            format_relative_time(self.created_at).dimmed()
        );
    }
}

/// Full listing details.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetails {
    #[serde(flatten)]
    pub info: ProductInfo,
    pub description: String,
    pub images: Vec<String>,
    pub owner_id: String,
}

impl PlainPrint for ProductDetails {
    fn plain_print(&self) {
        self.info.plain_print();
        println!("   {} {}", "Listed:".dimmed(), format_time(self.info.created_at));
        if !self.description.is_empty() {
            println!();
            for line in self.description.lines() {
                println!("   {}", line);
            }
        }
        for image in &self.images {
            println!("   {} {}", "Image:".dimmed(), image);
        }
    }
}

/// A price bucket offered for filtering.
#[derive(Debug, Clone, Serialize)]
pub struct PresetInfo {
    pub label: String,
    pub min: f64,
    pub max: Option<f64>,
}

impl TableRow for PresetInfo {
    fn headers() -> Vec<&'static str> {
        vec!["Range", "Min", "Max"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.label.clone(),
            format_price(self.min),
            self.max.map(format_price).unwrap_or_else(|| "-".into()),
        ]
    }
}

impl PlainPrint for PresetInfo {
    fn plain_print(&self) {
        let max = self.max.map(format_price).unwrap_or_else(|| "∞".into());
        println!("{} ({} - {})", self.label.bold(), format_price(self.min), max);
    }
}

/// Browse criteria as typed on the command line.
#[derive(Debug, Clone, Default)]
pub struct BrowseQuery {
    pub categories: Vec<String>,
    pub conditions: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub search: Option<String>,
    pub sort: String,
}

impl BrowseQuery {
    /// Turn the raw criteria into a filter spec.
    pub fn to_spec(&self) -> Result<FilterSpec> {
        let mut spec = FilterSpec::new().sort_key(&self.sort)?;

        for category in &self.categories {
            spec = spec.category(category.parse::<Category>()?);
        }
        for condition in &self.conditions {
            spec = spec.condition(condition.parse::<Condition>()?);
        }

        let range = match (self.min_price, self.max_price) {
            (None, None) => None,
            (min, Some(max)) => Some(PriceRange::new(min.unwrap_or(0.0), max)?),
            (Some(min), None) => Some(PriceRange::at_least(min)?),
        };
        if let Some(range) = range {
            spec = spec.price_range(range);
        }

        if let Some(query) = &self.search {
            spec = spec.search(query.clone());
        }

        Ok(spec)
    }
}

/// A new listing as typed on the command line.
#[derive(Debug, Clone, Default)]
pub struct NewListing {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
    pub condition: Option<String>,
    pub images: Vec<String>,
}

/// Browse the catalog.
pub fn list_products(market: &Marketplace, query: &BrowseQuery) -> Result<Vec<ProductInfo>> {
    let spec = query.to_spec()?;
    Ok(market.browse(&spec).iter().map(ProductInfo::from).collect())
}

/// Show one listing.
pub fn show_product(market: &Marketplace, id: &str) -> Result<ProductDetails> {
    let product = market
        .catalog()
        .get_by_id(&ProductId::from(id))
        .with_context(|| format!("No product with id {}", id))?;

    Ok(ProductDetails {
        info: ProductInfo::from(product),
        description: product.description.clone(),
        images: product.images.clone(),
        owner_id: product.owner_id.to_string(),
    })
}

/// Listings created by the signed-in user.
pub fn my_products(market: &Marketplace, user: &UserSession) -> Vec<ProductInfo> {
    market
        .catalog()
        .by_owner(&user.id)
        .map(ProductInfo::from)
        .collect()
}

/// Create a listing owned by the signed-in user.
pub fn add_product(
    market: &mut Marketplace,
    user: &UserSession,
    listing: NewListing,
) -> Result<ProductInfo> {
    let mut builder = Product::builder(ProductId::generate(), listing.title, listing.price, user.id.clone())
        .category(listing.category.parse()?)
        .seller_name(user.name.clone())
        .created_at(Utc::now());

    if let Some(description) = listing.description {
        builder = builder.description(description);
    }
    if let Some(condition) = listing.condition {
        builder = builder.condition(condition.parse()?);
    }
    if let Some(college) = &user.college_id {
        builder = builder.college_id(college.clone());
    }
    for image in listing.images {
        builder = builder.image(image);
    }

    let product = builder.build();
    let info = ProductInfo::from(&product);
    market.catalog_mut().add(product)?;
    Ok(info)
}

/// Remove one of the signed-in user's listings.
pub fn remove_product(market: &mut Marketplace, user: &UserSession, id: &str) -> Result<ProductInfo> {
    let id = ProductId::from(id);
    if let Some(product) = market.catalog().get_by_id(&id) {
        if product.owner_id != user.id {
            bail!("Product {} belongs to another seller", id);
        }
    }
    let removed = market.catalog_mut().remove_by_id(&id)?;
    Ok(ProductInfo::from(&removed))
}

/// Replace the catalog from a source.
pub async fn refresh_products(market: &mut Marketplace, source: &dyn CatalogSource) -> Result<usize> {
    Ok(market.refresh(source).await?)
}

/// The price buckets.
pub fn price_presets() -> Vec<PresetInfo> {
    PriceRange::presets()
        .into_iter()
        .map(|(label, range)| PresetInfo {
            label: label.to_string(),
            min: range.min,
            max: range.max,
        })
        .collect()
}
