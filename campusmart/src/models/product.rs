//! Product listing models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{ProductId, UserId};
use crate::error::{Error, Result};

/// Maximum number of images a listing may carry when it is created.
pub const MAX_IMAGES: usize = 5;

/// A product listed on the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product ID, unique within the catalog.
    pub id: ProductId,
    /// Listing title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Asking price.
    pub price: f64,
    /// Listing category.
    pub category: Category,
    /// Item condition, when the listing states one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    /// Image references, in display order.
    #[serde(default)]
    pub images: Vec<String>,
    /// The user who created the listing.
    #[serde(alias = "userId", alias = "sellerId")]
    pub owner_id: UserId,
    /// Display name of the seller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,
    /// College the listing belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college_id: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Start building a product listing.
    pub fn builder(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        price: f64,
        owner_id: impl Into<UserId>,
    ) -> ProductBuilder {
        ProductBuilder {
            product: Product {
                id: id.into(),
                title: title.into(),
                description: String::new(),
                price,
                category: Category::Other,
                condition: None,
                images: Vec::new(),
                owner_id: owner_id.into(),
                seller_name: None,
                college_id: None,
                created_at: Utc::now(),
            },
        }
    }

    /// Check the creation-time invariants of a listing.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::validation("product id is required"));
        }
        if self.title.trim().is_empty() {
            return Err(Error::validation("title is required"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(Error::validation(format!(
                "price must be a non-negative number, got {}",
                self.price
            )));
        }
        if self.images.len() > MAX_IMAGES {
            return Err(Error::validation(format!(
                "a listing can carry at most {} images, got {}",
                MAX_IMAGES,
                self.images.len()
            )));
        }
        Ok(())
    }
}

/// Builder for [`Product`].
#[derive(Debug, Clone)]
pub struct ProductBuilder {
    product: Product,
}

impl ProductBuilder {
    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.product.description = description.into();
        self
    }

    /// Set the category.
    pub fn category(mut self, category: Category) -> Self {
        self.product.category = category;
        self
    }

    /// Set the condition.
    pub fn condition(mut self, condition: Condition) -> Self {
        self.product.condition = Some(condition);
        self
    }

    /// Append an image reference.
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.product.images.push(image.into());
        self
    }

    /// Set the seller display name.
    pub fn seller_name(mut self, name: impl Into<String>) -> Self {
        self.product.seller_name = Some(name.into());
        self
    }

    /// Set the college.
    pub fn college_id(mut self, college_id: impl Into<String>) -> Self {
        self.product.college_id = Some(college_id.into());
        self
    }

    /// Set the creation time.
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.product.created_at = created_at;
        self
    }

    /// Finish without validating.
    pub fn build(self) -> Product {
        self.product
    }
}

/// Listing category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Books,
    Electronics,
    Furniture,
    Clothing,
    Appliances,
    Sports,
    /// Anything else, including categories this build does not know.
    #[default]
    #[serde(other)]
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 7] = [
        Category::Books,
        Category::Electronics,
        Category::Furniture,
        Category::Clothing,
        Category::Appliances,
        Category::Sports,
        Category::Other,
    ];

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Books => "Books",
            Category::Electronics => "Electronics",
            Category::Furniture => "Furniture",
            Category::Clothing => "Clothing",
            Category::Appliances => "Appliances",
            Category::Sports => "Sports",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid(format!("unknown category: {}", s)))
    }
}

/// Item condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    New,
    #[serde(rename = "Like New")]
    LikeNew,
    Good,
    Fair,
    Poor,
}

impl Condition {
    /// All conditions, best first.
    pub const ALL: [Condition; 5] = [
        Condition::New,
        Condition::LikeNew,
        Condition::Good,
        Condition::Fair,
        Condition::Poor,
    ];

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Condition::New => "New",
            Condition::LikeNew => "Like New",
            Condition::Good => "Good",
            Condition::Fair => "Fair",
            Condition::Poor => "Poor",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Condition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().replace(['-', '_'], " ");
        Condition::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| Error::invalid(format!("unknown condition: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp() -> Product {
        Product::builder("3", "Desk Lamp", 600.0, "4")
            .category(Category::Electronics)
            .build()
    }

    #[test]
    fn test_validate_accepts_plain_listing() {
        assert!(lamp().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let mut p = lamp();
        p.price = -1.0;
        assert!(matches!(p.validate(), Err(Error::Validation(_))));

        p.price = f64::NAN;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_validate_caps_images() {
        let mut p = lamp();
        p.images = (0..MAX_IMAGES).map(|i| format!("img{}.png", i)).collect();
        assert!(p.validate().is_ok());

        p.images.push("one-too-many.png".into());
        assert!(matches!(p.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_validate_requires_title() {
        let mut p = lamp();
        p.title = "   ".into();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("books".parse::<Category>().unwrap(), Category::Books);
        assert_eq!(" Sports ".parse::<Category>().unwrap(), Category::Sports);
        assert!("Spaceships".parse::<Category>().is_err());
    }

    #[test]
    fn test_unknown_category_decodes_as_other() {
        let c: Category = serde_json::from_str("\"Lab Equipment\"").unwrap();
        assert_eq!(c, Category::Other);
    }

    #[test]
    fn test_condition_wire_name() {
        let json = serde_json::to_string(&Condition::LikeNew).unwrap();
        assert_eq!(json, "\"Like New\"");
        assert_eq!("like-new".parse::<Condition>().unwrap(), Condition::LikeNew);
    }

    #[test]
    fn test_product_accepts_legacy_owner_field() {
        let json = r#"{
            "id": "1",
            "title": "Casio Scientific Calculator",
            "price": 800,
            "category": "Electronics",
            "userId": "2",
            "createdAt": "2024-01-01T00:00:00Z"
        }"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert_eq!(p.owner_id.as_str(), "2");
        assert!(p.condition.is_none());
        assert!(p.images.is_empty());
    }
}
