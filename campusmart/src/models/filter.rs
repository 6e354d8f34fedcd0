//! Filter specification models.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::{Category, Condition};
use crate::error::{Error, Result};

/// Catalog sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SortBy {
    /// Most recently created first.
    #[default]
    Newest,
    /// Oldest first.
    Oldest,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
}

impl SortBy {
    /// Wire name of this sort key.
    pub fn key(&self) -> &'static str {
        match self {
            SortBy::Newest => "newest",
            SortBy::Oldest => "oldest",
            SortBy::PriceLow => "price-low",
            SortBy::PriceHigh => "price-high",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SortBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "newest" => Ok(SortBy::Newest),
            "oldest" => Ok(SortBy::Oldest),
            "price-low" => Ok(SortBy::PriceLow),
            "price-high" => Ok(SortBy::PriceHigh),
            other => Err(Error::InvalidSortKey(other.to_owned())),
        }
    }
}

impl TryFrom<String> for SortBy {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SortBy> for String {
    fn from(value: SortBy) -> Self {
        value.key().to_owned()
    }
}

/// Inclusive price bounds. A missing `max` means no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    #[serde(default)]
    pub max: Option<f64>,
}

impl PriceRange {
    /// Create a bounded range.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        Self::checked(min, Some(max))
    }

    /// Create a range with no upper bound.
    pub fn at_least(min: f64) -> Result<Self> {
        Self::checked(min, None)
    }

    fn checked(min: f64, max: Option<f64>) -> Result<Self> {
        if !min.is_finite() || min < 0.0 {
            return Err(Error::invalid(format!("invalid minimum price: {}", min)));
        }
        if let Some(max) = max {
            if !max.is_finite() || max < min {
                return Err(Error::invalid(format!(
                    "invalid price range: {} - {}",
                    min, max
                )));
            }
        }
        Ok(Self { min, max })
    }

    /// Whether `price` lies inside the range, bounds included.
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && self.max.map_or(true, |max| price <= max)
    }

    /// The labelled buckets offered by the browse sidebar.
    pub fn presets() -> Vec<(&'static str, PriceRange)> {
        vec![
            ("Under 500", PriceRange { min: 0.0, max: Some(500.0) }),
            ("500 - 1000", PriceRange { min: 500.0, max: Some(1000.0) }),
            ("1000 - 2000", PriceRange { min: 1000.0, max: Some(2000.0) }),
            ("2000 - 5000", PriceRange { min: 2000.0, max: Some(5000.0) }),
            ("Over 5000", PriceRange { min: 5000.0, max: None }),
        ]
    }
}

/// Criteria and ordering used to derive the visible slice of the catalog.
///
/// Empty sets and absent values impose no restriction. Unlike stored
/// products, a spec naming an unknown category fails to decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    #[serde(deserialize_with = "known_categories")]
    pub categories: HashSet<Category>,
    pub conditions: HashSet<Condition>,
    pub price_range: Option<PriceRange>,
    pub search_query: String,
    pub sort_by: SortBy,
}

impl FilterSpec {
    /// An unrestricted spec sorted newest first.
    pub fn new() -> Self {
        Self::default()
    }

    /// Include a category.
    pub fn category(mut self, category: Category) -> Self {
        self.categories.insert(category);
        self
    }

    /// Include a condition.
    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.insert(condition);
        self
    }

    /// Restrict to a price range.
    pub fn price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }

    /// Set the search query.
    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    /// Set the sort order.
    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Set the sort order from its wire name.
    pub fn sort_key(self, key: &str) -> Result<Self> {
        Ok(self.sort_by(key.parse()?))
    }

    /// Whether no stage narrows the catalog.
    pub fn is_unrestricted(&self) -> bool {
        self.categories.is_empty()
            && self.conditions.is_empty()
            && self.price_range.is_none()
            && self.search_query.is_empty()
    }
}

fn known_categories<'de, D>(deserializer: D) -> std::result::Result<HashSet<Category>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Vec::<String>::deserialize(deserializer)?
        .iter()
        .map(|name| name.parse().map_err(serde::de::Error::custom))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("price-low".parse::<SortBy>().unwrap(), SortBy::PriceLow);
        assert_eq!("newest".parse::<SortBy>().unwrap(), SortBy::Newest);
        assert!(matches!(
            "cheapest".parse::<SortBy>(),
            Err(Error::InvalidSortKey(k)) if k == "cheapest"
        ));
    }

    #[test]
    fn test_sort_key_serde() {
        let json = serde_json::to_string(&SortBy::PriceHigh).unwrap();
        assert_eq!(json, "\"price-high\"");
        assert!(serde_json::from_str::<SortBy>("\"popular\"").is_err());
    }

    #[test]
    fn test_filter_spec_from_json_defaults() {
        let spec: FilterSpec = serde_json::from_str(r#"{"sortBy":"oldest"}"#).unwrap();
        assert_eq!(spec.sort_by, SortBy::Oldest);
        assert!(spec.is_unrestricted());
    }

    #[test]
    fn test_filter_spec_rejects_bad_sort_in_json() {
        let err = serde_json::from_str::<FilterSpec>(r#"{"sortBy":"random"}"#).unwrap_err();
        assert!(err.to_string().contains("Invalid sort key"));
    }

    #[test]
    fn test_filter_spec_categories_from_json() {
        let spec: FilterSpec =
            serde_json::from_str(r#"{"categories":["books","Electronics","Other"]}"#).unwrap();
        let expected: HashSet<_> = [Category::Books, Category::Electronics, Category::Other]
            .into_iter()
            .collect();
        assert_eq!(spec.categories, expected);

        let err = serde_json::from_str::<FilterSpec>(r#"{"categories":["Textbooks"]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("unknown category: Textbooks"));
    }

    #[test]
    fn test_price_range_bounds() {
        let r = PriceRange::new(500.0, 1000.0).unwrap();
        assert!(r.contains(500.0));
        assert!(r.contains(1000.0));
        assert!(!r.contains(1000.01));
        assert!(!r.contains(499.0));

        let open = PriceRange::at_least(5000.0).unwrap();
        assert!(open.contains(1_000_000.0));
    }

    #[test]
    fn test_price_range_rejects_inverted() {
        assert!(PriceRange::new(10.0, 5.0).is_err());
        assert!(PriceRange::new(-1.0, 5.0).is_err());
    }

    #[test]
    fn test_presets() {
        let presets = PriceRange::presets();
        assert_eq!(presets.len(), 5);
        assert_eq!(presets[4].1.max, None);
    }
}
