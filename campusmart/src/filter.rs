//! Catalog filter and sort pipeline.
//!
//! Stages run in a fixed order, each narrowing the previous one's output:
//! category, condition, price range, search, then sort. A stage whose
//! criterion is empty is skipped. Sorting is stable, so products with equal
//! keys keep their catalog order.

use std::cmp::Ordering;

use crate::models::{FilterSpec, Product, SortBy};

/// Derive the visible, ordered slice of `catalog` for `spec`.
///
/// Pure: the catalog is never modified and equal inputs give equal output.
pub fn apply(catalog: &[Product], spec: &FilterSpec) -> Vec<Product> {
    let mut visible: Vec<&Product> = catalog.iter().collect();

    if !spec.categories.is_empty() {
        visible.retain(|p| spec.categories.contains(&p.category));
    }

    if !spec.conditions.is_empty() {
        visible.retain(|p| {
            p.condition
                .map_or(false, |condition| spec.conditions.contains(&condition))
        });
    }

    if let Some(range) = &spec.price_range {
        visible.retain(|p| range.contains(p.price));
    }

    // Whitespace in the query is matched literally.
    let query = spec.search_query.to_lowercase();
    if !query.is_empty() {
        visible.retain(|p| matches_query(p, &query));
    }

    visible.sort_by(|a, b| compare(a, b, spec.sort_by));
    visible.into_iter().cloned().collect()
}

/// Case-insensitive substring match on title, category and seller name.
/// `query` must already be lowercase.
fn matches_query(product: &Product, query: &str) -> bool {
    product.title.to_lowercase().contains(query)
        || product.category.name().to_lowercase().contains(query)
        || product
            .seller_name
            .as_deref()
            .map_or(false, |seller| seller.to_lowercase().contains(query))
}

fn compare(a: &Product, b: &Product, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Newest => b.created_at.cmp(&a.created_at),
        SortBy::Oldest => a.created_at.cmp(&b.created_at),
        SortBy::PriceLow => a.price.total_cmp(&b.price),
        SortBy::PriceHigh => b.price.total_cmp(&a.price),
    }
}
