//! Product commands.

use anyhow::Result;
use campusmart::{JsonFileCatalog, SampleCatalog};
use clap::Subcommand;
use rust_i18n::t;
use std::path::{Path, PathBuf};

use crate::config::{open_market, require_user};
use crate::handlers::product::{self as handlers, BrowseQuery, NewListing};
use crate::output::{print_json, print_table, OutputFormat, PlainPrint};

#[derive(Subcommand)]
pub enum ProductAction {
    /// Browse listings
    #[command(alias = "ls")]
    List {
        /// Only these categories (repeatable)
        #[arg(short, long)]
        category: Vec<String>,
        /// Only these conditions (repeatable)
        #[arg(long)]
        condition: Vec<String>,
        /// Minimum price, inclusive
        #[arg(long)]
        min: Option<f64>,
        /// Maximum price, inclusive
        #[arg(long)]
        max: Option<f64>,
        /// Match title, category or seller
        #[arg(short, long)]
        search: Option<String>,
        /// newest, oldest, price-low or price-high
        #[arg(long, default_value = "newest")]
        sort: String,
    },

    /// Show one listing
    Show {
        /// Product ID
        id: String,
    },

    /// List a new item for sale
    Add {
        /// Listing title
        #[arg(short, long)]
        title: String,
        /// Asking price
        #[arg(short, long)]
        price: f64,
        /// Category
        #[arg(short, long)]
        category: String,
        /// Item condition
        #[arg(long)]
        condition: Option<String>,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Image reference (repeatable, at most 5)
        #[arg(short, long)]
        image: Vec<String>,
    },

    /// Remove one of your listings
    #[command(alias = "rm")]
    Remove {
        /// Product ID
        id: String,
    },

    /// List your own listings
    Mine,

    /// Replace the catalog from a JSON file, or the demo catalog
    Refresh {
        /// JSON array of products
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Show the price range buckets
    Presets,
}

pub async fn handle(
    action: ProductAction,
    format: OutputFormat,
    data_dir: Option<&Path>,
) -> Result<()> {
    let mut market = open_market(data_dir).await?;

    match action {
        ProductAction::List {
            category,
            condition,
            min,
            max,
            search,
            sort,
        } => {
            let query = BrowseQuery {
                categories: category,
                conditions: condition,
                min_price: min,
                max_price: max,
                search,
                sort,
            };
            let rows = handlers::list_products(&market, &query)?;
            if matches!(format, OutputFormat::Plain) {
                println!("{}\n", t!("listings", count = rows.len()));
            }
            print_table(rows, format);
        }
        ProductAction::Show { id } => {
            let details = handlers::show_product(&market, &id)?;
            match format {
                OutputFormat::Json => print_json(&details),
                _ => details.plain_print(),
            }
        }
        ProductAction::Add {
            title,
            price,
            category,
            condition,
            description,
            image,
        } => {
            let user = require_user(&market).await?;
            let listing = NewListing {
                title,
                description,
                price,
                category,
                condition,
                images: image,
            };
            let added = handlers::add_product(&mut market, &user, listing)?;
            println!("{}", t!("product_added", id = added.id));
        }
        ProductAction::Remove { id } => {
            let user = require_user(&market).await?;
            let removed = handlers::remove_product(&mut market, &user, &id)?;
            println!("{}", t!("product_removed", title = removed.title));
        }
        ProductAction::Mine => {
            let user = require_user(&market).await?;
            print_table(handlers::my_products(&market, &user), format);
        }
        ProductAction::Refresh { file } => {
            let count = match file {
                Some(path) => {
                    handlers::refresh_products(&mut market, &JsonFileCatalog::new(path)).await?
                }
                None => handlers::refresh_products(&mut market, &SampleCatalog).await?,
            };
            println!("{}", t!("catalog_refreshed", count = count));
        }
        ProductAction::Presets => print_table(handlers::price_presets(), format),
    }

    market.persist_if_dirty().await?;
    Ok(())
}
