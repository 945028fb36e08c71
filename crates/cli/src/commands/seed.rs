//! Seed the catalog from a YAML file.
//!
//! The file is a list of products. `id`, `title` and `price` are required;
//! everything else defaults to empty:
//!
//! ```yaml
//! - id: 1
//!   title: Crystal Tiara
//!   price: 199.00
//!   images: ["/img/tiara-1.jpg", "/img/tiara-2.jpg"]
//!   stock: 5
//!   category: crown
//!   cost: 58.00
//!   supplier_link: https://supplier.example.com/item/123
//! ```
//!
//! Rows are upserted by ID, so re-running with an edited file updates prices
//! and stock in place.

use std::path::Path;

use tracing::{error, info};

use crown_shop_storefront::config::database_url_from_env;
use crown_shop_storefront::db::{self, ProductRecord, ProductRepository};

/// Check a parsed catalog before anything is written.
///
/// Returns one message per problem found.
fn validate_catalog(records: &[ProductRecord]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for record in records {
        if !seen.insert(record.id) {
            errors.push(format!("product {}: duplicate id", record.id));
        }
        if record.id.as_i32() <= 0 {
            errors.push(format!("product {}: id must be positive", record.id));
        }
        if record.title.trim().is_empty() {
            errors.push(format!("product {}: title is empty", record.id));
        }
        if record.stock < 0 {
            errors.push(format!("product {}: stock is negative", record.id));
        }
    }

    errors
}

/// Upsert products from a YAML file.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML catalog
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, validation fails,
/// or database operations fail.
pub async fn products(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let records: Vec<ProductRecord> = serde_yaml::from_str(&content)?;

    info!(products = records.len(), "Parsed catalog");

    let errors = validate_catalog(&records);
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let database_url = database_url_from_env()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let written = ProductRepository::new(&pool).upsert_all(&records).await?;

    info!("Seeding complete!");
    info!("  Products written: {written}");

    Ok(())
}
