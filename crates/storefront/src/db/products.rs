//! Product repository.
//!
//! Only the customer-visible columns are ever selected: `cost` and
//! `supplier_link` stay in the table for the shop owner and never leave it.

use serde::Deserialize;
use sqlx::PgPool;

use crown_shop_core::{Price, Product, ProductId};

use super::RepositoryError;

const PRODUCT_COLUMNS: &str = "id, title, price, images, stock, category";

/// Raw `products` row as stored.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    title: String,
    price: rust_decimal::Decimal,
    images: Option<String>,
    stock: i32,
    category: Option<String>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("product {}: {e}", row.id))
        })?;
        let images = parse_images(row.images.as_deref()).map_err(|e| {
            RepositoryError::DataCorruption(format!("product {} images: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            title: row.title,
            price,
            images,
            stock: row.stock,
            category: row.category.unwrap_or_default(),
        })
    }
}

/// Parse the `images` column, a JSON array of URLs stored as text.
///
/// `NULL` and blank text mean no images.
fn parse_images(raw: Option<&str>) -> Result<Vec<String>, serde_json::Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(text) => serde_json::from_str(text),
    }
}

/// A full catalog row, including owner-only fields, as loaded from a seed file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub cost: Option<Price>,
    #[serde(default)]
    pub supplier_link: Option<String>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every product, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row holds a negative price
    /// or malformed image list.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the row is invalid.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Get every product whose ID is in `ids`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row is invalid.
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw_ids: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1) ORDER BY id"
        ))
        .bind(raw_ids)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Insert or replace catalog rows by ID in one transaction.
    ///
    /// The ID sequence is moved past the highest ID afterwards so later
    /// inserts without an explicit ID do not collide.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing is
    /// written in that case.
    pub async fn upsert_all(&self, records: &[ProductRecord]) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for record in records {
            let images = serde_json::to_string(&record.images).map_err(|e| {
                RepositoryError::DataCorruption(format!("product {} images: {e}", record.id))
            })?;

            written += sqlx::query(
                r"
                INSERT INTO products (id, title, price, images, stock, category, cost, supplier_link)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (id) DO UPDATE SET
                    title = EXCLUDED.title,
                    price = EXCLUDED.price,
                    images = EXCLUDED.images,
                    stock = EXCLUDED.stock,
                    category = EXCLUDED.category,
                    cost = EXCLUDED.cost,
                    supplier_link = EXCLUDED.supplier_link
                ",
            )
            .bind(record.id)
            .bind(&record.title)
            .bind(record.price)
            .bind(images)
            .bind(record.stock)
            .bind(&record.category)
            .bind(record.cost)
            .bind(record.supplier_link.as_deref())
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        sqlx::query(
            "SELECT setval(pg_get_serial_sequence('products', 'id'), COALESCE(MAX(id), 1)) FROM products",
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(written)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn row(images: Option<&str>, price: Decimal) -> ProductRow {
        ProductRow {
            id: ProductId::new(3),
            title: "Pearl Veil".to_string(),
            price,
            images: images.map(String::from),
            stock: 4,
            category: Some("veil".to_string()),
        }
    }

    #[test]
    fn test_parse_images_variants() {
        assert!(parse_images(None).unwrap().is_empty());
        assert!(parse_images(Some("  ")).unwrap().is_empty());
        assert_eq!(
            parse_images(Some(r#"["a.jpg","b.jpg"]"#)).unwrap(),
            vec!["a.jpg", "b.jpg"]
        );
        assert!(parse_images(Some("a.jpg")).is_err());
    }

    #[test]
    fn test_row_conversion() {
        let product = Product::try_from(row(Some(r#"["veil.jpg"]"#), Decimal::new(19_900, 2))).unwrap();
        assert_eq!(product.price, Price::from_cents(19_900));
        assert_eq!(product.cover_image(), Some("veil.jpg"));
        assert_eq!(product.category, "veil");
    }

    #[test]
    fn test_malformed_images_is_corruption() {
        let err = Product::try_from(row(Some("{not json"), Decimal::ONE)).unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }

    #[test]
    fn test_record_from_yaml_defaults() {
        let record: ProductRecord = serde_json::from_value(serde_json::json!({
            "id": 7,
            "title": "Rose Gold Crown",
            "price": 299.5
        }))
        .unwrap();
        assert_eq!(record.price, Price::from_cents(29_950));
        assert!(record.images.is_empty());
        assert!(record.cost.is_none());
    }

    #[test]
    fn test_negative_price_is_corruption() {
        let err = Product::try_from(row(None, Decimal::NEGATIVE_ONE)).unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }
}
