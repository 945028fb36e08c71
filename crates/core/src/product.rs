//! Customer-visible catalog projection.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A product as shown to customers.
///
/// Supplier cost and supplier link exist on the stored row but are never part
/// of this type, so they cannot leak through any catalog response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique, stable product ID.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Image URLs in display order; the first is the cover image.
    #[serde(default)]
    pub images: Vec<String>,
    /// Units in stock (informational; never decremented by checkout).
    pub stock: i32,
    /// Category label, e.g. "crown" or "veil".
    pub category: String,
}

impl Product {
    /// The cover image, if the product has any images.
    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether the product is currently in stock.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let product = Product {
            id: ProductId::new(3),
            title: "Pearl Tiara".to_string(),
            price: Price::from_cents(29_900),
            images: vec!["https://img.example/a.jpg".to_string()],
            stock: 4,
            category: "crown".to_string(),
        };

        let value = serde_json::to_value(&product).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["category", "id", "images", "price", "stock", "title"]);
        assert_eq!(value["id"], 3);
    }

    #[test]
    fn test_missing_images_default_to_empty() {
        let product: Product = serde_json::from_str(
            r#"{"id":1,"title":"Veil","price":88,"stock":0,"category":"veil"}"#,
        )
        .unwrap();
        assert!(product.images.is_empty());
        assert_eq!(product.cover_image(), None);
        assert!(!product.in_stock());
    }
}
