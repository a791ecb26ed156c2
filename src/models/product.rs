use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Product — A catalog entry as served by the backend
// ---------------------------------------------------------------------------

/// A product as returned by the backend. Field names follow the backend's
/// snake_case JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub color: String,
    pub price: f64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub age_group: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub stock: i64,
}

impl Product {
    /// Whether the product is currently in stock.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Whether the product carries the given tag (case-insensitive).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}
