use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,
    pub description: String,
    pub quantity: i32,
    pub price: f64,
    /// User who created the product, if known.
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating or updating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub product_name: String,
    pub description: String,
    pub quantity: i32,
    pub price: f64,
}
