use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::product::Product;

// ---------------------------------------------------------------------------
// CartItem — One product line in the cart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// `price × quantity` for this line.
    pub fn subtotal(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

// ---------------------------------------------------------------------------
// Cart — Ordered items plus derived totals
// ---------------------------------------------------------------------------

/// The user's cart.
///
/// `total_items` and `total_price` are derived from `items`; they are only
/// written by [`Cart::recompute_totals`]. Line quantities are `u32` and
/// saturate at `u32::MAX`; `total_items` is `u64` so their sum never wraps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub total_price: f64,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, product_id: i64) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product.id == product_id)
    }

    pub(crate) fn item_mut(&mut self, product_id: i64) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|i| i.product.id == product_id)
    }

    /// Recompute `total_items` and `total_price` from the items.
    pub fn recompute_totals(&mut self) {
        self.total_items = self.items.iter().map(|i| u64::from(i.quantity)).sum();
        self.total_price = self.items.iter().map(CartItem::subtotal).sum();
    }

    /// Repair a cart read back from storage: drop zero-quantity lines, merge
    /// lines sharing a product id (first occurrence keeps its position), and
    /// recompute totals.
    pub(crate) fn normalize(&mut self) {
        let mut merged: Vec<CartItem> = Vec::with_capacity(self.items.len());
        for item in self.items.drain(..) {
            if item.quantity == 0 {
                continue;
            }
            match merged.iter_mut().find(|m| m.product.id == item.product.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity)
                }
                None => merged.push(item),
            }
        }
        self.items = merged;
        self.recompute_totals();
    }
}
