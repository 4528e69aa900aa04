// src/domain/items.rs
use serde::{Deserialize, Serialize};
use crate::money::Amount;
use super::core::ProductId;

/// A store product line: everything but `quantity` is fixed at listing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub title: String,
    #[serde(rename = "basePrice")]
    pub base_price: Amount,
    pub quantity: u32,
}

impl Listing {
    pub fn in_stock(&self, requested: u32) -> bool {
        requested <= self.quantity
    }
}
