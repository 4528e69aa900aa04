// src/domain/carts.rs
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use crate::money::{Amount, Currency};
use super::core::ProductId;

/// The slice of a shopper's cart that belongs to one store.
pub type CartLines = HashMap<ProductId, u32>;

/// One cart line with its unit price already resolved (base price, or the
/// winning bid for an auction the buyer won).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    pub product_id: ProductId,
    #[serde(rename = "unitPrice")]
    pub unit_price: Amount,
    pub quantity: u32,
}

impl PricedLine {
    pub fn line_total(&self) -> Amount {
        self.unit_price.times(self.quantity)
    }
}

/// Read-only snapshot of a store's cart portion with resolved prices.
/// Discount evaluation and the raw subtotal both read this view, so every
/// line has a single price basis within one pricing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedCart {
    currency: Currency,
    lines: Vec<PricedLine>,
}

impl PricedCart {
    pub fn new(currency: Currency, lines: Vec<PricedLine>) -> Self {
        PricedCart { currency, lines }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn lines(&self) -> &[PricedLine] {
        &self.lines
    }

    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.lines
            .iter()
            .filter(|line| line.product_id == product_id)
            .map(|line| line.quantity)
            .sum()
    }

    pub fn subtotal(&self) -> Amount {
        self.sum_lines(|_| true)
    }

    /// Subtotal restricted to the given product set.
    pub fn subtotal_of(&self, products: &BTreeSet<ProductId>) -> Amount {
        self.sum_lines(|line| products.contains(&line.product_id))
    }

    fn sum_lines<F>(&self, keep: F) -> Amount
    where
        F: Fn(&PricedLine) -> bool,
    {
        let total: Decimal = self
            .lines
            .iter()
            .filter(|line| keep(line))
            .map(|line| line.line_total().value())
            .sum();
        Amount::new(self.currency, total)
    }
}
