// src/domain/stores.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use crate::money::{Amount, Currency};
use super::auctions::AuctionState;
use super::carts::{CartLines, PricedCart, PricedLine};
use super::core::{Errors, ProductId, StoreId, User, UserId};
use super::discounts::{total_discount, DiscountPolicy};
use super::items::Listing;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    #[serde(rename = "id")]
    pub store_id: StoreId,
    pub title: String,
    pub founder: User,
    /// Founder plus any co-owners. Owners receive auction outcome notices
    /// and are barred from bidding in this store.
    pub owners: Vec<UserId>,
    #[serde(rename = "currency")]
    pub store_currency: Currency,
    pub listings: HashMap<ProductId, Listing>,
}

impl Store {
    pub fn new(store_id: StoreId, title: String, founder: User, store_currency: Currency) -> Self {
        let owners = vec![founder.user_id().clone()];
        Store {
            store_id,
            title,
            founder,
            owners,
            store_currency,
            listings: HashMap::new(),
        }
    }

    pub fn is_owner(&self, user_id: &UserId) -> bool {
        self.owners.contains(user_id)
    }
}

/// Resolve a cart's unit prices against the store. Every line is validated
/// first: the product must be listed and the requested quantity in stock.
/// A product whose auction the buyer won is priced at the winning bid, not
/// the base price.
pub fn price_cart(
    store: &Store,
    auctions: &HashMap<ProductId, AuctionState>,
    buyer: &UserId,
    lines: &CartLines,
) -> Result<PricedCart, Errors> {
    let mut ordered: Vec<(&ProductId, &u32)> = lines.iter().collect();
    ordered.sort_by_key(|(product_id, _)| **product_id);

    let mut priced = Vec::with_capacity(ordered.len());
    for (product_id, quantity) in ordered {
        let listing = store
            .listings
            .get(product_id)
            .ok_or(Errors::UnknownProduct(*product_id))?;

        if !listing.in_stock(*quantity) {
            return Err(Errors::InsufficientStock(*product_id));
        }

        let unit_price = auctions
            .get(product_id)
            .and_then(|auction| auction.won_by(buyer))
            .unwrap_or(listing.base_price);

        priced.push(PricedLine {
            product_id: *product_id,
            unit_price,
            quantity: *quantity,
        });
    }

    Ok(PricedCart::new(store.store_currency, priced))
}

/// The charge for one store's cart portion: raw subtotal minus every active
/// top-level discount, clamped at zero. Validation failures abort the whole
/// computation; no fallback price is produced.
pub fn calc_amount(
    store: &Store,
    auctions: &HashMap<ProductId, AuctionState>,
    policies: &[DiscountPolicy],
    buyer: &UserId,
    lines: &CartLines,
) -> Result<Amount, Errors> {
    let cart = price_cart(store, auctions, buyer, lines)?;
    let discount = total_discount(policies, &cart);

    cart.subtotal()
        .saturating_sub(discount)
        .map_err(|_| Errors::CurrencyMismatch(store.store_currency))
}
