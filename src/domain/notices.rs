// src/domain/notices.rs
use serde::{Deserialize, Serialize};
use crate::money::Amount;
use super::core::{ProductId, UserId};

/// What happened, from the point of view of one recipient. The engine only
/// produces these values; an external dispatcher turns them into messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum Event {
    /// The recipient's bid is no longer the highest on an open auction.
    Outbid {
        #[serde(rename = "productId")]
        product_id: ProductId,
        amount: Amount,
    },

    /// The recipient won the auction; one unit is theirs at `amount`.
    AuctionWon {
        #[serde(rename = "productId")]
        product_id: ProductId,
        amount: Amount,
    },

    /// Sent to each store owner when an auction closes with a winner.
    AuctionEnded {
        #[serde(rename = "productId")]
        product_id: ProductId,
        winner: UserId,
        amount: Amount,
    },

    /// Sent to each store owner when an auction closes without bids.
    AuctionFailed {
        #[serde(rename = "productId")]
        product_id: ProductId,
        #[serde(rename = "basePrice")]
        base_price: Amount,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub recipient: UserId,
    pub event: Event,
}
