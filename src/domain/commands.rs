// src/domain/commands.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::auctions::{AuctionState, CloseOutcome};
use super::bids::Bid;
use super::core::{PolicyId, ProductId, StoreId};
use super::discounts::DiscountPolicy;
use super::items::Listing;
use super::stores::Store;

/// Every mutating operation, in journal form. Replaying a journal through
/// `Marketplace::handle` rebuilds the same state: anything nondeterministic
/// (timestamps, policy ids) is captured in the command itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum Command {
    #[serde(rename = "OpenStore")]
    OpenStore {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        store: Store,
    },

    #[serde(rename = "StockProduct")]
    StockProduct {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "storeId")]
        store_id: StoreId,
        listing: Listing,
    },

    #[serde(rename = "StartAuction")]
    StartAuction {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "storeId")]
        store_id: StoreId,
        #[serde(rename = "productId")]
        product_id: ProductId,
        #[serde(rename = "durationDays")]
        duration_days: i64,
    },

    #[serde(rename = "PlaceBid")]
    PlaceBid {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "storeId")]
        store_id: StoreId,
        bid: Bid,
    },

    #[serde(rename = "EndAuction")]
    EndAuction {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "storeId")]
        store_id: StoreId,
        #[serde(rename = "productId")]
        product_id: ProductId,
    },

    #[serde(rename = "ExtendAuction")]
    ExtendAuction {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "storeId")]
        store_id: StoreId,
        #[serde(rename = "productId")]
        product_id: ProductId,
        #[serde(rename = "extraDays")]
        extra_days: i64,
    },

    #[serde(rename = "AddDiscount")]
    AddDiscount {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "storeId")]
        store_id: StoreId,
        policy: DiscountPolicy,
    },

    #[serde(rename = "RemoveDiscount")]
    RemoveDiscount {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "storeId")]
        store_id: StoreId,
        #[serde(rename = "policyId")]
        policy_id: PolicyId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum CommandSuccess {
    #[serde(rename = "StoreOpened")]
    StoreOpened {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        store: Store,
    },

    #[serde(rename = "ProductStocked")]
    ProductStocked {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "storeId")]
        store_id: StoreId,
        listing: Listing,
    },

    #[serde(rename = "AuctionStarted")]
    AuctionStarted {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "storeId")]
        store_id: StoreId,
        auction: AuctionState,
    },

    #[serde(rename = "BidAccepted")]
    BidAccepted {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "storeId")]
        store_id: StoreId,
        bid: Bid,
    },

    #[serde(rename = "AuctionEnded")]
    AuctionEnded {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "storeId")]
        store_id: StoreId,
        #[serde(rename = "productId")]
        product_id: ProductId,
        outcome: CloseOutcome,
    },

    #[serde(rename = "AuctionExtended")]
    AuctionExtended {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "storeId")]
        store_id: StoreId,
        #[serde(rename = "productId")]
        product_id: ProductId,
        #[serde(rename = "endsAt")]
        ends_at: DateTime<Utc>,
    },

    #[serde(rename = "DiscountAdded")]
    DiscountAdded {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "storeId")]
        store_id: StoreId,
        #[serde(rename = "policyId")]
        policy_id: PolicyId,
    },

    #[serde(rename = "DiscountRemoved")]
    DiscountRemoved {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "storeId")]
        store_id: StoreId,
        #[serde(rename = "policyId")]
        policy_id: PolicyId,
    },
}
