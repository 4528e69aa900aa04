use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::{
    AuctionState, CartLines, CommandSuccess, Condition, DiscountPolicy, Errors, Listing, Notice,
    ProductId, Scope, Store, StoreId, User, UserId,
};
use crate::engine::{Marketplace, StoreSnapshot};
use crate::money::{Amount, Currency};

pub type AppState = Arc<Marketplace>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

/// A handled command plus the notices its side effects produced. Delivery of
/// the notices to their recipients is the caller's concern.
#[derive(Debug, Serialize)]
pub struct CommandOutcome {
    pub result: CommandSuccess,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OpenStoreRequest {
    pub id: StoreId,
    pub title: String,
    pub currency: Option<Currency>,
}

impl OpenStoreRequest {
    pub fn to_store(&self, founder: User) -> Store {
        let currency = self.currency.unwrap_or(Currency::VAC);
        Store::new(self.id, self.title.clone(), founder, currency)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StockProductRequest {
    pub id: ProductId,
    pub title: String,
    #[serde(rename = "basePrice")]
    pub base_price: Amount,
    pub quantity: u32,
}

impl StockProductRequest {
    pub fn to_listing(&self) -> Listing {
        Listing {
            product_id: self.id,
            title: self.title.clone(),
            base_price: self.base_price,
            quantity: self.quantity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartAuctionRequest {
    #[serde(rename = "productId")]
    pub product_id: ProductId,
    #[serde(rename = "durationDays")]
    pub duration_days: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BidRequest {
    pub amount: Amount,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtendAuctionRequest {
    #[serde(rename = "extraDays")]
    pub extra_days: i64,
}

/// A discount policy as submitted by a store owner: the same tree as the
/// domain policy, minus the node ids, which are assigned on conversion.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum DiscountRequest {
    Simple {
        scope: Scope,
        percent: Decimal,
    },
    Conditional {
        scope: Scope,
        condition: Condition,
        percent: Decimal,
    },
    And {
        left: Box<DiscountRequest>,
        right: Box<DiscountRequest>,
    },
    Or {
        left: Box<DiscountRequest>,
        right: Box<DiscountRequest>,
    },
    Xor {
        left: Box<DiscountRequest>,
        right: Box<DiscountRequest>,
    },
}

impl DiscountRequest {
    pub fn to_policy(&self) -> Result<DiscountPolicy, Errors> {
        match self {
            DiscountRequest::Simple { scope, percent } => {
                DiscountPolicy::simple(scope.clone(), *percent)
            },
            DiscountRequest::Conditional { scope, condition, percent } => {
                DiscountPolicy::conditional(scope.clone(), condition.clone(), *percent)
            },
            DiscountRequest::And { left, right } => {
                Ok(DiscountPolicy::all_of(left.to_policy()?, right.to_policy()?))
            },
            DiscountRequest::Or { left, right } => {
                Ok(DiscountPolicy::any_of(left.to_policy()?, right.to_policy()?))
            },
            DiscountRequest::Xor { left, right } => {
                Ok(DiscountPolicy::one_of(left.to_policy()?, right.to_policy()?))
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub lines: CartLines,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub amount: Amount,
}

#[derive(Debug, Serialize)]
pub struct StoreItem {
    pub id: StoreId,
    pub title: String,
    pub currency: Currency,
}

impl From<&Store> for StoreItem {
    fn from(store: &Store) -> Self {
        StoreItem {
            id: store.store_id,
            title: store.title.clone(),
            currency: store.store_currency,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StoreDetail {
    pub id: StoreId,
    pub title: String,
    pub currency: Currency,
    pub owners: Vec<UserId>,
    pub listings: Vec<Listing>,
    pub auctions: Vec<AuctionState>,
    pub discounts: Vec<DiscountPolicy>,
}

impl From<StoreSnapshot> for StoreDetail {
    fn from(snapshot: StoreSnapshot) -> Self {
        let mut listings: Vec<Listing> = snapshot.store.listings.values().cloned().collect();
        listings.sort_by_key(|listing| listing.product_id);

        let mut auctions = snapshot.auctions;
        auctions.sort_by_key(|auction| auction.product_id());

        StoreDetail {
            id: snapshot.store.store_id,
            title: snapshot.store.title,
            currency: snapshot.store.store_currency,
            owners: snapshot.store.owners,
            listings,
            auctions,
            discounts: snapshot.policies,
        }
    }
}
