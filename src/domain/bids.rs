
// src/domain/bids.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::money::Amount;
use super::core::{ProductId, User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub for_product: ProductId,
    pub bidder: User,
    pub at: DateTime<Utc>,
    pub amount: Amount,
}
